//! `usage` command handler.

use super::{OutputFormat, credential_from_env};
use std::str::FromStr;
use strum::IntoEnumIterator;
use switchboard::{
    ProbeReport, ProviderError, ProviderErrorKind, ProviderSelection, RateLimitSnapshot,
    RequestError, SwitchboardContext, SwitchboardResult, UsageWindow, Vendor, probe_all,
};
use tracing::instrument;

/// Probe the named providers (all when empty) and print their health.
#[instrument(skip(ctx))]
pub async fn show_usage(
    ctx: &SwitchboardContext,
    providers: &[String],
    format: OutputFormat,
) -> SwitchboardResult<()> {
    let vendors = if providers.is_empty() {
        Vendor::iter().collect::<Vec<_>>()
    } else {
        providers
            .iter()
            .map(|name| {
                Vendor::from_str(name.trim()).map_err(|_| {
                    ProviderError::new(ProviderErrorKind::UnknownVendor(name.clone()))
                })
            })
            .collect::<Result<Vec<_>, _>>()?
    };

    let selections: Vec<ProviderSelection> = vendors
        .into_iter()
        .map(|vendor| {
            let model = ctx.config().default_model(vendor);
            ProviderSelection::new(vendor.to_string(), credential_from_env(vendor), Some(model))
        })
        .collect();
    let reports = probe_all(ctx, &selections).await;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|e| RequestError::new(format!("Failed to render usage: {e}")))?;
            println!("{json}");
        }
        OutputFormat::Human => {
            for report in &reports {
                println!("{}", render_report(report));
            }
        }
    }
    Ok(())
}

fn render_report(report: &ProbeReport) -> String {
    let mut line = format!(
        "{:<8} {:<8}",
        report.vendor().display_name(),
        report.status().to_string()
    );
    if let Some(snapshot) = report.snapshot() {
        line.push_str(&render_snapshot(snapshot));
    }
    if let Some(message) = report.message() {
        line.push_str("  ");
        line.push_str(message);
    }
    line
}

fn render_snapshot(snapshot: &RateLimitSnapshot) -> String {
    let window = |label: &str, w: UsageWindow| {
        format!(" {label} {}/{} ({:.0}%)", w.used(), w.limit(), w.percent_used())
    };
    [
        window("RPM", snapshot.requests_per_minute()),
        window("TPM", snapshot.tokens_per_minute()),
        window("RPD", snapshot.requests_per_day()),
    ]
    .concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use switchboard::ProbeStatus;

    #[test]
    fn report_line_names_vendor_status_and_message() {
        let report = ProbeReport::new(
            Vendor::Gemini,
            ProbeStatus::Error,
            Some("No API key configured".to_string()),
            None,
        );
        let line = render_report(&report);
        assert!(line.starts_with("Gemini"));
        assert!(line.contains("error"));
        assert!(line.ends_with("No API key configured"));
    }

    #[test]
    fn snapshot_windows_are_rendered() {
        let snapshot = RateLimitSnapshot::new(
            UsageWindow::new(3, 30),
            UsageWindow::new(0, 100),
            UsageWindow::new(10, 1000),
        );
        let text = render_snapshot(&snapshot);
        assert!(text.contains("RPM 3/30 (10%)"), "{text}");
        assert!(text.contains("RPD 10/1000 (1%)"), "{text}");
    }
}
