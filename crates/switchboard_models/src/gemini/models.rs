//! Model name normalization and cascade construction.

use tracing::debug;

/// Legacy or informal names and what they resolve to. Checked in order
/// against the cleaned name; `*` entries match by prefix.
const ALIASES: &[(&str, &str)] = &[
    ("gemini-1.5-flash-8b*", "gemini-2.0-flash-lite"),
    ("gemini-1.5-flash*", "gemini-2.0-flash"),
    ("gemini-2.0-flash-exp", "gemini-2.0-flash"),
    ("gemini-flash", "gemini-2.0-flash"),
    ("gemini-1.5-pro*", "gemini-2.5-pro"),
    ("gemini-1.0-pro*", "gemini-2.5-pro"),
    ("gemini-pro", "gemini-2.5-pro"),
];

/// Canonical form of a Gemini model name.
///
/// # Examples
///
/// ```
/// use switchboard_models::normalize_model;
///
/// assert_eq!(normalize_model("models/gemini-1.5-flash-002"), "gemini-2.0-flash");
/// assert_eq!(normalize_model("gemini-pro"), "gemini-2.5-pro");
/// assert_eq!(normalize_model("gemini-2.5-flash"), "gemini-2.5-flash");
/// ```
pub fn normalize_model(raw: &str) -> String {
    let cleaned = raw.trim();
    let cleaned = cleaned.strip_prefix("models/").unwrap_or(cleaned);
    let cleaned = cleaned.to_ascii_lowercase();
    let cleaned = strip_revision(&cleaned);

    let resolved = ALIASES
        .iter()
        .find(|(pattern, _)| match pattern.strip_suffix('*') {
            Some(prefix) => cleaned.starts_with(prefix),
            None => cleaned == *pattern,
        })
        .map(|(_, target)| (*target).to_string())
        .unwrap_or_else(|| cleaned.to_string());

    if resolved != raw {
        debug!(raw, resolved = %resolved, "Normalized Gemini model name");
    }
    resolved
}

/// Drop a pinned `-NNN` revision suffix.
fn strip_revision(name: &str) -> &str {
    match name.rsplit_once('-') {
        Some((base, rev)) if rev.len() == 3 && rev.bytes().all(|b| b.is_ascii_digit()) => base,
        _ => name,
    }
}

/// Ordered, duplicate-free list of models to try.
///
/// The normalized request comes first, then each normalized fallback, cut
/// to `max` entries (at least one).
///
/// # Examples
///
/// ```
/// use switchboard_models::build_cascade;
///
/// let fallbacks = vec!["gemini-2.0-flash".to_string(), "gemini-2.0-flash-lite".to_string()];
/// assert_eq!(
///     build_cascade("gemini-1.5-flash", &fallbacks, 4),
///     vec!["gemini-2.0-flash", "gemini-2.0-flash-lite"]
/// );
/// ```
pub fn build_cascade(requested: &str, fallbacks: &[String], max: usize) -> Vec<String> {
    let mut cascade: Vec<String> = Vec::new();
    let names = std::iter::once(requested).chain(fallbacks.iter().map(String::as_str));
    for name in names.map(normalize_model) {
        if !name.is_empty() && !cascade.contains(&name) {
            cascade.push(name);
        }
    }
    cascade.truncate(max.max(1));
    cascade
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn revision_suffix_only_when_three_digits() {
        assert_eq!(strip_revision("gemini-2.0-flash-001"), "gemini-2.0-flash");
        assert_eq!(strip_revision("gemini-2.0-flash-lite"), "gemini-2.0-flash-lite");
        assert_eq!(strip_revision("gemini-exp-1206"), "gemini-exp-1206");
    }

    #[test]
    fn flash_8b_resolves_to_lite() {
        assert_eq!(normalize_model("gemini-1.5-flash-8b-latest"), "gemini-2.0-flash-lite");
    }

    #[test]
    fn current_names_pass_through() {
        assert_eq!(normalize_model(" Gemini-Flash-Latest "), "gemini-flash-latest");
        assert_eq!(normalize_model("gemini-2.5-pro"), "gemini-2.5-pro");
    }

    #[test]
    fn cascade_respects_max() {
        let fallbacks: Vec<String> = ["a", "b", "c", "d"].map(String::from).to_vec();
        assert_eq!(build_cascade("gemini-2.5-flash", &fallbacks, 4).len(), 4);
        assert_eq!(build_cascade("gemini-2.5-flash", &fallbacks, 0).len(), 1);
    }
}
