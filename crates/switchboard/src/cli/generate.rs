//! `generate` command handler.

use super::{GenerateArgs, OutputFormat, credential_from_env};
use std::str::FromStr;
use switchboard::{
    GenerateRequest, ProviderFactory, ProviderSelection, RequestError, SwitchboardContext,
    SwitchboardDriver, SwitchboardResult, Vendor,
};
use tracing::{info, instrument};

/// Send one prompt and print the outcome.
///
/// Returns whether the generation succeeded. Failed generations are
/// printed, not raised; errors are reserved for bad input.
#[instrument(skip(ctx, args), fields(provider = %args.provider))]
pub async fn run_generate(ctx: &SwitchboardContext, args: GenerateArgs) -> SwitchboardResult<bool> {
    let preference = match args.provider.split_once(':') {
        Some(_) => args.provider.clone(),
        None => format!("{}:", args.provider),
    };
    let parsed = ProviderSelection::from_preference(&preference, String::new());
    let credential = Vendor::from_str(parsed.vendor())
        .map(credential_from_env)
        .unwrap_or_default();
    let model = args.model.clone().or_else(|| parsed.model().clone());
    let selection = ProviderSelection::new(parsed.vendor().clone(), credential, model);

    let provider = ProviderFactory::create(ctx, &selection)?;
    info!(model = provider.model_name(), "Generating");

    let mut builder = GenerateRequest::builder();
    builder.user_prompt(args.prompt).structured_json(args.json);
    if let Some(system) = args.system {
        builder.system_instruction(system);
    }
    let request = builder
        .build()
        .map_err(|e| RequestError::new(format!("Invalid request: {e}")))?;

    let response = provider.generate(&request).await;

    match args.format {
        OutputFormat::Json => match serde_json::to_string_pretty(&response) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                return Err(RequestError::new(format!("Failed to render response: {e}")).into());
            }
        },
        OutputFormat::Human => {
            if let Some(model) = response.model_used() {
                eprintln!("(answered by {model})");
            }
            match response.error() {
                None => println!("{}", response.text()),
                Some(error) => eprintln!("{error}"),
            }
        }
    }

    Ok(response.is_success())
}
