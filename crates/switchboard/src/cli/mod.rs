//! Command-line interface module.

mod commands;
mod generate;
mod usage;

pub use commands::{Cli, Commands, GenerateArgs, OutputFormat};
pub use generate::run_generate;
pub use usage::show_usage;

use switchboard::Vendor;

/// Credential for `vendor` from its environment variable, or empty.
pub(crate) fn credential_from_env(vendor: Vendor) -> String {
    std::env::var(vendor.credential_env()).unwrap_or_default()
}
