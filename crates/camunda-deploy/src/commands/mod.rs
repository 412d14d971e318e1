pub mod apply;
pub mod destroy;
pub mod import;
pub mod refresh;
pub mod show;

use crate::state::StateManager;
use camunda_provider::{CamundaProvider, Diagnostics, ProviderError, Severity};
use colored::Colorize;

/// Everything a lifecycle command needs
pub struct Context {
    pub provider: CamundaProvider,
    pub states: StateManager,
}

/// Print warnings and fail on the first error diagnostic
pub fn check_diagnostics(diags: &Diagnostics) -> anyhow::Result<()> {
    for diag in diags.iter() {
        let label = match diag.severity {
            Severity::Error => "Error:".red().bold(),
            Severity::Warning => "Warning:".yellow().bold(),
        };
        eprintln!("{} {}", label, diag.summary.bold());
        eprintln!("  {}", diag.detail);
    }

    match diags.errors().next() {
        Some(err) => anyhow::bail!("{}", err.summary),
        None => Ok(()),
    }
}

/// Wrap a lifecycle failure so its title is the top-level message
pub fn fail(err: ProviderError) -> anyhow::Error {
    let summary = err.summary().to_string();
    anyhow::Error::new(err).context(summary)
}
