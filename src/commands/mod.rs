pub mod configure;
pub mod leads;

use colored::Colorize;
use sportshub::leads::{failure_tip, LeadAction};
use sportshub::{CliConfig, ConfigManager, SportsHubError};

/// A failure that has already been printed; only the exit status is left.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct Reported(pub String);

/// Print `message` as an error line and return it as a [`Reported`] failure.
pub fn fail(message: impl Into<String>) -> anyhow::Error {
    let message = message.into();
    println!("{}", format!("❌ {message}").red());
    Reported(message).into()
}

/// The stored configuration, or a printed hint to run `sportshub configure`.
pub fn load_config(manager: &ConfigManager) -> anyhow::Result<CliConfig> {
    manager.get().map_err(|err| fail(err.to_string()))
}

/// Print a failed Jira call with its details and a hint for common statuses.
pub fn jira_failure(headline: &str, err: &SportsHubError, action: LeadAction) -> anyhow::Error {
    let failure = fail(headline);
    println!("{}", format!("Details: {err}").red());
    if let Some(tip) = failure_tip(action, err.status_code()) {
        println!("{}", format!("💡 Tip: {tip}").yellow());
    }
    failure
}
