use colored::Colorize;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Password};
use sportshub::config::{
    validate_email, validate_jira_base_url, validate_project_key, validate_token,
    DEFAULT_PROJECT_KEY,
};
use sportshub::{CliConfig, ConfigManager, JiraClient};
use tracing::debug;

fn text_prompt(
    theme: &ColorfulTheme,
    prompt: &str,
    default: Option<String>,
    validate: fn(&str) -> sportshub::Result<String>,
) -> dialoguer::Result<String> {
    let mut input = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(move |value: &String| -> Result<(), String> {
            validate(value).map(|_| ()).map_err(|e| e.to_string())
        });
    if let Some(default) = default.filter(|d| !d.is_empty()) {
        input = input.default(default);
    }
    input.interact_text()
}

/// Ask for a secret. With a `current` value an empty answer keeps it.
fn secret_prompt(
    theme: &ColorfulTheme,
    prompt: &str,
    what: &'static str,
    current: Option<String>,
) -> dialoguer::Result<String> {
    let current = current.filter(|c| !c.is_empty());
    let keep_current = current.is_some();
    let prompt = if keep_current {
        format!("{prompt} (leave empty to keep the current one)")
    } else {
        prompt.to_string()
    };

    let answer = Password::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty_password(keep_current)
        .validate_with(move |value: &String| -> Result<(), String> {
            if keep_current && value.trim().is_empty() {
                return Ok(());
            }
            validate_token(value, what).map(|_| ()).map_err(|e| e.to_string())
        })
        .interact()?;

    Ok(match current {
        Some(current) if answer.trim().is_empty() => current,
        _ => answer.trim().to_string(),
    })
}

fn prompt_config(existing: Option<CliConfig>) -> anyhow::Result<CliConfig> {
    let theme = ColorfulTheme::default();
    let existing = existing.unwrap_or_default();

    let jira_base_url = text_prompt(
        &theme,
        "Jira base URL (e.g., https://yourcompany.atlassian.net)",
        Some(existing.jira_base_url),
        validate_jira_base_url,
    )?;
    let email = text_prompt(&theme, "Email address", Some(existing.email), validate_email)?;
    let api_token = secret_prompt(&theme, "API Token", "API Token", None)?;
    let default_key = Some(existing.default_project_key)
        .filter(|k| !k.is_empty())
        .unwrap_or_else(|| DEFAULT_PROJECT_KEY.to_string());
    let project_key = text_prompt(
        &theme,
        "Default project key (e.g., SH)",
        Some(default_key),
        validate_project_key,
    )?;
    let open_router_api_token = secret_prompt(
        &theme,
        "OpenRouter API Token",
        "OpenRouter API Token",
        Some(existing.open_router_api_token),
    )?;

    Ok(CliConfig {
        jira_base_url: validate_jira_base_url(&jira_base_url)?,
        email: validate_email(&email)?,
        api_token,
        default_project_key: validate_project_key(&project_key)?,
        open_router_api_token,
    })
}

fn is_cancelled(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<dialoguer::Error>(),
        Some(dialoguer::Error::IO(io)) if io.kind() == std::io::ErrorKind::Interrupted
    )
}

/// Prompt for credentials, check them against Jira and save them.
pub async fn run(manager: &ConfigManager) -> anyhow::Result<()> {
    println!("{}", "🔐 Sportshub CLI Configuration".blue());
    println!(
        "{}",
        "Please provide your Jira credentials and settings.\n".bright_black()
    );

    let config = match prompt_config(manager.load()) {
        Ok(config) => config,
        Err(err) if is_cancelled(&err) => {
            println!("{}", "\n⚠️  Configuration cancelled.".yellow());
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    println!("{}", "\n🔍 Testing Jira connection...".yellow());
    if let Err(err) = JiraClient::from_config(&config).test_connection().await {
        debug!(error = ?err, "connection test failed");
        println!("{}", format!("❌ Connection test failed: {err}").red());
        println!(
            "{}",
            "Configuration not saved. Please check your credentials and try again."
                .bright_black()
        );
        return Ok(());
    }

    manager.save(&config)?;

    println!("{}", "✅ Configuration saved successfully!".green());
    println!(
        "{}",
        format!("Configuration stored at: {}", manager.path().display()).bright_black()
    );
    println!(
        "{}",
        "\n🎉 You can now use sportshub to create lead tickets!".green()
    );
    Ok(())
}
