use std::path::{Path, PathBuf};
use std::str::FromStr;

use colored::{Color, Colorize};
use itertools::Itertools;
use sportshub::jira::{CreateIssueRequest, LEAD_ISSUE_TYPE};
use sportshub::leads::{
    build_lead_description, clean_file_content, group_leads_by_status,
    is_meaningful_website_text, match_ticket, normalize_website_url, progression_target,
    summary_comment, LeadAction, StatusGroup, TicketMatch, WebsiteFindings,
};
use sportshub::website::fetch_website_text;
use sportshub::{CliConfig, JiraClient, Lead, LeadStatus, OpenRouterClient, LEAD_STATUS_ORDER};
use tracing::warn;

use crate::commands::{fail, jira_failure};

/// Clients the `leads` commands talk to.
struct LeadTools {
    http: reqwest::Client,
    jira: JiraClient,
    openrouter: OpenRouterClient,
    project_key: String,
}

impl LeadTools {
    fn from_config(config: &CliConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            jira: JiraClient::from_config(config),
            openrouter: OpenRouterClient::from_config(config),
            project_key: config.default_project_key.clone(),
        }
    }
}

/// Scrape a lead's website and ask for a short analysis of it.
async fn investigate_website(tools: &LeadTools, url: &str) -> WebsiteFindings {
    println!("{}", format!("🔍 Scraping website: {url}").bright_black());
    let text = match fetch_website_text(&tools.http, url).await {
        Ok(text) => text,
        Err(err) => {
            warn!(url, error = %err, "website scrape failed");
            println!("{}", format!("⚠️  Failed to scrape website: {err}").yellow());
            String::new()
        }
    };

    if !is_meaningful_website_text(&text) {
        println!("{}", "⚠️  No meaningful content found on website".yellow());
        return WebsiteFindings::NoContent;
    }

    println!(
        "{}",
        format!("📝 Found {} characters of text content", text.chars().count()).bright_black()
    );
    println!("{}", "🤖 Analyzing website content with AI...".bright_black());
    match tools.openrouter.analyze_website_content(&text).await {
        Ok(summary) => WebsiteFindings::Analysis(summary),
        Err(err) => {
            warn!(error = %err, "website analysis failed");
            println!("{}", format!("⚠️  AI analysis failed: {err}").yellow());
            WebsiteFindings::AnalysisUnavailable
        }
    }
}

pub async fn create(
    config: &CliConfig,
    organiser_name: &str,
    website: Option<&str>,
) -> anyhow::Result<()> {
    create_lead(&LeadTools::from_config(config), organiser_name, website).await
}

async fn create_lead(
    tools: &LeadTools,
    organiser_name: &str,
    website: Option<&str>,
) -> anyhow::Result<()> {
    let organiser_name = organiser_name.trim();
    if organiser_name.is_empty() {
        return Err(fail("Organiser name is required"));
    }

    let website = website
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(normalize_website_url);
    let findings = match &website {
        Some(url) => Some(investigate_website(tools, url).await),
        None => None,
    };
    let description =
        build_lead_description(organiser_name, website.as_deref().zip(findings.as_ref()));

    println!("{}", "🎫 Creating Jira ticket...".blue());
    println!("{}", format!("Summary: {organiser_name}").bright_black());

    let request = CreateIssueRequest {
        summary: organiser_name.to_string(),
        description,
        project_key: tools.project_key.clone(),
        issue_type: Some(LEAD_ISSUE_TYPE.to_string()),
    };
    let issue = tools
        .jira
        .create_issue(&request)
        .await
        .map_err(|err| jira_failure("Failed to create Jira ticket", &err, LeadAction::Create))?;

    println!("{}", format!("✅ Lead ticket created: {}", issue.key).green());
    println!("{}", format!("🔗 {}", tools.jira.issue_url(&issue.key)).blue());
    Ok(())
}

pub async fn search(config: &CliConfig, organiser_name: &str) -> anyhow::Result<()> {
    let organiser_name = organiser_name.trim();
    if organiser_name.is_empty() {
        return Err(fail("Organiser name is required"));
    }

    let jira = JiraClient::from_config(config);
    println!("{}", "🔍 Searching for tickets...".blue());
    println!("{}", format!("Organiser: {organiser_name}").bright_black());

    let result = jira
        .search_issues(organiser_name, &config.default_project_key)
        .await
        .map_err(|err| jira_failure("Failed to search Jira tickets", &err, LeadAction::Search))?;

    if result.total == 0 {
        println!("{}", "📋 No tickets found matching the search criteria.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("\n✅ Found {} ticket(s):\n", result.total).green()
    );
    for (index, issue) in result.issues.iter().enumerate() {
        println!("{}", format!("{}. {}", index + 1, issue.key).cyan());
        println!("{}", format!("   Summary: {}", issue.summary).white());
        println!(
            "{}",
            format!("   URL: {}", jira.issue_url(&issue.key)).bright_black()
        );
        println!();
    }
    Ok(())
}

/// Arguments of `leads progress`.
pub struct ProgressOptions {
    pub organiser_name: Option<String>,
    pub ticket_number: Option<String>,
    pub status: Option<String>,
    pub file: Option<PathBuf>,
}

/// Resolve the ticket to move, either given directly or found by organiser.
/// `None` means the search result was already reported and nothing moves.
async fn resolve_ticket(
    tools: &LeadTools,
    options: &ProgressOptions,
) -> anyhow::Result<Option<String>> {
    let ticket = options
        .ticket_number
        .as_deref()
        .map(str::trim)
        .filter(|ticket| !ticket.is_empty());
    if let Some(ticket) = ticket {
        return Ok(Some(ticket.to_string()));
    }
    let organiser_name = options
        .organiser_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());
    let Some(organiser_name) = organiser_name else {
        return Err(fail("Must provide either --organiserName or --ticketNumber"));
    };

    println!("{}", "🔍 Searching for tickets...".blue());
    println!("{}", format!("Organiser: {organiser_name}").bright_black());
    let result = tools
        .jira
        .search_issues(organiser_name, &tools.project_key)
        .await
        .map_err(|err| jira_failure("Failed to search for tickets", &err, LeadAction::Search))?;

    match match_ticket(&result.issues) {
        TicketMatch::NotFound => {
            println!("{}", "📋 No tickets found matching the search criteria.".yellow());
            Ok(None)
        }
        TicketMatch::Unique(only) => {
            println!("{}", format!("✅ Found ticket: {}", only.key).green());
            Ok(Some(only.key.clone()))
        }
        TicketMatch::Ambiguous(many) => {
            println!(
                "{}",
                format!(
                    "⚠️  Found {} tickets. Please specify which one to update:\n",
                    result.total
                )
                .yellow()
            );
            for (index, issue) in many.iter().enumerate() {
                println!("{}", format!("{}. {}", index + 1, issue.key).cyan());
                println!("{}", format!("   Summary: {}", issue.summary).white());
                println!();
            }
            println!(
                "{}",
                "Use --ticketNumber to specify which ticket to update.".bright_black()
            );
            Ok(None)
        }
    }
}

/// Summarise a notes file and attach it to the ticket. Failures only warn.
async fn attach_file_summary(tools: &LeadTools, ticket: &str, file: &Path) {
    println!("{}", "\n📄 Processing file for summary...".blue());
    println!(
        "{}",
        format!("📁 Reading file: {}", file.display()).bright_black()
    );

    let content = match std::fs::read_to_string(file) {
        Ok(raw) => clean_file_content(&raw).map_err(|e| e.to_string()),
        Err(err) => Err(format!("File not found: {} ({err})", file.display())),
    };
    let content = match content {
        Ok(content) => content,
        Err(reason) => {
            warn!(path = %file.display(), %reason, "skipping file summary");
            println!(
                "{}",
                format!("⚠️  File processing failed: Failed to process file: {reason}").yellow()
            );
            return;
        }
    };
    println!(
        "{}",
        format!("📝 Processed {} characters from file", content.chars().count()).bright_black()
    );

    println!("{}", "🤖 Generating summary with AI...".bright_black());
    let summary = match tools.openrouter.summarize_file_content(&content).await {
        Ok(summary) => summary,
        Err(err) => {
            println!("{}", format!("⚠️  AI analysis failed: {err}").yellow());
            println!(
                "{}",
                "File content was processed but could not be summarized".bright_black()
            );
            return;
        }
    };

    println!(
        "{}",
        "💬 Adding summary as comment to ticket...".bright_black()
    );
    let comment = summary_comment(chrono::Local::now().date_naive(), &summary);
    match tools.jira.add_comment(ticket, &comment).await {
        Ok(()) => println!("{}", "✅ File summary added as comment".green()),
        Err(err) => println!("{}", format!("⚠️  Failed to add comment: {err}").yellow()),
    }
}

pub async fn progress(config: &CliConfig, options: ProgressOptions) -> anyhow::Result<()> {
    progress_lead(&LeadTools::from_config(config), options).await
}

async fn progress_lead(tools: &LeadTools, options: ProgressOptions) -> anyhow::Result<()> {
    let requested = match options.status.as_deref() {
        Some(status) => Some(LeadStatus::from_str(status.trim()).map_err(|_| {
            fail(format!(
                "Invalid status. Valid statuses are: {}",
                LEAD_STATUS_ORDER.iter().join(", ")
            ))
        })?),
        None => None,
    };

    let Some(ticket) = resolve_ticket(tools, &options).await? else {
        return Ok(());
    };
    println!("{}", format!("📋 Processing ticket: {ticket}").blue());

    let issue = tools.jira.get_issue(&ticket).await.map_err(|err| {
        jira_failure("Failed to update ticket status", &err, LeadAction::Progress)
    })?;
    println!("{}", format!("Current status: {}", issue.status).white());

    let target = match progression_target(requested, &issue.status) {
        Some(target) => target,
        None => {
            println!(
                "{}",
                "⚠️  Ticket is already at the final status or status progression not available."
                    .yellow()
            );
            println!(
                "{}",
                format!("Current status: {}", issue.status).bright_black()
            );
            return Ok(());
        }
    };
    println!("{}", format!("🔄 Transitioning to: {target}").yellow());

    let transition = tools
        .jira
        .update_issue_status(&ticket, target)
        .await
        .map_err(|err| fail(format!("Failed to update status: {err}")))?;
    println!(
        "{}",
        format!("✅ Successfully transitioned to {}", transition.to.name).green()
    );
    println!("{}", format!("🔗 {}", tools.jira.issue_url(&ticket)).blue());

    if let Some(file) = &options.file {
        attach_file_summary(tools, &ticket, file).await;
    }
    Ok(())
}

fn group_color(group: &StatusGroup) -> Color {
    match group {
        StatusGroup::Known(LeadStatus::Opportunity) => Color::Yellow,
        StatusGroup::Known(LeadStatus::Contacted) => Color::Blue,
        StatusGroup::Known(LeadStatus::MeetingScheduled) => Color::Cyan,
        StatusGroup::Known(LeadStatus::Onboarding) => Color::Magenta,
        _ => Color::White,
    }
}

fn print_group(group: &StatusGroup, leads: &[Lead], jira: &JiraClient) {
    let color = group_color(group);
    let header = format!("{} {}", group.emoji(), group.label());
    println!("{}", header.color(color).bold());
    println!(
        "{}",
        "─".repeat(header.chars().count() + 2).color(color)
    );

    for (index, lead) in leads.iter().enumerate() {
        println!(
            "{} {}",
            format!("  {}.", index + 1).bright_black(),
            lead.key.cyan().bold()
        );
        println!("{} {}", "     Summary:".bright_black(), lead.summary.white());
        println!(
            "{} {}",
            "     URL:".bright_black(),
            jira.issue_url(&lead.key).blue().underline()
        );
        if index + 1 < leads.len() {
            println!();
        }
    }
    println!();
}

pub async fn show(config: &CliConfig) -> anyhow::Result<()> {
    let jira = JiraClient::from_config(config);
    println!("{}", "📋 Fetching all lead tickets...".blue());

    let result = jira
        .get_all_leads(&config.default_project_key)
        .await
        .map_err(|err| jira_failure("Failed to fetch lead tickets", &err, LeadAction::Search))?;

    if result.leads.is_empty() {
        println!("{}", "📋 No lead tickets found.".yellow());
        return Ok(());
    }

    println!(
        "{}",
        format!("\n✅ Found {} lead(s):\n", result.leads.len()).green()
    );
    for (group, leads) in group_leads_by_status(result.leads) {
        print_group(&group, &leads, &jira);
    }
    Ok(())
}
