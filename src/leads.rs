//! Lead ticket rules shared by the `leads` commands: status matching and
//! progression, grouping for display, and ticket text.

use chrono::NaiveDate;
use itertools::Itertools;

use crate::error::{Result, SportsHubError};
use crate::model::{IssueSummary, Lead, LeadStatus, LEAD_STATUS_ORDER};

/// Minimum characters of cleaned file text worth summarising.
pub const MIN_FILE_CONTENT_LEN: usize = 10;
/// Scraped website text shorter than this is not sent for analysis.
pub const MIN_WEBSITE_TEXT_LEN: usize = 50;

/// Upper-case `status` and keep only ASCII letters and whitespace.
pub fn normalize_status(status: &str) -> String {
    status
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_whitespace())
        .collect::<String>()
        .trim()
        .to_string()
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Map a Jira workflow status name onto the lead pipeline, if it belongs to it.
///
/// `"Meeting-Scheduled"`, `"meetingscheduled"` and `"LOST (archived)"` all match.
pub fn match_lead_status(status: &str) -> Option<LeadStatus> {
    let normalized = normalize_status(status);
    let compact = strip_whitespace(&normalized);
    LEAD_STATUS_ORDER.into_iter().find(|candidate| {
        let name = candidate.to_string();
        let name_compact = strip_whitespace(&name);
        name == normalized || name_compact == compact || normalized.contains(&name_compact)
    })
}

/// The status a lead moves to from `current`.
///
/// Statuses outside the pipeline restart at the first stage; the last stage
/// has no successor.
pub fn next_status(current: &str) -> Option<LeadStatus> {
    let Some(status) = match_lead_status(current) else {
        return Some(LEAD_STATUS_ORDER[0]);
    };
    let index = LEAD_STATUS_ORDER.iter().position(|s| *s == status)?;
    LEAD_STATUS_ORDER.get(index + 1).copied()
}

/// Where `leads progress` moves a ticket currently in `current`: the
/// requested status if any, otherwise the next one in the pipeline.
pub fn progression_target(requested: Option<LeadStatus>, current: &str) -> Option<LeadStatus> {
    requested.or_else(|| next_status(current))
}

/// Outcome of looking a ticket up by organiser name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TicketMatch<'a> {
    NotFound,
    Unique(&'a IssueSummary),
    Ambiguous(&'a [IssueSummary]),
}

pub fn match_ticket(issues: &[IssueSummary]) -> TicketMatch<'_> {
    match issues {
        [] => TicketMatch::NotFound,
        [only] => TicketMatch::Unique(only),
        many => TicketMatch::Ambiguous(many),
    }
}

/// Heading under which `leads show` lists tickets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StatusGroup {
    Known(LeadStatus),
    Other(String),
}

impl StatusGroup {
    pub fn label(&self) -> String {
        match self {
            StatusGroup::Known(status) => status.to_string(),
            StatusGroup::Other(name) => name.clone(),
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            StatusGroup::Known(status) => status.emoji(),
            StatusGroup::Other(_) => "📋",
        }
    }
}

/// Group leads for display: pipeline stages latest first, then any other
/// statuses in the order they were first seen. Empty groups are omitted.
pub fn group_leads_by_status(leads: Vec<Lead>) -> Vec<(StatusGroup, Vec<Lead>)> {
    let (known, other): (Vec<_>, Vec<_>) = leads
        .into_iter()
        .map(|lead| match match_lead_status(&lead.status) {
            Some(status) => (StatusGroup::Known(status), lead),
            None => (StatusGroup::Other(lead.status.clone()), lead),
        })
        .partition(|(group, _)| matches!(group, StatusGroup::Known(_)));

    let mut known = known.into_iter().into_group_map();
    let mut groups: Vec<(StatusGroup, Vec<Lead>)> = LEAD_STATUS_ORDER
        .iter()
        .rev()
        .filter_map(|status| {
            let group = StatusGroup::Known(*status);
            known.remove(&group).map(|leads| (group, leads))
        })
        .collect();

    let order: Vec<StatusGroup> = other.iter().map(|(g, _)| g.clone()).unique().collect();
    let mut other = other.into_iter().into_group_map();
    groups.extend(
        order
            .into_iter()
            .filter_map(|group| other.remove(&group).map(|leads| (group, leads))),
    );
    groups
}

/// Prefix `https://` unless the URL already names http or https.
pub fn normalize_website_url(url: &str) -> String {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Whether scraped website text is long enough to send for analysis.
pub fn is_meaningful_website_text(text: &str) -> bool {
    text.chars().count() > MIN_WEBSITE_TEXT_LEN
}

/// What became of the website attached to a new lead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebsiteFindings {
    Analysis(String),
    AnalysisUnavailable,
    NoContent,
}

/// Description of a new lead ticket.
pub fn build_lead_description(
    organiser_name: &str,
    website: Option<(&str, &WebsiteFindings)>,
) -> String {
    let mut description = format!("📌 Organiser Name: {organiser_name}");
    if let Some((url, findings)) = website {
        description.push_str(&format!("\nWebsite: {url}"));
        match findings {
            WebsiteFindings::Analysis(summary) => {
                description.push_str(&format!("\n\nWebsite Analysis:\n{summary}"));
            }
            WebsiteFindings::AnalysisUnavailable => {
                description.push_str("\n\n_Note: Website content found but AI analysis unavailable_");
            }
            WebsiteFindings::NoContent => description.push_str(
                "\n\n_Note: Website link provided but no content available for analysis_",
            ),
        }
    }
    description
}

/// Collapse whitespace runs in file text, rejecting near-empty files.
pub fn clean_file_content(content: &str) -> Result<String> {
    let cleaned = content.split_whitespace().join(" ");
    if cleaned.chars().count() < MIN_FILE_CONTENT_LEN {
        return Err(SportsHubError::Validation(
            "File contains insufficient content for analysis".to_string(),
        ));
    }
    Ok(cleaned)
}

/// Comment body carrying a file summary, headed by `date`.
pub fn summary_comment(date: NaiveDate, summary: &str) -> String {
    format!("📋 **{} Summary**:\n\n{summary}", date.format("%a %b %d %Y"))
}

/// Jira operation a `leads` command was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadAction {
    Create,
    Search,
    Progress,
}

/// Hint printed after a failed Jira call with HTTP `status`.
pub fn failure_tip(action: LeadAction, status: Option<u16>) -> Option<&'static str> {
    match (status?, action) {
        (401, _) => Some("Check your credentials with \"sportshub configure\""),
        (403, LeadAction::Create) => {
            Some("Make sure you have permission to create issues in this project")
        }
        (403, LeadAction::Search) => {
            Some("Make sure you have permission to search issues in this project")
        }
        (403, LeadAction::Progress) => {
            Some("Make sure you have permission to update issues in this project")
        }
        (404, LeadAction::Progress) => Some("Check that the ticket number exists"),
        (404, _) => Some("Check that your Jira base URL and project key are correct"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lead(key: &str, status: &str) -> Lead {
        Lead {
            key: key.to_string(),
            summary: format!("Organiser {key}"),
            status: status.to_string(),
            status_category: "To Do".to_string(),
        }
    }

    #[test]
    fn test_normalize_status() {
        assert_eq!(normalize_status("  Meeting-Scheduled! "), "MEETINGSCHEDULED");
        assert_eq!(normalize_status("on boarding 2"), "ON BOARDING");
    }

    #[test]
    fn test_match_lead_status() {
        assert_eq!(
            match_lead_status("Meeting Scheduled"),
            Some(LeadStatus::MeetingScheduled)
        );
        assert_eq!(
            match_lead_status("meeting-scheduled"),
            Some(LeadStatus::MeetingScheduled)
        );
        assert_eq!(match_lead_status("Lost (archived)"), Some(LeadStatus::Lost));
        assert_eq!(match_lead_status("In Review"), None);
    }

    #[test]
    fn test_match_prefers_earlier_stage_on_overlap() {
        // "ONBOARDING" is checked before "ONBOARDED" and neither contains the other.
        assert_eq!(match_lead_status("Onboarded"), Some(LeadStatus::Onboarded));
        assert_eq!(match_lead_status("onboarding"), Some(LeadStatus::Onboarding));
    }

    #[test]
    fn test_next_status_walks_pipeline() {
        assert_eq!(next_status("Opportunity"), Some(LeadStatus::Contacted));
        assert_eq!(next_status("CONTACTED"), Some(LeadStatus::MeetingScheduled));
        assert_eq!(next_status("Onboarded"), Some(LeadStatus::Lost));
        assert_eq!(next_status("Lost"), None);
    }

    #[test]
    fn test_next_status_restarts_unknown() {
        assert_eq!(next_status("To Do"), Some(LeadStatus::Opportunity));
        assert_eq!(next_status(""), Some(LeadStatus::Opportunity));
    }

    #[test]
    fn test_group_leads_by_status() {
        let leads = vec![
            lead("SH-1", "Opportunity"),
            lead("SH-2", "Backlog"),
            lead("SH-3", "Contacted"),
            lead("SH-4", "Opportunity"),
            lead("SH-5", "Blocked"),
            lead("SH-6", "Backlog"),
        ];
        let groups = group_leads_by_status(leads);

        let summary: Vec<(String, Vec<&str>)> = groups
            .iter()
            .map(|(g, leads)| (g.label(), leads.iter().map(|l| l.key.as_str()).collect()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("CONTACTED".to_string(), vec!["SH-3"]),
                ("OPPORTUNITY".to_string(), vec!["SH-1", "SH-4"]),
                ("Backlog".to_string(), vec!["SH-2", "SH-6"]),
                ("Blocked".to_string(), vec!["SH-5"]),
            ]
        );
        assert_eq!(groups[0].0.emoji(), "📞");
        assert_eq!(groups[2].0.emoji(), "📋");
    }

    #[test]
    fn test_normalize_website_url() {
        assert_eq!(normalize_website_url("syrio.com"), "https://syrio.com");
        assert_eq!(normalize_website_url(" http://a.io "), "http://a.io");
        assert_eq!(normalize_website_url("https://a.io/x"), "https://a.io/x");
    }

    #[test]
    fn test_build_lead_description() {
        assert_eq!(
            build_lead_description("Owen", None),
            "📌 Organiser Name: Owen"
        );

        let analysed = WebsiteFindings::Analysis("- runs leagues".to_string());
        assert_eq!(
            build_lead_description("Syrio", Some(("https://syrio.com", &analysed))),
            "📌 Organiser Name: Syrio\nWebsite: https://syrio.com\n\nWebsite Analysis:\n- runs leagues"
        );

        let empty = build_lead_description(
            "Syrio",
            Some(("https://syrio.com", &WebsiteFindings::NoContent)),
        );
        assert!(empty.ends_with("_Note: Website link provided but no content available for analysis_"));
    }

    #[test]
    fn test_clean_file_content() {
        assert_eq!(
            clean_file_content("Met   with\n\n the\tcoach today").unwrap(),
            "Met with the coach today"
        );
        assert!(matches!(
            clean_file_content("  short \n"),
            Err(SportsHubError::Validation(_))
        ));
    }

    #[test]
    fn test_clean_file_content_counts_characters() {
        assert!(matches!(
            clean_file_content("éééééé"),
            Err(SportsHubError::Validation(_))
        ));
        assert_eq!(clean_file_content("éééééééééé").unwrap(), "éééééééééé");
    }

    #[test]
    fn test_website_text_threshold_counts_characters() {
        assert!(!is_meaningful_website_text(&"a".repeat(MIN_WEBSITE_TEXT_LEN)));
        assert!(is_meaningful_website_text(&"a".repeat(MIN_WEBSITE_TEXT_LEN + 1)));
        assert!(!is_meaningful_website_text(&"é".repeat(30)));
    }

    fn issue(key: &str) -> IssueSummary {
        IssueSummary {
            key: key.to_string(),
            summary: format!("Organiser {key}"),
            description: String::new(),
        }
    }

    #[test]
    fn test_match_ticket() {
        assert_eq!(match_ticket(&[]), TicketMatch::NotFound);

        let one = vec![issue("SH-1")];
        assert_eq!(match_ticket(&one), TicketMatch::Unique(&one[0]));

        let two = vec![issue("SH-2"), issue("SH-1")];
        assert_eq!(match_ticket(&two), TicketMatch::Ambiguous(&two[..]));
    }

    #[test]
    fn test_progression_target() {
        assert_eq!(
            progression_target(None, "Contacted"),
            Some(LeadStatus::MeetingScheduled)
        );
        assert_eq!(
            progression_target(Some(LeadStatus::Lost), "Contacted"),
            Some(LeadStatus::Lost)
        );
        assert_eq!(progression_target(None, "Lost"), None);
        assert_eq!(
            progression_target(None, "In Review"),
            Some(LeadStatus::Opportunity)
        );
    }

    #[test]
    fn test_summary_comment() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            summary_comment(date, "- point"),
            "📋 **Tue Mar 05 2024 Summary**:\n\n- point"
        );
    }

    #[test]
    fn test_failure_tip() {
        assert_eq!(
            failure_tip(LeadAction::Search, Some(401)),
            Some("Check your credentials with \"sportshub configure\"")
        );
        assert_eq!(
            failure_tip(LeadAction::Progress, Some(404)),
            Some("Check that the ticket number exists")
        );
        assert_eq!(
            failure_tip(LeadAction::Create, Some(404)),
            Some("Check that your Jira base URL and project key are correct")
        );
        assert_eq!(failure_tip(LeadAction::Create, Some(500)), None);
        assert_eq!(failure_tip(LeadAction::Create, None), None);
    }
}
