use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Sales pipeline stage of an organiser lead ticket.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum LeadStatus {
    #[strum(serialize = "OPPORTUNITY")]
    Opportunity,
    #[strum(serialize = "CONTACTED")]
    Contacted,
    #[strum(serialize = "MEETING SCHEDULED")]
    MeetingScheduled,
    #[strum(serialize = "ONBOARDING")]
    Onboarding,
    #[strum(serialize = "ONBOARDED")]
    Onboarded,
    #[strum(serialize = "LOST")]
    Lost,
}

/// Order in which leads progress. `leads progress` walks this list.
pub const LEAD_STATUS_ORDER: [LeadStatus; 6] = [
    LeadStatus::Opportunity,
    LeadStatus::Contacted,
    LeadStatus::MeetingScheduled,
    LeadStatus::Onboarding,
    LeadStatus::Onboarded,
    LeadStatus::Lost,
];

impl LeadStatus {
    pub fn emoji(&self) -> &'static str {
        match self {
            LeadStatus::Opportunity => "🌱",
            LeadStatus::Contacted => "📞",
            LeadStatus::MeetingScheduled => "📅",
            LeadStatus::Onboarding => "🚀",
            LeadStatus::Onboarded => "✅",
            LeadStatus::Lost => "❌",
        }
    }
}

/// Newly created Jira issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedIssue {
    pub id: String,
    pub key: String,
    #[serde(rename = "self")]
    pub self_url: String,
}

/// Search hit returned by an organiser-name query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueSummary {
    pub key: String,
    pub summary: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    pub issues: Vec<IssueSummary>,
    pub total: u32,
}

/// A lead ticket together with its Jira workflow status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lead {
    pub key: String,
    pub summary: String,
    pub status: String,
    pub status_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadsResult {
    pub leads: Vec<Lead>,
    pub total: u32,
}

/// Full view of a single issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IssueDetails {
    pub key: String,
    pub summary: String,
    pub description: String,
    pub status: String,
    pub status_category: String,
}

/// A workflow transition available on an issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub id: String,
    pub name: String,
    pub to: TransitionTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionTarget {
    pub name: String,
}
