use itertools::Itertools;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

use crate::config::CliConfig;
use crate::error::{Result, SportsHubError};
use crate::http;
use crate::model::*;

/// Issue type used when a request does not name one.
pub const DEFAULT_ISSUE_TYPE: &str = "Task";
/// Issue type of lead tickets.
pub const LEAD_ISSUE_TYPE: &str = "Lead";

const SEARCH_MAX_RESULTS: u32 = 50;
const LEADS_MAX_RESULTS: u32 = 100;

/// Fields of a new Jira issue.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIssueRequest {
    pub summary: String,
    pub description: String,
    pub project_key: String,
    pub issue_type: Option<String>,
}

/// Client for the Jira Cloud REST API v3, authenticated with an email and
/// API token.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> sportshub::Result<()> {
/// use sportshub::JiraClient;
///
/// let jira = JiraClient::new("https://acme.atlassian.net", "me@acme.io", "token");
/// let found = jira.search_issues("Syrio Volleyball", "SH").await?;
/// println!("{} matching tickets", found.total);
/// # Ok(())
/// # }
/// ```
pub struct JiraClient {
    http: reqwest::Client,
    site_url: String,
    email: String,
    api_token: String,
}

impl JiraClient {
    pub fn new(
        site_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), site_url, email, api_token)
    }

    /// Create a client using the provided [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        site_url: impl Into<String>,
        email: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        let site_url: String = site_url.into();
        Self {
            http: client,
            site_url: site_url.trim_end_matches('/').to_string(),
            email: email.into(),
            api_token: api_token.into(),
        }
    }

    pub fn from_config(config: &CliConfig) -> Self {
        Self::new(&config.jira_base_url, &config.email, &config.api_token)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/rest/api/3{path}", self.site_url)
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.http
            .get(url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
    }

    fn post(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        self.http
            .post(url)
            .basic_auth(&self.email, Some(&self.api_token))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
    }

    /// Browser link to an issue.
    pub fn issue_url(&self, issue_key: &str) -> String {
        format!("{}/browse/{issue_key}", self.site_url)
    }

    /// Create an issue; the description is sent as a one-paragraph document.
    #[instrument(skip(self, request), fields(project = %request.project_key))]
    pub async fn create_issue(&self, request: &CreateIssueRequest) -> Result<CreatedIssue> {
        let url = self.api_url("/issue");
        let payload = json!({
            "fields": {
                "project": { "key": request.project_key },
                "summary": request.summary,
                "description": adf_document(&request.description),
                "issuetype": {
                    "name": request.issue_type.as_deref().unwrap_or(DEFAULT_ISSUE_TYPE),
                },
            }
        });

        let issue: CreatedIssue = http::send_json(self.post(&url, &payload), &url).await?;
        debug!(key = %issue.key, "created issue");
        Ok(issue)
    }

    /// Issues in `project_key` whose summary or description mentions
    /// `organiser_name`, newest first.
    #[instrument(skip(self))]
    pub async fn search_issues(
        &self,
        organiser_name: &str,
        project_key: &str,
    ) -> Result<SearchResult> {
        let jql = format!(
            "project = \"{project_key}\" AND (summary ~ \"{organiser_name}\" OR description ~ \"{organiser_name}\") ORDER BY created DESC"
        );
        let raw = self
            .search(&jql, SEARCH_MAX_RESULTS, &["key", "summary", "description"])
            .await?;

        let issues = raw
            .issues
            .into_iter()
            .map(|issue| IssueSummary {
                description: adf_text(issue.fields.description.as_ref()),
                summary: issue.fields.summary,
                key: issue.key,
            })
            .collect::<Vec<_>>();
        debug!(count = issues.len(), total = raw.total, "searched issues");

        Ok(SearchResult {
            issues,
            total: raw.total,
        })
    }

    /// Every ticket in `project_key` with its workflow status.
    #[instrument(skip(self))]
    pub async fn get_all_leads(&self, project_key: &str) -> Result<LeadsResult> {
        let jql = format!("project = \"{project_key}\" ORDER BY status ASC, created DESC");
        let raw = self
            .search(&jql, LEADS_MAX_RESULTS, &["key", "summary", "status"])
            .await?;

        let leads = raw
            .issues
            .into_iter()
            .map(|issue| {
                let (status, status_category) = issue.fields.status.unwrap_or_default().split();
                Lead {
                    key: issue.key,
                    summary: issue.fields.summary,
                    status,
                    status_category,
                }
            })
            .collect::<Vec<_>>();
        debug!(count = leads.len(), "fetched leads");

        Ok(LeadsResult {
            leads,
            total: raw.total,
        })
    }

    async fn search(&self, jql: &str, max_results: u32, fields: &[&str]) -> Result<RawSearch> {
        let url = self.api_url("/search");
        let payload = json!({
            "jql": jql,
            "maxResults": max_results,
            "fields": fields,
        });
        http::send_json(self.post(&url, &payload), &url).await
    }

    #[instrument(skip(self))]
    pub async fn get_issue(&self, issue_key: &str) -> Result<IssueDetails> {
        let path = format!("/issue/{issue_key}");
        let url = reqwest::Url::parse_with_params(
            &self.api_url(&path),
            &[("fields", "key,summary,description,status")],
        )
        .map_err(|e| SportsHubError::Validation(format!("invalid Jira URL: {e}")))?;

        let issue: RawIssue = http::send_json(self.get(url.as_str()), url.as_str()).await?;
        let (status, status_category) = issue.fields.status.unwrap_or_default().split();

        Ok(IssueDetails {
            key: issue.key,
            description: adf_text(issue.fields.description.as_ref()),
            summary: issue.fields.summary,
            status,
            status_category,
        })
    }

    /// Transitions currently available on an issue.
    #[instrument(skip(self))]
    pub async fn get_transitions(&self, issue_key: &str) -> Result<Vec<Transition>> {
        let url = self.api_url(&format!("/issue/{issue_key}/transitions"));
        let raw: RawTransitions = http::send_json(self.get(&url), &url).await?;
        Ok(raw.transitions)
    }

    /// Move an issue into `status` using whichever available transition
    /// leads there. Returns the transition taken.
    #[instrument(skip(self))]
    pub async fn update_issue_status(
        &self,
        issue_key: &str,
        status: LeadStatus,
    ) -> Result<Transition> {
        let transitions = self.get_transitions(issue_key).await?;
        let status = status.to_string();

        let Some(transition) = find_transition(&transitions, &status).cloned() else {
            let available = transitions.iter().map(|t| t.name.as_str()).join(", ");
            return Err(SportsHubError::NoTransition { status, available });
        };

        let url = self.api_url(&format!("/issue/{issue_key}/transitions"));
        let payload = json!({ "transition": { "id": transition.id } });
        http::send_text(self.post(&url, &payload), &url).await?;

        debug!(to = %transition.to.name, "transitioned issue");
        Ok(transition)
    }

    #[instrument(skip(self, comment))]
    pub async fn add_comment(&self, issue_key: &str, comment: &str) -> Result<()> {
        let url = self.api_url(&format!("/issue/{issue_key}/comment"));
        let payload = json!({ "body": adf_document(comment) });
        http::send_text(self.post(&url, &payload), &url).await?;
        Ok(())
    }

    /// Check the credentials by fetching the authenticated user.
    #[instrument(skip(self))]
    pub async fn test_connection(&self) -> Result<()> {
        let url = self.api_url("/myself");
        http::send_text(self.get(&url), &url).await?;
        Ok(())
    }
}

/// First transition whose own name or target status matches `status`
/// (an upper-case lead status name).
pub fn find_transition<'a>(transitions: &'a [Transition], status: &str) -> Option<&'a Transition> {
    let compact: String = status.chars().filter(|c| !c.is_whitespace()).collect();
    transitions.iter().find(|t| {
        let to = t.to.name.to_uppercase();
        let name = t.name.to_uppercase();
        to == status || name == status || to.contains(&compact) || name.contains(&compact)
    })
}

/// Wrap plain text in a single-paragraph Atlassian Document Format body.
fn adf_document(text: &str) -> Value {
    json!({
        "type": "doc",
        "version": 1,
        "content": [{
            "type": "paragraph",
            "content": [{ "type": "text", "text": text }],
        }],
    })
}

/// Text of the first paragraph of an ADF body; plain strings pass through.
fn adf_text(description: Option<&Value>) -> String {
    let Some(description) = description else {
        return String::new();
    };
    description
        .pointer("/content/0/content/0/text")
        .and_then(Value::as_str)
        .or_else(|| description.as_str())
        .unwrap_or_default()
        .to_string()
}

#[derive(Deserialize)]
struct RawSearch {
    #[serde(default)]
    issues: Vec<RawIssue>,
    #[serde(default)]
    total: u32,
}

#[derive(Deserialize)]
struct RawIssue {
    key: String,
    fields: RawFields,
}

#[derive(Deserialize)]
struct RawFields {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    description: Option<Value>,
    #[serde(default)]
    status: Option<RawStatus>,
}

#[derive(Deserialize, Default)]
struct RawStatus {
    name: String,
    #[serde(rename = "statusCategory")]
    status_category: Option<RawNamed>,
}

impl RawStatus {
    fn split(self) -> (String, String) {
        (
            self.name,
            self.status_category.map(|c| c.name).unwrap_or_default(),
        )
    }
}

#[derive(Deserialize)]
struct RawNamed {
    name: String,
}

#[derive(Deserialize)]
struct RawTransitions {
    #[serde(default)]
    transitions: Vec<Transition>,
}
