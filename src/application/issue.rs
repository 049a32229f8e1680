//! Issue drafting.
//!
//! Turns the edited notes into a Linear issue draft: validates the form,
//! fills gaps from remembered preferences, appends the source block and
//! builds the prefilled "new issue" link.

use url::Url;

use crate::domain::{AppConfig, AppError, IssueDraft, Metadata, Priority, Result};
use crate::infrastructure::preferences::{
    PreferenceStore, ASSIGNEE_KEY, PRIORITY_KEY, TEAM_KEY,
};

use super::converter::html_to_markdown;

/// Signature line closing the source block.
const CREATED_WITH: &str = "**Created with:** Fathom to Linear Extension";

/// What the user filled in before submitting.
#[derive(Debug, Clone, Default)]
pub struct IssueRequest {
    pub title: String,
    /// Edited notes as HTML.
    pub content_html: String,
    pub team: Option<String>,
    pub assignee: Option<String>,
    pub priority: Option<Priority>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Source block listing the envelope fields that are present.
///
/// Returns `None` when there is nothing worth citing.
#[must_use]
pub fn format_source_information(metadata: &Metadata) -> Option<String> {
    let fields = [
        ("From", &metadata.from),
        ("To", &metadata.to),
        ("Date", &metadata.date),
        ("Subject", &metadata.subject),
    ];
    if fields.iter().all(|(_, value)| value.is_none()) {
        return None;
    }

    let mut block = String::from("\n\n---\n\n### Source Information\n\n");
    for (label, value) in fields {
        if let Some(value) = value {
            block.push_str(&format!("**{label}:** {value}\n\n"));
        }
    }
    block.push_str(CREATED_WITH);
    Some(block)
}

/// Markdown body followed by the source block, if any.
#[must_use]
pub fn issue_description(markdown: &str, metadata: Option<&Metadata>) -> String {
    match metadata.and_then(format_source_information) {
        Some(source) => format!("{}{source}", markdown.trim_end()),
        None => markdown.to_string(),
    }
}

fn resolve_priority(
    requested: Option<Priority>,
    prefs: &dyn PreferenceStore,
    fallback: Priority,
) -> Result<Priority> {
    if let Some(priority) = requested {
        return Ok(priority);
    }
    let stored = prefs.get(PRIORITY_KEY, fallback.as_str())?;
    Ok(stored.parse().unwrap_or_else(|e| {
        tracing::warn!("Ignoring stored priority: {e}");
        fallback
    }))
}

/// Validates the request and assembles the draft.
///
/// Missing team, assignee and priority fall back to the last used values;
/// with no saved team the first configured team is used.
/// The chosen values are remembered for next time.
///
/// # Errors
/// Returns a validation error naming the first missing field, or a
/// storage error if preferences cannot be read or written.
pub fn compose_issue(
    request: &IssueRequest,
    metadata: Option<&Metadata>,
    prefs: &dyn PreferenceStore,
    config: &AppConfig,
) -> Result<IssueDraft> {
    let title = request.title.trim();
    if title.is_empty() {
        return Err(AppError::validation("Please enter a title for the issue"));
    }

    let team = match non_empty(request.team.as_deref()) {
        Some(team) => config.resolve_team(&team),
        None => {
            let default_team = config.teams.first().map_or("", |t| t.id.as_str());
            prefs.get(TEAM_KEY, default_team)?
        }
    };
    if team.is_empty() {
        return Err(AppError::validation("Please select a team"));
    }

    let markdown = html_to_markdown(&request.content_html);
    if markdown.is_empty() {
        return Err(AppError::validation("No content to send"));
    }

    let assignee = match non_empty(request.assignee.as_deref()) {
        Some(assignee) => Some(assignee),
        None => non_empty(Some(prefs.get(ASSIGNEE_KEY, "")?.as_str())),
    };
    let priority = resolve_priority(request.priority, prefs, config.linear.default_priority)?;

    prefs.put(TEAM_KEY, &team)?;
    prefs.put(PRIORITY_KEY, priority.as_str())?;
    if let Some(assignee) = &assignee {
        prefs.put(ASSIGNEE_KEY, assignee)?;
    }

    tracing::info!(team = %team, %priority, "Composed issue draft");

    Ok(IssueDraft {
        title: title.to_string(),
        description: issue_description(&markdown, metadata),
        team,
        assignee,
        priority,
    })
}

/// Prefilled "new issue" link for the draft.
///
/// # Errors
/// Returns a config error if `base_url` is not a usable base URL.
pub fn issue_url(base_url: &str, draft: &IssueDraft) -> Result<String> {
    let invalid = |message: String| AppError::Config { message };

    let mut url =
        Url::parse(base_url).map_err(|e| invalid(format!("Invalid Linear base URL: {e}")))?;

    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|()| invalid(format!("Linear base URL cannot be a base: {base_url}")))?;
        segments.pop_if_empty();
        if draft.team.is_empty() {
            segments.push("new");
        } else {
            segments.push("team").push(&draft.team).push("new");
        }
    }

    let params: Vec<(&str, &str)> = [
        ("title", draft.title.as_str()),
        ("description", draft.description.as_str()),
        ("priority", draft.priority.as_str()),
        ("assignee", draft.assignee.as_deref().unwrap_or("")),
    ]
    .into_iter()
    .filter(|(_, value)| !value.is_empty())
    .collect();

    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params);
    }

    Ok(url.into())
}
