//! Domain models for extracted meeting notes.
//!
//! These models are what the extraction pipeline hands to the issue
//! composer and what the CLI prints; their serde shape is the wire format
//! shared with the popup/dialog surfaces.

use serde::{Deserialize, Serialize};

/// One action item or next-step line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Cleaned entry text (no bullets, no `[assignee]` tags).
    pub text: String,
    /// Name taken from the first `[...]` tag in the raw line.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Whether the line carried a link back to the recording.
    #[serde(default)]
    pub has_reference_link: bool,
}

impl Entry {
    /// Key used to drop repeated lines within one bucket.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!(
            "{}-{}",
            self.text.to_lowercase(),
            self.assignee.as_deref().unwrap_or("")
        )
    }
}

/// The collectible region a heading opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    ActionItems,
    NextSteps,
}

impl Section {
    /// Heading shown above the bucket in rendered output.
    #[must_use]
    pub const fn heading(self) -> &'static str {
        match self {
            Self::ActionItems => "Action Items",
            Self::NextSteps => "Next Steps",
        }
    }
}

/// The two buckets produced by section extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sections {
    pub action_items: Vec<Entry>,
    pub next_steps: Vec<Entry>,
}

impl Sections {
    /// Both buckets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.action_items.is_empty() && self.next_steps.is_empty()
    }

    /// Buckets paired with their section, in rendering order.
    #[must_use]
    pub fn buckets(&self) -> [(Section, &[Entry]); 2] {
        [
            (Section::ActionItems, self.action_items.as_slice()),
            (Section::NextSteps, self.next_steps.as_slice()),
        ]
    }
}

/// Where an extraction result came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Parsed out of a provider email.
    Email,
    /// The user's own text selection.
    Selection,
    /// Nothing usable was found.
    #[default]
    Empty,
}

impl Source {
    /// Status line shown once content is loaded.
    #[must_use]
    pub const fn status_message(self) -> Option<&'static str> {
        match self {
            Self::Selection => Some("Content extracted from your text selection"),
            Self::Email => Some("Content extracted from Fathom meeting email"),
            Self::Empty => None,
        }
    }
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Selection => write!(f, "selection"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Envelope fields of the surrounding message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Meeting title found inside the provider summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fathom_title: Option<String>,
}

impl Metadata {
    /// No field is present.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.subject.is_none()
            && self.from.is_none()
            && self.to.is_none()
            && self.date.is_none()
            && self.fathom_title.is_none()
    }
}

/// Outcome of one extraction request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_items: Option<Vec<Entry>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_steps: Option<Vec<Entry>>,
    /// Plain-text markup document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Display markup snippet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub source: Source,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ExtractionResult {
    /// Result carrying extracted buckets.
    #[must_use]
    pub fn from_sections(sections: Sections) -> Self {
        Self {
            action_items: Some(sections.action_items),
            next_steps: Some(sections.next_steps),
            source: Source::Email,
            ..Self::default()
        }
    }

    /// Error result produced at the extraction boundary.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: true,
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Structured buckets, if this result has any.
    #[must_use]
    pub fn sections(&self) -> Option<Sections> {
        if self.action_items.is_none() && self.next_steps.is_none() {
            return None;
        }
        Some(Sections {
            action_items: self.action_items.clone().unwrap_or_default(),
            next_steps: self.next_steps.clone().unwrap_or_default(),
        })
    }

    /// Title to prefill: provider meeting title, then result title, then subject.
    #[must_use]
    pub fn display_title(&self) -> Option<&str> {
        let metadata = self.metadata.as_ref();
        metadata
            .and_then(|m| m.fathom_title.as_deref())
            .or(self.title.as_deref())
            .or_else(|| metadata.and_then(|m| m.subject.as_deref()))
    }
}

/// Linear issue priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    #[default]
    High,
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "urgent" => Ok(Self::Urgent),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!(
                "Unknown priority: {s}. Use: urgent, high, medium, low"
            )),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Linear team the user can file into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Payload handed to the ticket-submission collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueDraft {
    pub title: String,
    pub description: String,
    pub team: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    pub priority: Priority,
}
