//! Output formatting for extraction results and issue drafts.
//!
//! Supports multiple output formats: Markdown, HTML, JSON, and table view.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{ExtractionResult, IssueDraft, Team};
use crate::infrastructure::preferences::PreferenceEntry;

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Linear markdown document.
    #[default]
    Markdown,
    /// Editable HTML snippet.
    Html,
    /// JSON format for programmatic use.
    Json,
    /// Compact table listing of entries.
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => Err(format!("Unknown format: {s}. Use: markdown, html, json, table")),
        }
    }
}

/// Formats a result as a markdown document headed by its title.
pub fn format_result_markdown(result: &ExtractionResult) -> String {
    let mut out = String::new();

    if let Some(title) = result.display_title() {
        out.push_str(&format!("# {title}\n\n"));
    }
    if let Some(content) = &result.content {
        out.push_str(content.trim_end());
        out.push('\n');
    }

    out
}

/// Formats a result as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_result_json(result: &ExtractionResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}

/// Formats the extracted entries as a table.
pub fn format_entries_table(result: &ExtractionResult) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Section", "#", "Entry", "Assignee", "Link"]);

    if let Some(sections) = result.sections() {
        for (section, entries) in sections.buckets() {
            for (i, entry) in entries.iter().enumerate() {
                table.add_row(vec![
                    section.heading().to_string(),
                    (i + 1).to_string(),
                    truncate(&entry.text, 60),
                    entry.assignee.clone().unwrap_or_else(|| "-".to_string()),
                    if entry.has_reference_link { "yes" } else { "-" }.to_string(),
                ]);
            }
        }
    }

    table.to_string()
}

/// Formats a short, colored overview of a result.
pub fn format_summary(result: &ExtractionResult) -> String {
    let mut out = "📋 Extraction".bold().to_string();

    if let Some(title) = result.display_title() {
        out.push_str(&format!("\n  Title: {}", title.cyan()));
    }
    if let Some(status) = result.source.status_message() {
        out.push_str(&format!("\n  Source: {}", status.green()));
    }
    if let Some(sections) = result.sections() {
        out.push_str(&format!(
            "\n  Action items: {}\n  Next steps: {}",
            sections.action_items.len().to_string().cyan(),
            sections.next_steps.len().to_string().cyan()
        ));
    }
    if let Some(metadata) = &result.metadata {
        let fields = [
            ("From", &metadata.from),
            ("To", &metadata.to),
            ("Date", &metadata.date),
            ("Subject", &metadata.subject),
        ];
        for (label, value) in fields {
            if let Some(value) = value {
                out.push_str(&format!("\n  {label}: {}", value.yellow()));
            }
        }
    }

    out
}

/// Formats the configured teams, marking the remembered one.
pub fn format_teams_table(teams: &[Team], selected: &str) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["", "ID", "Name"]);

    for team in teams {
        let marker = if team.id == selected { "*" } else { "" };
        table.add_row(vec![marker, team.id.as_str(), team.name.as_str()]);
    }

    table.to_string()
}

/// Formats stored preferences.
pub fn format_preferences_table(entries: &[PreferenceEntry]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Key", "Value", "Updated"]);

    for entry in entries {
        let updated = entry.updated_at.map_or_else(
            || "-".to_string(),
            |dt| dt.format("%Y-%m-%d %H:%M").to_string(),
        );
        table.add_row(vec![&entry.key, &truncate(&entry.value, 40), &updated]);
    }

    table.to_string()
}

/// Formats an issue draft with its prefilled link.
pub fn format_draft(draft: &IssueDraft, url: &str) -> String {
    let mut out = format!(
        "{}\n  Title: {}\n  Team: {}\n  Priority: {}",
        "📝 Issue draft".bold(),
        draft.title.cyan(),
        draft.team.green(),
        draft.priority.to_string().yellow()
    );
    if let Some(assignee) = &draft.assignee {
        out.push_str(&format!("\n  Assignee: {}", assignee.blue()));
    }
    out.push_str(&format!("\n\n{}\n\n{url}", draft.description));
    out
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Entry, Metadata, Priority, Sections, Source};

    fn sample() -> ExtractionResult {
        ExtractionResult {
            content: Some("## Action Items\n\n- Draft proposal [Alice]\n\n".into()),
            title: Some("Fathom Notes".into()),
            metadata: Some(Metadata {
                from: Some("notes@fathom.video".into()),
                ..Metadata::default()
            }),
            ..ExtractionResult::from_sections(Sections {
                action_items: vec![Entry {
                    text: "Draft proposal".into(),
                    assignee: Some("Alice".into()),
                    has_reference_link: true,
                }],
                next_steps: Vec::new(),
            })
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world!", 8), "hello...");
        assert_eq!(truncate("ééééééééé", 5), "éé...");
    }

    #[test]
    fn test_output_format_from_str() {
        assert!(matches!(
            "markdown".parse::<OutputFormat>(),
            Ok(OutputFormat::Markdown)
        ));
        assert!(matches!("HTML".parse::<OutputFormat>(), Ok(OutputFormat::Html)));
        assert!(matches!(
            "json".parse::<OutputFormat>(),
            Ok(OutputFormat::Json)
        ));
        assert!(matches!(
            "table".parse::<OutputFormat>(),
            Ok(OutputFormat::Table)
        ));
        assert!("invalid".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_result_markdown() {
        assert_eq!(
            format_result_markdown(&sample()),
            "# Fathom Notes\n\n## Action Items\n\n- Draft proposal [Alice]\n"
        );
    }

    #[test]
    fn test_format_entries_table() {
        let table = format_entries_table(&sample());
        assert!(table.contains("Action Items"));
        assert!(table.contains("Draft proposal"));
        assert!(table.contains("Alice"));
    }

    #[test]
    fn test_format_summary_lists_status() {
        colored::control::set_override(false);
        let summary = format_summary(&sample());
        assert!(summary.contains("Content extracted from Fathom meeting email"));
        assert!(summary.contains("From: notes@fathom.video"));

        let empty = ExtractionResult {
            source: Source::Empty,
            ..ExtractionResult::default()
        };
        assert!(!format_summary(&empty).contains("Source:"));
    }

    #[test]
    fn test_format_teams_marks_selected() {
        let teams = vec![Team::new("ENG", "Engineering (ENG)"), Team::new("PROD", "Product (PROD)")];
        let table = format_teams_table(&teams, "PROD");
        let prod_line = table.lines().find(|l| l.contains("PROD ")).unwrap();
        assert!(prod_line.contains('*'));
    }

    #[test]
    fn test_format_draft() {
        colored::control::set_override(false);
        let draft = IssueDraft {
            title: "Q3".into(),
            description: "* Ship it".into(),
            team: "ENG".into(),
            assignee: None,
            priority: Priority::High,
        };
        let out = format_draft(&draft, "https://linear.app/team/ENG/new?title=Q3");
        assert!(out.contains("Priority: high"));
        assert!(!out.contains("Assignee"));
        assert!(out.ends_with("https://linear.app/team/ENG/new?title=Q3"));
    }
}
