//! Application layer - use cases and orchestration.
//!
//! This layer contains the extraction pipeline, the markup converter and
//! the issue composer.

pub mod converter;
pub mod extractor;
pub mod formatter;
pub mod issue;
pub mod locator;
pub mod metadata;
pub mod renderer;
pub mod sections;
pub mod title;

pub use converter::html_to_markdown;
pub use extractor::{extract, page_metadata, process_result};
pub use formatter::{
    format_draft, format_entries_table, format_preferences_table, format_result_json,
    format_result_markdown, format_summary, format_teams_table, OutputFormat,
};
pub use issue::{compose_issue, issue_url, IssueRequest};
