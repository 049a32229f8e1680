//! Extraction entry point.
//!
//! Orchestrates locating the email body, resolving metadata and title,
//! collecting sections and rendering them. This is the only place where
//! unexpected failures are caught and turned into an error result.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use crate::domain::{AppError, Document, ExtractionResult, Metadata, Result, Source};

use super::locator::locate;
use super::metadata::{extract_metadata, find_subject};
use super::renderer::{escape_html, render_html, render_markdown};
use super::sections::extract_sections;

/// Content offered when an email holds no recognizable sections.
pub const SELECT_TEXT_HINT: &str = "Select text in the email and click Refresh Content";

/// Extracts meeting notes from `document`, or wraps `selection` if given.
///
/// Returns `None` when no email body could be located. Any panic raised
/// while walking the tree is converted into an error result.
pub fn extract(document: &Document, selection: Option<&str>) -> Option<ExtractionResult> {
    match panic::catch_unwind(AssertUnwindSafe(|| run_extraction(document, selection))) {
        Ok(result) => result,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            tracing::error!("Error in content extraction: {message}");
            Some(ExtractionResult::failed(message))
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "Unexpected error during extraction".to_string())
}

fn run_extraction(document: &Document, selection: Option<&str>) -> Option<ExtractionResult> {
    tracing::debug!("Starting content extraction");

    if let Some(selected) = selection.map(str::trim).filter(|s| !s.is_empty()) {
        tracing::debug!("Found user-selected text");
        return Some(from_selection(selected, document));
    }

    let Some(body) = locate(document) else {
        tracing::info!("No email body found");
        return None;
    };

    let subject = find_subject(document);
    let metadata = extract_metadata(document, Some(body), subject.as_deref());
    tracing::debug!(?metadata, "Extracted metadata");

    let sections = extract_sections(body);
    let fathom_title = metadata.fathom_title.clone();

    if sections.is_empty() {
        tracing::info!("No action items or next steps found");
        return Some(ExtractionResult {
            content: Some(SELECT_TEXT_HINT.to_string()),
            html: Some(format!("<p>{SELECT_TEXT_HINT}</p>")),
            source: Source::Empty,
            title: Some(
                fathom_title
                    .or(subject)
                    .unwrap_or_else(|| "Email content".to_string()),
            ),
            metadata: Some(metadata),
            ..ExtractionResult::default()
        });
    }

    let html = render_html(&sections);
    let content = render_markdown(&sections);
    let mut result = ExtractionResult::from_sections(sections);
    result.html = Some(html);
    result.content = Some(content);
    result.title = Some(
        fathom_title
            .or(subject)
            .unwrap_or_else(|| "Fathom Notes".to_string()),
    );
    result.metadata = Some(metadata);
    Some(result)
}

/// Envelope metadata of a page, whether or not a summary body is found.
#[must_use]
pub fn page_metadata(document: &Document) -> Metadata {
    extract_metadata(document, locate(document), None)
}

/// Wraps a text selection, bypassing extraction.
fn from_selection(selected: &str, document: &Document) -> ExtractionResult {
    ExtractionResult {
        content: Some(selected.to_string()),
        html: Some(selection_html(selected)),
        metadata: Some(extract_metadata(document, None, None)),
        source: Source::Selection,
        title: Some("Selected content".to_string()),
        ..ExtractionResult::default()
    }
}

fn selection_html(text: &str) -> String {
    format!("<p>{}</p>", escape_html(text).replace('\n', "<br>"))
}

/// Normalizes a raw extraction outcome for display.
///
/// Structured results always get freshly rendered html and markdown so
/// every surface shows the same thing.
///
/// # Errors
/// Returns the user-facing status when nothing usable was extracted.
pub fn process_result(result: Option<ExtractionResult>) -> Result<ExtractionResult> {
    let Some(mut result) = result else {
        return Err(AppError::Extraction {
            message: "No content could be extracted".to_string(),
        });
    };

    if result.error {
        return Err(AppError::Extraction {
            message: result
                .message
                .unwrap_or_else(|| "Error extracting content".to_string()),
        });
    }

    if let Some(sections) = result.sections() {
        result.html = Some(render_html(&sections));
        result.content = Some(render_markdown(&sections));
    } else if result.html.is_none() {
        if let Some(content) = &result.content {
            result.html = Some(selection_html(content));
        }
    }

    Ok(result)
}
