//! Meeting title resolution.
//!
//! Provider emails render the meeting name in a large bold table cell.
//! The style signatures below are checked in order; the first hit wins.

use scraper::ElementRef;

use crate::domain::markup::{select_within, trimmed_text};

/// Bold 28px title cell.
const TITLE_CELL_SELECTOR: &str = "td.m_2374998061236657253fs-24, \
     td[style*=\"font:700 28px/35px\"], \
     td[style*=\"font-weight:700\"][style*=\"font-size:28px\"]";

/// Tight letter-spacing used by the newer template.
const LETTER_SPACING_SELECTOR: &str = "td[style*=\"letter-spacing:-.6px\"]";

/// Any heavy-weight cell.
const BOLD_CELL_SELECTOR: &str = "td[style*=\"font:700\"], td[style*=\"font-weight:700\"]";

/// Label cell preceding the title in internal meeting summaries.
const MEETING_TYPE_LABEL: &str = "Internal Meeting";

type Rule = fn(ElementRef<'_>) -> Option<String>;

const RULES: &[(&str, Rule)] = &[
    ("title cell", title_cell),
    ("letter spacing", letter_spacing_cell),
    ("after meeting type", after_meeting_type),
    ("bold cell", bold_cell),
];

/// Finds a human-readable meeting title inside the located subtree.
pub fn resolve_title(body: ElementRef<'_>) -> Option<String> {
    let found = RULES
        .iter()
        .find_map(|(name, rule)| rule(body).map(|title| (*name, title)));

    match found {
        Some((rule, title)) => {
            tracing::debug!(rule, title = %title, "Found meeting title");
            Some(title)
        }
        None => {
            tracing::debug!("No meeting title found");
            None
        }
    }
}

fn is_plausible_title(text: &str) -> bool {
    let len = text.chars().count();
    len > 5 && len < 100
}

fn first_non_empty(body: ElementRef<'_>, selector: &str) -> Option<String> {
    select_within(body, selector)
        .into_iter()
        .map(trimmed_text)
        .find(|text| !text.is_empty())
}

fn title_cell(body: ElementRef<'_>) -> Option<String> {
    first_non_empty(body, TITLE_CELL_SELECTOR)
}

fn letter_spacing_cell(body: ElementRef<'_>) -> Option<String> {
    first_non_empty(body, LETTER_SPACING_SELECTOR)
}

fn after_meeting_type(body: ElementRef<'_>) -> Option<String> {
    let cells = select_within(body, "td");
    cells.windows(2).find_map(|pair| {
        if trimmed_text(pair[0]) != MEETING_TYPE_LABEL {
            return None;
        }
        let candidate = trimmed_text(pair[1]);
        is_plausible_title(&candidate).then_some(candidate)
    })
}

fn bold_cell(body: ElementRef<'_>) -> Option<String> {
    select_within(body, BOLD_CELL_SELECTOR)
        .into_iter()
        .map(trimmed_text)
        .find(|text| is_plausible_title(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::markup::compile;
    use crate::domain::Document;

    fn title_of(html: &str) -> Option<String> {
        let doc = Document::parse(html);
        resolve_title(doc.root())
    }

    #[test]
    fn test_selectors_compile() {
        for selector in [TITLE_CELL_SELECTOR, LETTER_SPACING_SELECTOR, BOLD_CELL_SELECTOR] {
            assert!(compile(selector).is_some(), "{selector}");
        }
    }

    #[test]
    fn test_style_signature_beats_internal_meeting() {
        let html = r#"<table><tr>
            <td>Internal Meeting</td><td>Weekly Catch-up</td>
            <td style="font-weight:700;font-size:28px">Q3 Planning Sync</td>
        </tr></table>"#;
        assert_eq!(title_of(html).as_deref(), Some("Q3 Planning Sync"));
    }

    #[test]
    fn test_letter_spacing_signature() {
        let html = r#"<table><tr>
            <td style="letter-spacing:-.6px"> Roadmap Review </td>
        </tr></table>"#;
        assert_eq!(title_of(html).as_deref(), Some("Roadmap Review"));
    }

    #[test]
    fn test_after_internal_meeting() {
        let html = r#"<table><tr>
            <td>Internal Meeting</td><td>Weekly Catch-up</td>
        </tr></table>"#;
        assert_eq!(title_of(html).as_deref(), Some("Weekly Catch-up"));
    }

    #[test]
    fn test_after_internal_meeting_rejects_short() {
        let html = r#"<table><tr>
            <td>Internal Meeting</td><td>Sync</td>
        </tr></table>"#;
        assert_eq!(title_of(html), None);
    }

    #[test]
    fn test_bold_cell_length_bounds() {
        let html = r#"<table><tr>
            <td style="font:700 14px">Hi</td>
            <td style="font:700 14px">Customer Onboarding</td>
        </tr></table>"#;
        assert_eq!(title_of(html).as_deref(), Some("Customer Onboarding"));
    }

    #[test]
    fn test_no_title() {
        assert_eq!(title_of("<p>Nothing bold here</p>"), None);
    }
}
