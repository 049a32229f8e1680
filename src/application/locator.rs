//! Document locator.
//!
//! Finds the subtree of a mail page that most plausibly holds the meeting
//! summary. Rules are an ordered table evaluated first-match-wins.

use scraper::ElementRef;

use crate::domain::markup::{text_content, trimmed_text};
use crate::domain::Document;

/// Domain of the recording links embedded in provider emails.
pub const PROVIDER_DOMAIN: &str = "fathom.video";

/// Ancestor levels walked up from a provider link.
const MAX_ANCESTOR_LEVELS: usize = 5;

/// Generic message-body selectors, most specific first.
pub const BODY_SELECTORS: &[&str] = &[
    "[data-message-id] .a3s",
    "[role=\"main\"] .adn.ads .a3s",
    "[data-message-id] div[dir=\"ltr\"]",
    "[role=\"main\"] .adn [data-message-id] .adP",
    "[role=\"main\"] .a3s",
    "[role=\"main\"]",
];

type Rule = for<'a> fn(&'a Document) -> Option<ElementRef<'a>>;

/// Locator rules in priority order.
const RULES: &[(&str, Rule)] = &[
    ("summary block", find_summary_block),
    ("provider link ancestor", find_provider_link_ancestor),
    ("emailBody id", find_email_body_id),
    ("generic body selector", find_generic_body),
];

/// Returns the subtree most likely to contain meeting notes.
pub fn locate(document: &Document) -> Option<ElementRef<'_>> {
    for (name, rule) in RULES {
        if let Some(found) = rule(document) {
            tracing::debug!(rule = name, "Located email body");
            return Some(found);
        }
    }

    tracing::debug!("No email body found with any rule");
    None
}

fn mentions_notes(text: &str) -> bool {
    text.contains("action items") || text.contains("next steps")
}

fn find_summary_block(document: &Document) -> Option<ElementRef<'_>> {
    document.select_all("div").into_iter().find(|div| {
        let text = text_content(*div).to_lowercase();
        mentions_notes(&text)
            && (text.contains("meeting purpose") || text.contains("key takeaways"))
    })
}

fn find_provider_link_ancestor(document: &Document) -> Option<ElementRef<'_>> {
    let selector = format!("a[href*=\"{PROVIDER_DOMAIN}\"]");
    let links = document.select_all(&selector);
    tracing::debug!(count = links.len(), "Provider links found");

    links.into_iter().find_map(|link| {
        link.ancestors()
            .filter_map(ElementRef::wrap)
            .take(MAX_ANCESTOR_LEVELS)
            .find(|ancestor| {
                let text = text_content(*ancestor).to_lowercase();
                text.contains("action items") && text.contains("next steps")
            })
    })
}

fn find_email_body_id(document: &Document) -> Option<ElementRef<'_>> {
    document.select_first("[id*=\"emailBody\"]")
}

fn find_generic_body(document: &Document) -> Option<ElementRef<'_>> {
    for selector in BODY_SELECTORS {
        let elements = document.select_all(selector);
        tracing::trace!(selector, count = elements.len(), "Checking selector");

        for element in elements {
            let content = trimmed_text(element);
            if content.is_empty() {
                continue;
            }
            if mentions_notes(&content.to_lowercase()) {
                tracing::debug!(selector, "Found meeting notes in generic body");
            } else {
                tracing::debug!(selector, len = content.len(), "Found generic email body");
            }
            return Some(element);
        }
    }
    None
}
