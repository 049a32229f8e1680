//! Markup converter: edited HTML back to Linear markdown.
//!
//! Only the small tag vocabulary the editor can produce is translated;
//! every other tag passes its children's content through unchanged, so
//! the conversion never fails.

use std::sync::OnceLock;

use regex::Regex;
use scraper::{node::Node, ElementRef};

use crate::domain::markup::{has_class, select_within, trimmed_text};
use crate::domain::{Document, Tag};

/// Marker classes of entry cards rendered by older editor versions.
const ENTRY_CARD_CLASSES: &[&str] = &["action-item", "next-step"];

fn re_excess_newlines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("newline regex should compile"))
}

/// Converts an HTML fragment to Linear markdown.
#[must_use]
pub fn html_to_markdown(markup: &str) -> String {
    if markup.trim().is_empty() {
        return String::new();
    }
    let document = Document::parse_fragment(markup);
    element_to_markdown(document.root())
}

/// Converts an already-parsed subtree to Linear markdown.
#[must_use]
pub fn element_to_markdown(root: ElementRef<'_>) -> String {
    let markdown = convert_element(root);
    re_excess_newlines()
        .replace_all(&markdown, "\n\n")
        .trim()
        .to_string()
}

/// Concatenated markdown of an element's child nodes.
fn convert_children(element: ElementRef<'_>) -> String {
    element
        .children()
        .map(|child| {
            if let Some(child) = ElementRef::wrap(child) {
                return convert_element(child);
            }
            match child.value() {
                Node::Text(text) => text.to_string(),
                _ => String::new(),
            }
        })
        .collect()
}

fn convert_element(element: ElementRef<'_>) -> String {
    let content = convert_children(element);

    match Tag::of(element) {
        Tag::Heading(level) => format!(
            "{} {}\n\n",
            "#".repeat(usize::from(level)),
            content.trim()
        ),
        Tag::Paragraph => format!("{}\n\n", content.trim()),
        Tag::Strong => format!("**{}**", content.trim()),
        Tag::Emphasis => format!("_{}_", content.trim()),
        // Linear markdown has no underline.
        Tag::Underline => content.trim().to_string(),
        Tag::Strikethrough => format!("~~{}~~", content.trim()),
        Tag::Code => format!("`{}`", content.trim()),
        Tag::CodeBlock => format!("```\n{}\n```\n\n", content.trim()),
        Tag::Link => match element.value().attr("href").filter(|h| !h.is_empty()) {
            Some(href) => format!("[{}]({href})", content.trim()),
            None => content,
        },
        Tag::List { .. } => content,
        Tag::ListItem => {
            let marker = if in_ordered_list(element) { "1." } else { "*" };
            format!("{marker} {}\n", content.trim())
        }
        Tag::LineBreak => "\n".to_string(),
        Tag::Container if is_entry_card(element) => convert_entry_card(element),
        Tag::Container => content,
    }
}

fn in_ordered_list(item: ElementRef<'_>) -> bool {
    item.parent()
        .and_then(ElementRef::wrap)
        .is_some_and(|parent| Tag::of(parent) == Tag::List { ordered: true })
}

fn is_entry_card(element: ElementRef<'_>) -> bool {
    element.value().name() == "div"
        && ENTRY_CARD_CLASSES
            .iter()
            .any(|class| has_class(element, class))
}

/// `* text (assignee)` assembled from the card's labeled parts.
fn convert_entry_card(card: ElementRef<'_>) -> String {
    let mut line = String::from("* ");
    if let Some(content) = select_within(card, ".item-content").first() {
        line.push_str(&trimmed_text(*content));
    }
    if let Some(assignee) = select_within(card, ".assignee").first() {
        line.push_str(&format!(" ({})", trimmed_text(*assignee)));
    }
    line.push('\n');
    line
}
