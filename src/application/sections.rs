//! Section extraction.
//!
//! Walks the located email body, tracks which summary section is open and
//! collects bullet-like lines under "Action Items" and "Next Steps" into
//! deduplicated buckets.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use scraper::ElementRef;

use crate::domain::markup::{
    descendant_elements, select_within, style_contains, text_content, trimmed_text,
};
use crate::domain::{Entry, Section, Sections, Tag};

use super::locator::PROVIDER_DOMAIN;

/// Footer, upsell and assistant-sidebar copy that is never an entry.
pub const PROMOTIONAL_PHRASES: &[&str] = &[
    "view meeting",
    "ask fathom",
    "chatgpt for your meetings",
    "try ask fathom",
    "download",
    "never take notes again",
    "sign up for free",
    "join the",
    "using fathom on their meetings",
    "clear history",
    "more suggestions",
    "send feedback",
    "what can gemini do",
    "summarize this email",
    "github",
    "unsubscribe",
];

/// Leading glyphs that mark a line as a list entry.
pub const BULLET_GLYPHS: &[char] = &[
    '\u{2022}', '\u{2023}', '\u{25E6}', '\u{2043}', '\u{2219}', '\u{2739}', '\u{2713}', '-',
];

/// Headings that close the current section without opening a new one.
const RESET_HEADINGS: &[&str] = &["topics", "key takeaways", "meeting purpose"];

/// Headings shorter than this are recognized anywhere in their text.
const MAX_HEADING_LEN: usize = 40;

const MIN_ENTRY_LEN: usize = 5;
const MAX_ENTRY_LEN: usize = 200;

fn re_assignee() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[(.*?)\]").expect("assignee regex should compile"))
}

fn re_leading_call_to_action() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*(view meeting|try ask fathom)\s*→\s*")
            .expect("leading call-to-action regex should compile")
    })
}

fn re_trailing_call_to_action() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(view meeting|try ask fathom)\s*→.*$")
            .expect("trailing call-to-action regex should compile")
    })
}

fn re_trailing_arrow() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+→\s*$").expect("trailing arrow regex should compile"))
}

fn re_view_recording() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)View Recording\s*$").expect("view recording regex should compile")
    })
}

/// Case-insensitive match against [`PROMOTIONAL_PHRASES`].
#[must_use]
pub fn is_promotional(text: &str) -> bool {
    let lower = text.to_lowercase();
    PROMOTIONAL_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}

/// Whether `text` reads as a heading for `keyword`.
///
/// Long paragraphs that merely mention the keyword do not count unless
/// they start with it.
#[must_use]
pub fn is_section_heading(text: &str, keyword: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains(keyword) && (text.chars().count() < MAX_HEADING_LEN || lower.starts_with(keyword))
}

/// Content of the first `[...]` tag, if any.
#[must_use]
pub fn extract_assignee(text: &str) -> Option<String> {
    re_assignee()
        .captures(text)
        .map(|caps| caps[1].trim().to_string())
        .filter(|name| !name.is_empty())
}

fn strip_bullet(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || BULLET_GLYPHS.contains(&c))
}

/// Removes call-to-action phrases that sit before or after an arrow.
///
/// Leading bullets go first so a prefixed phrase is not mistaken for a suffix.
fn strip_call_to_action(text: &str) -> String {
    let text = re_leading_call_to_action().replace(strip_bullet(text), "");
    re_trailing_call_to_action().replace(&text, "").into_owned()
}

/// Cleans a raw entry line into its display text.
#[must_use]
pub fn clean_entry_text(raw: &str) -> String {
    let text = re_assignee().replace_all(raw, "");
    let text = strip_call_to_action(&text);
    let text = strip_call_to_action(strip_bullet(&text).trim());
    let text = re_trailing_arrow().replace(text.trim(), "");
    let text = re_view_recording().replace(text.trim(), "");
    text.trim().to_string()
}

fn starts_with_bullet(text: &str) -> bool {
    text.starts_with(BULLET_GLYPHS)
}

fn is_bullet_like(element: ElementRef<'_>, text: &str) -> bool {
    Tag::of(element) == Tag::ListItem
        || starts_with_bullet(text)
        || style_contains(element, "list-style")
}

fn has_provider_link(element: ElementRef<'_>) -> bool {
    let selector = format!("a[href*=\"{PROVIDER_DOMAIN}\"]");
    !select_within(element, &selector).is_empty()
}

/// A display:none copy of the full summary some templates include.
fn find_hidden_summary(body: ElementRef<'_>) -> Option<ElementRef<'_>> {
    select_within(body, "div[style*=\"display:none\"], div[style*=\"display: none\"]")
        .into_iter()
        .find(|div| {
            let text = text_content(*div).to_lowercase();
            text.contains("meeting purpose")
                && (text.contains("action items") || text.contains("next steps"))
        })
}

/// Section state machine over a document-order element walk.
#[derive(Default)]
struct SectionWalker {
    current: Option<Section>,
    sections: Sections,
    seen_action_items: HashSet<String>,
    seen_next_steps: HashSet<String>,
}

impl SectionWalker {
    fn visit(&mut self, element: ElementRef<'_>) {
        let text = trimmed_text(element);
        if text.is_empty() {
            return;
        }

        let stripped = strip_call_to_action(&text);
        if is_promotional(&stripped) {
            return;
        }

        if self.update_section(&text) {
            return;
        }

        let Some(section) = self.current else {
            return;
        };

        let has_link = has_provider_link(element);
        if !(is_bullet_like(element, &text) || has_link) {
            return;
        }

        if let Some(entry) = build_entry(&text, has_link) {
            self.push(section, entry);
        }
    }

    /// Returns true when `text` was a heading (and so is not an entry).
    fn update_section(&mut self, text: &str) -> bool {
        if is_section_heading(text, "action items") {
            tracing::debug!("Found Action Items section");
            self.current = Some(Section::ActionItems);
            return true;
        }
        if is_section_heading(text, "next steps") {
            tracing::debug!("Found Next Steps section");
            self.current = Some(Section::NextSteps);
            return true;
        }
        if RESET_HEADINGS
            .iter()
            .any(|keyword| is_section_heading(text, keyword))
        {
            self.current = None;
            return true;
        }
        false
    }

    fn push(&mut self, section: Section, entry: Entry) {
        let key = entry.dedup_key();
        let (bucket, seen) = match section {
            Section::ActionItems => (&mut self.sections.action_items, &mut self.seen_action_items),
            Section::NextSteps => (&mut self.sections.next_steps, &mut self.seen_next_steps),
        };
        if seen.insert(key) {
            bucket.push(entry);
        }
    }
}

fn build_entry(raw: &str, has_reference_link: bool) -> Option<Entry> {
    if raw.chars().count() < MIN_ENTRY_LEN {
        return None;
    }

    let assignee = extract_assignee(raw);
    let text = clean_entry_text(raw);
    let len = text.chars().count();
    if !(MIN_ENTRY_LEN..MAX_ENTRY_LEN).contains(&len) || is_promotional(&text) {
        return None;
    }

    Some(Entry {
        text,
        assignee,
        has_reference_link,
    })
}

/// Collects action items and next steps from the located body.
///
/// A hidden full-summary block, when present, is walked first so its
/// copy of each entry is the one that survives deduplication.
pub fn extract_sections(body: ElementRef<'_>) -> Sections {
    let mut walker = SectionWalker::default();

    if let Some(summary) = find_hidden_summary(body) {
        tracing::debug!("Found hidden summary block");
        descendant_elements(summary).for_each(|el| walker.visit(el));
    }
    descendant_elements(body).for_each(|el| walker.visit(el));

    let sections = walker.sections;
    tracing::info!(
        action_items = sections.action_items.len(),
        next_steps = sections.next_steps.len(),
        "Extracted unique entries"
    );
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Document;

    fn sections_of(html: &str) -> Sections {
        let doc = Document::parse(html);
        extract_sections(doc.root())
    }

    fn texts(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.text.as_str()).collect()
    }

    #[test]
    fn test_action_items_with_duplicate() {
        let sections = sections_of(
            r"<h3>Action Items</h3>
              <ul>
                <li>Draft proposal [Alice]</li>
                <li>Draft proposal [Alice]</li>
                <li>Schedule demo</li>
              </ul>",
        );
        assert_eq!(
            sections.action_items,
            vec![
                Entry {
                    text: "Draft proposal".into(),
                    assignee: Some("Alice".into()),
                    has_reference_link: false,
                },
                Entry {
                    text: "Schedule demo".into(),
                    assignee: None,
                    has_reference_link: false,
                },
            ]
        );
        assert!(sections.next_steps.is_empty());
    }

    #[test]
    fn test_key_takeaways_only() {
        let sections = sections_of(
            r"<h3>Key Takeaways</h3>
              <ul><li>Revenue grew this quarter</li><li>Hiring is on track</li></ul>",
        );
        assert!(sections.is_empty());
    }

    #[test]
    fn test_call_to_action_prefix_is_stripped() {
        let sections = sections_of(
            r"<h3>Next Steps</h3><ul><li>View Meeting → Follow up with client</li></ul>",
        );
        assert_eq!(texts(&sections.next_steps), vec!["Follow up with client"]);
    }

    #[test]
    fn test_call_to_action_after_bullet_glyph() {
        let sections = sections_of(
            r"<h3>Next Steps</h3>
              <p>• View Meeting → Follow up with client</p>
              <ul><li>- Try Ask Fathom → Share the deck</li></ul>",
        );
        assert_eq!(
            texts(&sections.next_steps),
            vec!["Follow up with client", "Share the deck"]
        );
        assert_eq!(
            clean_entry_text("- View Meeting → Follow up with client"),
            "Follow up with client"
        );
    }

    #[test]
    fn test_trailing_suffixes_are_stripped() {
        let sections = sections_of(
            r"<h3>Action Items</h3>
              <p>• Send recap email →</p>
              <ul><li>Update the roadmap View Recording</li></ul>",
        );
        assert_eq!(
            texts(&sections.action_items),
            vec!["Send recap email", "Update the roadmap"]
        );
    }

    #[test]
    fn test_promotional_entries_are_excluded() {
        let sections = sections_of(
            r"<h3>Action Items</h3><ul>
                <li>Click here to unsubscribe from these emails</li>
                <li>Sign up for free today</li>
                <li>Open the link to view meeting notes</li>
                <li>Prepare budget review</li>
              </ul>",
        );
        assert_eq!(texts(&sections.action_items), vec!["Prepare budget review"]);
    }

    #[test]
    fn test_heading_scoping() {
        let sections = sections_of(
            r"<ul><li>Before any heading here</li></ul>
              <h3>Action Items</h3><ul><li>Inside the first section</li></ul>
              <h3>Meeting Purpose</h3><ul><li>After the reset heading</li></ul>
              <h3>Next Steps</h3><ul><li>Inside the second section</li></ul>
              <h3>Topics</h3><ul><li>Discussed pricing</li></ul>",
        );
        assert_eq!(texts(&sections.action_items), vec!["Inside the first section"]);
        assert_eq!(texts(&sections.next_steps), vec!["Inside the second section"]);
    }

    #[test]
    fn test_long_paragraph_is_not_a_heading() {
        let sections = sections_of(
            r"<h3>Next Steps</h3>
              <p>We agreed to revisit the action items from last week at the offsite.</p>
              <ul><li>Book the offsite venue</li></ul>",
        );
        assert_eq!(texts(&sections.next_steps), vec!["Book the offsite venue"]);
        assert!(sections.action_items.is_empty());
    }

    #[test]
    fn test_bullet_glyph_and_provider_link_candidates() {
        let sections = sections_of(
            r#"<h3>Action Items</h3>
              <p>- Email the contract [Bob]</p>
              <p>Not a bullet at all</p>
              <div><span>Review the call notes</span> <a href="https://fathom.video/share/1#t=10">12:01</a></div>"#,
        );
        let items = &sections.action_items;
        assert_eq!(
            texts(items),
            vec!["Email the contract", "Review the call notes 12:01"]
        );
        assert_eq!(items[0].assignee.as_deref(), Some("Bob"));
        assert!(!items[0].has_reference_link);
        assert!(items[1].has_reference_link);
    }

    #[test]
    fn test_list_style_candidate() {
        let sections = sections_of(
            r#"<h3>Next Steps</h3><div style="list-style-type:disc">Ship the beta build</div>"#,
        );
        assert_eq!(texts(&sections.next_steps), vec!["Ship the beta build"]);
    }

    #[test]
    fn test_length_bounds() {
        let long = "x".repeat(MAX_ENTRY_LEN);
        let html = format!(
            "<h3>Action Items</h3><ul><li>Tiny</li><li>Ok [Al]</li><li>{long}</li><li>{}</li></ul>",
            "y".repeat(MAX_ENTRY_LEN - 1)
        );
        let sections = sections_of(&html);
        assert_eq!(sections.action_items.len(), 1);
        assert_eq!(
            sections.action_items[0].text.chars().count(),
            MAX_ENTRY_LEN - 1
        );
    }

    #[test]
    fn test_hidden_summary_processed_first() {
        let sections = sections_of(
            r#"<div id="body">
                <h3>Action Items</h3><ul><li>Visible item only</li><li>Shared item</li></ul>
                <div style="display:none">
                  <p>Meeting Purpose</p><p>Plan the quarter</p>
                  <p>Action Items</p><ul><li>Shared item</li><li>Hidden extra item</li></ul>
                </div>
              </div>"#,
        );
        assert_eq!(
            texts(&sections.action_items),
            vec!["Shared item", "Hidden extra item", "Visible item only"]
        );
    }

    #[test]
    fn test_dedup_is_case_insensitive_per_bucket() {
        let sections = sections_of(
            r"<h3>Action Items</h3><ul><li>Call the vendor</li><li>CALL THE VENDOR</li></ul>
              <h3>Next Steps</h3><ul><li>Call the vendor</li></ul>",
        );
        assert_eq!(texts(&sections.action_items), vec!["Call the vendor"]);
        assert_eq!(texts(&sections.next_steps), vec!["Call the vendor"]);
    }

    #[test]
    fn test_no_headings_yields_empty() {
        assert!(sections_of("<ul><li>Random list item</li></ul>").is_empty());
    }

    #[test]
    fn test_is_section_heading() {
        assert!(is_section_heading("Action Items", "action items"));
        assert!(is_section_heading(
            "Action items for everyone who attended the long meeting today",
            "action items"
        ));
        assert!(!is_section_heading(
            "Please review the action items that we discussed at length yesterday",
            "action items"
        ));
    }

    #[test]
    fn test_extract_assignee() {
        assert_eq!(extract_assignee("Do it [Alice] [Bob]").as_deref(), Some("Alice"));
        assert_eq!(extract_assignee("Do it []"), None);
        assert_eq!(extract_assignee("Do it"), None);
    }

    #[test]
    fn test_denylist_and_glyphs_are_exposed() {
        assert!(PROMOTIONAL_PHRASES.contains(&"unsubscribe"));
        assert!(PROMOTIONAL_PHRASES.contains(&"sign up for free"));
        assert!(BULLET_GLYPHS.contains(&'\u{2022}'));
        assert!(is_promotional("Never take notes again"));
    }
}
