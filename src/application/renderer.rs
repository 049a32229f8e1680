//! Structured rendering of extracted sections.
//!
//! Produces the HTML snippet shown in the editor and the Linear markdown
//! document. Both are pure functions of their input.

use crate::domain::{Entry, Sections};

const HEADING_STYLE: &str = "font-weight: bold; margin-top: 15px; font-size: 16px; color: #333;";
const LIST_STYLE: &str = "margin-top: 5px; margin-bottom: 15px; padding-left: 20px;";
const ITEM_STYLE: &str = "margin-bottom: 8px;";
const ASSIGNEE_STYLE: &str = "color: #666; font-size: 0.9em; font-style: italic;";

/// Shown in the editor when neither bucket has entries.
pub const EMPTY_PLACEHOLDER_HTML: &str = "<p>No action items or next steps found in this email. \
     Select text manually or try another email.</p>";

/// Escapes text for inclusion in HTML element content.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_html_item(entry: &Entry) -> String {
    let assignee = entry.assignee.as_deref().map_or_else(String::new, |name| {
        format!(
            " <span style=\"{ASSIGNEE_STYLE}\">[{}]</span>",
            escape_html(name)
        )
    });
    format!(
        "<li style='{ITEM_STYLE}'>{}{assignee}</li>",
        escape_html(&entry.text)
    )
}

/// Renders the editable HTML snippet.
#[must_use]
pub fn render_html(sections: &Sections) -> String {
    let mut html = String::new();

    for (section, entries) in sections.buckets() {
        if entries.is_empty() {
            continue;
        }
        html.push_str(&format!(
            "<h3 style='{HEADING_STYLE}'>{}</h3><ul style='{LIST_STYLE}'>",
            section.heading()
        ));
        for entry in entries {
            html.push_str(&render_html_item(entry));
        }
        html.push_str("</ul>");
    }

    if html.is_empty() {
        return EMPTY_PLACEHOLDER_HTML.to_string();
    }
    html
}

/// Renders the Linear markdown document; empty when there is nothing to send.
#[must_use]
pub fn render_markdown(sections: &Sections) -> String {
    let mut markdown = String::new();

    for (section, entries) in sections.buckets() {
        if entries.is_empty() {
            continue;
        }
        markdown.push_str(&format!("## {}\n\n", section.heading()));
        for entry in entries {
            markdown.push_str("- ");
            markdown.push_str(&entry.text);
            if let Some(name) = &entry.assignee {
                markdown.push_str(&format!(" [{name}]"));
            }
            markdown.push('\n');
        }
        markdown.push('\n');
    }

    markdown
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(text: &str, assignee: Option<&str>) -> Entry {
        Entry {
            text: text.to_string(),
            assignee: assignee.map(str::to_string),
            has_reference_link: false,
        }
    }

    fn sample() -> Sections {
        Sections {
            action_items: vec![entry("Draft proposal", Some("Alice")), entry("Schedule demo", None)],
            next_steps: vec![entry("Follow up with client", None)],
        }
    }

    #[test]
    fn test_render_markdown() {
        assert_eq!(
            render_markdown(&sample()),
            "## Action Items\n\n- Draft proposal [Alice]\n- Schedule demo\n\n\
             ## Next Steps\n\n- Follow up with client\n\n"
        );
    }

    #[test]
    fn test_render_html_structure() {
        let html = render_html(&sample());
        assert!(html.starts_with("<h3 style='"));
        assert!(html.contains(">Action Items</h3>"));
        assert!(html.contains(">Next Steps</h3>"));
        assert!(html.contains(&format!(
            "Draft proposal <span style=\"{ASSIGNEE_STYLE}\">[Alice]</span></li>"
        )));
        assert_eq!(html.matches("<li ").count(), 3);
        assert!(html.find("Action Items").unwrap() < html.find("Next Steps").unwrap());
    }

    #[test]
    fn test_single_bucket_omits_other_heading() {
        let sections = Sections {
            action_items: Vec::new(),
            next_steps: vec![entry("Ship it already", None)],
        };
        assert!(!render_html(&sections).contains("Action Items"));
        assert_eq!(render_markdown(&sections), "## Next Steps\n\n- Ship it already\n\n");
    }

    #[test]
    fn test_empty_sections() {
        let sections = Sections::default();
        assert_eq!(render_html(&sections), EMPTY_PLACEHOLDER_HTML);
        assert_eq!(render_markdown(&sections), "");
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let sections = sample();
        assert_eq!(render_html(&sections), render_html(&sections));
        assert_eq!(render_markdown(&sections), render_markdown(&sections));
    }

    #[test]
    fn test_html_escaping() {
        let sections = Sections {
            action_items: vec![entry("Compare <A> & <B>", Some("O'Neil"))],
            next_steps: Vec::new(),
        };
        let html = render_html(&sections);
        assert!(html.contains("Compare &lt;A&gt; &amp; &lt;B&gt;"));
        assert!(html.contains("[O&#39;Neil]"));
    }
}
