//! Envelope metadata from the mail client's header regions.

use scraper::ElementRef;

use crate::domain::markup::trimmed_text;
use crate::domain::{Document, Metadata};

use super::title::resolve_title;

const SUBJECT_SELECTOR: &str = ".hP";
const SENDER_SELECTOR: &str = ".gD";
const RECIPIENT_SELECTOR: &str = ".g2";
const DATE_SELECTOR: &str = ".g3";

/// Pulls subject, sender, recipients, date and meeting title.
///
/// Every field is best effort; a missing region just leaves it unset.
pub fn extract_metadata(
    document: &Document,
    body: Option<ElementRef<'_>>,
    subject: Option<&str>,
) -> Metadata {
    let subject = subject
        .map(str::to_string)
        .or_else(|| find_subject(document));

    let fathom_title = body.and_then(resolve_title);

    let from = document
        .select_first(SENDER_SELECTOR)
        .map(address_or_text)
        .filter(|s| !s.is_empty());

    let recipients: Vec<String> = document
        .select_all(RECIPIENT_SELECTOR)
        .into_iter()
        .map(address_or_text)
        .filter(|s| !s.is_empty())
        .collect();
    let to = (!recipients.is_empty()).then(|| recipients.join(", "));

    let date = document
        .select_first(DATE_SELECTOR)
        .map(trimmed_text)
        .filter(|s| !s.is_empty());

    Metadata {
        subject,
        from,
        to,
        date,
        fathom_title,
    }
}

/// Trimmed text of the subject line, if the page has one.
pub fn find_subject(document: &Document) -> Option<String> {
    document
        .select_first(SUBJECT_SELECTOR)
        .map(trimmed_text)
        .filter(|s| !s.is_empty())
}

fn address_or_text(element: ElementRef<'_>) -> String {
    element
        .value()
        .attr("email")
        .map_or_else(|| trimmed_text(element), |email| email.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <h2 class="hP"> Recap: Q3 Planning </h2>
        <span class="gD" email="host@example.com">Host Person</span>
        <span class="g2" email="a@example.com">A</span>
        <span class="g2">  Bee  </span>
        <span class="g2"> </span>
        <span class="g3">Oct 3, 2025, 10:02 AM</span>
        <div id="body"><table><tr>
          <td style="letter-spacing:-.6px">Q3 Planning Sync</td>
        </tr></table></div>
    "#;

    #[test]
    fn test_full_metadata() {
        let doc = Document::parse(PAGE);
        let body = doc.select_first("#body");
        let metadata = extract_metadata(&doc, body, None);

        assert_eq!(metadata.subject.as_deref(), Some("Recap: Q3 Planning"));
        assert_eq!(metadata.from.as_deref(), Some("host@example.com"));
        assert_eq!(metadata.to.as_deref(), Some("a@example.com, Bee"));
        assert_eq!(metadata.date.as_deref(), Some("Oct 3, 2025, 10:02 AM"));
        assert_eq!(metadata.fathom_title.as_deref(), Some("Q3 Planning Sync"));
    }

    #[test]
    fn test_known_subject_wins() {
        let doc = Document::parse(PAGE);
        let metadata = extract_metadata(&doc, None, Some("Given"));
        assert_eq!(metadata.subject.as_deref(), Some("Given"));
        assert!(metadata.fathom_title.is_none());
    }

    #[test]
    fn test_partial_metadata() {
        let doc = Document::parse("<p>no headers</p>");
        let metadata = extract_metadata(&doc, None, None);
        assert!(metadata.is_empty());
    }
}
