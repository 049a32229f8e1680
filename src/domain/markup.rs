//! Parsed markup tree and tag classification.
//!
//! A [`Document`] owns an immutable `scraper::Html` value; every algorithm
//! in the application layer borrows `ElementRef` handles into it and never
//! mutates it.

use scraper::{ElementRef, Html, Selector};

/// Tag classification used by the markup converter and the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// `h1`..`h3`; deeper headings are treated as containers.
    Heading(u8),
    Paragraph,
    Strong,
    Emphasis,
    Underline,
    Strikethrough,
    Code,
    CodeBlock,
    List { ordered: bool },
    ListItem,
    Link,
    LineBreak,
    /// `div`, `td`, `span` and every other tag.
    Container,
}

impl Tag {
    /// Classifies an element by its (case-insensitive) name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "p" => Self::Paragraph,
            "strong" | "b" => Self::Strong,
            "em" | "i" => Self::Emphasis,
            "u" => Self::Underline,
            "s" | "strike" | "del" => Self::Strikethrough,
            "code" => Self::Code,
            "pre" => Self::CodeBlock,
            "ul" => Self::List { ordered: false },
            "ol" => Self::List { ordered: true },
            "li" => Self::ListItem,
            "a" => Self::Link,
            "br" => Self::LineBreak,
            _ => Self::Container,
        }
    }

    /// Classifies an element handle.
    #[must_use]
    pub fn of(element: ElementRef<'_>) -> Self {
        Self::from_name(element.value().name())
    }
}

/// An immutable parsed markup document.
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses a full document (an email page or a saved message).
    #[must_use]
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// Parses a fragment, e.g. content edited in the display snippet.
    #[must_use]
    pub fn parse_fragment(markup: &str) -> Self {
        Self {
            html: Html::parse_fragment(markup),
        }
    }

    /// The root element (`<html>`).
    #[must_use]
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// First element matching `selector`, in document order.
    #[must_use]
    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = compile(selector)?;
        self.html.select(&selector).next()
    }

    /// Every element matching `selector`, in document order.
    #[must_use]
    pub fn select_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        compile(selector).map_or_else(Vec::new, |selector| {
            self.html.select(&selector).collect()
        })
    }

    /// The mail client has rendered its main pane.
    #[must_use]
    pub fn has_main_pane(&self) -> bool {
        self.select_first("[role=\"main\"]").is_some()
    }
}

/// Compiles a CSS selector, logging and discarding invalid ones.
pub fn compile(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(compiled) => Some(compiled),
        Err(e) => {
            tracing::warn!(selector, "Invalid selector: {e:?}");
            None
        }
    }
}

/// Elements below `scope` matching `selector`, excluding `scope` itself.
pub fn select_within<'a>(scope: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
    let Some(selector) = compile(selector) else {
        return Vec::new();
    };
    scope
        .select(&selector)
        .filter(|el| el.id() != scope.id())
        .collect()
}

/// Every descendant element of `scope` in document (pre-)order.
pub fn descendant_elements<'a>(scope: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    scope.descendants().skip(1).filter_map(ElementRef::wrap)
}

/// Concatenated text of all descendant text nodes.
#[must_use]
pub fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text content with surrounding whitespace removed.
#[must_use]
pub fn trimmed_text(element: ElementRef<'_>) -> String {
    text_content(element).trim().to_string()
}

#[must_use]
pub fn has_class(element: ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Inline `style` attribute contains `needle`.
#[must_use]
pub fn style_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .value()
        .attr("style")
        .is_some_and(|style| style.contains(needle))
}
