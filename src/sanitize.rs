//! Text sanitization applied to everything the extractor lets through.
//!
//! Markup and hidden elements are removed at the DOM level by [`visible_text`],
//! so what reaches a [`Sanitizer`] is already entity-decoded plain text. A `<`
//! in it is a literal character from the article (`Vec&lt;String&gt;` in the
//! source), never a tag, and must not be parsed again.

use scraper::ElementRef;

/// Elements whose text content is never shown to a reader.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "iframe"];

/// Turns untrusted extracted text into safe plain text.
pub trait Sanitizer: Send + Sync {
    fn sanitize(&self, raw: &str) -> String;
}

/// Default sanitizer: drops control characters and collapses runs of
/// whitespace into single spaces. Everything else is kept verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextSanitizer;

impl Sanitizer for TextSanitizer {
    fn sanitize(&self, raw: &str) -> String {
        raw.split_whitespace()
            .map(|word| word.chars().filter(|c| !c.is_control()).collect::<String>())
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Concatenate the text nodes below `element`, skipping anything nested in a
/// hidden element such as `<script>`.
pub(crate) fn visible_text(element: ElementRef<'_>) -> String {
    let mut text = String::new();

    for node in element.descendants() {
        let Some(chunk) = node.value().as_text() else {
            continue;
        };
        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| is_hidden_element(el.name()))
        });
        if !hidden {
            text.push_str(chunk);
        }
    }

    text
}

pub(crate) fn is_hidden_element(name: &str) -> bool {
    HIDDEN_ELEMENTS.contains(&name)
}
