//! Section extraction from article HTML.
//!
//! The document is linearized once into a flat list of heading and paragraph
//! blocks, each tagged with the sibling group it belongs to. A single forward
//! scan then attaches every paragraph to the most recent heading in the same
//! sibling group, which mirrors "the paragraphs that follow this heading up to
//! the next heading" without walking sibling pointers.

use std::collections::HashMap;

use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::sanitize::{is_hidden_element, visible_text, Sanitizer};
use crate::summary::Section;

/// Title used when the document has no usable `<title>`.
pub const DEFAULT_TITLE: &str = "Article Summary";

/// Heading of the synthetic section built when no heading structure exists.
pub const FALLBACK_HEADING: &str = "Main Content";

lazy_static! {
    static ref TITLE_SELECTOR: Selector = Selector::parse("title").unwrap();
}

/// Title and sections pulled out of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedArticle {
    pub title: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BlockKind {
    Heading(u8),
    Paragraph,
}

#[derive(Debug)]
struct Block {
    kind: BlockKind,
    /// Identifies the parent element; blocks sharing it are siblings.
    group: usize,
    text: String,
}

/// Extract the title and the ordered (heading, body) sections of `html`.
///
/// Never fails: malformed markup is repaired by the HTML5 parser, and a
/// document without usable headings degrades to a single fallback section or
/// to no sections at all.
pub fn extract_sections(html: &str, sanitizer: &dyn Sanitizer) -> ExtractedArticle {
    let document = Html::parse_document(html);
    let title = extract_title(&document, sanitizer);
    let blocks = linearize(&document);

    let mut sections = group_sections(&blocks, sanitizer);
    if sections.is_empty() {
        sections.extend(fallback_section(&blocks, sanitizer));
    }

    debug!(sections = sections.len(), blocks = blocks.len(), "extracted article sections");
    ExtractedArticle { title, sections }
}

fn extract_title(document: &Html, sanitizer: &dyn Sanitizer) -> String {
    document
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| sanitizer.sanitize(&visible_text(element)))
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// Flatten the document into heading/paragraph blocks in document order.
fn linearize(document: &Html) -> Vec<Block> {
    let mut blocks = Vec::new();
    let mut next_group = 0usize;
    let mut stack = vec![(document.root_element(), next_group)];

    while let Some((element, group)) = stack.pop() {
        let name = element.value().name();
        if is_hidden_element(name) {
            continue;
        }

        if let Some(kind) = block_kind(name) {
            blocks.push(Block {
                kind,
                group,
                text: visible_text(element).trim().to_string(),
            });
        }

        next_group += 1;
        let children: Vec<ElementRef<'_>> = element.children().filter_map(ElementRef::wrap).collect();
        // reversed so the stack pops them in document order
        stack.extend(children.into_iter().rev().map(|child| (child, next_group)));
    }

    blocks
}

fn block_kind(name: &str) -> Option<BlockKind> {
    match name {
        "h1" => Some(BlockKind::Heading(1)),
        "h2" => Some(BlockKind::Heading(2)),
        "h3" => Some(BlockKind::Heading(3)),
        "p" => Some(BlockKind::Paragraph),
        _ => None,
    }
}

struct Draft<'a> {
    heading: &'a str,
    paragraphs: Vec<&'a str>,
}

fn group_sections(blocks: &[Block], sanitizer: &dyn Sanitizer) -> Vec<Section> {
    let mut drafts: Vec<Draft<'_>> = Vec::new();
    // sibling group -> index of the heading currently collecting paragraphs
    let mut open: HashMap<usize, usize> = HashMap::new();

    for block in blocks {
        match block.kind {
            BlockKind::Heading(level) => {
                if block.text.is_empty() {
                    // still closes the previous heading's run
                    debug!(level, "skipping empty heading");
                    open.remove(&block.group);
                    continue;
                }
                drafts.push(Draft {
                    heading: &block.text,
                    paragraphs: Vec::new(),
                });
                open.insert(block.group, drafts.len() - 1);
            }
            BlockKind::Paragraph => {
                if block.text.is_empty() {
                    continue;
                }
                if let Some(&index) = open.get(&block.group) {
                    drafts[index].paragraphs.push(&block.text);
                }
            }
        }
    }

    drafts
        .into_iter()
        .filter_map(|draft| {
            let heading = sanitizer.sanitize(draft.heading);
            let body = draft
                .paragraphs
                .iter()
                .map(|paragraph| sanitizer.sanitize(paragraph))
                .filter(|paragraph| !paragraph.is_empty())
                .collect::<Vec<_>>()
                .join(" ");

            if heading.is_empty() || body.is_empty() {
                None
            } else {
                Some(Section { heading, body })
            }
        })
        .collect()
}

fn fallback_section(blocks: &[Block], sanitizer: &dyn Sanitizer) -> Option<Section> {
    let body = blocks
        .iter()
        .filter(|block| block.kind == BlockKind::Paragraph && !block.text.is_empty())
        .map(|block| block.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let body = sanitizer.sanitize(&body);

    if body.is_empty() {
        None
    } else {
        Some(Section::new(FALLBACK_HEADING, body))
    }
}
