//! Isolation of the latest `[UPDATE]` block of an article body.

use scraper::{ElementRef, Html};

use super::dom::{top_level_elements, DomNode, Fragment};
use super::marker::contains_marker;
use super::title::extract_title;

/// Wrapper tags that may group an update announcement with other content.
const BLOCK_CONTAINERS: &[&str] = &[
    "div",
    "section",
    "article",
    "main",
    "aside",
    "header",
    "footer",
    "blockquote",
    "figure",
    "center",
];

/// The fragments of the most recent update, plus the title found in its marker.
#[derive(Debug, Clone)]
pub struct UpdateSegment<N> {
    pub fragments: Vec<N>,
    /// Empty when the marker carried no title.
    pub title: String,
}

impl<N> UpdateSegment<N> {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The extracted title, or `fallback` when none was found.
    #[must_use]
    pub fn title_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        if self.title.is_empty() {
            fallback
        } else {
            &self.title
        }
    }
}

fn is_block_container(tag: &str) -> bool {
    BLOCK_CONTAINERS.contains(&tag)
}

/// Flatten block containers that hold an update marker into their children.
///
/// Anything else stays an opaque leaf. A matching container without element
/// children is kept whole, otherwise its text would disappear.
#[must_use]
pub fn unroll<N: DomNode>(nodes: Vec<N>) -> Vec<N> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        if is_block_container(node.tag_name()) && contains_marker(&node.text()) {
            let children = node.children();
            if !children.is_empty() {
                out.extend(unroll(children));
                continue;
            }
        }
        out.push(node);
    }
    out
}

/// Keep the suffix starting at the last fragment that carries a marker.
///
/// Without any marker the whole list is the update.
#[must_use]
pub fn latest_update<N: DomNode>(mut fragments: Vec<N>) -> Vec<N> {
    match fragments
        .iter()
        .rposition(|fragment| contains_marker(&fragment.text()))
    {
        Some(start) => fragments.split_off(start),
        None => fragments,
    }
}

/// Run unrolling, suffix selection and title extraction over root elements.
#[must_use]
pub fn segment<N: DomNode>(roots: Vec<N>) -> UpdateSegment<N> {
    let fragments = latest_update(unroll(roots));
    let title = fragments
        .first()
        .map(|first| extract_title(&first.text()))
        .unwrap_or_default();

    UpdateSegment { fragments, title }
}

/// Segment a parsed article body.
#[must_use]
pub fn segment_document(document: &Html) -> UpdateSegment<ElementRef<'_>> {
    segment(top_level_elements(document))
}

/// Parse and segment an article body, returning owned fragments.
#[must_use]
pub fn segment_body(body: &str) -> UpdateSegment<Fragment> {
    let document = Html::parse_fragment(body);
    let segment = segment_document(&document);
    UpdateSegment {
        fragments: segment.fragments.iter().map(Fragment::snapshot).collect(),
        title: segment.title,
    }
}
