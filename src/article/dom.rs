//! Minimal DOM view used by the segmenter and composer.

use std::ops::Deref;

use scraper::{ElementRef, Html};

/// Read-only element handle.
pub trait DomNode: Clone {
    /// Lower-case tag name.
    fn tag_name(&self) -> &str;

    /// Concatenated text of the element and its descendants.
    fn text(&self) -> String;

    /// Element children in document order. Text and comment nodes are skipped.
    fn children(&self) -> Vec<Self>;

    /// The element serialized back to markup, including its own tag.
    fn outer_html(&self) -> String;
}

impl DomNode for ElementRef<'_> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn children(&self) -> Vec<Self> {
        self.deref()
            .children()
            .filter_map(ElementRef::wrap)
            .collect()
    }

    fn outer_html(&self) -> String {
        self.html()
    }
}

/// Owned copy of an element, detached from its document so it can be held
/// across awaits. Children are not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    tag: String,
    text: String,
    markup: String,
}

impl Fragment {
    #[must_use]
    pub fn snapshot<N: DomNode>(node: &N) -> Self {
        Self {
            tag: node.tag_name().to_string(),
            text: node.text(),
            markup: node.outer_html(),
        }
    }
}

impl DomNode for Fragment {
    fn tag_name(&self) -> &str {
        &self.tag
    }

    fn text(&self) -> String {
        self.text.clone()
    }

    fn children(&self) -> Vec<Self> {
        Vec::new()
    }

    fn outer_html(&self) -> String {
        self.markup.clone()
    }
}

/// Element children of a parsed body fragment's root.
#[must_use]
pub fn top_level_elements(document: &Html) -> Vec<ElementRef<'_>> {
    DomNode::children(&document.root_element())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_level_elements_skip_text() {
        let document = Html::parse_fragment("loose text<p>One</p>\n<div><p>Two</p></div>");
        let nodes = top_level_elements(&document);

        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].tag_name(), "p");
        assert_eq!(DomNode::text(&nodes[0]), "One");
        assert_eq!(nodes[1].tag_name(), "div");
        assert_eq!(nodes[1].outer_html(), "<div><p>Two</p></div>");
        assert_eq!(DomNode::children(&nodes[1]).len(), 1);
    }

    #[test]
    fn test_fragment_snapshot() {
        let document = Html::parse_fragment("<p>Hi <b>there</b></p>");
        let fragment = Fragment::snapshot(&top_level_elements(&document)[0]);
        drop(document);

        assert_eq!(fragment.tag_name(), "p");
        assert_eq!(fragment.text(), "Hi there");
        assert_eq!(fragment.outer_html(), "<p>Hi <b>there</b></p>");
        assert!(fragment.children().is_empty());
    }

    #[test]
    fn test_empty_body() {
        let document = Html::parse_fragment("");
        assert!(top_level_elements(&document).is_empty());
    }
}
