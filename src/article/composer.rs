//! Assembly of the forum post text from an update segment.

use crate::bbcode::BbcodeConverter;
use crate::constants::FORUM_TOPIC_PHRASE;

use super::dom::DomNode;
use super::marker::strip_markers;

/// Final post payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedPost {
    pub title: String,
    pub image_url: String,
    /// BBCode paragraphs separated by blank lines.
    pub body: String,
    /// Complete message: title line, image line, body.
    pub message: String,
}

/// Literal, case-sensitive match.
fn mentions_forum_topic(text: &str) -> bool {
    text.contains(FORUM_TOPIC_PHRASE)
}

/// Number of leading fragments to keep before the "forum topic" trailer.
///
/// Only the last two positions are inspected, in order; the first one that
/// mentions the forum topic is cut together with everything after it.
fn forum_topic_cutoff(texts: &[String]) -> usize {
    let len = texts.len();
    (len.saturating_sub(2)..len)
        .find(|&i| mentions_forum_topic(&texts[i]))
        .unwrap_or(len)
}

/// Join converted BBCode into trimmed, non-empty lines separated by blank lines.
fn normalize_lines(bbcode: &str) -> String {
    bbcode
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Build the post for an update segment.
///
/// Returns `None` when nothing is left to post after the trailer is cut and
/// the markup is converted.
pub fn compose_post<N, C>(
    fragments: &[N],
    title: &str,
    image_url: &str,
    converter: &C,
) -> Option<ComposedPost>
where
    N: DomNode,
    C: BbcodeConverter + ?Sized,
{
    let texts: Vec<String> = fragments.iter().map(DomNode::text).collect();
    let cutoff = forum_topic_cutoff(&texts);

    let bbcode: String = fragments[..cutoff]
        .iter()
        .map(|fragment| {
            let markup = strip_markers(&fragment.outer_html());
            converter.convert(markup.trim())
        })
        .collect();

    let body = normalize_lines(&bbcode);
    if body.is_empty() {
        return None;
    }

    let message = format!("[center][b]{title}[/b][/center]\n\n[img]{image_url}[/img]\n\n{body}");

    Some(ComposedPost {
        title: title.to_string(),
        image_url: image_url.to_string(),
        body,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::dom::top_level_elements;
    use crate::bbcode::HtmlToBbcode;
    use scraper::Html;

    /// Echoes markup, one fragment per line, so cut points are easy to see.
    struct Echo;

    impl BbcodeConverter for Echo {
        fn convert(&self, html: &str) -> String {
            format!("{html}\n")
        }
    }

    fn texts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_cutoff_last_position() {
        assert_eq!(
            forum_topic_cutoff(&texts(&["a", "b", "Join the forum topic"])),
            2
        );
    }

    #[test]
    fn test_cutoff_second_to_last_drops_tail() {
        assert_eq!(
            forum_topic_cutoff(&texts(&["a", "See the forum topic", "signature"])),
            1
        );
    }

    #[test]
    fn test_cutoff_phrase_is_case_sensitive() {
        assert_eq!(
            forum_topic_cutoff(&texts(&["a", "Visit our Forum Topic"])),
            2
        );
        assert_eq!(
            forum_topic_cutoff(&texts(&["a", "FORUM TOPIC", "forum topic"])),
            2
        );
    }

    #[test]
    fn test_cutoff_ignores_earlier_mentions() {
        assert_eq!(
            forum_topic_cutoff(&texts(&["forum topic early", "b", "c"])),
            3
        );
        assert_eq!(forum_topic_cutoff(&texts(&["only forum topic"])), 0);
        assert_eq!(forum_topic_cutoff(&[]), 0);
    }

    #[test]
    fn test_compose_full_message() {
        let document = Html::parse_fragment(
            r#"<p><strong>[UPDATE 2: Goal]</strong> 1-0 for the home side.</p>
            <p>Second   paragraph.</p>
            <p>Comments in the <a href="https://example.gr/forum/3/77">forum topic</a>.</p>"#,
        );
        let fragments = top_level_elements(&document);

        let post = compose_post(
            &fragments,
            "Goal",
            "https://example.gr/img/lead.jpg",
            &HtmlToBbcode,
        )
        .unwrap();

        assert_eq!(post.body, "1-0 for the home side.\n\nSecond paragraph.");
        assert_eq!(
            post.message,
            "[center][b]Goal[/b][/center]\n\n[img]https://example.gr/img/lead.jpg[/img]\n\n1-0 for the home side.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_compose_strips_marker_from_markup() {
        let document = Html::parse_fragment("<p>[UPDATE] Whistle.</p><p>Next</p>");
        let fragments = top_level_elements(&document);

        let post = compose_post(&fragments, "T", "i.jpg", &Echo).unwrap();
        assert_eq!(post.body, "<p>Whistle.</p>\n\n<p>Next</p>");
    }

    #[test]
    fn test_compose_nothing_left() {
        let document = Html::parse_fragment("<p>See the forum topic</p>");
        let fragments = top_level_elements(&document);
        assert!(compose_post(&fragments, "T", "i.jpg", &HtmlToBbcode).is_none());

        let empty: Vec<scraper::ElementRef<'_>> = Vec::new();
        assert!(compose_post(&empty, "T", "i.jpg", &HtmlToBbcode).is_none());
    }
}
