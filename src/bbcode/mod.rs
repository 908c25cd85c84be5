//! HTML to forum BBCode conversion.
//!
//! Only the subset of markup that shows up in article bodies is mapped;
//! unknown elements contribute their children and nothing else.

use scraper::{ElementRef, Html, Node};

/// Converts an HTML fragment into BBCode.
pub trait BbcodeConverter {
    fn convert(&self, html: &str) -> String;
}

/// Default converter backed by a `scraper` tree walk.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlToBbcode;

impl BbcodeConverter for HtmlToBbcode {
    fn convert(&self, html: &str) -> String {
        html_to_bbcode(html)
    }
}

/// Convert an HTML fragment to BBCode. Block elements end with a newline.
#[must_use]
pub fn html_to_bbcode(html: &str) -> String {
    let document = Html::parse_fragment(html);
    render_children(document.root_element())
}

fn render_children(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for child in element.children() {
        match child.value() {
            Node::Text(text) => push_text(&mut out, text),
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    write_element(child_element, &mut out);
                }
            }
            _ => {}
        }
    }
    out
}

fn write_element(element: ElementRef<'_>, out: &mut String) {
    let value = element.value();
    match value.name() {
        "script" | "style" | "noscript" | "template" | "head" => {}
        "br" => out.push('\n'),
        "hr" => {
            ensure_newline(out);
            out.push_str("[hr]\n");
        }
        "b" | "strong" => write_inline(element, out, "[b]", "[/b]"),
        "i" | "em" => write_inline(element, out, "[i]", "[/i]"),
        "u" | "ins" => write_inline(element, out, "[u]", "[/u]"),
        "s" | "strike" | "del" => write_inline(element, out, "[s]", "[/s]"),
        "sup" => write_inline(element, out, "[sup]", "[/sup]"),
        "sub" => write_inline(element, out, "[sub]", "[/sub]"),
        "a" => match value.attr("href").map(str::trim) {
            Some(href) if is_linkable(href) => {
                write_inline(element, out, &format!("[url={href}]"), "[/url]");
            }
            _ => out.push_str(&render_children(element)),
        },
        "img" => {
            if let Some(src) = value.attr("src").map(str::trim).filter(|s| !s.is_empty()) {
                out.push_str("[img]");
                out.push_str(src);
                out.push_str("[/img]");
            }
        }
        "iframe" | "video" | "embed" => {
            if let Some(src) = value.attr("src").map(str::trim).filter(|s| is_linkable(s)) {
                ensure_newline(out);
                out.push_str(&format!("[url]{src}[/url]\n"));
            }
        }
        "blockquote" => write_block(element, out, "[quote]", "[/quote]"),
        "ul" => write_block(element, out, "[list]", "[/list]"),
        "ol" => write_block(element, out, "[list=1]", "[/list]"),
        "li" => {
            ensure_newline(out);
            out.push_str("[*]");
            out.push_str(render_children(element).trim());
            out.push('\n');
        }
        "h1" | "h2" => write_block(element, out, "[size=5][b]", "[/b][/size]"),
        "h3" | "h4" => write_block(element, out, "[size=4][b]", "[/b][/size]"),
        "h5" | "h6" => write_block(element, out, "[b]", "[/b]"),
        "center" => write_block(element, out, "[center]", "[/center]"),
        "p" | "div" | "section" | "article" | "header" | "footer" | "figure" | "figcaption"
        | "table" | "tr" | "pre" | "address" => {
            if is_centered(element) {
                write_block(element, out, "[center]", "[/center]");
            } else {
                write_block(element, out, "", "");
            }
        }
        "td" | "th" => {
            out.push_str(render_children(element).trim());
            out.push(' ');
        }
        _ => out.push_str(&render_children(element)),
    }
}

fn write_inline(element: ElementRef<'_>, out: &mut String, open: &str, close: &str) {
    let inner = render_children(element);
    if inner.trim().is_empty() {
        out.push_str(&inner);
        return;
    }
    out.push_str(open);
    out.push_str(&inner);
    out.push_str(close);
}

fn write_block(element: ElementRef<'_>, out: &mut String, open: &str, close: &str) {
    ensure_newline(out);
    let inner = render_children(element);
    let inner = inner.trim();
    if !inner.is_empty() {
        out.push_str(open);
        out.push_str(inner);
        out.push_str(close);
    }
    out.push('\n');
}

fn ensure_newline(out: &mut String) {
    if !out.is_empty() && !out.ends_with('\n') {
        out.push('\n');
    }
}

/// Append text with runs of whitespace collapsed to a single space.
fn push_text(out: &mut String, text: &str) {
    let mut in_space = out.ends_with(' ');
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

fn is_linkable(href: &str) -> bool {
    !href.is_empty()
        && !href.starts_with('#')
        && !href.to_ascii_lowercase().starts_with("javascript:")
}

fn is_centered(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if value
        .attr("align")
        .is_some_and(|a| a.eq_ignore_ascii_case("center"))
    {
        return true;
    }
    value.attr("style").is_some_and(|style| {
        let compact: String = style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        compact.contains("text-align:center")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraph_with_inline_formatting() {
        assert_eq!(
            html_to_bbcode("<p>Hello <strong>big</strong> <em>world</em></p>"),
            "Hello [b]big[/b] [i]world[/i]\n"
        );
    }

    #[test]
    fn test_links_and_images() {
        assert_eq!(
            html_to_bbcode(r#"<p><a href="https://example.gr/a">read</a></p>"#),
            "[url=https://example.gr/a]read[/url]\n"
        );
        assert_eq!(
            html_to_bbcode(r##"<a href="#top">anchor</a>"##),
            "anchor"
        );
        assert_eq!(
            html_to_bbcode(r#"<img src="/images/a.jpg" alt="x">"#),
            "[img]/images/a.jpg[/img]"
        );
    }

    #[test]
    fn test_whitespace_collapsed() {
        assert_eq!(
            html_to_bbcode("<p>  one\n\n   two\tthree </p>"),
            "one two three\n"
        );
    }

    #[test]
    fn test_empty_inline_tags_dropped() {
        assert_eq!(html_to_bbcode("<p><b></b> text</p>"), "text\n");
    }

    #[test]
    fn test_lists() {
        assert_eq!(
            html_to_bbcode("<ul><li>a</li><li><b>b</b></li></ul>"),
            "[list][*]a\n[*][b]b[/b][/list]\n"
        );
        assert_eq!(
            html_to_bbcode("<ol><li>first</li></ol>"),
            "[list=1][*]first[/list]\n"
        );
    }

    #[test]
    fn test_blocks() {
        assert_eq!(
            html_to_bbcode("<blockquote><p>quoted</p></blockquote>"),
            "[quote]quoted[/quote]\n"
        );
        assert_eq!(
            html_to_bbcode("<h2>Headline</h2><p>Body</p>"),
            "[size=5][b]Headline[/b][/size]\nBody\n"
        );
        assert_eq!(
            html_to_bbcode(r#"<p style="text-align: center;">Mid</p>"#),
            "[center]Mid[/center]\n"
        );
        assert_eq!(html_to_bbcode("line one<br>line two"), "line one\nline two");
    }

    #[test]
    fn test_scripts_dropped() {
        assert_eq!(
            html_to_bbcode("<p>ok</p><script>alert(1)</script>"),
            "ok\n"
        );
    }

    #[test]
    fn test_entities_decoded() {
        assert_eq!(html_to_bbcode("<p>Tom &amp; Jerry</p>"), "Tom & Jerry\n");
    }

    #[test]
    fn test_converter_trait() {
        let converter = HtmlToBbcode;
        assert_eq!(converter.convert("<u>x</u>"), "[u]x[/u]");
    }
}
