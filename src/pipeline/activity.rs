//! Activity stream entry announcing a new forum reply.

use std::sync::LazyLock;

use chrono::NaiveDateTime;
use maud::html;
use regex::Regex;

use crate::constants::{ACTIVITY_APP, ACTIVITY_PREVIEW_CHARS, NO_LOCATION_COORDINATE};
use crate::db::NewActivity;

static IMG_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)\[img\].*?\[/img\]").expect("Invalid img tag regex")
});

static BBCODE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("Invalid BBCode tag regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Builds public links into the forum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForumLinks {
    base: String,
}

impl ForumLinks {
    #[must_use]
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn thread_url(&self, category_id: i64, thread_id: i64) -> String {
        format!("{}/{category_id}/{thread_id}", self.base)
    }

    #[must_use]
    pub fn message_url(&self, category_id: i64, thread_id: i64, message_id: i64) -> String {
        format!("{}#{message_id}", self.thread_url(category_id, thread_id))
    }
}

/// Plain-text preview of a BBCode message.
///
/// Goes beyond plain tag stripping in two ways: `[img]..[/img]` blocks are
/// dropped with their URL, and `...` is appended when the text is cut.
/// Other tags are removed but keep their content. Whitespace is collapsed
/// and the result is cut to `max_chars` characters.
#[must_use]
pub fn preview_text(message: &str, max_chars: usize) -> String {
    let without_images = IMG_TAG.replace_all(message, " ");
    let without_tags = BBCODE_TAG.replace_all(&without_images, " ");
    let collapsed = WHITESPACE.replace_all(&without_tags, " ");
    let text = collapsed.trim();

    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut preview: String = text.chars().take(max_chars).collect();
    preview.truncate(preview.trim_end().len());
    preview.push_str("...");
    preview
}

/// `{actor}` is substituted by the activity stream with the poster's name.
#[must_use]
pub fn activity_title(subject: &str, thread_url: &str) -> String {
    let link = html! { a href=(thread_url) { (subject) } };
    format!("{{actor}} replied to the forum topic {}", link.into_string())
}

#[must_use]
pub fn activity_content(subject: &str, image_url: &str, message_url: &str, preview: &str) -> String {
    html! {
        div style="text-align: center;" { b { (subject) } }
        div {
            a href=(message_url) { img src=(image_url) alt=(subject); }
        }
        p { (preview) }
        a href=(message_url) { "Read more" }
    }
    .into_string()
}

/// What the activity entry refers to.
#[derive(Debug, Clone, Copy)]
pub struct ActivitySource<'a> {
    pub poster_id: i64,
    pub category_id: i64,
    pub thread_id: i64,
    pub message_id: i64,
    pub subject: &'a str,
    pub message: &'a str,
    pub image_url: &'a str,
}

/// Assemble the activity row. `like_id` is filled in once the row has an id.
#[must_use]
pub fn build_activity(
    source: &ActivitySource<'_>,
    links: &ForumLinks,
    created: NaiveDateTime,
) -> NewActivity {
    let thread_url = links.thread_url(source.category_id, source.thread_id);
    let message_url = links.message_url(source.category_id, source.thread_id, source.message_id);
    let preview = preview_text(source.message, ACTIVITY_PREVIEW_CHARS);

    NewActivity {
        actor: source.poster_id,
        target: 0,
        title: activity_title(source.subject, &thread_url),
        content: activity_content(source.subject, source.image_url, &message_url, &preview),
        app: ACTIVITY_APP.to_string(),
        cid: source.thread_id,
        params: String::new(),
        points: 1,
        access: 0,
        location: String::new(),
        archived: 0,
        comment_id: source.thread_id,
        comment_type: ACTIVITY_APP.to_string(),
        like_id: 0,
        like_type: ACTIVITY_APP.to_string(),
        created,
        latitude: NO_LOCATION_COORDINATE,
        longitude: NO_LOCATION_COORDINATE,
    }
}
