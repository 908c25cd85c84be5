//! One run of the job: find the next postable article, post it, advance the
//! watermark.

use std::fmt;

use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use tracing::{debug, error, info, warn};

use super::activity::ForumLinks;
use super::store::ForumStore;
use super::writer::{write_post, PostRequest};
use crate::article::{compose_post, find_thread_target, segment_body, ThreadTarget};
use crate::bbcode::BbcodeConverter;
use crate::config::Config;
use crate::db::ContentItem;
use crate::watermark::{format_watermark, WatermarkFile};

/// Run-level settings derived from the configuration.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub poster_id: i64,
    pub poster_name: String,
    pub content_filter: String,
    pub media_base_url: String,
    pub links: ForumLinks,
    pub max_depth: u32,
    pub dry_run: bool,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            poster_id: config.poster_id,
            poster_name: config.poster_name.clone(),
            content_filter: config.content_filter.clone(),
            media_base_url: config.media_base_url.clone(),
            links: ForumLinks::new(&config.forum_base_url),
            max_depth: config.max_depth,
            dry_run: config.dry_run,
        }
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// A reply was committed and the watermark advanced.
    Posted {
        content_id: i64,
        message_id: i64,
        url: String,
        watermark: String,
    },
    /// A reply was composed but not written.
    DryRun { content_id: i64, message: String },
    /// No unprocessed article is left. `skipped` counts articles passed over.
    Idle { skipped: u32 },
    /// The skip limit was reached before anything could be posted.
    Exhausted { depth: u32 },
    /// The write transaction was rolled back; the watermark is unchanged.
    WriteFailed { content_id: i64, error: String },
}

/// Why an article was passed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptyBody,
    NoThreadLink,
    ThreadNotFound(ThreadTarget),
    NoLeadImage,
    NothingToPost,
    AlreadyPosted,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBody => f.write_str("article body has no elements"),
            Self::NoThreadLink => f.write_str("no forum thread link in article"),
            Self::ThreadNotFound(target) => write!(
                f,
                "thread {}/{} not found",
                target.category_id, target.thread_id
            ),
            Self::NoLeadImage => f.write_str("article has no lead image"),
            Self::NothingToPost => f.write_str("update block converts to an empty post"),
            Self::AlreadyPosted => f.write_str("identical post already exists"),
        }
    }
}

enum Candidate {
    Ready(PostRequest),
    Skip(SkipReason),
}

/// Prefix relative media paths with the media base URL.
#[must_use]
pub fn resolve_media_url(base: &str, path: &str) -> String {
    let path = path.trim();
    if base.is_empty()
        || path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
    {
        return path.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Post at most one article created after `start`.
///
/// Articles that cannot be posted are skipped by moving a local cursor past
/// them; only a committed post moves the persisted watermark.
///
/// # Errors
///
/// Returns an error if a lookup query fails. Write failures are reported as
/// [`RunOutcome::WriteFailed`].
pub async fn run<S, C>(
    store: &S,
    watermark: &WatermarkFile,
    start: NaiveDateTime,
    settings: &PipelineSettings,
    converter: &C,
) -> Result<RunOutcome>
where
    S: ForumStore + ?Sized,
    C: BbcodeConverter + ?Sized,
{
    let mut cursor = start;
    let mut depth: u32 = 0;

    loop {
        if depth >= settings.max_depth {
            warn!(
                depth,
                cursor = %format_watermark(cursor),
                "Skip limit reached without posting"
            );
            return Ok(RunOutcome::Exhausted { depth });
        }

        let Some(item) = store
            .next_content_item(cursor, &settings.content_filter)
            .await?
        else {
            info!(depth, "No new articles to post");
            return Ok(RunOutcome::Idle { skipped: depth });
        };

        let created = format_watermark(item.created);
        info!(content_id = item.id, title = %item.title, created = %created, depth, "Examining article");

        let request = match prepare(store, settings, converter, &item).await? {
            Candidate::Ready(request) => request,
            Candidate::Skip(reason) => {
                info!(content_id = item.id, depth, reason = %reason, "Skipping article");
                cursor = item.created;
                depth += 1;
                continue;
            }
        };

        if settings.dry_run {
            info!(
                content_id = item.id,
                thread_id = request.thread_id,
                message = %request.message,
                "Dry run, not posting"
            );
            return Ok(RunOutcome::DryRun {
                content_id: item.id,
                message: request.message,
            });
        }

        let written = match write_post(store, &request, &settings.links, Utc::now()).await {
            Ok(written) => written,
            Err(e) => {
                error!(content_id = item.id, step = ?e.step(), "Post write rolled back: {e}");
                return Ok(RunOutcome::WriteFailed {
                    content_id: item.id,
                    error: e.to_string(),
                });
            }
        };

        info!(
            content_id = item.id,
            message_id = written.message_id,
            activity_id = written.activity_id,
            url = %written.url,
            "Posted update"
        );

        // The post is committed either way; a stale watermark is caught by the
        // duplicate check on the next run.
        if let Err(e) = watermark.store(request.source_created).await {
            error!(content_id = item.id, "Failed to store watermark: {e}");
        }

        return Ok(RunOutcome::Posted {
            content_id: item.id,
            message_id: written.message_id,
            url: written.url,
            watermark: created,
        });
    }
}

async fn prepare<S, C>(
    store: &S,
    settings: &PipelineSettings,
    converter: &C,
    item: &ContentItem,
) -> Result<Candidate>
where
    S: ForumStore + ?Sized,
    C: BbcodeConverter + ?Sized,
{
    let segment = segment_body(&item.body);
    if segment.is_empty() {
        return Ok(Candidate::Skip(SkipReason::EmptyBody));
    }
    debug!(
        content_id = item.id,
        fragments = segment.fragments.len(),
        title = %segment.title,
        "Update segment isolated"
    );

    let Some(target) = find_thread_target(&item.body) else {
        return Ok(Candidate::Skip(SkipReason::NoThreadLink));
    };

    let Some(thread) = store.thread_context(target).await? else {
        return Ok(Candidate::Skip(SkipReason::ThreadNotFound(target)));
    };

    let Some(image_path) = store.lead_image(item.id).await? else {
        return Ok(Candidate::Skip(SkipReason::NoLeadImage));
    };
    let image_url = resolve_media_url(&settings.media_base_url, &image_path);

    let title = segment.title_or(&item.title);
    let Some(post) = compose_post(&segment.fragments, title, &image_url, converter) else {
        return Ok(Candidate::Skip(SkipReason::NothingToPost));
    };

    if store
        .already_posted(settings.poster_id, &post.message)
        .await?
    {
        return Ok(Candidate::Skip(SkipReason::AlreadyPosted));
    }

    Ok(Candidate::Ready(PostRequest {
        parent_message_id: thread.parent_message_id,
        thread_id: target.thread_id,
        category_id: target.category_id,
        subject: thread.subject,
        message: post.message,
        poster_id: settings.poster_id,
        poster_name: settings.poster_name.clone(),
        source_created: item.created,
        image_url,
    }))
}
