//! All-or-nothing write of a forum reply and its activity entry.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use thiserror::Error;
use tracing::{debug, warn};

use super::activity::{build_activity, ActivitySource, ForumLinks};
use super::store::{ForumStore, PostTransaction};
use crate::constants::POST_ORIGIN_IP;
use crate::db::{LastPost, NewMessage};

/// Everything needed to post one reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRequest {
    pub parent_message_id: i64,
    pub thread_id: i64,
    pub category_id: i64,
    pub subject: String,
    pub message: String,
    pub poster_id: i64,
    pub poster_name: String,
    /// Creation time of the source article, UTC.
    pub source_created: NaiveDateTime,
    pub image_url: String,
}

/// Ids of the committed rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPost {
    pub message_id: i64,
    pub activity_id: i64,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStep {
    Message,
    MessageText,
    PosterCounter,
    TopicLastPost,
    CategoryLastPost,
    Activity,
    ActivityLikeLink,
}

impl fmt::Display for WriteStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Message => "message insert",
            Self::MessageText => "message text insert",
            Self::PosterCounter => "poster post counter update",
            Self::TopicLastPost => "topic last post update",
            Self::CategoryLastPost => "category last post update",
            Self::Activity => "activity insert",
            Self::ActivityLikeLink => "activity like link update",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to begin transaction: {0:#}")]
    Begin(anyhow::Error),
    #[error("{0} affected no rows")]
    NoRowsAffected(WriteStep),
    #[error("{step} failed: {cause:#}")]
    Step { step: WriteStep, cause: anyhow::Error },
    #[error("failed to commit transaction: {0:#}")]
    Commit(anyhow::Error),
}

impl WriteError {
    /// The statement that failed, if the failure happened inside the sequence.
    #[must_use]
    pub const fn step(&self) -> Option<WriteStep> {
        match self {
            Self::NoRowsAffected(step) | Self::Step { step, .. } => Some(*step),
            Self::Begin(_) | Self::Commit(_) => None,
        }
    }
}

fn failed(step: WriteStep) -> impl FnOnce(anyhow::Error) -> WriteError {
    move |cause| WriteError::Step { step, cause }
}

fn require_rows(rows: u64, step: WriteStep) -> Result<(), WriteError> {
    if rows == 0 {
        Err(WriteError::NoRowsAffected(step))
    } else {
        Ok(())
    }
}

/// Write the reply, the counters and the activity entry in one transaction.
///
/// A statement that fails or reports zero affected rows rolls the whole
/// transaction back.
///
/// # Errors
///
/// Returns the first failing step, or a begin/commit failure.
pub async fn write_post<S>(
    store: &S,
    request: &PostRequest,
    links: &ForumLinks,
    now: DateTime<Utc>,
) -> Result<WrittenPost, WriteError>
where
    S: ForumStore + ?Sized,
{
    let mut tx = store.begin().await.map_err(WriteError::Begin)?;

    match apply_steps(&mut tx, request, links, now).await {
        Ok(written) => {
            tx.commit().await.map_err(WriteError::Commit)?;
            Ok(written)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback after failed post write also failed: {rollback_err:#}");
            }
            Err(e)
        }
    }
}

async fn apply_steps<T: PostTransaction>(
    tx: &mut T,
    request: &PostRequest,
    links: &ForumLinks,
    now: DateTime<Utc>,
) -> Result<WrittenPost, WriteError> {
    let time = now.timestamp();

    let inserted = tx
        .insert_message(&NewMessage {
            parent_id: request.parent_message_id,
            thread_id: request.thread_id,
            category_id: request.category_id,
            subject: request.subject.clone(),
            poster_id: request.poster_id,
            poster_name: request.poster_name.clone(),
            time,
            ip: POST_ORIGIN_IP.to_string(),
        })
        .await
        .map_err(failed(WriteStep::Message))?;
    require_rows(inserted.rows_affected, WriteStep::Message)?;
    let message_id = inserted.id;
    debug!(message_id, "Message row inserted");

    let rows = tx
        .insert_message_text(message_id, &request.message)
        .await
        .map_err(failed(WriteStep::MessageText))?;
    require_rows(rows, WriteStep::MessageText)?;

    let rows = tx
        .increment_poster_posts(request.poster_id)
        .await
        .map_err(failed(WriteStep::PosterCounter))?;
    require_rows(rows, WriteStep::PosterCounter)?;

    let last = LastPost {
        message_id,
        time,
        poster_id: request.poster_id,
        poster_name: request.poster_name.clone(),
    };

    let rows = tx
        .update_topic_last_post(request.thread_id, &last)
        .await
        .map_err(failed(WriteStep::TopicLastPost))?;
    require_rows(rows, WriteStep::TopicLastPost)?;

    let rows = tx
        .update_category_last_post(request.category_id, &last)
        .await
        .map_err(failed(WriteStep::CategoryLastPost))?;
    require_rows(rows, WriteStep::CategoryLastPost)?;

    let activity = build_activity(
        &ActivitySource {
            poster_id: request.poster_id,
            category_id: request.category_id,
            thread_id: request.thread_id,
            message_id,
            subject: &request.subject,
            message: &request.message,
            image_url: &request.image_url,
        },
        links,
        now.naive_utc(),
    );
    let inserted = tx
        .insert_activity(&activity)
        .await
        .map_err(failed(WriteStep::Activity))?;
    require_rows(inserted.rows_affected, WriteStep::Activity)?;
    let activity_id = inserted.id;

    let rows = tx
        .link_activity_likes(activity_id)
        .await
        .map_err(failed(WriteStep::ActivityLikeLink))?;
    require_rows(rows, WriteStep::ActivityLikeLink)?;

    Ok(WrittenPost {
        message_id,
        activity_id,
        url: links.message_url(request.category_id, request.thread_id, message_id),
    })
}
