//! Storage seams used by the pipeline.
//!
//! `Database` implements these against MySQL; tests provide in-memory
//! implementations.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::article::ThreadTarget;
use crate::db::{ContentItem, Inserted, LastPost, NewActivity, NewMessage, ThreadContext};

/// Read side of the site database plus the entry point for write transactions.
#[async_trait]
pub trait ForumStore: Send + Sync {
    type Transaction: PostTransaction;

    /// Oldest article created strictly after `after` whose body contains `filter`.
    async fn next_content_item(
        &self,
        after: NaiveDateTime,
        filter: &str,
    ) -> Result<Option<ContentItem>>;

    async fn thread_context(&self, target: ThreadTarget) -> Result<Option<ThreadContext>>;

    /// Path or URL of the article's lead image.
    async fn lead_image(&self, content_id: i64) -> Result<Option<String>>;

    /// Whether `poster_id` already has a message with exactly this text.
    async fn already_posted(&self, poster_id: i64, message: &str) -> Result<bool>;

    async fn begin(&self) -> Result<Self::Transaction>;
}

/// The statements of one post write. Each returns the affected row count.
///
/// Dropping a transaction without committing discards its changes.
#[async_trait]
pub trait PostTransaction: Send {
    async fn insert_message(&mut self, message: &NewMessage) -> Result<Inserted>;

    async fn insert_message_text(&mut self, message_id: i64, text: &str) -> Result<u64>;

    async fn increment_poster_posts(&mut self, poster_id: i64) -> Result<u64>;

    async fn update_topic_last_post(&mut self, thread_id: i64, last: &LastPost) -> Result<u64>;

    async fn update_category_last_post(
        &mut self,
        category_id: i64,
        last: &LastPost,
    ) -> Result<u64>;

    async fn insert_activity(&mut self, activity: &NewActivity) -> Result<Inserted>;

    async fn link_activity_likes(&mut self, activity_id: i64) -> Result<u64>;

    async fn commit(self) -> Result<()>;

    async fn rollback(self) -> Result<()>;
}
