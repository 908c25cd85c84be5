use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use sqlx::{MySql, Transaction};

use super::models::{ContentItem, Inserted, LastPost, NewActivity, NewMessage, ThreadContext};
use super::{queries, Database, Tables};
use crate::article::ThreadTarget;
use crate::pipeline::store::{ForumStore, PostTransaction};

#[async_trait]
impl ForumStore for Database {
    type Transaction = MySqlPostTransaction;

    async fn next_content_item(
        &self,
        after: NaiveDateTime,
        filter: &str,
    ) -> Result<Option<ContentItem>> {
        queries::get_next_content_item(self.pool(), self.tables(), after, filter).await
    }

    async fn thread_context(&self, target: ThreadTarget) -> Result<Option<ThreadContext>> {
        queries::get_thread_context(
            self.pool(),
            self.tables(),
            target.category_id,
            target.thread_id,
        )
        .await
    }

    async fn lead_image(&self, content_id: i64) -> Result<Option<String>> {
        queries::get_lead_image_path(self.pool(), self.tables(), content_id).await
    }

    async fn already_posted(&self, poster_id: i64, message: &str) -> Result<bool> {
        queries::message_exists_for_poster(self.pool(), self.tables(), poster_id, message).await
    }

    async fn begin(&self) -> Result<MySqlPostTransaction> {
        let tx = self
            .pool()
            .begin()
            .await
            .context("Failed to begin post transaction")?;

        Ok(MySqlPostTransaction {
            tx,
            tables: self.tables().clone(),
        })
    }
}

/// A post write running inside one MySQL transaction.
pub struct MySqlPostTransaction {
    tx: Transaction<'static, MySql>,
    tables: Tables,
}

#[async_trait]
impl PostTransaction for MySqlPostTransaction {
    async fn insert_message(&mut self, message: &NewMessage) -> Result<Inserted> {
        queries::insert_message(&mut self.tx, &self.tables, message).await
    }

    async fn insert_message_text(&mut self, message_id: i64, text: &str) -> Result<u64> {
        queries::insert_message_text(&mut self.tx, &self.tables, message_id, text).await
    }

    async fn increment_poster_posts(&mut self, poster_id: i64) -> Result<u64> {
        queries::increment_poster_posts(&mut self.tx, &self.tables, poster_id).await
    }

    async fn update_topic_last_post(&mut self, thread_id: i64, last: &LastPost) -> Result<u64> {
        queries::update_topic_last_post(&mut self.tx, &self.tables, thread_id, last).await
    }

    async fn update_category_last_post(
        &mut self,
        category_id: i64,
        last: &LastPost,
    ) -> Result<u64> {
        queries::update_category_last_post(&mut self.tx, &self.tables, category_id, last).await
    }

    async fn insert_activity(&mut self, activity: &NewActivity) -> Result<Inserted> {
        queries::insert_activity(&mut self.tx, &self.tables, activity).await
    }

    async fn link_activity_likes(&mut self, activity_id: i64) -> Result<u64> {
        queries::link_activity_likes(&mut self.tx, &self.tables, activity_id).await
    }

    async fn commit(self) -> Result<()> {
        self.tx
            .commit()
            .await
            .context("Failed to commit post transaction")
    }

    async fn rollback(self) -> Result<()> {
        self.tx
            .rollback()
            .await
            .context("Failed to roll back post transaction")
    }
}
