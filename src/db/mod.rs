mod models;
mod queries;
mod store;

pub use models::*;
pub use queries::*;
pub use store::MySqlPostTransaction;

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use tracing::info;

/// Fully qualified names of every table the job touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tables {
    pub content: String,
    pub content_media: String,
    pub messages: String,
    pub messages_text: String,
    pub forum_users: String,
    pub topics: String,
    pub categories: String,
    pub activities: String,
}

impl Tables {
    /// Table names under a site prefix such as `jos_`.
    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            content: format!("{prefix}content"),
            content_media: format!("{prefix}content_media"),
            messages: format!("{prefix}kunena_messages"),
            messages_text: format!("{prefix}kunena_messages_text"),
            forum_users: format!("{prefix}kunena_users"),
            topics: format!("{prefix}kunena_topics"),
            categories: format!("{prefix}kunena_categories"),
            activities: format!("{prefix}community_activities"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Database {
    pool: MySqlPool,
    tables: Tables,
}

impl Database {
    /// Connect to the site database.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the connection fails.
    pub async fn connect(url: &str, table_prefix: &str) -> Result<Self> {
        let options: MySqlConnectOptions = url.parse().context("Invalid DATABASE_URL")?;
        let options = options.charset("utf8mb4");

        // The job is strictly sequential; one connection for lookups and one
        // for the write transaction is plenty.
        let pool = MySqlPoolOptions::new()
            .max_connections(2)
            .acquire_timeout(Duration::from_secs(30))
            .connect_with(options)
            .await
            .context("Failed to connect to MySQL database")?;

        info!(table_prefix = %table_prefix, "Database connected");

        Ok(Self {
            pool,
            tables: Tables::with_prefix(table_prefix),
        })
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    #[must_use]
    pub const fn tables(&self) -> &Tables {
        &self.tables
    }
}
