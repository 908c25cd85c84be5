use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use sqlx::{MySqlConnection, MySqlPool};

use super::models::{ContentItem, Inserted, LastPost, NewActivity, NewMessage, ThreadContext};
use super::Tables;

// ========== Content ==========

/// Oldest published article created after `after` whose body mentions `filter`.
pub async fn get_next_content_item(
    pool: &MySqlPool,
    tables: &Tables,
    after: NaiveDateTime,
    filter: &str,
) -> Result<Option<ContentItem>> {
    let sql = format!(
        r"
        SELECT CAST(id AS SIGNED) AS id, title, `fulltext` AS body, created
        FROM {}
        WHERE created > ? AND state = 1 AND `fulltext` LIKE ?
        ORDER BY created ASC, id ASC
        LIMIT 1
        ",
        tables.content
    );

    sqlx::query_as(&sql)
        .bind(after)
        .bind(format!("%{filter}%"))
        .fetch_optional(pool)
        .await
        .context("Failed to fetch next content item")
}

/// Path of the lead image attached to an article.
pub async fn get_lead_image_path(
    pool: &MySqlPool,
    tables: &Tables,
    content_id: i64,
) -> Result<Option<String>> {
    let sql = format!(
        r"
        SELECT path
        FROM {}
        WHERE content_id = ? AND path <> ''
        ORDER BY is_lead DESC, ordering ASC, id ASC
        LIMIT 1
        ",
        tables.content_media
    );

    let row: Option<(String,)> = sqlx::query_as(&sql)
        .bind(content_id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch lead image")?;

    Ok(row.map(|(path,)| path))
}

// ========== Forum lookups ==========

/// Subject and first message of a visible thread in the given category.
pub async fn get_thread_context(
    pool: &MySqlPool,
    tables: &Tables,
    category_id: i64,
    thread_id: i64,
) -> Result<Option<ThreadContext>> {
    let sql = format!(
        r"
        SELECT subject, CAST(first_post_id AS SIGNED) AS parent_message_id
        FROM {}
        WHERE id = ? AND category_id = ? AND hold = 0
        LIMIT 1
        ",
        tables.topics
    );

    sqlx::query_as(&sql)
        .bind(thread_id)
        .bind(category_id)
        .fetch_optional(pool)
        .await
        .context("Failed to fetch thread context")
}

/// Whether the poster already has a message with exactly this body.
pub async fn message_exists_for_poster(
    pool: &MySqlPool,
    tables: &Tables,
    poster_id: i64,
    message: &str,
) -> Result<bool> {
    let sql = format!(
        r"
        SELECT CAST(m.id AS SIGNED)
        FROM {} m
        INNER JOIN {} t ON t.mesid = m.id
        WHERE m.userid = ? AND t.message = ?
        LIMIT 1
        ",
        tables.messages, tables.messages_text
    );

    let row: Option<(i64,)> = sqlx::query_as(&sql)
        .bind(poster_id)
        .bind(message)
        .fetch_optional(pool)
        .await
        .context("Failed to check for duplicate message")?;

    Ok(row.is_some())
}

// ========== Post writes (run inside a transaction) ==========

pub async fn insert_message(
    conn: &mut MySqlConnection,
    tables: &Tables,
    message: &NewMessage,
) -> Result<Inserted> {
    let sql = format!(
        r"
        INSERT INTO {} (parent, thread, catid, name, userid, subject, time, ip)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ",
        tables.messages
    );

    let result = sqlx::query(&sql)
        .bind(message.parent_id)
        .bind(message.thread_id)
        .bind(message.category_id)
        .bind(&message.poster_name)
        .bind(message.poster_id)
        .bind(&message.subject)
        .bind(message.time)
        .bind(&message.ip)
        .execute(conn)
        .await
        .context("Failed to insert message")?;

    Ok(Inserted {
        rows_affected: result.rows_affected(),
        id: i64::try_from(result.last_insert_id()).context("Message id out of range")?,
    })
}

pub async fn insert_message_text(
    conn: &mut MySqlConnection,
    tables: &Tables,
    message_id: i64,
    text: &str,
) -> Result<u64> {
    let sql = format!(
        "INSERT INTO {} (mesid, message) VALUES (?, ?)",
        tables.messages_text
    );

    let result = sqlx::query(&sql)
        .bind(message_id)
        .bind(text)
        .execute(conn)
        .await
        .context("Failed to insert message text")?;

    Ok(result.rows_affected())
}

pub async fn increment_poster_posts(
    conn: &mut MySqlConnection,
    tables: &Tables,
    poster_id: i64,
) -> Result<u64> {
    let sql = format!(
        "UPDATE {} SET posts = posts + 1 WHERE userid = ?",
        tables.forum_users
    );

    let result = sqlx::query(&sql)
        .bind(poster_id)
        .execute(conn)
        .await
        .context("Failed to increment poster post count")?;

    Ok(result.rows_affected())
}

pub async fn update_topic_last_post(
    conn: &mut MySqlConnection,
    tables: &Tables,
    thread_id: i64,
    last: &LastPost,
) -> Result<u64> {
    let sql = format!(
        r"
        UPDATE {}
        SET last_post_id = ?, last_post_time = ?, last_post_userid = ?, last_post_guest_name = ?
        WHERE id = ?
        ",
        tables.topics
    );

    let result = sqlx::query(&sql)
        .bind(last.message_id)
        .bind(last.time)
        .bind(last.poster_id)
        .bind(&last.poster_name)
        .bind(thread_id)
        .execute(conn)
        .await
        .context("Failed to update topic last post")?;

    Ok(result.rows_affected())
}

pub async fn update_category_last_post(
    conn: &mut MySqlConnection,
    tables: &Tables,
    category_id: i64,
    last: &LastPost,
) -> Result<u64> {
    let sql = format!(
        "UPDATE {} SET last_post_id = ?, last_post_time = ? WHERE id = ?",
        tables.categories
    );

    let result = sqlx::query(&sql)
        .bind(last.message_id)
        .bind(last.time)
        .bind(category_id)
        .execute(conn)
        .await
        .context("Failed to update category last post")?;

    Ok(result.rows_affected())
}

pub async fn insert_activity(
    conn: &mut MySqlConnection,
    tables: &Tables,
    activity: &NewActivity,
) -> Result<Inserted> {
    let sql = format!(
        r"
        INSERT INTO {} (
            actor, target, title, content, app, cid, params, points, access,
            location, archived, comment_id, comment_type, like_id, like_type,
            created, latitude, longitude
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ",
        tables.activities
    );

    let result = sqlx::query(&sql)
        .bind(activity.actor)
        .bind(activity.target)
        .bind(&activity.title)
        .bind(&activity.content)
        .bind(&activity.app)
        .bind(activity.cid)
        .bind(&activity.params)
        .bind(activity.points)
        .bind(activity.access)
        .bind(&activity.location)
        .bind(activity.archived)
        .bind(activity.comment_id)
        .bind(&activity.comment_type)
        .bind(activity.like_id)
        .bind(&activity.like_type)
        .bind(activity.created)
        .bind(activity.latitude)
        .bind(activity.longitude)
        .execute(conn)
        .await
        .context("Failed to insert activity")?;

    Ok(Inserted {
        rows_affected: result.rows_affected(),
        id: i64::try_from(result.last_insert_id()).context("Activity id out of range")?,
    })
}

/// Point an activity's like link at the activity itself.
pub async fn link_activity_likes(
    conn: &mut MySqlConnection,
    tables: &Tables,
    activity_id: i64,
) -> Result<u64> {
    let sql = format!("UPDATE {} SET like_id = ? WHERE id = ?", tables.activities);

    let result = sqlx::query(&sql)
        .bind(activity_id)
        .bind(activity_id)
        .execute(conn)
        .await
        .context("Failed to link activity likes")?;

    Ok(result.rows_affected())
}
