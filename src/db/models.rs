use chrono::NaiveDateTime;

/// A published article from the content table.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    /// Article HTML.
    pub body: String,
    /// Creation time, UTC.
    pub created: NaiveDateTime,
}

/// Forum thread an update is posted into.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct ThreadContext {
    pub subject: String,
    /// First message of the thread; replies hang off it.
    pub parent_message_id: i64,
}

/// Row for the forum message table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub parent_id: i64,
    pub thread_id: i64,
    pub category_id: i64,
    pub subject: String,
    pub poster_id: i64,
    pub poster_name: String,
    /// Unix seconds.
    pub time: i64,
    pub ip: String,
}

/// "Last post" bookkeeping shared by topics and categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastPost {
    pub message_id: i64,
    /// Unix seconds.
    pub time: i64,
    pub poster_id: i64,
    pub poster_name: String,
}

/// Row for the activity stream table.
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub actor: i64,
    pub target: i64,
    pub title: String,
    pub content: String,
    pub app: String,
    pub cid: i64,
    pub params: String,
    pub points: i64,
    pub access: i64,
    pub location: String,
    pub archived: i64,
    pub comment_id: i64,
    pub comment_type: String,
    pub like_id: i64,
    pub like_type: String,
    /// UTC.
    pub created: NaiveDateTime,
    pub latitude: f64,
    pub longitude: f64,
}

/// Result of an insert statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inserted {
    pub rows_affected: u64,
    pub id: i64,
}
