//! Shared constants used across the application.

/// Phrase an article must contain to be considered, and the phrase that marks
/// the trailing "discuss this in the forum topic" paragraph of an update.
pub const FORUM_TOPIC_PHRASE: &str = "forum topic";

/// Maximum number of skipped articles examined in one run.
pub const DEFAULT_MAX_DEPTH: u32 = 100;

/// Timestamp layout of the watermark file.
pub const WATERMARK_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Origin marker stored in the message `ip` column.
pub const POST_ORIGIN_IP: &str = "127.0.0.1";

/// Activity stream application identifier for forum replies.
pub const ACTIVITY_APP: &str = "kunena.thread.reply";

/// Number of characters of the message shown in the activity preview.
pub const ACTIVITY_PREVIEW_CHARS: usize = 300;

/// Placeholder coordinate meaning "no location".
pub const NO_LOCATION_COORDINATE: f64 = 255.0;
