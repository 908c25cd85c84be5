//! Persisted "last posted article" timestamp.
//!
//! The file holds a single `yyyy-MM-dd HH:mm:ss` line in Europe/Athens time.
//! Database timestamps are UTC, so every value is converted on the way in
//! and out.

use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, TimeZone};
use chrono_tz::Europe::Athens;
use thiserror::Error;
use tracing::debug;

use crate::constants::WATERMARK_FORMAT;

#[derive(Debug, Error)]
pub enum WatermarkError {
    #[error("watermark file not found: {0}")]
    Missing(PathBuf),
    #[error("failed to access watermark file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid watermark '{value}': {message}")]
    Invalid { value: String, message: String },
}

/// Render a UTC timestamp as a watermark string.
#[must_use]
pub fn format_watermark(utc: NaiveDateTime) -> String {
    Athens
        .from_utc_datetime(&utc)
        .format(WATERMARK_FORMAT)
        .to_string()
}

/// Parse a watermark string back to a UTC timestamp.
///
/// Local times repeated by the autumn DST change resolve to the earlier
/// instant. A watermark written during the second pass of that hour reloads
/// up to one hour early, so the next run looks at that hour again and the
/// duplicate check stops a repost. Resolving to the later instant could
/// instead jump past articles that were never looked at.
///
/// # Errors
///
/// Returns an error if the string is malformed or names a local time skipped
/// by the spring DST change.
pub fn parse_watermark(value: &str) -> Result<NaiveDateTime, WatermarkError> {
    let trimmed = value.trim();
    let local = NaiveDateTime::parse_from_str(trimmed, WATERMARK_FORMAT).map_err(|e| {
        WatermarkError::Invalid {
            value: trimmed.to_string(),
            message: e.to_string(),
        }
    })?;

    Athens
        .from_local_datetime(&local)
        .earliest()
        .map(|dt| dt.naive_utc())
        .ok_or_else(|| WatermarkError::Invalid {
            value: trimmed.to_string(),
            message: "local time does not exist in Europe/Athens".to_string(),
        })
}

/// Watermark persisted in a plain text file.
#[derive(Debug, Clone)]
pub struct WatermarkFile {
    path: PathBuf,
}

impl WatermarkFile {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current watermark as a UTC timestamp.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unreadable or malformed.
    pub async fn load(&self) -> Result<NaiveDateTime, WatermarkError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(WatermarkError::Missing(self.path.clone()));
            }
            Err(e) => {
                return Err(WatermarkError::Io {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };

        parse_watermark(&raw)
    }

    /// Persist a UTC timestamp as the new watermark.
    ///
    /// Writes to a sibling temp file first and renames it into place, so a
    /// crash never leaves a truncated watermark behind.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub async fn store(&self, utc: NaiveDateTime) -> Result<String, WatermarkError> {
        let value = format_watermark(utc);
        let tmp_path = self.path.with_extension("tmp");

        tokio::fs::write(&tmp_path, &value)
            .await
            .map_err(|e| WatermarkError::Io {
                path: tmp_path.clone(),
                source: e,
            })?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|e| WatermarkError::Io {
                path: self.path.clone(),
                source: e,
            })?;

        debug!(path = %self.path.display(), watermark = %value, "Watermark stored");
        Ok(value)
    }
}
