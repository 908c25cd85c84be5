//! Forum update poster library.
//!
//! A batch job that picks up newly published articles, isolates their latest
//! `[UPDATE]` block, converts it to BBCode and posts it as a forum reply with
//! a matching activity stream entry.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod article;
pub mod bbcode;
pub mod config;
pub mod constants;
pub mod db;
pub mod pipeline;
pub mod watermark;
