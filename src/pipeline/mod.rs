//! Article-to-forum posting pipeline.

pub mod activity;
pub mod orchestrator;
pub mod store;
pub mod writer;

pub use activity::ForumLinks;
pub use orchestrator::{run, PipelineSettings, RunOutcome, SkipReason};
pub use store::{ForumStore, PostTransaction};
pub use writer::{write_post, PostRequest, WriteError, WriteStep, WrittenPost};
