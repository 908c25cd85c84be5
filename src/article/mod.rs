//! Article body processing: update isolation, titles, thread links and
//! post composition.

pub mod composer;
pub mod dom;
pub mod marker;
pub mod segmenter;
pub mod target;
pub mod title;

pub use composer::{compose_post, ComposedPost};
pub use dom::{top_level_elements, DomNode, Fragment};
pub use segmenter::{segment, segment_body, segment_document, UpdateSegment};
pub use target::{find_thread_target, ThreadTarget};
pub use title::extract_title;
