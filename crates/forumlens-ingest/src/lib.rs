//! Record loader for the forum JSON exports.
//!
//! Every loader returns a [`TableLoad`] instead of failing: a missing or
//! malformed file is reported as [`TableLoad::Absent`] with a reason, and the
//! caller decides whether the table is required (see [`TableLoad::require`]).

pub mod error;
pub mod normalize;
pub mod relative_time;
pub mod source;
pub mod types;

pub use error::IngestError;
pub use normalize::{build_categories, build_posts, PostBuild};
pub use relative_time::parse_relative_time;
pub use source::{
    load_categories, load_replies, load_sentiment, load_stats, load_topics, AbsentReason,
    TableKind, TableLoad,
};
pub use types::{ForumStats, RawCategory, RawReply, RawTopic};
