//! Multi-strategy acquisition of a handle's activity stream.
//!
//! The [`FallbackController`] walks an ordered list of strategies under one
//! global deadline. Each strategy drives a [`PageCapability`] through an
//! [`ExtractionLoop`], which normalizes raw records and merges them through a
//! [`Deduplicator`]. The [`mirror`] module ships HTML-mirror realizations of
//! the page capability; the rest of the crate only depends on the trait.

pub mod dedup;
pub mod error;
pub mod extraction;
pub mod fallback;
pub mod jitter;
pub mod mirror;
pub mod normalize;
pub mod page;
pub mod types;

pub use dedup::{Deduplicator, MergeOutcome};
pub use error::AcquisitionError;
pub use extraction::{ExtractionLoop, LoopReport, LoopState};
pub use fallback::{FallbackController, Strategy};
pub use jitter::{FixedDelay, Jitter, SeededJitter};
pub use mirror::{build_strategies, MirrorClient, SourceAdapter};
pub use normalize::{
    normalize_count, normalize_post, normalize_profile, parse_coordinates, parse_timestamp,
};
pub use page::{DiagnosticSink, LoopSnapshot, NavigateOptions, NoopSink, PageCapability};
pub use types::{RawPost, RawProfile};
