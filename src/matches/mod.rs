//! Match ingestion
//!
//! Matches are not stored; processing one updates the participating
//! players' statistics and ratings in place.

pub mod processor;

pub use processor::{MatchProcessor, MIN_MATCH_DURATION};
