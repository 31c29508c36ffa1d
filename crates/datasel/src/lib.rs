//! Dataset selection for the response-log dashboard
//!
//! Tracks which of {none, short sample, long sample, custom upload} is the
//! active dataset, gates fetches of the sample fixtures, and discards stale
//! async results so the last completed, still-relevant operation wins.

pub mod fetch;
pub mod store;

pub use fetch::*;
pub use store::*;
