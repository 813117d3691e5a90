//! Flattened rows for table and JSON output
//!
//! Each display model converts a domain value into plain strings so
//! `tabled` can lay it out without knowing the lineup types.

mod cache;
mod lineup;

pub use cache::CacheEntryDisplay;
pub use lineup::{BenchDisplay, SlotDisplay};
