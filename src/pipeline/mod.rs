//! Record transformation stages
//!
//! Every stage takes records by value and returns a new vector; nothing here
//! performs I/O. A typical run is parse, [`variants`], [`filter`], then hand
//! the result to [`crate::generator`].

pub mod filter;
pub mod refresh;
pub mod variants;

pub use filter::{build_sublists, distinct_groups, filter_by_groups, select_by_ids, sort_by_name};
pub use refresh::{refresh_locators, youtube_watch_url, LocatorResolver};
pub use variants::{expand_variants, DedupPolicy, VariantExpander, VariantStatistics};
