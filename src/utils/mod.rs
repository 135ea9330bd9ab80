//! Utility modules for m3u-curator
//!
//! This module contains reusable utilities that can be used
//! across different parts of the system.

pub mod natural_sort;
pub mod time;

pub use natural_sort::natural_cmp;
