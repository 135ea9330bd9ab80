//! Turning external input into channel records
//!
//! - [`m3u_parser`]: extended M3U text to [`crate::models::ChannelRecord`]s
//! - [`probe`]: media probe JSON reports to stream quality annotations
//! - [`load_channel_store`]: the persisted JSON channel store

pub mod m3u_parser;
pub mod probe;

pub use m3u_parser::{parse_playlist, parse_playlist_with_stats, ParseStatistics};

use crate::errors::AppResult;
use crate::models::ChannelRecord;

/// Decode the JSON channel store (an array of channel objects)
pub fn load_channel_store(json: &str) -> AppResult<Vec<ChannelRecord>> {
    Ok(serde_json::from_str(json)?)
}

/// Encode records in the JSON channel store format
pub fn dump_channel_store(records: &[ChannelRecord]) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
