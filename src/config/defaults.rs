/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Playlist defaults
pub const DEFAULT_EPG_URL: &str = "";

// Schedule defaults
pub const DEFAULT_HORIZON_HOURS: u32 = 48;
pub const DEFAULT_BLOCK_HOURS: u32 = 1;
/// Upper bound for both schedule settings (one leap year)
pub const MAX_SCHEDULE_HOURS: u32 = 8784;
pub const DEFAULT_GENERATOR_NAME: &str = "m3u-curator";

// Dedup defaults
pub const DEFAULT_DEDUPE_SINGLE_SOURCE: bool = false;

// File defaults
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
