//! Output artifacts: M3U playlists and synthetic XMLTV schedules

pub mod epg;
pub mod m3u;

pub use epg::{synthesize_schedule, synthesize_schedule_at};
pub use m3u::{extinf_line, generate_playlist, M3uGenerator};
