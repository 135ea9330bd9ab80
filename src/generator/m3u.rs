//! Extended M3U playlist generation
//!
//! Output is the inverse of [`crate::ingestor::m3u_parser`]: parsing a
//! generated playlist yields the same id, names, logo, group and locators.

use tracing::debug;

use crate::models::ChannelRecord;

/// EXTINF attributes in emission order
const ATTRIBUTE_ORDER: [&str; 4] = ["tvg-id", "tvg-name", "tvg-logo", "group-title"];

/// Renders channel records as an extended M3U playlist
#[derive(Debug, Clone, Default)]
pub struct M3uGenerator {
    /// Value of the header's `url-tvg` schedule reference
    epg_url: String,
}

impl M3uGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epg_url<S: Into<String>>(mut self, epg_url: S) -> Self {
        self.epg_url = epg_url.into();
        self
    }

    pub fn header(&self) -> String {
        format!("#EXTM3U url-tvg=\"{}\"", self.epg_url)
    }

    /// Generate playlist text for `records`, in the given order
    pub fn generate(&self, records: &[ChannelRecord]) -> String {
        let mut m3u = self.header();
        m3u.push_str("\n\n");

        for record in records {
            m3u.push_str(&extinf_line(record));
            m3u.push('\n');

            for alternate in &record.alternate_locators {
                m3u.push_str(alternate);
                m3u.push('\n');
            }

            if let Some(locator) = &record.primary_locator {
                m3u.push_str(locator);
                m3u.push('\n');
            }

            m3u.push('\n');
        }

        debug!(
            "Generated M3U playlist: channels={} bytes={}",
            records.len(),
            m3u.len()
        );
        m3u
    }
}

fn attribute_value<'a>(record: &'a ChannelRecord, key: &str) -> Option<&'a str> {
    let value = match key {
        "tvg-id" => record.id.as_deref(),
        "tvg-name" => record.display_name.as_deref(),
        "tvg-logo" => record.logo_url.as_deref(),
        "group-title" => record.group_title.as_deref(),
        _ => None,
    };
    value.filter(|v| !v.is_empty())
}

/// Build `#EXTINF:-1 key="value" ...,name`; absent attributes are omitted
pub fn extinf_line(record: &ChannelRecord) -> String {
    let mut extinf = String::from("#EXTINF:-1");

    for key in ATTRIBUTE_ORDER {
        if let Some(value) = attribute_value(record, key) {
            extinf.push_str(&format!(" {key}=\"{value}\""));
        }
    }

    extinf.push(',');
    extinf.push_str(&record.name);
    extinf
}

/// Generate a playlist with the given schedule reference in its header
pub fn generate_playlist(records: &[ChannelRecord], epg_url: &str) -> String {
    M3uGenerator::new().with_epg_url(epg_url).generate(records)
}
