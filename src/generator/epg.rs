//! Placeholder XMLTV schedule synthesis
//!
//! Players that need a guide entry for every channel get one here: each
//! channel with an id receives back-to-back programme blocks titled after the
//! channel itself, starting at the current hour and covering the configured
//! horizon. No real programme data is involved.

use chrono::{DateTime, TimeDelta, Utc};
use quick_xml::escape::escape;
use std::collections::HashSet;
use tracing::{debug, info};

use crate::config::ScheduleConfig;
use crate::errors::{AppError, AppResult};
use crate::models::{ChannelRecord, ScheduleChannel, ScheduleDocument, ScheduleEntry};
use crate::utils::time::{format_xmltv_time, truncate_to_hour};

/// Language tag applied to programme titles and descriptions
const PROGRAMME_LANG: &str = "en";

/// Synthesize a schedule anchored at the current hour
pub fn synthesize_schedule(
    records: &[ChannelRecord],
    config: &ScheduleConfig,
) -> AppResult<ScheduleDocument> {
    synthesize_schedule_at(records, config, Utc::now())
}

/// Synthesize a schedule anchored at the hour containing `now`
pub fn synthesize_schedule_at(
    records: &[ChannelRecord],
    config: &ScheduleConfig,
    now: DateTime<Utc>,
) -> AppResult<ScheduleDocument> {
    config.validate()?;

    let anchor = truncate_to_hour(now);
    let block = TimeDelta::hours(i64::from(config.block_hours));
    let block_count = config.block_count();

    let mut document = ScheduleDocument {
        generator_name: config.generator_name.clone(),
        ..Default::default()
    };
    let mut scheduled_ids = HashSet::new();
    let mut skipped_without_id = 0;

    for record in records {
        let Some(channel_id) = record.schedule_id() else {
            skipped_without_id += 1;
            continue;
        };
        if !scheduled_ids.insert(channel_id) {
            debug!("Channel id '{}' already scheduled; skipping '{}'", channel_id, record.name);
            continue;
        }

        let display_name = record.label().to_string();
        document.channels.push(ScheduleChannel {
            id: channel_id.to_string(),
            display_name: display_name.clone(),
            icon: record.logo_url.clone().filter(|logo| !logo.is_empty()),
        });

        let mut start = anchor;
        for _ in 0..block_count {
            let stop = start.checked_add_signed(block).ok_or_else(|| {
                AppError::configuration(format!(
                    "schedule of {} hours from {} exceeds the representable time range",
                    config.horizon_hours, anchor
                ))
            })?;
            document.programmes.push(ScheduleEntry {
                channel_id: channel_id.to_string(),
                start,
                stop,
                title: display_name.clone(),
                description: format!("Continuous streaming of {display_name}"),
            });
            start = stop;
        }
    }

    info!(
        "Synthesized schedule: channels={} programmes={} blocks_per_channel={} skipped_without_id={}",
        document.channels.len(),
        document.programmes.len(),
        block_count,
        skipped_without_id
    );

    Ok(document)
}

impl ScheduleDocument {
    /// Render as an XMLTV document; channel declarations precede programmes
    pub fn to_xmltv(&self) -> String {
        let mut xmltv = String::new();

        xmltv.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xmltv.push_str("<!DOCTYPE tv SYSTEM \"xmltv.dtd\">\n");
        xmltv.push_str(&format!(
            "<tv generator-info-name=\"{}\">\n",
            escape(self.generator_name.as_str())
        ));

        for channel in &self.channels {
            xmltv.push_str(&format!("  <channel id=\"{}\">\n", escape(channel.id.as_str())));
            xmltv.push_str(&format!(
                "    <display-name>{}</display-name>\n",
                escape(channel.display_name.as_str())
            ));
            if let Some(icon) = &channel.icon {
                xmltv.push_str(&format!("    <icon src=\"{}\" />\n", escape(icon.as_str())));
            }
            xmltv.push_str("  </channel>\n");
        }

        for programme in &self.programmes {
            xmltv.push_str(&format!(
                "  <programme start=\"{}\" stop=\"{}\" channel=\"{}\">\n",
                format_xmltv_time(&programme.start),
                format_xmltv_time(&programme.stop),
                escape(programme.channel_id.as_str())
            ));
            xmltv.push_str(&format!(
                "    <title lang=\"{PROGRAMME_LANG}\">{}</title>\n",
                escape(programme.title.as_str())
            ));
            xmltv.push_str(&format!(
                "    <desc lang=\"{PROGRAMME_LANG}\">{}</desc>\n",
                escape(programme.description.as_str())
            ));
            xmltv.push_str("  </programme>\n");
        }

        xmltv.push_str("</tv>\n");
        xmltv
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config(horizon_hours: u32, block_hours: u32) -> ScheduleConfig {
        ScheduleConfig {
            horizon_hours,
            block_hours,
            ..Default::default()
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 37, 12).unwrap()
    }

    #[test]
    fn test_blocks_are_contiguous_from_truncated_hour() {
        let records = vec![ChannelRecord::new("One").with_id("one")];
        let document = synthesize_schedule_at(&records, &config(48, 1), now()).unwrap();

        assert_eq!(document.channels.len(), 1);
        assert_eq!(document.programmes.len(), 48);

        let anchor = Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap();
        assert_eq!(document.programmes[0].start, anchor);
        for pair in document.programmes.windows(2) {
            assert_eq!(pair[0].stop, pair[1].start);
        }
        assert_eq!(
            document.programmes[47].stop,
            anchor + TimeDelta::hours(48)
        );
    }

    #[test]
    fn test_block_count_rounds_up() {
        let records = vec![ChannelRecord::new("One").with_id("one")];
        let document = synthesize_schedule_at(&records, &config(5, 2), now()).unwrap();
        assert_eq!(document.programmes.len(), 3);
        assert_eq!(
            document.programmes[2].stop - document.programmes[0].start,
            TimeDelta::hours(6)
        );
    }

    #[test]
    fn test_channels_without_id_and_duplicates_are_skipped() {
        let records = vec![
            ChannelRecord::new("No id"),
            ChannelRecord::new("Empty id").with_id(""),
            ChannelRecord::new("First").with_id("dup"),
            ChannelRecord::new("Second").with_id("dup"),
            ChannelRecord::new("Other").with_id("other"),
        ];
        let document = synthesize_schedule_at(&records, &config(2, 1), now()).unwrap();

        let ids: Vec<&str> = document.channels.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["dup", "other"]);
        assert_eq!(document.channels[0].display_name, "First");
        assert_eq!(document.programmes.len(), 4);
        assert_eq!(document.programmes[0].description, "Continuous streaming of First");
    }

    #[test]
    fn test_zero_block_size_is_rejected() {
        let records = vec![ChannelRecord::new("One").with_id("one")];
        assert!(synthesize_schedule_at(&records, &config(48, 0), now()).is_err());
        assert!(synthesize_schedule_at(&records, &config(0, 1), now()).is_err());
    }

    #[test]
    fn test_oversized_horizon_is_rejected() {
        let records = vec![ChannelRecord::new("One").with_id("one")];
        let err = synthesize_schedule_at(&records, &config(4_000_000_000, 1_000_000_000), now())
            .unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn test_block_past_representable_range_is_an_error() {
        let records = vec![ChannelRecord::new("One").with_id("one")];
        let near_end = DateTime::<Utc>::MAX_UTC - TimeDelta::minutes(30);
        let err = synthesize_schedule_at(&records, &config(2, 1), near_end).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }

    #[test]
    fn test_xmltv_rendering() {
        let records = vec![ChannelRecord::new("Tom & Jerry")
            .with_id("tj.us")
            .with_logo("http://logo/tj.png?a=1&b=2")];
        let document = synthesize_schedule_at(&records, &config(1, 1), now()).unwrap();
        let xmltv = document.to_xmltv();

        assert!(xmltv.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(xmltv.contains("<tv generator-info-name=\"m3u-curator\">"));
        assert!(xmltv.contains("<display-name>Tom &amp; Jerry</display-name>"));
        assert!(xmltv.contains("<icon src=\"http://logo/tj.png?a=1&amp;b=2\" />"));
        assert!(xmltv.contains(
            "<programme start=\"20240501100000 +0000\" stop=\"20240501110000 +0000\" channel=\"tj.us\">"
        ));
        assert!(xmltv.contains("<title lang=\"en\">Tom &amp; Jerry</title>"));
        assert!(xmltv.ends_with("</tv>\n"));

        // All channel declarations come before the first programme
        let last_channel = xmltv.rfind("</channel>").unwrap();
        let first_programme = xmltv.find("<programme").unwrap();
        assert!(last_channel < first_programme);
    }

    #[test]
    fn test_xmltv_is_well_formed() {
        use quick_xml::events::Event;
        use quick_xml::Reader;

        let records = vec![
            ChannelRecord::new("Tom & Jerry <HD>")
                .with_id("tj.us")
                .with_logo("http://logo/tj.png?a=1&b=\"2\""),
            ChannelRecord::new("R'n'B").with_id("rnb&soul"),
        ];
        let document = synthesize_schedule_at(&records, &config(3, 1), now()).unwrap();
        let xmltv = document.to_xmltv();

        let mut reader = Reader::from_str(&xmltv);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<String> = Vec::new();
        let mut channel_ids = Vec::new();
        let mut programme_channels = Vec::new();
        let mut display_names = Vec::new();
        let mut icons = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    for attr in e.attributes() {
                        let attr = attr.unwrap();
                        let value = attr.unescape_value().unwrap().into_owned();
                        match (name.as_str(), attr.key.as_ref()) {
                            ("channel", b"id") => channel_ids.push(value),
                            ("programme", b"channel") => programme_channels.push(value),
                            _ => {}
                        }
                    }
                    stack.push(name);
                }
                Ok(Event::Empty(e)) => {
                    assert_eq!(e.name().as_ref(), b"icon");
                    assert_eq!(stack.last().map(String::as_str), Some("channel"));
                    for attr in e.attributes() {
                        let attr = attr.unwrap();
                        if attr.key.as_ref() == b"src" {
                            icons.push(attr.unescape_value().unwrap().into_owned());
                        }
                    }
                }
                Ok(Event::End(e)) => {
                    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                    assert_eq!(stack.pop(), Some(name));
                }
                Ok(Event::Text(e)) => {
                    if stack.last().map(String::as_str) == Some("display-name") {
                        display_names.push(e.unescape().unwrap().into_owned());
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => panic!("XML parsing error: {e}"),
                _ => {}
            }
        }

        assert!(stack.is_empty());
        assert_eq!(channel_ids, vec!["tj.us", "rnb&soul"]);
        assert_eq!(display_names, vec!["Tom & Jerry <HD>", "R'n'B"]);
        assert_eq!(icons, vec!["http://logo/tj.png?a=1&b=\"2\""]);
        assert_eq!(programme_channels.len(), 6);
        assert!(programme_channels.iter().all(|id| channel_ids.contains(id)));
    }

    #[test]
    fn test_empty_schedule() {
        let document = synthesize_schedule_at(&[], &config(48, 1), now()).unwrap();
        assert!(document.channels.is_empty());
        let xmltv = document.to_xmltv();
        assert!(xmltv.contains("<tv generator-info-name=\"m3u-curator\">\n</tv>\n"));
    }
}
