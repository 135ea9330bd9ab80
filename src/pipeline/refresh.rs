//! Re-resolving stream locators through an external resolver
//!
//! Some channels (live video pages, for example) publish short-lived stream
//! addresses that have to be looked up again before every playlist build. The
//! lookup tool lives outside this crate; it is plugged in through
//! [`LocatorResolver`].

use tracing::{info, warn};

use crate::models::ChannelRecord;

/// Resolves the current stream address for a channel
pub trait LocatorResolver {
    /// Return the fresh locator, or `None` when the channel is unavailable
    fn resolve(&self, channel: &ChannelRecord) -> Option<String>;
}

impl<F> LocatorResolver for F
where
    F: Fn(&ChannelRecord) -> Option<String>,
{
    fn resolve(&self, channel: &ChannelRecord) -> Option<String> {
        self(channel)
    }
}

/// Watch page for a video id, the usual input handed to a resolver
pub fn youtube_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={video_id}")
}

/// Replace every primary locator with a freshly resolved one
///
/// Channels the resolver cannot resolve (or resolves to an empty string) are
/// dropped from the output.
pub fn refresh_locators<R: LocatorResolver + ?Sized>(
    records: Vec<ChannelRecord>,
    resolver: &R,
) -> Vec<ChannelRecord> {
    let total = records.len();
    let mut refreshed = Vec::with_capacity(total);

    for mut record in records {
        match resolver.resolve(&record).map(|l| l.trim().to_string()) {
            Some(locator) if !locator.is_empty() => {
                record.primary_locator = Some(locator);
                refreshed.push(record);
            }
            _ => {
                warn!(
                    "[{}] {} not found; dropping channel",
                    record.id.as_deref().unwrap_or("-"),
                    record.name
                );
            }
        }
    }

    info!("Refreshed {} of {} channel locators", refreshed.len(), total);
    refreshed
}
