use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Prefix marking a locator line as disabled (an alternate source)
pub const DISABLED_MARKER: &str = "#";

/// A single playlist entry: EXTINF metadata plus its stream locators.
///
/// Field names on the wire follow the persisted channel store, which mirrors
/// the EXTINF attribute keys (`tvg-id`, `tvg-name`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelRecord {
    #[serde(rename = "tvg-id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "tvg-name", default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(rename = "tvg-logo", default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(rename = "group-title", default, skip_serializing_if = "Option::is_none")]
    pub group_title: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub primary_locator: Option<String>,
    /// Disabled locator lines, verbatim (marker included), in source order
    #[serde(rename = "commented_urls", default)]
    pub alternate_locators: Vec<String>,
}

impl ChannelRecord {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_display_name<S: Into<String>>(mut self, display_name: S) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_logo<S: Into<String>>(mut self, logo_url: S) -> Self {
        self.logo_url = Some(logo_url.into());
        self
    }

    pub fn with_group<S: Into<String>>(mut self, group_title: S) -> Self {
        self.group_title = Some(group_title.into());
        self
    }

    pub fn with_locator<S: Into<String>>(mut self, locator: S) -> Self {
        self.primary_locator = Some(locator.into());
        self
    }

    pub fn with_alternate<S: Into<String>>(mut self, line: S) -> Self {
        self.alternate_locators.push(line.into());
        self
    }

    pub fn has_alternates(&self) -> bool {
        !self.alternate_locators.is_empty()
    }

    /// Channel id usable as a schedule reference (absent and empty ids are not)
    pub fn schedule_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }

    /// Human readable label: `name`, then `tvg-name`, then the id
    pub fn label(&self) -> &str {
        if !self.name.is_empty() {
            return &self.name;
        }
        self.display_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.id.as_deref())
            .unwrap_or_default()
    }
}

/// Strip the disabled marker and surrounding whitespace from a locator line.
///
/// Returns the value used for locator identity throughout the pipeline.
pub fn normalize_locator(line: &str) -> &str {
    let trimmed = line.trim();
    trimmed
        .strip_prefix(DISABLED_MARKER)
        .unwrap_or(trimmed)
        .trim()
}

/// Stream quality observed by an external media probe
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamQuality {
    pub working: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fps: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bitrate: Option<String>,
}

/// Channel record annotated with probe results, persisted as one flat object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbedChannel {
    #[serde(flatten)]
    pub channel: ChannelRecord,
    #[serde(flatten)]
    pub quality: StreamQuality,
}

/// Channel declaration in a synthesized schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleChannel {
    pub id: String,
    pub display_name: String,
    pub icon: Option<String>,
}

/// A synthetic programme block; `[start, stop)` in UTC
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleEntry {
    pub channel_id: String,
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub title: String,
    pub description: String,
}

/// Placeholder schedule covering every referenceable channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDocument {
    pub generator_name: String,
    pub channels: Vec<ScheduleChannel>,
    pub programmes: Vec<ScheduleEntry>,
}
