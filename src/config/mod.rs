use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

pub mod defaults;

use defaults::*;

use crate::errors::{AppError, AppResult};
use crate::pipeline::DedupPolicy;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playlist: PlaylistConfig,
    #[serde(default)]
    pub groups: GroupConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub dedup: DedupConfig,
    /// Output name to the channel ids it contains
    #[serde(default)]
    pub sublists: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistConfig {
    /// Schedule reference written to the playlist header (`url-tvg`)
    #[serde(default = "default_epg_url")]
    pub epg_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupConfig {
    /// Group titles kept by the group filter
    #[serde(default)]
    pub accepted: Vec<String>,
}

/// Synthetic schedule settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// How far ahead the schedule reaches
    #[serde(default = "default_horizon_hours")]
    pub horizon_hours: u32,
    /// Length of each programme block
    #[serde(default = "default_block_hours")]
    pub block_hours: u32,
    #[serde(default = "default_generator_name")]
    pub generator_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Apply locator deduplication to channels without alternates too
    #[serde(default = "default_dedupe_single_source")]
    pub dedupe_single_source: bool,
}

fn default_epg_url() -> String { DEFAULT_EPG_URL.to_string() }
fn default_horizon_hours() -> u32 { DEFAULT_HORIZON_HOURS }
fn default_block_hours() -> u32 { DEFAULT_BLOCK_HOURS }
fn default_generator_name() -> String { DEFAULT_GENERATOR_NAME.to_string() }
fn default_dedupe_single_source() -> bool { DEFAULT_DEDUPE_SINGLE_SOURCE }

impl Default for PlaylistConfig {
    fn default() -> Self {
        Self {
            epg_url: default_epg_url(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            horizon_hours: default_horizon_hours(),
            block_hours: default_block_hours(),
            generator_name: default_generator_name(),
        }
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            dedupe_single_source: default_dedupe_single_source(),
        }
    }
}

impl ScheduleConfig {
    pub fn validate(&self) -> AppResult<()> {
        if self.block_hours == 0 {
            return Err(AppError::configuration(
                "schedule.block_hours must be greater than zero",
            ));
        }
        if self.horizon_hours == 0 {
            return Err(AppError::configuration(
                "schedule.horizon_hours must be greater than zero",
            ));
        }
        if self.horizon_hours > MAX_SCHEDULE_HOURS || self.block_hours > MAX_SCHEDULE_HOURS {
            return Err(AppError::configuration(format!(
                "schedule.horizon_hours and schedule.block_hours must not exceed {MAX_SCHEDULE_HOURS}"
            )));
        }
        Ok(())
    }

    /// Blocks per channel: the horizon divided by the block size, rounded up
    pub fn block_count(&self) -> u32 {
        if self.block_hours == 0 {
            return 0;
        }
        self.horizon_hours.div_ceil(self.block_hours)
    }
}

impl DedupConfig {
    pub fn policy(&self) -> DedupPolicy {
        DedupPolicy {
            dedupe_single_source: self.dedupe_single_source,
        }
    }
}

impl Config {
    /// Check values serde cannot: schedule bounds and sublist output names
    pub fn validate(&self) -> AppResult<()> {
        self.schedule.validate()?;
        for name in self.sublists.keys() {
            if name.trim().is_empty() || name.contains(['/', '\\']) || name == ".." {
                return Err(AppError::validation(format!(
                    "sublist name '{name}' is not usable as a file name"
                )));
            }
        }
        Ok(())
    }

    /// Load `config_file`, writing the defaults there first if it does not exist
    pub fn load_from_file<P: AsRef<Path>>(config_file: P) -> AppResult<Self> {
        let config_file = config_file.as_ref();
        if config_file.exists() {
            let contents = std::fs::read_to_string(config_file)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file.display());
            Ok(default_config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_values() {
        let config = Config::default();
        assert_eq!(config.playlist.epg_url, "");
        assert!(config.groups.accepted.is_empty());
        assert_eq!(config.schedule.horizon_hours, 48);
        assert_eq!(config.schedule.block_hours, 1);
        assert_eq!(config.schedule.block_count(), 48);
        assert!(!config.dedup.dedupe_single_source);
        assert!(config.sublists.is_empty());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
            [groups]
            accepted = ["News", "Sports"]

            [schedule]
            block_hours = 2

            [sublists]
            news = ["cnn.us", "bbc.uk"]
            "#,
        )
        .unwrap();

        assert_eq!(config.groups.accepted, vec!["News", "Sports"]);
        assert_eq!(config.schedule.horizon_hours, 48);
        assert_eq!(config.schedule.block_count(), 24);
        assert_eq!(config.sublists["news"], vec!["cnn.us", "bbc.uk"]);
        assert_eq!(config.playlist, PlaylistConfig::default());
    }

    #[test]
    fn test_block_count_rounds_up() {
        let schedule = ScheduleConfig {
            horizon_hours: 25,
            block_hours: 6,
            ..Default::default()
        };
        assert_eq!(schedule.block_count(), 5);
    }

    #[test]
    fn test_schedule_upper_bound() {
        let at_limit = ScheduleConfig {
            horizon_hours: MAX_SCHEDULE_HOURS,
            block_hours: 24,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());

        let too_long = ScheduleConfig {
            horizon_hours: MAX_SCHEDULE_HOURS + 1,
            ..Default::default()
        };
        assert!(matches!(
            too_long.validate(),
            Err(AppError::Configuration { .. })
        ));

        let huge_block = ScheduleConfig {
            block_hours: 1_000_000_000,
            ..Default::default()
        };
        assert!(huge_block.validate().is_err());
    }

    #[test]
    fn test_sublist_names_must_be_file_names() {
        let mut config = Config::default();
        config.sublists.insert("news".to_string(), vec!["cnn.us".to_string()]);
        assert!(config.validate().is_ok());

        for bad in ["", "../escape", "a\\b", ".."] {
            let mut config = Config::default();
            config.sublists.insert(bad.to_string(), Vec::new());
            assert!(
                matches!(config.validate(), Err(AppError::Validation { .. })),
                "accepted sublist name {bad:?}"
            );
        }
    }

    #[test]
    fn test_load_writes_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");

        let created = Config::load_from_file(&path).unwrap();
        assert!(path.exists());
        assert_eq!(created, Config::default());

        let reloaded = Config::load_from_file(&path).unwrap();
        assert_eq!(reloaded, created);
    }

    #[test]
    fn test_load_rejects_zero_block_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[schedule]\nblock_hours = 0\n").unwrap();

        let err = Config::load_from_file(&path).unwrap_err();
        assert!(matches!(err, AppError::Configuration { .. }));
    }
}
