use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use m3u_curator::{
    config::{defaults::DEFAULT_CONFIG_FILE, Config},
    generator::{generate_playlist, synthesize_schedule},
    ingestor::{load_channel_store, parse_playlist_with_stats},
    models::ChannelRecord,
    pipeline::{build_sublists, distinct_groups, filter_by_groups, sort_by_name, VariantExpander},
};

#[derive(Parser)]
#[command(name = "m3u-curator")]
#[command(version = "0.1.0")]
#[command(about = "Curates M3U channel playlists and synthesizes placeholder XMLTV schedules")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    config: PathBuf,

    /// Log level
    #[arg(short = 'v', long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand alternate locators into variants and sort by name
    Normalize {
        /// Playlist (.m3u) or channel store (.json)
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Keep only channels in the accepted groups
    Filter {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Write one playlist per configured sublist
    Sublists {
        input: PathBuf,
        #[arg(long)]
        out_dir: PathBuf,
    },
    /// Write a placeholder XMLTV schedule
    Epg {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the distinct group titles
    Groups { input: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_filter = format!("m3u_curator={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting M3U Curator v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load_from_file(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    info!("Configuration loaded from: {}", cli.config.display());

    match cli.command {
        Command::Normalize { input, output } => {
            let records = read_records(&input).await?;
            let mut expander = VariantExpander::with_policy(config.dedup.policy());
            let records = sort_by_name(expander.expand(records));
            write_playlist(&output, &records, &config).await?;
        }
        Command::Filter { input, output } => {
            let records = read_records(&input).await?;
            let records = sort_by_name(filter_by_groups(records, &config.groups.accepted));
            write_playlist(&output, &records, &config).await?;
        }
        Command::Sublists { input, out_dir } => {
            let records = read_records(&input).await?;
            tokio::fs::create_dir_all(&out_dir)
                .await
                .with_context(|| format!("creating {}", out_dir.display()))?;
            for (name, members) in build_sublists(&records, &config.sublists) {
                let members = sort_by_name(members);
                let path = out_dir.join(format!("{name}.m3u"));
                write_playlist(&path, &members, &config).await?;
            }
        }
        Command::Epg { input, output } => {
            let records = read_records(&input).await?;
            let document = synthesize_schedule(&records, &config.schedule)?;
            write_file(&output, document.to_xmltv()).await?;
        }
        Command::Groups { input } => {
            let records = read_records(&input).await?;
            for group in distinct_groups(&records) {
                println!("{group}");
            }
        }
    }

    Ok(())
}

/// Load records from a JSON channel store or from playlist text
async fn read_records(path: &Path) -> Result<Vec<ChannelRecord>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let records = if is_json {
        load_channel_store(&content)
            .with_context(|| format!("decoding channel store {}", path.display()))?
    } else {
        let (records, stats) = parse_playlist_with_stats(&content);
        debug!("Parse statistics for {}: {:?}", path.display(), stats);
        records
    };

    info!("Loaded {} channels from {}", records.len(), path.display());
    Ok(records)
}

async fn write_playlist(path: &Path, records: &[ChannelRecord], config: &Config) -> Result<()> {
    write_file(path, generate_playlist(records, &config.playlist.epg_url)).await
}

/// Write through a temporary sibling and rename into place
async fn write_file(path: &Path, content: String) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    tokio::fs::write(&temp_path, content)
        .await
        .with_context(|| format!("writing {}", temp_path.display()))?;
    tokio::fs::rename(&temp_path, path)
        .await
        .with_context(|| format!("renaming into {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
