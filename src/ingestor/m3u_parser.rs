//! Extended M3U playlist parser
//!
//! The input is tokenized line by line into chunks, each anchored at an
//! `#EXTINF` metadata line and running until the next one. Every chunk yields
//! at most one [`ChannelRecord`]:
//!
//! ```text
//! #EXTINF:-1 tvg-id="abc.us" group-title="News",ABC News   <- metadata
//! #http://mirror-a/abc.m3u8                                 <- alternate
//! http://primary/abc.m3u8                                   <- primary
//! ```
//!
//! Anything before the first metadata line (the `#EXTM3U` header included)
//! is ignored, and chunks whose metadata line is malformed are skipped.

use tracing::{debug, info};

use crate::models::{ChannelRecord, DISABLED_MARKER};

/// Prefix of the metadata line that opens a channel entry
pub const EXTINF_PREFIX: &str = "#EXTINF";

/// Counters collected while parsing a playlist
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStatistics {
    pub chunks: usize,
    pub records: usize,
    pub dropped_chunks: usize,
    /// Non-comment lines after the first one in a chunk; these are not kept
    pub discarded_locator_lines: usize,
}

/// One metadata line plus the non-blank lines that follow it
#[derive(Debug)]
struct PlaylistChunk<'a> {
    line_number: usize,
    metadata: &'a str,
    body: Vec<&'a str>,
}

/// Attributes and trailing title extracted from a metadata line
#[derive(Debug, Default, PartialEq, Eq)]
struct ExtinfMetadata {
    attributes: Vec<(String, String)>,
    name: String,
}

/// Parse playlist text into channel records, in source order
pub fn parse_playlist(content: &str) -> Vec<ChannelRecord> {
    parse_playlist_with_stats(content).0
}

/// Parse playlist text and report how many entries were kept or dropped
pub fn parse_playlist_with_stats(content: &str) -> (Vec<ChannelRecord>, ParseStatistics) {
    let mut stats = ParseStatistics::default();
    let mut records = Vec::new();

    for chunk in split_chunks(content) {
        stats.chunks += 1;

        let Some(metadata) = parse_extinf_line(chunk.metadata) else {
            debug!(
                "Skipping malformed EXTINF entry at line {}: {}",
                chunk.line_number, chunk.metadata
            );
            stats.dropped_chunks += 1;
            continue;
        };

        let (record, discarded) = build_record(metadata, &chunk.body);
        if discarded > 0 {
            debug!(
                "Channel '{}' at line {} has {} extra locator line(s); only the first is kept",
                record.name, chunk.line_number, discarded
            );
        }
        stats.discarded_locator_lines += discarded;
        records.push(record);
    }

    stats.records = records.len();
    info!(
        "Parsed playlist: chunks={} records={} dropped={} discarded_locators={}",
        stats.chunks, stats.records, stats.dropped_chunks, stats.discarded_locator_lines
    );

    (records, stats)
}

fn split_chunks(content: &str) -> Vec<PlaylistChunk<'_>> {
    let mut chunks = Vec::new();
    let mut current: Option<PlaylistChunk<'_>> = None;

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(EXTINF_PREFIX) {
            if let Some(chunk) = current.take() {
                chunks.push(chunk);
            }
            current = Some(PlaylistChunk {
                line_number: index + 1,
                metadata: line,
                body: Vec::new(),
            });
        } else if let Some(chunk) = current.as_mut() {
            chunk.body.push(line);
        }
    }

    if let Some(chunk) = current {
        chunks.push(chunk);
    }

    chunks
}

/// Parse `#EXTINF:<duration> key="value" ...,<name>`
///
/// Returns `None` when the prefix, the numeric duration or the separating
/// comma is missing.
fn parse_extinf_line(line: &str) -> Option<ExtinfMetadata> {
    let content = line.strip_prefix("#EXTINF:")?;
    let comma_pos = content.rfind(',')?;
    let (head, tail) = content.split_at(comma_pos);

    let head = head.trim_start();
    let duration_end = head.find(char::is_whitespace).unwrap_or(head.len());
    let (duration, attribute_block) = head.split_at(duration_end);
    if !is_duration(duration) {
        return None;
    }

    Some(ExtinfMetadata {
        attributes: parse_attributes(attribute_block),
        name: tail[1..].trim().to_string(),
    })
}

/// Optionally signed decimal: `-1`, `0`, `10.5`
fn is_duration(token: &str) -> bool {
    let unsigned = token.strip_prefix(['-', '+']).unwrap_or(token);
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    !whole.is_empty()
        && whole.bytes().all(|b| b.is_ascii_digit())
        && fraction.bytes().all(|b| b.is_ascii_digit())
}

#[derive(Clone, Copy)]
enum AttributeState {
    Key,
    Value,
}

/// Scan `key="value"` pairs; bare tokens without a quoted value are skipped
fn parse_attributes(block: &str) -> Vec<(String, String)> {
    let mut attributes = Vec::new();
    let mut key = String::new();
    let mut value = String::new();
    let mut state = AttributeState::Key;
    let mut chars = block.chars().peekable();

    while let Some(ch) = chars.next() {
        match state {
            AttributeState::Key => match ch {
                '=' if chars.peek() == Some(&'"') => {
                    chars.next();
                    state = AttributeState::Value;
                }
                c if c.is_whitespace() => key.clear(),
                c => key.push(c),
            },
            AttributeState::Value => match ch {
                '"' => {
                    let finished_value = std::mem::take(&mut value);
                    if !key.is_empty() {
                        attributes.push((std::mem::take(&mut key), finished_value));
                    }
                    state = AttributeState::Key;
                }
                c => value.push(c),
            },
        }
    }

    attributes
}

fn build_record(metadata: ExtinfMetadata, body: &[&str]) -> (ChannelRecord, usize) {
    let mut record = ChannelRecord::new(metadata.name);

    for (key, value) in metadata.attributes {
        match key.as_str() {
            "tvg-id" => record.id = Some(value),
            "tvg-name" => record.display_name = Some(value),
            "tvg-logo" => record.logo_url = Some(value),
            "group-title" => record.group_title = Some(value),
            _ => {}
        }
    }

    let mut discarded = 0;
    for line in body {
        if line.starts_with(DISABLED_MARKER) {
            record.alternate_locators.push((*line).to_string());
        } else if record.primary_locator.is_none() {
            record.primary_locator = Some((*line).to_string());
        } else {
            discarded += 1;
        }
    }

    (record, discarded)
}
