//! Media probe report handling
//!
//! The probe itself (an `ffprobe -print_format json` run) is performed by the
//! caller. This module decodes its JSON report and reduces it to the single
//! best video stream, preferring resolution and then frame rate.

use serde::Deserialize;
use tracing::debug;

use crate::errors::AppResult;
use crate::models::{ChannelRecord, ProbedChannel, StreamQuality};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeReport {
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
    #[serde(default)]
    pub format: Option<ProbeFormat>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeStream {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub avg_frame_rate: Option<String>,
    pub codec_name: Option<String>,
    pub bit_rate: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProbeFormat {
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
}

/// Candidate video stream extracted from a report
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStream {
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub codec: String,
    pub bitrate: Option<String>,
}

impl ProbeReport {
    pub fn from_json(json: &str) -> AppResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Parse an `avg_frame_rate` fraction such as `"60000/1001"`
///
/// Malformed values and zero denominators yield `0.0`. The result is rounded
/// to two decimals.
pub fn parse_frame_rate(value: &str) -> f64 {
    let Some((numerator, denominator)) = value.split_once('/') else {
        return 0.0;
    };
    match (numerator.trim().parse::<i64>(), denominator.trim().parse::<i64>()) {
        (Ok(num), Ok(den)) if den > 0 => ((num as f64 / den as f64) * 100.0).round() / 100.0,
        _ => 0.0,
    }
}

/// Pick the highest quality video stream: tallest first, then smoothest
///
/// Streams lacking either dimension (audio, data) are ignored. When several
/// streams tie, the first one in report order wins.
pub fn best_video_stream(report: &ProbeReport) -> Option<VideoStream> {
    let mut best: Option<VideoStream> = None;

    for stream in &report.streams {
        let (Some(width), Some(height)) = (stream.width, stream.height) else {
            continue;
        };

        let candidate = VideoStream {
            width,
            height,
            fps: stream
                .avg_frame_rate
                .as_deref()
                .map(parse_frame_rate)
                .unwrap_or(0.0),
            codec: stream
                .codec_name
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            bitrate: stream.bit_rate.clone(),
        };

        let better = match &best {
            None => true,
            Some(current) => {
                (candidate.height, candidate.fps)
                    .partial_cmp(&(current.height, current.fps))
                    .is_some_and(|ordering| ordering.is_gt())
            }
        };
        if better {
            best = Some(candidate);
        }
    }

    best
}

impl StreamQuality {
    /// Summarize a probe report; no video stream means the channel is not working
    pub fn from_report(report: &ProbeReport) -> Self {
        match best_video_stream(report) {
            Some(stream) => Self {
                working: true,
                width: Some(stream.width),
                height: Some(stream.height),
                fps: Some(stream.fps),
                codec: Some(stream.codec),
                bitrate: stream.bitrate,
            },
            None => Self::default(),
        }
    }
}

/// Attach probe results to a channel record
pub fn annotate(channel: ChannelRecord, report: &ProbeReport) -> ProbedChannel {
    let quality = StreamQuality::from_report(report);
    debug!(
        "Probe result for '{}': working={} height={:?} fps={:?}",
        channel.name, quality.working, quality.height, quality.fps
    );
    ProbedChannel { channel, quality }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = r#"{
        "streams": [
            {"codec_name": "aac", "bit_rate": "128000"},
            {"width": 1280, "height": 720, "avg_frame_rate": "60/1", "codec_name": "h264"},
            {"width": 1920, "height": 1080, "avg_frame_rate": "25/1", "codec_name": "h264", "bit_rate": "4500000"},
            {"width": 1920, "height": 1080, "avg_frame_rate": "30000/1001", "codec_name": "hevc"}
        ],
        "format": {"duration": "N/A", "bit_rate": "5000000"}
    }"#;

    #[test]
    fn test_parse_frame_rate() {
        assert_eq!(parse_frame_rate("60/1"), 60.0);
        assert_eq!(parse_frame_rate("30000/1001"), 29.97);
        assert_eq!(parse_frame_rate("0/0"), 0.0);
        assert_eq!(parse_frame_rate("garbage"), 0.0);
        assert_eq!(parse_frame_rate("25"), 0.0);
    }

    #[test]
    fn test_best_stream_prefers_height_then_fps() {
        let report = ProbeReport::from_json(REPORT).unwrap();
        let best = best_video_stream(&report).unwrap();
        assert_eq!(best.height, 1080);
        assert_eq!(best.fps, 29.97);
        assert_eq!(best.codec, "hevc");
    }

    #[test]
    fn test_no_video_stream_is_not_working() {
        let report = ProbeReport::from_json(r#"{"streams": [{"codec_name": "aac"}]}"#).unwrap();
        assert!(best_video_stream(&report).is_none());

        let quality = StreamQuality::from_report(&report);
        assert!(!quality.working);
        assert_eq!(quality.height, None);

        // An empty probe (tool produced no output) decodes to no streams
        let empty = ProbeReport::from_json("{}").unwrap();
        assert!(!StreamQuality::from_report(&empty).working);
    }

    #[test]
    fn test_annotate_channel() {
        let report = ProbeReport::from_json(REPORT).unwrap();
        let probed = annotate(ChannelRecord::new("HD One"), &report);
        assert!(probed.quality.working);
        assert_eq!(probed.quality.width, Some(1920));
        assert_eq!(probed.channel.name, "HD One");
    }
}
