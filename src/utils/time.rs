//! Time helpers for schedule synthesis

use chrono::{DateTime, DurationRound, TimeDelta, Utc};

/// XMLTV timestamp layout: `YYYYMMDDhhmmss +0000`
pub const XMLTV_TIME_FORMAT: &str = "%Y%m%d%H%M%S %z";

/// Truncate an instant down to the start of its hour
pub fn truncate_to_hour(time: DateTime<Utc>) -> DateTime<Utc> {
    time.duration_trunc(TimeDelta::hours(1)).unwrap_or(time)
}

/// Format a UTC instant for XMLTV `start`/`stop` attributes
pub fn format_xmltv_time(time: &DateTime<Utc>) -> String {
    time.format(XMLTV_TIME_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_truncate_to_hour() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 17, 42, 13).unwrap();
        assert_eq!(
            truncate_to_hour(time),
            Utc.with_ymd_and_hms(2024, 3, 9, 17, 0, 0).unwrap()
        );

        let aligned = Utc.with_ymd_and_hms(2024, 3, 9, 17, 0, 0).unwrap();
        assert_eq!(truncate_to_hour(aligned), aligned);
    }

    #[test]
    fn test_format_xmltv_time() {
        let time = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(format_xmltv_time(&time), "20241231230000 +0000");
    }
}
