//! Append-only audit trail of messages sent between midnight and 04:59.

use chrono::Timelike;
use log::debug;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use crate::transport::InboundMessage;

pub const NIGHT_HOURS: std::ops::RangeInclusive<u32> = 0..=4;

#[derive(Debug, Clone)]
pub struct NightLog {
    path: PathBuf,
}

impl NightLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Append `msg` if it was sent during night hours. Returns whether a line was written;
    /// write errors are swallowed.
    pub fn record(&self, msg: &InboundMessage) -> bool {
        if !NIGHT_HOURS.contains(&msg.timestamp.hour()) {
            return false;
        }

        let line = format!(
            "{} - {} - {}\n",
            msg.timestamp.to_rfc3339(),
            single_line(&msg.author.name),
            single_line(&msg.content)
        );
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut f| f.write_all(line.as_bytes()));

        match written {
            Ok(()) => true,
            Err(e) => {
                debug!("Night log write to {} failed: {e}", self.path.display());
                false
            }
        }
    }
}

/// Line breaks become spaces so each message stays on one log line
fn single_line(text: &str) -> String {
    text.replace("\r\n", " ").replace(['\r', '\n'], " ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::inbound;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    #[test]
    fn test_records_only_night_hours() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("night_log.txt");
        let log = NightLog::new(&path);

        let mut at_four = inbound("ainda acordado");
        at_four.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 4, 59, 0).unwrap();
        let mut at_five = inbound("bom dia");
        at_five.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 5, 0, 0).unwrap();
        let mut at_midnight = inbound("meia noite");
        at_midnight.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();

        assert!(log.record(&at_four));
        assert!(!log.record(&at_five));
        assert!(log.record(&at_midnight));

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "2024-01-01T04:59:00+00:00 - operator - ainda acordado");
    }

    #[test]
    fn test_multiline_message_stays_on_one_line() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("night_log.txt");
        let log = NightLog::new(&path);
        let mut msg = inbound("linha um\nlinha dois\r\nlinha três");
        msg.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 2, 0, 0).unwrap();

        assert!(log.record(&msg));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "2024-01-01T02:00:00+00:00 - operator - linha um linha dois linha três\n"
        );
    }

    #[test]
    fn test_unwritable_log_is_swallowed() {
        let log = NightLog::new("/nonexistent-dir/night_log.txt");
        let mut msg = inbound("x");
        msg.timestamp = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        assert!(!log.record(&msg));
    }
}
