//! Quiet hours.
//!
//! A daily window during which sound and desktop alerts are suppressed.
//! The window is half-open, `[start, end)`. When `start > end` it wraps past
//! midnight; when `start == end` it is empty.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const TIME_FORMAT: &str = "%H:%M";

/// Errors that can occur when parsing a quiet-hours boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum QuietHoursError {
    /// The input is not a 24-hour `HH:MM` time.
    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),
}

/// A daily quiet window in the user's local time.
///
/// Missing fields fall back to the default 22:00-08:00 window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuietHours {
    pub enabled: bool,
    #[serde(serialize_with = "serialize_hhmm", deserialize_with = "deserialize_hhmm")]
    pub start: NaiveTime,
    #[serde(serialize_with = "serialize_hhmm", deserialize_with = "deserialize_hhmm")]
    pub end: NaiveTime,
}

impl Default for QuietHours {
    fn default() -> Self {
        Self {
            enabled: false,
            start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(8, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl QuietHours {
    /// Build an enabled window from `HH:MM` strings.
    ///
    /// # Errors
    ///
    /// Returns an error if either boundary is not a valid `HH:MM` time.
    pub fn parse(start: &str, end: &str) -> Result<Self, QuietHoursError> {
        Ok(Self {
            enabled: true,
            start: parse_hhmm(start)?,
            end: parse_hhmm(end)?,
        })
    }

    /// Whether `time` falls inside the window, ignoring `enabled`.
    ///
    /// Seconds are truncated so the check works at minute resolution like
    /// the boundaries themselves.
    #[must_use]
    pub fn contains(&self, time: NaiveTime) -> bool {
        let time = NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time);
        if self.start <= self.end {
            self.start <= time && time < self.end
        } else {
            time >= self.start || time < self.end
        }
    }

    /// Whether quiet hours are on and `time` is inside them.
    #[must_use]
    pub fn is_active(&self, time: NaiveTime) -> bool {
        self.enabled && self.contains(time)
    }
}

/// Parse a 24-hour `HH:MM` time.
///
/// # Errors
///
/// Returns an error if the input is not a valid `HH:MM` time.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime, QuietHoursError> {
    NaiveTime::parse_from_str(s.trim(), TIME_FORMAT)
        .map_err(|_| QuietHoursError::InvalidTime(s.to_owned()))
}

fn serialize_hhmm<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format(TIME_FORMAT))
}

fn deserialize_hhmm<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse_hhmm(&raw).map_err(serde::de::Error::custom)
}
