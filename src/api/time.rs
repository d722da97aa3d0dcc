//! Timestamp adapter for the OnlyOffice wire format.
//!
//! The API is asymmetric: requests carry `YYYY-MM-DDTHH:MM:SS` (seconds
//! precision, no offset) while responses carry
//! `YYYY-MM-DDTHH:MM:SS.fffffff±HH:MM` (seven fractional digits and a fixed
//! offset). Encoding drops both the fraction and the offset, so a value only
//! survives a round trip to second precision in its own offset.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, TimeZone};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Layout sent to the server.
const REQUEST_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Layout the server answers with. The fraction width is checked separately.
const RESPONSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f%:z";

/// `2006-01-02T15:04:05.0000000-07:00`
const RESPONSE_LEN: usize = 33;

/// A timestamp did not match the response layout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to parse timestamp '{input}': {reason}")]
pub struct TimeParseError {
    input: String,
    reason: String,
}

impl TimeParseError {
    fn new(input: &str, reason: impl Into<String>) -> Self {
        Self {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// A point in time as exchanged with the OnlyOffice API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ApiTime(DateTime<FixedOffset>);

impl ApiTime {
    /// The current local time.
    pub fn now() -> Self {
        Self(Local::now().fixed_offset())
    }

    /// Parse the server's response layout.
    pub fn parse(input: &str) -> Result<Self, TimeParseError> {
        check_layout(input)?;
        DateTime::parse_from_str(input, RESPONSE_FORMAT)
            .map(Self)
            .map_err(|e| TimeParseError::new(input, e.to_string()))
    }

    /// The wrapped timestamp.
    pub fn as_datetime(&self) -> &DateTime<FixedOffset> {
        &self.0
    }

    /// Whether `self` is strictly earlier than `other`.
    pub fn before(&self, other: &ApiTime) -> bool {
        self < other
    }

    /// Whether `self` is strictly later than `other`.
    pub fn after(&self, other: &ApiTime) -> bool {
        self > other
    }
}

/// Reject anything but exactly seven fractional digits followed by `±HH:MM`.
fn check_layout(input: &str) -> Result<(), TimeParseError> {
    let bytes = input.as_bytes();
    if bytes.len() != RESPONSE_LEN {
        return Err(TimeParseError::new(
            input,
            format!("expected {} characters, found {}", RESPONSE_LEN, bytes.len()),
        ));
    }
    if bytes[19] != b'.' || !bytes[20..27].iter().all(u8::is_ascii_digit) {
        return Err(TimeParseError::new(
            input,
            "expected seven fractional second digits",
        ));
    }
    if !matches!(bytes[27], b'+' | b'-') || bytes[30] != b':' {
        return Err(TimeParseError::new(input, "expected a ±HH:MM offset"));
    }
    Ok(())
}

impl<Tz: TimeZone> From<DateTime<Tz>> for ApiTime {
    fn from(value: DateTime<Tz>) -> Self {
        Self(value.fixed_offset())
    }
}

impl From<ApiTime> for DateTime<FixedOffset> {
    fn from(value: ApiTime) -> Self {
        value.0
    }
}

impl FromStr for ApiTime {
    type Err = TimeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Formats in the request layout.
impl fmt::Display for ApiTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(REQUEST_FORMAT))
    }
}

impl Serialize for ApiTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ApiTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
