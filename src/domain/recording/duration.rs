//! Duration value object

use std::fmt;
use std::str::FromStr;
use std::time::Duration as StdDuration;

use crate::domain::error::DurationParseError;

/// Default safety limit on a single voice recording (60 seconds)
pub const DEFAULT_MAX_DURATION_SECS: u64 = 60;

/// Default timeout for one backend request (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Whole-second duration written as `30s`, `2m` or `1m30s`.
/// Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration {
    seconds: u64,
}

impl Duration {
    pub const fn from_secs(seconds: u64) -> Self {
        Self { seconds }
    }

    pub const fn default_max_duration() -> Self {
        Self::from_secs(DEFAULT_MAX_DURATION_SECS)
    }

    pub const fn default_request_timeout() -> Self {
        Self::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub const fn as_secs(&self) -> u64 {
        self.seconds
    }

    pub const fn as_millis(&self) -> u64 {
        self.seconds * 1000
    }

    pub const fn as_std(&self) -> StdDuration {
        StdDuration::from_secs(self.seconds)
    }
}

/// Parse one `<digits><unit>` component, returning its value in seconds
fn component_secs(digits: &str, unit: char) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value: u64 = digits.parse().ok()?;
    match unit {
        'm' => value.checked_mul(60),
        's' => Some(value),
        _ => None,
    }
}

impl FromStr for Duration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationParseError {
            input: s.to_string(),
        };
        let input = s.trim().to_lowercase();

        // Minutes must come before seconds; each unit at most once.
        let (minutes, rest) = match input.split_once('m') {
            Some((minutes, rest)) => (component_secs(minutes, 'm').ok_or_else(invalid)?, rest),
            None => (0, input.as_str()),
        };

        let seconds = match rest.strip_suffix('s') {
            Some(digits) => component_secs(digits, 's').ok_or_else(invalid)?,
            None if rest.is_empty() && input.contains('m') => 0,
            None => return Err(invalid()),
        };

        match minutes.checked_add(seconds) {
            Some(total) if total > 0 => Ok(Self::from_secs(total)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.seconds / 60, self.seconds % 60) {
            (0, secs) => write!(f, "{}s", secs),
            (mins, 0) => write!(f, "{}m", mins),
            (mins, secs) => write!(f, "{}m{}s", mins, secs),
        }
    }
}

impl Default for Duration {
    fn default() -> Self {
        Self::default_max_duration()
    }
}
