//! Prometheus duration strings (`1h30m`, `500ms`, ...).

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use derive_more::{Display, Error};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

const SECOND: u128 = 1_000;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;
const DAY: u128 = 24 * HOUR;

/// Units written by [`PromDuration`]'s `Display`, largest first. Days is the largest.
const DISPLAY_UNITS: [(&str, u128); 5] = [
    ("d", DAY),
    ("h", HOUR),
    ("m", MINUTE),
    ("s", SECOND),
    ("ms", 1),
];

/// A duration rendered in Prometheus duration syntax.
///
/// Formatting concatenates the non-zero day, hour, minute, second and
/// millisecond components (`1d2h`, `1s500ms`). A zero duration is `0s`;
/// sub-millisecond precision is dropped.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use promq_core::PromDuration;
///
/// let timeout = PromDuration::from(Duration::from_secs(5400));
/// assert_eq!(timeout.to_string(), "1h30m");
/// assert_eq!("1h30m".parse::<PromDuration>().expect("parse"), timeout);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PromDuration(Duration);

impl PromDuration {
    /// Wrap a standard duration.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// The wrapped duration.
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        self.0
    }
}

impl From<Duration> for PromDuration {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl From<PromDuration> for Duration {
    fn from(duration: PromDuration) -> Self {
        duration.0
    }
}

impl fmt::Display for PromDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut millis = self.0.as_millis();
        if millis == 0 {
            return f.write_str("0s");
        }

        for (unit, size) in DISPLAY_UNITS {
            let count = millis / size;
            if count > 0 {
                write!(f, "{count}{unit}")?;
                millis %= size;
            }
        }
        Ok(())
    }
}

/// Error returned when a string is not a Prometheus duration.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("invalid Prometheus duration: {input:?}")]
pub struct ParseDurationError {
    input: String,
}

impl FromStr for PromDuration {
    type Err = ParseDurationError;

    /// Parse `[0-9]+(y|w|d|h|m|s|ms)` components, e.g. `1w2d`, `90s`, `0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseDurationError {
            input: s.to_owned(),
        };

        if s == "0" {
            return Ok(Self(Duration::ZERO));
        }
        if s.is_empty() {
            return Err(invalid());
        }

        let mut rest = s;
        let mut total: u128 = 0;
        while !rest.is_empty() {
            let digits = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            if digits == 0 {
                return Err(invalid());
            }
            let (number, tail) = rest.split_at(digits);
            let unit_len = tail.find(|c: char| c.is_ascii_digit()).unwrap_or(tail.len());
            let (unit, next) = tail.split_at(unit_len);

            let count: u128 = number.parse().map_err(|_| invalid())?;
            let size = unit_millis(unit).ok_or_else(invalid)?;
            total = count
                .checked_mul(size)
                .and_then(|millis| total.checked_add(millis))
                .ok_or_else(invalid)?;
            rest = next;
        }

        let millis = u64::try_from(total).map_err(|_| invalid())?;
        Ok(Self(Duration::from_millis(millis)))
    }
}

fn unit_millis(unit: &str) -> Option<u128> {
    match unit {
        "y" => Some(365 * DAY),
        "w" => Some(7 * DAY),
        "d" => Some(DAY),
        "h" => Some(HOUR),
        "m" => Some(MINUTE),
        "s" => Some(SECOND),
        "ms" => Some(1),
        _ => None,
    }
}

impl Serialize for PromDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PromDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn display(duration: Duration) -> String {
        PromDuration::from(duration).to_string()
    }

    #[test]
    fn display_components() {
        assert_eq!(display(Duration::from_secs(30)), "30s");
        assert_eq!(display(Duration::from_secs(90)), "1m30s");
        assert_eq!(display(Duration::from_secs(3600)), "1h");
        assert_eq!(display(Duration::from_millis(1500)), "1s500ms");
        assert_eq!(display(Duration::from_secs(86_400 + 7200 + 3)), "1d2h3s");
        assert_eq!(display(Duration::from_secs(15 * 86_400)), "15d");
    }

    #[test]
    fn display_zero_and_sub_millisecond() {
        assert_eq!(display(Duration::ZERO), "0s");
        assert_eq!(display(Duration::from_micros(500)), "0s");
        assert_eq!(display(Duration::from_micros(2500)), "2ms");
    }

    #[test]
    fn parse_components() {
        let parse = |s: &str| s.parse::<PromDuration>().map(|d| d.as_duration());

        assert_eq!(parse("5m"), Ok(Duration::from_secs(300)));
        assert_eq!(parse("1h30m"), Ok(Duration::from_secs(5400)));
        assert_eq!(parse("250ms"), Ok(Duration::from_millis(250)));
        assert_eq!(parse("1w"), Ok(Duration::from_secs(7 * 86_400)));
        assert_eq!(parse("1y"), Ok(Duration::from_secs(365 * 86_400)));
        assert_eq!(parse("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", "h", "5", "5x", "1.5h", "-1s", "10 s"] {
            let err = input.parse::<PromDuration>().expect_err(input);
            assert_eq!(
                err.to_string(),
                format!("invalid Prometheus duration: {input:?}")
            );
        }
    }

    #[test]
    fn display_then_parse() {
        let original = PromDuration::from(Duration::from_millis(93_784_005));
        assert_eq!(original.to_string(), "1d2h3m4s5ms");
        assert_eq!(original.to_string().parse::<PromDuration>(), Ok(original));
    }

    #[test]
    fn serde_as_string() {
        let duration = PromDuration::from(Duration::from_secs(120));
        assert_eq!(
            serde_json::to_string(&duration).expect("encode"),
            r#""2m""#
        );
        let decoded: PromDuration = serde_json::from_str(r#""2m""#).expect("decode");
        assert_eq!(decoded, duration);
    }
}
