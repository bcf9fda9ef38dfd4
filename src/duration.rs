use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::error::TimeError;

static COLON_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+):(\d+)(?::(\d+))?$").expect("colon-form regex"));

static SUFFIX_FORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").expect("suffix-form regex")
});

/// How a countdown's units are counted and displayed.
///
/// Standard counts whole seconds. Metric counts milliseconds and displays them
/// as metric seconds with 100 seconds to the minute and 100 minutes to the hour.
/// A metric second still lasts one real second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeMode {
    Standard,
    Metric,
}

impl TimeMode {
    pub fn from_flag(metric: bool) -> Self {
        if metric { TimeMode::Metric } else { TimeMode::Standard }
    }

    /// Largest accepted countdown, in this mode's base units.
    pub fn max_units(self) -> u64 {
        match self {
            TimeMode::Standard => 99 * 3600 + 59 * 60 + 59,
            TimeMode::Metric => 999_999_000,
        }
    }

    fn max_display(self) -> &'static str {
        match self {
            TimeMode::Standard => "99:59:59",
            TimeMode::Metric => "99:99:99",
        }
    }

    /// Decomposes a count of base units into displayed hours, minutes and seconds.
    pub fn split(self, units: u64) -> Hms {
        match self {
            TimeMode::Standard => Hms {
                hours: units / 3600,
                minutes: (units % 3600) / 60,
                seconds: units % 60,
            },
            TimeMode::Metric => {
                let metric_secs = units / 1000;
                Hms {
                    hours: metric_secs / 10_000,
                    minutes: (metric_secs % 10_000) / 100,
                    seconds: metric_secs % 100,
                }
            }
        }
    }

    /// Elapsed wall-clock time in base units, truncated.
    pub fn elapsed_units(self, elapsed: std::time::Duration) -> u64 {
        match self {
            TimeMode::Standard => elapsed.as_secs(),
            TimeMode::Metric => u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Real wall-clock length of a count of base units.
    pub fn real_duration(self, units: u64) -> std::time::Duration {
        match self {
            TimeMode::Standard => std::time::Duration::from_secs(units),
            TimeMode::Metric => std::time::Duration::from_millis(units),
        }
    }

    pub fn poll_interval(self) -> std::time::Duration {
        match self {
            TimeMode::Standard => std::time::Duration::from_millis(50),
            TimeMode::Metric => std::time::Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hms {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
}

impl Hms {
    pub const ZERO: Hms = Hms { hours: 0, minutes: 0, seconds: 0 };

    /// Formats only the visible units, each zero-padded to at least two digits.
    pub fn format(&self, visibility: UnitVisibility) -> String {
        let Hms { hours, minutes, seconds } = *self;
        if visibility.hours {
            format!("{hours:02}:{minutes:02}:{seconds:02}")
        } else if visibility.minutes {
            format!("{minutes:02}:{seconds:02}")
        } else {
            format!("{seconds:02}")
        }
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(UnitVisibility::ALL))
    }
}

/// Which leading units a run displays. Fixed from the initial duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitVisibility {
    pub hours: bool,
    pub minutes: bool,
}

impl UnitVisibility {
    pub const ALL: UnitVisibility = UnitVisibility { hours: true, minutes: true };
}

/// A countdown length in the base units of its mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    pub units: u64,
    pub mode: TimeMode,
}

impl Duration {
    /// Parses `H:M:S`, `M:S` or a case-insensitive `1h30m15s` style expression.
    ///
    /// Input is always real time. In metric mode the result is that real time
    /// in milliseconds. Zero is a valid parse; see [`Duration::checked`].
    pub fn parse(input: &str, mode: TimeMode) -> Result<Self, TimeError> {
        let invalid = || TimeError::InvalidFormat(input.to_string());

        let (hours, minutes, seconds) = if input.contains(':') {
            let caps = COLON_FORM.captures(input).ok_or_else(invalid)?;
            let first = number(caps.get(1).map(|m| m.as_str()), input)?;
            let second = number(caps.get(2).map(|m| m.as_str()), input)?;
            match caps.get(3) {
                Some(third) => (first, second, number(Some(third.as_str()), input)?),
                None => (0, first, second),
            }
        } else {
            let caps = SUFFIX_FORM.captures(input).ok_or_else(invalid)?;
            if (1..=3).all(|i| caps.get(i).is_none()) {
                return Err(invalid());
            }
            (
                number(caps.get(1).map(|m| m.as_str()), input)?,
                number(caps.get(2).map(|m| m.as_str()), input)?,
                number(caps.get(3).map(|m| m.as_str()), input)?,
            )
        };

        let real_secs = hours
            .saturating_mul(3600)
            .saturating_add(minutes.saturating_mul(60))
            .saturating_add(seconds);

        let units = match mode {
            TimeMode::Standard => real_secs,
            TimeMode::Metric => real_secs.saturating_mul(1000),
        };
        Ok(Duration { units, mode })
    }

    /// Rejects zero and anything beyond the mode's maximum.
    pub fn checked(self) -> Result<Self, TimeError> {
        if self.units == 0 {
            return Err(TimeError::NotPositive);
        }
        if self.units > self.mode.max_units() {
            let mut requested = self.hms().to_string();
            if self.mode == TimeMode::Metric {
                requested.push_str(" (metric)");
            }
            return Err(TimeError::ExceedsMaximum {
                limit: self.mode.max_display().to_string(),
                requested,
            });
        }
        Ok(self)
    }

    pub fn hms(&self) -> Hms {
        self.mode.split(self.units)
    }

    pub fn visibility(&self) -> UnitVisibility {
        let hms = self.hms();
        UnitVisibility {
            hours: hms.hours > 0,
            minutes: hms.hours > 0 || hms.minutes > 0,
        }
    }

    pub fn real(&self) -> std::time::Duration {
        self.mode.real_duration(self.units)
    }

    pub fn format(&self) -> String {
        self.hms().format(self.visibility())
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}

/// Parses and range-checks user input in one step.
pub fn parse_time(input: &str, mode: TimeMode) -> Result<Duration, TimeError> {
    Duration::parse(input, mode)?.checked()
}

fn number(field: Option<&str>, input: &str) -> Result<u64, TimeError> {
    match field {
        None => Ok(0),
        Some(digits) => digits
            .parse()
            .map_err(|_| TimeError::InvalidFormat(input.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(input: &str) -> u64 {
        Duration::parse(input, TimeMode::Standard).unwrap().units
    }

    #[test]
    fn parse_hours_minutes_seconds_colon() {
        assert_eq!(secs("1:30:00"), 5400);
    }

    #[test]
    fn parse_minutes_seconds_colon() {
        assert_eq!(secs("45:30"), 2730);
    }

    #[test]
    fn parse_colon_without_field_width() {
        assert_eq!(secs("1:2:3"), 3723);
    }

    #[test]
    fn parse_hours_and_minutes() {
        assert_eq!(secs("1h30m"), 5400);
    }

    #[test]
    fn parse_seconds_only() {
        assert_eq!(secs("90s"), 90);
    }

    #[test]
    fn parse_all_components() {
        assert_eq!(secs("2h15m30s"), 8130);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(secs("1H30M"), 5400);
        assert_eq!(secs("10S"), 10);
    }

    #[test]
    fn parse_metric_returns_milliseconds() {
        let d = Duration::parse("5m", TimeMode::Metric).unwrap();
        assert_eq!(d.units, 300_000);
    }

    #[test]
    fn colon_and_suffix_forms_agree() {
        for (colon, suffix) in [("1:30:00", "1h30m"), ("0:45", "45s"), ("2:00:05", "2h5s"), ("10:00", "10m")] {
            assert_eq!(secs(colon), secs(suffix), "{colon} vs {suffix}");
        }
    }

    #[test]
    fn parse_invalid_returns_error() {
        for input in ["abc", "1x", "", "1:2:3:4", "1:a", "h5", "m"] {
            assert!(
                matches!(Duration::parse(input, TimeMode::Standard), Err(TimeError::InvalidFormat(_))),
                "{input:?} should be rejected"
            );
        }
    }

    // Trailing text after the last unit is rejected rather than ignored.
    #[test]
    fn parse_rejects_trailing_garbage() {
        assert!(Duration::parse("5mxx", TimeMode::Standard).is_err());
        assert!(Duration::parse("1h2", TimeMode::Standard).is_err());
        assert!(Duration::parse("30", TimeMode::Standard).is_err());
    }

    #[test]
    fn parse_zero_is_valid_but_not_checked() {
        let d = Duration::parse("0m", TimeMode::Standard).unwrap();
        assert_eq!(d.units, 0);
        assert_eq!(d.checked(), Err(TimeError::NotPositive));
    }

    #[test]
    fn formatted_zero_reparses_to_zero() {
        for visibility in [
            UnitVisibility::ALL,
            UnitVisibility { hours: false, minutes: true },
        ] {
            let text = Hms::ZERO.format(visibility);
            assert_eq!(secs(&text), 0, "{text}");
        }
    }

    #[test]
    fn checked_accepts_standard_maximum() {
        assert!(parse_time("99:59:59", TimeMode::Standard).is_ok());
    }

    #[test]
    fn checked_rejects_over_standard_maximum() {
        let err = parse_time("100h", TimeMode::Standard).unwrap_err();
        assert_eq!(
            err,
            TimeError::ExceedsMaximum {
                limit: "99:59:59".to_string(),
                requested: "100:00:00".to_string(),
            }
        );
    }

    #[test]
    fn checked_rejects_over_metric_maximum_in_metric_base() {
        let err = parse_time("278h", TimeMode::Metric).unwrap_err();
        match err {
            TimeError::ExceedsMaximum { limit, requested } => {
                assert_eq!(limit, "99:99:99");
                assert_eq!(requested, "100:08:00 (metric)");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn huge_numbers_saturate_into_range_error() {
        let err = parse_time("99999999999999h", TimeMode::Standard).unwrap_err();
        assert!(matches!(err, TimeError::ExceedsMaximum { .. }));
    }

    #[test]
    fn split_standard() {
        assert_eq!(
            TimeMode::Standard.split(5415),
            Hms { hours: 1, minutes: 30, seconds: 15 }
        );
    }

    #[test]
    fn split_metric_uses_base_100() {
        // 3600 real seconds = 3600 metric seconds = 0:36:00 metric
        assert_eq!(
            TimeMode::Metric.split(3_600_000),
            Hms { hours: 0, minutes: 36, seconds: 0 }
        );
    }

    #[test]
    fn visibility_standard_thresholds() {
        let vis = |s| Duration { units: s, mode: TimeMode::Standard }.visibility();
        assert_eq!(vis(59), UnitVisibility { hours: false, minutes: false });
        assert_eq!(vis(60), UnitVisibility { hours: false, minutes: true });
        assert_eq!(vis(3600), UnitVisibility::ALL);
    }

    #[test]
    fn visibility_metric_thresholds() {
        let vis = |ms| Duration { units: ms, mode: TimeMode::Metric }.visibility();
        assert_eq!(vis(99_999), UnitVisibility { hours: false, minutes: false });
        assert_eq!(vis(100_000), UnitVisibility { hours: false, minutes: true });
        assert_eq!(vis(10_000_000), UnitVisibility::ALL);
    }

    #[test]
    fn format_pads_to_minimum_width_only() {
        let hms = Hms { hours: 100, minutes: 8, seconds: 0 };
        assert_eq!(hms.format(UnitVisibility::ALL), "100:08:00");
    }

    #[test]
    fn format_seconds_only() {
        let d = Duration { units: 45, mode: TimeMode::Standard };
        assert_eq!(d.to_string(), "45");
    }

    #[test]
    fn real_duration_of_metric_is_milliseconds() {
        let d = parse_time("5m", TimeMode::Metric).unwrap();
        assert_eq!(d.real(), std::time::Duration::from_secs(300));
    }
}
