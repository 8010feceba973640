//! Time-of-day handling for timetables.
//!
//! Timetables express times as "HH:MM:SS" strings measured from midnight of
//! the service day. Trips running past midnight keep counting upwards
//! ("25:10:00"), so a `TimeOfDay` is a plain number of seconds and never
//! wraps around.

use std::fmt;

/// Error returned when parsing an invalid time string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: &'static str,
}

impl TimeError {
    fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// Largest hour accepted when parsing. Service days may run into the
/// following morning, but not past a second midnight.
const MAX_HOUR: u32 = 47;

/// Seconds since midnight of the service day.
///
/// # Examples
///
/// ```
/// use transit_server::domain::TimeOfDay;
///
/// let t = TimeOfDay::parse("08:05:30").unwrap();
/// assert_eq!(t.seconds(), 8 * 3600 + 5 * 60 + 30);
/// assert_eq!(t.to_string(), "08:05:30");
///
/// // Past midnight keeps counting
/// let late = TimeOfDay::parse("25:00:00").unwrap();
/// assert_eq!(late.seconds(), 90_000);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Midnight at the start of the service day.
    pub const MIDNIGHT: TimeOfDay = TimeOfDay(0);

    /// Create a time from seconds since midnight.
    pub const fn from_seconds(seconds: u32) -> Self {
        Self(seconds)
    }

    /// Parse a time from "HH:MM:SS" (or "H:MM:SS") format.
    ///
    /// ```
    /// use transit_server::domain::TimeOfDay;
    ///
    /// assert!(TimeOfDay::parse("00:00:00").is_ok());
    /// assert!(TimeOfDay::parse("7:45:00").is_ok());
    /// assert!(TimeOfDay::parse("08:00").is_err());
    /// assert!(TimeOfDay::parse("08:60:00").is_err());
    /// assert!(TimeOfDay::parse("48:00:00").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self, TimeError> {
        let mut parts = s.split(':');
        let (Some(h), Some(m), Some(sec), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(TimeError::new(s, "expected HH:MM:SS format"));
        };

        if h.is_empty() || h.len() > 2 {
            return Err(TimeError::new(s, "hour must have one or two digits"));
        }
        let hour = parse_digits(h).ok_or_else(|| TimeError::new(s, "invalid hour digits"))?;
        if hour > MAX_HOUR {
            return Err(TimeError::new(s, "hour must be 0-47"));
        }

        if m.len() != 2 {
            return Err(TimeError::new(s, "minute must have two digits"));
        }
        let minute = parse_digits(m).ok_or_else(|| TimeError::new(s, "invalid minute digits"))?;
        if minute > 59 {
            return Err(TimeError::new(s, "minute must be 0-59"));
        }

        if sec.len() != 2 {
            return Err(TimeError::new(s, "second must have two digits"));
        }
        let second =
            parse_digits(sec).ok_or_else(|| TimeError::new(s, "invalid second digits"))?;
        if second > 59 {
            return Err(TimeError::new(s, "second must be 0-59"));
        }

        Ok(Self(hour * 3600 + minute * 60 + second))
    }

    /// Returns the number of seconds since midnight.
    pub const fn seconds(&self) -> u32 {
        self.0
    }

    /// Returns the hour, which may exceed 23 for times past midnight.
    pub fn hour(&self) -> u32 {
        self.0 / 3600
    }

    /// Returns the minute (0-59).
    pub fn minute(&self) -> u32 {
        (self.0 / 60) % 60
    }

    /// Returns the second (0-59).
    pub fn second(&self) -> u32 {
        self.0 % 60
    }

    /// Add a number of seconds, saturating at the largest representable time.
    pub fn saturating_add(&self, seconds: u32) -> Self {
        Self(self.0.saturating_add(seconds))
    }

    /// Seconds elapsed since `earlier`, or zero if `earlier` is later.
    pub fn seconds_since(&self, earlier: TimeOfDay) -> u32 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Debug for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOfDay({self})")
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hour(),
            self.minute(),
            self.second()
        )
    }
}

/// Parse a short run of ASCII digits.
fn parse_digits(s: &str) -> Option<u32> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_times() {
        let t = TimeOfDay::parse("00:00:00").unwrap();
        assert_eq!(t, TimeOfDay::MIDNIGHT);

        let t = TimeOfDay::parse("08:00:00").unwrap();
        assert_eq!(t.seconds(), 28_800);

        let t = TimeOfDay::parse("23:59:59").unwrap();
        assert_eq!(t.hour(), 23);
        assert_eq!(t.minute(), 59);
        assert_eq!(t.second(), 59);
    }

    #[test]
    fn parse_single_digit_hour() {
        let t = TimeOfDay::parse("7:05:00").unwrap();
        assert_eq!(t.seconds(), 7 * 3600 + 5 * 60);
    }

    #[test]
    fn parse_past_midnight() {
        let t = TimeOfDay::parse("25:00:00").unwrap();
        assert_eq!(t.seconds(), 90_000);
        assert_eq!(t.to_string(), "25:00:00");

        assert!(TimeOfDay::parse("47:59:59").is_ok());
    }

    #[test]
    fn reject_wrong_shape() {
        assert!(TimeOfDay::parse("").is_err());
        assert!(TimeOfDay::parse("08:00").is_err());
        assert!(TimeOfDay::parse("08:00:00:00").is_err());
        assert!(TimeOfDay::parse("080000").is_err());
        assert!(TimeOfDay::parse("123:00:00").is_err());
        assert!(TimeOfDay::parse("08:0:00").is_err());
        assert!(TimeOfDay::parse("08:00:0").is_err());
    }

    #[test]
    fn reject_non_digits() {
        assert!(TimeOfDay::parse("ab:00:00").is_err());
        assert!(TimeOfDay::parse("08:-1:00").is_err());
        assert!(TimeOfDay::parse("08:00:+1").is_err());
        assert!(TimeOfDay::parse(" 8:00:00").is_err());
    }

    #[test]
    fn reject_out_of_range() {
        assert!(TimeOfDay::parse("48:00:00").is_err());
        assert!(TimeOfDay::parse("08:60:00").is_err());
        assert!(TimeOfDay::parse("08:00:60").is_err());
    }

    #[test]
    fn error_names_input() {
        let err = TimeOfDay::parse("8am").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid time \"8am\": expected HH:MM:SS format"
        );
    }

    #[test]
    fn arithmetic() {
        let t = TimeOfDay::parse("08:15:00").unwrap();
        assert_eq!(t.saturating_add(120).to_string(), "08:17:00");
        assert_eq!(
            TimeOfDay::from_seconds(u32::MAX).saturating_add(1),
            TimeOfDay::from_seconds(u32::MAX)
        );

        let earlier = TimeOfDay::parse("08:00:00").unwrap();
        assert_eq!(t.seconds_since(earlier), 900);
        assert_eq!(earlier.seconds_since(t), 0);
    }

    #[test]
    fn ordering() {
        let a = TimeOfDay::parse("08:00:00").unwrap();
        let b = TimeOfDay::parse("08:00:01").unwrap();
        assert!(a < b);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn debug_format() {
        let t = TimeOfDay::parse("09:30:00").unwrap();
        assert_eq!(format!("{t:?}"), "TimeOfDay(09:30:00)");
    }
}
