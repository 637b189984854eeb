//! # Print Time
//!
//! Print times are entered as hours/minutes/seconds and priced as decimal
//! hours.
//!
//! Minutes and seconds above 59 are clamped to 59, not carried into the next
//! unit: `0h 75m` is read as `0h 59m`. Converting back with
//! [`from_decimal_hours`] rounds the seconds, which can produce `60s`; that
//! value is returned as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Largest accepted minutes/seconds value
pub const MAX_SUBUNIT: u32 = 59;

/// Print time split into display units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PrintTime {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl PrintTime {
    /// Build a print time, clamping minutes and seconds to 59.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Self {
        PrintTime {
            hours,
            minutes: minutes.min(MAX_SUBUNIT),
            seconds: seconds.min(MAX_SUBUNIT),
        }
    }

    /// Decimal hours for this time
    pub fn to_decimal_hours(&self) -> f64 {
        to_decimal_hours(self.hours, self.minutes, self.seconds)
    }
}

impl fmt::Display for PrintTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {}s", self.hours, self.minutes, self.seconds)
    }
}

/// Combine hours, minutes and seconds into decimal hours.
///
/// ```rust
/// use quote_core::time::to_decimal_hours;
///
/// assert_eq!(to_decimal_hours(1, 30, 0), 1.5);
/// // 90 minutes is clamped to 59, not carried
/// assert_eq!(to_decimal_hours(0, 90, 0), 59.0 / 60.0);
/// ```
pub fn to_decimal_hours(hours: u32, minutes: u32, seconds: u32) -> f64 {
    let minutes = minutes.min(MAX_SUBUNIT);
    let seconds = seconds.min(MAX_SUBUNIT);
    f64::from(hours) + f64::from(minutes) / 60.0 + f64::from(seconds) / 3600.0
}

/// Split decimal hours into whole hours, whole minutes and rounded seconds.
///
/// Negative and NaN inputs read as zero.
pub fn from_decimal_hours(decimal: f64) -> PrintTime {
    let decimal = decimal.max(0.0);
    let hours = decimal.floor();
    let minutes_decimal = (decimal - hours) * 60.0;
    let minutes = minutes_decimal.floor();
    let seconds = ((minutes_decimal - minutes) * 60.0).round();

    // Not routed through PrintTime::new: a rounded 60s is reported unchanged
    PrintTime {
        hours: hours as u32,
        minutes: minutes as u32,
        seconds: seconds as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_decimal_hours() {
        assert_eq!(to_decimal_hours(2, 0, 0), 2.0);
        assert_eq!(to_decimal_hours(1, 30, 0), 1.5);
        assert!((to_decimal_hours(0, 0, 36) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_subunits_clamp_without_carry() {
        assert_eq!(to_decimal_hours(1, 120, 0), to_decimal_hours(1, 59, 0));
        assert_eq!(to_decimal_hours(0, 0, 300), to_decimal_hours(0, 0, 59));
        assert_eq!(PrintTime::new(3, 61, 99), PrintTime::new(3, 59, 59));
    }

    #[test]
    fn test_from_decimal_hours() {
        assert_eq!(from_decimal_hours(1.5), PrintTime::new(1, 30, 0));
        assert_eq!(from_decimal_hours(12.5), PrintTime::new(12, 30, 0));
        assert_eq!(from_decimal_hours(-3.0), PrintTime::default());
    }

    #[test]
    fn test_rounded_seconds_may_reach_sixty() {
        // 59m 59.9s rounds the seconds up to 60 without carrying into minutes
        let decimal = 59.0 / 60.0 + 59.9 / 3600.0;
        let time = from_decimal_hours(decimal);
        assert_eq!(time.hours, 0);
        assert_eq!(time.minutes, 59);
        assert_eq!(time.seconds, 60);
    }

    #[test]
    fn test_display() {
        assert_eq!(PrintTime::new(4, 5, 6).to_string(), "4h 5m 6s");
    }
}
