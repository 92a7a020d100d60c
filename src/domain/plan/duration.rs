//! Billing period length as a calendar offset.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp, ValidationError};

/// Calendar unit for a plan duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationUnit {
    Day,
    Week,
    Month,
    Year,
}

impl DurationUnit {
    fn suffix(&self) -> char {
        match self {
            DurationUnit::Day => 'd',
            DurationUnit::Week => 'w',
            DurationUnit::Month => 'm',
            DurationUnit::Year => 'y',
        }
    }
}

/// Length of one billing period, e.g. `"1m"` or `"2w"`.
///
/// Stored as a positive count plus a calendar unit. Months and years are
/// calendar offsets, not fixed seconds: one month from Jan 31 lands on
/// Feb 28/29, matching the host calendar's month-end policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlanDuration {
    count: u32,
    unit: DurationUnit,
}

impl PlanDuration {
    /// Creates a duration from a count and unit.
    ///
    /// The count must be positive.
    pub fn new(count: u32, unit: DurationUnit) -> Result<Self, ValidationError> {
        if count == 0 {
            return Err(ValidationError::below_minimum("duration", 1, 0));
        }
        Ok(Self { count, unit })
    }

    /// One calendar month; the most common plan duration.
    pub fn months(count: u32) -> Result<Self, ValidationError> {
        Self::new(count, DurationUnit::Month)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn unit(&self) -> DurationUnit {
        self.unit
    }

    /// Returns the end of a period starting at `start`.
    ///
    /// # Errors
    ///
    /// Only fails on calendar overflow (dates beyond the representable range).
    pub fn add_to(&self, start: Timestamp) -> Result<Timestamp, DomainError> {
        let end = match self.unit {
            DurationUnit::Day => Some(start.add_days(self.count as i64)),
            DurationUnit::Week => Some(start.add_weeks(self.count as i64)),
            DurationUnit::Month => start.add_months(self.count),
            DurationUnit::Year => start.add_years(self.count),
        };
        end.ok_or_else(|| {
            DomainError::new(
                ErrorCode::InvalidDuration,
                format!("Adding {} to {} overflows the calendar", self, start),
            )
        })
    }
}

impl fmt::Display for PlanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, self.unit.suffix())
    }
}

impl FromStr for PlanDuration {
    type Err = ValidationError;

    /// Parses `"<count><unit>"` where unit is one of `d`, `w`, `m`, `y`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let unit = match s.chars().last() {
            Some('d') => DurationUnit::Day,
            Some('w') => DurationUnit::Week,
            Some('m') => DurationUnit::Month,
            Some('y') => DurationUnit::Year,
            _ => {
                return Err(ValidationError::invalid_format(
                    "duration",
                    format!("'{}' must end in one of d, w, m, y", s),
                ))
            }
        };
        let count: u32 = s[..s.len() - 1].parse().map_err(|_| {
            ValidationError::invalid_format(
                "duration",
                format!("'{}' must start with a positive number", s),
            )
        })?;
        Self::new(count, unit)
    }
}

impl TryFrom<String> for PlanDuration {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<PlanDuration> for String {
    fn from(d: PlanDuration) -> Self {
        d.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_each_unit() {
        assert_eq!(
            "15d".parse::<PlanDuration>().unwrap(),
            PlanDuration::new(15, DurationUnit::Day).unwrap()
        );
        assert_eq!(
            "2w".parse::<PlanDuration>().unwrap(),
            PlanDuration::new(2, DurationUnit::Week).unwrap()
        );
        assert_eq!(
            "1m".parse::<PlanDuration>().unwrap(),
            PlanDuration::new(1, DurationUnit::Month).unwrap()
        );
        assert_eq!(
            "1y".parse::<PlanDuration>().unwrap(),
            PlanDuration::new(1, DurationUnit::Year).unwrap()
        );
    }

    #[test]
    fn rejects_zero_count() {
        assert!("0m".parse::<PlanDuration>().is_err());
        assert!(PlanDuration::new(0, DurationUnit::Day).is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!("".parse::<PlanDuration>().is_err());
        assert!("m".parse::<PlanDuration>().is_err());
        assert!("1x".parse::<PlanDuration>().is_err());
        assert!("-1m".parse::<PlanDuration>().is_err());
        assert!("1.5m".parse::<PlanDuration>().is_err());
    }

    #[test]
    fn displays_in_compact_form() {
        assert_eq!("1m".parse::<PlanDuration>().unwrap().to_string(), "1m");
        assert_eq!("12w".parse::<PlanDuration>().unwrap().to_string(), "12w");
    }

    #[test]
    fn one_month_from_jan_31_lands_on_month_end() {
        let duration: PlanDuration = "1m".parse().unwrap();
        let start = Timestamp::from_ymd(2026, 1, 31).unwrap();
        let end = duration.add_to(start).unwrap();
        assert_eq!(end, Timestamp::from_ymd(2026, 2, 28).unwrap());
    }

    #[test]
    fn weeks_are_seven_days() {
        let duration: PlanDuration = "2w".parse().unwrap();
        let start = Timestamp::from_ymd(2026, 3, 1).unwrap();
        assert_eq!(
            duration.add_to(start).unwrap(),
            Timestamp::from_ymd(2026, 3, 15).unwrap()
        );
    }

    #[test]
    fn one_year_spans_a_calendar_year() {
        let duration: PlanDuration = "1y".parse().unwrap();
        let start = Timestamp::from_ymd(2026, 6, 15).unwrap();
        assert_eq!(
            duration.add_to(start).unwrap(),
            Timestamp::from_ymd(2027, 6, 15).unwrap()
        );
    }

    #[test]
    fn serde_round_trips_as_string() {
        let duration: PlanDuration = "3m".parse().unwrap();
        let json = serde_json::to_string(&duration).unwrap();
        assert_eq!(json, "\"3m\"");
        let back: PlanDuration = serde_json::from_str(&json).unwrap();
        assert_eq!(back, duration);
    }
}
