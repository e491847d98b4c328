use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Days, Duration, Months, Utc};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Unknown date unit '{0}'. Expected day, week, month or year")]
    InvalidUnit(String),
    #[error("Date computation out of range: {amount} {unit}(s) from {reference}")]
    OutOfRange {
        amount: u32,
        unit: DateUnit,
        reference: DateTime<Utc>,
    },
}

/// Calendar unit for window offsets. Parsed once at the invocation boundary;
/// all call sites work with the enum, never with raw strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Day,
    Week,
    Month,
    Year,
}

impl FromStr for DateUnit {
    type Err = RangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "day" | "days" => Ok(DateUnit::Day),
            "week" | "weeks" => Ok(DateUnit::Week),
            "month" | "months" => Ok(DateUnit::Month),
            "year" | "years" => Ok(DateUnit::Year),
            _ => Err(RangeError::InvalidUnit(s.to_string())),
        }
    }
}

impl fmt::Display for DateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DateUnit::Day => "day",
            DateUnit::Week => "week",
            DateUnit::Month => "month",
            DateUnit::Year => "year",
        };
        write!(f, "{}", name)
    }
}

/// Inclusive `[start, end]` window bounding the export query.
///
/// Computed once per run from an injected reference instant and consumed by
/// the event fetch. Shifts use calendar arithmetic, not fixed durations:
/// month and year moves clamp to the last valid day of the target month, and
/// week moves preserve the weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateWindow {
    /// Window spanning `past_amount` of `past_unit` before `reference` up to
    /// `future_amount` of `future_unit` after it. The two sides are
    /// independent and may mix units.
    pub fn compute(
        reference: DateTime<Utc>,
        past_amount: u32,
        past_unit: DateUnit,
        future_amount: u32,
        future_unit: DateUnit,
    ) -> Result<Self, RangeError> {
        let start = shift(reference, past_amount, past_unit, Direction::Backward)?;
        let end = shift(reference, future_amount, future_unit, Direction::Forward)?;
        Ok(DateWindow { start, end })
    }

    /// Convenience wrapper applying the same unit to both sides.
    pub fn compute_symmetric_units(
        reference: DateTime<Utc>,
        past_amount: u32,
        future_amount: u32,
        unit: DateUnit,
    ) -> Result<Self, RangeError> {
        Self::compute(reference, past_amount, unit, future_amount, unit)
    }

    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Backward,
    Forward,
}

fn shift(
    instant: DateTime<Utc>,
    amount: u32,
    unit: DateUnit,
    direction: Direction,
) -> Result<DateTime<Utc>, RangeError> {
    let shifted = match (unit, direction) {
        (DateUnit::Day, Direction::Backward) => instant.checked_sub_days(Days::new(amount.into())),
        (DateUnit::Day, Direction::Forward) => instant.checked_add_days(Days::new(amount.into())),
        (DateUnit::Week, Direction::Backward) => {
            instant.checked_sub_days(Days::new(u64::from(amount) * 7))
        }
        (DateUnit::Week, Direction::Forward) => {
            instant.checked_add_days(Days::new(u64::from(amount) * 7))
        }
        (DateUnit::Month, Direction::Backward) => instant.checked_sub_months(Months::new(amount)),
        (DateUnit::Month, Direction::Forward) => instant.checked_add_months(Months::new(amount)),
        (DateUnit::Year, Direction::Backward) => amount
            .checked_mul(12)
            .and_then(|months| instant.checked_sub_months(Months::new(months))),
        (DateUnit::Year, Direction::Forward) => amount
            .checked_mul(12)
            .and_then(|months| instant.checked_add_months(Months::new(months))),
    };

    shifted.ok_or(RangeError::OutOfRange {
        amount,
        unit,
        reference: instant,
    })
}
