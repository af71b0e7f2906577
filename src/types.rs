//! Cell value model shared between the row projector and the sheet writer

use chrono::{NaiveDateTime, NaiveTime, Timelike};

/// Serial value of 1970-01-01 in the 1900 date system (epoch 1899-12-30).
const UNIX_EPOCH_SERIAL: f64 = 25_569.0;

/// Uncorrected serial of 1900-03-01, the first day after the phantom
/// 1900-02-29 that the 1900 date system counts.
const LEAP_BUG_CUTOFF: f64 = 61.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Represents a single cell value in the output worksheet
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty text field; produces a value-less cell, never a zero or an error
    EmptyText,
    /// Text value, written as an inline string
    Text(String),
    /// Integer value
    Integer(i64),
    /// DateTime value, already converted to its serial date number
    DateTime(f64),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::EmptyText)
    }
}

/// Style reference carried by a cell
///
/// A cell is styled either because it sits in a header row (`Bold`) or
/// because its column carries a datetime transform (`NumberFormat`);
/// header rows are never type-converted, so the two never combine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellStyle {
    /// No formatting
    Default,
    /// Bold text for header rows
    Bold,
    /// Named number format, keyed by its format code (e.g. "dd.mm.yyyy")
    NumberFormat(String),
}

/// A cell value paired with its style reference
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

impl Cell {
    /// Create a new styled cell
    pub fn new(value: CellValue, style: CellStyle) -> Self {
        Cell { value, style }
    }

    /// Create a cell with default style
    pub fn plain(value: CellValue) -> Self {
        Cell {
            value,
            style: CellStyle::Default,
        }
    }
}

impl From<CellValue> for Cell {
    fn from(value: CellValue) -> Self {
        Cell::plain(value)
    }
}

/// Convert a parsed timestamp to its serial date number.
///
/// Uses the 1900 date system: whole days since 1899-12-30, with the time of
/// day as the fractional part. Serials before 1900-03-01 are shifted down
/// one day because the 1900 date system counts a 1900-02-29 that never
/// existed, so 1900-01-01 is serial 1.
pub fn datetime_to_serial(dt: NaiveDateTime) -> f64 {
    let serial = dt.and_utc().timestamp() as f64 / SECONDS_PER_DAY + UNIX_EPOCH_SERIAL;
    if serial < LEAP_BUG_CUTOFF {
        serial - 1.0
    } else {
        serial
    }
}

/// Convert a time of day to its serial date number: the day fraction alone,
/// with no date component.
pub fn time_to_serial(time: NaiveTime) -> f64 {
    time.num_seconds_from_midnight() as f64 / SECONDS_PER_DAY
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_serial_for_unix_epoch() {
        assert_eq!(datetime_to_serial(date(1970, 1, 1)), 25_569.0);
    }

    #[test]
    fn test_serial_for_date() {
        assert_eq!(datetime_to_serial(date(2020, 2, 1)), 43_862.0);
    }

    #[test]
    fn test_serials_around_the_phantom_leap_day() {
        assert_eq!(datetime_to_serial(date(1900, 1, 1)), 1.0);
        assert_eq!(datetime_to_serial(date(1900, 2, 28)), 59.0);
        assert_eq!(datetime_to_serial(date(1900, 3, 1)), 61.0);
    }

    #[test]
    fn test_time_serial_is_a_bare_fraction() {
        assert_eq!(time_to_serial(NaiveTime::from_hms_opt(12, 0, 0).unwrap()), 0.5);
        assert_eq!(time_to_serial(NaiveTime::MIN), 0.0);
        assert_eq!(time_to_serial(NaiveTime::from_hms_opt(6, 0, 0).unwrap()), 0.25);
    }

    #[test]
    fn test_serial_fraction_for_time_of_day() {
        let noon = NaiveDate::from_ymd_opt(2020, 2, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(datetime_to_serial(noon), 43_862.5);
    }

    #[test]
    fn test_empty_cell() {
        assert!(CellValue::EmptyText.is_empty());
        assert!(!CellValue::Integer(0).is_empty());
    }
}
