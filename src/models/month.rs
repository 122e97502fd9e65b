//! Calendar month used by the listing filter
//!
//! A month filter selects expenses whose date lies in
//! `[first day of month, first day of next month)`.

use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// A calendar month, e.g. "2025-01"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, validating the month number
    pub fn new(year: i32, month: u32) -> Result<Self, MonthParseError> {
        if !(1..=12).contains(&month) || NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(MonthParseError::InvalidMonth(format!("{}-{:02}", year, month)));
        }
        Ok(Self { year, month })
    }

    /// The month containing today's local date
    pub fn current() -> Self {
        Self::containing(chrono::Local::now().date_naive())
    }

    /// The month containing `date`
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Get the next month, rolling December over to January
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Get the previous month, rolling January back to December
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// First day of this month (inclusive bound)
    pub fn start_date(&self) -> NaiveDate {
        first_of(self.year, self.month)
    }

    /// First day of the following month (exclusive bound)
    pub fn end_date_exclusive(&self) -> NaiveDate {
        let next = self.next();
        first_of(next.year, next.month)
    }

    /// Inclusive start and exclusive end of the month
    pub fn bounds(&self) -> (NaiveDate, NaiveDate) {
        (self.start_date(), self.end_date_exclusive())
    }

    /// Check if a date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        let (start, end) = self.bounds();
        date >= start && date < end
    }
}

// Month::new guarantees the first of the month exists; the year bound is
// chrono's supported range.
fn first_of(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    /// Parse "YYYY-MM"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| MonthParseError::InvalidFormat(s.to_string()))?;

        if year.len() != 4 || month.len() != 2 {
            return Err(MonthParseError::InvalidFormat(s.to_string()));
        }

        let year: i32 = year
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError::InvalidFormat(s.to_string()))?;

        Self::new(year, month)
    }
}

/// Error type for month parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonthParseError {
    InvalidFormat(String),
    InvalidMonth(String),
}

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat(s) => write!(f, "Invalid month '{}'. Use YYYY-MM", s),
            Self::InvalidMonth(s) => write!(f, "Month out of range: {}", s),
        }
    }
}

impl std::error::Error for MonthParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_and_display() {
        let m: Month = "2025-03".parse().unwrap();
        assert_eq!(m.year(), 2025);
        assert_eq!(m.month(), 3);
        assert_eq!(m.to_string(), "2025-03");
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!("2025-13".parse::<Month>().is_err());
        assert!("2025-00".parse::<Month>().is_err());
        assert!("2025-3".parse::<Month>().is_err());
        assert!("202503".parse::<Month>().is_err());
        assert!("".parse::<Month>().is_err());
    }

    #[test]
    fn test_bounds_mid_year() {
        let m: Month = "2025-03".parse().unwrap();
        assert_eq!(m.bounds(), (date(2025, 3, 1), date(2025, 4, 1)));
    }

    #[test]
    fn test_bounds_roll_over_year() {
        let m: Month = "2024-12".parse().unwrap();
        assert_eq!(m.bounds(), (date(2024, 12, 1), date(2025, 1, 1)));
    }

    #[test]
    fn test_contains_is_half_open() {
        let m: Month = "2024-12".parse().unwrap();
        assert!(m.contains(date(2024, 12, 1)));
        assert!(m.contains(date(2024, 12, 31)));
        assert!(!m.contains(date(2025, 1, 1)));
        assert!(!m.contains(date(2024, 11, 30)));
    }

    #[test]
    fn test_february_leap_year() {
        let m: Month = "2024-02".parse().unwrap();
        assert!(m.contains(date(2024, 2, 29)));
        assert_eq!(m.end_date_exclusive(), date(2024, 3, 1));
    }

    #[test]
    fn test_next_and_prev() {
        let dec: Month = "2024-12".parse().unwrap();
        assert_eq!(dec.next().to_string(), "2025-01");
        assert_eq!(dec.next().prev(), dec);

        let jan: Month = "2025-01".parse().unwrap();
        assert_eq!(jan.prev().to_string(), "2024-12");
    }

    #[test]
    fn test_containing() {
        assert_eq!(Month::containing(date(2023, 7, 19)).to_string(), "2023-07");
    }
}
