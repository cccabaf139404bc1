use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum YearParseError {
    #[error("invalid financial year '{0}': expected e.g. 2025, 2025/26 or 2025-26")]
    Malformed(String),
    #[error("invalid financial year '{input}': {start} must be followed by {expected:02}")]
    Mismatched {
        input: String,
        start: i32,
        expected: i32,
    },
}

/// UK local-government financial year (runs 1 April to 31 March).
/// The year value is the start year (e.g., 2025 = 2025/26), the year
/// council tax bills are issued for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear(pub i32);

impl FinancialYear {
    /// Financial year containing the given date
    pub fn from_date(date: NaiveDate) -> Self {
        if date.month() >= 4 {
            FinancialYear(date.year())
        } else {
            FinancialYear(date.year() - 1)
        }
    }

    /// 1 April of the start year
    pub fn start_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0, 4, 1)
    }

    /// 31 March of the following year
    pub fn end_date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.0 + 1, 3, 31)
    }

    pub fn previous(&self) -> FinancialYear {
        FinancialYear(self.0 - 1)
    }

    /// Display as "2025/26" format
    pub fn display(&self) -> String {
        format!("{}/{:02}", self.0, (self.0 + 1).rem_euclid(100))
    }
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl FromStr for FinancialYear {
    type Err = YearParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        let malformed = || YearParseError::Malformed(s.to_string());

        let (start, suffix) = match input.split_once(['/', '-']) {
            Some((start, suffix)) => (start, Some(suffix)),
            None => (input, None),
        };
        if start.len() != 4 {
            return Err(malformed());
        }
        let start: i32 = start.parse().map_err(|_| malformed())?;

        if let Some(suffix) = suffix {
            if suffix.len() != 2 {
                return Err(malformed());
            }
            let suffix: i32 = suffix.parse().map_err(|_| malformed())?;
            let expected = (start + 1).rem_euclid(100);
            if suffix != expected {
                return Err(YearParseError::Mismatched {
                    input: s.to_string(),
                    start,
                    expected,
                });
            }
        }
        Ok(FinancialYear(start))
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = YearParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FinancialYear> for String {
    fn from(year: FinancialYear) -> Self {
        year.display()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn financial_year_from_date_before_april() {
        // 31 March 2025 is in 2024/25
        let date = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap();
        assert_eq!(FinancialYear::from_date(date), FinancialYear(2024));
    }

    #[test]
    fn financial_year_from_date_on_april_1() {
        let date = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        assert_eq!(FinancialYear::from_date(date), FinancialYear(2025));
    }

    #[test]
    fn financial_year_from_date_december() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(FinancialYear::from_date(date), FinancialYear(2025));
    }

    #[test]
    fn financial_year_display() {
        assert_eq!(FinancialYear(2024).display(), "2024/25");
        assert_eq!(FinancialYear(2025).display(), "2025/26");
        assert_eq!(FinancialYear(1999).display(), "1999/00");
    }

    #[test]
    fn financial_year_start_end_dates() {
        let year = FinancialYear(2025);
        assert_eq!(year.start_date(), NaiveDate::from_ymd_opt(2025, 4, 1));
        assert_eq!(year.end_date(), NaiveDate::from_ymd_opt(2026, 3, 31));
    }

    #[test]
    fn parse_accepted_forms() {
        assert_eq!("2025".parse::<FinancialYear>(), Ok(FinancialYear(2025)));
        assert_eq!("2025/26".parse::<FinancialYear>(), Ok(FinancialYear(2025)));
        assert_eq!("2025-26".parse::<FinancialYear>(), Ok(FinancialYear(2025)));
        assert_eq!(" 1999/00 ".parse::<FinancialYear>(), Ok(FinancialYear(1999)));
    }

    #[test]
    fn parse_rejects_mismatched_suffix() {
        assert!(matches!(
            "2025/27".parse::<FinancialYear>(),
            Err(YearParseError::Mismatched { expected: 26, .. })
        ));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("25/26".parse::<FinancialYear>().is_err());
        assert!("twenty".parse::<FinancialYear>().is_err());
        assert!("2025/2026".parse::<FinancialYear>().is_err());
        assert!("".parse::<FinancialYear>().is_err());
    }

    #[test]
    fn serde_uses_display_form() {
        let json = serde_json::to_string(&FinancialYear(2025)).unwrap();
        assert_eq!(json, "\"2025/26\"");
        let year: FinancialYear = serde_json::from_str("\"2024\"").unwrap();
        assert_eq!(year, FinancialYear(2024));
    }
}
