//! Loan terms and due-date arithmetic.

use core::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use lendbook_core::{DomainError, DomainResult, ValueObject};

/// Unit a loan term is counted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermUnit {
    Week,
    Month,
}

impl TermUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermUnit::Week => "week",
            TermUnit::Month => "month",
        }
    }
}

impl core::fmt::Display for TermUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermUnit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "weeks" => Ok(TermUnit::Week),
            "month" | "months" => Ok(TermUnit::Month),
            other => Err(DomainError::validation(format!(
                "unknown term unit '{other}' (expected week or month)"
            ))),
        }
    }
}

/// Loan duration: a count of weeks or calendar months.
///
/// Stored as text (`"3 month"`), which is also its `Display` form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Term {
    value: u32,
    unit: TermUnit,
}

impl ValueObject for Term {}

impl Term {
    pub fn new(value: u32, unit: TermUnit) -> Self {
        Self { value, unit }
    }

    pub fn weeks(value: u32) -> Self {
        Self::new(value, TermUnit::Week)
    }

    pub fn months(value: u32) -> Self {
        Self::new(value, TermUnit::Month)
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn unit(&self) -> TermUnit {
        self.unit
    }

    /// Date this term ends when started on `start`.
    pub fn end_from(&self, start: NaiveDate) -> DomainResult<NaiveDate> {
        add_term(start, self.value, self.unit)
    }
}

impl core::fmt::Display for Term {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

impl FromStr for Term {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let (Some(value), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(DomainError::validation(format!(
                "term '{s}' must look like '<count> <unit>'"
            )));
        };

        let value = value
            .parse::<u32>()
            .map_err(|e| DomainError::validation(format!("term count '{value}': {e}")))?;

        Ok(Self::new(value, unit.parse()?))
    }
}

impl TryFrom<String> for Term {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Term> for String {
    fn from(value: Term) -> Self {
        value.to_string()
    }
}

/// Add `value` weeks or calendar months to `date`.
///
/// Weeks are exactly seven days each. Months roll over year boundaries and
/// clamp to the last day of a shorter target month (Jan 31 + 1 month is the
/// last day of February).
pub fn add_term(date: NaiveDate, value: u32, unit: TermUnit) -> DomainResult<NaiveDate> {
    let shifted = match unit {
        TermUnit::Week => date.checked_add_days(Days::new(u64::from(value) * 7)),
        TermUnit::Month => date.checked_add_months(Months::new(value)),
    };

    shifted.ok_or_else(|| {
        DomainError::validation(format!("{value} {unit} after {date} is out of range"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use proptest::prelude::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_end_clamps_to_leap_february() {
        assert_eq!(add_term(date(2024, 1, 31), 1, TermUnit::Month).unwrap(), date(2024, 2, 29));
        assert_eq!(add_term(date(2023, 1, 31), 1, TermUnit::Month).unwrap(), date(2023, 2, 28));
        assert_eq!(add_term(date(2024, 3, 31), 1, TermUnit::Month).unwrap(), date(2024, 4, 30));
    }

    #[test]
    fn months_roll_over_year_boundary() {
        assert_eq!(add_term(date(2024, 11, 15), 3, TermUnit::Month).unwrap(), date(2025, 2, 15));
        assert_eq!(add_term(date(2024, 1, 15), 1, TermUnit::Month).unwrap(), date(2024, 2, 15));
    }

    #[test]
    fn weeks_cross_month_and_year() {
        assert_eq!(add_term(date(2024, 12, 28), 1, TermUnit::Week).unwrap(), date(2025, 1, 4));
        assert_eq!(add_term(date(2024, 2, 22), 2, TermUnit::Week).unwrap(), date(2024, 3, 7));
    }

    #[test]
    fn zero_term_is_identity() {
        let d = date(2024, 5, 31);
        assert_eq!(add_term(d, 0, TermUnit::Week).unwrap(), d);
        assert_eq!(add_term(d, 0, TermUnit::Month).unwrap(), d);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let err = add_term(NaiveDate::MAX, 1, TermUnit::Month).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn term_text_form() {
        assert_eq!(Term::months(3).to_string(), "3 month");
        assert_eq!("1 month".parse::<Term>().unwrap(), Term::months(1));
        assert_eq!("2 Weeks".parse::<Term>().unwrap(), Term::weeks(2));
        assert_eq!("  4   week ".parse::<Term>().unwrap(), Term::weeks(4));
    }

    #[test]
    fn malformed_term_text_is_rejected() {
        for bad in ["", "month", "3", "three month", "3 days", "3 month extra", "-1 week"] {
            assert!(bad.parse::<Term>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn term_serializes_as_text() {
        let json = serde_json::to_string(&Term::weeks(6)).unwrap();
        assert_eq!(json, "\"6 week\"");
        let back: Term = serde_json::from_str("\"12 months\"").unwrap();
        assert_eq!(back, Term::months(12));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: n weeks is always exactly 7n days.
        #[test]
        fn weeks_are_seven_days(days_from_epoch in 0i64..60_000, n in 0u32..2_000) {
            let start = date(1970, 1, 1) + chrono::Duration::days(days_from_epoch);
            let end = add_term(start, n, TermUnit::Week).unwrap();
            prop_assert_eq!((end - start).num_days(), i64::from(n) * 7);
        }

        /// Property: adding months keeps the day-of-month unless the target
        /// month is too short, in which case it lands on that month's last day.
        #[test]
        fn months_keep_or_clamp_day(
            year in 1900i32..2200,
            month in 1u32..=12,
            day in 1u32..=31,
            n in 0u32..240,
        ) {
            prop_assume!(NaiveDate::from_ymd_opt(year, month, day).is_some());
            let start = date(year, month, day);
            let end = add_term(start, n, TermUnit::Month).unwrap();

            let months_total = (year * 12 + month as i32 - 1) + n as i32;
            prop_assert_eq!(end.year(), months_total.div_euclid(12));
            prop_assert_eq!(end.month(), months_total.rem_euclid(12) as u32 + 1);

            if end.day() != day {
                prop_assert!(end.day() < day);
                let next = end.succ_opt().unwrap();
                prop_assert_eq!(next.day(), 1);
            }
        }
    }
}
