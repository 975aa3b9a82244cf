//! Loan status classification.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::loan::Loan;

/// Derived loan status. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    Paid,
    Overdue,
    OnTrack,
}

impl LoanStatus {
    /// Badge text shown next to a loan.
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::Paid => "PAID",
            LoanStatus::Overdue => "OVERDUE",
            LoanStatus::OnTrack => "ON TRACK",
        }
    }
}

impl core::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify `loan` as of `today`.
///
/// Paid wins over everything. An unpaid loan is overdue only once `today` is
/// strictly after its return date; a loan due today is still on track.
pub fn classify_status(loan: &Loan, today: NaiveDate) -> LoanStatus {
    if loan.is_paid() {
        LoanStatus::Paid
    } else if today > loan.return_date() {
        LoanStatus::Overdue
    } else {
        LoanStatus::OnTrack
    }
}

/// Unpaid loans past their return date as of `today`, in input order.
pub fn overdue<'a, I>(loans: I, today: NaiveDate) -> impl Iterator<Item = &'a Loan> + Clone
where
    I: IntoIterator<Item = &'a Loan>,
    I::IntoIter: Clone,
{
    loans
        .into_iter()
        .filter(move |loan| classify_status(loan, today) == LoanStatus::Overdue)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{LoanId, NewLoan};
    use crate::term::TermUnit;
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan_due(name: &str, loan_date: NaiveDate, weeks: u32) -> Loan {
        let cmd = NewLoan::new(
            name,
            Decimal::from(100),
            Decimal::from(10),
            weeks,
            TermUnit::Week,
            loan_date,
        );
        Loan::issue(LoanId::generate(), &cmd).unwrap()
    }

    #[test]
    fn due_today_is_on_track() {
        let loan = loan_due("Ana", date(2024, 1, 1), 1);
        let due = loan.return_date();

        assert_eq!(classify_status(&loan, due.pred_opt().unwrap()), LoanStatus::OnTrack);
        assert_eq!(classify_status(&loan, due), LoanStatus::OnTrack);
        assert_eq!(classify_status(&loan, due.succ_opt().unwrap()), LoanStatus::Overdue);
    }

    #[test]
    fn paid_ignores_dates() {
        let mut loan = loan_due("Ana", date(2020, 1, 1), 1);
        loan.mark_paid();
        assert_eq!(classify_status(&loan, date(2030, 1, 1)), LoanStatus::Paid);
        assert_eq!(classify_status(&loan, date(2019, 1, 1)), LoanStatus::Paid);
    }

    #[test]
    fn overdue_keeps_order_and_skips_paid() {
        let first = loan_due("first", date(2024, 1, 1), 1);
        let mut paid = loan_due("paid", date(2024, 1, 1), 1);
        paid.mark_paid();
        let current = loan_due("current", date(2024, 6, 1), 4);
        let second = loan_due("second", date(2024, 2, 1), 2);
        let loans = vec![first, paid, current, second];

        let names: Vec<&str> = overdue(&loans, date(2024, 6, 2)).map(Loan::name).collect();
        assert_eq!(names, ["first", "second"]);
    }

    #[test]
    fn labels() {
        assert_eq!(LoanStatus::Paid.label(), "PAID");
        assert_eq!(LoanStatus::Overdue.to_string(), "OVERDUE");
        assert_eq!(LoanStatus::OnTrack.label(), "ON TRACK");
    }

    proptest! {
        /// Property: status depends only on (paid, return_date, today).
        #[test]
        fn status_matches_date_comparison(
            offset in -400i64..400,
            weeks in 1u32..52,
            paid in any::<bool>(),
        ) {
            let mut loan = loan_due("prop", date(2024, 3, 10), weeks);
            if paid {
                loan.mark_paid();
            }
            let today = loan.return_date() + chrono::Duration::days(offset);

            let expected = if paid {
                LoanStatus::Paid
            } else if offset > 0 {
                LoanStatus::Overdue
            } else {
                LoanStatus::OnTrack
            };
            prop_assert_eq!(classify_status(&loan, today), expected);
        }
    }
}
