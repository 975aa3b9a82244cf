//! Startup notification listing overdue loans.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::loan::{Loan, LoanId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueEntry {
    pub loan_id: LoanId,
    pub name: String,
    pub return_date: NaiveDate,
}

/// One blocking notice covering every overdue loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueNotice {
    entries: Vec<OverdueEntry>,
}

impl OverdueNotice {
    /// Build a notice from already-filtered overdue loans.
    ///
    /// Returns `None` when there is nothing to report.
    pub fn from_loans<'a, I>(overdue: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Loan>,
    {
        let entries: Vec<OverdueEntry> = overdue
            .into_iter()
            .map(|loan| OverdueEntry {
                loan_id: loan.id_typed(),
                name: loan.name().to_string(),
                return_date: loan.return_date(),
            })
            .collect();

        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    pub fn entries(&self) -> &[OverdueEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl core::fmt::Display for OverdueNotice {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("\u{26a0} OVERDUE LOANS:\n\n")?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{} (Due: {})", entry.name, entry.return_date.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::NewLoan;
    use crate::status::overdue;
    use crate::term::TermUnit;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(name: &str, loan_date: NaiveDate) -> Loan {
        let cmd = NewLoan::new(name, Decimal::from(50), Decimal::ZERO, 1, TermUnit::Month, loan_date);
        Loan::issue(LoanId::generate(), &cmd).unwrap()
    }

    #[test]
    fn nothing_overdue_means_no_notice() {
        let book = vec![loan("Ana", date(2024, 5, 1))];
        assert!(OverdueNotice::from_loans(overdue(&book, date(2024, 5, 2))).is_none());
    }

    #[test]
    fn renders_one_line_per_loan() {
        let book = vec![
            loan("Ana", date(2024, 1, 15)),
            loan("Ben", date(2024, 5, 1)),
            loan("Carla", date(2024, 1, 31)),
        ];
        let notice = OverdueNotice::from_loans(overdue(&book, date(2024, 3, 1))).unwrap();

        assert_eq!(notice.len(), 2);
        assert_eq!(
            notice.to_string(),
            "\u{26a0} OVERDUE LOANS:\n\nAna (Due: 2024-02-15)\nCarla (Due: 2024-02-29)"
        );
        assert_eq!(notice.entries()[1].loan_id, book[2].id_typed());
    }
}
