//! Aggregate totals over a set of loans.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::loan::Loan;
use crate::status::{LoanStatus, classify_status};

/// Totals shown above the loan list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Principal over every loan passed in, whatever its status.
    pub total_principal: Decimal,
    /// Amount due over loans still on track.
    pub total_to_collect: Decimal,
    /// Amount due over overdue loans.
    pub total_overdue: Decimal,
    pub paid_count: usize,
}

/// Summarize `loans` as of `today`.
///
/// Callers pass whatever set is on screen (usually a search result), so the
/// totals follow the active filter. Totals saturate at `Decimal::MAX` rather
/// than overflow.
pub fn summarize<'a, I>(loans: I, today: NaiveDate) -> LedgerSummary
where
    I: IntoIterator<Item = &'a Loan>,
{
    loans
        .into_iter()
        .fold(LedgerSummary::default(), |mut acc, loan| {
            acc.total_principal = acc.total_principal.saturating_add(loan.principal());
            match classify_status(loan, today) {
                LoanStatus::Paid => acc.paid_count += 1,
                LoanStatus::Overdue => {
                    acc.total_overdue = acc.total_overdue.saturating_add(loan.amount_due());
                }
                LoanStatus::OnTrack => {
                    acc.total_to_collect = acc.total_to_collect.saturating_add(loan.amount_due());
                }
            }
            acc
        })
}
