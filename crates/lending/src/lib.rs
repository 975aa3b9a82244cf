//! Lending domain module.
//!
//! Loan records, due-date arithmetic, flat-interest amounts, status
//! classification and summaries, implemented purely as deterministic domain
//! logic (no IO, no clock, no storage). "Today" is always passed in.

pub mod loan;
pub mod money;
pub mod notice;
pub mod search;
pub mod status;
pub mod summary;
pub mod term;

pub use loan::{Loan, LoanId, MAX_INTEREST_RATE, MAX_PRINCIPAL, NewLoan, amount_due};
pub use money::Peso;
pub use notice::{OverdueEntry, OverdueNotice};
pub use search::{Search, search};
pub use status::{LoanStatus, classify_status, overdue};
pub use summary::{LedgerSummary, summarize};
pub use term::{Term, TermUnit, add_term};
