use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use lendbook_core::{DomainError, DomainResult, Entity, EntityId};

use crate::status::{LoanStatus, classify_status};
use crate::term::{Term, TermUnit};

/// Loan identifier, assigned once at creation and never reused.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(pub EntityId);

impl LoanId {
    pub fn generate() -> Self {
        Self(EntityId::new())
    }
}

impl core::fmt::Display for LoanId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for LoanId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Command: record a new loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLoan {
    pub name: String,
    pub principal: Decimal,
    /// Flat interest, in percent of the principal.
    pub interest_rate: Decimal,
    pub term: Term,
    pub loan_date: NaiveDate,
}

impl NewLoan {
    pub fn new(
        name: impl Into<String>,
        principal: Decimal,
        interest_rate: Decimal,
        term_value: u32,
        term_unit: TermUnit,
        loan_date: NaiveDate,
    ) -> Self {
        Self {
            name: name.into(),
            principal,
            interest_rate,
            term: Term::new(term_value, term_unit),
            loan_date,
        }
    }
}

/// Largest principal a loan may carry.
///
/// With [`MAX_INTEREST_RATE`] this keeps totals over any realistic number of
/// loans inside `Decimal` range.
pub const MAX_PRINCIPAL: Decimal = Decimal::from_parts(2_764_472_320, 232_830, 0, false, 0);

/// Largest flat interest rate, in percent.
pub const MAX_INTEREST_RATE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Flat, single-period interest: `principal + principal * rate / 100`.
///
/// Returns `None` if the amount does not fit in a `Decimal`.
pub fn amount_due(principal: Decimal, interest_rate: Decimal) -> Option<Decimal> {
    principal
        .checked_mul(interest_rate)?
        .checked_div(Decimal::ONE_HUNDRED)?
        .checked_add(principal)
}

/// A single loan record.
///
/// `return_date` is derived from `loan_date + term` when the loan is issued
/// and frozen from then on. `paid` only ever goes from false to true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "LoanRecord", into = "LoanRecord")]
pub struct Loan {
    id: LoanId,
    name: String,
    principal: Decimal,
    interest_rate: Decimal,
    term: Term,
    loan_date: NaiveDate,
    return_date: NaiveDate,
    paid: bool,
}

impl Loan {
    /// Validate `cmd` and build the loan it describes.
    pub fn issue(id: LoanId, cmd: &NewLoan) -> DomainResult<Self> {
        let name = cmd.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("borrower name must not be empty"));
        }
        if cmd.principal <= Decimal::ZERO {
            return Err(DomainError::validation("principal must be positive"));
        }
        if cmd.principal > MAX_PRINCIPAL {
            return Err(DomainError::validation(format!(
                "principal must not exceed {MAX_PRINCIPAL}"
            )));
        }
        if cmd.interest_rate < Decimal::ZERO {
            return Err(DomainError::validation("interest rate must not be negative"));
        }
        if cmd.interest_rate > MAX_INTEREST_RATE {
            return Err(DomainError::validation(format!(
                "interest rate must not exceed {MAX_INTEREST_RATE}%"
            )));
        }
        if cmd.term.value() == 0 {
            return Err(DomainError::validation("term must be at least one week or month"));
        }
        if amount_due(cmd.principal, cmd.interest_rate).is_none() {
            return Err(DomainError::validation("amount due is out of range"));
        }

        let return_date = cmd.term.end_from(cmd.loan_date)?;

        Ok(Self {
            id,
            name: name.to_string(),
            principal: cmd.principal,
            interest_rate: cmd.interest_rate,
            term: cmd.term,
            loan_date: cmd.loan_date,
            return_date,
            paid: false,
        })
    }

    pub fn id_typed(&self) -> LoanId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn principal(&self) -> Decimal {
        self.principal
    }

    pub fn interest_rate(&self) -> Decimal {
        self.interest_rate
    }

    pub fn term(&self) -> Term {
        self.term
    }

    pub fn loan_date(&self) -> NaiveDate {
        self.loan_date
    }

    pub fn return_date(&self) -> NaiveDate {
        self.return_date
    }

    pub fn is_paid(&self) -> bool {
        self.paid
    }

    /// Principal plus flat interest. Unchanged once the loan is overdue.
    pub fn amount_due(&self) -> Decimal {
        // Checked on issue and on load.
        self.principal + self.principal * self.interest_rate / Decimal::ONE_HUNDRED
    }

    pub fn status(&self, today: NaiveDate) -> LoanStatus {
        classify_status(self, today)
    }

    /// Mark the loan as paid. Returns `false` if it already was.
    pub fn mark_paid(&mut self) -> bool {
        let changed = !self.paid;
        self.paid = true;
        changed
    }

    /// Case-insensitive substring match on the borrower name.
    ///
    /// `needle` must already be lowercase.
    pub(crate) fn name_contains(&self, needle: &str) -> bool {
        needle.is_empty() || self.name.to_lowercase().contains(needle)
    }
}

impl Entity for Loan {
    type Id = LoanId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Stored shape of a loan.
///
/// Field names follow the established storage format. Amounts are written as
/// JSON numbers carrying every digit of the `Decimal`. Records written before
/// loans carried ids get a fresh one; records with a missing or blank return
/// date get it derived from `date + term`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoanRecord {
    #[serde(default = "LoanId::generate")]
    id: LoanId,
    name: String,
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    principal: Decimal,
    #[serde(rename = "interest", with = "rust_decimal::serde::arbitrary_precision")]
    interest_rate: Decimal,
    term: Term,
    #[serde(rename = "date")]
    loan_date: NaiveDate,
    #[serde(
        rename = "returnDate",
        default,
        deserialize_with = "blank_date_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    return_date: Option<NaiveDate>,
    #[serde(default)]
    paid: bool,
}

fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl TryFrom<LoanRecord> for Loan {
    type Error = DomainError;

    fn try_from(record: LoanRecord) -> Result<Self, Self::Error> {
        if record.name.trim().is_empty() {
            return Err(DomainError::invariant("stored loan has an empty borrower name"));
        }
        if record.principal <= Decimal::ZERO {
            return Err(DomainError::invariant(format!(
                "stored loan {} has a non-positive principal",
                record.id
            )));
        }
        if record.interest_rate < Decimal::ZERO {
            return Err(DomainError::invariant(format!(
                "stored loan {} has a negative interest rate",
                record.id
            )));
        }
        if record.principal > MAX_PRINCIPAL
            || record.interest_rate > MAX_INTEREST_RATE
            || amount_due(record.principal, record.interest_rate).is_none()
        {
            return Err(DomainError::invariant(format!(
                "stored loan {} has an amount out of range",
                record.id
            )));
        }

        let return_date = match record.return_date {
            Some(date) => date,
            None => record.term.end_from(record.loan_date)?,
        };
        if return_date < record.loan_date {
            return Err(DomainError::invariant(format!(
                "stored loan {} is due before it was made",
                record.id
            )));
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            principal: record.principal,
            interest_rate: record.interest_rate,
            term: record.term,
            loan_date: record.loan_date,
            return_date,
            paid: record.paid,
        })
    }
}

impl From<Loan> for LoanRecord {
    fn from(loan: Loan) -> Self {
        Self {
            id: loan.id,
            name: loan.name,
            principal: loan.principal,
            interest_rate: loan.interest_rate,
            term: loan.term,
            loan_date: loan.loan_date,
            return_date: Some(loan.return_date),
            paid: loan.paid,
        }
    }
}
