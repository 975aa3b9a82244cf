//! Write-through loan ledger.
//!
//! `LoanLedger` owns the ordered loan collection and composes a
//! [`KeyValueStore`]: it loads once on construction, applies every mutation to
//! memory first and then persists the whole collection before returning.
//!
//! ```text
//! mutation
//!   ↓
//! 1. Validate (pure domain, no state touched on failure)
//!   ↓
//! 2. Apply to the in-memory collection
//!   ↓
//! 3. Serialize the collection and `set` it under the ledger key
//! ```
//!
//! If step 3 fails the in-memory state keeps the mutation and the caller gets
//! `LedgerError::Storage`, so it can warn that the change is not durable yet.
//! A later successful mutation or `flush()` writes it out.

use chrono::NaiveDate;
use serde_json::value::RawValue;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use lendbook_core::DomainError;
use lendbook_lending::{
    LedgerSummary, Loan, LoanId, NewLoan, OverdueNotice, Search, overdue, search, summarize,
};

use crate::store::{KeyValueStore, StorageError};

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Loan input was rejected; nothing changed.
    #[error("invalid loan: {0}")]
    Validation(String),

    /// No loan with this id (stale id from an earlier render, or a bug).
    #[error("loan {0} not found")]
    NotFound(LoanId),

    /// The mutation was applied in memory but could not be saved.
    #[error("ledger change not saved: {0}")]
    Storage(#[from] StorageError),

    /// The collection could not be serialized.
    #[error("failed to encode ledger: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<DomainError> for LedgerError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::Validation(msg)
            | DomainError::InvariantViolation(msg)
            | DomainError::InvalidId(msg) => LedgerError::Validation(msg),
            DomainError::NotFound => LedgerError::Validation("referenced record not found".into()),
        }
    }
}

impl LedgerError {
    /// Whether the in-memory ledger holds a change the store does not.
    pub fn is_unsaved_change(&self) -> bool {
        matches!(self, LedgerError::Storage(_) | LedgerError::Encode(_))
    }
}

/// How the ledger found its stored state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored under the key yet.
    Empty,
    /// Every stored loan was read back.
    Restored { loans: usize },
    /// Some stored records could not be read and were left out.
    ///
    /// The stored value as found is copied to `backup_key` before the ledger
    /// rewrites its own key, so the skipped records can still be repaired.
    Partial {
        loans: usize,
        skipped: usize,
        backup_key: String,
    },
    /// The stored value is not a list of records; the ledger started empty.
    ///
    /// The value is copied to `backup_key`. The original key keeps it until
    /// the first mutation overwrites it.
    Recovered { reason: String, backup_key: String },
}

/// Key the unreadable payload of `key` is copied to.
pub fn backup_key(key: &str) -> String {
    format!("{key}_backup")
}

/// Ordered loan collection with write-through persistence.
#[derive(Debug)]
pub struct LoanLedger<S> {
    store: S,
    key: String,
    loans: Vec<Loan>,
    outcome: LoadOutcome,
}

impl<S> LoanLedger<S>
where
    S: KeyValueStore,
{
    /// Load the ledger stored under `key`.
    ///
    /// Records are decoded one at a time: unreadable ones are skipped with a
    /// warning, and an unparsable value yields an empty ledger. In both cases
    /// the value as found is first copied under [`backup_key`]. Check
    /// [`load_outcome`](Self::load_outcome) to tell the cases apart.
    ///
    /// When the readable records are not stored in their current form (ids
    /// assigned to legacy records, derived return dates, skipped records) they
    /// are written back once, so ids stay stable across restarts.
    ///
    /// A failing store read, or a failing backup write, is an error.
    pub fn load(store: S, key: impl Into<String>) -> Result<Self, LedgerError> {
        let key = key.into();

        let Some(text) = store.get(&key)? else {
            info!(key = %key, "no stored ledger; starting empty");
            return Ok(Self {
                store,
                key,
                loans: Vec::new(),
                outcome: LoadOutcome::Empty,
            });
        };

        let (loans, outcome) = decode(&key, &text);

        if matches!(
            outcome,
            LoadOutcome::Partial { .. } | LoadOutcome::Recovered { .. }
        ) {
            let backup = backup_key(&key);
            store.set(&backup, &text).map_err(|e| {
                error!(key = %backup, error = %e, "failed to back up unreadable ledger");
                LedgerError::from(e)
            })?;
            warn!(key = %key, backup = %backup, "unreadable ledger copied aside");
        }

        let ledger = Self {
            store,
            key,
            loans,
            outcome,
        };

        if !matches!(ledger.outcome, LoadOutcome::Recovered { .. }) {
            ledger.normalize(&text);
        }

        info!(
            key = %ledger.key,
            loans = ledger.loans.len(),
            outcome = ?ledger.outcome,
            "ledger loaded"
        );
        Ok(ledger)
    }

    pub fn load_outcome(&self) -> &LoadOutcome {
        &self.outcome
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn loans(&self) -> &[Loan] {
        &self.loans
    }

    pub fn len(&self) -> usize {
        self.loans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loans.is_empty()
    }

    pub fn get(&self, id: LoanId) -> Option<&Loan> {
        self.loans.iter().find(|loan| loan.id_typed() == id)
    }

    /// Validate and append a new loan, then persist.
    pub fn add_loan(&mut self, cmd: NewLoan) -> Result<Loan, LedgerError> {
        let loan = Loan::issue(LoanId::generate(), &cmd).map_err(|e| {
            debug!(error = %e, "rejected new loan");
            LedgerError::from(e)
        })?;

        self.loans.push(loan.clone());
        info!(
            loan_id = %loan.id_typed(),
            return_date = %loan.return_date(),
            "loan added"
        );

        self.persist()?;
        Ok(loan)
    }

    /// Mark a loan paid, then persist. Already-paid loans are left alone.
    pub fn mark_paid(&mut self, id: LoanId) -> Result<(), LedgerError> {
        let loan = self
            .loans
            .iter_mut()
            .find(|loan| loan.id_typed() == id)
            .ok_or(LedgerError::NotFound(id))?;

        if !loan.mark_paid() {
            debug!(loan_id = %id, "loan already paid");
            return Ok(());
        }

        info!(loan_id = %id, "loan marked paid");
        self.persist()
    }

    /// Remove a loan, then persist. Remaining loans keep their order.
    pub fn remove_loan(&mut self, id: LoanId) -> Result<Loan, LedgerError> {
        let index = self
            .loans
            .iter()
            .position(|loan| loan.id_typed() == id)
            .ok_or(LedgerError::NotFound(id))?;

        let removed = self.loans.remove(index);
        info!(loan_id = %id, "loan removed");

        self.persist()?;
        Ok(removed)
    }

    /// Loans whose borrower name contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Search<'_> {
        search(&self.loans, query)
    }

    /// Unpaid loans past their return date, in ledger order.
    pub fn list_overdue(&self, today: NaiveDate) -> impl Iterator<Item = &Loan> + Clone + '_ {
        overdue(&self.loans, today)
    }

    /// Notice to show once at startup, if anything is overdue.
    pub fn overdue_notice(&self, today: NaiveDate) -> Option<OverdueNotice> {
        OverdueNotice::from_loans(self.list_overdue(today))
    }

    /// Totals over the loans matching `query`.
    pub fn summary(&self, query: &str, today: NaiveDate) -> LedgerSummary {
        summarize(self.search(query), today)
    }

    /// Write the current collection to the store.
    pub fn flush(&self) -> Result<(), LedgerError> {
        self.persist()
    }

    /// Flush and hand back the store.
    pub fn close(self) -> Result<S, LedgerError> {
        self.persist()?;
        debug!(key = %self.key, "ledger closed");
        Ok(self.store)
    }

    /// Rewrite the stored value if it differs from the loaded collection.
    fn normalize(&self, stored: &str) {
        let current = match serde_json::to_string(&self.loans) {
            Ok(current) => current,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to encode loaded ledger");
                return;
            }
        };
        if current == stored {
            return;
        }

        match self.store.set(&self.key, &current) {
            Ok(()) => debug!(key = %self.key, "stored ledger rewritten in current form"),
            Err(e) => warn!(
                key = %self.key,
                error = %e,
                "failed to rewrite stored ledger; ids of legacy records are not saved yet"
            ),
        }
    }

    fn persist(&self) -> Result<(), LedgerError> {
        let text = serde_json::to_string(&self.loans)?;
        self.store.set(&self.key, &text).map_err(|e| {
            error!(key = %self.key, error = %e, "failed to persist ledger");
            LedgerError::from(e)
        })
    }
}

/// Decode stored `text` record by record.
fn decode(key: &str, text: &str) -> (Vec<Loan>, LoadOutcome) {
    let records = match serde_json::from_str::<Vec<Box<RawValue>>>(text) {
        Ok(records) => records,
        Err(e) => {
            warn!(
                key = %key,
                error = %e,
                bytes = text.len(),
                "stored ledger is unreadable; starting empty"
            );
            let outcome = LoadOutcome::Recovered {
                reason: e.to_string(),
                backup_key: backup_key(key),
            };
            return (Vec::new(), outcome);
        }
    };

    let mut loans = Vec::with_capacity(records.len());
    let mut skipped = 0;
    for (index, record) in records.iter().enumerate() {
        match serde_json::from_str::<Loan>(record.get()) {
            Ok(loan) => loans.push(loan),
            Err(e) => {
                warn!(key = %key, index, error = %e, "skipping unreadable loan record");
                skipped += 1;
            }
        }
    }

    let outcome = if skipped == 0 {
        LoadOutcome::Restored { loans: loans.len() }
    } else {
        LoadOutcome::Partial {
            loans: loans.len(),
            skipped,
            backup_key: backup_key(key),
        }
    };
    (loans, outcome)
}
