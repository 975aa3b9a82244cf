//! Composition root helpers: open a store, load the ledger, and compute what
//! the presentation layer needs on first render.

use anyhow::Context;
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use lendbook_lending::OverdueNotice;

use crate::config::LedgerConfig;
use crate::ledger::{LoadOutcome, LoanLedger};
use crate::store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};

/// Reference date for status checks, from the local clock.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Open the file store under `config.data_dir` and load the ledger.
pub fn open_file_ledger(config: &LedgerConfig) -> anyhow::Result<LoanLedger<FileKeyValueStore>> {
    let store = FileKeyValueStore::open(&config.data_dir).with_context(|| {
        format!("failed to open ledger store at {:?}", config.data_dir)
    })?;

    LoanLedger::load(store, config.storage_key.clone())
        .with_context(|| format!("failed to load ledger '{}'", config.storage_key))
}

/// Load the ledger into a fresh in-memory store (tests/dev), honoring the
/// configured quota.
pub fn open_memory_ledger(
    config: &LedgerConfig,
) -> anyhow::Result<LoanLedger<InMemoryKeyValueStore>> {
    let store = match config.quota_bytes {
        Some(limit) => InMemoryKeyValueStore::with_quota(limit),
        None => InMemoryKeyValueStore::new(),
    };

    LoanLedger::load(store, config.storage_key.clone())
        .with_context(|| format!("failed to load ledger '{}'", config.storage_key))
}

/// A loaded ledger plus the one-time overdue notice to show on startup.
#[derive(Debug)]
pub struct Startup<S> {
    pub ledger: LoanLedger<S>,
    pub notice: Option<OverdueNotice>,
}

/// Finish startup for an already-loaded ledger.
pub fn start<S>(ledger: LoanLedger<S>, today: NaiveDate) -> Startup<S>
where
    S: KeyValueStore,
{
    match ledger.load_outcome() {
        LoadOutcome::Recovered { reason, backup_key } => {
            warn!(
                key = ledger.key(),
                %reason,
                backup = %backup_key,
                "previous loans could not be read"
            );
        }
        LoadOutcome::Partial {
            skipped,
            backup_key,
            ..
        } => {
            warn!(
                key = ledger.key(),
                skipped,
                backup = %backup_key,
                "some previous loans could not be read"
            );
        }
        LoadOutcome::Empty | LoadOutcome::Restored { .. } => {}
    }

    let notice = ledger.overdue_notice(today);
    if let Some(notice) = &notice {
        info!(overdue = notice.len(), %today, "overdue loans at startup");
    }

    Startup { ledger, notice }
}
