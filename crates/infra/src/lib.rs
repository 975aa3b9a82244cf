//! Infrastructure layer: persistence adapters, the write-through loan ledger,
//! configuration and bootstrap wiring.

pub mod bootstrap;
pub mod config;
pub mod ledger;
pub mod store;


pub use config::{ConfigError, LedgerConfig};
pub use ledger::{LedgerError, LoadOutcome, LoanLedger};
pub use store::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore, StorageError};
