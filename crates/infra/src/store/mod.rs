//! Key/value persistence boundary.
//!
//! The ledger only needs `get`/`set` of one text blob per key; backends decide
//! where that text lives.

pub mod file;
pub mod key_value;

pub use file::FileKeyValueStore;
pub use key_value::{InMemoryKeyValueStore, KeyValueStore, StorageError};
