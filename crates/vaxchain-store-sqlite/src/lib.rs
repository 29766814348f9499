//! SQLite backend for the vaxchain ledger.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod ledger;
mod schema;

pub mod error;

pub use error::{Error, Result};
pub use ledger::SqliteLedger;
