//! Core types and trait definitions for the vaxchain record store.
//!
//! Child identity records, vaccine reference data and vaccination plans are
//! kept as append-only repositories, one JSON container per ledger key. This
//! crate is free of HTTP and database dependencies; storage backends implement
//! [`ledger::Ledger`] and everything above talks to [`store::RecordStore`].

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod command;
pub mod error;
pub mod fields;
pub mod ledger;
pub mod memory;
pub mod record;
pub mod repository;
pub mod store;

pub use error::{Error, Result};
