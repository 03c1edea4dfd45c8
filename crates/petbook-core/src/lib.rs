//! Core types and trait definitions for the Petbook ownership ledger.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::LedgerStore`]; the [`ledger::Ledger`] drives
//! every ownership transition through it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod history;
pub mod ledger;
pub mod memory;
pub mod owner;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use ledger::Ledger;
