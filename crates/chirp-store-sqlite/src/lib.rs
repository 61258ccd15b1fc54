//! SQLite backend for the Chirp social store.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Because every operation is a closure
//! executed on that thread, multi-step operations (check an email, then
//! insert) are serialized end to end with no extra locking.

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
