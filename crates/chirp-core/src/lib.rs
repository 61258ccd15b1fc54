//! Core types and trait definitions for the Chirp social store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod comment;
pub mod error;
pub mod post;
pub mod store;
pub mod user;

pub use error::{Error, Result};
