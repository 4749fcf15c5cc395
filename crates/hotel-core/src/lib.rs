//! Core types and trait definitions for the hotel front desk.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

pub mod error;
pub mod guest;
pub mod input;
pub mod stay;
pub mod store;

pub use error::{Error, ErrorKind, Result};
