//! SQLite backend for the hotel front desk.
//!
//! Database work runs on blocking threads through a bounded
//! [`deadpool_sqlite`] pool, so it never stalls the async runtime.

mod encode;
mod schema;
mod store;

pub mod error;
pub mod pool;

pub use error::{Error, Result};
pub use pool::PoolOptions;
pub use store::SqliteStore;
