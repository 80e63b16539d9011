//! Player accounts and match statistics, persisted as one JSON file.

pub mod error;
pub mod store;

pub use error::AccountError;
pub use store::{hash_password, UserRecord, UserStats, UserStore, DEFAULT_DB_FILE};
