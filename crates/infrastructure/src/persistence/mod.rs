//! SQLite persistence for the credit state and usage log

pub mod connection;
pub mod credit_store;
pub mod migrations;

pub use connection::{ConnectionPool, DatabaseError, create_pool};
pub use credit_store::SqliteCreditStore;
