//! Infrastructure layer for Parley
//!
//! Implements the application ports: SQLite persistence for the credit
//! state, HTTP adapters for the seven external providers, and the
//! configuration layer that wires them together.

pub mod adapters;
pub mod config;
pub mod persistence;
