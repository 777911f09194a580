//! # Pizzapets IO
//!
//! File-backed I/O for the pizza pet engine.
//!
//! This crate provides:
//! - An error type covering files, JSON and the shared fixture
//! - JSON serialization helpers
//! - A fixture file data source for offline replays
//! - JSON-lines history output and history digests

/// Error types and result aliases for I/O operations
pub mod error;
/// Fixture files as a pet data source
pub mod fixture;
/// History output and digests
pub mod history;
/// JSON helpers for strings and files
pub mod serialization;

pub use error::{IoError, Result};
pub use fixture::{Fixture, FixtureSource};
pub use history::{compute_history_hash, read_history, HistoryWriter};
pub use serialization::{from_json, read_json_file, to_json, write_json_file};
