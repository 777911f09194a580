//! # Pizzapets Core
//!
//! The deterministic replay engine for pizza pets.
//!
//! A pet's whole life is recomputed from scratch on every observation:
//! given the rules document, the pet's inscription id, its feeding events
//! and the hazard feeding events, the walk from the birth block to the
//! current block height always yields the same state and history.
//!
//! This crate contains:
//! - Hash-seeded number derivation (no RNG anywhere)
//! - Rule compilation and validation
//! - Item effect resolution, buffs and hazards
//! - The block-by-block replay loop and read-only queries
//! - The async data-source boundary and the observation cycle
//! - Replay metrics and structured logging
//!
//! ## Example
//!
//! ```
//! use pizzapets_core::derivation::{chance_for, decimal_for_hash, wrap_around};
//!
//! assert_eq!(wrap_around("abcdef", 2), "cdefab");
//! assert_eq!(decimal_for_hash("00ff", 2), 0xff00);
//! assert!(chance_for(50.0, 199));
//! assert!(!chance_for(50.0, 149));
//! ```

/// Mutable behavior record and its named fields
pub mod behavior;
/// Hash-seeded number derivation
pub mod derivation;
/// Typed item effects parsed from the rules document
pub mod effect;
/// Engine error types
pub mod error;
/// SHA-256 fingerprints
pub mod fingerprint;
/// Replay inputs: hashed feedings and the hazard schedule
pub mod input;
/// Replay metrics and logging setup
pub mod metrics;
/// Fetch-replay cycle over a data source
pub mod observer;
/// Pet run context, replay loop and queries
pub mod pet;
/// Compiled rules
pub mod rules;
/// Async data-source boundary
pub mod source;
/// Translation lookup and placeholder interpolation
pub mod translate;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{EngineError, Result};
pub use input::{Feeding, FeedingMap, HazardSchedule, ReplayInput};
pub use metrics::{init_logging, ReplayMetrics};
pub use observer::Observer;
pub use pet::Pet;
pub use rules::{HazardRule, ItemRule, Rules, Stage};
pub use source::{InMemorySource, PetSource};
