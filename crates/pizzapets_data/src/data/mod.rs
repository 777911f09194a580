//! Core data structures for the Pizzapets engine.

pub mod configuration;
pub mod event;
pub mod history;
pub mod ordered;
pub mod pet;
