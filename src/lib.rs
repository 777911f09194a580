//! Application layer for the pizza pet engine: runner settings and the
//! observation runner behind the `pizzapets` binary.

pub mod app;
pub mod settings;

pub use app::{Report, Runner};
pub use settings::{OutputFormat, Settings};
