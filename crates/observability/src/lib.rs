//! Process-wide tracing/logging setup shared by embedders.

pub mod tracing;

pub use tracing::{LogFormat, init, init_with_format};
