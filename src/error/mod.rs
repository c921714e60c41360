//! Error module orchestrator.

mod types;

pub use types::{EditorError, Result};
