//! Element factory registry.
//!
//! Deserialization dispatches on the record's `type` string. The registry is
//! an explicit value handed to the editor, so hosts can register extra
//! types before any document is loaded and tests can build their own.

mod core;

pub use self::core::{ElementFactory, ElementRegistry, builtin_from};
