//! Clipboard contract between the editor and its host.
//!
//! Copy writes two slots: [`TEXT_PLAIN`] with the element's inner text and
//! [`TEXT_JSON`] with its tab-indented record. Paste only reads
//! [`TEXT_JSON`].

use std::collections::HashMap;

pub const TEXT_PLAIN: &str = "text/plain";
pub const TEXT_JSON: &str = "text/json";

/// Host-provided clipboard, keyed by media kind.
pub trait Clipboard {
    fn set_data(&mut self, kind: &str, value: String);
    fn get_data(&self, kind: &str) -> Option<String>;
}

/// Clipboard held in process memory, for hosts without a system clipboard
/// and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    slots: HashMap<String, String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_data(&mut self, kind: &str, value: String) {
        self.slots.insert(kind.to_string(), value);
    }

    fn get_data(&self, kind: &str) -> Option<String> {
        self.slots.get(kind).cloned()
    }
}
