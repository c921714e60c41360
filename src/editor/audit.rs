//! Structural audit hooks.
//!
//! Every attach, insert, removal and column transaction is reported to the
//! editor's [`EditorAudit`] sink. Attaching an element produces one
//! `ChildAdded` record for its parent and one `DescendantAdded` record for
//! the parent and every ancestor above it.

use std::sync::Mutex;
use std::time::SystemTime;

use indextree::NodeId;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorAuditStage {
    /// An element was attached to (or re-offered to) a container.
    ChildAdded,
    /// An element was attached somewhere below `target`.
    DescendantAdded,
    /// An element was inserted next to a sibling without admission checks.
    ChildInserted,
    /// An element was removed from its container and recycled.
    ChildDeleted,
    ColumnAddBegun,
    ColumnAddCommitted,
    ColumnAddRolledBack,
    /// No container along the paste path accepted the clipboard element.
    PasteDropped,
}

#[derive(Debug, Clone)]
pub struct EditorAuditEvent {
    pub timestamp: SystemTime,
    pub stage: EditorAuditStage,
    pub element: NodeId,
    /// Container the record is addressed to.
    pub target: Option<NodeId>,
    /// Immediate parent of `element` at the time of the record.
    pub parent: Option<NodeId>,
    pub details: Vec<(String, Value)>,
}

pub struct EditorAuditEventBuilder {
    event: EditorAuditEvent,
}

impl EditorAuditEventBuilder {
    pub fn new(stage: EditorAuditStage, element: NodeId) -> Self {
        Self {
            event: EditorAuditEvent {
                timestamp: SystemTime::now(),
                stage,
                element,
                target: None,
                parent: None,
                details: Vec::new(),
            },
        }
    }

    pub fn target(mut self, target: NodeId) -> Self {
        self.event.target = Some(target);
        self
    }

    pub fn parent(mut self, parent: NodeId) -> Self {
        self.event.parent = Some(parent);
        self
    }

    pub fn detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.event.details.push((key.into(), value.into()));
        self
    }

    pub fn finish(self) -> EditorAuditEvent {
        self.event
    }
}

pub trait EditorAudit: Send + Sync {
    fn record(&self, event: EditorAuditEvent);
}

/// Default sink; discards everything.
#[derive(Debug, Default)]
pub struct NullEditorAudit;

impl EditorAudit for NullEditorAudit {
    fn record(&self, _event: EditorAuditEvent) {}
}

/// Keeps every record in memory until drained.
#[derive(Debug, Default)]
pub struct BufferedEditorAudit {
    events: Mutex<Vec<EditorAuditEvent>>,
}

impl BufferedEditorAudit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drain(&self) -> Vec<EditorAuditEvent> {
        self.events
            .lock()
            .map(|mut guard| std::mem::take(&mut *guard))
            .unwrap_or_default()
    }

    pub fn stages(&self) -> Vec<EditorAuditStage> {
        self.events
            .lock()
            .map(|guard| guard.iter().map(|e| e.stage).collect())
            .unwrap_or_default()
    }
}

impl EditorAudit for BufferedEditorAudit {
    fn record(&self, event: EditorAuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event);
        }
    }
}
