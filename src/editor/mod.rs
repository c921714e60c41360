//! Editing session over a layout document.
//!
//! The [`Editor`] owns every element in an `indextree` arena. Elements are
//! addressed by [`NodeId`]; parent links are arena links, and an element
//! removed from the document stays in the arena, detached, referenced from
//! the [`RecycleBin`]. Session state (active, focused and drop-target
//! element, drag/resize gates) lives here rather than on the elements.
//!
//! Operations are split by capability:
//! - `element`: what every element can do (focus, activation, delete, move)
//! - `container`: child management and paste routing
//! - `row` / `column`: the 12-unit grid-space algorithm
//! - `clipboard`: copy, cut and paste

pub mod audit;
mod clipboard;
mod column;
mod config;
mod container;
mod element;
mod recycle_bin;
mod row;

use std::collections::HashMap;
use std::sync::Arc;

use indextree::{Arena, NodeId};
use serde_json::Value;

use crate::error::{EditorError, Result};
use crate::logging::{EDITOR_TARGET, LogLevel, Logger, event_with_fields};
use crate::model::{Element, ElementNode, ElementRecord, ElementType};
use crate::registry::{ElementRegistry, builtin_from};

use audit::{EditorAudit, EditorAuditEventBuilder, EditorAuditStage};

pub use config::{EditorConfig, EditorSettings};
pub use recycle_bin::RecycleBin;

/// Error type focus handlers may return. Failures are logged and dropped.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

/// Callback fired after an element receives focus.
pub type FocusHandler = Box<dyn FnMut(NodeId) -> std::result::Result<(), HandlerError>>;

pub struct Editor {
    arena: Arena<Element>,
    canvas: NodeId,
    registry: Arc<ElementRegistry>,
    active_element: Option<NodeId>,
    focused_element: Option<NodeId>,
    drop_target_element: Option<NodeId>,
    is_dragging: bool,
    is_resizing: bool,
    initial_state: blake3::Hash,
    settings: EditorSettings,
    toolbox_elements: Vec<ElementRecord>,
    recycle_bin: RecycleBin,
    focus_handlers: HashMap<NodeId, Vec<FocusHandler>>,
    logger: Option<Logger>,
    audit: Arc<dyn EditorAudit>,
}

impl Editor {
    /// Loads `canvas` as the document root. The record is always read as a
    /// canvas; its children go through `registry`.
    pub fn new(
        config: EditorConfig,
        registry: Arc<ElementRegistry>,
        canvas: &ElementRecord,
    ) -> Result<Self> {
        let ElementNode { element, children } =
            builtin_from(ElementType::Canvas, canvas, &registry)?;
        let toolbox_elements = config.settings.toolbox_templates();
        let mut arena = Arena::new();
        let canvas = arena.new_node(element);

        let mut editor = Self {
            arena,
            canvas,
            registry,
            active_element: None,
            focused_element: None,
            drop_target_element: None,
            is_dragging: false,
            is_resizing: false,
            initial_state: blake3::hash(&[]),
            settings: config.settings,
            toolbox_elements,
            recycle_bin: RecycleBin::new(),
            focus_handlers: HashMap::new(),
            logger: config.logger,
            audit: config.audit,
        };
        for child in children {
            let child_id = editor.mount(child)?;
            canvas.checked_append(child_id, &mut editor.arena)?;
            editor.notify_attached(child_id, canvas);
        }
        editor.initial_state = editor.state_digest()?;
        editor.log(
            LogLevel::Debug,
            "editor_loaded",
            [(
                "elements".to_string(),
                Value::from(editor.canvas.descendants(&editor.arena).count()),
            )],
        );
        Ok(editor)
    }

    /// Session over an empty canvas with the built-in registry.
    pub fn empty() -> Result<Self> {
        Self::new(
            EditorConfig::default(),
            Arc::new(ElementRegistry::builtin()),
            &ElementRecord::new(ElementType::Canvas),
        )
    }

    pub fn canvas(&self) -> NodeId {
        self.canvas
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        self.node(id).ok()
    }

    /// Direct access to element fields. Grid placement should go through the
    /// row and column operations so the 12-unit budget holds.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.node_mut(id).ok()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena.get(id).and_then(|node| node.parent())
    }

    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        if self.node(id).is_err() {
            return Vec::new();
        }
        id.children(&self.arena).collect()
    }

    pub fn active_element(&self) -> Option<NodeId> {
        self.active_element
    }

    pub fn focused_element(&self) -> Option<NodeId> {
        self.focused_element
    }

    pub fn drop_target_element(&self) -> Option<NodeId> {
        self.drop_target_element
    }

    pub fn is_dragging(&self) -> bool {
        self.is_dragging
    }

    /// While set, focus and activation requests are ignored. The caller must
    /// clear it when the gesture ends.
    pub fn set_is_dragging(&mut self, value: bool) {
        self.is_dragging = value;
    }

    pub fn is_resizing(&self) -> bool {
        self.is_resizing
    }

    /// Same gate as [`Editor::set_is_dragging`], for resize gestures.
    pub fn set_is_resizing(&mut self, value: bool) {
        self.is_resizing = value;
    }

    pub fn recycle_bin(&self) -> &RecycleBin {
        &self.recycle_bin
    }

    pub fn recycle_bin_to_object(&self) -> Result<ElementRecord> {
        let children = self
            .recycle_bin
            .elements()
            .iter()
            .map(|&id| self.to_object(id))
            .collect::<Result<Vec<_>>>()?;
        Ok(ElementRecord {
            kind: "RecycleBin".to_string(),
            children: Some(children),
            ..ElementRecord::default()
        })
    }

    pub fn canvas_to_object(&self) -> Result<ElementRecord> {
        self.to_object(self.canvas)
    }

    /// True once the serialized canvas differs from the last clean state.
    pub fn is_dirty(&self) -> Result<bool> {
        Ok(self.state_digest()? != self.initial_state)
    }

    /// Takes the current document as the new clean state, e.g. after the
    /// host persisted it.
    pub fn mark_clean(&mut self) -> Result<()> {
        self.initial_state = self.state_digest()?;
        Ok(())
    }

    fn state_digest(&self) -> Result<blake3::Hash> {
        let json = self.canvas_to_object()?.to_json()?;
        Ok(blake3::hash(json.as_bytes()))
    }

    pub fn toolbox_elements(&self) -> &[ElementRecord] {
        &self.toolbox_elements
    }

    pub fn reset_toolbox_elements(&mut self) {
        self.toolbox_elements = self.settings.toolbox_templates();
    }

    /// Removes the toolbox entry at `index` and builds it as a detached
    /// element, ready to be added to a container. The toolbox stays short
    /// one entry until [`Editor::reset_toolbox_elements`].
    pub fn take_toolbox_element(&mut self, index: usize) -> Result<Option<NodeId>> {
        if index >= self.toolbox_elements.len() {
            return Ok(None);
        }
        let record = self.toolbox_elements.remove(index);
        self.instantiate(&record).map(Some)
    }

    /// Builds a detached element tree from plain data through the registry.
    pub fn instantiate(&mut self, record: &ElementRecord) -> Result<NodeId> {
        let node = self.registry.element_from(record)?;
        self.mount(node)
    }

    pub fn add_focus_handler<F>(&mut self, id: NodeId, handler: F) -> Result<()>
    where
        F: FnMut(NodeId) -> std::result::Result<(), HandlerError> + 'static,
    {
        self.node(id)?;
        self.focus_handlers
            .entry(id)
            .or_default()
            .push(Box::new(handler));
        Ok(())
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Element> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get())
            .ok_or(EditorError::UnknownElement(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        self.arena
            .get_mut(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get_mut())
            .ok_or(EditorError::UnknownElement(id))
    }

    pub(crate) fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        if self.parent(child) != Some(parent) {
            return None;
        }
        parent.children(&self.arena).position(|id| id == child)
    }

    /// Whether `id` is `root` or lies below it.
    pub(crate) fn is_within(&self, id: NodeId, root: NodeId) -> bool {
        self.arena.get(id).is_some() && id.ancestors(&self.arena).any(|a| a == root)
    }

    /// Creates arena nodes for `node` and its subtree. The result is detached.
    fn mount(&mut self, node: ElementNode) -> Result<NodeId> {
        let ElementNode { element, children } = node;
        let id = self.arena.new_node(element);
        for child in children {
            let child_id = self.mount(child)?;
            id.checked_append(child_id, &mut self.arena)?;
            self.notify_attached(child_id, id);
        }
        Ok(id)
    }

    /// Drops a detached subtree for good, clearing any session state that
    /// still points into it.
    fn release_subtree(&mut self, id: NodeId) {
        self.forget_session_refs(id);
        let ids: Vec<_> = id.descendants(&self.arena).collect();
        for descendant in ids {
            self.focus_handlers.remove(&descendant);
        }
        id.remove_subtree(&mut self.arena);
    }

    fn forget_session_refs(&mut self, root: NodeId) {
        if self.active_element.is_some_and(|id| self.is_within(id, root)) {
            self.active_element = None;
        }
        if self.focused_element.is_some_and(|id| self.is_within(id, root)) {
            self.focused_element = None;
        }
        if self
            .drop_target_element
            .is_some_and(|id| self.is_within(id, root))
        {
            self.drop_target_element = None;
        }
    }

    /// Reports `child` as attached under `parent`: once to the parent, then
    /// to the parent and each ancestor as a descendant.
    fn notify_attached(&self, child: NodeId, parent: NodeId) {
        self.audit.record(
            EditorAuditEventBuilder::new(EditorAuditStage::ChildAdded, child)
                .target(parent)
                .parent(parent)
                .finish(),
        );
        for ancestor in parent.ancestors(&self.arena) {
            self.audit.record(
                EditorAuditEventBuilder::new(EditorAuditStage::DescendantAdded, child)
                    .target(ancestor)
                    .parent(parent)
                    .finish(),
            );
        }
    }

    fn record(&self, stage: EditorAuditStage, element: NodeId, target: NodeId) {
        self.audit.record(
            EditorAuditEventBuilder::new(stage, element)
                .target(target)
                .finish(),
        );
    }

    fn log(
        &self,
        level: LogLevel,
        message: &str,
        fields: impl IntoIterator<Item = (String, Value)>,
    ) {
        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event_with_fields(level, EDITOR_TARGET, message, fields));
        }
    }
}
