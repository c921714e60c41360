use indextree::NodeId;
use serde_json::{Map, Value, json};

use crate::error::Result;
use crate::logging::{LogLevel, json_kv, json_str};
use crate::model::{ElementRecord, Variant, strip_html};

use super::Editor;

impl Editor {
    /// Sets the templated flag on `id` and every element below it.
    pub fn set_is_templated(&mut self, id: NodeId, value: bool) -> Result<()> {
        self.node(id)?;
        let ids: Vec<_> = id.descendants(&self.arena).collect();
        for descendant in ids {
            if let Some(node) = self.arena.get_mut(descendant) {
                node.get_mut().state.is_templated = value;
            }
        }
        Ok(())
    }

    /// Active and focused are exclusive: a focused element never reports
    /// itself active.
    pub fn is_active(&self, id: NodeId) -> bool {
        self.active_element == Some(id) && !self.is_focused(id)
    }

    /// Activating sets `id` active; deactivating hands activation to the
    /// parent. Ignored during drag or resize.
    pub fn set_is_active(&mut self, id: NodeId, value: bool) -> Result<()> {
        self.node(id)?;
        if self.is_dragging || self.is_resizing {
            return Ok(());
        }
        self.active_element = if value { Some(id) } else { self.parent(id) };
        Ok(())
    }

    pub fn is_focused(&self, id: NodeId) -> bool {
        self.focused_element == Some(id)
    }

    /// Focuses `id` unless it is a sealed container, a templated leaf, or a
    /// gesture is in progress. Focus handlers run afterwards; their failures
    /// are logged and otherwise ignored.
    pub fn set_is_focused(&mut self, id: NodeId) -> Result<()> {
        let element = self.node(id)?;
        if element.is_container() {
            if self.is_sealed(id) {
                return Ok(());
            }
        } else if element.is_templated() {
            return Ok(());
        }
        if self.is_dragging || self.is_resizing {
            return Ok(());
        }

        self.focused_element = Some(id);

        let mut failures = Vec::new();
        if let Some(handlers) = self.focus_handlers.get_mut(&id) {
            for (index, handler) in handlers.iter_mut().enumerate() {
                if let Err(err) = handler(id) {
                    failures.push((index, err.to_string()));
                }
            }
        }
        for (index, error) in failures {
            self.log(
                LogLevel::Warn,
                "focus_handler_failed",
                [json_kv("handler", index), json_str("error", error)],
            );
        }
        Ok(())
    }

    /// True when `id` or anything below it has focus.
    pub fn is_selected(&self, id: NodeId) -> bool {
        self.focused_element
            .is_some_and(|focused| self.is_within(focused, id))
    }

    pub fn is_drop_target(&self, id: NodeId) -> bool {
        self.drop_target_element == Some(id)
    }

    pub fn set_is_drop_target(&mut self, id: NodeId, value: bool) -> Result<()> {
        self.node(id)?;
        self.drop_target_element = if value { Some(id) } else { None };
        Ok(())
    }

    pub fn can_delete(&self, id: NodeId) -> bool {
        self.node(id).is_ok_and(|e| !e.is_templated()) && self.parent(id).is_some()
    }

    pub fn delete(&mut self, id: NodeId) -> Result<()> {
        if !self.can_delete(id) {
            return Ok(());
        }
        match self.parent(id) {
            Some(parent) => self.delete_child(parent, id),
            None => Ok(()),
        }
    }

    pub fn can_move_up(&self, id: NodeId) -> bool {
        match self.movable_parent(id) {
            Some(parent) => self.can_move_child_up(parent, id),
            None => false,
        }
    }

    pub fn move_up(&mut self, id: NodeId) -> Result<()> {
        if !self.can_move_up(id) {
            return Ok(());
        }
        match self.parent(id) {
            Some(parent) => self.move_child_up(parent, id),
            None => Ok(()),
        }
    }

    pub fn can_move_down(&self, id: NodeId) -> bool {
        match self.movable_parent(id) {
            Some(parent) => self.can_move_child_down(parent, id),
            None => false,
        }
    }

    pub fn move_down(&mut self, id: NodeId) -> Result<()> {
        if !self.can_move_down(id) {
            return Ok(());
        }
        match self.parent(id) {
            Some(parent) => self.move_child_down(parent, id),
            None => Ok(()),
        }
    }

    fn movable_parent(&self, id: NodeId) -> Option<NodeId> {
        let element = self.node(id).ok()?;
        if element.is_templated() {
            return None;
        }
        self.parent(id)
    }

    /// Plain text of the element. Containers join their children's text,
    /// each prefixed with a newline.
    pub fn inner_text(&self, id: NodeId) -> Result<String> {
        let element = self.node(id)?;
        if let Some(content) = element.content() {
            return Ok(content.html().map(strip_html).unwrap_or_default());
        }
        let mut text = String::new();
        for child in id.children(&self.arena) {
            text.push('\n');
            text.push_str(&self.inner_text(child)?);
        }
        Ok(text)
    }

    /// Replaces the markup of a `Content` or `Html` element. Other elements
    /// are left alone.
    pub fn set_html(&mut self, id: NodeId, html: impl Into<String>) -> Result<()> {
        if let Some(content) = self.node_mut(id)?.content_mut() {
            content.set_html(Some(html.into()));
        }
        Ok(())
    }

    /// Plain-data form of `id` and its subtree.
    pub fn to_object(&self, id: NodeId) -> Result<ElementRecord> {
        let element = self.node(id)?;
        let mut record = ElementRecord::from_element(element);
        if element.is_container() {
            let children = id
                .children(&self.arena)
                .map(|child| self.to_object(child))
                .collect::<Result<Vec<_>>>()?;
            record.children = Some(children);
        }
        Ok(record)
    }

    /// Properties handed to the element's server-side editor.
    pub fn editor_object(&self, id: NodeId) -> Result<Map<String, Value>> {
        let mut object = Map::new();
        if let Variant::Html(content) = &self.node(id)?.variant {
            object.insert("Content".to_string(), json!(content.html()));
        }
        Ok(object)
    }
}
