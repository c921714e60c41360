use indextree::{NodeError, NodeId};

use crate::error::{EditorError, Result};
use crate::logging::{LogLevel, json_kv};
use crate::model::{ElementNode, ElementType};

use super::Editor;
use super::audit::EditorAuditStage;

impl Editor {
    fn container_type(&self, id: NodeId) -> Result<ElementType> {
        let element_type = self.node(id)?.element_type();
        if !element_type.is_container() {
            return Err(EditorError::NotAContainer(id));
        }
        Ok(element_type)
    }

    /// Fails before anything is detached if `child` could not be placed
    /// under `parent` without creating a cycle.
    fn ensure_not_ancestor(&self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.is_within(parent, child) {
            return Err(NodeError::AppendAncestor.into());
        }
        Ok(())
    }

    /// Replaces every child of `id` with freshly mounted `children`. The old
    /// children are released, not recycled.
    pub fn set_children(
        &mut self,
        id: NodeId,
        children: Vec<ElementNode>,
    ) -> Result<Vec<NodeId>> {
        self.container_type(id)?;
        for old in self.children(id) {
            old.detach(&mut self.arena);
            self.release_subtree(old);
        }

        let mut ids = Vec::with_capacity(children.len());
        for child in children {
            let child_id = self.mount(child)?;
            id.checked_append(child_id, &mut self.arena)?;
            self.notify_attached(child_id, id);
            ids.push(child_id);
        }
        Ok(ids)
    }

    /// A container with a templated direct child is sealed.
    pub fn is_sealed(&self, id: NodeId) -> bool {
        self.children(id)
            .into_iter()
            .any(|child| self.element(child).is_some_and(|e| e.is_templated()))
    }

    /// Appends `child` when `id` admits its type and does not already hold
    /// it, moving it out of any previous container. Either way the child is
    /// un-templated and the attachment is reported to the audit sink; a
    /// rejected child keeps its old position. Returns whether it was
    /// appended.
    pub fn add_child(&mut self, id: NodeId, child: NodeId) -> Result<bool> {
        let container_type = self.container_type(id)?;
        let child_type = self.node(child)?.element_type();

        let accepted = self.parent(child) != Some(id) && container_type.accepts(child_type);
        if accepted {
            self.ensure_not_ancestor(id, child)?;
            child.detach(&mut self.arena);
            id.checked_append(child, &mut self.arena)?;
        }

        self.set_is_templated(child, false)?;
        self.notify_attached(child, id);
        Ok(accepted)
    }

    /// Dispatches to the row override for rows, the plain removal otherwise.
    pub fn delete_child(&mut self, id: NodeId, child: NodeId) -> Result<()> {
        match self.container_type(id)? {
            ElementType::Row => self.delete_column(id, child),
            _ => self.remove_child(id, child).map(|_| ()),
        }
    }

    /// Detaches `child` into the recycle bin. If focus was inside it, focus
    /// moves to the sibling now at its index, else the previous sibling,
    /// else `id` itself.
    pub(crate) fn remove_child(&mut self, id: NodeId, child: NodeId) -> Result<bool> {
        let Some(index) = self.index_of(id, child) else {
            return Ok(false);
        };

        let had_focus = self
            .focused_element
            .is_some_and(|focused| self.is_within(focused, child));
        self.forget_session_refs(child);

        child.detach(&mut self.arena);
        self.recycle_bin.add(child);
        self.record(EditorAuditStage::ChildDeleted, child, id);
        self.log(
            LogLevel::Debug,
            "element_recycled",
            [
                json_kv("type", self.node(child)?.element_type().as_str()),
                json_kv("index", index),
            ],
        );

        if had_focus {
            let siblings = self.children(id);
            if let Some(&next) = siblings.get(index) {
                self.set_is_focused(next)?;
            } else if index > 0 {
                self.set_is_focused(siblings[index - 1])?;
            } else {
                self.set_is_focused(id)?;
            }
        }
        Ok(true)
    }

    pub fn move_focus_prev_child(&mut self, id: NodeId, child: NodeId) -> Result<()> {
        let siblings = self.children(id);
        if siblings.len() < 2 {
            return Ok(());
        }
        match self.index_of(id, child) {
            Some(index) if index > 0 => self.set_is_focused(siblings[index - 1]),
            _ => Ok(()),
        }
    }

    pub fn move_focus_next_child(&mut self, id: NodeId, child: NodeId) -> Result<()> {
        let siblings = self.children(id);
        if siblings.len() < 2 {
            return Ok(());
        }
        match self.index_of(id, child) {
            Some(index) if index + 1 < siblings.len() => {
                self.set_is_focused(siblings[index + 1])
            }
            _ => Ok(()),
        }
    }

    /// Places `child` right after `after`, or first when `after` is not a
    /// child of `id`. No admission check and no attach notification: the
    /// caller vouches for the child.
    pub fn insert_child(
        &mut self,
        id: NodeId,
        child: NodeId,
        after: Option<NodeId>,
    ) -> Result<()> {
        self.container_type(id)?;
        self.node(child)?;
        if self.parent(child) == Some(id) {
            return Ok(());
        }
        self.ensure_not_ancestor(id, child)?;

        let after = after.filter(|&sibling| self.parent(sibling) == Some(id));
        child.detach(&mut self.arena);
        match after {
            Some(sibling) => sibling.checked_insert_after(child, &mut self.arena)?,
            None => id.checked_prepend(child, &mut self.arena)?,
        }
        self.record(EditorAuditStage::ChildInserted, child, id);
        Ok(())
    }

    pub fn can_move_child_up(&self, id: NodeId, child: NodeId) -> bool {
        self.index_of(id, child).is_some_and(|index| index > 0)
    }

    pub fn can_move_child_down(&self, id: NodeId, child: NodeId) -> bool {
        let count = self.children(id).len();
        self.index_of(id, child)
            .is_some_and(|index| index + 1 < count)
    }

    pub fn move_child_up(&mut self, id: NodeId, child: NodeId) -> Result<()> {
        if !self.can_move_child_up(id, child) {
            return Ok(());
        }
        if let Some(previous) = self.arena.get(child).and_then(|n| n.previous_sibling()) {
            child.detach(&mut self.arena);
            previous.checked_insert_before(child, &mut self.arena)?;
        }
        Ok(())
    }

    pub fn move_child_down(&mut self, id: NodeId, child: NodeId) -> Result<()> {
        if !self.can_move_child_down(id, child) {
            return Ok(());
        }
        if let Some(next) = self.arena.get(child).and_then(|n| n.next_sibling()) {
            child.detach(&mut self.arena);
            next.checked_insert_after(child, &mut self.arena)?;
        }
        Ok(())
    }

    /// Offers a detached `child` to `id`. Rows take the column path; other
    /// containers admit by type and focus the new child. Anything not
    /// admitted bubbles to the parent. Returns false when no container on
    /// the way up accepted it.
    pub fn paste_child(&mut self, id: NodeId, child: NodeId) -> Result<bool> {
        match self.container_type(id)? {
            ElementType::Row => self.paste_column(id, child),
            _ => self.paste_child_by_type(id, child),
        }
    }

    pub(crate) fn paste_child_by_type(&mut self, id: NodeId, child: NodeId) -> Result<bool> {
        let container_type = self.container_type(id)?;
        let child_type = self.node(child)?.element_type();
        if container_type.accepts(child_type) {
            self.add_child(id, child)?;
            self.set_is_focused(child)?;
            return Ok(true);
        }
        self.paste_child_to_parent(id, child)
    }

    pub(crate) fn paste_child_to_parent(&mut self, id: NodeId, child: NodeId) -> Result<bool> {
        match self.parent(id) {
            Some(parent) => self.paste_child(parent, child),
            None => Ok(false),
        }
    }
}
