use indextree::NodeId;

use crate::error::{EditorError, Result};
use crate::logging::{LogLevel, json_kv};
use crate::model::{ColumnState, ElementRecord};

use super::Editor;

impl Editor {
    fn column_or_err(&mut self, column: NodeId) -> Result<&mut ColumnState> {
        self.node_mut(column)?
            .column_mut()
            .ok_or(EditorError::NotAColumn(column))
    }

    /// Snapshots the column's width and offset.
    pub fn begin_change(&mut self, column: NodeId) -> Result<()> {
        self.column_or_err(column)?.begin_change()
    }

    pub fn commit_change(&mut self, column: NodeId) -> Result<()> {
        self.column_or_err(column)?.commit_change()
    }

    /// Restores the snapshot taken by [`Editor::begin_change`].
    pub fn rollback_change(&mut self, column: NodeId) -> Result<()> {
        self.column_or_err(column)?.rollback_change()
    }

    pub fn can_split(&self, column: NodeId) -> bool {
        match self.element(column) {
            Some(element) if !element.is_templated() => {
                element.column().is_some_and(|c| c.width > 1)
            }
            _ => false,
        }
    }

    /// Halves `column`, inserting the new right half directly after it and
    /// focusing it. The new column gets the rounded-down half.
    pub fn split(&mut self, column: NodeId) -> Result<Option<NodeId>> {
        if !self.can_split(column) {
            return Ok(None);
        }
        let Some(parent) = self.parent(column) else {
            return Ok(None);
        };

        let state = self.column_or_err(column)?;
        let new_width = state.width / 2;
        state.width -= new_width;

        let added = self.instantiate(&ElementRecord::column(new_width, 0))?;
        self.insert_child(parent, added, Some(column))?;
        self.set_is_focused(added)?;
        self.log(
            LogLevel::Debug,
            "column_split",
            [json_kv("width", new_width)],
        );
        Ok(Some(added))
    }

    /// Parent row of an untemplated column.
    fn resizable_row(&self, column: NodeId) -> Option<NodeId> {
        let element = self.element(column)?;
        if element.is_templated() || element.column().is_none() {
            return None;
        }
        self.parent(column).filter(|&row| self.is_row(row))
    }

    pub fn can_contract_right(&self, column: NodeId, connect_adjacent: bool) -> bool {
        self.resizable_row(column)
            .is_some_and(|row| self.can_contract_column_right(row, column, connect_adjacent))
    }

    pub fn contract_right(&mut self, column: NodeId, connect_adjacent: bool) {
        if let Some(row) = self.resizable_row(column) {
            self.contract_column_right(row, column, connect_adjacent);
        }
    }

    pub fn can_expand_right(&self, column: NodeId, connect_adjacent: bool) -> bool {
        self.resizable_row(column)
            .is_some_and(|row| self.can_expand_column_right(row, column, connect_adjacent))
    }

    pub fn expand_right(&mut self, column: NodeId, connect_adjacent: bool) {
        if let Some(row) = self.resizable_row(column) {
            self.expand_column_right(row, column, connect_adjacent);
        }
    }

    pub fn can_expand_left(&self, column: NodeId, connect_adjacent: bool) -> bool {
        self.resizable_row(column)
            .is_some_and(|row| self.can_expand_column_left(row, column, connect_adjacent))
    }

    pub fn expand_left(&mut self, column: NodeId, connect_adjacent: bool) {
        if let Some(row) = self.resizable_row(column) {
            self.expand_column_left(row, column, connect_adjacent);
        }
    }

    pub fn can_contract_left(&self, column: NodeId, connect_adjacent: bool) -> bool {
        self.resizable_row(column)
            .is_some_and(|row| self.can_contract_column_left(row, column, connect_adjacent))
    }

    pub fn contract_left(&mut self, column: NodeId, connect_adjacent: bool) {
        if let Some(row) = self.resizable_row(column) {
            self.contract_column_left(row, column, connect_adjacent);
        }
    }
}
