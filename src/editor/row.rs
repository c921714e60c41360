//! Row side of the 12-unit grid.
//!
//! A row spends at most [`GRID_COLUMNS`] units on its columns' widths and
//! offsets. Structural changes either free units (deleting a column) or
//! claim them (adding one); [`Editor::distribute_space`] turns the
//! difference into width and offset changes on the surviving columns.

use indextree::NodeId;

use crate::error::{EditorError, Result};
use crate::logging::{LogLevel, json_kv};
use crate::model::{ColumnState, ElementType, GRID_COLUMNS, RowState};

use super::Editor;
use super::audit::{EditorAuditEventBuilder, EditorAuditStage};

impl Editor {
    fn row_state(&self, row: NodeId) -> Result<&RowState> {
        self.node(row)?.row().ok_or(EditorError::NotARow(row))
    }

    fn row_state_mut(&mut self, row: NodeId) -> Result<&mut RowState> {
        self.node_mut(row)?
            .row_mut()
            .ok_or(EditorError::NotARow(row))
    }

    pub(crate) fn column_state(&self, id: NodeId) -> Option<&ColumnState> {
        self.element(id).and_then(|e| e.column())
    }

    pub(crate) fn column_state_mut(&mut self, id: NodeId) -> Option<&mut ColumnState> {
        self.element_mut(id).and_then(|e| e.column_mut())
    }

    /// Column children of `row`, in order. Containable non-column children
    /// take no grid space.
    pub fn row_columns(&self, row: NodeId) -> Vec<NodeId> {
        self.children(row)
            .into_iter()
            .filter(|&id| self.column_state(id).is_some())
            .collect()
    }

    /// Units used by widths and offsets together.
    pub fn total_columns_width(&self, row: NodeId) -> i32 {
        self.row_columns(row)
            .into_iter()
            .filter_map(|id| self.column_state(id))
            .map(ColumnState::span)
            .sum()
    }

    /// Spreads `space` units over the columns of `row`: positive space is
    /// absorbed as width, negative space is found in vacant units first,
    /// then in offsets, then in widths, never shrinking a column below 1 or
    /// growing it past 12. Columns are visited left to right one unit at a
    /// time. Returns whether all of `space` was placed; a partial result is
    /// left in place for the caller to roll back.
    pub fn distribute_space(&mut self, row: NodeId, space: i32) -> Result<bool> {
        self.row_state(row)?;
        if space == 0 {
            return Ok(true);
        }

        let columns = self.row_columns(row);
        let mut remaining = space;

        if remaining < 0 {
            let vacant = GRID_COLUMNS - self.total_columns_width(row);
            remaining = remaining.saturating_add(vacant).min(0);
        }

        while remaining < 0
            && columns
                .iter()
                .any(|&id| self.column_state(id).is_some_and(|c| c.offset > 0))
        {
            for &id in &columns {
                if remaining >= 0 {
                    break;
                }
                if let Some(column) = self.column_state_mut(id) {
                    if column.offset > 0 {
                        column.offset -= 1;
                        remaining += 1;
                    }
                }
            }
        }

        let has_width = |column: &ColumnState, remaining: i32| {
            if remaining > 0 {
                column.width < GRID_COLUMNS
            } else {
                remaining < 0 && column.width > 1
            }
        };

        while remaining != 0 {
            let any_width = columns
                .iter()
                .any(|&id| self.column_state(id).is_some_and(|c| has_width(c, remaining)));
            if !any_width {
                break;
            }
            for &id in &columns {
                if remaining == 0 {
                    break;
                }
                if let Some(column) = self.column_state_mut(id) {
                    if has_width(&*column, remaining) {
                        let delta = remaining.signum();
                        column.width += delta;
                        remaining -= delta;
                    }
                }
            }
        }

        Ok(remaining == 0)
    }

    pub fn can_add_column(&self, row: NodeId) -> bool {
        self.row_state(row).is_ok() && self.children(row).len() < GRID_COLUMNS as usize
    }

    /// First half of adding a column: snapshots every column and frees
    /// `new_width` units. On failure every column is restored and `false`
    /// is returned. On success the row stays in the add state until
    /// [`Editor::commit_add_column`] or [`Editor::rollback_add_column`].
    /// A width outside `1..=12` is refused without touching the row.
    pub fn begin_add_column(&mut self, row: NodeId, new_width: i32) -> Result<bool> {
        if self.row_state(row)?.adding_column {
            return Err(EditorError::AddColumnInProgress);
        }
        if !(1..=GRID_COLUMNS).contains(&new_width) {
            return Ok(false);
        }

        let columns = self.row_columns(row);
        for (begun, &id) in columns.iter().enumerate() {
            let started = self
                .column_state_mut(id)
                .map(ColumnState::begin_change)
                .unwrap_or(Ok(()));
            if let Err(err) = started {
                for &earlier in &columns[..begun] {
                    if let Some(column) = self.column_state_mut(earlier) {
                        column.rollback_change()?;
                    }
                }
                return Err(err);
            }
        }

        if self.distribute_space(row, -new_width)? {
            self.row_state_mut(row)?.adding_column = true;
            self.audit.record(
                EditorAuditEventBuilder::new(EditorAuditStage::ColumnAddBegun, row)
                    .target(row)
                    .detail("width", new_width)
                    .finish(),
            );
            return Ok(true);
        }

        self.finish_column_changes(&columns, ColumnState::rollback_change)?;
        self.log(
            LogLevel::Debug,
            "column_add_refused",
            [
                json_kv("width", new_width),
                json_kv("used", self.total_columns_width(row)),
            ],
        );
        Ok(false)
    }

    pub fn commit_add_column(&mut self, row: NodeId) -> Result<()> {
        self.end_add_column(row, ColumnState::commit_change)?;
        self.record(EditorAuditStage::ColumnAddCommitted, row, row);
        Ok(())
    }

    pub fn rollback_add_column(&mut self, row: NodeId) -> Result<()> {
        self.end_add_column(row, ColumnState::rollback_change)?;
        self.record(EditorAuditStage::ColumnAddRolledBack, row, row);
        self.log(
            LogLevel::Debug,
            "column_add_rolled_back",
            [json_kv("used", self.total_columns_width(row))],
        );
        Ok(())
    }

    fn end_add_column(
        &mut self,
        row: NodeId,
        finish: fn(&mut ColumnState) -> Result<()>,
    ) -> Result<()> {
        if !self.row_state(row)?.adding_column {
            return Err(EditorError::NoAddColumnInProgress);
        }
        // Columns added while the transaction was open carry no snapshot.
        let pending: Vec<_> = self
            .row_columns(row)
            .into_iter()
            .filter(|&id| self.column_state(id).is_some_and(|c| c.has_pending_change()))
            .collect();
        self.finish_column_changes(&pending, finish)?;
        self.row_state_mut(row)?.adding_column = false;
        Ok(())
    }

    fn finish_column_changes(
        &mut self,
        columns: &[NodeId],
        finish: fn(&mut ColumnState) -> Result<()>,
    ) -> Result<()> {
        for &id in columns {
            if let Some(column) = self.column_state_mut(id) {
                finish(column)?;
            }
        }
        Ok(())
    }

    /// Row override of [`Editor::delete_child`]: the removed column's width
    /// goes back to the survivors.
    pub(crate) fn delete_column(&mut self, row: NodeId, column: NodeId) -> Result<()> {
        let width = self.column_state(column).map_or(0, |c| c.width);
        if self.remove_child(row, column)? {
            self.distribute_space(row, width)?;
        }
        Ok(())
    }

    /// Row override of [`Editor::paste_child`]: a column is admitted only if
    /// room for its width can be made; anything else goes to the parent.
    pub(crate) fn paste_column(&mut self, row: NodeId, child: NodeId) -> Result<bool> {
        let Some(width) = self.column_state(child).map(|c| c.width) else {
            return self.paste_child_to_parent(row, child);
        };
        if !self.begin_add_column(row, width)? {
            return Ok(false);
        }
        self.commit_add_column(row)?;
        self.paste_child_by_type(row, child)
    }

    fn column_neighbours(
        &self,
        row: NodeId,
        column: NodeId,
    ) -> Option<(Option<NodeId>, Option<NodeId>)> {
        self.row_state(row).ok()?;
        let siblings = self.children(row);
        let index = siblings.iter().position(|&id| id == column)?;
        self.column_state(column)?;
        let previous = index
            .checked_sub(1)
            .and_then(|i| siblings.get(i).copied())
            .filter(|&id| self.column_state(id).is_some());
        let next = siblings
            .get(index + 1)
            .copied()
            .filter(|&id| self.column_state(id).is_some());
        Some((previous, next))
    }

    fn placement(&self, id: NodeId) -> (i32, i32) {
        self.column_state(id).map_or((0, 0), |c| (c.width, c.offset))
    }

    fn adjust(&mut self, id: NodeId, width: i32, offset: i32) {
        if let Some(column) = self.column_state_mut(id) {
            column.width += width;
            column.offset += offset;
        }
    }

    pub fn can_contract_column_right(
        &self,
        row: NodeId,
        column: NodeId,
        _connect_adjacent: bool,
    ) -> bool {
        self.column_neighbours(row, column).is_some() && self.placement(column).0 > 1
    }

    /// Gives one unit of `column`'s width to its right neighbour: as width
    /// when `connect_adjacent` and they touch, as offset otherwise. A last
    /// column just shrinks.
    pub fn contract_column_right(&mut self, row: NodeId, column: NodeId, connect_adjacent: bool) {
        if !self.can_contract_column_right(row, column, connect_adjacent) {
            return;
        }
        let Some((_, next)) = self.column_neighbours(row, column) else {
            return;
        };
        self.adjust(column, -1, 0);
        if let Some(next) = next {
            if connect_adjacent && self.placement(next).1 == 0 {
                self.adjust(next, 1, 0);
            } else {
                self.adjust(next, 0, 1);
            }
        }
    }

    pub fn can_expand_column_right(
        &self,
        row: NodeId,
        column: NodeId,
        connect_adjacent: bool,
    ) -> bool {
        let Some((_, next)) = self.column_neighbours(row, column) else {
            return false;
        };
        if self.placement(column).0 >= GRID_COLUMNS {
            return false;
        }
        match next {
            Some(next) => {
                let (width, offset) = self.placement(next);
                if connect_adjacent && offset == 0 {
                    width > 1
                } else {
                    offset > 0
                }
            }
            None => self.total_columns_width(row) < GRID_COLUMNS,
        }
    }

    /// Takes one unit for `column` from its right neighbour's width (when
    /// `connect_adjacent` and they touch) or offset, or from vacant space
    /// after the last column.
    pub fn expand_column_right(&mut self, row: NodeId, column: NodeId, connect_adjacent: bool) {
        if !self.can_expand_column_right(row, column, connect_adjacent) {
            return;
        }
        let Some((_, next)) = self.column_neighbours(row, column) else {
            return;
        };
        if let Some(next) = next {
            if connect_adjacent && self.placement(next).1 == 0 {
                self.adjust(next, -1, 0);
            } else {
                self.adjust(next, 0, -1);
            }
        }
        self.adjust(column, 1, 0);
    }

    pub fn can_expand_column_left(
        &self,
        row: NodeId,
        column: NodeId,
        connect_adjacent: bool,
    ) -> bool {
        let Some((previous, _)) = self.column_neighbours(row, column) else {
            return false;
        };
        let (width, offset) = self.placement(column);
        if width >= GRID_COLUMNS {
            return false;
        }
        if let Some(previous) = previous {
            if connect_adjacent && offset == 0 {
                return self.placement(previous).0 > 1;
            }
        }
        offset > 0
    }

    /// Grows `column` leftwards by one unit, taken from the left
    /// neighbour's width (when `connect_adjacent` and they touch) or from
    /// the column's own offset.
    pub fn expand_column_left(&mut self, row: NodeId, column: NodeId, connect_adjacent: bool) {
        if !self.can_expand_column_left(row, column, connect_adjacent) {
            return;
        }
        let Some((previous, _)) = self.column_neighbours(row, column) else {
            return;
        };
        match previous {
            Some(previous) if connect_adjacent && self.placement(column).1 == 0 => {
                self.adjust(previous, -1, 0);
            }
            _ => self.adjust(column, 0, -1),
        }
        self.adjust(column, 1, 0);
    }

    pub fn can_contract_column_left(
        &self,
        row: NodeId,
        column: NodeId,
        _connect_adjacent: bool,
    ) -> bool {
        self.column_neighbours(row, column).is_some() && self.placement(column).0 > 1
    }

    /// Shrinks `column` from the left by one unit, handing it to the left
    /// neighbour's width (when `connect_adjacent` and they touch) or to the
    /// column's own offset.
    pub fn contract_column_left(&mut self, row: NodeId, column: NodeId, connect_adjacent: bool) {
        if !self.can_contract_column_left(row, column, connect_adjacent) {
            return;
        }
        let Some((previous, _)) = self.column_neighbours(row, column) else {
            return;
        };
        match previous {
            Some(previous) if connect_adjacent && self.placement(column).1 == 0 => {
                self.adjust(previous, 1, 0);
            }
            _ => self.adjust(column, 0, 1),
        }
        self.adjust(column, -1, 0);
    }

    /// Resets every column to `12 / n` units with no offset and hands the
    /// remainder out left to right.
    pub fn even_columns(&mut self, row: NodeId) -> Result<()> {
        self.row_state(row)?;
        let columns = self.row_columns(row);
        if columns.is_empty() {
            return Ok(());
        }

        let count = columns.len() as i32;
        let even_width = GRID_COLUMNS / count;
        for &id in &columns {
            if let Some(column) = self.column_state_mut(id) {
                column.width = even_width;
                column.offset = 0;
            }
        }

        let rest = GRID_COLUMNS % count;
        if rest > 0 {
            self.distribute_space(row, rest)?;
        }
        Ok(())
    }

    pub(crate) fn is_row(&self, id: NodeId) -> bool {
        self.element(id)
            .is_some_and(|e| e.element_type() == ElementType::Row)
    }
}
