use indextree::NodeId;

use crate::clipboard::{Clipboard, TEXT_JSON, TEXT_PLAIN};
use crate::error::Result;
use crate::logging::{LogLevel, json_str};
use crate::model::ElementRecord;

use super::Editor;
use super::audit::EditorAuditStage;

impl Editor {
    /// Writes the inner text and the tab-indented record of `id`.
    pub fn copy(&self, id: NodeId, clipboard: &mut dyn Clipboard) -> Result<()> {
        let text = self.inner_text(id)?;
        let json = self.to_object(id)?.to_pretty_json()?;
        clipboard.set_data(TEXT_PLAIN, text);
        clipboard.set_data(TEXT_JSON, json);
        Ok(())
    }

    /// Copies then deletes `id`. Does nothing when it cannot be deleted.
    pub fn cut(&mut self, id: NodeId, clipboard: &mut dyn Clipboard) -> Result<()> {
        if !self.can_delete(id) {
            return Ok(());
        }
        self.copy(id, clipboard)?;
        self.delete(id)
    }

    /// Pastes the clipboard's JSON record into `id`, or into its parent
    /// when `id` is not a container. The pasted element bubbles up the
    /// tree until a container admits it; returns false and discards it
    /// when none does, or when the clipboard holds no record.
    pub fn paste(&mut self, id: NodeId, clipboard: &dyn Clipboard) -> Result<bool> {
        if !self.node(id)?.is_container() {
            return match self.parent(id) {
                Some(parent) => self.paste(parent, clipboard),
                None => Ok(false),
            };
        }

        let Some(json) = clipboard.get_data(TEXT_JSON).filter(|json| !json.is_empty()) else {
            return Ok(false);
        };
        let record = ElementRecord::from_json(&json)?;
        let child = self.instantiate(&record)?;

        match self.paste_child(id, child) {
            Ok(true) => Ok(true),
            Ok(false) => {
                self.record(EditorAuditStage::PasteDropped, child, id);
                self.log(
                    LogLevel::Debug,
                    "paste_dropped",
                    [json_str("type", record.kind.as_str())],
                );
                self.release_subtree(child);
                Ok(false)
            }
            Err(err) => {
                if self.parent(child).is_none() {
                    self.release_subtree(child);
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::{editor_from, placements, row_editor};
    use super::*;
    use crate::clipboard::MemoryClipboard;
    use crate::editor::audit::{BufferedEditorAudit, EditorAudit};
    use crate::error::EditorError;
    use crate::model::ElementType;
    use serde_json::json;
    use std::sync::Arc;

    fn document() -> Editor {
        editor_from(json!({
            "type": "Canvas",
            "children": [
                { "type": "Grid", "children": [
                    { "type": "Row", "children": [
                        { "type": "Column", "width": 12, "offset": 0, "children": [{
                            "type": "Content",
                            "contentType": "Paragraph",
                            "html": "<p>Hello &amp; welcome</p>"
                        }] }
                    ] }
                ] },
                { "type": "Html", "html": "<b>Bold</b>" }
            ]
        }))
    }

    #[test]
    fn copy_writes_text_and_tab_indented_record() {
        let editor = document();
        let html = editor.children(editor.canvas())[1];
        let mut clipboard = MemoryClipboard::new();

        editor.copy(html, &mut clipboard).unwrap();
        assert_eq!(clipboard.get_data(TEXT_PLAIN).as_deref(), Some("Bold"));
        let json = clipboard.get_data(TEXT_JSON).unwrap();
        assert!(json.contains("\n\t\"type\": \"Html\""));
        assert_eq!(ElementRecord::from_json(&json).unwrap().kind, "Html");
    }

    #[test]
    fn cut_moves_element_to_recycle_bin() {
        let mut editor = document();
        let html = editor.children(editor.canvas())[1];
        let mut clipboard = MemoryClipboard::new();

        editor.cut(html, &mut clipboard).unwrap();
        assert_eq!(editor.children(editor.canvas()).len(), 1);
        assert!(editor.recycle_bin().contains(html));
        assert!(clipboard.get_data(TEXT_JSON).is_some());
    }

    #[test]
    fn cut_of_templated_element_does_nothing() {
        let mut editor = document();
        let html = editor.children(editor.canvas())[1];
        editor.set_is_templated(html, true).unwrap();
        let mut clipboard = MemoryClipboard::new();

        editor.cut(html, &mut clipboard).unwrap();
        assert!(clipboard.is_empty());
        assert_eq!(editor.children(editor.canvas()).len(), 2);
    }

    #[test]
    fn paste_on_leaf_targets_its_container() {
        let mut editor = document();
        let grid = editor.children(editor.canvas())[0];
        let row = editor.children(grid)[0];
        let column = editor.children(row)[0];
        let content = editor.children(column)[0];

        let mut clipboard = MemoryClipboard::new();
        editor.copy(content, &mut clipboard).unwrap();
        assert!(editor.paste(content, &clipboard).unwrap());

        let pasted = editor.children(column);
        assert_eq!(pasted.len(), 2);
        assert_eq!(editor.focused_element(), Some(pasted[1]));
        assert_eq!(editor.inner_text(pasted[1]).unwrap(), "Hello & welcome");
    }

    #[test]
    fn pasted_row_bubbles_to_grid() {
        let mut editor = document();
        let grid = editor.children(editor.canvas())[0];
        let row = editor.children(grid)[0];
        let column = editor.children(row)[0];

        let mut clipboard = MemoryClipboard::new();
        editor.copy(row, &mut clipboard).unwrap();
        assert!(editor.paste(column, &clipboard).unwrap());

        let rows = editor.children(grid);
        assert_eq!(rows.len(), 2);
        assert_eq!(
            editor.element(rows[1]).map(|e| e.element_type()),
            Some(ElementType::Row)
        );
    }

    #[test]
    fn paste_without_record_does_nothing() {
        let mut editor = document();
        let canvas = editor.canvas();
        let mut clipboard = MemoryClipboard::new();
        assert!(!editor.paste(canvas, &clipboard).unwrap());

        clipboard.set_data(TEXT_JSON, String::new());
        assert!(!editor.paste(canvas, &clipboard).unwrap());
        assert_eq!(editor.children(canvas).len(), 2);
    }

    #[test]
    fn paste_of_malformed_record_fails() {
        let mut editor = document();
        let canvas = editor.canvas();
        let mut clipboard = MemoryClipboard::new();

        clipboard.set_data(TEXT_JSON, "{ not json".to_string());
        assert!(matches!(editor.paste(canvas, &clipboard), Err(EditorError::Json(_))));

        clipboard.set_data(TEXT_JSON, r#"{ "type": "Widget" }"#.to_string());
        assert!(matches!(
            editor.paste(canvas, &clipboard),
            Err(EditorError::UnknownElementType(_))
        ));
    }

    #[test]
    fn unplaceable_paste_is_dropped_and_audited() {
        let (mut editor, row) = row_editor(&[(6, 0), (6, 0)]);
        let audit = Arc::new(BufferedEditorAudit::new());
        let shared: Arc<dyn EditorAudit> = audit.clone();
        editor.audit = shared;

        // A column only fits in a row; the row has no width to give.
        let mut clipboard = MemoryClipboard::new();
        clipboard.set_data(TEXT_JSON, ElementRecord::column(12, 0).to_pretty_json().unwrap());
        let canvas = editor.canvas();
        assert!(!editor.paste(canvas, &clipboard).unwrap());
        assert!(!editor.paste(row, &clipboard).unwrap());

        assert_eq!(placements(&editor, row), vec![(6, 0), (6, 0)]);
        let dropped = audit
            .stages()
            .into_iter()
            .filter(|stage| *stage == EditorAuditStage::PasteDropped)
            .count();
        assert_eq!(dropped, 2);
    }
}
