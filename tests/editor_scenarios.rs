use std::sync::{Arc, Mutex};

use layout_editor::{
    BufferedEditorAudit, Clipboard, Editor, EditorAudit, EditorAuditStage, EditorConfig,
    EditorError, EditorSettings, ElementRecord, ElementRegistry, ElementType, Logger,
    MemoryClipboard, MemorySink, NodeId, TEXT_JSON, builtin_from,
};
use serde_json::json;

fn load(document: serde_json::Value) -> Editor {
    let record: ElementRecord = serde_json::from_value(document).expect("record");
    Editor::new(
        EditorConfig::default(),
        Arc::new(ElementRegistry::builtin()),
        &record,
    )
    .expect("editor")
}

fn two_column_page() -> Editor {
    load(json!({
        "type": "Canvas",
        "children": [{
            "type": "Grid",
            "children": [{
                "type": "Row",
                "children": [
                    { "type": "Column", "width": 4, "offset": 0, "children": [
                        { "type": "Content", "contentType": "Text", "html": "<p>left</p>" }
                    ] },
                    { "type": "Column", "width": 8, "offset": 0, "children": [] }
                ]
            }]
        }]
    }))
}

fn first_row(editor: &Editor) -> NodeId {
    let grid = editor.children(editor.canvas())[0];
    editor.children(grid)[0]
}

fn widths(editor: &Editor, row: NodeId) -> Vec<(i32, i32)> {
    editor
        .children(row)
        .into_iter()
        .filter_map(|id| editor.element(id)?.column().map(|c| (c.width, c.offset)))
        .collect()
}

#[test]
fn deleting_a_column_hands_its_width_back() {
    let mut editor = two_column_page();
    let row = first_row(&editor);
    let left = editor.children(row)[0];

    editor.set_is_focused(left).expect("focus");
    editor.delete(left).expect("delete");

    assert_eq!(widths(&editor, row), vec![(12, 0)]);
    assert!(editor.recycle_bin().contains(left));
    let survivor = editor.children(row)[0];
    assert_eq!(editor.focused_element(), Some(survivor));
    assert!(editor.is_dirty().expect("digest"));

    let bin = editor.recycle_bin_to_object().expect("bin");
    assert_eq!(bin.kind, "RecycleBin");
    assert_eq!(bin.children()[0].width, Some(4));
}

#[test]
fn adding_a_column_is_a_two_phase_edit() {
    let mut editor = load(json!({
        "type": "Canvas",
        "children": [{ "type": "Grid", "children": [{ "type": "Row", "children": [
            { "type": "Column", "width": 12, "offset": 0, "children": [] }
        ] }] }]
    }));
    let row = first_row(&editor);

    assert!(editor.can_add_column(row));
    assert!(editor.begin_add_column(row, 3).expect("begin"));
    assert_eq!(widths(&editor, row), vec![(9, 0)]);
    editor.commit_add_column(row).expect("commit");

    let column = editor.instantiate(&ElementRecord::column(3, 0)).expect("column");
    assert!(editor.add_child(row, column).expect("add"));
    assert_eq!(widths(&editor, row), vec![(9, 0), (3, 0)]);
    assert_eq!(editor.total_columns_width(row), 12);

    assert!(matches!(
        editor.commit_add_column(row),
        Err(EditorError::NoAddColumnInProgress)
    ));
}

#[test]
fn split_then_even_out() {
    let mut editor = two_column_page();
    let row = first_row(&editor);
    let wide = editor.children(row)[1];

    let half = editor.split(wide).expect("split").expect("new column");
    assert_eq!(widths(&editor, row), vec![(4, 0), (4, 0), (4, 0)]);
    assert_eq!(editor.focused_element(), Some(half));

    editor.delete(half).expect("delete");
    editor.even_columns(row).expect("even");
    assert_eq!(widths(&editor, row), vec![(6, 0), (6, 0)]);
}

#[test]
fn cut_and_paste_moves_content_between_columns() {
    let mut editor = two_column_page();
    let row = first_row(&editor);
    let columns = editor.children(row);
    let content = editor.children(columns[0])[0];

    let mut clipboard = MemoryClipboard::new();
    editor.cut(content, &mut clipboard).expect("cut");
    assert!(editor.children(columns[0]).is_empty());

    assert!(editor.paste(columns[1], &clipboard).expect("paste"));
    let pasted = editor.children(columns[1]);
    assert_eq!(pasted.len(), 1);
    assert_eq!(editor.inner_text(pasted[0]).expect("text"), "left");
    assert_eq!(editor.focused_element(), Some(pasted[0]));
}

#[test]
fn serialized_tree_round_trips() {
    let editor = two_column_page();
    let record = editor.canvas_to_object().expect("object");
    let text = record.to_pretty_json().expect("json");

    let reloaded = load(serde_json::from_str(&text).expect("value"));
    assert_eq!(reloaded.canvas_to_object().expect("object"), record);
    assert!(!reloaded.is_dirty().expect("digest"));
}

#[test]
fn templated_elements_resist_edits() {
    let mut editor = load(json!({
        "type": "Canvas",
        "children": [{ "type": "Grid", "children": [{ "type": "Row", "children": [
            { "type": "Column", "width": 6, "offset": 0, "children": [] },
            { "type": "Column", "width": 6, "offset": 0, "children": [] }
        ] }] }]
    }));
    let grid = editor.children(editor.canvas())[0];
    let row = first_row(&editor);
    let column = editor.children(row)[0];

    assert!(editor.can_delete(column));
    editor.set_is_templated(grid, true).expect("template");
    assert!(!editor.can_delete(column));
    assert!(!editor.can_split(column));
    assert!(!editor.can_contract_right(column, true));

    editor.delete(column).expect("delete");
    assert_eq!(editor.children(row).len(), 2);
    assert!(editor.recycle_bin().is_empty());
}

#[test]
fn custom_factory_and_toolbox_settings() {
    let mut registry = ElementRegistry::builtin();
    registry.register("Snippet", |record: &ElementRecord, registry: &ElementRegistry| {
        builtin_from(ElementType::Html, record, registry)
    });
    let settings = EditorSettings::from_json(
        r#"{ "toolbox": [
            { "type": "Snippet", "html": "<em>hi</em>", "toolboxLabel": "Snippet" }
        ] }"#,
    )
    .expect("settings");

    let canvas = ElementRecord::new(ElementType::Canvas);
    let mut editor = Editor::new(
        EditorConfig::default().with_settings(settings),
        Arc::new(registry),
        &canvas,
    )
    .expect("editor");

    let snippet = editor
        .take_toolbox_element(0)
        .expect("take")
        .expect("toolbox entry");
    assert!(editor.add_child(editor.canvas(), snippet).expect("add"));
    assert_eq!(editor.inner_text(snippet).expect("text"), "hi");
    assert!(editor.take_toolbox_element(0).expect("take").is_none());

    editor.reset_toolbox_elements();
    assert_eq!(editor.toolbox_elements().len(), 1);
}

#[test]
fn structural_edits_are_audited_and_logged() {
    let audit = Arc::new(BufferedEditorAudit::new());
    let sink = MemorySink::new();
    let shared: Arc<dyn EditorAudit> = audit.clone();
    let config = EditorConfig::default()
        .with_audit(shared)
        .with_logger(Logger::new(sink.clone()));
    let row = ElementRecord::new(ElementType::Row)
        .with_children(vec![ElementRecord::column(6, 0), ElementRecord::column(6, 0)]);
    let grid = ElementRecord::new(ElementType::Grid).with_children(vec![row]);
    let record = ElementRecord::new(ElementType::Canvas).with_children(vec![grid]);
    let mut editor =
        Editor::new(config, Arc::new(ElementRegistry::builtin()), &record).expect("editor");
    audit.drain();

    let row = first_row(&editor);
    let column = editor.children(row)[1];
    editor.delete(column).expect("delete");

    assert!(audit.stages().contains(&EditorAuditStage::ChildDeleted));
    assert!(sink.messages().iter().any(|m| m == "element_recycled"));
}

#[test]
fn focus_handlers_run_on_focus() {
    let mut editor = two_column_page();
    let row = first_row(&editor);
    let column = editor.children(row)[1];
    let seen = Arc::new(Mutex::new(Vec::new()));

    let record = Arc::clone(&seen);
    editor
        .add_focus_handler(column, move |id| {
            record.lock().expect("lock").push(id);
            Ok(())
        })
        .expect("handler");
    editor.set_is_focused(column).expect("focus");

    assert_eq!(*seen.lock().expect("lock"), vec![column]);
    assert!(editor.is_selected(column));
}

#[test]
fn unknown_types_are_rejected_at_every_entry_point() {
    let record: ElementRecord =
        serde_json::from_value(json!({ "type": "Carousel" })).expect("record");
    let registry = ElementRegistry::builtin();
    assert!(matches!(
        registry.element_from(&record),
        Err(EditorError::UnknownElementType(name)) if name == "Carousel"
    ));

    let mut editor = two_column_page();
    let mut clipboard = MemoryClipboard::new();
    clipboard.set_data(TEXT_JSON, r#"{ "type": "Carousel" }"#.to_string());
    let canvas = editor.canvas();
    assert!(editor.paste(canvas, &clipboard).is_err());

}

#[test]
fn toolbox_row_presets_fill_the_grid() {
    let presets = (1..=4)
        .map(|count| {
            ElementRecord::new(ElementType::Row).with_children(ElementRecord::columns(count))
        })
        .collect();
    let settings = EditorSettings { toolbox: presets };
    let canvas = ElementRecord::new(ElementType::Canvas)
        .with_children(vec![ElementRecord::new(ElementType::Grid)]);
    let mut editor = Editor::new(
        EditorConfig::default().with_settings(settings),
        Arc::new(ElementRegistry::builtin()),
        &canvas,
    )
    .expect("editor");
    let grid = editor.children(editor.canvas())[0];

    let row = editor
        .take_toolbox_element(2)
        .expect("take")
        .expect("three-column preset");
    assert!(editor.add_child(grid, row).expect("add"));
    assert_eq!(widths(&editor, row), vec![(4, 0), (4, 0), (4, 0)]);
    assert_eq!(editor.total_columns_width(row), 12);
}
