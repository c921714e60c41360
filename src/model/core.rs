use std::fmt;

use serde_json::Value;

use crate::error::{EditorError, Result};

/// Number of grid units a row distributes between its columns.
pub const GRID_COLUMNS: i32 = 12;

/// Discriminator for every element that can appear in a layout document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Canvas,
    Grid,
    Row,
    Column,
    Content,
    Html,
}

impl ElementType {
    pub const ALL: [ElementType; 6] = [
        ElementType::Canvas,
        ElementType::Grid,
        ElementType::Row,
        ElementType::Column,
        ElementType::Content,
        ElementType::Html,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::Canvas => "Canvas",
            ElementType::Grid => "Grid",
            ElementType::Row => "Row",
            ElementType::Column => "Column",
            ElementType::Content => "Content",
            ElementType::Html => "Html",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|ty| ty.as_str() == name)
    }

    pub fn is_container(self) -> bool {
        !self.allowed_child_types().is_empty()
    }

    /// Types a container of this type admits as direct children.
    pub fn allowed_child_types(self) -> &'static [ElementType] {
        match self {
            ElementType::Canvas => &[ElementType::Canvas, ElementType::Grid, ElementType::Content],
            ElementType::Grid => &[ElementType::Row],
            ElementType::Row => &[ElementType::Column],
            ElementType::Column => &[ElementType::Grid, ElementType::Content],
            ElementType::Content | ElementType::Html => &[],
        }
    }

    /// Containable elements are admitted by any container regardless of its
    /// allowed child types.
    pub fn is_containable(self) -> bool {
        matches!(self, ElementType::Canvas | ElementType::Html)
    }

    pub fn accepts(self, child: ElementType) -> bool {
        self.allowed_child_types().contains(&child) || child.is_containable()
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presentation hints read from toolbox templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolboxInfo {
    pub icon: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
}

/// Fields shared by every element.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementState {
    pub element_type: ElementType,
    pub data: Option<Value>,
    pub html_id: Option<String>,
    pub html_class: Option<String>,
    pub html_style: Option<String>,
    pub is_templated: bool,
    pub rule: Option<String>,
    pub toolbox: ToolboxInfo,
}

impl ElementState {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            data: None,
            html_id: None,
            html_class: None,
            html_style: None,
            is_templated: false,
            rule: None,
            toolbox: ToolboxInfo::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingChange {
    width: i32,
    offset: i32,
}

/// Grid placement of a column plus a one-deep snapshot used while a row
/// redistributes space.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnState {
    pub width: i32,
    pub offset: i32,
    pub collapsible: Option<bool>,
    pending: Option<PendingChange>,
}

impl ColumnState {
    pub fn new(width: i32, offset: i32) -> Self {
        Self {
            width,
            offset,
            collapsible: None,
            pending: None,
        }
    }

    pub fn has_pending_change(&self) -> bool {
        self.pending.is_some()
    }

    pub fn begin_change(&mut self) -> Result<()> {
        if self.pending.is_some() {
            return Err(EditorError::PendingChangeExists);
        }
        self.pending = Some(PendingChange {
            width: self.width,
            offset: self.offset,
        });
        Ok(())
    }

    pub fn commit_change(&mut self) -> Result<()> {
        self.pending
            .take()
            .map(|_| ())
            .ok_or(EditorError::NoPendingChange)
    }

    pub fn rollback_change(&mut self) -> Result<()> {
        let snapshot = self.pending.take().ok_or(EditorError::NoPendingChange)?;
        self.width = snapshot.width;
        self.offset = snapshot.offset;
        Ok(())
    }

    pub fn span(&self) -> i32 {
        self.width + self.offset
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowState {
    pub(crate) adding_column: bool,
}

impl RowState {
    pub fn is_adding_column(&self) -> bool {
        self.adding_column
    }
}

/// Content payload shared by `Content` and `Html` elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContentState {
    pub content_type: Option<String>,
    pub content_type_label: Option<String>,
    pub content_type_class: Option<String>,
    html: Option<String>,
    html_unsafe: Option<String>,
    pub has_editor: Option<bool>,
}

impl ContentState {
    pub fn html(&self) -> Option<&str> {
        self.html.as_deref()
    }

    pub fn html_unsafe(&self) -> Option<&str> {
        self.html_unsafe.as_deref()
    }

    /// Hosts that sanitize or sync markup wrap this; the model only keeps
    /// both copies in step.
    pub fn set_html(&mut self, html: Option<String>) {
        self.html_unsafe = html.clone();
        self.html = html;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Variant {
    Canvas,
    Grid,
    Row(RowState),
    Column(ColumnState),
    Content(ContentState),
    Html(ContentState),
}

impl Variant {
    pub fn element_type(&self) -> ElementType {
        match self {
            Variant::Canvas => ElementType::Canvas,
            Variant::Grid => ElementType::Grid,
            Variant::Row(_) => ElementType::Row,
            Variant::Column(_) => ElementType::Column,
            Variant::Content(_) => ElementType::Content,
            Variant::Html(_) => ElementType::Html,
        }
    }
}

/// A node of the layout document: shared element state composed with the
/// variant-specific state.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub state: ElementState,
    pub variant: Variant,
}

impl Element {
    pub fn new(variant: Variant) -> Self {
        Self {
            state: ElementState::new(variant.element_type()),
            variant,
        }
    }

    pub fn element_type(&self) -> ElementType {
        self.state.element_type
    }

    pub fn is_container(&self) -> bool {
        self.element_type().is_container()
    }

    pub fn is_templated(&self) -> bool {
        self.state.is_templated
    }

    pub fn column(&self) -> Option<&ColumnState> {
        match &self.variant {
            Variant::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn column_mut(&mut self) -> Option<&mut ColumnState> {
        match &mut self.variant {
            Variant::Column(column) => Some(column),
            _ => None,
        }
    }

    pub fn row(&self) -> Option<&RowState> {
        match &self.variant {
            Variant::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn row_mut(&mut self) -> Option<&mut RowState> {
        match &mut self.variant {
            Variant::Row(row) => Some(row),
            _ => None,
        }
    }

    pub fn content(&self) -> Option<&ContentState> {
        match &self.variant {
            Variant::Content(content) | Variant::Html(content) => Some(content),
            _ => None,
        }
    }

    pub fn content_mut(&mut self) -> Option<&mut ContentState> {
        match &mut self.variant {
            Variant::Content(content) | Variant::Html(content) => Some(content),
            _ => None,
        }
    }
}

/// An owned element tree that has not been mounted into an editor yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementNode {
    pub element: Element,
    pub children: Vec<ElementNode>,
}

impl ElementNode {
    pub fn leaf(element: Element) -> Self {
        Self {
            element,
            children: Vec::new(),
        }
    }

    pub fn with_children(element: Element, children: Vec<ElementNode>) -> Self {
        Self { element, children }
    }
}
