use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

use super::core::{
    ColumnState, ContentState, Element, ElementState, ElementType, GRID_COLUMNS, RowState,
    ToolboxInfo, Variant,
};

/// Plain-data form of an element, used for persistence and clipboard
/// exchange.
///
/// Fields that do not apply to an element's type are omitted on output.
/// Fields this crate does not know about are kept in `extra` so host
/// factories can read them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_style: Option<String>,
    #[serde(default, deserialize_with = "null_as_false")]
    pub is_templated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsible: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type_class: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_editor: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbox_icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbox_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolbox_description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ElementRecord>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn null_as_false<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

impl ElementRecord {
    pub fn new(element_type: ElementType) -> Self {
        let mut record = Self {
            kind: element_type.as_str().to_string(),
            ..Self::default()
        };
        if element_type.is_container() {
            record.children = Some(Vec::new());
        }
        record
    }

    pub fn column(width: i32, offset: i32) -> Self {
        Self {
            width: Some(width),
            offset: Some(offset),
            ..Self::new(ElementType::Column)
        }
    }

    /// `count` empty columns of equal width `12 / count`, rounded down.
    /// At most 12 columns are built.
    pub fn columns(count: usize) -> Vec<Self> {
        let count = count.min(GRID_COLUMNS as usize);
        if count == 0 {
            return Vec::new();
        }
        let width = GRID_COLUMNS / count as i32;
        (0..count).map(|_| Self::column(width, 0)).collect()
    }

    pub fn content(content_type: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            html: Some(html.into()),
            ..Self::new(ElementType::Content)
        }
    }

    pub fn html_block(html: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            ..Self::new(ElementType::Html)
        }
    }

    pub fn with_children(mut self, children: Vec<ElementRecord>) -> Self {
        self.children = Some(children);
        self
    }

    pub fn templated(mut self) -> Self {
        self.is_templated = true;
        self
    }

    pub fn children(&self) -> &[ElementRecord] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Compact JSON, used for dirty-state digests.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Tab-indented JSON, the clipboard exchange format.
    pub fn to_pretty_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
        let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8(out)?)
    }

    /// Builds an element of `variant`'s type from the shared fields of this
    /// record. Children are not touched.
    pub fn to_element(&self, variant: Variant) -> Element {
        let mut element = Element::new(variant);
        element.state = ElementState {
            element_type: element.state.element_type,
            data: self.data.clone(),
            html_id: self.html_id.clone(),
            html_class: self.html_class.clone(),
            html_style: self.html_style.clone(),
            is_templated: self.is_templated,
            rule: self.rule.clone(),
            toolbox: ToolboxInfo {
                icon: self.toolbox_icon.clone(),
                label: self.toolbox_label.clone(),
                description: self.toolbox_description.clone(),
            },
        };
        element
    }

    /// Column placement from this record. Missing values fill the row;
    /// out-of-range ones are clamped so the column fits a 12-unit row.
    pub fn column_state(&self) -> ColumnState {
        let width = self.width.unwrap_or(GRID_COLUMNS).clamp(1, GRID_COLUMNS);
        let offset = self.offset.unwrap_or(0).clamp(0, GRID_COLUMNS - width);
        let mut column = ColumnState::new(width, offset);
        column.collapsible = self.collapsible;
        column
    }

    pub fn row_state(&self) -> RowState {
        RowState::default()
    }

    pub fn content_state(&self) -> ContentState {
        let mut content = ContentState::default();
        content.content_type = self.content_type.clone();
        content.content_type_label = self.content_type_label.clone();
        content.content_type_class = self.content_type_class.clone();
        content.has_editor = self.has_editor;
        content.set_html(self.html.clone());
        content
    }

    /// Shared plus variant fields of `element`. Containers get an empty
    /// `children` list for the caller to fill.
    pub fn from_element(element: &Element) -> Self {
        let state = &element.state;
        let mut record = Self {
            data: state.data.clone(),
            html_id: state.html_id.clone(),
            html_class: state.html_class.clone(),
            html_style: state.html_style.clone(),
            is_templated: state.is_templated,
            rule: state.rule.clone(),
            ..Self::new(state.element_type)
        };

        match &element.variant {
            Variant::Column(column) => {
                record.width = Some(column.width);
                record.offset = Some(column.offset);
                record.collapsible = column.collapsible;
            }
            Variant::Content(content) | Variant::Html(content) => {
                record.content_type = content.content_type.clone();
                record.content_type_label = content.content_type_label.clone();
                record.content_type_class = content.content_type_class.clone();
                record.html = content.html().map(str::to_string);
                record.has_editor = content.has_editor;
            }
            Variant::Canvas | Variant::Grid | Variant::Row(_) => {}
        }

        record
    }
}
