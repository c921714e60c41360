//! Element model: types, per-variant state and the plain-data record form.

mod core;
mod record;
mod text;

pub use self::core::{
    ColumnState, ContentState, Element, ElementNode, ElementState, ElementType, GRID_COLUMNS,
    RowState, ToolboxInfo, Variant,
};
pub use record::ElementRecord;
pub use text::strip_html;
