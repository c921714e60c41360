//! Document model for a drag-and-drop page layout editor.
//!
//! A layout is a tree rooted at a `Canvas`: grids hold rows, rows hold
//! columns on a 12-unit grid, and columns and canvases hold content. The
//! [`Editor`] owns the tree and the session state around it (focus,
//! selection, drag flags, the recycle bin) and exposes every structural
//! edit the host UI needs.

pub mod clipboard;
pub mod editor;
pub mod error;
pub mod logging;
pub mod model;
pub mod registry;

pub use clipboard::{Clipboard, MemoryClipboard, TEXT_JSON, TEXT_PLAIN};
pub use editor::audit::{
    BufferedEditorAudit, EditorAudit, EditorAuditEvent, EditorAuditEventBuilder,
    EditorAuditStage, NullEditorAudit,
};
pub use editor::{Editor, EditorConfig, EditorSettings, FocusHandler, HandlerError, RecycleBin};
pub use error::{EditorError, Result};
pub use indextree::NodeId;
pub use logging::{
    EDITOR_TARGET, LogEvent, LogFields, LogLevel, LogSink, Logger, LoggingError, LoggingResult,
    MemorySink,
};
pub use model::{
    ColumnState, ContentState, Element, ElementNode, ElementRecord, ElementState, ElementType,
    GRID_COLUMNS, RowState, ToolboxInfo, Variant, strip_html,
};
pub use registry::{ElementFactory, ElementRegistry, builtin_from};
