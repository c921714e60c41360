use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::logging::Logger;
use crate::model::{ElementRecord, ElementType};

use super::audit::{EditorAudit, NullEditorAudit};

/// Serializable editor settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    /// Templates offered by the toolbox. Empty means the default toolbox,
    /// a single empty row.
    #[serde(default)]
    pub toolbox: Vec<ElementRecord>,
}

impl EditorSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub(crate) fn toolbox_templates(&self) -> Vec<ElementRecord> {
        if self.toolbox.is_empty() {
            vec![ElementRecord::new(ElementType::Row)]
        } else {
            self.toolbox.clone()
        }
    }
}

/// Configuration knobs for an editor session.
#[derive(Clone)]
pub struct EditorConfig {
    /// Optional structured logger used by the session.
    pub logger: Option<Logger>,
    /// Receives structural audit records.
    pub audit: Arc<dyn EditorAudit>,
    pub settings: EditorSettings,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            logger: None,
            audit: Arc::new(NullEditorAudit),
            settings: EditorSettings::default(),
        }
    }
}

impl EditorConfig {
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn EditorAudit>) -> Self {
        self.audit = audit;
        self
    }

    pub fn with_settings(mut self, settings: EditorSettings) -> Self {
        self.settings = settings;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_toolbox_is_one_empty_row() {
        let templates = EditorSettings::default().toolbox_templates();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates[0].kind, "Row");
        assert!(templates[0].children().is_empty());
    }

    #[test]
    fn settings_load_from_json() {
        let settings = EditorSettings::from_json(
            r#"{ "toolbox": [ { "type": "Grid", "toolboxLabel": "Grid", "children": [] } ] }"#,
        )
        .unwrap();
        assert_eq!(settings.toolbox.len(), 1);
        assert_eq!(settings.toolbox[0].toolbox_label.as_deref(), Some("Grid"));
    }
}
