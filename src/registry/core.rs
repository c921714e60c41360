use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{EditorError, Result};
use crate::model::{ElementNode, ElementRecord, ElementType, Variant};

/// Builds an unmounted element tree from a plain-data record. Factories
/// receive the registry so they can deserialize nested children.
pub type ElementFactory =
    Arc<dyn Fn(&ElementRecord, &ElementRegistry) -> Result<ElementNode> + Send + Sync>;

/// Type-keyed factory table used for every deserialization.
#[derive(Clone, Default)]
pub struct ElementRegistry {
    factories: HashMap<String, ElementFactory>,
}

impl ElementRegistry {
    /// An empty registry. Most callers want [`ElementRegistry::builtin`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a factory for each built-in element type.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for element_type in ElementType::ALL {
            registry.register(element_type.as_str(), move |record, registry| {
                builtin_from(element_type, record, registry)
            });
        }
        registry
    }

    /// Registers (or replaces) the factory for `type_name`.
    pub fn register<F>(&mut self, type_name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(&ElementRecord, &ElementRegistry) -> Result<ElementNode> + Send + Sync + 'static,
    {
        self.factories.insert(type_name.into(), Arc::new(factory));
        self
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.factories.contains_key(type_name)
    }

    pub fn element_from(&self, record: &ElementRecord) -> Result<ElementNode> {
        if record.kind.is_empty() {
            return Err(EditorError::MissingType);
        }
        let factory = self
            .factories
            .get(&record.kind)
            .ok_or_else(|| EditorError::UnknownElementType(record.kind.clone()))?;
        factory(record, self)
    }

    /// Deserializes `records` in order; the first failure aborts the batch.
    pub fn children_from(&self, records: &[ElementRecord]) -> Result<Vec<ElementNode>> {
        records
            .iter()
            .map(|record| self.element_from(record))
            .collect()
    }
}

impl fmt::Debug for ElementRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.factories.keys().collect();
        types.sort();
        f.debug_struct("ElementRegistry")
            .field("types", &types)
            .finish()
    }
}

/// Deserializes `record` as a built-in element of `element_type`, whatever
/// its `type` field says. Host factories use this to alias custom type
/// names onto the built-in variants.
pub fn builtin_from(
    element_type: ElementType,
    record: &ElementRecord,
    registry: &ElementRegistry,
) -> Result<ElementNode> {
    let variant = match element_type {
        ElementType::Canvas => Variant::Canvas,
        ElementType::Grid => Variant::Grid,
        ElementType::Row => Variant::Row(record.row_state()),
        ElementType::Column => Variant::Column(record.column_state()),
        ElementType::Content => Variant::Content(record.content_state()),
        ElementType::Html => Variant::Html(record.content_state()),
    };
    let element = record.to_element(variant);

    if !element_type.is_container() {
        return Ok(ElementNode::leaf(element));
    }
    let children = registry.children_from(record.children())?;
    Ok(ElementNode::with_children(element, children))
}
