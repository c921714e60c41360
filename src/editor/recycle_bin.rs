use indextree::NodeId;

/// Session-scoped holding area for deleted elements.
///
/// Recycled subtrees stay in the editor arena, detached, so they can still
/// be inspected or serialized. Nothing moves them back into the document.
#[derive(Debug, Clone, Default)]
pub struct RecycleBin {
    elements: Vec<NodeId>,
}

impl RecycleBin {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, element: NodeId) {
        self.elements.push(element);
    }

    pub fn elements(&self) -> &[NodeId] {
        &self.elements
    }

    pub fn contains(&self, element: NodeId) -> bool {
        self.elements.contains(&element)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
