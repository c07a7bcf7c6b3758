//! Host geometry.
//!
//! Menu placement needs the viewport size and the on-screen rectangles of
//! ranges and nodes, which only the host rendering the page can answer.

use std::collections::HashMap;

use clarify_dom::{BoundingBox, Document, NodeId, Range, ViewportInfo};
use parking_lot::RwLock;

/// Geometry provider supplied by the host.
pub trait LayoutProvider: Send + Sync {
    fn viewport(&self) -> ViewportInfo;

    /// Viewport-relative rectangle of a node.
    fn node_rect(&self, doc: &Document, node: NodeId) -> BoundingBox;

    /// Viewport-relative rectangle enclosing a range.
    fn range_rect(&self, doc: &Document, range: &Range) -> BoundingBox;
}

/// Layout with fixed rectangles, for headless hosts and tests.
///
/// Nodes without a registered rectangle report `fallback`; ranges report the
/// rectangle of their start node.
pub struct StaticLayout {
    viewport: ViewportInfo,
    fallback: BoundingBox,
    rects: RwLock<HashMap<NodeId, BoundingBox>>,
}

impl StaticLayout {
    pub fn new(viewport: ViewportInfo) -> Self {
        Self {
            viewport,
            fallback: BoundingBox::default(),
            rects: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_fallback(mut self, rect: BoundingBox) -> Self {
        self.fallback = rect;
        self
    }

    pub fn set_rect(&self, node: NodeId, rect: BoundingBox) {
        self.rects.write().insert(node, rect);
    }
}

impl Default for StaticLayout {
    fn default() -> Self {
        Self::new(ViewportInfo::default())
    }
}

impl LayoutProvider for StaticLayout {
    fn viewport(&self) -> ViewportInfo {
        self.viewport
    }

    fn node_rect(&self, _doc: &Document, node: NodeId) -> BoundingBox {
        self.rects.read().get(&node).copied().unwrap_or(self.fallback)
    }

    fn range_rect(&self, doc: &Document, range: &Range) -> BoundingBox {
        self.node_rect(doc, range.start().node)
    }
}
