//! Per-node geometry: offset boxes, client rects, scroll metrics.
//!
//! The document never computes layout itself. A host writes these values
//! after its own layout pass (or a layout engine does), and the widget reads
//! them the way browser code reads `offsetLeft`, `getBoundingClientRect()`
//! and `scrollLeft`.

use tabkit_types::event::NodeId;
use tabkit_types::geometry::{Px, Rect};

use crate::dom::Document;

/// Scroll state of a scroll container.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollMetrics {
    /// Horizontal scroll offset (`scrollLeft`).
    pub left: Px,
    /// Vertical scroll offset (`scrollTop`).
    pub top: Px,
    /// Total scrollable content width (`scrollWidth`).
    pub width: Px,
    /// Total scrollable content height (`scrollHeight`).
    pub height: Px,
}

/// Geometry attached to every node.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutBox {
    /// Box relative to the offset parent.
    pub offset: Rect,
    /// Box relative to the window viewport.
    pub client: Rect,
    pub scroll: ScrollMetrics,
}

impl Document {
    pub fn offset_box(&self, id: NodeId) -> Rect {
        self.get(id).layout.offset
    }

    pub fn set_offset_box(&mut self, id: NodeId, rect: Rect) {
        self.get_mut(id).layout.offset = rect;
    }

    pub fn client_rect(&self, id: NodeId) -> Rect {
        self.get(id).layout.client
    }

    pub fn set_client_rect(&mut self, id: NodeId, rect: Rect) {
        self.get_mut(id).layout.client = rect;
    }

    pub fn scroll(&self, id: NodeId) -> ScrollMetrics {
        self.get(id).layout.scroll
    }

    /// Set the scrollable extent of a container.
    pub fn set_scroll_extent(&mut self, id: NodeId, width: Px, height: Px) {
        let scroll = &mut self.get_mut(id).layout.scroll;
        scroll.width = width;
        scroll.height = height;
    }

    /// Largest valid horizontal scroll offset.
    pub fn max_scroll_left(&self, id: NodeId) -> Px {
        let layout = &self.get(id).layout;
        (layout.scroll.width - layout.offset.width).max(0.0)
    }

    /// Set `scrollLeft`, clamped to `[0, scrollWidth - offsetWidth]` the way
    /// a browser clamps it. Returns the applied offset.
    pub fn set_scroll_left(&mut self, id: NodeId, left: Px) -> Px {
        let clamped = left.clamp(0.0, self.max_scroll_left(id));
        self.get_mut(id).layout.scroll.left = clamped;
        clamped
    }
}
