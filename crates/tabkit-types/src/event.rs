//! Host-delivered page events.
//!
//! Every host (browser glue, test harness, demo binary) maps its native
//! events to these enums. The engine never sees raw platform input.

use serde::{Deserialize, Serialize};

use crate::geometry::Px;

/// Index of a node in the page's document arena.
pub type NodeId = usize;

/// Where an event is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The page window (resize, load, window scroll).
    Window,
    /// A document node. Delivery walks from the node up through its
    /// ancestors.
    Node(NodeId),
}

/// Keys that matter to keyboard-activatable controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Enter,
    Space,
    Tab,
    Escape,
    Other,
}

impl Key {
    /// Whether this key activates a focused control.
    pub fn activates(self) -> bool {
        matches!(self, Key::Enter | Key::Space)
    }
}

/// A platform-agnostic page event.
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Pointer click on a node.
    Click { target: NodeId },
    /// Key pressed while a node has focus.
    KeyPress { target: NodeId, key: Key },
    /// Pointer entered a node.
    PointerEnter { target: NodeId },
    /// Pointer left a node.
    PointerLeave { target: NodeId },
    /// A scroll container scrolled. The host has already written the new
    /// offset into the document.
    Scroll { target: NodeId },
    /// A CSS transition finished on a node.
    TransitionEnd { target: NodeId },
    /// The window scrolled to a new vertical offset.
    WindowScroll { scroll_y: Px },
    /// The window was resized.
    Resize { width: Px, height: Px },
    /// The document finished parsing.
    ContentReady,
    /// The page and its subresources finished loading.
    Load,
}

/// The listener-matching key for a [`PageEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    KeyPress,
    PointerEnter,
    PointerLeave,
    Scroll,
    TransitionEnd,
    WindowScroll,
    Resize,
    ContentReady,
    Load,
}

impl PageEvent {
    /// The listener-matching kind of this event.
    pub fn kind(&self) -> EventKind {
        match self {
            PageEvent::Click { .. } => EventKind::Click,
            PageEvent::KeyPress { .. } => EventKind::KeyPress,
            PageEvent::PointerEnter { .. } => EventKind::PointerEnter,
            PageEvent::PointerLeave { .. } => EventKind::PointerLeave,
            PageEvent::Scroll { .. } => EventKind::Scroll,
            PageEvent::TransitionEnd { .. } => EventKind::TransitionEnd,
            PageEvent::WindowScroll { .. } => EventKind::WindowScroll,
            PageEvent::Resize { .. } => EventKind::Resize,
            PageEvent::ContentReady => EventKind::ContentReady,
            PageEvent::Load => EventKind::Load,
        }
    }

    /// Where this event is delivered.
    pub fn target(&self) -> EventTarget {
        match self {
            PageEvent::Click { target }
            | PageEvent::KeyPress { target, .. }
            | PageEvent::PointerEnter { target }
            | PageEvent::PointerLeave { target }
            | PageEvent::Scroll { target }
            | PageEvent::TransitionEnd { target } => EventTarget::Node(*target),
            PageEvent::WindowScroll { .. }
            | PageEvent::Resize { .. }
            | PageEvent::ContentReady
            | PageEvent::Load => EventTarget::Window,
        }
    }

    /// Whether delivery walks up the ancestor chain.
    ///
    /// Pointer enter/leave and element scroll fire on the node itself only.
    pub fn bubbles(&self) -> bool {
        matches!(
            self,
            PageEvent::Click { .. } | PageEvent::KeyPress { .. } | PageEvent::TransitionEnd { .. }
        )
    }
}
