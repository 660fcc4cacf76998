//! Arena document model for tabkit.
//!
//! The engine never talks to a real browser DOM. It mutates this
//! [`Document`] instead: a flat arena of nodes linked by index, carrying the
//! attributes, classes and inline style the widget writes, plus the layout
//! boxes and scroll metrics a host or layout engine supplies.

pub mod dom;
pub mod layout;
pub mod query;
pub mod selector;
pub mod serialize;

pub use dom::{Attribute, Document, ElementData, Node, NodeKind, TagName};
pub use layout::{LayoutBox, ScrollMetrics};
pub use selector::Selector;
pub use tabkit_types::event::NodeId;
