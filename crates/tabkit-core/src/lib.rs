//! tabkit engine.
//!
//! Finds tab hosts in a [`Document`](tabkit_dom::Document), collects panel
//! sources through a [`ContentAdapter`], assembles the widget markup, and
//! keeps exactly one panel active while the host feeds it events. The
//! [`Page`] type is the entry point; everything else is usable on its own.

pub mod adapters;
pub mod assembler;
pub mod binder;
pub mod controller;
pub mod layout;
pub mod notify;
pub mod page;
pub mod query;
pub mod scheduler;
pub mod tabset;
pub mod viewport;

#[cfg(test)]
pub(crate) mod test_utils;

pub use adapters::{AdapterKind, ContentAdapter, Fragment, PanelSource};
pub use controller::AfterActivation;
pub use layout::{LayoutEngine, StripLayout};
pub use notify::Notification;
pub use page::{InitReport, Page, ScrollRequest, TeardownMode, Window};
pub use tabset::{TabSet, TabSetId};
