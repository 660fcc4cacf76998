//! Foundation types for tabkit.
//!
//! This crate contains the types shared by every tabkit crate: the error
//! type, pixel geometry, host-delivered page events, and the layered
//! settings model.

pub mod error;
pub mod event;
pub mod geometry;
pub mod settings;

pub use error::{Result, TabsError};
pub use geometry::{Px, Rect};
