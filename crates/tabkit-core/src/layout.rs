//! Optional layout pass for hosts without a rendering engine.
//!
//! A browser host writes real boxes into the document. A headless host can
//! plug in a [`LayoutEngine`] instead; the page runs it after assembly and
//! on every resize, before any geometry is recomputed.

use tabkit_dom::Document;
use tabkit_types::geometry::{Px, Rect};
use tabkit_types::settings::LayoutMode;

use crate::tabset::TabSet;

/// Computes boxes for one tab set's navigation strip.
pub trait LayoutEngine {
    fn layout(&self, doc: &mut Document, tab_set: &TabSet, viewport_width: Px);
}

/// Fixed-metric strip layout: each button is as wide as its label at a
/// constant character width, plus padding.
#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    pub char_width: Px,
    /// Horizontal padding on each side of a label.
    pub padding: Px,
    pub button_height: Px,
}

impl Default for StripLayout {
    fn default() -> Self {
        Self {
            char_width: 8.0,
            padding: 16.0,
            button_height: 40.0,
        }
    }
}

impl StripLayout {
    fn button_width(&self, label: &str) -> Px {
        label.trim().chars().count() as Px * self.char_width + 2.0 * self.padding
    }
}

impl LayoutEngine for StripLayout {
    fn layout(&self, doc: &mut Document, tab_set: &TabSet, viewport_width: Px) {
        let h = tab_set.handles();
        let widths: Vec<Px> = h
            .buttons
            .iter()
            .map(|&b| self.button_width(&doc.text_content(b)))
            .collect();

        match tab_set.settings().layout {
            LayoutMode::Horizontal => {
                let mut x = 0.0;
                for (&button, &w) in h.buttons.iter().zip(&widths) {
                    doc.set_offset_box(button, Rect::new(x, 0.0, w, self.button_height));
                    x += w;
                }
                doc.set_offset_box(h.nav, Rect::new(0.0, 0.0, viewport_width, self.button_height));
                doc.set_scroll_extent(h.nav, x.max(viewport_width), self.button_height);
            },
            LayoutMode::Vertical => {
                let column = widths.iter().copied().fold(0.0, Px::max);
                let mut y = 0.0;
                for &button in &h.buttons {
                    doc.set_offset_box(button, Rect::new(0.0, y, column, self.button_height));
                    y += self.button_height;
                }
                doc.set_offset_box(h.nav, Rect::new(0.0, 0.0, column, y));
                doc.set_scroll_extent(h.nav, column, y);
            },
        }
        // Keep the current offset valid for the new extent.
        let left = doc.scroll(h.nav).left;
        doc.set_scroll_left(h.nav, left);
    }
}
