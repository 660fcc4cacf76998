//! Navigation strip geometry.
//!
//! The pure `compute_*` / [`center_active_button`] functions hold the
//! arithmetic. The `TabSet` methods below read the current boxes from the
//! document, run that arithmetic, and write the results back as style
//! variables, classes, or scroll offsets on this tab set's own nodes.

use tabkit_dom::{Document, NodeId};
use tabkit_types::error::{Result, TabsError};
use tabkit_types::geometry::{Px, Rect, px};

use crate::assembler::BUTTON_CLASS;
use crate::tabset::TabSet;

/// Fixed slack before a scroll arrow shows, in px.
pub const AFFORDANCE_TOLERANCE: Px = 25.0;

/// Inset of the visible band on each side, as a fraction of nav width.
pub const CENTER_INSET_FRACTION: f64 = 0.05;

/// Class toggled on a scroll arrow when it can scroll.
pub const SHOW_CLASS: &str = "show";

/// Position and size of the active-tab indicator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorGeometry {
    pub width: Px,
    pub height: Px,
    pub top: Px,
    pub left: Px,
}

/// Full scrollable size of the navigation strip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackExtent {
    pub width: Px,
    pub height: Px,
}

/// Which scroll arrows should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollAffordances {
    pub can_scroll_back: bool,
    pub can_scroll_forward: bool,
}

/// The indicator copies the active button's offset box.
pub fn compute_indicator(button: Rect) -> IndicatorGeometry {
    IndicatorGeometry {
        width: button.width,
        height: button.height,
        top: button.top,
        left: button.left,
    }
}

pub fn compute_track_extent(scroll_width: Px, scroll_height: Px) -> TrackExtent {
    TrackExtent {
        width: scroll_width,
        height: scroll_height,
    }
}

/// New nav scroll offset that brings the active button back inside the
/// visible band, or `None` if it is already inside.
///
/// The band is inset by 5% of `nav_width` on each side. Overflowing the
/// trailing edge scrolls forward by the next button's width plus the
/// inset (to `offset + nav_width` with no next button). Overflowing the
/// leading edge scrolls back by the previous button's width plus the inset
/// (to 0 with no previous button). Both checks run; the leading-edge one
/// is applied last.
pub fn center_active_button(
    button: Rect,
    nav_width: Px,
    offset: Px,
    next_width: Option<Px>,
    prev_width: Option<Px>,
) -> Option<Px> {
    let inset = nav_width * CENTER_INSET_FRACTION;
    let band_left = offset + inset;
    let band_right = offset + nav_width - inset;

    let mut target = None;
    if button.right() > band_right {
        target = Some(match next_width {
            Some(w) => offset + w + inset,
            None => offset + nav_width,
        });
    }
    if button.left < band_left {
        target = Some(match prev_width {
            Some(w) => offset - w - inset,
            None => 0.0,
        });
    }
    target
}

pub fn compute_scroll_affordances(offset: Px, viewport_width: Px, extent: Px) -> ScrollAffordances {
    ScrollAffordances {
        can_scroll_back: offset > AFFORDANCE_TOLERANCE,
        can_scroll_forward: offset + viewport_width + AFFORDANCE_TOLERANCE < extent,
    }
}

/// Value for `--header-bottom`: one pixel above the header's bottom edge,
/// or 0 when the header is scrolled out above the viewport.
pub fn header_offset(header_bottom: Px) -> Px {
    if header_bottom > 0.0 { header_bottom - 1.0 } else { 0.0 }
}

/// Window scroll target that puts the container just under the header, or
/// `None` when the container top is already below the header bottom.
pub fn scroll_into_view_target(
    container: Rect,
    header: Rect,
    window_scroll_y: Px,
) -> Option<Px> {
    (container.top - header.bottom() < 0.0).then(|| container.top + window_scroll_y - header.height)
}

impl TabSet {
    /// The active button, checked before any geometry read.
    fn active_button(&self) -> Result<NodeId> {
        self.panels
            .get(self.active_index)
            .map(|p| p.button)
            .ok_or_else(|| TabsError::Geometry(format!("{}: no active button", self.id)))
    }

    fn sibling_button_width(&self, doc: &Document, sibling: Option<NodeId>) -> Option<Px> {
        sibling
            .filter(|&s| doc.has_class(s, BUTTON_CLASS))
            .map(|s| doc.offset_box(s).width)
    }

    /// Write `--width/--height/--top/--left` on the indicator.
    pub fn apply_indicator(&self, doc: &mut Document) -> Result<IndicatorGeometry> {
        let button = self.active_button()?;
        let geom = compute_indicator(doc.offset_box(button));
        let indicator = self.handles.indicator;
        doc.set_style(indicator, "--width", &px(geom.width));
        doc.set_style(indicator, "--height", &px(geom.height));
        doc.set_style(indicator, "--top", &px(geom.top));
        doc.set_style(indicator, "--left", &px(geom.left));
        Ok(geom)
    }

    /// Write `--width/--height` on the indicator track.
    pub fn apply_track_extent(&self, doc: &mut Document) -> TrackExtent {
        let scroll = doc.scroll(self.handles.nav);
        let extent = compute_track_extent(scroll.width, scroll.height);
        let track = self.handles.track;
        doc.set_style(track, "--width", &px(extent.width));
        doc.set_style(track, "--height", &px(extent.height));
        extent
    }

    /// Scroll the strip so the active button sits inside the visible band.
    /// Returns the applied offset if it scrolled.
    pub fn apply_centering(&self, doc: &mut Document) -> Result<Option<Px>> {
        let button = self.active_button()?;
        let nav = self.handles.nav;
        let target = center_active_button(
            doc.offset_box(button),
            doc.offset_box(nav).width,
            doc.scroll(nav).left,
            self.sibling_button_width(doc, doc.next_element_sibling(button)),
            self.sibling_button_width(doc, doc.previous_element_sibling(button)),
        );
        Ok(target.map(|t| doc.set_scroll_left(nav, t)))
    }

    /// Toggle `show` on the back/forward arrows.
    pub fn apply_scroll_affordances(&self, doc: &mut Document) -> ScrollAffordances {
        let nav = self.handles.nav;
        let scroll = doc.scroll(nav);
        let state = compute_scroll_affordances(scroll.left, doc.offset_box(nav).width, scroll.width);
        doc.set_class(self.handles.back_arrow, SHOW_CLASS, state.can_scroll_back);
        doc.set_class(self.handles.forward_arrow, SHOW_CLASS, state.can_scroll_forward);
        state
    }

    /// Move the strip by `fraction` of its visible width. Returns the
    /// applied offset.
    pub fn scroll_by(&self, doc: &mut Document, fraction: f64) -> Px {
        let nav = self.handles.nav;
        let amount = doc.offset_box(nav).width * fraction;
        doc.set_scroll_left(nav, doc.scroll(nav).left + amount)
    }

    /// Pin `--header-bottom` on the container. No-op without a header.
    pub fn apply_header_offset(&self, doc: &mut Document) -> Option<Px> {
        let header = self.handles.header?;
        let offset = header_offset(doc.client_rect(header).bottom());
        doc.set_style(self.handles.container, "--header-bottom", &px(offset));
        Some(offset)
    }

    /// Window scroll target after activation. Only with a header.
    pub fn scroll_into_view(&self, doc: &Document, window_scroll_y: Px) -> Option<Px> {
        let header = self.handles.header?;
        scroll_into_view_target(
            doc.client_rect(self.handles.container),
            doc.client_rect(header),
            window_scroll_y,
        )
    }

    /// Drop the initial `visibility: hidden` from indicator and track.
    pub fn reveal(&self, doc: &mut Document) {
        doc.remove_style(self.handles.indicator, "visibility");
        doc.remove_style(self.handles.track, "visibility");
    }

    /// Indicator, track, centering, header offset, affordances.
    pub fn refresh_geometry(&self, doc: &mut Document) -> Result<()> {
        self.apply_indicator(doc)?;
        self.apply_track_extent(doc);
        self.apply_centering(doc)?;
        self.apply_header_offset(doc);
        self.apply_scroll_affordances(doc);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabset::TabSetId;
    use crate::test_utils::{assembled, block_page, strip_boxes};

    #[test]
    fn indicator_copies_button_box() {
        let g = compute_indicator(Rect::new(120.0, 4.0, 80.0, 32.0));
        assert_eq!(
            g,
            IndicatorGeometry {
                width: 80.0,
                height: 32.0,
                top: 4.0,
                left: 120.0
            }
        );
    }

    #[test]
    fn affordance_boundaries() {
        assert!(!compute_scroll_affordances(25.0, 300.0, 1000.0).can_scroll_back);
        assert!(compute_scroll_affordances(26.0, 300.0, 1000.0).can_scroll_back);
        // 675 + 300 + 25 == 1000
        assert!(!compute_scroll_affordances(675.0, 300.0, 1000.0).can_scroll_forward);
        assert!(compute_scroll_affordances(674.0, 300.0, 1000.0).can_scroll_forward);
    }

    #[test]
    fn centering_forward_uses_next_width_plus_inset() {
        // nav 400 wide: inset 20, band [20, 380] at offset 0.
        let button = Rect::new(300.0, 0.0, 100.0, 40.0);
        let target = center_active_button(button, 400.0, 0.0, Some(90.0), Some(80.0));
        assert_eq!(target, Some(0.0 + 90.0 + 20.0));
    }

    #[test]
    fn centering_forward_without_next_scrolls_full_width() {
        let button = Rect::new(300.0, 0.0, 100.0, 40.0);
        assert_eq!(center_active_button(button, 400.0, 50.0, None, None), None);
        let button = Rect::new(400.0, 0.0, 100.0, 40.0);
        assert_eq!(center_active_button(button, 400.0, 50.0, None, None), Some(450.0));
    }

    #[test]
    fn centering_backward_uses_prev_width_or_zero() {
        let button = Rect::new(100.0, 0.0, 100.0, 40.0);
        assert_eq!(
            center_active_button(button, 400.0, 200.0, None, Some(60.0)),
            Some(200.0 - 60.0 - 20.0)
        );
        assert_eq!(center_active_button(button, 400.0, 200.0, None, None), Some(0.0));
    }

    #[test]
    fn centering_inside_band_is_none() {
        let button = Rect::new(100.0, 0.0, 100.0, 40.0);
        assert_eq!(center_active_button(button, 400.0, 0.0, Some(1.0), Some(1.0)), None);
    }

    #[test]
    fn header_offset_clamps() {
        assert_eq!(header_offset(80.0), 79.0);
        assert_eq!(header_offset(0.0), 0.0);
        assert_eq!(header_offset(-40.0), 0.0);
    }

    #[test]
    fn scroll_into_view_only_when_above_header() {
        let header = Rect::new(0.0, 0.0, 1000.0, 80.0);
        let above = Rect::new(0.0, 30.0, 1000.0, 400.0);
        assert_eq!(scroll_into_view_target(above, header, 500.0), Some(30.0 + 500.0 - 80.0));
        let below = Rect::new(0.0, 120.0, 1000.0, 400.0);
        assert_eq!(scroll_into_view_target(below, header, 500.0), None);
    }

    #[test]
    fn apply_writes_style_variables() {
        let (mut doc, _) = block_page(&[("a", "A", 1), ("b", "B", 1), ("c", "C", 1)]);
        let mut set = assembled(&mut doc, TabSetId(1));
        strip_boxes(&mut doc, &set, 100.0, 250.0);
        set.activate(&mut doc, 1).unwrap();

        set.apply_indicator(&mut doc).unwrap();
        let ind = set.handles().indicator;
        assert_eq!(doc.style(ind, "--left"), Some("100px"));
        assert_eq!(doc.style(ind, "--width"), Some("100px"));

        let extent = set.apply_track_extent(&mut doc);
        assert_eq!(extent.width, 300.0);
        assert_eq!(doc.style(set.handles().track, "--width"), Some("300px"));
    }

    #[test]
    fn apply_centering_scrolls_the_nav() {
        let (mut doc, _) = block_page(&[("a", "A", 1), ("b", "B", 1), ("c", "C", 1), ("d", "D", 1)]);
        let mut set = assembled(&mut doc, TabSetId(1));
        // Four 100px buttons in a 250px strip: inset 12.5, band [12.5, 237.5].
        strip_boxes(&mut doc, &set, 100.0, 250.0);
        set.activate(&mut doc, 2).unwrap();
        let applied = set.apply_centering(&mut doc).unwrap();
        assert_eq!(applied, Some(100.0 + 12.5));
        assert_eq!(doc.scroll(set.handles().nav).left, 112.5);

        let state = set.apply_scroll_affordances(&mut doc);
        assert!(state.can_scroll_back);
        assert!(doc.has_class(set.handles().back_arrow, SHOW_CLASS));
        // 112.5 + 250 + 25 < 400
        assert!(state.can_scroll_forward);
    }

    #[test]
    fn scroll_by_moves_half_the_strip() {
        let (mut doc, _) = block_page(&[("a", "A", 1), ("b", "B", 1), ("c", "C", 1), ("d", "D", 1)]);
        let set = assembled(&mut doc, TabSetId(1));
        strip_boxes(&mut doc, &set, 100.0, 200.0);
        assert_eq!(set.scroll_by(&mut doc, 0.5), 100.0);
        assert_eq!(set.scroll_by(&mut doc, 0.5), 200.0);
        assert_eq!(set.scroll_by(&mut doc, 0.5), 200.0);
        assert_eq!(set.scroll_by(&mut doc, -0.5), 100.0);
    }

    #[test]
    fn geometry_guarded_without_panels() {
        let (mut doc, _) = block_page(&[("a", "A", 1)]);
        let mut set = assembled(&mut doc, TabSetId(1));
        set.panels.clear();
        let err = set.apply_indicator(&mut doc).unwrap_err();
        assert!(matches!(err, TabsError::Geometry(_)));
        assert!(set.apply_centering(&mut doc).is_err());
        assert_eq!(doc.style(set.handles().indicator, "--width"), None);
    }

    #[test]
    fn header_coupling_skipped_without_header() {
        let (mut doc, _) = block_page(&[("a", "A", 1)]);
        let set = assembled(&mut doc, TabSetId(1));
        assert_eq!(set.apply_header_offset(&mut doc), None);
        assert_eq!(set.scroll_into_view(&doc, 0.0), None);
        assert_eq!(doc.style(set.root(), "--header-bottom"), None);
    }

    #[test]
    fn reveal_clears_hidden_visibility() {
        let (mut doc, _) = block_page(&[("a", "A", 1)]);
        let set = assembled(&mut doc, TabSetId(1));
        set.reveal(&mut doc);
        assert_eq!(doc.style(set.handles().indicator, "visibility"), None);
        assert_eq!(doc.style(set.handles().track, "visibility"), None);
    }

    mod prop {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn back_affordance_iff_past_tolerance(offset in 0.0f64..2000.0, view in 1.0f64..800.0) {
                let state = compute_scroll_affordances(offset, view, 4000.0);
                prop_assert_eq!(state.can_scroll_back, offset > AFFORDANCE_TOLERANCE);
            }

            #[test]
            fn forward_centering_is_exact(
                overflow in 0.01f64..500.0,
                nav in 100.0f64..1000.0,
                offset in 0.0f64..1000.0,
                next in 1.0f64..300.0,
            ) {
                let inset = nav * CENTER_INSET_FRACTION;
                // Left edge exactly on the band edge, right edge past it.
                let button = Rect::new(offset + inset, 0.0, nav - 2.0 * inset + overflow, 30.0);
                prop_assume!(button.right() > offset + nav - inset);
                let target = center_active_button(button, nav, offset, Some(next), None);
                prop_assert_eq!(target, Some(offset + next + inset));
            }
        }
    }
}
