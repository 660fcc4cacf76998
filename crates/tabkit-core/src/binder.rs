//! Listener registry and per-tab-set event wiring.
//!
//! Listeners are plain data: an owner, a target, a trigger and a
//! [`Binding`] naming what to do. The page looks them up when an event
//! arrives and runs the binding itself, so nothing here holds a callback
//! and teardown is a filter over one `Vec`.

use tabkit_types::event::{EventKind, EventTarget};
use tabkit_types::settings::ActivationMode;

use crate::tabset::{TabSet, TabSetId};

/// Fraction of the strip width one arrow press scrolls.
pub const ARROW_SCROLL_FRACTION: f64 = 0.5;

pub type ListenerId = u64;

/// What a listener waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Event(EventKind),
    /// A tab set finished an activation.
    AfterActivation,
}

/// The work a listener performs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Binding {
    /// Activate panel `n` (click, or Enter/Space on the button).
    Activate(usize),
    /// Start the hover delay for panel `n`.
    HoverStart(usize),
    /// Cancel a pending hover activation.
    HoverCancel,
    /// Scroll the strip by a fraction of its width, then refresh arrows.
    ScrollStrip(f64),
    /// Arrow visibility only.
    RefreshAffordances,
    /// Indicator, track, centering, header offset, affordances.
    RefreshLayout,
    /// Full refresh plus revealing the indicator and track.
    Reveal,
    /// Header offset only.
    RefreshHeader,
    /// Header offset on the next frame; a newer request replaces it.
    DebounceHeader,
    /// Track, indicator, centering, scroll-into-view.
    AfterActivation,
}

/// One registered listener.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Listener {
    pub id: ListenerId,
    pub owner: TabSetId,
    pub target: EventTarget,
    pub trigger: Trigger,
    pub binding: Binding,
}

/// All listeners on a page, in registration order.
#[derive(Debug, Default)]
pub struct ListenerRegistry {
    listeners: Vec<Listener>,
    next_id: ListenerId,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, owner: TabSetId, target: EventTarget, trigger: Trigger, binding: Binding) -> ListenerId {
        self.next_id += 1;
        self.listeners.push(Listener {
            id: self.next_id,
            owner,
            target,
            trigger,
            binding,
        });
        self.next_id
    }

    /// Listeners on exactly `target` for `trigger`, in registration order.
    pub fn matching(&self, target: EventTarget, trigger: Trigger) -> Vec<Listener> {
        self.listeners
            .iter()
            .filter(|l| l.target == target && l.trigger == trigger)
            .copied()
            .collect()
    }

    /// Drop every listener owned by one tab set. Returns how many.
    pub fn remove_owner(&mut self, owner: TabSetId) -> usize {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.owner != owner);
        before - self.listeners.len()
    }

    pub fn count_for(&self, owner: TabSetId) -> usize {
        self.listeners.iter().filter(|l| l.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Register every listener a tab set needs. Returns how many were added.
pub fn bind(registry: &mut ListenerRegistry, tab_set: &TabSet) -> usize {
    let owner = tab_set.id();
    let h = tab_set.handles();
    let before = registry.len();
    let mut on = |target: EventTarget, trigger: Trigger, binding: Binding| {
        registry.add(owner, target, trigger, binding);
    };

    for (index, &button) in h.buttons.iter().enumerate() {
        let target = EventTarget::Node(button);
        on(target, Trigger::Event(EventKind::Click), Binding::Activate(index));
        on(target, Trigger::Event(EventKind::KeyPress), Binding::Activate(index));
        if tab_set.settings().activation == ActivationMode::Hover {
            on(target, Trigger::Event(EventKind::PointerEnter), Binding::HoverStart(index));
            on(target, Trigger::Event(EventKind::PointerLeave), Binding::HoverCancel);
        }
    }

    for (arrow, fraction) in [
        (h.back_arrow, -ARROW_SCROLL_FRACTION),
        (h.forward_arrow, ARROW_SCROLL_FRACTION),
    ] {
        let target = EventTarget::Node(arrow);
        on(target, Trigger::Event(EventKind::Click), Binding::ScrollStrip(fraction));
        on(target, Trigger::Event(EventKind::KeyPress), Binding::ScrollStrip(fraction));
    }

    on(EventTarget::Node(h.nav), Trigger::Event(EventKind::Scroll), Binding::RefreshAffordances);
    on(EventTarget::Window, Trigger::Event(EventKind::Resize), Binding::RefreshLayout);
    on(EventTarget::Window, Trigger::Event(EventKind::Load), Binding::Reveal);
    on(EventTarget::Window, Trigger::Event(EventKind::ContentReady), Binding::Reveal);

    if let Some(header) = h.header {
        on(EventTarget::Node(header), Trigger::Event(EventKind::TransitionEnd), Binding::RefreshHeader);
        on(EventTarget::Window, Trigger::Event(EventKind::WindowScroll), Binding::DebounceHeader);
    }

    on(EventTarget::Node(h.container), Trigger::AfterActivation, Binding::AfterActivation);

    let added = registry.len() - before;
    log::debug!("{owner}: bound {added} listeners");
    added
}
