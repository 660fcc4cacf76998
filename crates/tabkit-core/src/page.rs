//! Page runtime: owns the document and every live tab set on it.
//!
//! The host constructs a [`Page`], runs [`Page::init`], and then feeds it
//! [`PageEvent`]s and clock ticks. All work happens synchronously inside
//! those calls.

use std::collections::{BTreeMap, HashMap, HashSet};

use tabkit_dom::{Document, NodeId};
use tabkit_net::{Fetcher, HttpFetcher};
use tabkit_types::error::{Result, TabsError};
use tabkit_types::event::{EventTarget, PageEvent};
use tabkit_types::geometry::Px;
use tabkit_types::settings::{SettingsLayer, TabsSettings};
use url::Url;

use crate::adapters::{AdapterContext, AdapterKind, find_hosts};
use crate::assembler::{self, CONTAINER_CLASS};
use crate::binder::{self, Binding, ListenerRegistry, Trigger};
use crate::controller::AfterActivation;
use crate::layout::LayoutEngine;
use crate::notify::{Notification, Notifier};
use crate::query::query_values;
use crate::scheduler::{Scheduler, TimerId};
use crate::tabset::{TabSet, TabSetId};

/// Body class set once the widget stylesheet is in.
pub const STYLESHEET_CLASS: &str = "tabs-css-loaded";

// ---------------------------------------------------------------------------
// Window state
// ---------------------------------------------------------------------------

/// A window scroll the page asked the host to perform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: Px,
    pub smooth: bool,
}

/// The host window as the page sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    pub width: Px,
    pub height: Px,
    pub scroll_y: Px,
    /// Most recent scroll-into-view request, for the host to carry out.
    pub last_scroll_request: Option<ScrollRequest>,
}

impl Default for Window {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
            scroll_y: 0.0,
            last_scroll_request: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Lifecycle types
// ---------------------------------------------------------------------------

/// How [`Page::teardown`] leaves the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownMode {
    /// Move original content back, drop added classes, remove the
    /// container. A later init pass rebuilds from the restored markup.
    Restore,
    /// Leave the assembled markup in place and only stop behavior.
    Detach,
}

/// Outcome of one initialization pass.
#[derive(Debug, Default)]
pub struct InitReport {
    pub created: Vec<TabSetId>,
    /// Per-host failures and skipped sources. Never fatal to the pass.
    pub errors: Vec<TabsError>,
}

/// Deferred page work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Task {
    HoverActivate { tab_set: TabSetId, index: usize },
    HeaderOffset(TabSetId),
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

pub struct Page {
    doc: Document,
    window: Window,
    address: Url,
    global: SettingsLayer,
    options: SettingsLayer,
    fetcher: Box<dyn Fetcher>,
    layout: Option<Box<dyn LayoutEngine>>,
    scheduler: Scheduler<Task>,
    listeners: ListenerRegistry,
    notifier: Notifier,
    tab_sets: BTreeMap<TabSetId, TabSet>,
    /// Host nodes already handed to an adapter.
    processed: HashSet<NodeId>,
    next_id: u32,
    loaded: bool,
    hover_timers: HashMap<TabSetId, TimerId>,
    header_frames: HashMap<TabSetId, TimerId>,
}

fn lookup(tab_sets: &BTreeMap<TabSetId, TabSet>, id: TabSetId) -> Result<&TabSet> {
    tab_sets
        .get(&id)
        .ok_or_else(|| TabsError::UnknownTabSet(id.to_string()))
}

impl Page {
    /// Wrap a document served from `address`.
    pub fn new(doc: Document, address: &str) -> Result<Self> {
        Ok(Self {
            doc,
            window: Window::default(),
            address: Url::parse(address)?,
            global: SettingsLayer::default(),
            options: SettingsLayer::default(),
            fetcher: Box::new(HttpFetcher::new()),
            layout: None,
            scheduler: Scheduler::new(),
            listeners: ListenerRegistry::new(),
            notifier: Notifier::new(),
            tab_sets: BTreeMap::new(),
            processed: HashSet::new(),
            next_id: 0,
            loaded: false,
            hover_timers: HashMap::new(),
            header_frames: HashMap::new(),
        })
    }

    /// Site-wide settings, below per-instance attributes.
    pub fn with_global_settings(mut self, global: SettingsLayer) -> Self {
        self.global = global;
        self
    }

    pub fn with_fetcher(mut self, fetcher: Box<dyn Fetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_layout_engine(mut self, engine: Box<dyn LayoutEngine>) -> Self {
        self.layout = Some(engine);
        self
    }

    pub fn with_window(mut self, window: Window) -> Self {
        self.window = window;
        self
    }

    // -- Accessors --

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable document access for host-side edits and layout writes.
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn address(&self) -> &Url {
        &self.address
    }

    pub fn tab_set(&self, id: TabSetId) -> Option<&TabSet> {
        self.tab_sets.get(&id)
    }

    pub fn tab_set_ids(&self) -> Vec<TabSetId> {
        self.tab_sets.keys().copied().collect()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn on_notification(&mut self, observer: impl FnMut(&Notification) + 'static) {
        self.notifier.subscribe(Box::new(observer));
    }

    // -- Initialization --

    /// Build a tab set for every unprocessed host on the page. `options`
    /// is the top settings layer and is kept for later passes triggered
    /// by load events.
    pub fn init(&mut self, options: SettingsLayer) -> InitReport {
        self.options = options;
        self.init_pass()
    }

    fn init_pass(&mut self) -> InitReport {
        let mut report = InitReport::default();
        for (host, kind) in find_hosts(&self.doc, self.doc.root()) {
            if self.processed.contains(&host) || self.inside_tab_set(host) {
                continue;
            }
            match self.build(host, kind) {
                Ok((id, skipped)) => {
                    for e in &skipped {
                        log::warn!("{id}: {e}");
                    }
                    report.created.push(id);
                    report.errors.extend(skipped);
                },
                Err(e) => {
                    log::warn!("Skipping {kind:?} host at node {host}: {e}");
                    report.errors.push(e);
                },
            }
        }
        if !report.created.is_empty() || !report.errors.is_empty() {
            log::info!(
                "Init pass: {} tab sets created, {} errors",
                report.created.len(),
                report.errors.len()
            );
        }
        report
    }

    /// Hosts moved into a container by an earlier build in the same pass.
    fn inside_tab_set(&self, host: NodeId) -> bool {
        self.doc
            .ancestors(host)
            .any(|a| self.doc.has_class(a, CONTAINER_CLASS))
    }

    fn build(&mut self, host: NodeId, kind: AdapterKind) -> Result<(TabSetId, Vec<TabsError>)> {
        self.processed.insert(host);
        let adapter = kind.adapter();
        let outer = TabsSettings::resolve(&[&self.global, &self.options]);
        let cx = AdapterContext {
            fetcher: self.fetcher.as_ref(),
            base: &self.address,
            settings: &outer,
            claimed: &self.processed,
        };
        let output = adapter.collect(&mut self.doc, host, &cx)?;

        let settings = TabsSettings::resolve(&[&self.global, &output.local, &self.options]);
        let marks = output.marks.clone();
        self.processed.extend(output.consumed.iter().copied());
        self.next_id += 1;
        let id = TabSetId(self.next_id);

        let assembly = match assembler::assemble(&mut self.doc, output, settings, id) {
            Ok(assembly) => assembly,
            Err(e) => {
                for (node, class) in &marks {
                    self.doc.remove_class(*node, class);
                }
                return Err(e);
            },
        };
        let mut tab_set = assembly.tab_set;

        if let Some(engine) = &self.layout {
            engine.layout(&mut self.doc, &tab_set, self.window.width);
        }
        let query = query_values(&self.address, &tab_set.settings().query_key);
        let emitted = tab_set.initialize(&mut self.doc, &query)?;
        binder::bind(&mut self.listeners, &tab_set);
        self.tab_sets.insert(id, tab_set);

        for after in emitted {
            self.after_activation(after);
        }
        if self.loaded {
            self.run_binding(id, Binding::Reveal);
        }
        log::info!("{id}: created by {} adapter", adapter.name());
        Ok((id, assembly.skipped))
    }

    // -- Activation --

    /// Activate panel `index` of tab set `id`, then run the after-activation
    /// work and notify observers before returning.
    pub fn activate(&mut self, id: TabSetId, index: usize) -> Result<AfterActivation> {
        let tab_set = self
            .tab_sets
            .get_mut(&id)
            .ok_or_else(|| TabsError::UnknownTabSet(id.to_string()))?;
        let after = tab_set.activate(&mut self.doc, index).inspect_err(|e| {
            log::warn!("{id}: rejected activation: {e}");
        })?;
        self.after_activation(after);
        Ok(after)
    }

    fn after_activation(&mut self, after: AfterActivation) {
        let target = EventTarget::Node(after.root);
        for listener in self.listeners.matching(target, Trigger::AfterActivation) {
            self.run_binding(listener.owner, listener.binding);
        }
        self.notifier.emit(&Notification::AfterActivation(after));
    }

    // -- Events --

    /// Deliver a host event. Element events walk from the target up
    /// through its ancestors when they bubble; listeners on one node run
    /// in registration order.
    pub fn dispatch(&mut self, event: PageEvent) {
        match event {
            PageEvent::WindowScroll { scroll_y } => self.window.scroll_y = scroll_y,
            PageEvent::Resize { width, height } => {
                self.window.width = width;
                self.window.height = height;
                self.run_layout();
            },
            PageEvent::Load | PageEvent::ContentReady => self.loaded = true,
            _ => {},
        }

        if let PageEvent::KeyPress { key, .. } = event
            && !key.activates()
        {
            return;
        }
        if let EventTarget::Node(node) = event.target()
            && !self.doc.contains_id(node)
        {
            log::warn!("Dropping {:?} event for unknown node {node}", event.kind());
            return;
        }

        let trigger = Trigger::Event(event.kind());
        let path: Vec<EventTarget> = match event.target() {
            EventTarget::Node(node) if event.bubbles() => std::iter::once(node)
                .chain(self.doc.ancestors(node))
                .map(EventTarget::Node)
                .collect(),
            target => vec![target],
        };
        for target in path {
            for listener in self.listeners.matching(target, trigger) {
                self.run_binding(listener.owner, listener.binding);
            }
        }

        if matches!(event, PageEvent::Load | PageEvent::ContentReady) {
            self.init_pass();
        }
    }

    fn run_layout(&mut self) {
        if let Some(engine) = &self.layout {
            for tab_set in self.tab_sets.values() {
                engine.layout(&mut self.doc, tab_set, self.window.width);
            }
        }
    }

    fn run_binding(&mut self, owner: TabSetId, binding: Binding) {
        if let Err(e) = self.try_binding(owner, binding) {
            log::warn!("{owner}: {binding:?} failed: {e}");
        }
    }

    fn try_binding(&mut self, owner: TabSetId, binding: Binding) -> Result<()> {
        match binding {
            Binding::Activate(index) => {
                self.activate(owner, index)?;
            },
            Binding::HoverStart(index) => {
                let delay = lookup(&self.tab_sets, owner)?.settings().hover_delay_ms;
                if let Some(pending) = self.hover_timers.remove(&owner) {
                    self.scheduler.cancel(pending);
                }
                let timer = self.scheduler.set_timeout(
                    owner,
                    delay,
                    Task::HoverActivate {
                        tab_set: owner,
                        index,
                    },
                );
                self.hover_timers.insert(owner, timer);
            },
            Binding::HoverCancel => {
                if let Some(pending) = self.hover_timers.remove(&owner) {
                    self.scheduler.cancel(pending);
                }
            },
            Binding::ScrollStrip(fraction) => {
                let tab_set = lookup(&self.tab_sets, owner)?;
                tab_set.scroll_by(&mut self.doc, fraction);
                tab_set.apply_scroll_affordances(&mut self.doc);
            },
            Binding::RefreshAffordances => {
                lookup(&self.tab_sets, owner)?.apply_scroll_affordances(&mut self.doc);
            },
            Binding::RefreshLayout => {
                lookup(&self.tab_sets, owner)?.refresh_geometry(&mut self.doc)?;
            },
            Binding::Reveal => {
                let tab_set = lookup(&self.tab_sets, owner)?;
                tab_set.refresh_geometry(&mut self.doc)?;
                tab_set.reveal(&mut self.doc);
            },
            Binding::RefreshHeader => {
                lookup(&self.tab_sets, owner)?.apply_header_offset(&mut self.doc);
            },
            Binding::DebounceHeader => {
                if let Some(pending) = self.header_frames.remove(&owner) {
                    self.scheduler.cancel(pending);
                }
                let frame = self.scheduler.request_frame(owner, Task::HeaderOffset(owner));
                self.header_frames.insert(owner, frame);
            },
            Binding::AfterActivation => {
                let tab_set = lookup(&self.tab_sets, owner)?;
                tab_set.apply_track_extent(&mut self.doc);
                tab_set.apply_indicator(&mut self.doc)?;
                // A strip scroll fires no host event here, so the arrows
                // are refreshed directly.
                if tab_set.apply_centering(&mut self.doc)?.is_some() {
                    tab_set.apply_scroll_affordances(&mut self.doc);
                }
                if let Some(top) = tab_set.scroll_into_view(&self.doc, self.window.scroll_y) {
                    log::debug!("{owner}: scrolling window to {top}");
                    self.window.last_scroll_request = Some(ScrollRequest { top, smooth: true });
                }
            },
        }
        Ok(())
    }

    // -- Clock --

    /// Move the virtual clock forward and run due timers.
    pub fn advance(&mut self, ms: u64) {
        let due = self.scheduler.advance(ms);
        self.run_tasks(due);
    }

    /// Run work queued for the next frame.
    pub fn run_frame(&mut self) {
        let queued = self.scheduler.run_frame();
        self.run_tasks(queued);
    }

    fn run_tasks(&mut self, tasks: Vec<Task>) {
        for task in tasks {
            match task {
                Task::HoverActivate { tab_set, index } => {
                    self.hover_timers.remove(&tab_set);
                    // Rejections are already logged by activate.
                    let _ = self.activate(tab_set, index);
                },
                Task::HeaderOffset(id) => {
                    self.header_frames.remove(&id);
                    if let Some(tab_set) = self.tab_sets.get(&id) {
                        tab_set.apply_header_offset(&mut self.doc);
                    }
                },
            }
        }
    }

    // -- Host signals --

    /// The widget stylesheet finished loading.
    pub fn stylesheet_loaded(&mut self) {
        if let Some(body) = self.doc.body() {
            self.doc.add_class(body, STYLESHEET_CLASS);
        }
        self.notifier.emit(&Notification::StylesheetReady);
    }

    /// Re-resolve one tab set's handles after the host rebuilt its markup.
    pub fn refresh_handles(&mut self, id: TabSetId) -> Result<()> {
        self.tab_sets
            .get_mut(&id)
            .ok_or_else(|| TabsError::UnknownTabSet(id.to_string()))?
            .refresh_handles(&self.doc)
    }

    // -- Teardown --

    /// Stop one tab set: unregister its listeners and cancel its timers,
    /// then leave or restore the markup per `mode`.
    pub fn teardown(&mut self, id: TabSetId, mode: TeardownMode) -> Result<()> {
        let tab_set = self
            .tab_sets
            .remove(&id)
            .ok_or_else(|| TabsError::UnknownTabSet(id.to_string()))?;
        let listeners = self.listeners.remove_owner(id);
        let timers = self.scheduler.cancel_owner(id);
        self.hover_timers.remove(&id);
        self.header_frames.remove(&id);

        if mode == TeardownMode::Restore {
            assembler::restore(&mut self.doc, &tab_set);
            for node in &tab_set.origin().consumed {
                self.processed.remove(node);
            }
        }
        log::info!("{id}: torn down ({mode:?}), {listeners} listeners and {timers} timers dropped");
        Ok(())
    }

    /// Tear down every live tab set. Returns how many.
    pub fn teardown_all(&mut self, mode: TeardownMode) -> usize {
        let ids = self.tab_set_ids();
        ids.iter()
            .filter(|&&id| self.teardown(id, mode).is_ok())
            .count()
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("address", &self.address.as_str())
            .field("tab_sets", &self.tab_sets.len())
            .field("listeners", &self.listeners.len())
            .field("pending", &self.scheduler.pending())
            .field("loaded", &self.loaded)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ACTIVE_CLASS;
    use crate::layout::StripLayout;
    use crate::test_utils::{add_block_group, block_page};
    use crate::viewport::SHOW_CLASS;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tabkit_net::MemoryFetcher;
    use tabkit_types::event::Key;
    use tabkit_types::geometry::Rect;
    use tabkit_types::settings::{ActivationMode, LayoutMode};

    const ADDRESS: &str = "https://site.test/page";

    fn page(doc: Document) -> Page {
        Page::new(doc, ADDRESS)
            .unwrap()
            .with_fetcher(Box::new(MemoryFetcher::new()))
    }

    /// Two independent block groups, each in its own section.
    fn two_section_doc() -> Document {
        let (mut doc, main) = block_page(&[]);
        for (prefix, section_id) in [("a", "first"), ("b", "second")] {
            let section = doc.create_element("section");
            doc.set_attribute(section, "id", section_id);
            doc.append_child(main, section);
            for i in 0..3 {
                let id = format!("{prefix}{i}");
                add_block_group(&mut doc, section, &id, &id.to_uppercase(), 1);
            }
        }
        doc
    }

    fn hover() -> SettingsLayer {
        SettingsLayer {
            event: Some(ActivationMode::Hover),
            ..SettingsLayer::default()
        }
    }

    fn button(page: &Page, id: TabSetId, index: usize) -> NodeId {
        page.tab_set(id).unwrap().handles().buttons[index]
    }

    fn active(page: &Page, id: TabSetId) -> usize {
        page.tab_set(id).unwrap().active_index()
    }

    fn with_header(doc: &mut Document) -> NodeId {
        let header = doc.create_element("header");
        let body = doc.body().unwrap();
        let first = doc.children(body).first().copied();
        doc.insert_before(body, header, first);
        header
    }

    #[test]
    fn init_builds_each_host_once() {
        let mut page = page(two_section_doc());
        let report = page.init(SettingsLayer::default());
        assert_eq!(report.created, vec![TabSetId(1), TabSetId(2)]);
        assert!(report.errors.is_empty());
        assert_eq!(page.tab_set(TabSetId(1)).unwrap().len(), 3);

        let again = page.init(SettingsLayer::default());
        assert!(again.created.is_empty());
        assert_eq!(page.tab_set_ids().len(), 2);
    }

    #[test]
    fn activation_is_isolated_between_tab_sets() {
        let mut page = page(two_section_doc());
        page.init(SettingsLayer::default());
        let (a, b) = (TabSetId(1), TabSetId(2));
        let b_html = page.document().outer_html(page.tab_set(b).unwrap().root());

        page.activate(a, 2).unwrap();
        assert_eq!(active(&page, a), 2);
        assert_eq!(active(&page, b), 0);
        assert_eq!(page.document().outer_html(page.tab_set(b).unwrap().root()), b_html);
    }

    #[test]
    fn one_malformed_source_does_not_fail_the_instance() {
        let (doc, _) = block_page(&[("a", "A", 1), ("b", "B", 0), ("c", "C", 1)]);
        let mut page = page(doc);
        let report = page.init(SettingsLayer::default());
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert!(matches!(report.errors[0], TabsError::Construction(_)));
        assert_eq!(page.tab_set(report.created[0]).unwrap().len(), 2);
    }

    #[test]
    fn host_failure_is_isolated() {
        let (mut doc, _) = block_page(&[("a", "A", 1)]);
        let coll = doc.create_element("div");
        doc.set_attribute(coll, "data-collection", "/missing");
        let body = doc.body().unwrap();
        doc.append_child(body, coll);

        let mut page = page(doc);
        let report = page.init(SettingsLayer::default());
        assert_eq!(report.created.len(), 1);
        assert!(matches!(report.errors[0], TabsError::AdapterFetch(_)));
        assert!(!page.document().has_class(coll, "loading"));
    }

    #[test]
    fn reactivation_re_emits_exactly_once() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut page = page(two_section_doc());
        let log = Rc::clone(&seen);
        page.on_notification(move |n| {
            if let Notification::AfterActivation(after) = n {
                log.borrow_mut().push((after.tab_set, after.index));
            }
        });
        page.init(SettingsLayer::default());
        seen.borrow_mut().clear();

        page.activate(TabSetId(1), 0).unwrap();
        assert_eq!(*seen.borrow(), vec![(TabSetId(1), 0)]);
        assert_eq!(active(&page, TabSetId(1)), 0);
    }

    #[test]
    fn bad_activation_is_rejected() {
        let mut page = page(two_section_doc());
        page.init(SettingsLayer::default());
        page.activate(TabSetId(1), 1).unwrap();

        let err = page.activate(TabSetId(1), 9).unwrap_err();
        assert!(matches!(err, TabsError::Activation { index: 9, len: 3 }));
        assert_eq!(active(&page, TabSetId(1)), 1);
        let err = page.activate(TabSetId(42), 0).unwrap_err();
        assert!(matches!(err, TabsError::UnknownTabSet(_)));
    }

    #[test]
    fn click_on_label_bubbles_to_button() {
        let mut page = page(two_section_doc());
        page.init(SettingsLayer::default());
        let label = page.document().children(button(&page, TabSetId(2), 1))[0];

        page.dispatch(PageEvent::Click { target: label });
        assert_eq!(active(&page, TabSetId(2)), 1);
        assert_eq!(active(&page, TabSetId(1)), 0);
        assert!(page.document().has_class(button(&page, TabSetId(2), 1), ACTIVE_CLASS));
    }

    #[test]
    fn only_enter_and_space_activate() {
        let mut page = page(two_section_doc());
        page.init(SettingsLayer::default());
        let target = button(&page, TabSetId(1), 2);

        page.dispatch(PageEvent::KeyPress { target, key: Key::Tab });
        assert_eq!(active(&page, TabSetId(1)), 0);
        page.dispatch(PageEvent::KeyPress { target, key: Key::Space });
        assert_eq!(active(&page, TabSetId(1)), 2);
    }

    #[test]
    fn hover_activates_after_delay() {
        let mut page = page(two_section_doc());
        page.init(hover());
        let target = button(&page, TabSetId(1), 1);

        page.dispatch(PageEvent::PointerEnter { target });
        page.advance(79);
        assert_eq!(active(&page, TabSetId(1)), 0);
        page.advance(1);
        assert_eq!(active(&page, TabSetId(1)), 1);
        assert_eq!(page.pending_tasks(), 0);
    }

    #[test]
    fn pointer_leave_cancels_hover() {
        let mut page = page(two_section_doc());
        page.init(hover());
        let target = button(&page, TabSetId(1), 1);

        page.dispatch(PageEvent::PointerEnter { target });
        page.advance(40);
        page.dispatch(PageEvent::PointerLeave { target });
        page.advance(200);
        assert_eq!(active(&page, TabSetId(1)), 0);
    }

    #[test]
    fn new_hover_replaces_pending_one() {
        let mut page = page(two_section_doc());
        page.init(hover());
        let (first, second) = (button(&page, TabSetId(1), 1), button(&page, TabSetId(1), 2));

        page.dispatch(PageEvent::PointerEnter { target: first });
        page.advance(50);
        page.dispatch(PageEvent::PointerEnter { target: second });
        page.advance(50);
        assert_eq!(active(&page, TabSetId(1)), 0);
        page.advance(30);
        assert_eq!(active(&page, TabSetId(1)), 2);
    }

    #[test]
    fn click_mode_ignores_hover() {
        let mut page = page(two_section_doc());
        page.init(SettingsLayer::default());
        let target = button(&page, TabSetId(1), 1);
        page.dispatch(PageEvent::PointerEnter { target });
        page.advance(500);
        assert_eq!(active(&page, TabSetId(1)), 0);
    }

    /// `ul[data-tabs-targets]` under `parent`, one `li[data-target]` per target.
    fn selector_host(doc: &mut Document, parent: NodeId, targets: &[&str]) -> NodeId {
        let list = doc.create_element("ul");
        doc.set_attribute(list, "data-tabs-targets", "");
        doc.append_child(parent, list);
        for target in targets {
            let entry = doc.create_element("li");
            doc.set_attribute(entry, "data-target", target);
            let label = doc.create_text(target);
            doc.append_child(entry, label);
            doc.append_child(list, entry);
        }
        list
    }

    #[test]
    fn selector_host_leaves_other_tab_sets_alone() {
        let (mut doc, _) = block_page(&[("a", "A", 1), ("b", "B", 1)]);
        let body = doc.body().unwrap();
        selector_host(&mut doc, body, &["section"]);
        let free = doc.create_element("section");
        doc.append_child(body, free);

        let mut page = page(doc);
        let report = page.init(SettingsLayer::default());
        assert_eq!(report.created, vec![TabSetId(1), TabSetId(2)]);

        let first = page.tab_set(TabSetId(1)).unwrap().handles().clone();
        for &section in &first.sections {
            assert_eq!(page.document().parent(section), Some(first.article));
        }
        let second = page.tab_set(TabSetId(2)).unwrap().handles().clone();
        assert_eq!(page.document().parent(free), Some(second.sections[0]));
        assert!(!page.document().contains(second.container, first.container));
    }

    #[test]
    fn selector_target_enclosing_its_host_is_refused() {
        let (mut doc, _) = block_page(&[]);
        let body = doc.body().unwrap();
        let wrap = doc.create_element("div");
        doc.set_attribute(wrap, "id", "wrap");
        doc.append_child(body, wrap);
        let list = selector_host(&mut doc, wrap, &["#wrap", "#extra"]);
        let extra = doc.create_element("div");
        doc.set_attribute(extra, "id", "extra");
        doc.append_child(body, extra);

        let mut page = page(doc);
        let report = page.init(SettingsLayer::default());
        assert_eq!(report.created.len(), 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(page.document().parent(wrap), Some(body));
        assert_eq!(page.document().parent(list), Some(wrap));
        let set = page.tab_set(report.created[0]).unwrap();
        assert_eq!(set.len(), 1);
        assert!(page.document().contains(wrap, set.root()));
        assert!(page.document().contains(set.root(), extra));
    }

    #[test]
    fn events_for_unknown_nodes_are_dropped() {
        let mut page = page(two_section_doc());
        page.init(hover());
        let stale = page.document().len() + 100;
        let pending = page.pending_tasks();

        page.dispatch(PageEvent::Click { target: stale });
        page.dispatch(PageEvent::PointerEnter { target: stale });
        page.dispatch(PageEvent::KeyPress {
            target: stale,
            key: Key::Enter,
        });
        assert_eq!(active(&page, TabSetId(1)), 0);
        assert_eq!(page.pending_tasks(), pending);
    }

    /// Indicator position, strip offset and arrow visibility of one tab set.
    type StripState = (Option<String>, Option<String>, Px, bool, bool);

    fn strip_state(page: &Page, id: TabSetId) -> StripState {
        let h = page.tab_set(id).unwrap().handles();
        let doc = page.document();
        (
            doc.style(h.indicator, "--left").map(str::to_string),
            doc.style(h.indicator, "--width").map(str::to_string),
            doc.scroll(h.nav).left,
            doc.has_class(h.back_arrow, SHOW_CLASS),
            doc.has_class(h.forward_arrow, SHOW_CLASS),
        )
    }

    #[test]
    fn strip_geometry_is_isolated_between_tab_sets() {
        let mut page = page(two_section_doc())
            .with_layout_engine(Box::new(StripLayout::default()))
            .with_window(Window {
                width: 100.0,
                ..Window::default()
            });
        page.init(SettingsLayer::default());
        page.dispatch(PageEvent::Load);
        let (a, b) = (TabSetId(1), TabSetId(2));
        let a_before = strip_state(&page, a);
        let b_before = strip_state(&page, b);

        page.activate(a, 2).unwrap();
        let a_nav = page.tab_set(a).unwrap().handles().nav;
        let a_back = page.tab_set(a).unwrap().handles().back_arrow;
        page.dispatch(PageEvent::Click { target: a_back });
        page.document_mut().set_scroll_left(a_nav, 30.0);
        page.dispatch(PageEvent::Scroll { target: a_nav });

        assert_ne!(strip_state(&page, a), a_before);
        assert_eq!(strip_state(&page, b), b_before);
        assert_eq!(active(&page, b), 0);
    }

    #[test]
    fn arrow_click_scrolls_strip() {
        let (doc, _) = block_page(&[("a", "Alpha", 1), ("b", "Beta", 1), ("c", "Gamma", 1)]);
        let mut page = page(doc)
            .with_layout_engine(Box::new(StripLayout::default()))
            .with_window(Window {
                width: 100.0,
                ..Window::default()
            });
        page.init(SettingsLayer::default());
        let h = page.tab_set(TabSetId(1)).unwrap().handles().clone();

        page.dispatch(PageEvent::Click {
            target: h.forward_arrow,
        });
        assert_eq!(page.document().scroll(h.nav).left, 50.0);
        assert!(page.document().has_class(h.back_arrow, SHOW_CLASS));
        assert!(page.document().has_class(h.forward_arrow, SHOW_CLASS));

        page.dispatch(PageEvent::KeyPress {
            target: h.back_arrow,
            key: Key::Enter,
        });
        assert_eq!(page.document().scroll(h.nav).left, 0.0);
        assert!(!page.document().has_class(h.back_arrow, SHOW_CLASS));
    }

    #[test]
    fn nav_scroll_refreshes_affordances() {
        let (doc, _) = block_page(&[("a", "Alpha", 1), ("b", "Beta", 1), ("c", "Gamma", 1)]);
        let mut page = page(doc)
            .with_layout_engine(Box::new(StripLayout::default()))
            .with_window(Window {
                width: 100.0,
                ..Window::default()
            });
        page.init(SettingsLayer::default());
        let h = page.tab_set(TabSetId(1)).unwrap().handles().clone();

        page.document_mut().set_scroll_left(h.nav, 80.0);
        page.dispatch(PageEvent::Scroll { target: h.nav });
        assert!(page.document().has_class(h.back_arrow, SHOW_CLASS));
    }

    #[test]
    fn resize_reruns_layout() {
        let (doc, _) = block_page(&[("a", "A", 1), ("b", "B", 1)]);
        let mut page = page(doc).with_layout_engine(Box::new(StripLayout::default()));
        page.init(SettingsLayer::default());
        let nav = page.tab_set(TabSetId(1)).unwrap().handles().nav;

        page.dispatch(PageEvent::Resize {
            width: 320.0,
            height: 480.0,
        });
        assert_eq!(page.window().width, 320.0);
        assert_eq!(page.document().offset_box(nav).width, 320.0);
    }

    #[test]
    fn window_scroll_debounces_header_offset() {
        let (mut doc, _) = block_page(&[("a", "A", 1)]);
        let header = with_header(&mut doc);
        doc.set_client_rect(header, Rect::new(0.0, 0.0, 800.0, 60.0));
        let mut page = page(doc);
        page.init(SettingsLayer::default());
        let root = page.tab_set(TabSetId(1)).unwrap().root();

        page.dispatch(PageEvent::WindowScroll { scroll_y: 10.0 });
        page.dispatch(PageEvent::WindowScroll { scroll_y: 20.0 });
        assert_eq!(page.pending_tasks(), 1);
        assert_eq!(page.document().style(root, "--header-bottom"), None);

        page.run_frame();
        assert_eq!(page.document().style(root, "--header-bottom"), Some("59px"));
        assert_eq!(page.window().scroll_y, 20.0);
    }

    #[test]
    fn header_transition_refreshes_offset() {
        let (mut doc, _) = block_page(&[("a", "A", 1)]);
        let header = with_header(&mut doc);
        let mut page = page(doc);
        page.init(SettingsLayer::default());
        let root = page.tab_set(TabSetId(1)).unwrap().root();

        page.document_mut()
            .set_client_rect(header, Rect::new(0.0, 0.0, 800.0, 90.0));
        page.dispatch(PageEvent::TransitionEnd { target: header });
        assert_eq!(page.document().style(root, "--header-bottom"), Some("89px"));
    }

    #[test]
    fn activation_scrolls_container_below_header() {
        let (mut doc, _) = block_page(&[("a", "A", 1), ("b", "B", 1)]);
        let header = with_header(&mut doc);
        let mut page = page(doc);
        page.init(SettingsLayer::default());
        assert_eq!(page.window().last_scroll_request, None);

        let root = page.tab_set(TabSetId(1)).unwrap().root();
        page.document_mut()
            .set_client_rect(header, Rect::new(0.0, 0.0, 800.0, 80.0));
        page.document_mut()
            .set_client_rect(root, Rect::new(0.0, 40.0, 800.0, 400.0));
        page.dispatch(PageEvent::WindowScroll { scroll_y: 200.0 });

        page.activate(TabSetId(1), 1).unwrap();
        assert_eq!(
            page.window().last_scroll_request,
            Some(ScrollRequest {
                top: 160.0,
                smooth: true
            })
        );
    }

    #[test]
    fn query_selects_initial_panel() {
        let (doc, _) = block_page(&[("a", "A", 1), ("b", "B", 1), ("c", "C", 1)]);
        let mut page = Page::new(doc, "https://site.test/page?tabs=b&tabs=c&tabs=zzz").unwrap();
        page.init(SettingsLayer::default());
        assert_eq!(active(&page, TabSetId(1)), 2);
    }

    #[test]
    fn load_reveals_and_rescans() {
        let (doc, main) = block_page(&[("a", "A", 1)]);
        let mut page = page(doc);
        page.init(SettingsLayer::default());
        let indicator = page.tab_set(TabSetId(1)).unwrap().handles().indicator;
        assert_eq!(page.document().style(indicator, "visibility"), Some("hidden"));

        page.dispatch(PageEvent::Load);
        assert_eq!(page.document().style(indicator, "visibility"), None);

        // Content added after load gets built and revealed right away.
        let late = page.document_mut().create_element("section");
        page.document_mut().append_child(main, late);
        add_block_group(page.document_mut(), late, "late", "Late", 1);
        page.dispatch(PageEvent::ContentReady);
        let ids = page.tab_set_ids();
        assert_eq!(ids.len(), 2);
        let late_indicator = page.tab_set(ids[1]).unwrap().handles().indicator;
        assert_eq!(page.document().style(late_indicator, "visibility"), None);
    }

    #[test]
    fn restore_teardown_round_trips_and_rebuilds() {
        let (doc, main) = block_page(&[("a", "A", 2), ("b", "B", 1)]);
        let before = doc.outer_html(main);
        let mut page = page(doc);
        page.init(SettingsLayer::default());

        page.teardown(TabSetId(1), TeardownMode::Restore).unwrap();
        assert_eq!(page.document().outer_html(main), before);
        assert_eq!(page.listener_count(), 0);
        assert!(page.tab_set(TabSetId(1)).is_none());

        let report = page.init(SettingsLayer::default());
        assert_eq!(report.created, vec![TabSetId(2)]);
    }

    #[test]
    fn detach_teardown_keeps_markup() {
        let (doc, _) = block_page(&[("a", "A", 1), ("b", "B", 1)]);
        let mut page = page(doc);
        page.init(hover());
        let root = page.tab_set(TabSetId(1)).unwrap().root();
        let target = button(&page, TabSetId(1), 1);
        page.dispatch(PageEvent::PointerEnter { target });

        page.teardown(TabSetId(1), TeardownMode::Detach).unwrap();
        assert!(page.document().is_connected(root));
        assert_eq!(page.listener_count(), 0);
        assert_eq!(page.pending_tasks(), 0);
        assert!(page.init(hover()).created.is_empty());

        page.dispatch(PageEvent::Click { target });
        assert!(!page.document().has_class(target, ACTIVE_CLASS));
    }

    #[test]
    fn teardown_all_stops_everything() {
        let mut page = page(two_section_doc());
        page.init(SettingsLayer::default());
        assert_eq!(page.teardown_all(TeardownMode::Restore), 2);
        assert!(page.tab_set_ids().is_empty());
        assert!(matches!(
            page.teardown(TabSetId(1), TeardownMode::Restore),
            Err(TabsError::UnknownTabSet(_))
        ));
    }

    #[test]
    fn settings_precedence() {
        let (mut doc, _) = block_page(&[("a", "A", 1)]);
        let marker = doc.get_element_by_id("a").unwrap();
        doc.set_attribute(marker, "data-layout", "horizontal");
        let global = SettingsLayer {
            layout: Some(LayoutMode::Vertical),
            hover_delay_ms: Some(200),
            ..SettingsLayer::default()
        };

        let mut page = page(doc).with_global_settings(global.clone());
        page.init(SettingsLayer::default());
        let settings = page.tab_set(TabSetId(1)).unwrap().settings().clone();
        assert_eq!(settings.layout, LayoutMode::Horizontal);
        assert_eq!(settings.hover_delay_ms, 200);

        let (mut doc, _) = block_page(&[("a", "A", 1)]);
        let marker = doc.get_element_by_id("a").unwrap();
        doc.set_attribute(marker, "data-layout", "horizontal");
        let mut page = Page::new(doc, ADDRESS).unwrap().with_global_settings(global);
        page.init(SettingsLayer {
            layout: Some(LayoutMode::Vertical),
            ..SettingsLayer::default()
        });
        assert_eq!(
            page.tab_set(TabSetId(1)).unwrap().settings().layout,
            LayoutMode::Vertical
        );
    }

    #[test]
    fn stylesheet_loaded_marks_body_and_notifies() {
        let (doc, _) = block_page(&[]);
        let mut page = page(doc);
        let count = Rc::new(RefCell::new(0));
        let c = Rc::clone(&count);
        page.on_notification(move |n| {
            if *n == Notification::StylesheetReady {
                *c.borrow_mut() += 1;
            }
        });
        page.stylesheet_loaded();
        let body = page.document().body().unwrap();
        assert!(page.document().has_class(body, STYLESHEET_CLASS));
        assert_eq!(*count.borrow(), 1);
    }
}
