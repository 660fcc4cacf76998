//! Shared fixtures for unit tests.

use std::collections::HashSet;
use std::sync::LazyLock;

use tabkit_dom::{Document, NodeId};
use tabkit_net::MemoryFetcher;
use tabkit_types::geometry::{Px, Rect};
use tabkit_types::settings::TabsSettings;
use url::Url;

use crate::adapters::{AdapterContext, BlockGroupAdapter, ContentAdapter};
use crate::assembler::assemble;
use crate::tabset::{TabSet, TabSetId};

static NO_ROUTES: LazyLock<MemoryFetcher> = LazyLock::new(MemoryFetcher::new);
static NO_CLAIMS: LazyLock<HashSet<NodeId>> = LazyLock::new(HashSet::new);
static BASE: LazyLock<Url> =
    LazyLock::new(|| Url::parse("https://site.test/").expect("static test URL"));

/// `body > main` holding, per `(id, label, n)`, a marker block
/// (`div.block > span.tab-start#id`) followed by `n` content blocks.
pub(crate) fn block_page(groups: &[(&str, &str, usize)]) -> (Document, NodeId) {
    let mut doc = Document::new();
    let body = doc.create_element("body");
    doc.append_child(doc.root(), body);
    let main = doc.create_element("main");
    doc.append_child(body, main);

    for (id, label, n) in groups {
        add_block_group(&mut doc, main, id, label, *n);
    }
    (doc, main)
}

/// Append a marker block and `n` content blocks to `parent`.
pub(crate) fn add_block_group(doc: &mut Document, parent: NodeId, id: &str, label: &str, n: usize) {
    let marker_block = doc.create_element("div");
    doc.add_class(marker_block, "block");
    let marker = doc.create_element("span");
    doc.add_class(marker, "tab-start");
    doc.set_attribute(marker, "id", id);
    let text = doc.create_text(label);
    doc.append_child(marker, text);
    doc.append_child(marker_block, marker);
    doc.append_child(parent, marker_block);

    for i in 0..n {
        let block = doc.create_element("div");
        doc.add_class(block, "block");
        let p = doc.create_element("p");
        let text = doc.create_text(&format!("{id} body {i}"));
        doc.append_child(p, text);
        doc.append_child(block, p);
        doc.append_child(parent, block);
    }
}

pub(crate) fn marker_of(doc: &Document, id: &str) -> NodeId {
    doc.get_element_by_id(id).expect("marker in fixture")
}

/// Context with no fetch routes and a fixed base address.
pub(crate) fn adapter_cx(settings: &TabsSettings) -> AdapterContext<'_> {
    AdapterContext {
        fetcher: &*NO_ROUTES,
        base: &BASE,
        settings,
        claimed: &NO_CLAIMS,
    }
}

/// Group the fixture's first marker and assemble it with default settings.
pub(crate) fn assembled(doc: &mut Document, id: TabSetId) -> TabSet {
    assembled_with(doc, id, TabsSettings::default())
}

pub(crate) fn assembled_with(doc: &mut Document, id: TabSetId, settings: TabsSettings) -> TabSet {
    let host = doc
        .descendants(doc.root())
        .into_iter()
        .find(|&n| doc.has_class(n, "tab-start"))
        .expect("fixture marker");
    let out = BlockGroupAdapter
        .collect(doc, host, &adapter_cx(&settings))
        .expect("collect");
    assemble(doc, out, settings, id).expect("assemble").tab_set
}

/// Lay the strip out as `n` equal buttons of `button_width` in a nav
/// `nav_width` wide.
pub(crate) fn strip_boxes(doc: &mut Document, set: &TabSet, button_width: Px, nav_width: Px) {
    let h = set.handles();
    for (i, &button) in h.buttons.iter().enumerate() {
        doc.set_offset_box(button, Rect::new(i as Px * button_width, 0.0, button_width, 40.0));
    }
    doc.set_offset_box(h.nav, Rect::new(0.0, 0.0, nav_width, 40.0));
    doc.set_scroll_extent(h.nav, h.buttons.len() as Px * button_width, 40.0);
}
