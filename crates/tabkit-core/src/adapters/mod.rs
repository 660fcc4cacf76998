//! Content adapters: turn one shape of host markup into ordered panel
//! sources.
//!
//! | adapter | host shape |
//! |---------|------------|
//! | [`BlockGroupAdapter`] | a block containing a `.tab-start` marker, followed by sibling blocks |
//! | [`CollectionAdapter`] | an element with `data-collection="<url>"` |
//! | [`SelectorAdapter`] | an element with `data-tabs-targets` whose children carry `data-target` |
//!
//! Adapters never build widget markup. They report what to show and where;
//! the assembler does the rest.

pub mod blocks;
pub mod collection;
pub mod selector;

use std::collections::HashSet;

use tabkit_dom::{Document, NodeId, Selector};
use tabkit_net::Fetcher;
use tabkit_types::error::Result;
use tabkit_types::settings::{SettingsLayer, TabsSettings};
use url::Url;

pub use blocks::BlockGroupAdapter;
pub use collection::CollectionAdapter;
pub use selector::SelectorAdapter;

/// Where the assembled container goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Insert as the previous sibling of this node.
    Before(NodeId),
    /// Append as the last child of this node.
    Within(NodeId),
}

/// A label or content payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Fragment {
    /// Existing nodes, moved into the tab set and moved back on restore.
    Moved(Vec<NodeId>),
    /// Existing nodes, deep-copied. The originals stay where they are.
    Copied(Vec<NodeId>),
    /// Plain text.
    Text(String),
    /// Opaque markup, inserted verbatim.
    Markup(String),
}

/// One `{label, content}` pair. `content: None` marks a malformed source.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelSource {
    pub external_id: Option<String>,
    pub label: Fragment,
    pub content: Option<Fragment>,
}

/// What an adapter produced for one host.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterOutput {
    pub placement: Placement,
    pub sources: Vec<PanelSource>,
    /// Host nodes this output accounts for. The page never hands them to
    /// an adapter again until a restoring teardown.
    pub consumed: Vec<NodeId>,
    /// Classes the adapter added to page nodes.
    pub marks: Vec<(NodeId, String)>,
    /// Settings read from host attributes.
    pub local: SettingsLayer,
}

/// Inputs shared by every adapter run.
pub struct AdapterContext<'a> {
    pub fetcher: &'a dyn Fetcher,
    /// Page address, for resolving relative URLs.
    pub base: &'a Url,
    pub settings: &'a TabsSettings,
    /// Nodes already owned by a host on this page. Adapters must not take
    /// them.
    pub claimed: &'a HashSet<NodeId>,
}

/// Produces panel sources from one host element.
pub trait ContentAdapter {
    fn name(&self) -> &'static str;

    /// Collect panel sources for `host`. Fails only when the whole tab set
    /// cannot be built; a single bad entry becomes a malformed source.
    fn collect(&self, doc: &mut Document, host: NodeId, cx: &AdapterContext<'_>)
    -> Result<AdapterOutput>;
}

/// Which adapter a host belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    BlockGroup,
    Collection,
    Selector,
}

impl AdapterKind {
    pub fn adapter(self) -> Box<dyn ContentAdapter> {
        match self {
            Self::BlockGroup => Box::new(BlockGroupAdapter),
            Self::Collection => Box::new(CollectionAdapter),
            Self::Selector => Box::new(SelectorAdapter),
        }
    }
}

/// Classify a node by host markup shape.
pub fn detect_adapter(doc: &Document, node: NodeId) -> Option<AdapterKind> {
    let el = doc.element(node)?;
    if el.has_class(blocks::MARKER_CLASS) {
        Some(AdapterKind::BlockGroup)
    } else if el.get_attribute(collection::COLLECTION_ATTR).is_some() {
        Some(AdapterKind::Collection)
    } else if el.get_attribute(selector::TARGETS_ATTR).is_some() {
        Some(AdapterKind::Selector)
    } else {
        None
    }
}

/// Every attached adapter host under `scope`, in document order, skipping
/// anything already inside an assembled tab set.
pub fn find_hosts(doc: &Document, scope: NodeId) -> Vec<(NodeId, AdapterKind)> {
    let Ok(container) = Selector::parse(".tabs-block") else {
        return Vec::new();
    };
    doc.descendants(scope)
        .into_iter()
        .filter(|&n| doc.closest(n, &container).is_none())
        .filter_map(|n| detect_adapter(doc, n).map(|kind| (n, kind)))
        .collect()
}

/// Settings layer from a host's `data-layout` / `data-event` attributes.
pub(crate) fn local_settings(doc: &Document, host: NodeId) -> SettingsLayer {
    SettingsLayer::from_attributes(
        doc.get_attribute(host, "data-layout"),
        doc.get_attribute(host, "data-event"),
    )
}
