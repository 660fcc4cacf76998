//! Builds the tab set markup from adapter output.
//!
//! ```text
//! div.tabs-block#tabset-N[data-layout][data-transition]
//! ├── div.nav-container
//! │   ├── span.scrollable-indicator.scroll-back-arrow[role=button][tabindex=0]
//! │   ├── div.nav-background
//! │   ├── nav
//! │   │   ├── button.tab-button[data-id] ...
//! │   │   ├── span.indicator
//! │   │   └── span.indicator-track
//! │   └── span.scrollable-indicator.scroll-forward-arrow[role=button][tabindex=0]
//! └── article
//!     ├── section ...
//!     └── div.panels-background
//! ```

use tabkit_dom::{Document, NodeId};
use tabkit_types::error::{Result, TabsError};
use tabkit_types::settings::TabsSettings;

use crate::adapters::{AdapterOutput, Fragment, PanelSource, Placement};
use crate::tabset::{Handles, MovedNode, Origin, Panel, TabSet, TabSetId};

/// Class on every assembled container.
pub const CONTAINER_CLASS: &str = "tabs-block";
/// Class on every tab button.
pub const BUTTON_CLASS: &str = "tab-button";
/// Class marking the active button and section.
pub const ACTIVE_CLASS: &str = "active";

/// A freshly assembled tab set plus the sources that were skipped.
#[derive(Debug)]
pub struct Assembly {
    pub tab_set: TabSet,
    /// One `Construction` error per malformed source.
    pub skipped: Vec<TabsError>,
}

/// Build a tab set from adapter output. Malformed sources are skipped and
/// recorded; zero usable sources fails the whole instance before anything
/// is inserted.
pub fn assemble(
    doc: &mut Document,
    output: AdapterOutput,
    settings: TabsSettings,
    id: TabSetId,
) -> Result<Assembly> {
    let AdapterOutput {
        placement,
        sources,
        consumed,
        marks,
        ..
    } = output;

    let (parent, reference) = match placement {
        Placement::Before(anchor) => match doc.parent(anchor) {
            Some(parent) => (parent, Some(anchor)),
            None => {
                return Err(TabsError::Construction(format!(
                    "{id}: placement anchor {anchor} is detached"
                )));
            },
        },
        Placement::Within(host) => (host, None),
    };

    let mut skipped = Vec::new();
    let mut usable = Vec::with_capacity(sources.len());
    for (i, source) in sources.into_iter().enumerate() {
        let name = source.external_id.as_deref().unwrap_or("unnamed");
        let problem = if source.content.is_none() {
            Some("has no content")
        } else if encloses(doc, &source, parent) {
            Some("would move an ancestor of the tab set")
        } else {
            None
        };
        match problem {
            Some(problem) => skipped.push(TabsError::Construction(format!(
                "{id}: source {i} ({name}) {problem}"
            ))),
            None => usable.push(source),
        }
    }
    if usable.is_empty() {
        return Err(TabsError::Construction(format!("{id}: no usable panels")));
    }

    let container = build_skeleton(doc, id, &settings);
    doc.insert_before(parent, container, reference);

    let mut origin = Origin {
        moved: Vec::new(),
        marks,
        consumed,
    };
    let handles = Handles::resolve(doc, container)?;
    let mut panels = Vec::with_capacity(usable.len());
    for source in usable {
        panels.push(add_panel(doc, &handles, source, &mut origin));
    }
    let handles = Handles::resolve(doc, container)?;

    log::info!(
        "{id}: assembled {} panels ({} skipped)",
        panels.len(),
        skipped.len()
    );
    Ok(Assembly {
        tab_set: TabSet {
            id,
            settings,
            handles,
            panels,
            active_index: 0,
            origin,
        },
        skipped,
    })
}

/// Whether moving the source's nodes would pull `target` inside itself.
fn encloses(doc: &Document, source: &PanelSource, target: NodeId) -> bool {
    [Some(&source.label), source.content.as_ref()]
        .into_iter()
        .flatten()
        .any(|fragment| match fragment {
            Fragment::Moved(nodes) => nodes.iter().any(|&n| doc.contains(n, target)),
            _ => false,
        })
}

fn element(doc: &mut Document, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
    let node = doc.create_element(tag);
    for class in classes {
        doc.add_class(node, class);
    }
    doc.append_child(parent, node);
    node
}

fn build_skeleton(doc: &mut Document, id: TabSetId, settings: &TabsSettings) -> NodeId {
    let container = doc.create_element("div");
    doc.add_class(container, CONTAINER_CLASS);
    doc.set_attribute(container, "id", &id.to_string());
    doc.set_attribute(container, "data-layout", settings.layout.as_str());
    doc.set_attribute(container, "data-transition", &settings.transition);

    let nav_wrapper = element(doc, container, "div", &["nav-container"]);
    let back = element(doc, nav_wrapper, "span", &["scrollable-indicator", "scroll-back-arrow"]);
    element(doc, nav_wrapper, "div", &["nav-background"]);
    let nav = element(doc, nav_wrapper, "nav", &[]);
    for class in ["indicator", "indicator-track"] {
        let span = element(doc, nav, "span", &[class]);
        doc.set_style(span, "visibility", "hidden");
    }
    let forward = element(doc, nav_wrapper, "span", &["scrollable-indicator", "scroll-forward-arrow"]);
    for arrow in [back, forward] {
        doc.set_attribute(arrow, "role", "button");
        doc.set_attribute(arrow, "tabindex", "0");
    }

    let article = element(doc, container, "article", &[]);
    element(doc, article, "div", &["panels-background"]);
    container
}

fn add_panel(doc: &mut Document, handles: &Handles, source: PanelSource, origin: &mut Origin) -> Panel {
    let button = doc.create_element("button");
    doc.add_class(button, BUTTON_CLASS);
    if let Some(ext) = &source.external_id {
        doc.set_attribute(button, "data-id", ext);
    }
    // Buttons go ahead of the indicator spans; sections ahead of the
    // panels background.
    doc.insert_before(handles.nav, button, Some(handles.indicator));
    fill(doc, button, source.label, origin);

    let section = doc.create_element("section");
    let background = doc.children(handles.article).last().copied();
    doc.insert_before(handles.article, section, background);
    if let Some(content) = source.content {
        fill(doc, section, content, origin);
    }

    Panel {
        external_id: source.external_id,
        button,
        section,
    }
}

fn fill(doc: &mut Document, parent: NodeId, fragment: Fragment, origin: &mut Origin) {
    match fragment {
        Fragment::Moved(nodes) => {
            for node in nodes {
                if doc.contains(node, parent) {
                    log::warn!("Node {node} encloses its destination; left in place");
                    continue;
                }
                if let Some(from) = doc.parent(node) {
                    let before = doc
                        .children(from)
                        .iter()
                        .position(|&c| c == node)
                        .and_then(|i| doc.children(from).get(i + 1).copied());
                    origin.moved.push(MovedNode {
                        node,
                        parent: from,
                        before,
                    });
                }
                doc.append_child(parent, node);
            }
        },
        Fragment::Copied(nodes) => {
            for node in nodes {
                let copy = doc.clone_subtree(node);
                doc.append_child(parent, copy);
            }
        },
        Fragment::Text(text) => {
            let t = doc.create_text(&text);
            doc.append_child(parent, t);
        },
        Fragment::Markup(markup) => {
            let m = doc.create_markup(&markup);
            doc.append_child(parent, m);
        },
    }
}

/// Undo an assembly: put moved nodes back, drop added classes, remove the
/// container.
pub fn restore(doc: &mut Document, tab_set: &TabSet) {
    let origin = tab_set.origin();
    for moved in origin.moved.iter().rev() {
        let before = moved
            .before
            .filter(|&b| doc.parent(b) == Some(moved.parent));
        doc.insert_before(moved.parent, moved.node, before);
    }
    for (node, class) in &origin.marks {
        doc.remove_class(*node, class);
    }
    doc.detach(tab_set.root());
}
