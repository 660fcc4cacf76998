//! The tab set instance: panels, cached node handles, and the record of
//! what was moved or marked so teardown can undo it.

use std::fmt;

use tabkit_dom::{Document, NodeId, Selector, TagName};
use tabkit_types::error::{Result, TabsError};
use tabkit_types::settings::TabsSettings;

/// Page-unique tab set identifier. Allocated from a counter that only
/// grows, so ids are never reused after teardown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TabSetId(pub u32);

impl fmt::Display for TabSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tabset-{}", self.0)
    }
}

/// One panel and its paired button. The index in [`TabSet::panels`] is
/// the panel's identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    /// Stable id used by the initial-selection query parameter.
    pub external_id: Option<String>,
    pub button: NodeId,
    pub section: NodeId,
}

/// Cached node handles, resolved once by scoped queries inside the
/// container.
#[derive(Debug, Clone, PartialEq)]
pub struct Handles {
    pub container: NodeId,
    pub nav_wrapper: NodeId,
    pub nav: NodeId,
    pub buttons: Vec<NodeId>,
    pub indicator: NodeId,
    pub track: NodeId,
    pub back_arrow: NodeId,
    pub forward_arrow: NodeId,
    pub article: NodeId,
    pub sections: Vec<NodeId>,
    /// Page header (`#header`, else the first `<header>`), if any.
    pub header: Option<NodeId>,
}

impl Handles {
    /// Resolve every handle by walking the skeleton's fixed parent/child
    /// structure under `container`. Label and panel markup is never
    /// searched.
    pub fn resolve(doc: &Document, container: NodeId) -> Result<Self> {
        let child = |parent: NodeId, sel: &str| -> Result<NodeId> {
            doc.children_matching(parent, &Selector::parse(sel)?)
                .first()
                .copied()
                .ok_or_else(|| TabsError::Construction(format!("missing {sel} in tab set")))
        };

        let nav_wrapper = child(container, "div.nav-container")?;
        let nav = child(nav_wrapper, "nav")?;
        let article = child(container, "article")?;
        let buttons = doc.children_matching(nav, &Selector::parse("button.tab-button")?);
        let sections = doc.children_matching(article, &Selector::parse("section")?);
        if buttons.len() != sections.len() {
            return Err(TabsError::Construction(format!(
                "{} buttons for {} sections",
                buttons.len(),
                sections.len()
            )));
        }

        Ok(Self {
            container,
            nav_wrapper,
            nav,
            buttons,
            indicator: child(nav, "span.indicator")?,
            track: child(nav, "span.indicator-track")?,
            back_arrow: child(nav_wrapper, ".scroll-back-arrow")?,
            forward_arrow: child(nav_wrapper, ".scroll-forward-arrow")?,
            article,
            sections,
            header: find_page_header(doc),
        })
    }
}

/// `#header`, falling back to the first `<header>` element.
pub fn find_page_header(doc: &Document) -> Option<NodeId> {
    doc.get_element_by_id("header")
        .or_else(|| doc.find_first_element(doc.root(), &TagName::Header))
        .filter(|&h| doc.is_connected(h))
}

/// A node the assembler moved, with the position it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MovedNode {
    pub node: NodeId,
    pub parent: NodeId,
    /// Sibling it sat before, `None` if it was the last child.
    pub before: Option<NodeId>,
}

/// Everything needed to restore the page to its pre-assembly state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Origin {
    /// In move order.
    pub moved: Vec<MovedNode>,
    /// Classes added to host nodes.
    pub marks: Vec<(NodeId, String)>,
    /// Host nodes the adapter consumed.
    pub consumed: Vec<NodeId>,
}

/// One live tab widget.
#[derive(Debug, Clone)]
pub struct TabSet {
    pub(crate) id: TabSetId,
    pub(crate) settings: TabsSettings,
    pub(crate) handles: Handles,
    pub(crate) panels: Vec<Panel>,
    pub(crate) active_index: usize,
    pub(crate) origin: Origin,
}

impl TabSet {
    pub fn id(&self) -> TabSetId {
        self.id
    }

    /// The container node every query of this tab set is scoped to.
    pub fn root(&self) -> NodeId {
        self.handles.container
    }

    pub fn settings(&self) -> &TabsSettings {
        &self.settings
    }

    pub fn handles(&self) -> &Handles {
        &self.handles
    }

    pub fn panels(&self) -> &[Panel] {
        &self.panels
    }

    pub fn len(&self) -> usize {
        self.panels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Re-resolve the handle table after the host rebuilt the container's
    /// contents.
    pub fn refresh_handles(&mut self, doc: &Document) -> Result<()> {
        let handles = Handles::resolve(doc, self.handles.container)?;
        self.panels = handles
            .buttons
            .iter()
            .zip(&handles.sections)
            .map(|(&button, &section)| Panel {
                external_id: doc.get_attribute(button, "data-id").map(str::to_string),
                button,
                section,
            })
            .collect();
        if self.active_index >= self.panels.len() {
            self.active_index = 0;
        }
        self.handles = handles;
        log::debug!("{}: handles refreshed ({} panels)", self.id, self.panels.len());
        Ok(())
    }
}
