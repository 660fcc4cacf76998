//! Scoped tree queries.
//!
//! Every query takes an explicit scope node. Tab sets only ever query inside
//! their own container, which is what keeps several instances on one page
//! from touching each other.

use tabkit_types::event::NodeId;

use crate::dom::Document;
use crate::selector::Selector;

impl Document {
    /// First descendant of `scope` (excluding `scope`) matching `sel`.
    pub fn query_selector(&self, scope: NodeId, sel: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| sel.matches(self, n))
    }

    /// All descendants of `scope` matching `sel`, in document order.
    pub fn query_selector_all(&self, scope: NodeId, sel: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| sel.matches(self, n))
            .collect()
    }

    /// Direct element children of `parent` matching `sel`
    /// (`:scope > sel`).
    pub fn children_matching(&self, parent: NodeId, sel: &Selector) -> Vec<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .filter(|&n| sel.matches(self, n))
            .collect()
    }

    /// Nearest inclusive ancestor of `node` matching `sel`.
    pub fn closest(&self, node: NodeId, sel: &Selector) -> Option<NodeId> {
        std::iter::once(node)
            .chain(self.ancestors(node))
            .find(|&n| sel.matches(self, n))
    }

    /// `node` itself if it matches, else its first matching descendant.
    pub fn self_or_descendant(&self, node: NodeId, sel: &Selector) -> Option<NodeId> {
        if sel.matches(self, node) {
            Some(node)
        } else {
            self.query_selector(node, sel)
        }
    }

    /// Position of `node` among its parent's element children.
    pub fn element_index(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.element_children(parent).iter().position(|&n| n == node)
    }
}
