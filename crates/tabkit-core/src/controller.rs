//! Active-tab state machine.
//!
//! Exactly one button/section pair carries the `active` class at any time.
//! Activation is synchronous; every successful call yields an
//! [`AfterActivation`] record, including re-activating the current index.

use tabkit_dom::{Document, NodeId};
use tabkit_types::error::{Result, TabsError};

use crate::assembler::ACTIVE_CLASS;
use crate::tabset::{TabSet, TabSetId};

/// Emitted after every successful activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AfterActivation {
    pub tab_set: TabSetId,
    /// The tab set's container node.
    pub root: NodeId,
    pub index: usize,
}

impl TabSet {
    /// Make panel `index` the only active one.
    ///
    /// An out-of-range index is rejected without touching the document.
    pub fn activate(&mut self, doc: &mut Document, index: usize) -> Result<AfterActivation> {
        if index >= self.panels.len() {
            return Err(TabsError::Activation {
                index,
                len: self.panels.len(),
            });
        }

        for panel in &self.panels {
            doc.remove_class(panel.button, ACTIVE_CLASS);
            doc.remove_class(panel.section, ACTIVE_CLASS);
        }
        let panel = &self.panels[index];
        doc.add_class(panel.button, ACTIVE_CLASS);
        doc.add_class(panel.section, ACTIVE_CLASS);
        self.active_index = index;

        Ok(AfterActivation {
            tab_set: self.id,
            root: self.handles.container,
            index,
        })
    }

    /// Establish the initial selection: panel 0 first, then each query id
    /// that names a panel, in order. The last match stays active.
    pub fn initialize(&mut self, doc: &mut Document, query_ids: &[String]) -> Result<Vec<AfterActivation>> {
        let mut emitted = vec![self.activate(doc, 0)?];
        for id in query_ids {
            if let Some(index) = self.index_of(doc, id) {
                emitted.push(self.activate(doc, index)?);
            }
        }
        Ok(emitted)
    }

    /// Index of the button whose `data-id` equals `external_id`.
    pub fn index_of(&self, doc: &Document, external_id: &str) -> Option<usize> {
        self.handles
            .buttons
            .iter()
            .position(|&b| doc.get_attribute(b, "data-id") == Some(external_id))
    }

    /// Index of the panel whose button is `node`.
    pub fn index_of_button(&self, node: NodeId) -> Option<usize> {
        self.panels.iter().position(|p| p.button == node)
    }
}
