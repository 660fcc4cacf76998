//! Adjacent block grouping.
//!
//! Starting at the block holding a `.tab-start` marker, walk forward
//! through sibling blocks. Each block holding another marker opens a new
//! section; a block holding `.tabs-end` stops the walk (and stays
//! outside), as does running out of siblings or hitting the block cap.

use tabkit_dom::{Document, NodeId, Selector};
use tabkit_types::error::Result;

use super::{
    AdapterContext, AdapterOutput, ContentAdapter, Fragment, PanelSource, Placement,
    local_settings,
};

/// Marks the first block of each section; its children become the label.
pub const MARKER_CLASS: &str = "tab-start";
/// Marks the block that ends a group.
pub const END_CLASS: &str = "tabs-end";
/// Class that identifies a content block around a marker.
pub const BLOCK_CLASS: &str = "block";
/// Added to marker blocks, which stay at the head of their section.
pub const HIDDEN_CLASS: &str = "hide-block";
/// Added to every marker a walk consumed.
pub const LOADED_CLASS: &str = "loaded";

/// Groups sibling blocks into sections.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockGroupAdapter;

struct Group {
    marker: NodeId,
    blocks: Vec<NodeId>,
}

impl ContentAdapter for BlockGroupAdapter {
    fn name(&self) -> &'static str {
        "block-group"
    }

    fn collect(
        &self,
        doc: &mut Document,
        host: NodeId,
        cx: &AdapterContext<'_>,
    ) -> Result<AdapterOutput> {
        let marker_sel = Selector::parse(&format!(".{MARKER_CLASS}"))?;
        let end_sel = Selector::parse(&format!(".{END_CLASS}"))?;
        let block_sel = Selector::parse(&format!(".{BLOCK_CLASS}"))?;

        let first = doc.closest(host, &block_sel).unwrap_or(host);
        let mut groups = vec![Group {
            marker: host,
            blocks: Vec::new(),
        }];

        let mut cursor = Some(first);
        let mut walked = 0;
        while let Some(block) = cursor {
            if walked >= cx.settings.max_group_blocks {
                log::debug!("Block walk from node {host} stopped at the {walked}-block cap");
                break;
            }
            if doc.self_or_descendant(block, &end_sel).is_some() {
                break;
            }
            if walked > 0
                && let Some(marker) = doc.self_or_descendant(block, &marker_sel)
            {
                groups.push(Group {
                    marker,
                    blocks: Vec::new(),
                });
            }
            if let Some(group) = groups.last_mut() {
                group.blocks.push(block);
            }
            walked += 1;
            cursor = doc.next_element_sibling(block);
        }

        let mut sources = Vec::with_capacity(groups.len());
        let mut marks = Vec::new();
        let mut consumed = Vec::with_capacity(groups.len());
        for group in &groups {
            doc.add_class(group.marker, LOADED_CLASS);
            marks.push((group.marker, LOADED_CLASS.to_string()));
            if let Some(&marker_block) = group.blocks.first() {
                doc.add_class(marker_block, HIDDEN_CLASS);
                marks.push((marker_block, HIDDEN_CLASS.to_string()));
            }
            consumed.push(group.marker);

            // The marker block alone carries no content.
            let content = (group.blocks.len() > 1).then(|| Fragment::Moved(group.blocks.clone()));
            sources.push(PanelSource {
                external_id: doc.get_attribute(group.marker, "id").map(str::to_string),
                label: Fragment::Copied(doc.children(group.marker).to_vec()),
                content,
            });
        }

        log::debug!(
            "Block group at node {host}: {} sections from {walked} blocks",
            sources.len()
        );
        Ok(AdapterOutput {
            placement: Placement::Before(first),
            sources,
            consumed,
            marks,
            local: local_settings(doc, host),
        })
    }
}
