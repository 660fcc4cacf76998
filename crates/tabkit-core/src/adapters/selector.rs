//! Selector-targeted sourcing.
//!
//! The host is a list whose children each carry `data-target="<selector>"`.
//! A child's own children become the label; the first free page node
//! matching the selector becomes the content. A node is free when it lies
//! outside the host, does not enclose the host, and neither sits in nor
//! holds another tab set or claimed host.

use tabkit_dom::{Document, NodeId, Selector};
use tabkit_types::error::Result;

use crate::assembler::CONTAINER_CLASS;

use super::{
    AdapterContext, AdapterOutput, ContentAdapter, Fragment, PanelSource, Placement,
    local_settings,
};

/// Marks the host list.
pub const TARGETS_ATTR: &str = "data-tabs-targets";
/// Selector naming one entry's content.
pub const TARGET_ATTR: &str = "data-target";

/// Pulls existing page sections into a tab set.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectorAdapter;

impl ContentAdapter for SelectorAdapter {
    fn name(&self) -> &'static str {
        "selector"
    }

    fn collect(
        &self,
        doc: &mut Document,
        host: NodeId,
        cx: &AdapterContext<'_>,
    ) -> Result<AdapterOutput> {
        let container = Selector::parse(&format!(".{CONTAINER_CLASS}"))?;
        let mut sources = Vec::new();
        let mut taken: Vec<NodeId> = Vec::new();

        for entry in doc.element_children(host) {
            let Some(raw) = doc.get_attribute(entry, TARGET_ATTR) else {
                continue;
            };
            let target = match Selector::parse(raw) {
                Ok(sel) => doc
                    .query_selector_all(doc.root(), &sel)
                    .into_iter()
                    .find(|&n| {
                        !taken.contains(&n) && is_free(doc, host, n, &container, cx)
                    }),
                Err(e) => {
                    log::warn!("Tab entry {entry}: {e}");
                    None
                },
            };
            if target.is_none() {
                log::warn!("Tab entry {entry}: no content matches {raw:?}");
            }
            taken.extend(target);

            let external_id = doc
                .get_attribute(entry, "data-id")
                .or_else(|| target.and_then(|t| doc.get_attribute(t, "id")))
                .map(str::to_string);
            sources.push(PanelSource {
                external_id,
                label: Fragment::Moved(doc.children(entry).to_vec()),
                content: target.map(|t| Fragment::Moved(vec![t])),
            });
        }

        Ok(AdapterOutput {
            placement: Placement::Within(host),
            sources,
            consumed: vec![host],
            marks: Vec::new(),
            local: local_settings(doc, host),
        })
    }
}

fn is_free(
    doc: &Document,
    host: NodeId,
    node: NodeId,
    container: &Selector,
    cx: &AdapterContext<'_>,
) -> bool {
    !doc.contains(host, node)
        && !doc.contains(node, host)
        && !cx.claimed.contains(&node)
        && doc.closest(node, container).is_none()
        && doc.query_selector(node, container).is_none()
}
