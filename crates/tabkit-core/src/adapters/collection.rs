//! Remote collection sourcing.
//!
//! The host names a JSON collection URL. Each item becomes a panel whose
//! label is the item title and whose content is the HTML fetched from the
//! item's own URL.

use serde::Deserialize;
use tabkit_dom::{Document, NodeId};
use tabkit_types::error::{Result, TabsError};
use url::Url;

use super::{
    AdapterContext, AdapterOutput, ContentAdapter, Fragment, PanelSource, Placement,
    local_settings,
};

/// Host attribute carrying the collection URL.
pub const COLLECTION_ATTR: &str = "data-collection";
/// Present on the host while the adapter runs.
pub const LOADING_CLASS: &str = "loading";

#[derive(Debug, Deserialize)]
struct CollectionPage {
    #[serde(default)]
    items: Vec<CollectionItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CollectionItem {
    url_id: Option<String>,
    #[serde(default)]
    title: String,
    full_url: String,
}

/// Builds panels from a fetched collection.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionAdapter;

impl ContentAdapter for CollectionAdapter {
    fn name(&self) -> &'static str {
        "collection"
    }

    fn collect(
        &self,
        doc: &mut Document,
        host: NodeId,
        cx: &AdapterContext<'_>,
    ) -> Result<AdapterOutput> {
        doc.add_class(host, LOADING_CLASS);
        let result = fetch_sources(doc, host, cx);
        doc.remove_class(host, LOADING_CLASS);

        let sources = result?;
        Ok(AdapterOutput {
            placement: Placement::Within(host),
            sources,
            consumed: vec![host],
            marks: Vec::new(),
            local: local_settings(doc, host),
        })
    }
}

fn fetch_sources(doc: &Document, host: NodeId, cx: &AdapterContext<'_>) -> Result<Vec<PanelSource>> {
    let raw = doc
        .get_attribute(host, COLLECTION_ATTR)
        .ok_or_else(|| TabsError::Construction(format!("node {host} has no {COLLECTION_ATTR}")))?;
    let collection_url = cx.base.join(raw)?;

    let body = cx.fetcher.fetch_text(&collection_url)?;
    let page: CollectionPage = serde_json::from_str(&body)
        .map_err(|e| TabsError::AdapterFetch(format!("{collection_url}: bad collection JSON: {e}")))?;
    log::debug!("Collection {collection_url}: {} items", page.items.len());

    Ok(page
        .items
        .into_iter()
        .map(|item| {
            let content = fetch_item(cx, &collection_url, &item.full_url)
                .inspect_err(|e| log::warn!("Skipping collection item {}: {e}", item.full_url))
                .ok()
                .map(Fragment::Markup);
            PanelSource {
                external_id: item.url_id,
                label: Fragment::Text(item.title),
                content,
            }
        })
        .collect())
}

fn fetch_item(cx: &AdapterContext<'_>, collection_url: &Url, full_url: &str) -> Result<String> {
    let url = collection_url.join(full_url)?;
    cx.fetcher.fetch_text(&url)
}
