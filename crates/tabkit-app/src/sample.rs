//! Demo page content: one host of each adapter shape, a page header, and
//! canned responses for the collection host.

use tabkit_dom::{Document, NodeId};
use tabkit_net::MemoryFetcher;

/// The demo page's address. The query preselects the pricing panel.
pub const ADDRESS: &str = "https://shop.example/products?tabs=pricing";

const COLLECTION_JSON: &str = r#"{"items":[
    {"urlId":"launch","title":"Launch notes","fullUrl":"/journal/launch"},
    {"urlId":"roadmap","title":"Roadmap","fullUrl":"/journal/roadmap"},
    {"urlId":"archive","title":"Archive","fullUrl":"/journal/archive"}
]}"#;

/// Nodes the demo drives directly.
pub struct SamplePage {
    pub doc: Document,
    pub header: NodeId,
}

fn append(doc: &mut Document, parent: NodeId, tag: &str) -> NodeId {
    let node = doc.create_element(tag);
    doc.append_child(parent, node);
    node
}

fn append_text(doc: &mut Document, parent: NodeId, tag: &str, text: &str) -> NodeId {
    let node = append(doc, parent, tag);
    let t = doc.create_text(text);
    doc.append_child(node, t);
    node
}

fn block(doc: &mut Document, parent: NodeId) -> NodeId {
    let b = append(doc, parent, "div");
    doc.add_class(b, "block");
    b
}

pub fn build() -> SamplePage {
    let mut doc = Document::new();
    let root = doc.root();
    let html = append(&mut doc, root, "html");
    let body = append(&mut doc, html, "body");
    let header = append(&mut doc, body, "header");
    doc.set_attribute(header, "id", "header");
    append_text(&mut doc, header, "h1", "Example Shop");
    let main = append(&mut doc, body, "main");

    // Block groups: marker blocks open sections, `.tabs-end` closes the run.
    let products = append(&mut doc, main, "section");
    for (id, label, paragraphs) in [
        ("overview", "Overview", &["Hand-built in small batches.", "Ships worldwide."][..]),
        ("pricing", "Pricing", &["Starter: 19/mo", "Studio: 49/mo", "Team: 99/mo"][..]),
        ("faq", "Questions", &["Can I cancel any time? Yes."][..]),
    ] {
        let marker_block = block(&mut doc, products);
        let marker = append_text(&mut doc, marker_block, "span", label);
        doc.add_class(marker, "tab-start");
        doc.set_attribute(marker, "id", id);
        for text in paragraphs {
            let b = block(&mut doc, products);
            append_text(&mut doc, b, "p", text);
        }
    }
    let end = block(&mut doc, products);
    let end_marker = append(&mut doc, end, "span");
    doc.add_class(end_marker, "tabs-end");
    let after = block(&mut doc, products);
    append_text(&mut doc, after, "p", "Content after the tabs stays put.");

    // Remote collection, hover-activated.
    let journal = append(&mut doc, main, "section");
    let feed = append(&mut doc, journal, "div");
    doc.set_attribute(feed, "data-collection", "/journal");
    doc.set_attribute(feed, "data-event", "hover");

    // Existing page sections pulled in by selector.
    let help = append(&mut doc, main, "section");
    let list = append(&mut doc, help, "ul");
    doc.set_attribute(list, "data-tabs-targets", "");
    doc.set_attribute(list, "data-layout", "vertical");
    for (target, label) in [("#shipping", "Shipping"), (".returns", "Returns")] {
        let entry = append_text(&mut doc, list, "li", label);
        doc.set_attribute(entry, "data-target", target);
    }
    let shipping = append_text(&mut doc, help, "div", "Orders ship within two days.");
    doc.set_attribute(shipping, "id", "shipping");
    let returns = append_text(&mut doc, help, "div", "Returns are free for 30 days.");
    doc.add_class(returns, "returns");

    SamplePage { doc, header }
}

/// Canned responses for the journal collection.
pub fn fetcher() -> MemoryFetcher {
    let mut fetcher = MemoryFetcher::new();
    fetcher.insert("https://shop.example/journal", COLLECTION_JSON);
    fetcher.insert(
        "https://shop.example/journal/launch",
        "<article><p>We launched.</p></article>",
    );
    fetcher.insert(
        "https://shop.example/journal/roadmap",
        "<article><p>Next: gift cards.</p></article>",
    );
    // The archive item has no route and shows up as a skipped source.
    fetcher
}
