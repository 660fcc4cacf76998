//! Markup serialization.

use tabkit_types::event::NodeId;

use crate::dom::{Document, NodeKind};

/// Escape text for use in element content.
pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape text for use in a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

impl Document {
    /// Serialize a node and its subtree (`outerHTML`).
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    /// Serialize the children of a node (`innerHTML`).
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.get(id).kind {
            NodeKind::Document => {
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
            },
            NodeKind::Text(s) => out.push_str(&escape_text(s)),
            NodeKind::Markup(s) => out.push_str(s),
            NodeKind::Comment(s) => {
                out.push_str("<!--");
                out.push_str(s);
                out.push_str("-->");
            },
            NodeKind::Element(el) => {
                out.push('<');
                out.push_str(el.tag.as_str());
                for attr in &el.attributes {
                    out.push_str(&format!(" {}=\"{}\"", attr.name, escape_attr(&attr.value)));
                }
                if !el.style.is_empty() {
                    let decls = el
                        .style
                        .iter()
                        .map(|(p, v)| format!("{p}: {v}"))
                        .collect::<Vec<_>>()
                        .join("; ");
                    out.push_str(&format!(" style=\"{}\"", escape_attr(&decls)));
                }
                out.push('>');
                if el.tag.is_void() {
                    return;
                }
                for &child in self.children(id) {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(el.tag.as_str());
                out.push('>');
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_elements_attributes_and_style() {
        let mut doc = Document::new();
        let span = doc.create_element("span");
        doc.add_class(span, "indicator");
        doc.set_style(span, "--width", "40px");
        doc.set_style(span, "visibility", "hidden");
        assert_eq!(
            doc.outer_html(span),
            r#"<span class="indicator" style="--width: 40px; visibility: hidden"></span>"#
        );
    }

    #[test]
    fn escapes_text_and_attributes() {
        let mut doc = Document::new();
        let b = doc.create_element("button");
        doc.set_attribute(b, "data-id", "a\"b");
        let t = doc.create_text("<script>");
        doc.append_child(b, t);
        assert_eq!(
            doc.outer_html(b),
            r#"<button data-id="a&quot;b">&lt;script&gt;</button>"#
        );
    }

    #[test]
    fn markup_passes_through_and_void_tags_close() {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let m = doc.create_markup("<p>fetched</p>");
        let img = doc.create_element("img");
        doc.append_child(div, m);
        doc.append_child(div, img);
        assert_eq!(doc.inner_html(div), "<p>fetched</p><img>");
    }
}
