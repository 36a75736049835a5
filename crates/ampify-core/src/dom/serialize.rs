use super::{Document, NodeId, NodeKind};
use std::borrow::Cow;

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name))
}

pub fn escape_attribute_value(value: &str) -> Cow<'_, str> {
    htmlize::escape_attribute(value)
}

pub(super) fn outer_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, false, &mut out);
    out
}

pub(super) fn inner_html(doc: &Document, id: NodeId) -> String {
    let raw = doc.element(id).is_some_and(|el| is_raw_text(&el.name));
    let mut out = String::new();
    for &child in doc.children(id) {
        write_node(doc, child, raw, &mut out);
    }
    out
}

// Void elements are written self-closed so the output can be read back by the fragment reader.
fn write_node(doc: &Document, id: NodeId, raw_text: bool, out: &mut String) {
    match doc.kind(id) {
        NodeKind::Root => {
            for &child in doc.children(id) {
                write_node(doc, child, false, out);
            }
        }
        NodeKind::Text(text) => {
            if raw_text {
                out.push_str(text);
            } else {
                out.push_str(&htmlize::escape_text(text.as_str()));
            }
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element(el) => {
            out.push('<');
            out.push_str(&el.name);
            for (name, value) in &el.attrs {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attribute_value(value));
                out.push('"');
            }
            if is_void(&el.name) && doc.children(id).is_empty() {
                out.push_str(" />");
                return;
            }
            out.push('>');
            let raw = is_raw_text(&el.name);
            for &child in doc.children(id) {
                write_node(doc, child, raw, out);
            }
            out.push_str("</");
            out.push_str(&el.name);
            out.push('>');
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::Document;

    #[test]
    fn escapes_text_and_attribute_values() {
        let mut doc = Document::new();
        let root = doc.root();
        let a = doc.create_element("a");
        doc.set_attr(a, "href", "https://example.com/?a=1&b=\"2\"");
        let text = doc.create_text("1 < 2 & 3");
        doc.append_child(root, a);
        doc.append_child(a, text);

        assert_eq!(
            doc.to_html(),
            r#"<a href="https://example.com/?a=1&amp;b=&quot;2&quot;">1 &lt; 2 &amp; 3</a>"#
        );
    }

    #[test]
    fn void_elements_are_self_closed_and_empty_attributes_kept() {
        let mut doc = Document::new();
        let root = doc.root();
        let video = doc.create_element("video");
        doc.set_attr(video, "controls", "");
        let source = doc.create_element("source");
        doc.set_attr(source, "src", "a.mp4");
        doc.append_child(root, video);
        doc.append_child(video, source);

        assert_eq!(
            doc.to_html(),
            r#"<video controls=""><source src="a.mp4" /></video>"#
        );
    }

    #[test]
    fn script_text_is_not_escaped() {
        let mut doc = Document::new();
        let root = doc.root();
        let script = doc.create_element("script");
        let text = doc.create_text("if (a < b) {}");
        doc.append_child(root, script);
        doc.append_child(script, text);
        assert_eq!(doc.to_html(), "<script>if (a < b) {}</script>");
    }
}
