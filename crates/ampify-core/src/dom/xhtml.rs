use super::{Attributes, Document, NodeId};
use crate::error::Result;

const WRAPPER: &str = "ampify-fragment";

/// Element and attribute names are copied without their namespace prefix (`xml:lang` is read as
/// `lang`).
pub(super) fn read_fragment(markup: &str) -> Result<Document> {
    let wrapped = format!("<{WRAPPER}>{markup}</{WRAPPER}>");
    let xml = roxmltree::Document::parse(&wrapped)?;

    let mut doc = Document::new();
    let root = doc.root();
    for child in xml.root_element().children() {
        copy_node(&mut doc, root, child);
    }
    Ok(doc)
}

fn copy_node(doc: &mut Document, parent: NodeId, node: roxmltree::Node<'_, '_>) {
    let id = match node.node_type() {
        roxmltree::NodeType::Element => {
            let attrs: Attributes = node
                .attributes()
                .map(|a| (a.name().to_string(), a.value().to_string()))
                .collect();
            doc.create_element_with_attrs(node.tag_name().name(), attrs)
        }
        roxmltree::NodeType::Text => doc.create_text(node.text().unwrap_or_default()),
        roxmltree::NodeType::Comment => doc.create_comment(node.text().unwrap_or_default()),
        roxmltree::NodeType::Root | roxmltree::NodeType::PI => return,
    };
    doc.append_child(parent, id);
    for child in node.children() {
        copy_node(doc, id, child);
    }
}
