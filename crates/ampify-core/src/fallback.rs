//! Fallback content shown when the replacement element cannot render natively.

use crate::dom::{Document, NodeId};

pub const FALLBACK_ATTR: &str = "fallback";

pub fn mark_fallback(doc: &mut Document, node: NodeId) {
    doc.set_attr(node, FALLBACK_ATTR, "");
}

pub fn is_fallback(doc: &Document, node: NodeId) -> bool {
    doc.element(node).is_some_and(|el| el.has_attr(FALLBACK_ATTR))
}

/// Builds a detached `<a href="{url}" fallback="">{url}</a>`.
pub fn synthesize_link(doc: &mut Document, url: &str) -> NodeId {
    let link = doc.create_element("a");
    doc.set_attr(link, "href", url);
    mark_fallback(doc, link);
    let text = doc.create_text(url);
    doc.append_child(link, text);
    link
}

/// Wraps `node` into a new detached `<noscript>`.
pub fn wrap_noscript(doc: &mut Document, node: NodeId) -> NodeId {
    let noscript = doc.create_element("noscript");
    doc.append_child(noscript, node);
    noscript
}

/// `true` when `node` is the copy kept inside a converted element's `<noscript>`: its parent is a
/// `noscript` whose own parent belongs to the target vocabulary (`prefix`).
pub fn is_noscript_fallback(doc: &Document, node: NodeId, prefix: &str) -> bool {
    let Some(parent) = doc.parent(node) else {
        return false;
    };
    if !doc.is_element_named(parent, "noscript") {
        return false;
    }
    doc.parent(parent)
        .and_then(|gp| doc.tag_name(gp))
        .and_then(|name| name.get(..prefix.len()))
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesized_link_points_at_source() {
        let mut doc = Document::new();
        let link = synthesize_link(&mut doc, "https://example.com/a.mp4");
        assert_eq!(
            doc.outer_html(link),
            r#"<a href="https://example.com/a.mp4" fallback="">https://example.com/a.mp4</a>"#
        );
        assert!(is_fallback(&doc, link));
        assert_eq!(doc.parent(link), None);
    }

    #[test]
    fn noscript_fallback_detection_walks_two_levels() {
        let mut doc = Document::new();
        let root = doc.root();
        let amp = doc.create_element("amp-video");
        let video = doc.create_element("video");
        let noscript = wrap_noscript(&mut doc, video);
        doc.append_child(root, amp);
        doc.append_child(amp, noscript);
        assert!(is_noscript_fallback(&doc, video, "amp-"));

        let plain = doc.create_element("video");
        let bare_noscript = wrap_noscript(&mut doc, plain);
        doc.append_child(root, bare_noscript);
        assert!(!is_noscript_fallback(&doc, plain, "amp-"));
        assert!(!is_noscript_fallback(&doc, amp, "amp-"));
    }
}
