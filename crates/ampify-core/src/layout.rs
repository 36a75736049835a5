//! Layout modes of the target vocabulary and how they are derived.

use crate::dimension::Dimension;
use crate::dom::{Document, NodeId};
use indexmap::IndexMap;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    Fixed,
    Responsive,
    Fill,
    FixedHeight,
    FlexItem,
    Intrinsic,
    #[default]
    Unset,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Responsive => "responsive",
            Self::Fill => "fill",
            Self::FixedHeight => "fixed-height",
            Self::FlexItem => "flex-item",
            Self::Intrinsic => "intrinsic",
            Self::Unset => "unset",
        }
    }

    pub fn is_unset(self) -> bool {
        self == Self::Unset
    }
}

impl FromStr for Layout {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fixed" => Ok(Self::Fixed),
            "responsive" => Ok(Self::Responsive),
            "fill" => Ok(Self::Fill),
            "fixed-height" => Ok(Self::FixedHeight),
            "flex-item" => Ok(Self::FlexItem),
            "intrinsic" => Ok(Self::Intrinsic),
            _ => Err(()),
        }
    }
}

/// Picks the layout for a replacement element.
///
/// An explicit, non-empty, recognized hint always wins. Otherwise two pixel dimensions give
/// `responsive`, a percentage width over a known height gives `fixed-height`, and anything less
/// stays `unset`.
pub fn resolve(width: Option<Dimension>, height: Option<Dimension>, hint: Option<&str>) -> Layout {
    if let Some(hint) = hint.map(str::trim).filter(|h| !h.is_empty()) {
        match hint.parse::<Layout>() {
            Ok(layout) => return layout,
            Err(()) => tracing::debug!(hint, "ignoring unknown layout hint"),
        }
    }
    match (width, height) {
        (Some(w), Some(h)) if w.is_pixels() && h.is_pixels() => Layout::Responsive,
        (Some(Dimension::Percent(_)), Some(_)) => Layout::FixedHeight,
        _ => Layout::Unset,
    }
}

/// `true` when `node` sits directly in a `<figure>` carrying one of `classes`.
pub fn in_intrinsic_container(doc: &Document, node: NodeId, classes: &[String]) -> bool {
    doc.parent(node)
        .and_then(|p| doc.element(p))
        .is_some_and(|parent| parent.is("figure") && classes.iter().any(|c| parent.has_class(c)))
}

/// For a `fill` layout inside a `<figure>`, moves the height onto the figure's inline style so the
/// container keeps its size. Returns `false` (and changes nothing) for any other parent.
pub fn apply_fill_to_parent(doc: &mut Document, node: NodeId, height: Option<Dimension>) -> bool {
    let Some(parent) = doc.parent(node) else {
        return false;
    };
    if !doc.is_element_named(parent, "figure") {
        return false;
    }
    let mut decls = vec![
        ("position", "relative".to_string()),
        ("width", "100%".to_string()),
    ];
    if let Some(Dimension::Pixels(h)) = height {
        decls.push(("height", format!("{h}px")));
    }
    let merged = merge_style(doc.attr(parent, "style").unwrap_or_default(), &decls);
    doc.set_attr(parent, "style", merged);
    true
}

/// Overrides (or appends) declarations in an inline `style` value.
pub fn merge_style(existing: &str, decls: &[(&str, String)]) -> String {
    let mut props: IndexMap<String, String> = existing
        .split(';')
        .filter_map(|decl| {
            let (name, value) = decl.split_once(':')?;
            let name = name.trim().to_ascii_lowercase();
            (!name.is_empty()).then(|| (name, value.trim().to_string()))
        })
        .collect();
    for (name, value) in decls {
        props.insert(name.to_string(), value.clone());
    }
    props
        .iter()
        .map(|(k, v)| format!("{k}: {v};"))
        .collect::<Vec<_>>()
        .join(" ")
}
