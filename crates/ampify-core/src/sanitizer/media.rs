//! `<video>`/`<audio>` -> `<amp-video>`/`<amp-audio>`.
//!
//! Both element kinds share one algorithm; a [`MediaProfile`] supplies the tags, the attribute
//! rule table and whether sizes are inferred.
//!
//! Per element:
//! - the hints `data-amp-layout`/`data-amp-noloading` are pulled out before filtering
//! - attributes go through the profile's rule table (HTTPS enforcement included)
//! - children are detached one by one: usable `<source>`s are kept with their URL rewritten,
//!   unusable ones are dropped, the first other element becomes the `fallback`
//! - missing sizes are looked up from the sources, then the layout is derived
//! - no usable source at all removes the element; otherwise it is replaced, optionally keeping
//!   the original markup inside a `<noscript>`

use super::{ElementSanitizer, Outcome, SanitizeContext, SanitizeStats, TARGET_PREFIX};
use crate::attrs::{self, AUDIO_RULES, ConversionHints, RuleTable, VIDEO_RULES};
use crate::dimension::{self, Dimensions};
use crate::dom::{Attributes, Document, NodeId};
use crate::fallback;
use crate::layout::{self, Layout};

/// Attributes mirrored from the replacement onto the `<noscript>` copy.
const MIRRORED_ATTRS: &[&str] = &["src", "poster", "artwork"];

#[derive(Debug)]
pub struct MediaProfile {
    pub name: &'static str,
    pub tag: &'static str,
    pub target: &'static str,
    pub rules: &'static RuleTable,
    /// Fill missing sizes from resource metadata.
    pub lookup_dimensions: bool,
    /// Derive `responsive`/`intrinsic`/`fixed-height` from sizes and context.
    pub infer_layout: bool,
    pub conversions: &'static [(&'static str, &'static [&'static str])],
}

pub static VIDEO: MediaProfile = MediaProfile {
    name: "video",
    tag: "video",
    target: "amp-video",
    rules: &VIDEO_RULES,
    lookup_dimensions: true,
    infer_layout: true,
    conversions: &[("video", &["amp-video", "amp-youtube"])],
};

pub static AUDIO: MediaProfile = MediaProfile {
    name: "audio",
    tag: "audio",
    target: "amp-audio",
    rules: &AUDIO_RULES,
    lookup_dimensions: false,
    infer_layout: false,
    conversions: &[("audio", &["amp-audio", "amp-soundcloud"])],
};

/// A playable resource found on the element or one of its `<source>` children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
    pub url: String,
    pub mime: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct MediaSanitizer {
    profile: &'static MediaProfile,
}

impl MediaSanitizer {
    pub fn new(profile: &'static MediaProfile) -> Self {
        Self { profile }
    }

    pub fn video() -> Self {
        Self::new(&VIDEO)
    }

    pub fn audio() -> Self {
        Self::new(&AUDIO)
    }

    fn resolve_dimensions(
        &self,
        dims: Dimensions,
        src: &str,
        ctx: &SanitizeContext<'_>,
    ) -> Dimensions {
        if !self.profile.lookup_dimensions {
            return dims;
        }
        dimension::resolve_for_url(dims, src, ctx.lookup)
    }

    /// Converts or removes a single candidate element.
    pub fn convert(&self, doc: &mut Document, node: NodeId, ctx: &SanitizeContext<'_>) -> Outcome {
        if !doc.is_element_named(node, self.profile.tag) || !doc.is_attached(node) {
            return Outcome::Skipped;
        }
        if fallback::is_noscript_fallback(doc, node, TARGET_PREFIX) {
            return Outcome::Skipped;
        }
        let options = ctx.options;
        let policy = options.url_policy();

        let mut raw = doc
            .element(node)
            .map(|el| el.attrs.clone())
            .unwrap_or_default();
        let hints = ConversionHints::extract(&mut raw);
        hints.reinject(&mut raw);
        let mut new_attrs = attrs::filter(&raw, self.profile.rules, options);

        let mut sources: Vec<SourceDescriptor> = Vec::new();
        let mut dims = Dimensions::from_attrs(&new_attrs);
        if let Some(src) = new_attrs.get("src").cloned() {
            dims = self.resolve_dimensions(dims, &src, ctx);
            sources.push(SourceDescriptor {
                url: src,
                mime: None,
            });
        }

        let original = doc.shallow_clone(node);

        let mut fallback_node = None;
        let mut children = Vec::new();
        while let Some(child) = doc.first_child(node) {
            doc.detach(child);
            if doc.is_element_named(child, "source") {
                let enforced = doc.attr(child, "src").and_then(|src| policy.enforce(src));
                let Some(src) = enforced else {
                    tracing::trace!(
                        element = self.profile.tag,
                        "dropping <source> without usable src"
                    );
                    continue;
                };
                doc.set_attr(child, "src", src.as_str());
                dims = self.resolve_dimensions(dims, &src, ctx);
                sources.push(SourceDescriptor {
                    url: src,
                    mime: doc.attr(child, "type").map(str::to_string),
                });
            } else if fallback_node.is_none()
                && doc.element(child).is_some()
                && !doc.is_element_named(child, "track")
            {
                fallback::mark_fallback(doc, child);
                fallback_node = Some(child);
            }
            children.push(child);
        }

        if let (None, Some(first)) = (fallback_node, sources.first()) {
            let link = fallback::synthesize_link(doc, &first.url);
            children.push(link);
        }

        if sources.is_empty() {
            tracing::trace!(
                element = self.profile.tag,
                "removing element without playable source"
            );
            doc.remove(node);
            return Outcome::Removed;
        }

        let layout = self.resolve_layout(doc, node, dims, &hints, ctx);
        self.apply_layout(doc, node, layout, dims, &mut new_attrs);

        let replacement = doc.create_element_with_attrs(self.profile.target, new_attrs);
        for child in children {
            doc.append_child(replacement, child);
            if !fallback::is_fallback(doc, child) {
                let copy = doc.deep_clone(child);
                doc.append_child(original, copy);
            }
        }
        for &name in MIRRORED_ATTRS {
            match doc.attr(replacement, name).map(str::to_string) {
                Some(value) => doc.set_attr(original, name, value),
                None => {
                    doc.remove_attr(original, name);
                }
            }
        }

        doc.replace(node, replacement);
        if options.add_noscript_fallback {
            let noscript = fallback::wrap_noscript(doc, original);
            doc.append_child(replacement, noscript);
        }

        tracing::trace!(
            element = self.profile.tag,
            sources = sources.len(),
            layout = layout.as_str(),
            "converted"
        );
        Outcome::Converted(replacement)
    }

    fn resolve_layout(
        &self,
        doc: &Document,
        node: NodeId,
        dims: Dimensions,
        hints: &ConversionHints,
        ctx: &SanitizeContext<'_>,
    ) -> Layout {
        if !self.profile.infer_layout {
            return layout::resolve(None, None, hints.layout.as_deref());
        }
        let explicit = hints.layout.as_deref();
        if explicit.is_some_and(|h| h.parse::<Layout>().is_ok()) {
            return layout::resolve(dims.width, dims.height, explicit);
        }
        let classes = &ctx.options.intrinsic_container_classes;
        let implied = (dims.is_complete() && layout::in_intrinsic_container(doc, node, classes))
            .then_some(Layout::Intrinsic.as_str());
        layout::resolve(dims.width, dims.height, implied.or(explicit))
    }

    fn apply_layout(
        &self,
        doc: &mut Document,
        node: NodeId,
        layout: Layout,
        mut dims: Dimensions,
        attrs: &mut Attributes,
    ) {
        match layout {
            Layout::Fill => {
                if layout::apply_fill_to_parent(doc, node, dims.height) {
                    dims = Dimensions::default();
                }
                dims.write_to(attrs);
            }
            Layout::FixedHeight => {
                dims.width = None;
                dims.write_to(attrs);
                attrs.insert("width".to_string(), "auto".to_string());
            }
            _ => dims.write_to(attrs),
        }
        if !layout.is_unset() {
            attrs.insert("layout".to_string(), layout.as_str().to_string());
        }
    }
}

impl ElementSanitizer for MediaSanitizer {
    fn name(&self) -> &'static str {
        self.profile.name
    }

    fn selector_conversion_mapping(&self) -> &'static [(&'static str, &'static [&'static str])] {
        self.profile.conversions
    }

    fn sanitize(&self, doc: &mut Document, ctx: &SanitizeContext<'_>) -> SanitizeStats {
        let mut stats = SanitizeStats::default();
        let nodes = doc.elements_by_tag(self.profile.tag);
        for &node in nodes.iter().rev() {
            stats.record(self.convert(doc, node, ctx));
        }
        stats
    }
}
