//! Width/height values, their coercion, and metadata-based inference of missing ones.

use crate::dom::Attributes;
use percent_encoding::percent_decode_str;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use url::Url;

fn pixel_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(\d+)(?:(?:\.\d+)?px)?$").expect("valid regex"))
}

fn percent_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+(?:\.\d+)?)%$").expect("valid regex"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Pixels(u32),
    Percent(u32),
}

impl Dimension {
    /// Accepts `640`, `640px`, `640.5px` and `50%`. Zero and anything else is rejected.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        let parsed = if let Some(caps) = pixel_regex().captures(value) {
            caps[1].parse::<u32>().ok().map(Self::Pixels)
        } else if let Some(caps) = percent_regex().captures(value) {
            caps[1]
                .parse::<f64>()
                .ok()
                .map(|p| Self::Percent(p.round() as u32))
        } else {
            None
        };
        parsed.filter(|d| d.value() > 0)
    }

    /// Parses `value` for the given axis, turning a percentage width into pixels when the content
    /// width is known.
    pub fn coerce(value: &str, axis: Axis, content_max_width: Option<u32>) -> Option<Self> {
        match (Self::parse(value)?, axis, content_max_width) {
            (Self::Percent(p), Axis::Width, Some(max)) => {
                let px = (f64::from(p) / 100.0 * f64::from(max)).round() as u32;
                (px > 0).then_some(Self::Pixels(px))
            }
            (dim, _, _) => Some(dim),
        }
    }

    pub fn value(self) -> u32 {
        match self {
            Self::Pixels(v) | Self::Percent(v) => v,
        }
    }

    pub fn is_pixels(self) -> bool {
        matches!(self, Self::Pixels(_))
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(v) => write!(f, "{v}"),
            Self::Percent(v) => write!(f, "{v}%"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
}

impl Dimensions {
    pub fn new(width: Option<Dimension>, height: Option<Dimension>) -> Self {
        Self { width, height }
    }

    /// Reads already-filtered `width`/`height` attributes.
    pub fn from_attrs(attrs: &Attributes) -> Self {
        Self {
            width: attrs.get("width").and_then(|v| Dimension::parse(v)),
            height: attrs.get("height").and_then(|v| Dimension::parse(v)),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.width.is_some() && self.height.is_some()
    }

    /// Writes both values back, removing the attribute for an unknown one.
    pub fn write_to(&self, attrs: &mut Attributes) {
        for (name, dim) in [("width", self.width), ("height", self.height)] {
            match dim {
                Some(d) => {
                    attrs.insert(name.to_string(), d.to_string());
                }
                None => {
                    attrs.shift_remove(name);
                }
            }
        }
    }
}

/// Size metadata known for a media resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MediaMetadata {
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

/// Normalized lookup key for a media resource: the slugified file stem of the URL path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceId(String);

impl ResourceId {
    pub fn from_url(src: &str) -> Option<Self> {
        static BASE: OnceLock<Option<Url>> = OnceLock::new();
        let base = BASE
            .get_or_init(|| Url::parse("https://resource.invalid/").ok())
            .as_ref()?;
        let url = base.join(src.trim()).ok()?;
        let decoded = percent_decode_str(url.path_segments()?.next_back()?).decode_utf8_lossy();
        let file: &str = &decoded;
        let stem = match file.rsplit_once('.') {
            Some((stem, _ext)) if !stem.is_empty() => stem,
            _ => file,
        };
        let slug = slugify(stem);
        (!slug.is_empty()).then(|| Self(slug))
    }

    pub fn new(id: impl AsRef<str>) -> Self {
        Self(slugify(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn slugify(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_dash = false;
    for ch in input.chars() {
        if ch.is_alphanumeric() || ch == '_' {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(ch.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// Source of media size metadata, keyed by [`ResourceId`].
///
/// A miss and a failed lookup are the same thing to the sanitizers: the size stays unknown.
pub trait MetadataLookup {
    fn lookup(&self, id: &ResourceId) -> Option<MediaMetadata>;
}

impl<F> MetadataLookup for F
where
    F: Fn(&ResourceId) -> Option<MediaMetadata>,
{
    fn lookup(&self, id: &ResourceId) -> Option<MediaMetadata> {
        self(id)
    }
}

/// Lookup that never knows anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataLookup for NoMetadata {
    fn lookup(&self, _id: &ResourceId) -> Option<MediaMetadata> {
        None
    }
}

/// In-memory metadata table, e.g. loaded from a JSON object `{ "clip": { "width": 640, ... } }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StaticMetadata(FxHashMap<String, MediaMetadata>);

impl StaticMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl AsRef<str>, meta: MediaMetadata) {
        self.0.insert(ResourceId::new(id).0, meta);
    }

    pub fn with(mut self, id: impl AsRef<str>, width: u32, height: u32) -> Self {
        self.insert(id, MediaMetadata { width, height });
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl MetadataLookup for StaticMetadata {
    fn lookup(&self, id: &ResourceId) -> Option<MediaMetadata> {
        self.0.get(id.as_str()).copied()
    }
}

/// Fills the missing half (or both halves) of `dims` from the metadata of `resource`.
///
/// Present values are never overwritten; a metadata value of 0 counts as unknown.
pub fn resolve(dims: Dimensions, resource: &ResourceId, lookup: &dyn MetadataLookup) -> Dimensions {
    if dims.is_complete() {
        return dims;
    }
    let Some(meta) = lookup.lookup(resource) else {
        tracing::trace!(resource = resource.as_str(), "no media metadata");
        return dims;
    };
    let known = |v: u32| (v > 0).then_some(Dimension::Pixels(v));
    Dimensions {
        width: dims.width.or_else(|| known(meta.width)),
        height: dims.height.or_else(|| known(meta.height)),
    }
}

/// [`resolve`] keyed by the resource identifier derived from `src`.
pub fn resolve_for_url(dims: Dimensions, src: &str, lookup: &dyn MetadataLookup) -> Dimensions {
    if dims.is_complete() {
        return dims;
    }
    match ResourceId::from_url(src) {
        Some(id) => resolve(dims, &id, lookup),
        None => dims,
    }
}
