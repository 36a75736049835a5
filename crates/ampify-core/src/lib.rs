#![forbid(unsafe_code)]

//! Headless conversion of HTML media embeds into their AMP equivalents.
//!
//! The engine works on an in-memory [`Document`]. Each [`ElementSanitizer`] finds its source
//! elements (`<video>`, `<audio>`), filters their attributes against a fixed allowlist, enforces
//! HTTPS on playable URLs, infers missing sizes and a layout, and swaps in the `amp-*` element.
//! A [`Pipeline`] runs several sanitizers over the same document and reports whether anything
//! changed.

pub mod attrs;
pub mod config;
pub mod dimension;
pub mod dom;
pub mod error;
pub mod fallback;
pub mod layout;
pub mod pipeline;
pub mod sanitizer;
pub mod url_policy;

pub use config::SanitizeOptions;
pub use dimension::{
    Dimension, Dimensions, MediaMetadata, MetadataLookup, NoMetadata, ResourceId, StaticMetadata,
};
pub use dom::{Document, NodeId};
pub use error::{Error, Result};
pub use layout::Layout;
pub use pipeline::{Pipeline, PipelineReport};
pub use sanitizer::{
    ElementSanitizer, MediaSanitizer, Outcome, SanitizeContext, SanitizeStats, SourceDescriptor,
};
pub use url_policy::UrlPolicy;

#[cfg(test)]
mod tests;
