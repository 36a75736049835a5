#![forbid(unsafe_code)]

//! `ampify` converts HTML media embeds into AMP markup.
//!
//! The engine lives in `ampify-core` and is re-exported here. [`sanitize_markup`] is the
//! string-in, string-out entry point: it reads a well-formed fragment, runs the media pipeline
//! (`<video>` then `<audio>`) and serializes the result.
//!
//! ```
//! use ampify::{NoMetadata, SanitizeOptions, sanitize_markup};
//!
//! let out = sanitize_markup(r#"<video src="a.mp4"></video>"#, &SanitizeOptions::default(), &NoMetadata)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(out, r#"<amp-video src="a.mp4"><a href="a.mp4" fallback="">a.mp4</a></amp-video>"#);
//! ```

pub use ampify_core::*;

/// Sanitizes `markup` with the media pipeline.
///
/// Returns `Ok(None)` when nothing had to change, so callers can keep their original text.
pub fn sanitize_markup(
    markup: &str,
    options: &SanitizeOptions,
    lookup: &dyn MetadataLookup,
) -> Result<Option<String>> {
    let mut doc = Document::parse_fragment(markup)?;
    let ctx = SanitizeContext::new(options).with_lookup(lookup);
    if !Pipeline::media().run(&mut doc, &ctx) {
        return Ok(None);
    }
    Ok(Some(doc.to_html()))
}
