//! Element sanitizers: one per source element kind.

mod media;

use crate::config::SanitizeOptions;
use crate::dimension::{MetadataLookup, NoMetadata};
use crate::dom::{Document, NodeId};

pub use media::{AUDIO, MediaProfile, MediaSanitizer, SourceDescriptor, VIDEO};

/// Tag prefix shared by every replacement element.
pub const TARGET_PREFIX: &str = "amp-";

static NO_METADATA: NoMetadata = NoMetadata;

/// Everything a sanitizer may consult during a run.
#[derive(Clone, Copy)]
pub struct SanitizeContext<'a> {
    pub options: &'a SanitizeOptions,
    pub lookup: &'a dyn MetadataLookup,
}

impl<'a> SanitizeContext<'a> {
    pub fn new(options: &'a SanitizeOptions) -> Self {
        Self {
            options,
            lookup: &NO_METADATA,
        }
    }

    pub fn with_lookup(mut self, lookup: &'a dyn MetadataLookup) -> Self {
        self.lookup = lookup;
        self
    }
}

impl std::fmt::Debug for SanitizeContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SanitizeContext")
            .field("options", self.options)
            .finish_non_exhaustive()
    }
}

/// Result of handling one candidate element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The element was replaced by the given target-vocabulary node.
    Converted(NodeId),
    /// The element had nothing usable and was taken out of the tree.
    Removed,
    /// The element was left untouched.
    Skipped,
}

impl Outcome {
    pub fn did_mutate(self) -> bool {
        !matches!(self, Self::Skipped)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SanitizeStats {
    pub converted: usize,
    pub removed: usize,
    pub skipped: usize,
}

impl SanitizeStats {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Converted(_) => self.converted += 1,
            Outcome::Removed => self.removed += 1,
            Outcome::Skipped => self.skipped += 1,
        }
    }

    /// The sanitizer's mutation flag: at least one element was converted or removed.
    pub fn did_mutate(&self) -> bool {
        self.converted > 0 || self.removed > 0
    }
}

/// Converts one kind of source element into its restricted equivalent.
///
/// Implementations must leave the tree well-formed after every single element they touch and
/// must never fail: anything they cannot handle is skipped or removed.
pub trait ElementSanitizer {
    fn name(&self) -> &'static str;

    /// Source selectors mapped to the target elements they may turn into.
    fn selector_conversion_mapping(&self) -> &'static [(&'static str, &'static [&'static str])] {
        &[]
    }

    fn sanitize(&self, doc: &mut Document, ctx: &SanitizeContext<'_>) -> SanitizeStats;
}
