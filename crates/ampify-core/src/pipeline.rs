//! Ordered sanitizer registry.

use crate::dom::Document;
use crate::sanitizer::{ElementSanitizer, MediaSanitizer, SanitizeContext, SanitizeStats};
use indexmap::IndexMap;

/// Runs registered sanitizers one after another over the same document.
#[derive(Default)]
pub struct Pipeline {
    sanitizers: Vec<Box<dyn ElementSanitizer>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<video>` then `<audio>`.
    pub fn media() -> Self {
        Self::new()
            .with(MediaSanitizer::video())
            .with(MediaSanitizer::audio())
    }

    pub fn add(&mut self, sanitizer: impl ElementSanitizer + 'static) {
        self.sanitizers.push(Box::new(sanitizer));
    }

    pub fn with(mut self, sanitizer: impl ElementSanitizer + 'static) -> Self {
        self.add(sanitizer);
        self
    }

    pub fn len(&self) -> usize {
        self.sanitizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.sanitizers.iter().map(|s| s.name()).collect()
    }

    /// Every source selector handled by the pipeline, with the targets it may become.
    pub fn selector_conversion_mapping(&self) -> IndexMap<&'static str, Vec<&'static str>> {
        let mut out: IndexMap<&'static str, Vec<&'static str>> = IndexMap::new();
        for sanitizer in &self.sanitizers {
            for &(selector, targets) in sanitizer.selector_conversion_mapping() {
                let entry = out.entry(selector).or_default();
                for &target in targets {
                    if !entry.contains(&target) {
                        entry.push(target);
                    }
                }
            }
        }
        out
    }

    /// Runs every sanitizer; `true` when any of them changed the document.
    pub fn run(&self, doc: &mut Document, ctx: &SanitizeContext<'_>) -> bool {
        self.run_with_report(doc, ctx).mutated()
    }

    pub fn run_with_report(&self, doc: &mut Document, ctx: &SanitizeContext<'_>) -> PipelineReport {
        let mut report = PipelineReport::default();
        for sanitizer in &self.sanitizers {
            let stats = sanitizer.sanitize(doc, ctx);
            tracing::debug!(
                sanitizer = sanitizer.name(),
                converted = stats.converted,
                removed = stats.removed,
                skipped = stats.skipped,
                "sanitizer finished"
            );
            report.entries.push((sanitizer.name(), stats));
        }
        report
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("sanitizers", &self.names())
            .finish()
    }
}

/// Per-sanitizer statistics of one pipeline run, in run order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub entries: Vec<(&'static str, SanitizeStats)>,
}

impl PipelineReport {
    pub fn mutated(&self) -> bool {
        self.entries.iter().any(|(_, stats)| stats.did_mutate())
    }

    pub fn get(&self, name: &str) -> Option<SanitizeStats> {
        self.entries
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, stats)| *stats)
    }
}

/// Runs `sanitizers` in order over `doc`.
pub fn run(
    doc: &mut Document,
    sanitizers: &[&dyn ElementSanitizer],
    ctx: &SanitizeContext<'_>,
) -> bool {
    let mut mutated = false;
    for sanitizer in sanitizers {
        mutated |= sanitizer.sanitize(doc, ctx).did_mutate();
    }
    mutated
}
