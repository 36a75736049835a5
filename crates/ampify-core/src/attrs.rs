//! Table-driven attribute filtering for replacement elements.
//!
//! Each media profile owns a static [`RuleTable`]. Attribute names are matched ASCII
//! case-insensitively: exact entries first, then denied prefixes, then prefix entries. Whatever
//! matches nothing is dropped.

use crate::config::SanitizeOptions;
use crate::dimension::{Axis, Dimension};
use crate::dom::Attributes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrRule {
    /// Copied verbatim.
    PassThrough,
    /// Coerced to a pixel or percentage value; dropped when not numeric.
    Dimension(Axis),
    /// `"false"` removes the attribute, anything else becomes an empty (present) flag.
    Flag,
    /// Goes through HTTPS enforcement; dropped when rejected.
    Url,
    /// Copied verbatim under another name.
    Rename(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct RuleTable {
    pub exact: &'static [(&'static str, AttrRule)],
    pub denied_prefixes: &'static [&'static str],
    pub prefixes: &'static [(&'static str, AttrRule)],
}

impl RuleTable {
    pub fn rule_for(&self, name: &str) -> Option<AttrRule> {
        if let Some((_, rule)) = self
            .exact
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            return Some(*rule);
        }
        let lower = name.to_ascii_lowercase();
        if self.denied_prefixes.iter().any(|p| lower.starts_with(p)) {
            return None;
        }
        self.prefixes
            .iter()
            .find(|(p, _)| lower.starts_with(p))
            .map(|(_, rule)| *rule)
    }
}

const CONVERSION_HINT_PREFIX: &str = "data-amp-";

const GLOBAL_PREFIXES: &[(&str, AttrRule)] = &[
    ("data-", AttrRule::PassThrough),
    ("aria-", AttrRule::PassThrough),
];

pub static VIDEO_RULES: RuleTable = RuleTable {
    exact: &[
        ("src", AttrRule::Url),
        ("width", AttrRule::Dimension(Axis::Width)),
        ("height", AttrRule::Dimension(Axis::Height)),
        ("poster", AttrRule::Url),
        ("artwork", AttrRule::Url),
        ("controls", AttrRule::Flag),
        ("loop", AttrRule::Flag),
        ("muted", AttrRule::Flag),
        ("autoplay", AttrRule::Flag),
        ("class", AttrRule::PassThrough),
        ("id", AttrRule::PassThrough),
        ("title", AttrRule::PassThrough),
        ("lang", AttrRule::PassThrough),
        ("dir", AttrRule::PassThrough),
        ("preload", AttrRule::PassThrough),
        ("crossorigin", AttrRule::PassThrough),
        ("album", AttrRule::PassThrough),
        ("artist", AttrRule::PassThrough),
        ("data-amp-layout", AttrRule::Rename("layout")),
        ("data-amp-noloading", AttrRule::Rename("noloading")),
    ],
    denied_prefixes: &[CONVERSION_HINT_PREFIX],
    prefixes: GLOBAL_PREFIXES,
};

pub static AUDIO_RULES: RuleTable = RuleTable {
    exact: &[
        ("src", AttrRule::Url),
        ("width", AttrRule::Dimension(Axis::Width)),
        ("height", AttrRule::Dimension(Axis::Height)),
        ("controls", AttrRule::Flag),
        ("loop", AttrRule::Flag),
        ("muted", AttrRule::Flag),
        ("autoplay", AttrRule::Flag),
        ("class", AttrRule::PassThrough),
        ("id", AttrRule::PassThrough),
        ("title", AttrRule::PassThrough),
        ("lang", AttrRule::PassThrough),
        ("dir", AttrRule::PassThrough),
        ("preload", AttrRule::PassThrough),
        ("data-amp-layout", AttrRule::Rename("layout")),
        ("data-amp-noloading", AttrRule::Rename("noloading")),
    ],
    denied_prefixes: &[CONVERSION_HINT_PREFIX],
    prefixes: GLOBAL_PREFIXES,
};

/// Applies `table` to `raw`, producing the attribute set of a replacement element.
pub fn filter(raw: &Attributes, table: &RuleTable, options: &SanitizeOptions) -> Attributes {
    let policy = options.url_policy();
    let mut out = Attributes::with_capacity(raw.len());
    for (name, value) in raw {
        let Some(rule) = table.rule_for(name) else {
            tracing::trace!(attribute = name.as_str(), "dropping unrecognized attribute");
            continue;
        };
        let name = name.to_ascii_lowercase();
        match rule {
            AttrRule::PassThrough => {
                out.insert(name, value.clone());
            }
            AttrRule::Dimension(axis) => {
                if let Some(dim) = Dimension::coerce(value, axis, options.content_max_width) {
                    out.insert(name, dim.to_string());
                }
            }
            AttrRule::Flag => {
                if value != "false" {
                    out.insert(name, String::new());
                }
            }
            AttrRule::Url => match policy.enforce(value) {
                Some(url) => {
                    out.insert(name, url);
                }
                None => {
                    tracing::trace!(
                        attribute = name.as_str(),
                        value = value.as_str(),
                        "rejected URL"
                    );
                }
            },
            AttrRule::Rename(target) => {
                out.insert(target.to_string(), value.clone());
            }
        }
    }
    out
}

/// Hints that steer the conversion itself rather than being copied onto the result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionHints {
    pub layout: Option<String>,
    pub noloading: bool,
}

impl ConversionHints {
    /// Removes `data-amp-layout` and `data-amp-noloading` from `attrs` and returns their values.
    pub fn extract(attrs: &mut Attributes) -> Self {
        let mut hints = Self::default();
        attrs.retain(|name, value| {
            if name.eq_ignore_ascii_case("data-amp-layout") {
                let v = value.trim();
                hints.layout = (!v.is_empty()).then(|| v.to_string());
                false
            } else if name.eq_ignore_ascii_case("data-amp-noloading") {
                hints.noloading = true;
                false
            } else {
                true
            }
        });
        hints
    }

    /// Re-adds the normalized pass-through hints so the rule table can rename them.
    pub fn reinject(&self, attrs: &mut Attributes) {
        if self.noloading {
            attrs.insert("data-amp-noloading".to_string(), String::new());
        }
    }
}
