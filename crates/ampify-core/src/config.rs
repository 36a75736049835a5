use crate::error::Result;
use crate::url_policy::UrlPolicy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Options shared by every sanitizer of a pipeline run.
///
/// Deserializes from JSON with `snake_case` keys; missing keys keep their defaults and unknown keys
/// are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SanitizeOptions {
    /// Reject playable sources that are not already served over HTTPS (unless a secure host
    /// mapping exists for them).
    pub require_https_source: bool,
    /// Keep a copy of the original element inside a `<noscript>` child of the replacement.
    pub add_noscript_fallback: bool,
    /// Content column width used to turn a percentage `width` into pixels.
    pub content_max_width: Option<u32>,
    /// `http` host -> `https` host rewrites applied when HTTPS is required.
    pub secure_host_map: IndexMap<String, String>,
    /// Classes of a parent `<figure>` that mark an embed whose layout should be `intrinsic`.
    pub intrinsic_container_classes: Vec<String>,
}

impl Default for SanitizeOptions {
    fn default() -> Self {
        Self {
            require_https_source: false,
            add_noscript_fallback: false,
            content_max_width: None,
            secure_host_map: IndexMap::new(),
            intrinsic_container_classes: vec!["wp-block-video".to_string()],
        }
    }
}

impl SanitizeOptions {
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn with_require_https_source(mut self, require: bool) -> Self {
        self.require_https_source = require;
        self
    }

    pub fn with_noscript_fallback(mut self, enabled: bool) -> Self {
        self.add_noscript_fallback = enabled;
        self
    }

    pub fn with_content_max_width(mut self, width: Option<u32>) -> Self {
        self.content_max_width = width;
        self
    }

    pub fn with_secure_host(
        mut self,
        insecure: impl Into<String>,
        secure: impl Into<String>,
    ) -> Self {
        self.secure_host_map
            .insert(insecure.into().to_ascii_lowercase(), secure.into());
        self
    }

    pub fn url_policy(&self) -> UrlPolicy<'_> {
        UrlPolicy::new(self.require_https_source, &self.secure_host_map)
    }
}
