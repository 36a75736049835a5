//! HTTPS enforcement for playable sources and other URL attributes.

use indexmap::IndexMap;
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn script_or_data_scheme_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^(?:\w+script|data):").expect("valid regex"))
}

fn whitespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[\u{0000}-\u{0020}\u{00A0}]").expect("valid regex"))
}

#[derive(Debug, Clone, Copy)]
pub struct UrlPolicy<'a> {
    require_https: bool,
    secure_host_map: &'a IndexMap<String, String>,
}

impl<'a> UrlPolicy<'a> {
    pub fn new(require_https: bool, secure_host_map: &'a IndexMap<String, String>) -> Self {
        Self {
            require_https,
            secure_host_map,
        }
    }

    fn secure_host_for(&self, host: &str) -> Option<&'a str> {
        self.secure_host_map
            .iter()
            .find(|(insecure, _)| insecure.eq_ignore_ascii_case(host))
            .map(|(_, secure)| secure.as_str())
    }

    /// Returns the URL to emit, or `None` when the value has to be dropped.
    ///
    /// - `https:` URLs are kept verbatim.
    /// - Protocol-relative URLs always become `https:`.
    /// - When HTTPS is required, `http:` URLs survive only through the secure host map; relative
    ///   URLs and any other scheme are rejected.
    /// - Otherwise `http:` URLs are upgraded in place and relative URLs pass through.
    /// - Script-like and `data:` URLs are never accepted.
    pub fn enforce(&self, raw: &str) -> Option<String> {
        let value = raw.trim();
        if value.is_empty() {
            return None;
        }
        let compact = whitespace_regex().replace_all(value, "");
        if script_or_data_scheme_regex().is_match(&compact) {
            return None;
        }

        if let Some(rest) = value.strip_prefix("//") {
            return Some(format!("https://{rest}"));
        }

        match Url::parse(value) {
            Ok(url) => match url.scheme() {
                "https" => Some(value.to_string()),
                "http" => self.upgrade(url),
                _ if self.require_https => None,
                _ => Some(value.to_string()),
            },
            Err(url::ParseError::RelativeUrlWithoutBase) if !self.require_https => {
                Some(value.to_string())
            }
            Err(_) => None,
        }
    }

    fn upgrade(&self, mut url: Url) -> Option<String> {
        if self.require_https {
            let host = url.host_str()?.to_string();
            let secure = self.secure_host_for(&host)?;
            url.set_host(Some(secure)).ok()?;
        }
        url.set_scheme("https").ok()?;
        Some(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(a, b)| (a.to_string(), b.to_string()))
            .collect()
    }

    #[test]
    fn https_is_kept_verbatim() {
        let hosts = IndexMap::new();
        for require in [false, true] {
            let policy = UrlPolicy::new(require, &hosts);
            assert_eq!(
                policy.enforce(" https://example.com/a.mp4 ").as_deref(),
                Some("https://example.com/a.mp4")
            );
        }
    }

    #[test]
    fn http_is_upgraded_when_https_is_not_required() {
        let hosts = IndexMap::new();
        let policy = UrlPolicy::new(false, &hosts);
        assert_eq!(
            policy.enforce("http://example.com/a.mp4").as_deref(),
            Some("https://example.com/a.mp4")
        );
        assert_eq!(policy.enforce("a.mp4").as_deref(), Some("a.mp4"));
        assert_eq!(policy.enforce("/media/a.mp4").as_deref(), Some("/media/a.mp4"));
    }

    #[test]
    fn http_without_mapping_is_rejected_when_https_is_required() {
        let hosts = IndexMap::new();
        let policy = UrlPolicy::new(true, &hosts);
        assert_eq!(policy.enforce("http://example.com/a.mp4"), None);
        assert_eq!(policy.enforce("a.mp4"), None);
        assert_eq!(policy.enforce("ftp://example.com/a.mp4"), None);
    }

    #[test]
    fn http_with_mapping_is_rewritten_to_secure_host() {
        let hosts = map(&[("Example.com", "cdn.example.com")]);
        let policy = UrlPolicy::new(true, &hosts);
        assert_eq!(
            policy.enforce("http://example.com/v/a.mp4?t=1").as_deref(),
            Some("https://cdn.example.com/v/a.mp4?t=1")
        );
    }

    #[test]
    fn protocol_relative_becomes_https() {
        let hosts = IndexMap::new();
        let policy = UrlPolicy::new(true, &hosts);
        assert_eq!(
            policy.enforce("//example.com/a.mp4").as_deref(),
            Some("https://example.com/a.mp4")
        );
    }

    #[test]
    fn script_and_data_urls_and_empty_values_are_rejected() {
        let hosts = IndexMap::new();
        let policy = UrlPolicy::new(false, &hosts);
        assert_eq!(policy.enforce("javascript:alert(1)"), None);
        assert_eq!(policy.enforce("java\tscript:alert(1)"), None);
        assert_eq!(policy.enforce("data:video/mp4;base64,AAAA"), None);
        assert_eq!(policy.enforce("   "), None);
    }

    #[test]
    fn unparsable_absolute_urls_are_rejected() {
        let hosts = IndexMap::new();
        let policy = UrlPolicy::new(false, &hosts);
        assert_eq!(policy.enforce("http://exa mple.com/a.mp4"), None);
    }
}
