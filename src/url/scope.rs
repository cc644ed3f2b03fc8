use crate::url::resolve::origin_prefix;
use crate::{UrlError, UrlResult};
use serde::Deserialize;
use std::fmt;
use url::Url;

/// How discovered links are matched against the crawl's reference domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScopeMode {
    /// Literal prefix test against the seed's scheme+authority text
    ///
    /// `https://example.com.attacker.net/` passes for a seed on
    /// `https://example.com`.
    #[default]
    Prefix,

    /// Parsed comparison of scheme, host and effective port
    Host,
}

impl fmt::Display for ScopeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Prefix => write!(f, "prefix"),
            Self::Host => write!(f, "host"),
        }
    }
}

/// Scheme, lowercase host and effective port of a parsed URL
#[derive(Debug, Clone, PartialEq, Eq)]
struct HostKey {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl HostKey {
    fn of(url: &Url) -> Option<Self> {
        Some(Self {
            scheme: url.scheme().to_string(),
            host: url.host_str()?.to_lowercase(),
            port: url.port_or_known_default(),
        })
    }
}

/// The crawl's reference domain, derived once from the seed URL
#[derive(Debug, Clone)]
pub struct DomainScope {
    mode: ScopeMode,
    origin: String,
    host_key: Option<HostKey>,
}

impl DomainScope {
    /// Builds the scope for a crawl starting at `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(DomainScope)` - The seed is an http(s) URL with an authority
    /// * `Err(UrlError)` - The seed cannot anchor a crawl
    pub fn from_seed(seed: &str, mode: ScopeMode) -> UrlResult<Self> {
        if !(seed.starts_with("http://") || seed.starts_with("https://")) {
            return Err(UrlError::InvalidScheme(format!(
                "Only HTTP and HTTPS seeds are supported, got: {}",
                seed
            )));
        }

        let origin = origin_prefix(seed)
            .ok_or_else(|| UrlError::MissingAuthority(seed.to_string()))?
            .to_string();

        let host_key = match mode {
            ScopeMode::Prefix => None,
            ScopeMode::Host => {
                let parsed = Url::parse(seed).map_err(|e| UrlError::Parse(e.to_string()))?;
                let key = HostKey::of(&parsed)
                    .ok_or_else(|| UrlError::MissingAuthority(seed.to_string()))?;
                Some(key)
            }
        };

        Ok(Self {
            mode,
            origin,
            host_key,
        })
    }

    /// Returns true if `candidate` belongs to the crawl's domain
    pub fn same_domain(&self, candidate: &str) -> bool {
        match (&self.mode, &self.host_key) {
            (ScopeMode::Host, Some(key)) => Url::parse(candidate)
                .ok()
                .and_then(|url| HostKey::of(&url))
                .is_some_and(|candidate_key| &candidate_key == key),
            _ => candidate.starts_with(&self.origin),
        }
    }

    /// The seed's scheme+authority text
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn mode(&self) -> ScopeMode {
        self.mode
    }
}

/// Literal prefix test of `candidate` against the scheme+authority of `reference`
///
/// Returns false when `reference` has no `//` separator.
pub fn same_domain(candidate: &str, reference: &str) -> bool {
    origin_prefix(reference).is_some_and(|origin| candidate.starts_with(origin))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_same_domain() {
        let scope = DomainScope::from_seed("https://example.com/start", ScopeMode::Prefix).unwrap();
        assert_eq!(scope.origin(), "https://example.com");
        assert!(scope.same_domain("https://example.com/about"));
        assert!(scope.same_domain("https://example.com"));
    }

    #[test]
    fn test_prefix_rejects_other_authority() {
        let scope = DomainScope::from_seed("https://example.com/", ScopeMode::Prefix).unwrap();
        assert!(!scope.same_domain("https://other.com/about"));
        assert!(!scope.same_domain("https://cdn.example.com/x"));
        assert!(!scope.same_domain("http://example.com/about"));
    }

    #[test]
    fn test_prefix_accepts_lookalike_host() {
        let scope = DomainScope::from_seed("https://example.com/", ScopeMode::Prefix).unwrap();
        assert!(scope.same_domain("https://example.com.attacker.net/phish"));
    }

    #[test]
    fn test_host_rejects_lookalike_host() {
        let scope = DomainScope::from_seed("https://example.com/", ScopeMode::Host).unwrap();
        assert!(!scope.same_domain("https://example.com.attacker.net/phish"));
        assert!(scope.same_domain("https://EXAMPLE.com/page"));
        assert!(scope.same_domain("https://example.com:443/page"));
    }

    #[test]
    fn test_host_compares_port() {
        let scope = DomainScope::from_seed("http://127.0.0.1:8080/", ScopeMode::Host).unwrap();
        assert!(scope.same_domain("http://127.0.0.1:8080/a"));
        assert!(!scope.same_domain("http://127.0.0.1:9090/a"));
        assert!(!scope.same_domain("not a url"));
    }

    #[test]
    fn test_seed_without_scheme() {
        let result = DomainScope::from_seed("example.com/start", ScopeMode::Prefix);
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_seed_with_other_scheme() {
        let result = DomainScope::from_seed("ftp://example.com/", ScopeMode::Prefix);
        assert!(matches!(result, Err(UrlError::InvalidScheme(_))));
    }

    #[test]
    fn test_free_same_domain() {
        assert!(same_domain("https://example.com/x", "https://example.com/a/b"));
        assert!(!same_domain("https://other.com/x", "https://example.com/a/b"));
        assert!(!same_domain("https://example.com/x", "example.com"));
    }
}
