/// Href prefixes that never name a fetchable resource
const NON_FETCHABLE_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Resolves a raw href against the URL of the page it was found on
///
/// Resolution is purely textual: no percent-decoding, no dot-segment removal,
/// no case folding. The result is what gets deduplicated, so two hrefs that
/// differ textually are two different URLs.
///
/// # Rules (evaluated in order)
///
/// 1. Script, mail, phone and data pseudo-links, and anything carrying a
///    fragment marker (`#`), are rejected
/// 2. Absolute `http://` / `https://` hrefs are returned unchanged
/// 3. Scheme-relative hrefs (`//host/path`) take the base's scheme
/// 4. Root-relative hrefs (`/path`) take the base's scheme and authority
/// 5. Anything else is resolved against the base's directory
///
/// # Returns
///
/// * `Some(String)` - The absolute URL
/// * `None` - The href was rejected, or the base has no `//` separator
///
/// # Examples
///
/// ```
/// use tidewalk::url::resolve;
///
/// let base = "https://example.com/a/b";
/// assert_eq!(resolve(base, "/about").as_deref(), Some("https://example.com/about"));
/// assert_eq!(resolve(base, "relative.html").as_deref(), Some("https://example.com/a/relative.html"));
/// assert_eq!(resolve(base, "#frag"), None);
/// ```
pub fn resolve(base: &str, raw_href: &str) -> Option<String> {
    let href = raw_href.trim();

    if href.is_empty() || is_non_fetchable(href) || href.contains('#') {
        return None;
    }

    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }

    // Scheme-relative
    if href.starts_with("//") {
        let colon = base.find(':')?;
        return Some(format!("{}{}", &base[..=colon], href));
    }

    let authority_start = base.find("//")? + 2;

    // Root-relative
    if href.starts_with('/') {
        return match base[authority_start..].find('/') {
            Some(offset) => Some(format!("{}{}", &base[..authority_start + offset], href)),
            None => Some(format!("{}{}", base, href)),
        };
    }

    // Path-relative: the base's last slash only counts if it sits inside the path
    match base.rfind('/') {
        Some(last_slash) if last_slash >= authority_start => {
            Some(format!("{}{}", &base[..=last_slash], href))
        }
        _ => Some(format!("{}/{}", base, href)),
    }
}

/// Returns the scheme+authority prefix of a URL
///
/// This is the text up to (not including) the first `/` after `//`, or the
/// whole string when there is no path.
///
/// ```
/// use tidewalk::url::origin_prefix;
///
/// assert_eq!(origin_prefix("https://example.com/a/b"), Some("https://example.com"));
/// assert_eq!(origin_prefix("https://example.com"), Some("https://example.com"));
/// assert_eq!(origin_prefix("example.com/a"), None);
/// ```
pub fn origin_prefix(url: &str) -> Option<&str> {
    let authority_start = url.find("//")? + 2;
    match url[authority_start..].find('/') {
        Some(offset) => Some(&url[..authority_start + offset]),
        None => Some(url),
    }
}

fn is_non_fetchable(href: &str) -> bool {
    NON_FETCHABLE_SCHEMES.iter().any(|scheme| {
        href.get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}
