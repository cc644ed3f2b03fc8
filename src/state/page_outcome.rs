/// Outcome definitions for claimed URLs
///
/// Every URL a worker claims ends in exactly one of these outcomes. They only
/// drive logging and statistics; the crawl never revisits a URL.
use std::fmt;

/// What happened to a URL after a worker claimed it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    /// Page was fetched as HTML and its links were processed
    Processed {
        /// Hrefs returned by the link extractor
        links_found: usize,
        /// In-scope links pushed to the frontier
        links_enqueued: usize,
    },

    /// Server answered outside the 2xx range
    HttpError { status_code: u16 },

    /// Response was not HTML
    NotHtml { content_type: Option<String> },

    /// DNS, connect, TLS, timeout or body-read failure
    TransportError { error: String },

    /// The link extractor rejected the document
    ParseError { error: String },

    /// The fetcher or the extractor panicked on this URL
    Panicked { error: String },
}

/// Outcome categories, without payloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OutcomeKind {
    Processed,
    HttpError,
    NotHtml,
    TransportError,
    ParseError,
    Panicked,
}

impl OutcomeKind {
    /// Every kind, in display order
    pub const ALL: [OutcomeKind; 6] = [
        Self::Processed,
        Self::HttpError,
        Self::NotHtml,
        Self::TransportError,
        Self::ParseError,
        Self::Panicked,
    ];

    /// Returns true for failures (as opposed to pages that were merely skipped)
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::TransportError | Self::ParseError | Self::Panicked
        )
    }
}

impl PageOutcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Processed { .. } => OutcomeKind::Processed,
            Self::HttpError { .. } => OutcomeKind::HttpError,
            Self::NotHtml { .. } => OutcomeKind::NotHtml,
            Self::TransportError { .. } => OutcomeKind::TransportError,
            Self::ParseError { .. } => OutcomeKind::ParseError,
            Self::Panicked { .. } => OutcomeKind::Panicked,
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Processed => "processed",
            Self::HttpError => "http_error",
            Self::NotHtml => "not_html",
            Self::TransportError => "transport_error",
            Self::ParseError => "parse_error",
            Self::Panicked => "panicked",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Processed {
                links_found,
                links_enqueued,
            } => write!(
                f,
                "processed ({} links, {} enqueued)",
                links_found, links_enqueued
            ),
            Self::HttpError { status_code } => write!(f, "HTTP {}", status_code),
            Self::NotHtml { content_type } => write!(
                f,
                "not HTML ({})",
                content_type.as_deref().unwrap_or("no content type")
            ),
            Self::TransportError { error } => write!(f, "transport error: {}", error),
            Self::ParseError { error } => write!(f, "parse error: {}", error),
            Self::Panicked { error } => write!(f, "panicked: {}", error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let outcome = PageOutcome::Processed {
            links_found: 3,
            links_enqueued: 2,
        };
        assert_eq!(outcome.kind(), OutcomeKind::Processed);
        assert_eq!(
            PageOutcome::HttpError { status_code: 404 }.kind(),
            OutcomeKind::HttpError
        );
    }

    #[test]
    fn test_is_error() {
        assert!(OutcomeKind::TransportError.is_error());
        assert!(OutcomeKind::ParseError.is_error());
        assert!(OutcomeKind::Panicked.is_error());
        assert!(!OutcomeKind::Processed.is_error());
        assert!(!OutcomeKind::HttpError.is_error());
        assert!(!OutcomeKind::NotHtml.is_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PageOutcome::HttpError { status_code: 503 }.to_string(),
            "HTTP 503"
        );
        assert_eq!(
            PageOutcome::NotHtml { content_type: None }.to_string(),
            "not HTML (no content type)"
        );
        assert_eq!(OutcomeKind::NotHtml.to_string(), "not_html");
    }
}
