//! URL handling module for Tidewalk
//!
//! This module provides textual href resolution and the domain scope check
//! that keeps a crawl on its seed's domain.

mod resolve;
mod scope;

// Re-export main functions
pub use resolve::{origin_prefix, resolve};
pub use scope::{same_domain, DomainScope, ScopeMode};

/// Resolves `raw_href` against `base` and keeps it only if it is in scope
///
/// This is the composition every worker applies to each extracted href.
pub fn resolve_in_scope(base: &str, raw_href: &str, scope: &DomainScope) -> Option<String> {
    resolve(base, raw_href).filter(|resolved| scope.same_domain(resolved))
}
