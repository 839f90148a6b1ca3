//! URL handling module for Site-Cartographer
//!
//! This module provides link normalization, domain extraction and the
//! domain scope policy that keeps a crawl on its root site.

mod domain;
mod normalize;
mod scope;

// Re-export main functions
pub use domain::extract_domain;
pub use normalize::{normalize_link, normalize_root};
pub use scope::{is_ipv4_like, DomainScope};
