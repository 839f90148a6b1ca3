//! Sitemap accumulation
//!
//! Every parsed page gets one entry holding all normalized links found on
//! it (in and out of scope) and the assets it references.

use std::collections::{BTreeMap, BTreeSet};

/// Asset references extracted from one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageAssets {
    /// `href` of each `<link rel="stylesheet">`
    pub stylesheets: Vec<String>,

    /// `src` of each `<img>`
    pub images: Vec<String>,

    /// `src` of each external `<script>`
    pub scripts: Vec<String>,
}

impl PageAssets {
    pub fn len(&self) -> usize {
        self.stylesheets.len() + self.images.len() + self.scripts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Links and assets of one visited page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapEntry {
    pub links: BTreeSet<String>,
    pub assets: PageAssets,
}

/// Mapping from visited page URL to its entry
#[derive(Debug, Default)]
pub struct Sitemap {
    entries: BTreeMap<String, SitemapEntry>,
}

impl Sitemap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upserts the entry for `page_url`
    pub fn record(&mut self, page_url: &str, assets: PageAssets, links: BTreeSet<String>) {
        self.entries
            .insert(page_url.to_string(), SitemapEntry { links, assets });
    }

    pub fn get(&self, page_url: &str) -> Option<&SitemapEntry> {
        self.entries.get(page_url)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> BTreeMap<String, SitemapEntry> {
        self.entries
    }
}
