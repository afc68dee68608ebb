//! In-memory content store, built once per build

use std::collections::HashMap;

use super::{ContentEntry, ContentQuery};
use crate::error::{Error, Result};

/// All entries loaded for a build, ordered by source path
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    entries: Vec<ContentEntry>,
}

impl ContentStore {
    /// Build a store, rejecting entries that would render to the same path
    pub fn from_entries(mut entries: Vec<ContentEntry>) -> Result<Self> {
        entries.sort_by(|a, b| a.id.cmp(&b.id));

        let mut seen: HashMap<&str, &str> = HashMap::new();
        for entry in &entries {
            if let Some(first) = seen.insert(&entry.slug, &entry.id) {
                return Err(Error::DuplicateSlug {
                    slug: entry.slug.clone(),
                    first: first.to_string(),
                    second: entry.id.clone(),
                });
            }
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ContentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a query against the store
    pub fn query(&self, query: &ContentQuery) -> Vec<&ContentEntry> {
        query.run(&self.entries)
    }

    /// Look up the entry whose slug matches, ignoring surrounding slashes
    pub fn find_by_slug(&self, slug: &str) -> Result<&ContentEntry> {
        let wanted = slug.trim_matches('/');
        self.entries
            .iter()
            .find(|e| e.slug.trim_matches('/') == wanted)
            .ok_or_else(|| Error::EntryNotFound {
                slug: slug.to_string(),
            })
    }
}
