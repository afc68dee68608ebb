//! Content queries: filter by source path, sort by a front-matter key, limit

use regex::Regex;
use std::cmp::Ordering;

use super::ContentEntry;
use crate::error::{Error, Result};

/// Front-matter field a query sorts on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Order,
    Date,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

/// A declarative query against the content store.
///
/// Sorting is stable, so entries with equal keys keep the store's order.
/// Entries missing the sort key come after every entry that has it.
#[derive(Debug, Clone, Default)]
pub struct ContentQuery {
    filter: Option<Regex>,
    sort: Option<(SortKey, Direction)>,
    limit: Option<usize>,
}

impl ContentQuery {
    /// Query every entry in store order
    pub fn all() -> Self {
        Self::default()
    }

    /// Query entries whose source path matches `pattern`
    pub fn matching(pattern: &str) -> Result<Self> {
        let filter = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            filter: Some(filter),
            ..Self::default()
        })
    }

    pub fn sort_by(mut self, key: SortKey, direction: Direction) -> Self {
        self.sort = Some((key, direction));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether an entry with this source path passes the filter
    pub fn matches(&self, id: &str) -> bool {
        self.filter.as_ref().map_or(true, |re| re.is_match(id))
    }

    /// Evaluate the query against a list of entries
    pub fn run<'a>(&self, entries: &'a [ContentEntry]) -> Vec<&'a ContentEntry> {
        let mut matched: Vec<&ContentEntry> = entries
            .iter()
            .filter(|e| self.matches(&e.id))
            .collect();

        if let Some((key, direction)) = self.sort {
            matched.sort_by(|a, b| compare(a, b, key, direction));
        }

        if let Some(limit) = self.limit {
            matched.truncate(limit);
        }

        matched
    }
}

fn compare(a: &ContentEntry, b: &ContentEntry, key: SortKey, direction: Direction) -> Ordering {
    let present = match key {
        SortKey::Order => (a.order.is_some(), b.order.is_some()),
        SortKey::Date => (a.published.is_some(), b.published.is_some()),
    };
    match present {
        (true, true) => {}
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        (false, false) => return Ordering::Equal,
    }

    let ordering = match key {
        SortKey::Order => a
            .order
            .zip(b.order)
            .map_or(Ordering::Equal, |(x, y)| x.total_cmp(&y)),
        SortKey::Date => a.published.cmp(&b.published),
    };

    match direction {
        Direction::Asc => ordering,
        Direction::Desc => ordering.reverse(),
    }
}
