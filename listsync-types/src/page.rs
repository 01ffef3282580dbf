use crate::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named collection served by a remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Posts,
    Users,
}

impl ResourceKind {
    /// The path segment used by the HTTP API (`/api/v1/{segment}`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Posts => "posts",
            ResourceKind::Users => "users",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One range of records returned by a single fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Offset of the first requested record.
    pub start: usize,
    /// Number of records requested.
    pub limit: usize,
    /// Records in arrival order. Never longer than `limit`.
    pub records: Vec<Record>,
}

impl Page {
    /// Wraps fetched records, dropping anything past `limit`.
    pub fn new(start: usize, limit: usize, mut records: Vec<Record>) -> Self {
        records.truncate(limit);
        Self {
            start,
            limit,
            records,
        }
    }

    /// Number of records actually received.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A full page is taken as a hint that more records may follow.
    ///
    /// This is a heuristic: when the collection size is an exact multiple of
    /// the page size, the last full page still reports `true`.
    pub fn is_full(&self) -> bool {
        self.records.len() == self.limit
    }

    /// Offset of the record just past this page.
    pub fn end(&self) -> usize {
        self.start + self.limit
    }
}
