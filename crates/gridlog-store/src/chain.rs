use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reference to a payload file on disk.
///
/// `file_path` is relative to the store root. Payload files are never
/// deleted by the store; every path reachable from the head must remain
/// readable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainFile {
    /// Path of the payload file, relative to the store root.
    pub file_path: String,
    /// Wall-clock time the entry was created.
    pub created_at: DateTime<Utc>,
}

impl ChainFile {
    pub fn new(file_path: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            file_path: file_path.into(),
            created_at,
        }
    }
}

/// One link of the chain: a payload file reference plus the previous link.
///
/// Links form a singly linked, newest-first list. A link is immutable once
/// created; `previous` is never reassigned after linking.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainLink {
    /// The payload file this link records.
    pub data: ChainFile,
    /// The link that was the head when this one was appended.
    pub previous: Option<Box<ChainLink>>,
}

impl ChainLink {
    pub fn new(data: ChainFile, previous: Option<Box<ChainLink>>) -> Self {
        Self { data, previous }
    }

    /// Number of links reachable from this one, including itself.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }

    /// Iterate from this link backward to the oldest.
    pub fn iter(&self) -> ChainIter<'_> {
        ChainIter { next: Some(self) }
    }
}

/// Newest-first iterator over chain links.
pub struct ChainIter<'a> {
    next: Option<&'a ChainLink>,
}

impl<'a> ChainIter<'a> {
    pub(crate) fn new(next: Option<&'a ChainLink>) -> Self {
        Self { next }
    }
}

impl<'a> Iterator for ChainIter<'a> {
    type Item = &'a ChainLink;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.previous.as_deref();
        Some(current)
    }
}
