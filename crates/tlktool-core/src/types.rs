//! Document model shared between the codec and external renderers.

use serde::{Deserialize, Serialize};

/// One string-table entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlkEntry {
    /// Signed string id. Negative ids mark control entries whose payload
    /// is a literal number rather than decoded text.
    pub string_id: i32,
    /// 0-based sequential index in load order; not stored in the file.
    pub position: u32,
    /// Decoded text, the literal rendered as decimal for negative ids, or
    /// `None` for entries that carry no payload.
    pub data: Option<String>,
}

impl TlkEntry {
    /// Create a text entry.
    pub fn text(string_id: i32, position: u32, data: impl Into<String>) -> Self {
        Self {
            string_id,
            position,
            data: Some(data.into()),
        }
    }

    /// Create an entry with no payload.
    pub fn empty(string_id: i32, position: u32) -> Self {
        Self {
            string_id,
            position,
            data: None,
        }
    }
}

/// A fully decoded TLK string table.
///
/// Entries appear in file order: the primary section first, then the
/// secondary section. The counts delimit the two sections; conventionally
/// they hold the male and female text variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlkDocument {
    /// Format version recorded in the header.
    pub version: i32,
    /// Minimum reader version recorded in the header.
    pub min_version: i32,
    /// Number of entries in the primary (first-occurrence) section.
    pub primary_count: u32,
    /// Number of entries in the secondary (second-occurrence) section.
    pub secondary_count: u32,
    /// All entries in file order.
    pub entries: Vec<TlkEntry>,
}

impl TlkDocument {
    /// The primary section of the entry list.
    pub fn primary(&self) -> &[TlkEntry] {
        &self.entries[..self.primary_count as usize]
    }

    /// The secondary section of the entry list.
    pub fn secondary(&self) -> &[TlkEntry] {
        &self.entries[self.primary_count as usize..]
    }
}
