//! TLK header parsing and validation.

use tlktool_core::{Error, Result};

use crate::cursor::ByteCursor;
use crate::{TLK_MAGIC, TLK_MAGIC_SWAPPED};

/// Parsed 28-byte TLK header.
///
/// Counts and lengths are validated non-negative at parse time and kept
/// unsigned; the magic field is validated and not retained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlkHeader {
    /// Format version.
    pub version: i32,
    /// Minimum reader version the writer supports.
    pub min_version: i32,
    /// Entries in the primary record section.
    pub primary_count: u32,
    /// Entries in the secondary record section.
    pub secondary_count: u32,
    /// Rows in the serialized Huffman node table.
    pub tree_node_count: u32,
    /// Packed payload length in bytes.
    pub data_len: u32,
}

impl TlkHeader {
    /// Parse and validate a header.
    ///
    /// The byte-swapped magic (a plausible table written for a
    /// big-endian platform) is diagnosed separately from data that is
    /// not a TLK table at all.
    pub fn parse(cursor: &mut ByteCursor<'_>) -> Result<Self> {
        let magic = cursor.read_i32()?;
        if magic == TLK_MAGIC_SWAPPED {
            return Err(Error::ByteSwapped);
        }
        if magic != TLK_MAGIC {
            return Err(Error::BadMagic {
                found: magic,
                expected: TLK_MAGIC,
            });
        }

        Ok(Self {
            version: cursor.read_i32()?,
            min_version: cursor.read_i32()?,
            primary_count: non_negative(cursor.read_i32()?, "primary entry count")?,
            secondary_count: non_negative(cursor.read_i32()?, "secondary entry count")?,
            tree_node_count: non_negative(cursor.read_i32()?, "tree node count")?,
            data_len: non_negative(cursor.read_i32()?, "payload length")?,
        })
    }

    /// Total number of record-table slots.
    pub fn entry_count(&self) -> usize {
        self.primary_count as usize + self.secondary_count as usize
    }

    /// Append the on-disk header form, magic included.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        for field in [
            TLK_MAGIC,
            self.version,
            self.min_version,
            self.primary_count as i32,
            self.secondary_count as i32,
            self.tree_node_count as i32,
            self.data_len as i32,
        ] {
            out.extend_from_slice(&field.to_le_bytes());
        }
    }
}

fn non_negative(value: i32, what: &str) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::corrupted(format!("negative {}: {}", what, value)))
}
