//! Binary layout of a TLK string table.
//!
//! ```text
//! Header:        magic, version, min_version, primary_count,
//!                secondary_count, tree_node_count, data_len    (28 bytes)
//! Record table:  (primary_count + secondary_count) ×
//!                { string_id: i32, bit_offset: i32 }           (8 bytes each)
//! Tree table:    tree_node_count × { left: i32, right: i32 }   (8 bytes each)
//! Payload:       data_len bytes of packed Huffman bit stream
//! ```
//!
//! All integers are little-endian signed 32-bit values.

mod header;

pub use header::TlkHeader;

use tlktool_core::Result;

use crate::cursor::ByteCursor;

/// Serialized header size in bytes (seven int32 fields).
pub const HEADER_SIZE: usize = 28;

/// Serialized size of one record-table slot.
pub const RECORD_SIZE: usize = 8;

/// One record-table slot: a string id and the bit offset of its payload.
///
/// `position` is assigned sequentially at load time; the file does not
/// store it. A negative `bit_offset` means the record carries no string,
/// and for negative ids the field holds a literal number instead of an
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringRef {
    pub string_id: i32,
    pub bit_offset: i32,
    pub position: u32,
}

impl StringRef {
    /// Parse the next record slot from the record table.
    pub fn parse(cursor: &mut ByteCursor<'_>, position: u32) -> Result<Self> {
        Ok(Self {
            string_id: cursor.read_i32()?,
            bit_offset: cursor.read_i32()?,
            position,
        })
    }

    /// Append the on-disk slot form.
    pub fn write_to(string_id: i32, bit_offset: i32, out: &mut Vec<u8>) {
        out.extend_from_slice(&string_id.to_le_bytes());
        out.extend_from_slice(&bit_offset.to_le_bytes());
    }
}
