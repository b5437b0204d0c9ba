//! TLK decode pipeline.
//!
//! Decoding runs fully in memory in five steps: parse the header, rebuild
//! the Huffman tree from its node table, load the packed payload, pre-scan
//! every reachable string start, then bind each record to its text.

use std::collections::HashMap;

use tracing::debug;

use tlktool_core::{Result, TlkDocument, TlkEntry};

use crate::bits::BitSlice;
use crate::cursor::ByteCursor;
use crate::format::{StringRef, TlkHeader, HEADER_SIZE, RECORD_SIZE};
use crate::huffman::{HuffmanTree, StringDecoder};

/// TLK string-table decoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct TlkDecoder;

impl TlkDecoder {
    /// Create a new decoder.
    pub fn new() -> Self {
        Self
    }

    /// Decode a complete TLK table from `data`.
    pub fn decode(&self, data: &[u8]) -> Result<TlkDocument> {
        let mut records = ByteCursor::new(data);
        let header = TlkHeader::parse(&mut records)?;
        debug!(
            version = header.version,
            primary = header.primary_count,
            secondary = header.secondary_count,
            nodes = header.tree_node_count,
            payload_bytes = header.data_len,
            "parsed TLK header"
        );

        // The tree table sits past the record slots; the record table
        // itself is walked afterwards from the cursor left at the header
        // boundary.
        let mut tail = ByteCursor::new(data);
        tail.skip(HEADER_SIZE + header.entry_count() * RECORD_SIZE)?;
        let tree = HuffmanTree::from_node_array(&mut tail, header.tree_node_count as usize)?;
        let payload = tail.read_exact(header.data_len as usize)?;
        let bits = BitSlice::new(payload);

        let decoder = StringDecoder::new(&tree, bits);
        let strings = prescan(&decoder, bits.len())?;
        debug!(
            strings = strings.len(),
            payload_bits = bits.len(),
            "pre-scanned payload"
        );

        let mut entries = Vec::with_capacity(header.entry_count());
        for position in 0..header.entry_count() {
            let record = StringRef::parse(&mut records, position as u32)?;
            entries.push(bind(&decoder, &strings, record)?);
        }

        Ok(TlkDocument {
            version: header.version,
            min_version: header.min_version,
            primary_count: header.primary_count,
            secondary_count: header.secondary_count,
            entries,
        })
    }
}

/// Decode every string reachable by starting at bit 0 and chaining each
/// string's end offset, keyed by starting offset. Runs where no string
/// terminates before the payload ends are recorded as absent.
fn prescan(
    decoder: &StringDecoder<'_>,
    payload_bits: usize,
) -> Result<HashMap<usize, Option<String>>> {
    let mut strings = HashMap::new();
    let mut offset = 0;
    while offset < payload_bits {
        let (string, next) = decoder.decode_at(offset)?;
        strings.insert(offset, string);
        offset = next;
    }
    Ok(strings)
}

/// Resolve one record to an entry. Offsets the pre-scan never reached
/// (typically substring references into the middle of another run) fall
/// back to an ad hoc decode at the recorded offset.
fn bind(
    decoder: &StringDecoder<'_>,
    strings: &HashMap<usize, Option<String>>,
    record: StringRef,
) -> Result<TlkEntry> {
    let data = if record.string_id < 0 {
        // Control entry: the offset slot holds a literal number.
        Some(record.bit_offset.to_string())
    } else if record.bit_offset < 0 {
        None
    } else {
        let offset = record.bit_offset as usize;
        match strings.get(&offset) {
            Some(string) => string.clone(),
            None => decoder.decode_at(offset)?.0,
        }
    };

    Ok(TlkEntry {
        string_id: record.string_id,
        position: record.position,
        data,
    })
}

/// Decode a TLK table with the default decoder.
pub fn decode(data: &[u8]) -> Result<TlkDocument> {
    TlkDecoder::new().decode(data)
}
