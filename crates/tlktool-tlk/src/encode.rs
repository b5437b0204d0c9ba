//! TLK encode pipeline.
//!
//! Encoding mirrors the decode path in reverse: count character
//! frequencies over every text entry, build the canonical Huffman tree,
//! derive per-character codes, classify records into the primary and
//! secondary sections while packing the payload, then assemble header,
//! record table, tree table, and payload.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::debug;

use tlktool_core::{Error, Result, TlkEntry};

use crate::bits::BitWriter;
use crate::format::{StringRef, TlkHeader, HEADER_SIZE, RECORD_SIZE};
use crate::huffman::{HuffmanTree, NODE_SIZE};

/// Header version the encoder writes by default.
pub const DEFAULT_VERSION: i32 = 3;

/// Minimum reader version the encoder writes by default.
pub const DEFAULT_MIN_VERSION: i32 = 2;

/// TLK string-table encoder.
///
/// A `string_id` seen once lands in the primary section, seen a second
/// time in the secondary section; a third occurrence has no slot in the
/// format and is rejected. Record slots are written in first-occurrence
/// order within each section, so output bytes are reproducible.
#[derive(Debug, Clone, Copy)]
pub struct TlkEncoder {
    version: i32,
    min_version: i32,
}

impl TlkEncoder {
    /// Create an encoder with the default header versions.
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION,
            min_version: DEFAULT_MIN_VERSION,
        }
    }

    /// Create an encoder with explicit header version fields.
    pub fn with_versions(version: i32, min_version: i32) -> Self {
        Self {
            version,
            min_version,
        }
    }

    /// Encode `entries` into a complete TLK table.
    pub fn encode(&self, entries: &[TlkEntry]) -> Result<Vec<u8>> {
        let mut ordered: Vec<&TlkEntry> = entries.iter().collect();
        ordered.sort_by_key(|entry| entry.position);

        let frequencies = count_frequencies(&ordered)?;
        debug!(alphabet = frequencies.len(), "counted character frequencies");
        let tree = HuffmanTree::from_frequencies(&frequencies)?;
        let codes = tree.derive_codes()?;

        // Classify records and pack the payload in one pass over the
        // entries in position order.
        let mut primary: IndexMap<i32, i32> = IndexMap::new();
        let mut secondary: IndexMap<i32, i32> = IndexMap::new();
        let mut payload = BitWriter::new();

        for entry in &ordered {
            let value = if entry.string_id < 0 {
                literal_value(entry)?
            } else if entry.data.is_none() {
                -1
            } else {
                bit_offset(payload.bit_len())?
            };

            if !primary.contains_key(&entry.string_id) {
                primary.insert(entry.string_id, value);
            } else if !secondary.contains_key(&entry.string_id) {
                secondary.insert(entry.string_id, value);
            } else {
                return Err(Error::unsupported(format!(
                    "string id {} occurs more than twice",
                    entry.string_id
                )));
            }

            if entry.string_id >= 0 {
                if let Some(data) = entry.data.as_deref() {
                    for unit in text_units(entry.string_id, data)? {
                        let code = codes.get(&unit).ok_or_else(|| {
                            Error::corrupted(format!("no code for character {}", unit))
                        })?;
                        payload.extend(code);
                    }
                }
            }
        }

        debug!(
            primary = primary.len(),
            secondary = secondary.len(),
            payload_bits = payload.bit_len(),
            nodes = tree.node_count(),
            "packed payload"
        );

        let header = TlkHeader {
            version: self.version,
            min_version: self.min_version,
            primary_count: primary.len() as u32,
            secondary_count: secondary.len() as u32,
            tree_node_count: tree.node_count() as u32,
            data_len: payload.byte_len() as u32,
        };

        let mut out = Vec::with_capacity(
            HEADER_SIZE
                + header.entry_count() * RECORD_SIZE
                + tree.node_count() * NODE_SIZE
                + payload.byte_len(),
        );
        header.write_to(&mut out);
        for (&string_id, &value) in primary.iter().chain(secondary.iter()) {
            StringRef::write_to(string_id, value, &mut out);
        }
        tree.write_to(&mut out);
        out.extend_from_slice(&payload.finish());
        Ok(out)
    }
}

impl Default for TlkEncoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Count code-unit frequencies over every text entry, terminators
/// included. Control entries and payload-less entries contribute nothing.
fn count_frequencies(ordered: &[&TlkEntry]) -> Result<BTreeMap<u16, u64>> {
    let mut frequencies = BTreeMap::new();
    for entry in ordered {
        if entry.string_id < 0 {
            continue;
        }
        if let Some(data) = entry.data.as_deref() {
            for unit in text_units(entry.string_id, data)? {
                *frequencies.entry(unit).or_insert(0u64) += 1;
            }
        }
    }
    Ok(frequencies)
}

/// The code units of a text entry, NUL terminator appended. NUL is the
/// in-band terminator, so interior NULs cannot be represented.
fn text_units(string_id: i32, data: &str) -> Result<impl Iterator<Item = u16> + '_> {
    if data.contains('\0') {
        return Err(Error::invalid_input(format!(
            "text entry {} contains an interior NUL",
            string_id
        )));
    }
    Ok(data.encode_utf16().chain(std::iter::once(0)))
}

/// Parse the literal number a control entry stores in its offset slot.
fn literal_value(entry: &TlkEntry) -> Result<i32> {
    let data = entry.data.as_deref().ok_or_else(|| {
        Error::invalid_input(format!(
            "control entry {} has no literal value",
            entry.string_id
        ))
    })?;
    data.parse().map_err(|_| {
        Error::invalid_input(format!(
            "control entry {}: {:?} is not a number",
            entry.string_id, data
        ))
    })
}

fn bit_offset(bits: usize) -> Result<i32> {
    i32::try_from(bits).map_err(|_| Error::unsupported("payload exceeds 2^31 bits".to_string()))
}

/// Encode a TLK table with the default encoder.
pub fn encode(entries: &[TlkEntry]) -> Result<Vec<u8>> {
    TlkEncoder::new().encode(entries)
}
