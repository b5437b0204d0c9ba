//! # tlktool TLK codec
//!
//! Native Rust codec for the Huffman-compressed TLK string-table format
//! used by a commercial game for localized text.
//!
//! A TLK table stores its strings as one continuous Huffman-coded bit
//! stream, with per-entry bit offsets and the decoding tree serialized as
//! a flat array of node pairs. Decoding walks the tree bit-by-bit to
//! recover NUL-terminated strings; encoding rebuilds the canonical tree
//! from character frequencies and packs the codes back with the exact
//! bit and node-numbering conventions the game expects.
//!
//! ## Quick Start
//!
//! ```
//! use tlktool_tlk::{decode, encode, TlkEntry};
//!
//! let entries = vec![
//!     TlkEntry::text(1, 0, "Commander"),
//!     TlkEntry::text(2, 1, "Normandy"),
//! ];
//!
//! let bytes = encode(&entries).unwrap();
//! let document = decode(&bytes).unwrap();
//! assert_eq!(document.entries[0].data.as_deref(), Some("Commander"));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                     tlktool-tlk                      │
//! ├──────────────────────────────────────────────────────┤
//! │  decode.rs             │  encode.rs                  │
//! │  (header → tree →      │  (frequencies → tree →      │
//! │   pre-scan → binding)  │   codes → packing)          │
//! ├──────────────────────────────────────────────────────┤
//! │  huffman/              │  format/                    │
//! │  ├── tree.rs           │  ├── header.rs              │
//! │  └── decoder.rs        │  └── mod.rs (layout)        │
//! ├──────────────────────────────────────────────────────┤
//! │  bits.rs (bit orders)  │  cursor.rs (byte reads)     │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod bits;
pub mod cursor;
pub mod decode;
pub mod encode;
pub mod format;
pub mod huffman;

pub use decode::{decode, TlkDecoder};
pub use encode::{encode, TlkEncoder};
pub use tlktool_core::{Error, Result, TlkDocument, TlkEntry};

/// TLK magic number: the bytes `"Tlk\0"` read as a little-endian int32.
pub const TLK_MAGIC: i32 = 7040084;

/// The magic bytes read with reversed endianness. Seeing this value means
/// the table itself is plausible but was written for a big-endian
/// platform, which gets its own diagnosis.
pub const TLK_MAGIC_SWAPPED: i32 = 1416391424;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_constants() {
        assert_eq!(TLK_MAGIC, i32::from_le_bytes(*b"Tlk\0"));
        assert_eq!(TLK_MAGIC_SWAPPED, i32::from_be_bytes(*b"Tlk\0"));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let result = decode(&[0u8; 28]);
        assert!(matches!(result, Err(Error::BadMagic { found: 0, .. })));
    }

    #[test]
    fn test_decode_rejects_short_input() {
        let result = decode(&[0x54, 0x6C]);
        assert!(matches!(result, Err(Error::UnexpectedEof { .. })));
    }
}
