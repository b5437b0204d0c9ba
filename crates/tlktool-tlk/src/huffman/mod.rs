//! Huffman coding for the TLK string table.
//!
//! ## Overview
//!
//! The file stores its decoding tree as a flat array of `(left, right)`
//! int32 pairs; node id 0 is the root. A non-negative reference indexes
//! another internal node, a negative one encodes a leaf character as
//! `-1 - code`. Strings are NUL-terminated runs of 16-bit code units,
//! recovered by walking the tree one payload bit at a time.
//!
//! Encoding rebuilds the tree from character frequencies with the exact
//! merge order, node numbering, and serialization layout the game's
//! reader expects; none of it is negotiable if the output is to load.

mod decoder;
mod tree;

pub use decoder::StringDecoder;
pub use tree::{HuffmanTree, NodeRef, TreeNode};

/// Serialized size of one tree node (two int32 fields).
pub const NODE_SIZE: usize = 8;
