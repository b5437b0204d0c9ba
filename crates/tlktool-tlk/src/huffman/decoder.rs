//! Bit-stream string decoder.

use tlktool_core::Result;

use crate::bits::BitSlice;

use super::tree::{HuffmanTree, NodeRef};

/// Decodes NUL-terminated strings from the packed payload at arbitrary
/// starting bit offsets.
///
/// Stateless between calls: every walk restarts at the tree root, so the
/// same routine serves both the sequential pre-scan over the whole payload
/// and ad hoc lookups at record offsets the pre-scan never visited.
#[derive(Debug, Clone, Copy)]
pub struct StringDecoder<'a> {
    tree: &'a HuffmanTree,
    bits: BitSlice<'a>,
}

impl<'a> StringDecoder<'a> {
    /// Create a decoder over `bits` using `tree`.
    pub fn new(tree: &'a HuffmanTree, bits: BitSlice<'a>) -> Self {
        Self { tree, bits }
    }

    /// Decode one string starting at `start_bit`.
    ///
    /// Each step reads one bit LSB-first, branches right on a set bit and
    /// left otherwise, and advances exactly one position. A non-NUL leaf
    /// appends its character and restarts at the root; the NUL leaf ends
    /// the string, with the returned offset one position past the bit that
    /// selected it (a net two-position advance for that final step). If
    /// the payload runs out first the string is `None` (a distinguished
    /// absence, not an error) and the offset lands one past the payload
    /// length.
    pub fn decode_at(&self, start_bit: usize) -> Result<(Option<String>, usize)> {
        let mut node = self.tree.root()?;
        let mut units: Vec<u16> = Vec::new();
        let mut offset = start_bit;

        while offset < self.bits.len() {
            let branch = if self.bits.get_rev(offset) {
                node.right
            } else {
                node.left
            };
            offset += 1;

            match branch {
                NodeRef::Internal(id) => node = self.tree.node(id)?,
                NodeRef::Leaf(0) => {
                    return Ok((Some(String::from_utf16_lossy(&units)), offset + 1));
                }
                NodeRef::Leaf(code) => {
                    units.push(code);
                    node = self.tree.root()?;
                }
            }
        }

        Ok((None, offset + 1))
    }
}
