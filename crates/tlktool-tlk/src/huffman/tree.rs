//! Huffman tree model: reconstruction, construction, and serialization.

use std::collections::{BTreeMap, HashMap, VecDeque};

use tlktool_core::{Error, Result};

use crate::bits::BitVec;
use crate::cursor::ByteCursor;

use super::NODE_SIZE;

/// A child reference inside the flat node array.
///
/// The file encodes the leaf/internal distinction purely in the sign of
/// the stored integer; modeling it as a sum type keeps call sites from
/// ever confusing a node id with a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRef {
    /// Index of another internal node.
    Internal(u32),
    /// A leaf carrying a 16-bit character code.
    Leaf(u16),
}

impl NodeRef {
    /// Decode a raw on-disk reference: non-negative values index internal
    /// nodes, negative values encode a leaf character as
    /// `(-1 - raw) mod 65536`.
    pub fn from_raw(raw: i32) -> Self {
        if raw >= 0 {
            NodeRef::Internal(raw as u32)
        } else {
            NodeRef::Leaf(((-1i64 - i64::from(raw)) & 0xFFFF) as u16)
        }
    }

    /// Encode back to the raw on-disk form. Character codes are 16-bit by
    /// construction, so the leaf encoding never wraps on this side.
    pub fn to_raw(self) -> i32 {
        match self {
            NodeRef::Internal(id) => id as i32,
            NodeRef::Leaf(code) => -1 - i32::from(code),
        }
    }
}

/// One internal node: a left and a right child reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNode {
    pub left: NodeRef,
    pub right: NodeRef,
}

/// A node built during frequency-based construction, before file ids
/// exist. Children are indices into the construction arena.
enum Pending {
    Leaf(u16),
    Internal(usize, usize),
}

/// Huffman tree as a flat arena of internal nodes, id 0 the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    nodes: Vec<TreeNode>,
}

impl HuffmanTree {
    /// Reconstruct a tree from the file's node table: `count` records of
    /// two little-endian int32 values, node id = record position.
    pub fn from_node_array(cursor: &mut ByteCursor<'_>, count: usize) -> Result<Self> {
        if cursor.remaining() / NODE_SIZE < count {
            return Err(Error::unexpected_eof(cursor.position() + cursor.remaining()));
        }
        let mut nodes = Vec::with_capacity(count);
        for _ in 0..count {
            let left = NodeRef::from_raw(cursor.read_i32()?);
            let right = NodeRef::from_raw(cursor.read_i32()?);
            nodes.push(TreeNode { left, right });
        }
        Ok(Self { nodes })
    }

    /// Build a canonical tree from character frequencies.
    ///
    /// Leaf holders are seeded in ascending character order, then merged
    /// bottom-up: before each merge the holders are re-sorted by frequency
    /// (stable, ascending; ties keep their relative order, which pins the
    /// emitted bytes), the two lowest become the left and right child of a
    /// new parent, and the parent is appended at the end of the holder
    /// list. Alphabets of fewer than two symbols have no valid node-table
    /// encoding and are rejected.
    pub fn from_frequencies(frequencies: &BTreeMap<u16, u64>) -> Result<Self> {
        if frequencies.len() < 2 {
            return Err(Error::unsupported(format!(
                "alphabet of {} symbol(s) has no tree representation",
                frequencies.len()
            )));
        }

        let mut arena: Vec<Pending> = Vec::with_capacity(frequencies.len() * 2 - 1);
        let mut holders: Vec<(u64, usize)> = Vec::with_capacity(frequencies.len());
        for (&code, &frequency) in frequencies {
            arena.push(Pending::Leaf(code));
            holders.push((frequency, arena.len() - 1));
        }

        while holders.len() > 1 {
            holders.sort_by_key(|&(frequency, _)| frequency);
            let (left_frequency, left) = holders.remove(0);
            let (right_frequency, right) = holders.remove(0);
            arena.push(Pending::Internal(left, right));
            holders.push((left_frequency + right_frequency, arena.len() - 1));
        }

        Ok(Self::number_nodes(&arena, holders[0].1))
    }

    /// Assign file ids breadth-first from the root, enqueueing each
    /// node's right child before its left; every internal node dequeued
    /// takes the next sequential id. Leaves never get an id; their
    /// serialized form is always the negative character encoding.
    fn number_nodes(arena: &[Pending], root: usize) -> Self {
        let mut ids: HashMap<usize, u32> = HashMap::new();
        let mut order: Vec<usize> = Vec::new();
        let mut queue: VecDeque<usize> = VecDeque::new();
        queue.push_back(root);

        while let Some(index) = queue.pop_front() {
            if let Pending::Internal(left, right) = arena[index] {
                ids.insert(index, order.len() as u32);
                order.push(index);
                queue.push_back(right);
                queue.push_back(left);
            }
        }

        let reference = |child: usize| match arena[child] {
            Pending::Leaf(code) => NodeRef::Leaf(code),
            Pending::Internal(..) => NodeRef::Internal(ids[&child]),
        };
        let nodes = order
            .iter()
            .map(|&index| match arena[index] {
                Pending::Internal(left, right) => TreeNode {
                    left: reference(left),
                    right: reference(right),
                },
                Pending::Leaf(_) => unreachable!("only internal nodes are numbered"),
            })
            .collect();

        Self { nodes }
    }

    /// Number of internal nodes, which is also the serialized row count.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// The root node. A tree with no nodes is not walkable.
    pub fn root(&self) -> Result<TreeNode> {
        self.node(0)
    }

    /// Fetch a node by id, range-checked against the table.
    pub fn node(&self, id: u32) -> Result<TreeNode> {
        self.nodes.get(id as usize).copied().ok_or_else(|| {
            Error::corrupted(format!(
                "tree node {} out of range ({} nodes)",
                id,
                self.nodes.len()
            ))
        })
    }

    /// Append the on-disk node table: two little-endian int32 values per
    /// internal node, in id order.
    pub fn write_to(&self, out: &mut Vec<u8>) {
        for node in &self.nodes {
            out.extend_from_slice(&node.left.to_raw().to_le_bytes());
            out.extend_from_slice(&node.right.to_raw().to_le_bytes());
        }
    }

    /// Derive the per-character bit codes: depth-first from the root,
    /// appending `0` descending left and `1` descending right. NUL is a
    /// regular code-bearing leaf, since it terminates strings in-band.
    pub fn derive_codes(&self) -> Result<HashMap<u16, BitVec>> {
        let mut codes = HashMap::new();
        let mut prefix = Vec::new();
        self.collect_codes(0, &mut prefix, &mut codes)?;
        Ok(codes)
    }

    fn collect_codes(
        &self,
        id: u32,
        prefix: &mut Vec<bool>,
        codes: &mut HashMap<u16, BitVec>,
    ) -> Result<()> {
        // An acyclic walk passes each internal node at most once, so a
        // prefix longer than the node table proves a reference cycle.
        if prefix.len() > self.nodes.len() {
            return Err(Error::corrupted("cycle in Huffman tree"));
        }
        let node = self.node(id)?;
        for (bit, child) in [(false, node.left), (true, node.right)] {
            prefix.push(bit);
            match child {
                NodeRef::Leaf(code) => {
                    codes.insert(code, BitVec::from_bools(prefix));
                }
                NodeRef::Internal(next) => self.collect_codes(next, prefix, codes)?,
            }
            prefix.pop();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frequencies(pairs: &[(u16, u64)]) -> BTreeMap<u16, u64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn test_node_ref_decoding() {
        assert_eq!(NodeRef::from_raw(0), NodeRef::Internal(0));
        assert_eq!(NodeRef::from_raw(17), NodeRef::Internal(17));
        assert_eq!(NodeRef::from_raw(-1), NodeRef::Leaf(0));
        assert_eq!(NodeRef::from_raw(-66), NodeRef::Leaf(65));
        // Values past the 16-bit range wrap, matching the decode formula.
        assert_eq!(NodeRef::from_raw(-65538), NodeRef::Leaf(1));
    }

    #[test]
    fn test_node_ref_encoding() {
        assert_eq!(NodeRef::Internal(3).to_raw(), 3);
        assert_eq!(NodeRef::Leaf(0).to_raw(), -1);
        assert_eq!(NodeRef::Leaf(b'a' as u16).to_raw(), -98);
        assert_eq!(NodeRef::from_raw(NodeRef::Leaf(0x263A).to_raw()), NodeRef::Leaf(0x263A));
    }

    #[test]
    fn test_from_node_array() {
        let mut bytes = Vec::new();
        for raw in [-100i32, 1, -98, -99] {
            bytes.extend_from_slice(&raw.to_le_bytes());
        }

        let mut cursor = ByteCursor::new(&bytes);
        let tree = HuffmanTree::from_node_array(&mut cursor, 2).unwrap();
        assert_eq!(tree.node_count(), 2);
        assert_eq!(tree.root().unwrap().left, NodeRef::Leaf(b'c' as u16));
        assert_eq!(tree.root().unwrap().right, NodeRef::Internal(1));
        assert_eq!(tree.node(1).unwrap().left, NodeRef::Leaf(b'a' as u16));
        assert_eq!(tree.node(1).unwrap().right, NodeRef::Leaf(b'b' as u16));
    }

    #[test]
    fn test_from_node_array_truncated() {
        let bytes = [0u8; 12]; // one and a half nodes
        let mut cursor = ByteCursor::new(&bytes);
        assert!(matches!(
            HuffmanTree::from_node_array(&mut cursor, 2),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_node_out_of_range() {
        let tree = HuffmanTree {
            nodes: vec![TreeNode {
                left: NodeRef::Leaf(0),
                right: NodeRef::Leaf(1),
            }],
        };
        assert!(tree.node(0).is_ok());
        assert!(matches!(tree.node(1), Err(Error::CorruptedData { .. })));
    }

    #[test]
    fn test_build_three_symbol_tree() {
        // a:1, b:1, c:2 merges a+b first, then c with the new parent.
        // BFS with right enqueued before left numbers the root 0 and the
        // a/b parent 1, so the table is exactly:
        //   node 0: left = leaf 'c' (-100), right = node 1
        //   node 1: left = leaf 'a' (-98),  right = leaf 'b' (-99)
        let tree = HuffmanTree::from_frequencies(&frequencies(&[
            (b'a' as u16, 1),
            (b'b' as u16, 1),
            (b'c' as u16, 2),
        ]))
        .unwrap();

        assert_eq!(tree.node_count(), 2);

        let mut bytes = Vec::new();
        tree.write_to(&mut bytes);
        let mut expected = Vec::new();
        for raw in [-100i32, 1, -98, -99] {
            expected.extend_from_slice(&raw.to_le_bytes());
        }
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_build_is_reproducible() {
        let freq = frequencies(&[(b'a' as u16, 1), (b'b' as u16, 1), (b'c' as u16, 2), (0, 4)]);

        let mut first = Vec::new();
        HuffmanTree::from_frequencies(&freq).unwrap().write_to(&mut first);

        for _ in 0..10 {
            let mut again = Vec::new();
            HuffmanTree::from_frequencies(&freq).unwrap().write_to(&mut again);
            assert_eq!(first, again, "tree bytes must be identical run to run");
        }
    }

    #[test]
    fn test_derive_codes_three_symbols() {
        let tree = HuffmanTree::from_frequencies(&frequencies(&[
            (b'a' as u16, 1),
            (b'b' as u16, 1),
            (b'c' as u16, 2),
        ]))
        .unwrap();

        let codes = tree.derive_codes().unwrap();
        assert_eq!(codes.len(), 3);
        assert_eq!(codes[&(b'c' as u16)], BitVec::from_bools(&[false]));
        assert_eq!(codes[&(b'a' as u16)], BitVec::from_bools(&[true, false]));
        assert_eq!(codes[&(b'b' as u16)], BitVec::from_bools(&[true, true]));
    }

    #[test]
    fn test_nul_gets_a_code() {
        let tree =
            HuffmanTree::from_frequencies(&frequencies(&[(0, 3), (b'x' as u16, 5)])).unwrap();
        let codes = tree.derive_codes().unwrap();
        assert_eq!(codes[&0].len(), 1, "NUL is a regular code-bearing leaf");
    }

    #[test]
    fn test_ties_preserve_seed_order() {
        // Four equal frequencies: merges must pair (a,b) then (c,d), with
        // relative order preserved by the stable sort.
        let tree = HuffmanTree::from_frequencies(&frequencies(&[
            (b'a' as u16, 1),
            (b'b' as u16, 1),
            (b'c' as u16, 1),
            (b'd' as u16, 1),
        ]))
        .unwrap();

        let codes = tree.derive_codes().unwrap();
        for code in codes.values() {
            assert_eq!(code.len(), 2);
        }
        // (a,b) merges first, then (c,d); the final merge keeps the older
        // (a,b) parent on the left, so 'a' sits at code 00.
        let root = tree.root().unwrap();
        let left_child = match root.left {
            NodeRef::Internal(id) => tree.node(id).unwrap(),
            NodeRef::Leaf(_) => panic!("root children are internal here"),
        };
        assert_eq!(left_child.left, NodeRef::Leaf(b'a' as u16));
        assert_eq!(codes[&(b'a' as u16)], BitVec::from_bools(&[false, false]));
    }

    #[test]
    fn test_degenerate_alphabets_rejected() {
        assert!(matches!(
            HuffmanTree::from_frequencies(&BTreeMap::new()),
            Err(Error::Unsupported(_))
        ));
        assert!(matches!(
            HuffmanTree::from_frequencies(&frequencies(&[(b'a' as u16, 100)])),
            Err(Error::Unsupported(_))
        ));
    }

    #[test]
    fn test_cyclic_tree_detected() {
        // Node 0 points back at itself; code derivation must fail, not hang.
        let tree = HuffmanTree {
            nodes: vec![TreeNode {
                left: NodeRef::Internal(0),
                right: NodeRef::Leaf(0),
            }],
        };
        assert!(matches!(
            tree.derive_codes(),
            Err(Error::CorruptedData { .. })
        ));
    }
}
