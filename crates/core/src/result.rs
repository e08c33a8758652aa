//! The compression artifact.

use crate::bitio::BitStream;
use crate::tree::HuffmanTree;

/// Encoded bit stream plus the tree needed to decode it.
///
/// Immutable once built. The tree is `None` exactly when the original input
/// was empty, in which case the stream is empty too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedResult {
    bits: BitStream,
    tree: Option<HuffmanTree>,
}

impl EncodedResult {
    /// Pair a stream with the tree it was encoded against.
    ///
    /// No consistency check happens here; [`crate::decompress`] reports a
    /// mismatched pair as a decode or corrupt-tree error.
    pub fn from_parts(bits: BitStream, tree: Option<HuffmanTree>) -> Self {
        Self { bits, tree }
    }

    pub fn bits(&self) -> &BitStream {
        &self.bits
    }

    /// Exact number of encoded bits.
    pub fn bit_len(&self) -> usize {
        self.bits.bit_len()
    }

    pub fn tree(&self) -> Option<&HuffmanTree> {
        self.tree.as_ref()
    }

    /// True for the result of compressing an empty input.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty() && self.tree.is_none()
    }

    pub fn into_parts(self) -> (BitStream, Option<HuffmanTree>) {
        (self.bits, self.tree)
    }
}
