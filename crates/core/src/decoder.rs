//! Tree-driven decoding of a packed bit stream.

use log::debug;

use crate::bitio::BitStream;
use crate::error::{HuffmanError, Result};
use crate::tree::{HuffmanTree, Node};

/// Recover the symbols encoded in `bits` by walking `tree`.
///
/// Starting at the root, each bit moves to the left (0) or right (1) child;
/// reaching a leaf emits its symbol and returns to the root. Exactly
/// `bits.bit_len()` bits are consumed.
///
/// A missing tree is only valid for an empty stream, which decodes to an
/// empty output without any traversal.
///
/// # Errors
/// - `HuffmanError::TruncatedStream` if the stream ends part-way down a code
/// - `HuffmanError::CorruptTree` if a bit leads to a child that does not
///   exist, including a tree whose root is a leaf
/// - `HuffmanError::MissingTree` for a non-empty stream without a tree
pub fn decode(bits: &BitStream, tree: Option<&HuffmanTree>) -> Result<Vec<u8>> {
    let Some(tree) = tree else {
        if bits.is_empty() {
            return Ok(Vec::new());
        }
        return Err(HuffmanError::MissingTree {
            bit_len: bits.bit_len(),
        }
        .into());
    };

    let root = tree.root();
    let mut output = Vec::with_capacity(bits.bit_len());
    let mut cursor = root;
    let mut code_start = 0;

    for (position, bit) in bits.iter().enumerate() {
        let next = tree
            .node(cursor)
            .and_then(|node| node.child(bit))
            .ok_or(HuffmanError::CorruptTree {
                position,
                node: cursor,
            })?;

        match tree.node(next) {
            Some(&Node::Leaf { symbol, .. }) => {
                output.push(symbol);
                cursor = root;
                code_start = position + 1;
            }
            Some(Node::Internal { .. }) => cursor = next,
            None => {
                return Err(HuffmanError::CorruptTree {
                    position,
                    node: cursor,
                }
                .into())
            }
        }
    }

    if cursor != root {
        return Err(HuffmanError::TruncatedStream {
            code_start,
            bit_len: bits.bit_len(),
        }
        .into());
    }

    output.shrink_to_fit();
    debug!("decoded {} bits into {} symbols", bits.bit_len(), output.len());
    Ok(output)
}
