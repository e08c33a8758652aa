//! The whole pipeline: count → build tree → derive codes → encode, and back.

use log::debug;

use crate::bitio::BitStream;
use crate::decoder;
use crate::encoder;
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::result::EncodedResult;
use crate::tree::HuffmanTree;

/// Huffman-encode `data`.
///
/// Never fails: an empty input gives an empty stream and no tree, and every
/// other input gets a tree built from its own frequencies.
pub fn compress(data: &[u8]) -> EncodedResult {
    let freqs = FrequencyTable::from_bytes(data);
    let Some(tree) = HuffmanTree::build(&freqs) else {
        debug!("compress: empty input");
        return EncodedResult::from_parts(BitStream::new(), None);
    };

    let table = tree.code_table();
    let bits = match encoder::encode(data, &table) {
        Ok(bits) => bits,
        Err(err) => unreachable!("code table built from the input lacks one of its symbols: {err}"),
    };

    debug!(
        "compress: {} bytes, {} distinct symbols -> {} bits",
        data.len(),
        freqs.distinct(),
        bits.bit_len()
    );
    EncodedResult::from_parts(bits, Some(tree))
}

/// Recover the original bytes from `result`.
///
/// `decompress(&compress(x))` returns `x` for every `x`.
///
/// # Errors
/// The decode and corrupt-tree errors of [`decoder::decode`].
pub fn decompress(result: &EncodedResult) -> Result<Vec<u8>> {
    decoder::decode(result.bits(), result.tree())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, HuffmanError};

    #[test]
    fn test_round_trip_reference() {
        let data = b"aaabbcdeffff";
        let result = compress(data);
        assert_eq!(result.bit_len(), 29);
        assert_eq!(decompress(&result).unwrap(), data);
    }

    #[test]
    fn test_empty_input() {
        let result = compress(b"");
        assert!(result.is_empty());
        assert_eq!(result.bit_len(), 0);
        assert!(result.tree().is_none());
        assert!(decompress(&result).unwrap().is_empty());
    }

    #[test]
    fn test_single_repeated_symbol() {
        let result = compress(b"zzzz");
        let tree = result.tree().unwrap();
        assert_eq!(tree.internal_count(), 1);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(result.bit_len(), 4);
        assert_eq!(decompress(&result).unwrap(), b"zzzz");
    }

    #[test]
    fn test_single_byte() {
        let result = compress(&[0]);
        assert_eq!(result.bit_len(), 1);
        assert_eq!(decompress(&result).unwrap(), vec![0]);
    }

    #[test]
    fn test_foreign_tree_and_missing_tree() {
        let (bits, _) = compress(b"aaabbcdeffff").into_parts();
        let (_, other_tree) = compress(b"zzzz").into_parts();
        // Every bit is a whole code in the "zzzz" tree: wrong bytes, no error.
        let swapped = EncodedResult::from_parts(bits.clone(), other_tree);
        assert_eq!(decompress(&swapped).unwrap().len(), 29);

        // No tree at all is always an error.
        let orphan = EncodedResult::from_parts(bits, None);
        assert!(matches!(
            decompress(&orphan),
            Err(Error::Huffman(HuffmanError::MissingTree { bit_len: 29 }))
        ));
    }

    #[test]
    fn test_compress_is_deterministic() {
        let data = b"determinism matters for the decoder";
        assert_eq!(compress(data), compress(data));
    }
}
