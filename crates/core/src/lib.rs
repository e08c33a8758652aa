//! huffpuff-core: deterministic Huffman coding of byte streams
//!
//! Compression builds a prefix code tuned to one input's byte frequencies and
//! returns the encoded bits together with the tree that produced them;
//! decompression walks that tree bit by bit to recover the input.
//!
//! ```
//! let result = huffpuff_core::compress(b"aaabbcdeffff");
//! assert_eq!(result.bit_len(), 29);
//! assert_eq!(huffpuff_core::decompress(&result).unwrap(), b"aaabbcdeffff");
//! ```
//!
//! # Architecture
//!
//! Leaves first:
//! - `frequency`: byte occurrence counts
//! - `tree`: greedy merge into a prefix tree with a total tie-break order
//! - `code_table`: root-to-leaf paths as codes
//! - `bitio`: packed bit stream, writer and reader
//! - `encoder` / `decoder`: bytes to bits and back
//! - `codec`: the `compress` / `decompress` pipeline
//! - `format`: CRC-protected container for persisting results
//! - `stats`: compression statistics
//!
//! # Design Principles
//!
//! - **No panics**: malformed input is reported as a typed error
//! - **Deterministic**: equal frequency tables always give equal trees
//! - **Stateless**: every call builds its own tree and code table

pub mod bitio;
pub mod code_table;
pub mod codec;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod format;
pub mod frequency;
pub mod result;
pub mod stats;
pub mod tree;

// Re-export commonly used types
pub use code_table::{Code, CodeTable};
pub use codec::{compress, decompress};
pub use error::{Error, Result};
pub use frequency::{FrequencyTable, Symbol};
pub use result::EncodedResult;
pub use tree::{HuffmanTree, Node};
