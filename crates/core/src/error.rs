//! Error types for huffpuff.
//!
//! Every fallible operation returns one of these instead of panicking or
//! producing wrong bytes. Nothing here is transient: the codec is pure, so a
//! failed call fails the same way every time it is repeated.

use thiserror::Error;

/// Top-level error type for all operations in the crate.
///
/// Each variant corresponds to a failure domain:
/// - Bit I/O: reading/writing bits from/to byte buffers
/// - Huffman: encoding or decoding against a tree / code table
/// - Format: parsing a persisted container
/// - CRC: container corruption detected
/// - I/O: file system operations (used by the binary)
#[derive(Debug, Error)]
pub enum Error {
    /// Bit I/O operation failed (e.g., reading past the declared bit length)
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Encoder or decoder failure
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Container layout error (e.g., bad magic, length mismatch)
    #[error("format error: {0}")]
    Format(#[from] FormatError),

    /// CRC validation failed, indicating data corruption
    #[error("CRC mismatch: expected {expected:#010x}, got {actual:#010x}")]
    Crc { expected: u32, actual: u32 },

    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Bit-level I/O errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the readable bits
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// More than 64 bits requested in one call
    #[error("invalid bit count: {0}")]
    InvalidBitCount(usize),

    /// Packed buffer does not match the declared bit length
    #[error("{bit_len} bits need {expected} packed bytes, got {actual}")]
    LengthMismatch {
        bit_len: usize,
        expected: usize,
        actual: usize,
    },
}

/// Encode/decode failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// The stream ran out in the middle of a code.
    #[error("bit stream ends mid-code: code starting at bit {code_start} is incomplete after {bit_len} bits")]
    TruncatedStream { code_start: usize, bit_len: usize },

    /// A bit led to a child that does not exist in the tree.
    #[error("corrupt tree: bit {position} leads from node {node} to an absent child")]
    CorruptTree { position: usize, node: usize },

    /// The encoder was handed a byte with no code.
    #[error("symbol {symbol:#04x} has no entry in the code table")]
    UnknownSymbol { symbol: u8 },

    /// A non-empty bit stream came without a tree.
    #[error("{bit_len} encoded bits but no tree to decode them")]
    MissingTree { bit_len: usize },
}

/// Container parsing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    /// Invalid magic number in header
    #[error("invalid magic number: expected {expected:?}, got {actual:?}")]
    InvalidMagic { expected: [u8; 4], actual: [u8; 4] },

    /// Header carries a version this build does not read
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u8),

    /// Buffer too short to hold what the header promises
    #[error("container too short: need at least {required} bytes, got {actual}")]
    TooShort { required: usize, actual: usize },

    /// A length field disagrees with another field or with the data
    #[error("{field} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// The serialized tree cannot be rebuilt
    #[error("malformed tree encoding: {0}")]
    MalformedTree(&'static str),
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
