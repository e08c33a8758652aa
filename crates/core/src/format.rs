//! Container serialization and parsing for [`EncodedResult`].
//!
//! A container packages the encoded bits with the tree shape so it can be
//! stored and decoded later without any other state.
//!
//! # Container Format
//!
//! ```text
//! +-------------------+
//! | Magic (4 bytes)   |  0x48 0x55 0x46 0x50 ("HUFP")
//! +-------------------+
//! | version (1)       |  currently 1
//! +-------------------+
//! | flags (1)         |  bit 0: tree present
//! +-------------------+
//! | bit_len (8)       |  u64 exact number of encoded bits
//! +-------------------+
//! | tree_len (2)      |  u16 length of the tree encoding
//! +-------------------+
//! | payload_len (4)   |  u32 packed payload length = ceil(bit_len / 8)
//! +-------------------+
//! | crc32 (4)         |  u32 checksum of everything after the magic
//! +-------------------+
//! | tree encoding     |  pre-order shape, see `HuffmanTree::write_shape`
//! | (variable)        |
//! +-------------------+
//! | payload           |  encoded bits, MSB-first, zero-padded
//! | (variable)        |
//! +-------------------+
//! ```
//!
//! All integers are little-endian. The CRC32 covers version, flags, the
//! three length fields, the tree encoding and the payload.

use log::{debug, warn};

use crate::bitio::{BitReader, BitStream, BitWriter};
use crate::error::{Error, FormatError, Result};
use crate::result::EncodedResult;
use crate::tree::HuffmanTree;

/// Magic number for containers: "HUFP"
const MAGIC: [u8; 4] = [0x48, 0x55, 0x46, 0x50];

/// Container layout version written by this build.
pub const VERSION: u8 = 1;

const FLAG_TREE: u8 = 0b0000_0001;

/// Size of the container header in bytes
pub const HEADER_SIZE: usize = 24;

/// Header fields of a container, as read off the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerHeader {
    pub version: u8,
    pub flags: u8,
    pub bit_len: u64,
    pub tree_len: u16,
    pub payload_len: u32,
    pub crc32: u32,
}

impl ContainerHeader {
    pub fn has_tree(&self) -> bool {
        self.flags & FLAG_TREE != 0
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&MAGIC);
        out.push(self.version);
        out.push(self.flags);
        out.extend_from_slice(&self.bit_len.to_le_bytes());
        out.extend_from_slice(&self.tree_len.to_le_bytes());
        out.extend_from_slice(&self.payload_len.to_le_bytes());
        out.extend_from_slice(&self.crc32.to_le_bytes());
    }

    fn read(bytes: &[u8; HEADER_SIZE]) -> Result<Self> {
        let (magic, rest) = bytes.split_at(4);
        if magic != MAGIC {
            let mut actual = [0u8; 4];
            actual.copy_from_slice(magic);
            return Err(FormatError::InvalidMagic {
                expected: MAGIC,
                actual,
            }
            .into());
        }

        let mut bit_len = [0u8; 8];
        bit_len.copy_from_slice(&rest[2..10]);
        let mut tree_len = [0u8; 2];
        tree_len.copy_from_slice(&rest[10..12]);
        let mut payload_len = [0u8; 4];
        payload_len.copy_from_slice(&rest[12..16]);
        let mut crc32 = [0u8; 4];
        crc32.copy_from_slice(&rest[16..20]);

        Ok(Self {
            version: rest[0],
            flags: rest[1],
            bit_len: u64::from_le_bytes(bit_len),
            tree_len: u16::from_le_bytes(tree_len),
            payload_len: u32::from_le_bytes(payload_len),
            crc32: u32::from_le_bytes(crc32),
        })
    }
}

/// Serialize `result` into a self-contained container.
///
/// # Errors
/// `FormatError::LengthMismatch` if the payload does not fit the 32-bit
/// length field (inputs larger than 4 GiB of encoded bits).
pub fn serialize_encoded(result: &EncodedResult) -> Result<Vec<u8>> {
    let tree_bytes = match result.tree() {
        Some(tree) => {
            let mut writer = BitWriter::new();
            tree.write_shape(&mut writer);
            writer.finish().into_parts().0
        }
        None => Vec::new(),
    };
    let payload = result.bits().as_bytes();

    let payload_len = u32::try_from(payload.len()).map_err(|_| FormatError::LengthMismatch {
        field: "payload",
        expected: u32::MAX as usize,
        actual: payload.len(),
    })?;
    // A 256-leaf shape is 511 marker bits + 256 symbols, well under u16::MAX bytes.
    let tree_len = tree_bytes.len() as u16;

    let mut header = ContainerHeader {
        version: VERSION,
        flags: if result.tree().is_some() { FLAG_TREE } else { 0 },
        bit_len: result.bit_len() as u64,
        tree_len,
        payload_len,
        crc32: 0,
    };
    header.crc32 = compute_crc(&header, &tree_bytes, payload);

    let mut container = Vec::with_capacity(HEADER_SIZE + tree_bytes.len() + payload.len());
    header.write(&mut container);
    container.extend_from_slice(&tree_bytes);
    container.extend_from_slice(payload);

    debug!(
        "serialized container: {} bits, tree {} bytes, payload {} bytes",
        header.bit_len, tree_len, payload_len
    );
    Ok(container)
}

/// Parse a container produced by [`serialize_encoded`].
///
/// # Errors
/// - `FormatError::TooShort` if the buffer is shorter than the header says
/// - `FormatError::InvalidMagic` / `FormatError::UnsupportedVersion`
/// - `FormatError::LengthMismatch` if lengths disagree with each other
/// - `Error::Crc` if the checksum does not match
/// - `FormatError::MalformedTree` if the tree encoding cannot be rebuilt
pub fn parse_encoded(bytes: &[u8]) -> Result<EncodedResult> {
    let result = parse_inner(bytes);
    if let Err(err) = &result {
        warn!("rejected container of {} bytes: {err}", bytes.len());
    }
    result
}

fn parse_inner(bytes: &[u8]) -> Result<EncodedResult> {
    let Some(header_bytes) = bytes.first_chunk::<HEADER_SIZE>() else {
        return Err(FormatError::TooShort {
            required: HEADER_SIZE,
            actual: bytes.len(),
        }
        .into());
    };
    let header = ContainerHeader::read(header_bytes)?;

    if header.version != VERSION {
        return Err(FormatError::UnsupportedVersion(header.version).into());
    }

    let tree_len = usize::from(header.tree_len);
    let payload_len = header.payload_len as usize;
    let expected_size = HEADER_SIZE + tree_len + payload_len;
    if bytes.len() < expected_size {
        return Err(FormatError::TooShort {
            required: expected_size,
            actual: bytes.len(),
        }
        .into());
    }
    if bytes.len() > expected_size {
        return Err(FormatError::LengthMismatch {
            field: "container",
            expected: expected_size,
            actual: bytes.len(),
        }
        .into());
    }

    let expected_payload = header.bit_len.div_ceil(8);
    if expected_payload != u64::from(header.payload_len) {
        return Err(FormatError::LengthMismatch {
            field: "payload",
            expected: expected_payload as usize,
            actual: payload_len,
        }
        .into());
    }
    // Bounded by the payload that is already in memory.
    let bit_len = header.bit_len as usize;

    let tree_bytes = &bytes[HEADER_SIZE..HEADER_SIZE + tree_len];
    let payload = &bytes[HEADER_SIZE + tree_len..];

    let computed = compute_crc(&header, tree_bytes, payload);
    if computed != header.crc32 {
        return Err(Error::Crc {
            expected: header.crc32,
            actual: computed,
        });
    }

    let tree = if header.has_tree() {
        Some(read_tree(tree_bytes)?)
    } else if tree_len != 0 {
        return Err(FormatError::LengthMismatch {
            field: "tree",
            expected: 0,
            actual: tree_len,
        }
        .into());
    } else {
        None
    };

    let bits = BitStream::from_parts(payload.to_vec(), bit_len)?;
    debug!(
        "parsed container: {} bits, tree {}",
        bit_len,
        if tree.is_some() { "present" } else { "absent" }
    );
    Ok(EncodedResult::from_parts(bits, tree))
}

/// Rebuild a tree, requiring the encoding to fill its bytes up to padding.
fn read_tree(tree_bytes: &[u8]) -> Result<HuffmanTree> {
    let mut reader = BitReader::new(tree_bytes);
    let tree = HuffmanTree::read_shape(&mut reader)?;
    if reader.bits_remaining() >= 8 {
        return Err(FormatError::MalformedTree("trailing bytes after tree").into());
    }
    Ok(tree)
}

/// Compute CRC32 over every protected field.
fn compute_crc(header: &ContainerHeader, tree_bytes: &[u8], payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();

    hasher.update(&[header.version, header.flags]);
    hasher.update(&header.bit_len.to_le_bytes());
    hasher.update(&header.tree_len.to_le_bytes());
    hasher.update(&header.payload_len.to_le_bytes());

    hasher.update(tree_bytes);
    hasher.update(payload);

    hasher.finalize()
}

/// Compress `data` straight into a container.
pub fn compress_to_container(data: &[u8]) -> Result<Vec<u8>> {
    serialize_encoded(&crate::compress(data))
}

/// Parse a container and decode it.
pub fn decompress_container(bytes: &[u8]) -> Result<Vec<u8>> {
    crate::decompress(&parse_encoded(bytes)?)
}
