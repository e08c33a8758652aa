//! Bit-level I/O: the packed [`BitStream`] plus a writer and a reader for it.
//!
//! Bits are packed MSB-first (the first bit lands in bit 7 of byte 0), the
//! usual order for prefix codes.
//!
//! # Padding Rules
//! - `BitWriter::finish` zero-pads the final partial byte
//! - `BitStream` remembers the exact bit count, so padding is never decoded
//! - `BitReader` stops at its bit limit, not at the end of the byte buffer
//!
//! # Example
//! ```
//! use huffpuff_core::bitio::{BitReader, BitWriter};
//!
//! let mut writer = BitWriter::new();
//! writer.write_bits(0b101, 3).unwrap();
//! writer.write_bits(0b11, 2).unwrap();
//! let stream = writer.finish();
//! assert_eq!(stream.bit_len(), 5);
//! assert_eq!(stream.as_bytes(), &[0b1011_1000]);
//!
//! let mut reader = BitReader::for_stream(&stream);
//! assert_eq!(reader.read_bits(3).unwrap(), 0b101);
//! assert_eq!(reader.read_bits(2).unwrap(), 0b11);
//! assert!(reader.read_bit().is_err());
//! ```

use std::fmt;

use crate::code_table::Code;
use crate::error::{BitIoError, Result};

/// Number of bytes needed to hold `bit_len` packed bits.
pub fn packed_len(bit_len: usize) -> usize {
    bit_len.div_ceil(8)
}

/// An ordered sequence of bits with a known length, packed into bytes.
///
/// # Invariants
/// - `bytes.len() == packed_len(bit_len)`
/// - padding bits after `bit_len` are zero
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BitStream {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitStream {
    /// An empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap packed bytes holding exactly `bit_len` bits.
    ///
    /// Padding bits in the final byte are cleared.
    ///
    /// # Errors
    /// `BitIoError::LengthMismatch` if `bytes` is not exactly
    /// `packed_len(bit_len)` long.
    pub fn from_parts(mut bytes: Vec<u8>, bit_len: usize) -> Result<Self> {
        let expected = packed_len(bit_len);
        if bytes.len() != expected {
            return Err(BitIoError::LengthMismatch {
                bit_len,
                expected,
                actual: bytes.len(),
            }
            .into());
        }

        let used = bit_len % 8;
        if used != 0 {
            if let Some(last) = bytes.last_mut() {
                *last &= 0xFFu8 << (8 - used);
            }
        }

        Ok(Self { bytes, bit_len })
    }

    /// Exact number of meaningful bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Number of packed bytes, including the padded final byte.
    pub fn byte_len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    /// The packed bytes, final byte zero-padded.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the stream, returning `(packed bytes, bit length)`.
    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.bytes, self.bit_len)
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.bit_len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Iterate over exactly `bit_len` bits in order.
    pub fn iter(&self) -> Bits<'_> {
        Bits {
            stream: self,
            next: 0,
        }
    }
}

impl fmt::Display for BitStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a BitStream {
    type Item = bool;
    type IntoIter = Bits<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bits of a [`BitStream`].
#[derive(Debug, Clone)]
pub struct Bits<'a> {
    stream: &'a BitStream,
    next: usize,
}

impl Iterator for Bits<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        let bit = self.stream.get(self.next)?;
        self.next += 1;
        Some(bit)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.stream.bit_len - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Bits<'_> {}

/// Appends bits MSB-first into a growing byte buffer.
///
/// The last byte of `bytes` is partial whenever `bit_len % 8 != 0`; its
/// unused low bits stay zero.
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    bytes: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the buffer for `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(packed_len(bits)),
            bit_len: 0,
        }
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) {
        let offset = self.bit_len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.bit_len += 1;
    }

    /// Append the low `count` bits of `value`, most significant first.
    ///
    /// # Errors
    /// `BitIoError::InvalidBitCount` if `count > 64`.
    pub fn write_bits(&mut self, value: u64, count: usize) -> Result<()> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        for shift in (0..count).rev() {
            self.write_bit((value >> shift) & 1 == 1);
        }
        Ok(())
    }

    /// Append every bit of a prefix code.
    pub fn write_code(&mut self, code: &Code) {
        for &bit in code.bits() {
            self.write_bit(bit);
        }
    }

    /// Total bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Finish writing; the final partial byte is already zero-padded.
    pub fn finish(self) -> BitStream {
        BitStream {
            bytes: self.bytes,
            bit_len: self.bit_len,
        }
    }
}

/// Reads bits MSB-first from a byte slice, up to a bit limit.
///
/// # Invariants
/// - `position <= limit <= data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    limit: usize,
    position: usize,
}

impl<'a> BitReader<'a> {
    /// Reader over every bit of `data`, padding included.
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limit: data.len() * 8,
            position: 0,
        }
    }

    /// Reader over exactly the meaningful bits of `stream`.
    pub fn for_stream(stream: &'a BitStream) -> Self {
        Self {
            data: stream.as_bytes(),
            limit: stream.bit_len(),
            position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// `BitIoError::UnexpectedEof` at the bit limit.
    pub fn read_bit(&mut self) -> Result<bool> {
        if self.position >= self.limit {
            return Err(BitIoError::UnexpectedEof.into());
        }
        let bit = self.data[self.position / 8] & (0x80 >> (self.position % 8)) != 0;
        self.position += 1;
        Ok(bit)
    }

    /// Read `count` bits into the low end of a `u64`, first bit most
    /// significant.
    ///
    /// # Errors
    /// - `BitIoError::InvalidBitCount` if `count > 64`
    /// - `BitIoError::UnexpectedEof` if fewer than `count` bits remain; the
    ///   reader does not advance in that case
    pub fn read_bits(&mut self, count: usize) -> Result<u64> {
        if count > 64 {
            return Err(BitIoError::InvalidBitCount(count).into());
        }
        if count > self.bits_remaining() {
            return Err(BitIoError::UnexpectedEof.into());
        }

        let mut value = 0u64;
        for _ in 0..count {
            value = (value << 1) | u64::from(self.read_bit()?);
        }
        Ok(value)
    }

    pub fn bits_remaining(&self) -> usize {
        self.limit - self.position
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position >= self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_write_partial_bits_pads_with_zeros() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3).unwrap();
        writer.write_bits(0b11, 2).unwrap();

        let stream = writer.finish();
        assert_eq!(stream.bit_len(), 5);
        assert_eq!(stream.as_bytes(), &[0b1011_1000]);
    }

    #[test]
    fn test_multi_byte() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1010_1011_1111_0000_1, 17).unwrap();

        let stream = writer.finish();
        assert_eq!(stream.as_bytes(), &[0b1010_1011, 0b1111_0000, 0b1000_0000]);
        assert_eq!(stream.byte_len(), 3);

        let mut reader = BitReader::for_stream(&stream);
        assert_eq!(reader.read_bits(17).unwrap(), 0b1010_1011_1111_0000_1);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_reader_stops_at_bit_limit() {
        let mut writer = BitWriter::new();
        writer.write_bit(true);
        let stream = writer.finish();

        let mut reader = BitReader::for_stream(&stream);
        assert!(reader.read_bit().unwrap());
        assert!(matches!(
            reader.read_bit(),
            Err(Error::BitIo(BitIoError::UnexpectedEof))
        ));

        // The raw reader sees the padding too.
        let mut raw = BitReader::new(stream.as_bytes());
        assert_eq!(raw.bits_remaining(), 8);
    }

    #[test]
    fn test_failed_read_does_not_advance() {
        let data = [0xFF];
        let mut reader = BitReader::new(&data);
        reader.read_bits(5).unwrap();
        assert!(reader.read_bits(4).is_err());
        assert_eq!(reader.position(), 5);
        assert_eq!(reader.read_bits(3).unwrap(), 0b111);
    }

    #[test]
    fn test_invalid_bit_count() {
        let mut writer = BitWriter::new();
        assert!(matches!(
            writer.write_bits(0, 65),
            Err(Error::BitIo(BitIoError::InvalidBitCount(65)))
        ));

        let mut reader = BitReader::new(&[0u8; 16]);
        assert!(reader.read_bits(65).is_err());
    }

    #[test]
    fn test_64_bit_values() {
        let value = 0x1234_5678_9ABC_DEF0u64;
        let mut writer = BitWriter::new();
        writer.write_bit(false);
        writer.write_bits(value, 64).unwrap();

        let stream = writer.finish();
        let mut reader = BitReader::for_stream(&stream);
        assert!(!reader.read_bit().unwrap());
        assert_eq!(reader.read_bits(64).unwrap(), value);
    }

    #[test]
    fn test_from_parts_validates_length() {
        assert!(BitStream::from_parts(vec![0xFF], 8).is_ok());
        assert!(BitStream::from_parts(vec![], 0).is_ok());
        assert!(matches!(
            BitStream::from_parts(vec![0xFF], 9),
            Err(Error::BitIo(BitIoError::LengthMismatch {
                bit_len: 9,
                expected: 2,
                actual: 1
            }))
        ));
        assert!(BitStream::from_parts(vec![0xFF, 0x00], 8).is_err());
    }

    #[test]
    fn test_from_parts_clears_padding() {
        let stream = BitStream::from_parts(vec![0b1011_1111], 3).unwrap();
        assert_eq!(stream.as_bytes(), &[0b1010_0000]);
        assert_eq!(stream.to_string(), "101");
    }

    #[test]
    fn test_iter_yields_exact_bits() {
        let mut writer = BitWriter::new();
        for &bit in &[true, false, true, true, false, false, true, false, true] {
            writer.write_bit(bit);
        }
        let stream = writer.finish();

        let bits: Vec<bool> = stream.iter().collect();
        assert_eq!(
            bits,
            vec![true, false, true, true, false, false, true, false, true]
        );
        assert_eq!(stream.iter().len(), 9);
        assert_eq!(stream.get(8), Some(true));
        assert_eq!(stream.get(9), None);
    }

    #[test]
    fn test_empty_stream() {
        let stream = BitWriter::new().finish();
        assert!(stream.is_empty());
        assert_eq!(stream.byte_len(), 0);
        assert_eq!(stream, BitStream::new());
        assert_eq!(stream.iter().count(), 0);
    }
}
