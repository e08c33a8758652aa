//! Compression statistics for reporting.
//!
//! Collected once per compress/decompress call by the caller; nothing here
//! is shared or updated concurrently.

use std::time::{Duration, Instant};

use crate::result::EncodedResult;

/// What one compression run produced.
#[derive(Debug, Clone)]
pub struct CompressionStats {
    /// When the run started
    pub start_time: Instant,

    /// When the run ended (set on completion)
    pub end_time: Option<Instant>,

    /// Original input length
    pub input_bytes: u64,

    /// Distinct byte values in the input
    pub distinct_symbols: usize,

    /// Exact encoded bit count
    pub encoded_bits: u64,

    /// Packed payload length (encoded bits rounded up to bytes)
    pub payload_bytes: u64,

    /// Serialized container length, if one was written
    pub container_bytes: Option<u64>,

    /// Longest code in the table
    pub max_code_len: usize,
}

impl CompressionStats {
    /// Start timing a run.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            end_time: None,
            input_bytes: 0,
            distinct_symbols: 0,
            encoded_bits: 0,
            payload_bytes: 0,
            container_bytes: None,
            max_code_len: 0,
        }
    }

    /// Fill in everything derivable from an input and its encoding.
    pub fn record(&mut self, input: &[u8], result: &EncodedResult) {
        let table = result.tree().map(|tree| tree.code_table()).unwrap_or_default();

        self.input_bytes = input.len() as u64;
        self.distinct_symbols = crate::FrequencyTable::from_bytes(input).distinct();
        self.encoded_bits = result.bit_len() as u64;
        self.payload_bytes = result.bits().byte_len() as u64;
        self.max_code_len = table.max_code_len();
    }

    /// Mark the run as complete.
    pub fn complete(&mut self) {
        self.end_time = Some(Instant::now());
    }

    /// Total duration (or current elapsed if not complete).
    pub fn duration(&self) -> Duration {
        match self.end_time {
            Some(end) => end.duration_since(self.start_time),
            None => self.start_time.elapsed(),
        }
    }

    /// Payload size over input size; 0.0 for empty input.
    pub fn compression_ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.payload_bytes as f64 / self.input_bytes as f64
        }
    }

    /// Mean code length actually used.
    pub fn bits_per_symbol(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.encoded_bits as f64 / self.input_bytes as f64
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Compression Summary ===");
        println!("Duration: {} ms", self.duration().as_millis());
        println!("Input: {} bytes, {} distinct symbols", self.input_bytes, self.distinct_symbols);
        println!("Encoded: {} bits ({} bytes packed)", self.encoded_bits, self.payload_bytes);
        if let Some(container) = self.container_bytes {
            println!("Container: {} bytes", container);
        }
        println!("Ratio: {:.1}%", self.compression_ratio() * 100.0);
        println!("Bits per symbol: {:.3} (longest code {})", self.bits_per_symbol(), self.max_code_len);
    }

    /// Export as `key=value` lines (for parsing/testing).
    pub fn export_text(&self) -> String {
        format!(
            "duration_ms={}\n\
             input_bytes={}\n\
             distinct_symbols={}\n\
             encoded_bits={}\n\
             payload_bytes={}\n\
             container_bytes={}\n\
             compression_ratio={:.4}\n\
             bits_per_symbol={:.4}\n\
             max_code_len={}\n",
            self.duration().as_millis(),
            self.input_bytes,
            self.distinct_symbols,
            self.encoded_bits,
            self.payload_bytes,
            self.container_bytes.unwrap_or(0),
            self.compression_ratio(),
            self.bits_per_symbol(),
            self.max_code_len,
        )
    }
}

impl Default for CompressionStats {
    fn default() -> Self {
        Self::new()
    }
}
