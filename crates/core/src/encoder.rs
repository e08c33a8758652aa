//! Symbol sequence → packed bit stream.

use crate::bitio::{BitStream, BitWriter};
use crate::code_table::CodeTable;
use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// Concatenate the code of every byte of `data`, in input order.
///
/// # Errors
/// `HuffmanError::UnknownSymbol` for the first byte that has no code in
/// `table`. Tables built from the same input always cover it.
pub fn encode(data: &[u8], table: &CodeTable) -> Result<BitStream> {
    let expected_bits = table.encoded_bits(&FrequencyTable::from_bytes(data));
    let mut writer = BitWriter::with_capacity(expected_bits as usize);

    for &symbol in data {
        let code = table
            .get(symbol)
            .ok_or(HuffmanError::UnknownSymbol { symbol })?;
        writer.write_code(code);
    }

    Ok(writer.finish())
}
