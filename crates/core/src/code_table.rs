//! Symbol → code mapping derived from a [`HuffmanTree`].

use std::collections::BTreeMap;
use std::fmt;

use crate::frequency::{FrequencyTable, Symbol};
use crate::tree::{HuffmanTree, Node};

/// A root-to-leaf path: `false` for a left edge, `true` for a right edge.
///
/// Codes can be up to 255 bits long, so they are kept as a bit sequence
/// rather than packed into an integer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code {
    bits: Vec<bool>,
}

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// True if `self` is a (non-strict) prefix of `other`.
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.bits.starts_with(&self.bits)
    }

    fn child(&self, bit: bool) -> Self {
        let mut bits = Vec::with_capacity(self.bits.len() + 1);
        bits.extend_from_slice(&self.bits);
        bits.push(bit);
        Self { bits }
    }
}

impl From<Vec<bool>> for Code {
    fn from(bits: Vec<bool>) -> Self {
        Self { bits }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.bits {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// One code per leaf of the tree it was built from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<Symbol, Code>,
}

impl CodeTable {
    /// Walk `tree` depth-first, left edge = 0, right edge = 1.
    ///
    /// The root itself contributes no bit. Index links that lead nowhere are
    /// skipped; the decoder reports them when a bit actually follows one.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(tree.root(), Code::default())];

        while let Some((id, code)) = stack.pop() {
            match tree.node(id) {
                Some(&Node::Leaf { symbol, .. }) => {
                    codes.insert(symbol, code);
                }
                Some(&Node::Internal { left, right, .. }) => {
                    stack.push((right, code.child(true)));
                    stack.push((left, code.child(false)));
                }
                None => {}
            }
        }

        Self { codes }
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes.get(&symbol)
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.codes.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Entries in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code))
    }

    pub fn max_code_len(&self) -> usize {
        self.codes.values().map(Code::len).max().unwrap_or(0)
    }

    /// Bits needed to encode an input with counts `freqs`.
    ///
    /// Symbols missing from the table contribute nothing.
    pub fn encoded_bits(&self, freqs: &FrequencyTable) -> u64 {
        freqs
            .iter()
            .filter_map(|(symbol, count)| self.get(symbol).map(|code| count * code.len() as u64))
            .sum()
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        // In lexicographic order a prefix sorts directly before some code it
        // prefixes, so neighbours are enough to check.
        let mut sorted: Vec<&Code> = self.codes.values().collect();
        sorted.sort();
        sorted.windows(2).all(|pair| !pair[0].is_prefix_of(pair[1]))
    }
}
