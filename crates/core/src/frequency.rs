//! Symbol occurrence counts over the 256-value byte alphabet.

/// One alphabet unit.
pub type Symbol = u8;

/// Number of distinct symbols.
pub const ALPHABET_SIZE: usize = 256;

/// Occurrence count for every byte value.
///
/// Symbols with a zero count are "absent": they get no leaf in the tree and
/// no code in the code table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// An all-zero table.
    pub fn new() -> Self {
        Self {
            counts: [0; ALPHABET_SIZE],
        }
    }

    /// Count every byte of `data`. The counts sum to `data.len()`.
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut table = Self::new();
        table.add_bytes(data);
        table
    }

    /// Add the bytes of `data` to the running counts.
    pub fn add_bytes(&mut self, data: &[u8]) {
        for &byte in data {
            self.counts[usize::from(byte)] += 1;
        }
    }

    pub fn count(&self, symbol: Symbol) -> u64 {
        self.counts[usize::from(symbol)]
    }

    /// Sum of all counts, i.e. the input length.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Number of symbols with a non-zero count.
    pub fn distinct(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|&count| count == 0)
    }

    /// Present symbols with their counts, in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        (0..=Symbol::MAX)
            .map(|symbol| (symbol, self.count(symbol)))
            .filter(|&(_, count)| count > 0)
    }

    pub fn as_array(&self) -> &[u64; ALPHABET_SIZE] {
        &self.counts
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl From<[u64; ALPHABET_SIZE]> for FrequencyTable {
    fn from(counts: [u64; ALPHABET_SIZE]) -> Self {
        Self { counts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_sum_to_length() {
        let table = FrequencyTable::from_bytes(b"aaabbcdeffff");
        assert_eq!(table.total(), 12);
        assert_eq!(table.count(b'a'), 3);
        assert_eq!(table.count(b'b'), 2);
        assert_eq!(table.count(b'c'), 1);
        assert_eq!(table.count(b'd'), 1);
        assert_eq!(table.count(b'e'), 1);
        assert_eq!(table.count(b'f'), 4);
        assert_eq!(table.count(b'g'), 0);
        assert_eq!(table.distinct(), 6);
    }

    #[test]
    fn test_empty_input() {
        let table = FrequencyTable::from_bytes(b"");
        assert!(table.is_empty());
        assert_eq!(table.total(), 0);
        assert_eq!(table.iter().count(), 0);
        assert_eq!(table, FrequencyTable::default());
    }

    #[test]
    fn test_iter_is_ascending_and_skips_absent() {
        let table = FrequencyTable::from_bytes(&[0xFF, 0x00, 0x7F, 0xFF]);
        let present: Vec<_> = table.iter().collect();
        assert_eq!(present, vec![(0x00, 1), (0x7F, 1), (0xFF, 2)]);
    }

    #[test]
    fn test_add_bytes_accumulates() {
        let mut table = FrequencyTable::from_bytes(b"ab");
        table.add_bytes(b"bc");
        assert_eq!(table, FrequencyTable::from_bytes(b"abbc"));
    }

    #[test]
    fn test_order_independent() {
        assert_eq!(
            FrequencyTable::from_bytes(b"abcabc"),
            FrequencyTable::from_bytes(b"cbacba")
        );
    }
}
