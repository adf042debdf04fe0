use super::{AttributeType, ColumnMeta, ColumnValue, CompressedColumn, Strategy, Tid};
use crate::ColumnError;

/// Packed bit-string, one bit per row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Bits {
    words: Vec<u64>,
    len: usize,
}

impl Bits {
    fn with_len(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    fn len(&self) -> usize {
        self.len
    }

    fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.len);
        self.words[idx / 64] >> (idx % 64) & 1 == 1
    }

    fn set(&mut self, idx: usize, bit: bool) {
        debug_assert!(idx < self.len);
        let word = &mut self.words[idx / 64];
        if bit {
            *word |= 1 << (idx % 64);
        } else {
            *word &= !(1 << (idx % 64));
        }
    }

    fn push(&mut self, bit: bool) {
        if self.len % 64 == 0 {
            self.words.push(0);
        }
        self.len += 1;
        self.set(self.len - 1, bit);
    }

    /// Deletes the bit at `idx`, shifting every later bit down by one.
    fn remove(&mut self, idx: usize) {
        debug_assert!(idx < self.len);
        for i in idx..self.len - 1 {
            let next = self.get(i + 1);
            self.set(i, next);
        }
        self.set(self.len - 1, false);
        self.len -= 1;
        while self.words.len() > self.len.div_ceil(64) {
            self.words.pop();
        }
    }

    fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn any(&self) -> bool {
        self.words.iter().any(|w| *w != 0)
    }

    fn size_in_bytes(&self) -> usize {
        self.words.len() * std::mem::size_of::<u64>()
    }
}

/// Bit-vector encoded column: one bit-string per distinct value, one bit per
/// row. For every row exactly one pair has a set bit at that position, all
/// bit-strings have equal length, and no value appears in two pairs.
///
/// Pairs whose bit-string goes all-zero after an update or removal are
/// pruned, so the pair list only ever holds values still present in the
/// column.
#[derive(Debug, Clone)]
pub struct BitVectorColumn<T> {
    meta: ColumnMeta,
    values: Vec<T>,
    bits: Vec<Bits>,
}

impl<T: ColumnValue> BitVectorColumn<T> {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            meta: ColumnMeta::new(name, attribute_type),
            values: Vec::new(),
            bits: Vec::new(),
        }
    }

    /// Number of distinct values currently encoded.
    pub fn distinct_count(&self) -> usize {
        self.values.len()
    }

    fn rows(&self) -> usize {
        self.bits.first().map(Bits::len).unwrap_or(0)
    }

    fn position_of(&self, value: &T) -> Option<usize> {
        self.values.iter().position(|v| v == value)
    }

    fn prune_empty(&mut self) {
        let mut i = 0;
        while i < self.bits.len() {
            if self.bits[i].any() {
                i += 1;
            } else {
                self.bits.remove(i);
                self.values.remove(i);
            }
        }
    }

    fn check_bounds(&self, tid: Tid) -> Result<(), ColumnError> {
        if tid >= self.rows() {
            return Err(ColumnError::IndexOutOfRange {
                tid,
                len: self.rows(),
            });
        }
        Ok(())
    }
}

impl<T: ColumnValue> CompressedColumn<T> for BitVectorColumn<T> {
    const STRATEGY: Strategy = Strategy::BitVector;

    fn name(&self) -> &str {
        &self.meta.name
    }

    fn attribute_type(&self) -> AttributeType {
        self.meta.attribute_type
    }

    fn insert(&mut self, value: T) -> Result<(), ColumnError> {
        if self.values.is_empty() {
            let mut bits = Bits::default();
            bits.push(true);
            self.values.push(value);
            self.bits.push(bits);
            return Ok(());
        }
        match self.position_of(&value) {
            Some(pair) => {
                for (i, bits) in self.bits.iter_mut().enumerate() {
                    bits.push(i == pair);
                }
            }
            None => {
                let rows = self.rows();
                for bits in &mut self.bits {
                    bits.push(false);
                }
                let mut bits = Bits::with_len(rows);
                bits.push(true);
                self.values.push(value);
                self.bits.push(bits);
            }
        }
        Ok(())
    }

    fn get(&self, tid: Tid) -> Result<T, ColumnError> {
        self.check_bounds(tid)?;
        for (value, bits) in self.values.iter().zip(&self.bits) {
            if bits.get(tid) {
                return Ok(value.clone());
            }
        }
        // Unreachable while the one-set-bit-per-row invariant holds; guard
        // instead of indexing past the pair list.
        Err(ColumnError::IndexOutOfRange {
            tid,
            len: self.rows(),
        })
    }

    fn update(&mut self, tid: Tid, value: T) -> Result<(), ColumnError> {
        self.check_bounds(tid)?;
        for bits in &mut self.bits {
            bits.set(tid, false);
        }
        match self.position_of(&value) {
            Some(pair) => self.bits[pair].set(tid, true),
            None => {
                let mut bits = Bits::with_len(self.rows());
                bits.set(tid, true);
                self.values.push(value);
                self.bits.push(bits);
            }
        }
        self.prune_empty();
        Ok(())
    }

    fn remove(&mut self, tid: Tid) -> Result<(), ColumnError> {
        self.check_bounds(tid)?;
        for bits in &mut self.bits {
            bits.remove(tid);
        }
        self.prune_empty();
        Ok(())
    }

    fn clear(&mut self) {
        self.values.clear();
        self.bits.clear();
    }

    fn len(&self) -> usize {
        self.bits.iter().map(Bits::count_ones).sum()
    }

    fn size_in_bytes(&self) -> usize {
        self.values.len() * std::mem::size_of::<T>()
            + self.bits.iter().map(Bits::size_in_bytes).sum::<usize>()
    }

    fn materialize(&self) -> Result<Vec<T>, ColumnError> {
        (0..self.rows()).map(|tid| self.get(tid)).collect()
    }
}
