use super::{AttributeType, ColumnMeta, ColumnValue, CompressedColumn, Strategy, Tid};
use crate::ColumnError;

const DEFAULT_MAX_DISTINCT: usize = u32::MAX as usize;

/// Dictionary encoded column: an append-only value table (code = table index)
/// plus one `u32` code per row. Equal logical values always map to the same
/// code; codes appearing in the row sequence always exist in the table.
///
/// Table entries orphaned by removals are never pruned. Allocation past the
/// distinct-value limit fails with `DictionaryCapacityExceeded` instead of
/// wrapping codes.
#[derive(Debug, Clone)]
pub struct DictionaryColumn<T> {
    meta: ColumnMeta,
    dict: Vec<T>,
    codes: Vec<u32>,
    max_distinct: usize,
}

impl<T: ColumnValue> DictionaryColumn<T> {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self::with_capacity_limit(name, attribute_type, DEFAULT_MAX_DISTINCT)
    }

    /// A column whose dictionary may hold at most `max_distinct` values.
    pub fn with_capacity_limit(
        name: impl Into<String>,
        attribute_type: AttributeType,
        max_distinct: usize,
    ) -> Self {
        Self {
            meta: ColumnMeta::new(name, attribute_type),
            dict: Vec::new(),
            codes: Vec::new(),
            max_distinct: max_distinct.min(DEFAULT_MAX_DISTINCT),
        }
    }

    /// Number of codes ever allocated, including orphaned ones.
    pub fn distinct_count(&self) -> usize {
        self.dict.len()
    }

    /// Reuses the code of a value already in the table, or allocates the
    /// next one. Scanning the table (not the row codes) keeps the mapping
    /// injective even after removals orphan a code.
    fn code_for(&mut self, value: &T) -> Result<u32, ColumnError> {
        if let Some(code) = self.dict.iter().position(|v| v == value) {
            return Ok(code as u32);
        }
        if self.dict.len() >= self.max_distinct {
            return Err(ColumnError::DictionaryCapacityExceeded(self.dict.len()));
        }
        self.dict.push(value.clone());
        Ok((self.dict.len() - 1) as u32)
    }

    fn check_bounds(&self, tid: Tid) -> Result<(), ColumnError> {
        if tid >= self.codes.len() {
            return Err(ColumnError::IndexOutOfRange {
                tid,
                len: self.codes.len(),
            });
        }
        Ok(())
    }
}

impl<T: ColumnValue> CompressedColumn<T> for DictionaryColumn<T> {
    const STRATEGY: Strategy = Strategy::Dictionary;

    fn name(&self) -> &str {
        &self.meta.name
    }

    fn attribute_type(&self) -> AttributeType {
        self.meta.attribute_type
    }

    fn insert(&mut self, value: T) -> Result<(), ColumnError> {
        let code = self.code_for(&value)?;
        self.codes.push(code);
        Ok(())
    }

    fn get(&self, tid: Tid) -> Result<T, ColumnError> {
        self.check_bounds(tid)?;
        Ok(self.dict[self.codes[tid] as usize].clone())
    }

    fn update(&mut self, tid: Tid, value: T) -> Result<(), ColumnError> {
        self.check_bounds(tid)?;
        let code = self.code_for(&value)?;
        self.codes[tid] = code;
        Ok(())
    }

    fn remove(&mut self, tid: Tid) -> Result<(), ColumnError> {
        self.check_bounds(tid)?;
        self.codes.remove(tid);
        Ok(())
    }

    fn clear(&mut self) {
        self.codes.clear();
        self.dict.clear();
    }

    fn len(&self) -> usize {
        self.codes.len()
    }

    fn size_in_bytes(&self) -> usize {
        self.codes.len() * std::mem::size_of::<u32>()
            + self.dict.len() * std::mem::size_of::<T>()
    }

    fn materialize(&self) -> Result<Vec<T>, ColumnError> {
        Ok(self
            .codes
            .iter()
            .map(|&code| self.dict[code as usize].clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column() -> DictionaryColumn<String> {
        DictionaryColumn::new("city", AttributeType::Varchar)
    }

    #[test]
    fn equal_values_share_a_code() {
        let mut col = column();
        col.insert("berlin".to_string()).unwrap();
        col.insert("madrid".to_string()).unwrap();
        col.insert("berlin".to_string()).unwrap();
        assert_eq!(col.codes, vec![0, 1, 0]);
        assert_eq!(col.distinct_count(), 2);
        assert_eq!(col.get(2).unwrap(), "berlin");
    }

    #[test]
    fn codes_stay_deterministic_after_removal() {
        let mut col = column();
        col.insert("a".to_string()).unwrap();
        col.insert("b".to_string()).unwrap();
        // Orphan code 0, then reinsert the same value.
        col.remove(0).unwrap();
        col.insert("a".to_string()).unwrap();
        assert_eq!(col.codes, vec![1, 0]);
        assert_eq!(col.distinct_count(), 2);
    }

    #[test]
    fn update_allocates_like_insert() {
        let mut col = column();
        col.insert("a".to_string()).unwrap();
        col.insert("a".to_string()).unwrap();
        col.update(1, "b".to_string()).unwrap();
        assert_eq!(col.codes, vec![0, 1]);
        assert_eq!(col.get(0).unwrap(), "a");
        assert_eq!(col.get(1).unwrap(), "b");
        assert_eq!(col.len(), 2);
    }

    #[test]
    fn capacity_limit_is_enforced() {
        let mut col: DictionaryColumn<i64> =
            DictionaryColumn::with_capacity_limit("small", AttributeType::Int, 2);
        col.insert(1).unwrap();
        col.insert(2).unwrap();
        col.insert(1).unwrap();
        let err = col.insert(3).unwrap_err();
        assert!(matches!(err, ColumnError::DictionaryCapacityExceeded(2)));
        // The failed insert must not have appended a row.
        assert_eq!(col.len(), 3);
    }

    #[test]
    fn remove_keeps_dictionary_entries() {
        let mut col = column();
        col.insert("x".to_string()).unwrap();
        col.remove(0).unwrap();
        assert_eq!(col.len(), 0);
        assert_eq!(col.distinct_count(), 1);
    }
}
