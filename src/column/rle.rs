use itertools::Itertools;

use super::{AttributeType, ColumnMeta, ColumnValue, CompressedColumn, Strategy, Tid};
use crate::ColumnError;

/// A maximal block of consecutive equal logical values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run<T> {
    pub len: usize,
    pub value: T,
}

/// Run-length encoded column: `(run length, value)` pairs whose lengths sum
/// to the row count, with no two adjacent runs sharing a value.
///
/// Removal merges runs that become adjacent with equal values, so maximality
/// holds after any sequence of mutations.
#[derive(Debug, Clone)]
pub struct RunLengthColumn<T> {
    meta: ColumnMeta,
    runs: Vec<Run<T>>,
}

impl<T: ColumnValue> RunLengthColumn<T> {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            meta: ColumnMeta::new(name, attribute_type),
            runs: Vec::new(),
        }
    }

    pub fn runs(&self) -> &[Run<T>] {
        &self.runs
    }

    /// Index of the run containing `tid` and the offset within it.
    fn run_at(&self, tid: Tid) -> Option<(usize, usize)> {
        let mut start = 0;
        for (i, run) in self.runs.iter().enumerate() {
            if tid < start + run.len {
                return Some((i, tid - start));
            }
            start += run.len;
        }
        None
    }

    fn derive_runs(values: Vec<T>) -> Vec<Run<T>> {
        values
            .into_iter()
            .dedup_with_count()
            .map(|(len, value)| Run { len, value })
            .collect()
    }
}

impl<T: ColumnValue> CompressedColumn<T> for RunLengthColumn<T> {
    const STRATEGY: Strategy = Strategy::RunLength;

    fn name(&self) -> &str {
        &self.meta.name
    }

    fn attribute_type(&self) -> AttributeType {
        self.meta.attribute_type
    }

    fn insert(&mut self, value: T) -> Result<(), ColumnError> {
        match self.runs.last_mut() {
            Some(run) if run.value == value => run.len += 1,
            _ => self.runs.push(Run { len: 1, value }),
        }
        Ok(())
    }

    fn get(&self, tid: Tid) -> Result<T, ColumnError> {
        match self.run_at(tid) {
            Some((i, _)) => Ok(self.runs[i].value.clone()),
            None => Err(ColumnError::IndexOutOfRange {
                tid,
                len: self.len(),
            }),
        }
    }

    /// Updating inside a run of length > 1 splits it, so the column is
    /// materialized, patched, and re-encoded into maximal runs. O(n) and
    /// always invariant-preserving.
    fn update(&mut self, tid: Tid, value: T) -> Result<(), ColumnError> {
        if self.run_at(tid).is_none() {
            return Err(ColumnError::IndexOutOfRange {
                tid,
                len: self.len(),
            });
        }
        let mut values = self.materialize()?;
        values[tid] = value;
        self.runs = Self::derive_runs(values);
        Ok(())
    }

    fn remove(&mut self, tid: Tid) -> Result<(), ColumnError> {
        let (i, _) = self.run_at(tid).ok_or(ColumnError::IndexOutOfRange {
            tid,
            len: self.len(),
        })?;
        if self.runs[i].len == 1 {
            self.runs.remove(i);
            // Dropping a whole run can expose two equal neighbours.
            if i > 0 && i < self.runs.len() && self.runs[i - 1].value == self.runs[i].value {
                let follower = self.runs.remove(i);
                self.runs[i - 1].len += follower.len;
            }
        } else {
            self.runs[i].len -= 1;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.runs.clear();
    }

    fn len(&self) -> usize {
        self.runs.iter().map(|run| run.len).sum()
    }

    fn size_in_bytes(&self) -> usize {
        self.runs.len() * (std::mem::size_of::<usize>() + std::mem::size_of::<T>())
    }

    fn materialize(&self) -> Result<Vec<T>, ColumnError> {
        Ok(self
            .runs
            .iter()
            .flat_map(|run| std::iter::repeat(run.value.clone()).take(run.len))
            .collect())
    }
}
