use std::marker::PhantomData;

use super::{AttributeType, ColumnMeta, CompressedColumn, DeltaValue, Strategy, Tid};
use crate::ColumnError;

/// Delta encoded column: one `i128` difference per row, with
/// `logical[0] = delta[0]` and `logical[i] = logical[i-1] + delta[i]`.
///
/// Lookups decode by summing deltas from the front, O(tid) per call; no
/// materialized running cache is kept.
#[derive(Debug, Clone)]
pub struct DeltaColumn<T> {
    meta: ColumnMeta,
    deltas: Vec<i128>,
    _marker: PhantomData<T>,
}

fn to_wide<T: DeltaValue>(value: T) -> Result<i128, ColumnError> {
    value.try_into().map_err(|_| ColumnError::DeltaOverflow)
}

fn from_wide<T: DeltaValue>(value: i128) -> Result<T, ColumnError> {
    T::try_from(value).map_err(|_| ColumnError::DeltaOverflow)
}

impl<T: DeltaValue> DeltaColumn<T> {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            meta: ColumnMeta::new(name, attribute_type),
            deltas: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Logical value at `tid`, still in delta-space width.
    fn decode(&self, tid: Tid) -> i128 {
        self.deltas[..=tid].iter().sum()
    }

    fn check_bounds(&self, tid: Tid) -> Result<(), ColumnError> {
        if tid >= self.deltas.len() {
            return Err(ColumnError::IndexOutOfRange {
                tid,
                len: self.deltas.len(),
            });
        }
        Ok(())
    }
}

impl<T: DeltaValue> CompressedColumn<T> for DeltaColumn<T> {
    const STRATEGY: Strategy = Strategy::Delta;

    fn name(&self) -> &str {
        &self.meta.name
    }

    fn attribute_type(&self) -> AttributeType {
        self.meta.attribute_type
    }

    fn insert(&mut self, value: T) -> Result<(), ColumnError> {
        let value = to_wide(value)?;
        if self.deltas.is_empty() {
            self.deltas.push(value);
        } else {
            let last = self.decode(self.deltas.len() - 1);
            let delta = value
                .checked_sub(last)
                .ok_or(ColumnError::DeltaOverflow)?;
            self.deltas.push(delta);
        }
        Ok(())
    }

    fn get(&self, tid: Tid) -> Result<T, ColumnError> {
        self.check_bounds(tid)?;
        from_wide(self.decode(tid))
    }

    fn update(&mut self, tid: Tid, value: T) -> Result<(), ColumnError> {
        self.check_bounds(tid)?;
        let value = to_wide(value)?;
        let old = self.decode(tid);
        let prev = if tid == 0 { 0 } else { self.decode(tid - 1) };
        let new_delta = value
            .checked_sub(prev)
            .ok_or(ColumnError::DeltaOverflow)?;
        // The following delta referenced the old value at `tid`; compensate
        // so every later row decodes unchanged. Both values are checked
        // before either slot is written, so a failed update changes nothing.
        let follower = match self.deltas.get(tid + 1) {
            Some(&next) => {
                let compensation = old
                    .checked_sub(value)
                    .ok_or(ColumnError::DeltaOverflow)?;
                Some(
                    next.checked_add(compensation)
                        .ok_or(ColumnError::DeltaOverflow)?,
                )
            }
            None => None,
        };
        self.deltas[tid] = new_delta;
        if let Some(next) = follower {
            self.deltas[tid + 1] = next;
        }
        Ok(())
    }

    fn remove(&mut self, tid: Tid) -> Result<(), ColumnError> {
        self.check_bounds(tid)?;
        let removed = self.deltas[tid];
        let follower = match self.deltas.get(tid + 1) {
            Some(&next) => Some(
                next.checked_add(removed)
                    .ok_or(ColumnError::DeltaOverflow)?,
            ),
            None => None,
        };
        self.deltas.remove(tid);
        if let Some(next) = follower {
            self.deltas[tid] = next;
        }
        Ok(())
    }

    fn clear(&mut self) {
        self.deltas.clear();
    }

    fn len(&self) -> usize {
        self.deltas.len()
    }

    fn size_in_bytes(&self) -> usize {
        self.deltas.len() * std::mem::size_of::<i128>()
    }

    fn materialize(&self) -> Result<Vec<T>, ColumnError> {
        let mut out = Vec::with_capacity(self.deltas.len());
        let mut absolute = 0_i128;
        for delta in &self.deltas {
            absolute += delta;
            out.push(from_wide(absolute)?);
        }
        Ok(out)
    }
}
