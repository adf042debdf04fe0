pub mod bitvec;
pub mod delta;
pub mod dict;
pub mod rle;

use std::any::Any;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persist::{self, CompressConfig};
use crate::value::RawValue;
use crate::ColumnError;

/// Zero-based row position (tuple id) in a logical column. Dense, no gaps;
/// removing row `i` shifts every later row down by one.
pub type Tid = usize;

pub trait ColumnValue: Clone + PartialEq + Serialize + for<'de> Deserialize<'de> + Any {}
impl<T> ColumnValue for T where T: Clone + PartialEq + Serialize + for<'de> Deserialize<'de> + Any {}

/// Values the delta encoder can take differences of. Deltas are kept as
/// `i128`, wide enough for differences of any 64-bit integer type.
pub trait DeltaValue: ColumnValue + Copy + TryFrom<i128> + TryInto<i128> {}
impl<T> DeltaValue for T where T: ColumnValue + Copy + TryFrom<i128> + TryInto<i128> {}

/// The encoding scheme behind a compressed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Strategy {
    BitVector = 1,
    Delta,
    Dictionary,
    RunLength,
}

impl TryFrom<u8> for Strategy {
    type Error = ColumnError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Strategy::BitVector),
            2 => Ok(Strategy::Delta),
            3 => Ok(Strategy::Dictionary),
            4 => Ok(Strategy::RunLength),
            _ => Err(ColumnError::InvalidStrategy(value)),
        }
    }
}

/// Declared element type of a column, as recorded in the attribute catalog of
/// the enclosing engine. Metadata only; the physical element type is `T`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    Int,
    Float,
    Varchar,
    Bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ColumnMeta {
    pub(crate) name: String,
    pub(crate) attribute_type: AttributeType,
}

impl ColumnMeta {
    pub(crate) fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attribute_type,
        }
    }
}

/// The logical column contract every encoder satisfies.
///
/// A column is an ordered sequence of logical values addressed by [`Tid`].
/// Encoders keep their own physical representation and decode at this
/// boundary; the enclosing engine never sees the physical layout.
///
/// `get` is a copy-out accessor: it never hands out references into
/// encoder-owned storage, so no caller can hold a reference across a
/// structural mutation. Mutation goes through `update`.
pub trait CompressedColumn<T: ColumnValue>: Clone {
    const STRATEGY: Strategy;

    fn name(&self) -> &str;

    fn attribute_type(&self) -> AttributeType;

    /// Appends `value` at the next row position.
    fn insert(&mut self, value: T) -> Result<(), ColumnError>;

    /// Returns the logical value at `tid`.
    fn get(&self, tid: Tid) -> Result<T, ColumnError>;

    /// Replaces the logical value at `tid`, preserving the encoding's
    /// structural invariant. Never changes the row count.
    fn update(&mut self, tid: Tid, value: T) -> Result<(), ColumnError>;

    /// Deletes row `tid`; every later row shifts down by one.
    fn remove(&mut self, tid: Tid) -> Result<(), ColumnError>;

    /// Resets to zero rows.
    fn clear(&mut self);

    /// Number of logical rows, not physical entries.
    fn len(&self) -> usize;

    /// Estimated physical footprint in bytes. Monotone in the number of
    /// physical entries, not exact.
    fn size_in_bytes(&self) -> usize;

    /// Decodes the full logical value sequence.
    fn materialize(&self) -> Result<Vec<T>, ColumnError>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn strategy(&self) -> Strategy {
        Self::STRATEGY
    }

    /// Deep copy; shares no storage with `self`.
    fn copy(&self) -> Self {
        self.clone()
    }

    /// Type-erased insert; fails with `TypeMismatch` if `raw` does not hold
    /// the column's element type.
    fn insert_raw(&mut self, raw: RawValue) -> Result<(), ColumnError> {
        self.insert(raw.decode::<T>()?)
    }

    /// Type-erased update.
    fn update_raw(&mut self, tid: Tid, raw: RawValue) -> Result<(), ColumnError> {
        self.update(tid, raw.decode::<T>()?)
    }

    /// Updates every position in an ascending position set to `value`.
    fn update_many(&mut self, tids: &[Tid], value: &T) -> Result<(), ColumnError> {
        for &tid in tids {
            self.update(tid, value.clone())?;
        }
        Ok(())
    }

    /// Removes every position in an ascending position set. Positions are
    /// removed highest-first so the remaining ones stay valid.
    fn remove_many(&mut self, tids: &[Tid]) -> Result<(), ColumnError> {
        for &tid in tids.iter().rev() {
            self.remove(tid)?;
        }
        Ok(())
    }

    /// Persists the logical value sequence to the file `dir/<name>`.
    fn store(&self, dir: &Path) -> Result<(), ColumnError> {
        self.store_with(dir, &CompressConfig::default())
    }

    fn store_with(&self, dir: &Path, config: &CompressConfig) -> Result<(), ColumnError> {
        let values = self.materialize()?;
        persist::store_values(dir, self.name(), Self::STRATEGY, &values, config)
    }

    /// Restores the logical value sequence from the file `dir/<name>`,
    /// replacing the current contents. A failed load leaves the column
    /// unchanged.
    fn load(&mut self, dir: &Path) -> Result<(), ColumnError> {
        let values: Vec<T> = persist::load_values(dir, self.name())?;
        // Rebuild into a scratch column so a failed re-insert (for example a
        // dictionary hitting its capacity limit) cannot destroy prior state.
        let mut loaded = self.clone();
        loaded.clear();
        for value in values {
            loaded.insert(value)?;
        }
        *self = loaded;
        Ok(())
    }
}
