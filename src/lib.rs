//! Compressed column storage for a column-oriented store.
//!
//! A logical column is an ordered sequence of typed values addressed by row
//! position (tuple id). Four encodings keep that sequence in a space-reduced
//! physical form while supporting point lookup, point update, point removal
//! and persistence through one shared contract, [`CompressedColumn`]:
//!
//! - [`BitVectorColumn`]: one bit-string per distinct value, one bit per row
//! - [`DeltaColumn`]: successive differences between neighbouring values
//! - [`DictionaryColumn`]: a small code per row into a shared value table
//! - [`RunLengthColumn`]: `(run length, value)` pairs for maximal runs
//!
//! Encoders decode to logical values only at the contract boundary; callers
//! never see the physical layout. `store`/`load` persist the materialized
//! logical sequence (postcard, Deflate above a size threshold), so a loaded
//! column round-trips logically regardless of which encoder wrote the file.
//!
//! ```ignore
//! use colpress::{AttributeType, CompressedColumn, RunLengthColumn};
//!
//! let mut col = RunLengthColumn::new("status", AttributeType::Varchar);
//! col.insert("ok".to_string())?;
//! col.insert("ok".to_string())?;
//! assert_eq!(col.len(), 2);
//! assert_eq!(col.get(1)?, "ok");
//! ```

mod err;
pub use err::ColumnError;
mod value;
pub use value::RawValue;
mod persist;
pub use persist::CompressConfig;
mod column;
pub use column::{
    bitvec::BitVectorColumn,
    delta::DeltaColumn,
    dict::DictionaryColumn,
    rle::{Run, RunLengthColumn},
    AttributeType, ColumnValue, CompressedColumn, DeltaValue, Strategy, Tid,
};
