use crate::column::Tid;
use postcard::Error as PostcardError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColumnError {
    #[error("tuple id {tid} out of range for column of {len} rows")]
    IndexOutOfRange { tid: Tid, len: usize },
    #[error("type mismatch: expected `{expected}`, got `{actual}`")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },
    #[error("dictionary is full ({0} distinct values)")]
    DictionaryCapacityExceeded(usize),
    #[error("value cannot be represented as a 128-bit delta")]
    DeltaOverflow,
    #[error("invalid strategy code `{0}`")]
    InvalidStrategy(u8),
    #[error("corrupt column file `{0}`")]
    CorruptFile(String),
    #[error("serialize or deserialize error")]
    SerializeError(#[from] PostcardError),
    #[error("column file i/o failed")]
    Io(#[from] std::io::Error),
}
