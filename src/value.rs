use std::any::{type_name, Any};

use crate::ColumnError;

/// Type-erased value accepted at the insert/update boundary.
///
/// The surrounding engine handles heterogeneous columns, so values may arrive
/// without their static type. A [`RawValue`] remembers the name of the type it
/// was built from; decoding into the wrong element type fails with
/// [`ColumnError::TypeMismatch`] instead of corrupting physical state.
pub struct RawValue {
    value: Box<dyn Any>,
    type_name: &'static str,
}

impl RawValue {
    pub fn new<T: Any>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Name of the type this value was constructed from.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn decode<T: Any>(self) -> Result<T, ColumnError> {
        self.value
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| ColumnError::TypeMismatch {
                expected: type_name::<T>(),
                actual: self.type_name,
            })
    }
}

impl std::fmt::Debug for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawValue")
            .field("type_name", &self.type_name)
            .finish()
    }
}
