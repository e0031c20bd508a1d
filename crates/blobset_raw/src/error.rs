use thiserror::Error;

// -----------------------------------------------------------------------------
// Error

/// A violated precondition of a positional set operation.
///
/// The container is left unchanged whenever one of these is returned.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SetError {
    #[error("index {index} is out of bounds for a set of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("range of {count} items at {start} is out of bounds for a set of length {len}")]
    RangeOutOfBounds {
        start: usize,
        count: usize,
        len: usize,
    },

    #[error("item size mismatch: expected {expected} bytes, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    #[error("the set is empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::SetError;
    use alloc::string::ToString;

    #[test]
    fn display() {
        let err = SetError::IndexOutOfBounds { index: 4, len: 3 };
        assert_eq!(err.to_string(), "index 4 is out of bounds for a set of length 3");

        let err = SetError::RangeOutOfBounds {
            start: 1,
            count: 5,
            len: 3,
        };
        assert_eq!(
            err.to_string(),
            "range of 5 items at 1 is out of bounds for a set of length 3"
        );

        let err = SetError::SizeMismatch {
            expected: 4,
            found: 8,
        };
        assert_eq!(err.to_string(), "item size mismatch: expected 4 bytes, found 8");
        assert_eq!(SetError::Empty.to_string(), "the set is empty");
    }
}
