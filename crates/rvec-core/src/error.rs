#![forbid(unsafe_code)]

//! Errors surfaced by checked sequence accessors.

use std::fmt;

/// A checked read addressed a slot past the end of the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfRange {
    /// The requested index.
    pub index: usize,
    /// Sequence length at the time of the request.
    pub len: usize,
}

impl fmt::Display for OutOfRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "index out of range: the len is {} but the index is {}",
            self.len, self.index
        )
    }
}

impl std::error::Error for OutOfRange {}
