//! Sized Value Module
//!
//! The single capability a value needs in order to be stored in the cache.

// == Sized Value ==
/// A value that can report its logical size in bytes.
///
/// The cache charges `key.len() + value.len()` against its byte budget.
/// Implementations must return the same length for as long as the value is
/// stored; a length that changes between calls breaks the cache's byte
/// accounting.
pub trait SizedValue {
    /// Returns the logical size of the value in bytes.
    fn len(&self) -> usize;

    /// Returns true if the value has a logical size of zero.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SizedValue for String {
    fn len(&self) -> usize {
        String::len(self)
    }
}

impl SizedValue for Vec<u8> {
    fn len(&self) -> usize {
        Vec::len(self)
    }
}

impl SizedValue for Box<[u8]> {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }
}
