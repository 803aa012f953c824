//! Byte Buffer Module
//!
//! Immutable byte payload used as the default cache value.

use std::fmt;

use crate::cache::SizedValue;

// == Byte Buffer ==
/// Read-only wrapper around an owned byte sequence.
///
/// The wrapped bytes are never handed out by mutable reference. Every
/// accessor returns an independent copy, so the contents stay fixed for the
/// lifetime of the buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteBuffer {
    bytes: Box<[u8]>,
}

impl ByteBuffer {
    // == Constructor ==
    /// Creates a buffer that takes ownership of `bytes`.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into().into_boxed_slice(),
        }
    }

    // == Length ==
    /// Returns the number of wrapped bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    // == To Bytes ==
    /// Returns a copy of the wrapped bytes.
    ///
    /// Mutating the returned vector never affects this buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    // == To Text ==
    /// Returns the wrapped bytes as text.
    ///
    /// Bytes are not validated as an encoding; sequences that are not valid
    /// UTF-8 come back as U+FFFD replacement characters.
    pub fn to_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

impl SizedValue for ByteBuffer {
    fn len(&self) -> usize {
        self.bytes.len()
    }
}

impl fmt::Display for ByteBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}

impl From<Vec<u8>> for ByteBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes)
    }
}

impl From<String> for ByteBuffer {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for ByteBuffer {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}
