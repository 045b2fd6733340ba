use std::borrow::Cow;
use std::fmt;

use thiserror::Error;

/// Width of the on-disk name field.
pub const NAME_LEN: usize = 8;

/// The bytes of a lump name.
///
/// Names are 8-bit data, not text: whatever precedes the first NUL in the
/// name field is kept as-is.  Comparisons are exact and case-sensitive.
#[derive(Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct LumpName(Vec<u8>);

impl LumpName {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The name as text, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// The name as text, with invalid sequences replaced.
    pub fn to_string_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.0)
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl fmt::Debug for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

impl fmt::Display for LumpName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.to_string_lossy())
    }
}

impl AsRef<[u8]> for LumpName {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<&str> for LumpName {
    fn from(name: &str) -> Self {
        Self(name.as_bytes().to_vec())
    }
}

impl From<String> for LumpName {
    fn from(name: String) -> Self {
        Self(name.into_bytes())
    }
}

impl From<&[u8]> for LumpName {
    fn from(name: &[u8]) -> Self {
        Self(name.to_vec())
    }
}

impl From<Vec<u8>> for LumpName {
    fn from(name: Vec<u8>) -> Self {
        Self(name)
    }
}

impl PartialEq<str> for LumpName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<&str> for LumpName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == other.as_bytes()
    }
}

impl PartialEq<String> for LumpName {
    fn eq(&self, other: &String) -> bool {
        self.0 == other.as_bytes()
    }
}

/// A named binary resource.
///
/// Names need not be unique; lookups return the first match in directory
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Lump {
    pub name: LumpName,
    pub data: Vec<u8>,
}

impl Lump {
    pub fn new(name: impl Into<LumpName>, data: impl Into<Vec<u8>>) -> Self {
        Self { name: name.into(), data: data.into() }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("lump name {name:?} is {} bytes, longer than 8", .name.len())]
pub struct NameTooLong {
    pub name: LumpName,
}

// ── Name field ───────────────────────────────────────────────────────────────

/// Decodes a raw name field.
///
/// A name shorter than eight bytes ends at the first NUL; a name of exactly
/// eight bytes has no terminator at all.
pub fn decode_name(raw: &[u8; NAME_LEN]) -> LumpName {
    let end = memchr::memchr(0, raw).unwrap_or(NAME_LEN);
    LumpName::from(&raw[..end])
}

/// Encodes `name` into a zero-padded name field.  Never truncates.
pub fn encode_name(name: &[u8]) -> Result<[u8; NAME_LEN], NameTooLong> {
    if name.len() > NAME_LEN {
        return Err(NameTooLong { name: name.into() });
    }
    let mut field = [0u8; NAME_LEN];
    field[..name.len()].copy_from_slice(name);
    Ok(field)
}
