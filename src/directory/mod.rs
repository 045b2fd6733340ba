//! The in-memory directory: an ordered list of lumps.
//!
//! Order is meaningful.  It is the on-disk layout order and the basis for
//! every positional operation.  Storage is 0-based; the caller-facing
//! operations (`find`, `get`, `insert_at`, `remove`, `set`) take 1-based
//! positions and check them against `[1, len]`.

use std::fmt;

use thiserror::Error;

use crate::lump::{Lump, LumpName};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("bad argument '{parameter}': index {index} out of range 1..={len}")]
    IndexOutOfRange {
        parameter: &'static str,
        index:     usize,
        len:       usize,
    },
    #[error("bad argument: set needs a name, data, or both")]
    EmptyPatch,
}

/// Partial replacement for [`Directory::set`].  Absent fields keep the
/// existing lump's value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LumpPatch {
    pub name: Option<LumpName>,
    pub data: Option<Vec<u8>>,
}

impl LumpPatch {
    pub fn name(name: impl Into<LumpName>) -> Self {
        Self { name: Some(name.into()), data: None }
    }

    pub fn data(data: impl Into<Vec<u8>>) -> Self {
        Self { name: None, data: Some(data.into()) }
    }

    pub fn both(name: impl Into<LumpName>, data: impl Into<Vec<u8>>) -> Self {
        Self { name: Some(name.into()), data: Some(data.into()) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    lumps: Vec<Lump>,
}

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lumps.is_empty()
    }

    pub fn lumps(&self) -> &[Lump] {
        &self.lumps
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Lump> {
        self.lumps.iter()
    }

    /// Sum of all lump data lengths.
    pub fn total_data_size(&self) -> usize {
        self.lumps.iter().map(Lump::size).sum()
    }

    // ── Lookup ───────────────────────────────────────────────────────────────

    /// Linear scan from the 0-based `start`.  Returns the 0-based index of
    /// the first lump whose name is byte-equal to `name`.
    pub fn search(&self, name: impl AsRef<[u8]>, start: usize) -> Option<usize> {
        let name = name.as_ref();
        self.lumps
            .get(start..)?
            .iter()
            .position(|lump| lump.name.as_bytes() == name)
            .map(|offset| start + offset)
    }

    /// Caller-facing search with a 1-based `start`.
    ///
    /// `0` means the first lump and negative values count back from the end
    /// (`-1` is the last lump).  A start past the end is simply not found.
    pub fn find(&self, name: impl AsRef<[u8]>, start: isize) -> Option<usize> {
        let len = self.lumps.len() as isize;
        let start = match start {
            0 => 1,
            s if s < 0 => (len + s + 1).max(1),
            s => s,
        };
        if start > len {
            return None;
        }
        self.search(name, (start - 1) as usize).map(|i| i + 1)
    }

    /// Lump at the 1-based `index`, or `None` when out of range.
    pub fn get(&self, index: usize) -> Option<&Lump> {
        index.checked_sub(1).and_then(|i| self.lumps.get(i))
    }

    // ── Mutation ─────────────────────────────────────────────────────────────

    /// Appends a lump.  Always succeeds.
    pub fn insert(&mut self, lump: Lump) {
        self.lumps.push(lump);
    }

    /// Inserts before the 1-based `index`, shifting later lumps up.
    ///
    /// `index` must name an existing lump; use [`insert`](Self::insert) to
    /// append.
    pub fn insert_at(&mut self, index: usize, lump: Lump) -> Result<(), ArgumentError> {
        let i = self.check_index(index)?;
        self.lumps.insert(i, lump);
        Ok(())
    }

    /// Removes and returns the lump at the 1-based `index`.
    pub fn remove(&mut self, index: usize) -> Result<Lump, ArgumentError> {
        let i = self.check_index(index)?;
        Ok(self.lumps.remove(i))
    }

    /// Replaces the name and/or data of the lump at the 1-based `index`.
    pub fn set(&mut self, index: usize, patch: LumpPatch) -> Result<(), ArgumentError> {
        let i = self.check_index(index)?;
        let lump = &mut self.lumps[i];
        match patch {
            LumpPatch { name: Some(name), data: Some(data) } => *lump = Lump { name, data },
            LumpPatch { name: Some(name), data: None } => lump.name = name,
            LumpPatch { name: None, data: Some(data) } => lump.data = data,
            LumpPatch { name: None, data: None } => return Err(ArgumentError::EmptyPatch),
        }
        Ok(())
    }

    pub fn rename(&mut self, index: usize, name: impl Into<LumpName>) -> Result<(), ArgumentError> {
        self.set(index, LumpPatch::name(name))
    }

    fn check_index(&self, index: usize) -> Result<usize, ArgumentError> {
        if index < 1 || index > self.lumps.len() {
            return Err(ArgumentError::IndexOutOfRange {
                parameter: "index",
                index,
                len: self.lumps.len(),
            });
        }
        Ok(index - 1)
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.lumps.len() {
            1 => write!(f, "Lumps: 1 lump"),
            n => write!(f, "Lumps: {n} lumps"),
        }
    }
}

impl From<Vec<Lump>> for Directory {
    fn from(lumps: Vec<Lump>) -> Self {
        Self { lumps }
    }
}

impl FromIterator<Lump> for Directory {
    fn from_iter<I: IntoIterator<Item = Lump>>(iter: I) -> Self {
        Self { lumps: iter.into_iter().collect() }
    }
}

impl Extend<Lump> for Directory {
    fn extend<I: IntoIterator<Item = Lump>>(&mut self, iter: I) {
        self.lumps.extend(iter);
    }
}

impl IntoIterator for Directory {
    type Item = Lump;
    type IntoIter = std::vec::IntoIter<Lump>;

    fn into_iter(self) -> Self::IntoIter {
        self.lumps.into_iter()
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a Lump;
    type IntoIter = std::slice::Iter<'a, Lump>;

    fn into_iter(self) -> Self::IntoIter {
        self.lumps.iter()
    }
}
