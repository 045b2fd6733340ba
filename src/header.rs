//! Fixed-layout records: the 12-byte header and the 16-byte infotable entry.
//!
//! ```text
//! offset  size  field
//! 0       4     identifier        "IWAD" | "PWAD"
//! 4       4     lump count        i32 LE
//! 8       4     infotable offset  i32 LE, absolute
//! ```
//!
//! Each infotable entry is `filepos: i32 LE, size: i32 LE, name: [u8; 8]`.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::fmt;
use std::io::{self, Read, Write};
use std::str::FromStr;

use crate::codec::{eof_as, DecodeError, FormatError};
use crate::lump::NAME_LEN;

pub const IWAD_MAGIC: &[u8; 4] = b"IWAD";
pub const PWAD_MAGIC: &[u8; 4] = b"PWAD";

/// Size of the fixed header; lump data starts right after it.
pub const HEADER_SIZE: usize = 12;
/// Size of one infotable entry.
pub const ENTRY_SIZE: usize = 16;

// ── WadKind ──────────────────────────────────────────────────────────────────

/// Role of a container.  Metadata only; nothing here merges patches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WadKind {
    /// A self-contained base archive.
    Iwad,
    /// An archive meant to be loaded over an IWAD.
    #[default]
    Pwad,
}

impl WadKind {
    pub fn identifier(self) -> &'static [u8; 4] {
        match self {
            WadKind::Iwad => IWAD_MAGIC,
            WadKind::Pwad => PWAD_MAGIC,
        }
    }

    pub fn from_identifier(identifier: &[u8; 4]) -> Option<Self> {
        match identifier {
            IWAD_MAGIC => Some(WadKind::Iwad),
            PWAD_MAGIC => Some(WadKind::Pwad),
            _ => None,
        }
    }

    /// Lowercase name used by embedding layers: `"iwad"` or `"pwad"`.
    pub fn as_str(self) -> &'static str {
        match self {
            WadKind::Iwad => "iwad",
            WadKind::Pwad => "pwad",
        }
    }
}

impl fmt::Display for WadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown WAD kind {0:?}, expected \"iwad\" or \"pwad\"")]
pub struct ParseKindError(pub String);

impl FromStr for WadKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("iwad") {
            Ok(WadKind::Iwad)
        } else if s.eq_ignore_ascii_case("pwad") {
            Ok(WadKind::Pwad)
        } else {
            Err(ParseKindError(s.to_owned()))
        }
    }
}

// ── Header ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub kind: WadKind,
    pub lump_count: i32,
    pub infotable_offset: i32,
}

impl Header {
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(self.kind.identifier())?;
        writer.write_i32::<LittleEndian>(self.lump_count)?;
        writer.write_i32::<LittleEndian>(self.infotable_offset)?;
        Ok(())
    }

    /// Reads and validates the header.  Both counts must be non-negative.
    pub fn read<R: Read>(mut reader: R) -> Result<Self, DecodeError> {
        let mut identifier = [0u8; 4];
        reader
            .read_exact(&mut identifier)
            .map_err(eof_as(FormatError::MissingIdentifier))?;
        let kind = WadKind::from_identifier(&identifier)
            .ok_or(FormatError::InvalidIdentifier(identifier))?;

        let lump_count = reader
            .read_i32::<LittleEndian>()
            .map_err(eof_as(FormatError::TruncatedHeader { field: "lump count" }))?;
        if lump_count < 0 {
            return Err(FormatError::InvalidLumpCount(lump_count).into());
        }

        let infotable_offset = reader
            .read_i32::<LittleEndian>()
            .map_err(eof_as(FormatError::TruncatedHeader { field: "infotable offset" }))?;
        if infotable_offset < 0 {
            return Err(FormatError::InvalidInfotableOffset(infotable_offset).into());
        }

        Ok(Self { kind, lump_count, infotable_offset })
    }
}

// ── InfotableEntry ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InfotableEntry {
    pub filepos: i32,
    pub size: i32,
    pub name: [u8; NAME_LEN],
}

impl InfotableEntry {
    pub fn write<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writer.write_i32::<LittleEndian>(self.filepos)?;
        writer.write_i32::<LittleEndian>(self.size)?;
        writer.write_all(&self.name)?;
        Ok(())
    }

    /// Reads the three fields in order.  `index` is only used for errors.
    pub fn read<R: Read>(mut reader: R, index: usize) -> Result<Self, DecodeError> {
        let truncated = || eof_as(FormatError::TruncatedEntry { index });
        let filepos = reader.read_i32::<LittleEndian>().map_err(truncated())?;
        let size = reader.read_i32::<LittleEndian>().map_err(truncated())?;
        let mut name = [0u8; NAME_LEN];
        reader.read_exact(&mut name).map_err(truncated())?;
        Ok(Self { filepos, size, name })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn header_layout() {
        let header = Header { kind: WadKind::Pwad, lump_count: 2, infotable_offset: 31 };
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf, b"PWAD\x02\0\0\0\x1f\0\0\0");
        assert_eq!(buf.len(), HEADER_SIZE);
        assert_eq!(Header::read(Cursor::new(&buf)).unwrap(), header);
    }

    #[test]
    fn bad_identifier() {
        let err = Header::read(Cursor::new(b"ZWAD\0\0\0\0\0\0\0\0")).unwrap_err();
        assert!(matches!(err, DecodeError::Format(FormatError::InvalidIdentifier(id)) if &id == b"ZWAD"));
    }

    #[test]
    fn short_identifier() {
        let err = Header::read(Cursor::new(b"IW")).unwrap_err();
        assert!(matches!(err, DecodeError::Format(FormatError::MissingIdentifier)));
    }

    #[test]
    fn negative_fields() {
        let err = Header::read(Cursor::new(b"IWAD\xff\xff\xff\xff\0\0\0\0")).unwrap_err();
        assert!(matches!(err, DecodeError::Format(FormatError::InvalidLumpCount(-1))));

        let err = Header::read(Cursor::new(b"IWAD\0\0\0\0\xfe\xff\xff\xff")).unwrap_err();
        assert!(matches!(err, DecodeError::Format(FormatError::InvalidInfotableOffset(-2))));
    }

    #[test]
    fn truncated_count() {
        let err = Header::read(Cursor::new(b"PWAD\x01\0")).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::Format(FormatError::TruncatedHeader { field: "lump count" })
        ));
    }

    #[test]
    fn entry_layout() {
        let entry = InfotableEntry { filepos: 12, size: 5, name: *b"TEST\0\0\0\0" };
        let mut buf = Vec::new();
        entry.write(&mut buf).unwrap();
        assert_eq!(buf.len(), ENTRY_SIZE);
        assert_eq!(InfotableEntry::read(Cursor::new(&buf), 0).unwrap(), entry);

        let err = InfotableEntry::read(Cursor::new(&buf[..10]), 3).unwrap_err();
        assert!(matches!(err, DecodeError::Format(FormatError::TruncatedEntry { index: 3 })));
    }

    #[test]
    fn kind_names() {
        assert_eq!("IWAD".parse::<WadKind>().unwrap(), WadKind::Iwad);
        assert_eq!("pwad".parse::<WadKind>().unwrap(), WadKind::Pwad);
        assert!("zip".parse::<WadKind>().is_err());
        assert_eq!(WadKind::Iwad.to_string(), "iwad");
        assert_eq!(WadKind::default(), WadKind::Pwad);
    }
}
