//! High-level API: the surface that embedding layers (scripts, shells, the
//! CLI) call into.
//!
//! Containers cross this boundary as a [`Directory`] plus a kind string.
//! Packing always produces a PWAD unless [`PackOptions`] says otherwise.
//!
//! ```no_run
//! use wadmake::archive::{pack_container, read_container};
//! use wadmake::{Directory, Lump};
//!
//! // Read
//! let (mut lumps, kind) = read_container("doom2.wad")?;
//! println!("{kind}: {lumps}");
//!
//! // Edit and repack
//! if let Some(index) = lumps.find("MAP01", 1) {
//!     lumps.remove(index)?;
//! }
//! lumps.insert(Lump::new("README", b"Hello".to_vec()));
//! let bytes = pack_container(&lumps)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::Cursor;
use std::path::Path;

use log::info;
use serde::Serialize;
use thiserror::Error;

use crate::codec::{self, DecodeError, EncodeError};
use crate::directory::Directory;
use crate::header::{WadKind, HEADER_SIZE};
use crate::lump::Lump;
use crate::wad::Wad;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("could not decode data ({0})")]
    Decode(#[from] DecodeError),
    #[error("could not encode data ({0})")]
    Encode(#[from] EncodeError),
}

// ── PackOptions ──────────────────────────────────────────────────────────────

/// Configuration for [`pack_container_with`] and [`write_container_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackOptions {
    /// Identifier to write.  Defaults to PWAD.
    pub kind: WadKind,
}

// ── LumpInfo ─────────────────────────────────────────────────────────────────

/// Lightweight descriptor returned by [`list`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LumpInfo {
    /// 1-based position in the directory.
    pub index:  usize,
    /// Display form of the name; bytes that are not UTF-8 become U+FFFD.
    pub name:   String,
    /// File offset of the data once the directory is packed.
    pub offset: u64,
    pub size:   usize,
}

impl LumpInfo {
    fn new(index: usize, offset: u64, lump: &Lump) -> Self {
        LumpInfo { index, name: lump.name.to_string(), offset, size: lump.size() }
    }
}

pub fn list(directory: &Directory) -> Vec<LumpInfo> {
    let mut offset = HEADER_SIZE as u64;
    directory
        .iter()
        .enumerate()
        .map(|(i, lump)| {
            let info = LumpInfo::new(i + 1, offset, lump);
            offset += lump.size() as u64;
            info
        })
        .collect()
}

// ── Reading ──────────────────────────────────────────────────────────────────

/// A new, empty directory.
pub fn create_directory() -> Directory {
    Directory::new()
}

/// Loads the WAD at `path`.  Returns its directory and `"iwad"` or `"pwad"`.
pub fn read_container<P: AsRef<Path>>(path: P) -> Result<(Directory, String), ArchiveError> {
    let path = path.as_ref();
    let wad = Wad::open(path)?;
    info!("read {} ({}, {})", path.display(), wad.kind, wad.directory);
    Ok(split(wad))
}

/// Parses WAD data held in memory.
pub fn parse_container(bytes: &[u8]) -> Result<(Directory, String), ArchiveError> {
    let wad = codec::decode(Cursor::new(bytes))?;
    Ok(split(wad))
}

fn split(wad: Wad) -> (Directory, String) {
    (wad.directory, wad.kind.as_str().to_owned())
}

// ── Writing ──────────────────────────────────────────────────────────────────

/// Encodes `directory` as a PWAD.
pub fn pack_container(directory: &Directory) -> Result<Vec<u8>, ArchiveError> {
    pack_container_with(directory, PackOptions::default())
}

pub fn pack_container_with(directory: &Directory, opts: PackOptions) -> Result<Vec<u8>, ArchiveError> {
    Ok(codec::directory_to_vec(opts.kind, directory)?)
}

/// Encodes `directory` as a PWAD into `path`, creating or truncating it.
pub fn write_container<P: AsRef<Path>>(directory: &Directory, path: P) -> Result<(), ArchiveError> {
    write_container_with(directory, path, PackOptions::default())
}

pub fn write_container_with<P: AsRef<Path>>(
    directory: &Directory,
    path: P,
    opts: PackOptions,
) -> Result<(), ArchiveError> {
    let path = path.as_ref();
    let bytes = pack_container_with(directory, opts)?;
    std::fs::write(path, bytes).map_err(EncodeError::from)?;
    info!("wrote {} ({}, {})", path.display(), opts.kind, directory);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pack_is_always_pwad() {
        let mut dir = create_directory();
        dir.insert(Lump::new("A", "1"));
        let bytes = pack_container(&dir).unwrap();
        assert_eq!(&bytes[..4], b"PWAD");

        let (back, kind) = parse_container(&bytes).unwrap();
        assert_eq!(kind, "pwad");
        assert_eq!(back, dir);
    }

    #[test]
    fn pack_with_kind() {
        let bytes = pack_container_with(&Directory::new(), PackOptions { kind: WadKind::Iwad }).unwrap();
        let (_, kind) = parse_container(&bytes).unwrap();
        assert_eq!(kind, "iwad");
    }

    #[test]
    fn list_is_one_based() {
        let mut dir = create_directory();
        dir.insert(Lump::new("MAP01", ""));
        dir.insert(Lump::new("THINGS", vec![0u8; 20]));
        dir.insert(Lump::new("LINEDEFS", vec![0u8; 7]));
        let infos = list(&dir);
        assert_eq!(infos[1], LumpInfo { index: 2, name: "THINGS".into(), offset: 12, size: 20 });
        assert_eq!(infos[2].offset, 32);
        assert_eq!(
            serde_json::to_string(&infos[0]).unwrap(),
            r#"{"index":1,"name":"MAP01","offset":12,"size":0}"#
        );
    }

    #[test]
    fn list_offsets_match_packed_file() {
        let mut dir = create_directory();
        dir.insert(Lump::new("A", "hissy"));
        dir.insert(Lump::new(&b"\x80B"[..], "god only knows"));
        let bytes = pack_container(&dir).unwrap();
        for info in list(&dir) {
            let start = info.offset as usize;
            assert_eq!(&bytes[start..start + info.size], dir.get(info.index).unwrap().data);
        }
        assert_eq!(list(&dir)[1].name, "\u{fffd}B");
    }

    #[test]
    fn errors_are_wrapped() {
        let err = parse_container(b"nope").unwrap_err();
        assert!(matches!(err, ArchiveError::Decode(_)));
        assert_eq!(err.to_string(), "could not decode data (invalid WAD identifier nope)");

        let mut dir = create_directory();
        dir.insert(Lump::new("MUCHTOOLONG", ""));
        assert!(matches!(pack_container(&dir), Err(ArchiveError::Encode(_))));
    }
}
