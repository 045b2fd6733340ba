use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

use crate::codec::{self, DecodeError, EncodeError};
use crate::directory::Directory;
use crate::header::WadKind;

/// A WAD container: its kind and exactly one directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wad {
    pub kind:      WadKind,
    pub directory: Directory,
}

impl Wad {
    /// An empty container of the given kind.
    pub fn new(kind: WadKind) -> Self {
        Self { kind, directory: Directory::new() }
    }

    pub fn with_directory(kind: WadKind, directory: Directory) -> Self {
        Self { kind, directory }
    }

    pub fn decode<R: Read + Seek>(reader: R) -> Result<Self, DecodeError> {
        codec::decode(reader)
    }

    pub fn encode<W: Write>(&self, writer: W) -> Result<(), EncodeError> {
        codec::encode(writer, self)
    }

    /// Decodes the file at `path`.  The file is closed before returning.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DecodeError> {
        let file = File::open(path)?;
        codec::decode(BufReader::new(file))
    }

    /// Encodes into `path`, creating or truncating it.  The file is only
    /// touched once the whole container has encoded successfully.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EncodeError> {
        let bytes = codec::encode_to_vec(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}
