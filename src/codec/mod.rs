//! WAD decoder and encoder.
//!
//! # Decoding
//! [`decode`] reads the header, seeks to the infotable and walks its entries
//! in order.  Lump data lives at independent offsets that may sit before,
//! after or between infotable entries, so every non-empty lump is fetched by
//! an independent random-access read: remember the infotable cursor, seek to
//! `filepos`, read `size` bytes, seek back.
//!
//! A zero-size lump never touches the stream.  Its `filepos` is not
//! validated, since third-party tools write arbitrary values there.
//!
//! # Encoding
//! [`encode`] always writes a fresh, self-consistent layout:
//!
//! ```text
//! header (12) | lump data, directory order, unpadded | infotable (16 per lump)
//! ```
//!
//! The infotable offset depends on the total data size, so the data block and
//! the infotable are buffered separately and written after the header once
//! every lump has been accounted for.  Any offset or size that does not fit
//! in an `i32` is an error, never a silent wrap.

use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use log::{debug, trace, warn};
use thiserror::Error;

use crate::directory::Directory;
use crate::header::{Header, InfotableEntry, WadKind, ENTRY_SIZE, HEADER_SIZE};
use crate::lump::{decode_name, encode_name, Lump, LumpName};
use crate::wad::Wad;

// ── Errors ───────────────────────────────────────────────────────────────────

/// The input is not a well-formed WAD.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("could not read WAD identifier")]
    MissingIdentifier,
    #[error("invalid WAD identifier {}", String::from_utf8_lossy(.0))]
    InvalidIdentifier([u8; 4]),
    #[error("truncated header: could not read {field}")]
    TruncatedHeader { field: &'static str },
    #[error("invalid lump count {0}")]
    InvalidLumpCount(i32),
    #[error("infotable offset {0} out of range")]
    InvalidInfotableOffset(i32),
    #[error("truncated infotable: could not read entry {index}")]
    TruncatedEntry { index: usize },
    #[error("lump {index} filepos {filepos} out of range")]
    NegativeFilepos { index: usize, filepos: i32 },
    #[error("truncated data for lump {index}: expected {expected} bytes at offset {filepos}, got {actual}")]
    TruncatedData {
        index:    usize,
        filepos:  i32,
        expected: usize,
        actual:   usize,
    },
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Error, Debug)]
pub enum EncodeError {
    #[error("too many lumps: {0}")]
    TooManyLumps(usize),
    #[error("lump {index} name {name:?} is longer than 8 bytes")]
    NameTooLong { index: usize, name: LumpName },
    #[error("could not write position of lump {index}: offset exceeds i32")]
    PositionOverflow { index: usize },
    #[error("could not write size of lump {index}: {size} bytes exceeds i32")]
    SizeOverflow { index: usize, size: usize },
    #[error("infotable offset exceeds i32")]
    InfotableOverflow,
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Maps an unexpected EOF to `format`; any other I/O error passes through.
pub(crate) fn eof_as(format: FormatError) -> impl FnOnce(io::Error) -> DecodeError {
    move |err| match err.kind() {
        io::ErrorKind::UnexpectedEof => DecodeError::Format(format),
        _ => DecodeError::Io(err),
    }
}

// ── Decoder ──────────────────────────────────────────────────────────────────

/// Decodes a complete WAD.  All-or-nothing: no partial directory is
/// returned on error.
pub fn decode<R: Read + Seek>(mut reader: R) -> Result<Wad, DecodeError> {
    let header = Header::read(&mut reader)?;
    debug!(
        "{} header: {} lumps, infotable at {}",
        header.kind, header.lump_count, header.infotable_offset
    );

    reader
        .seek(SeekFrom::Start(header.infotable_offset as u64))
        .map_err(|_| FormatError::InvalidInfotableOffset(header.infotable_offset))?;

    let mut wad = Wad::new(header.kind);
    for index in 0..header.lump_count as usize {
        let entry = InfotableEntry::read(&mut reader, index)?;
        let name = decode_name(&entry.name);

        let data = if entry.size > 0 {
            read_lump_data(&mut reader, index, &entry)?
        } else {
            if entry.size < 0 || entry.filepos < 0 {
                warn!(
                    "lump {index} ({name}) has size {} at filepos {}, treating as empty",
                    entry.size, entry.filepos
                );
            }
            Vec::new()
        };

        debug!("lump {index}: {name:?}, {} bytes at {}", data.len(), entry.filepos);
        wad.directory.insert(Lump { name, data });
    }

    Ok(wad)
}

/// Decodes a WAD held in memory.
pub fn decode_slice(bytes: &[u8]) -> Result<Wad, DecodeError> {
    decode(Cursor::new(bytes))
}

fn read_lump_data<R: Read + Seek>(
    reader: &mut R,
    index: usize,
    entry: &InfotableEntry,
) -> Result<Vec<u8>, DecodeError> {
    if entry.filepos < 0 {
        return Err(FormatError::NegativeFilepos { index, filepos: entry.filepos }.into());
    }

    let resume = reader.stream_position()?;
    trace!("seek {resume} -> {}", entry.filepos);
    reader.seek(SeekFrom::Start(entry.filepos as u64))?;

    // Bounded read: an absurd size from an untrusted file fails as truncated
    // instead of allocating up front.
    let expected = entry.size as usize;
    let mut data = Vec::new();
    reader.by_ref().take(expected as u64).read_to_end(&mut data)?;
    if data.len() < expected {
        return Err(FormatError::TruncatedData {
            index,
            filepos: entry.filepos,
            expected,
            actual: data.len(),
        }
        .into());
    }

    trace!("seek {} -> {resume}", entry.filepos as usize + expected);
    reader.seek(SeekFrom::Start(resume))?;
    Ok(data)
}

// ── Encoder ──────────────────────────────────────────────────────────────────

/// Encodes `wad` into `writer`.  Nothing is written unless the whole
/// directory is encodable.
pub fn encode<W: Write>(writer: W, wad: &Wad) -> Result<(), EncodeError> {
    encode_directory(writer, wad.kind, &wad.directory)
}

/// Encodes a borrowed directory under the given kind.
pub fn encode_directory<W: Write>(
    mut writer: W,
    kind: WadKind,
    directory: &Directory,
) -> Result<(), EncodeError> {
    let lumps = directory.lumps();
    let lump_count = checked_lump_count(lumps.len())?;
    let Layout { entries, infotable_offset } = layout(lumps.iter().map(Lump::size))?;

    let mut data_block = Vec::with_capacity(directory.total_data_size());
    let mut infotable = Vec::with_capacity(lumps.len() * ENTRY_SIZE);

    for (index, (lump, &(filepos, size))) in lumps.iter().zip(&entries).enumerate() {
        let name = encode_name(lump.name.as_bytes())
            .map_err(|e| EncodeError::NameTooLong { index, name: e.name })?;

        data_block.extend_from_slice(&lump.data);
        InfotableEntry { filepos, size, name }.write(&mut infotable)?;
        debug!("lump {index}: {:?}, {size} bytes at {filepos}", lump.name);
    }

    let header = Header { kind, lump_count, infotable_offset };
    debug!("{kind} header: {lump_count} lumps, infotable at {infotable_offset}");
    header.write(&mut writer)?;
    writer.write_all(&data_block)?;
    writer.write_all(&infotable)?;
    writer.flush()?;
    Ok(())
}

/// Where every lump lands in an encoded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Layout {
    /// `(filepos, size)` per lump, in directory order.
    pub entries:          Vec<(i32, i32)>,
    pub infotable_offset: i32,
}

/// Lays out lumps of the given data sizes: each one starts right after the
/// previous, the first one right after the header, and the infotable
/// follows the last.
pub(crate) fn layout<I: IntoIterator<Item = usize>>(sizes: I) -> Result<Layout, EncodeError> {
    let mut entries = Vec::new();
    let mut position = HEADER_SIZE as u64;

    for (index, size) in sizes.into_iter().enumerate() {
        let filepos = i32::try_from(position).map_err(|_| EncodeError::PositionOverflow { index })?;
        let stored = i32::try_from(size).map_err(|_| EncodeError::SizeOverflow { index, size })?;
        entries.push((filepos, stored));
        position += size as u64;
    }

    let infotable_offset = i32::try_from(position).map_err(|_| EncodeError::InfotableOverflow)?;
    Ok(Layout { entries, infotable_offset })
}

fn checked_lump_count(len: usize) -> Result<i32, EncodeError> {
    i32::try_from(len).map_err(|_| EncodeError::TooManyLumps(len))
}

/// Encodes `wad` into a new buffer.
pub fn encode_to_vec(wad: &Wad) -> Result<Vec<u8>, EncodeError> {
    directory_to_vec(wad.kind, &wad.directory)
}

pub fn directory_to_vec(kind: WadKind, directory: &Directory) -> Result<Vec<u8>, EncodeError> {
    let mut buffer =
        Vec::with_capacity(HEADER_SIZE + directory.total_data_size() + directory.len() * ENTRY_SIZE);
    encode_directory(&mut buffer, kind, directory)?;
    Ok(buffer)
}
