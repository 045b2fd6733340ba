//! Reader and writer for WAD containers: named lumps plus a directory
//! ("infotable") recording each lump's name, offset and size.
//!
//! ```no_run
//! use wadmake::{Lump, Wad, WadKind};
//!
//! let mut wad = Wad::new(WadKind::Pwad);
//! wad.directory.insert(Lump::new("TEST", b"hissy".to_vec()));
//! wad.save("test.wad")?;
//!
//! let wad = Wad::open("test.wad")?;
//! assert_eq!(wad.directory.find("TEST", 1), Some(1));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod archive;
pub mod codec;
pub mod directory;
pub mod header;
pub mod lump;
pub mod wad;

pub use codec::{decode, encode, DecodeError, EncodeError, FormatError};
pub use directory::{ArgumentError, Directory, LumpPatch};
pub use header::WadKind;
pub use lump::{Lump, LumpName};
pub use wad::Wad;
