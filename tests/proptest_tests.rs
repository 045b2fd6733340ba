//! Property-based tests for the codec and the directory operations.

use proptest::prelude::*;
use wadmake::archive::{pack_container, parse_container};
use wadmake::codec::{decode_slice, encode_to_vec};
use wadmake::{Directory, Lump, Wad, WadKind};

fn lump_strategy() -> impl Strategy<Value = Lump> {
    ("[A-Z0-9_]{0,8}", proptest::collection::vec(any::<u8>(), 0..64))
        .prop_map(|(name, data)| Lump::new(name, data))
}

fn directory_strategy() -> impl Strategy<Value = Directory> {
    proptest::collection::vec(lump_strategy(), 0..16).prop_map(Directory::from)
}

fn kind_strategy() -> impl Strategy<Value = WadKind> {
    prop_oneof![Just(WadKind::Iwad), Just(WadKind::Pwad)]
}

proptest! {
    /// Packing then parsing reproduces the lumps; the kind is always PWAD.
    #[test]
    fn pack_parse_roundtrip(dir in directory_strategy()) {
        let bytes = pack_container(&dir).unwrap();
        let (back, kind) = parse_container(&bytes).unwrap();
        prop_assert_eq!(kind, "pwad");
        prop_assert_eq!(back, dir);
    }

    /// The encoder's layout is fully determined by the directory.
    #[test]
    fn encoded_size_matches_layout(dir in directory_strategy(), kind in kind_strategy()) {
        let bytes = encode_to_vec(&Wad::with_directory(kind, dir.clone())).unwrap();
        prop_assert_eq!(bytes.len(), 12 + dir.total_data_size() + 16 * dir.len());
        prop_assert_eq!(&bytes[..4], kind.identifier());
    }

    /// decode(encode(decode(x))) == decode(x) for codec-produced x.
    #[test]
    fn reencode_is_idempotent(dir in directory_strategy(), kind in kind_strategy()) {
        let x = encode_to_vec(&Wad::with_directory(kind, dir)).unwrap();
        let once = decode_slice(&x).unwrap();
        let twice = decode_slice(&encode_to_vec(&once).unwrap()).unwrap();
        prop_assert_eq!(twice, once);
    }

    /// Start 0 behaves like start 1, and any hit really has that name.
    #[test]
    fn find_start_zero_is_start_one(dir in directory_strategy(), name in "[A-Z]{0,2}", start in -20isize..20) {
        prop_assert_eq!(dir.find(&name, 0), dir.find(&name, 1));
        if let Some(index) = dir.find(&name, start) {
            prop_assert_eq!(&dir.get(index).unwrap().name, &name);
        }
        if start > dir.len() as isize {
            prop_assert_eq!(dir.find(&name, start), None);
        }
    }

    /// Inserting at a valid position and removing it again is a no-op.
    #[test]
    fn insert_then_remove(dir in directory_strategy(), lump in lump_strategy(), pos in 1usize..20) {
        let mut edited = dir.clone();
        if pos <= dir.len() {
            edited.insert_at(pos, lump.clone()).unwrap();
            prop_assert_eq!(edited.get(pos), Some(&lump));
            prop_assert_eq!(edited.remove(pos).unwrap(), lump);
        } else {
            prop_assert!(edited.insert_at(pos, lump).is_err());
        }
        prop_assert_eq!(edited, dir);
    }
}
