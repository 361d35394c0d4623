//! Trie decoder for the `.dir` stream.
//!
//! The stream is a flat sequence of two-byte records `(byte, command)`.
//! Paths share prefixes through an explicit stack of saved path buffers: a
//! branching record pushes a snapshot of the current path before appending,
//! and every finalized entry restores the most recent snapshot so that the
//! next sibling continues from the shared prefix.
//!
//! Decoding ends when an entry is finalized with an empty stack. Bytes after
//! that point are never looked at.

use dirpak_common::BinaryReader;

use crate::{DirEntry, Error, Result};

/// Node types a record can carry in its command byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeCommand {
    /// Append the byte and stay on the current branch.
    Append = 0x40,
    /// Save the current path, then append the byte.
    Branch = 0xC0,
    /// Append the byte and finalize an entry.
    Terminal = 0x08,
    /// Save the current path, append the byte and finalize an entry.
    BranchTerminal = 0x88,
}

impl NodeCommand {
    /// Whether this record saves the current path before appending.
    #[inline]
    pub fn pushes(self) -> bool {
        matches!(self, Self::Branch | Self::BranchTerminal)
    }

    /// Whether this record completes a path.
    #[inline]
    pub fn finalizes(self) -> bool {
        matches!(self, Self::Terminal | Self::BranchTerminal)
    }
}

impl TryFrom<u8> for NodeCommand {
    type Error = u8;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0x40 => Ok(Self::Append),
            0xC0 => Ok(Self::Branch),
            0x08 => Ok(Self::Terminal),
            0x88 => Ok(Self::BranchTerminal),
            other => Err(other),
        }
    }
}

/// Decode a `.dir` stream into its entries, in the order they are finalized.
///
/// Duplicate paths are kept; [`DirTable`](crate::DirTable) collapses them.
/// An empty stream decodes to no entries.
pub fn parse_dir_entries(data: &[u8]) -> Result<Vec<DirEntry>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }
    DirFileReader::new(data).read_all()
}

/// Working state for one decode pass.
struct DirFileReader<'a> {
    reader: BinaryReader<'a>,
    current: Vec<u8>,
    stack: Vec<Vec<u8>>,
    entries: Vec<DirEntry>,
}

impl<'a> DirFileReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self {
            reader: BinaryReader::new(data),
            current: Vec::new(),
            stack: Vec::new(),
            entries: Vec::new(),
        }
    }

    fn read_all(mut self) -> Result<Vec<DirEntry>> {
        while !self.read_next()? {}
        Ok(self.entries)
    }

    /// Consume one record. Returns `true` once the tree is closed.
    fn read_next(&mut self) -> Result<bool> {
        let record_offset = self.reader.position();
        let byte = self.read_u8()?;
        let command = self.read_u8()?;
        let command = NodeCommand::try_from(command).map_err(|command| Error::UnknownCommand {
            command,
            offset: record_offset + 1,
        })?;

        if command.pushes() {
            self.stack.push(self.current.clone());
        }
        self.current.push(byte);

        if command.finalizes() {
            return self.finalize_entry();
        }
        Ok(false)
    }

    fn finalize_entry(&mut self) -> Result<bool> {
        let trailer_offset = self.reader.position();
        let offset = self.read_u32()?;
        let length = self.read_u32()?;
        let path = ascii_path(&self.current, trailer_offset)?;
        self.entries.push(DirEntry::new(path, offset, length));

        match self.stack.pop() {
            Some(saved) => {
                self.current = saved;
                Ok(false)
            }
            None => Ok(true),
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        self.reader.read_u8().map_err(|_| self.truncated())
    }

    fn read_u32(&mut self) -> Result<u32> {
        self.reader.read_u32().map_err(|_| self.truncated())
    }

    fn truncated(&self) -> Error {
        Error::Truncated {
            offset: self.reader.len(),
            open_branches: self.stack.len(),
        }
    }
}

fn ascii_path(bytes: &[u8], trailer_offset: usize) -> Result<String> {
    if let Some(&byte) = bytes.iter().find(|b| !b.is_ascii()) {
        return Err(Error::NonAsciiPath {
            path: String::from_utf8_lossy(bytes).into_owned(),
            byte,
            trailer_offset,
        });
    }
    // All bytes are ASCII, so this is valid UTF-8.
    Ok(bytes.iter().map(|&b| b as char).collect())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    const PROPTEST_CASES: u32 = 64;

    /// Append one finalize trailer.
    fn trailer(out: &mut Vec<u8>, offset: u32, length: u32) {
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&length.to_le_bytes());
    }

    /// Encode entries without prefix sharing: every entry but the last opens
    /// with a push of the empty path, so each finalize pops back to the root.
    pub(crate) fn encode_flat(entries: &[(&str, u32, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        for (i, &(path, offset, length)) in entries.iter().enumerate() {
            let last_entry = i + 1 == entries.len();
            let bytes = path.as_bytes();
            for (j, &b) in bytes.iter().enumerate() {
                let first = j == 0;
                let last = j + 1 == bytes.len();
                let command = match (first && !last_entry, last) {
                    (true, true) => 0x88,
                    (true, false) => 0xC0,
                    (false, true) => 0x08,
                    (false, false) => 0x40,
                };
                out.extend_from_slice(&[b, command]);
            }
            trailer(&mut out, offset, length);
        }
        out
    }

    /// Encode sorted, unique, non-empty paths as a prefix-sharing trie.
    ///
    /// Siblings at a node are walked in order; every sibling but the last
    /// pushes the shared prefix on its first record. A path that is itself a
    /// prefix of later paths becomes a terminal sibling ahead of the branch
    /// that continues past it.
    pub(crate) fn encode_trie(entries: &[(&str, u32, u32)]) -> Vec<u8> {
        let mut out = Vec::new();
        if !entries.is_empty() {
            encode_node(entries, 0, &mut out);
        }
        out
    }

    fn encode_node(entries: &[(&str, u32, u32)], depth: usize, out: &mut Vec<u8>) {
        let mut siblings: Vec<(u8, &[(&str, u32, u32)], bool)> = Vec::new();
        let mut start = 0;
        while start < entries.len() {
            let byte = entries[start].0.as_bytes()[depth];
            let end = start
                + entries[start..]
                    .iter()
                    .take_while(|e| e.0.as_bytes()[depth] == byte)
                    .count();
            let mut group = &entries[start..end];
            if group[0].0.len() == depth + 1 {
                siblings.push((byte, &group[..1], true));
                group = &group[1..];
            }
            if !group.is_empty() {
                siblings.push((byte, group, false));
            }
            start = end;
        }

        let count = siblings.len();
        for (i, (byte, group, terminal)) in siblings.into_iter().enumerate() {
            let command = match (i + 1 < count, terminal) {
                (true, true) => 0x88,
                (true, false) => 0xC0,
                (false, true) => 0x08,
                (false, false) => 0x40,
            };
            out.extend_from_slice(&[byte, command]);
            if terminal {
                let (_, offset, length) = group[0];
                trailer(out, offset, length);
            } else {
                encode_node(group, depth + 1, out);
            }
        }
    }

    /// `a/x.txt` and `a/y.txt` sharing the `a/` prefix.
    pub(crate) fn shared_prefix_stream() -> Vec<u8> {
        let mut out = vec![b'a', 0x40, b'/', 0x40];
        // Save "a/" and walk the first sibling.
        out.extend_from_slice(&[b'x', 0xC0, b'.', 0x40, b't', 0x40, b'x', 0x40, b't', 0x08]);
        trailer(&mut out, 0, 6);
        // Back at "a/": the second sibling has nothing left to share.
        out.extend_from_slice(&[b'y', 0x40, b'.', 0x40, b't', 0x40, b'x', 0x40, b't', 0x08]);
        trailer(&mut out, 6, 21);
        out
    }

    fn triples(entries: &[DirEntry]) -> Vec<(&str, u32, u32)> {
        entries
            .iter()
            .map(|e| (e.path(), e.offset(), e.length()))
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_dir_entries(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_single_entry() {
        let data = encode_flat(&[("readme.txt", 0x10, 0x20)]);
        let entries = parse_dir_entries(&data).unwrap();
        assert_eq!(triples(&entries), vec![("readme.txt", 0x10, 0x20)]);
    }

    #[test]
    fn test_flat_entries_keep_finalize_order() {
        let expected = [
            ("z.bin", 100, 4),
            ("a", 0, 1),
            ("gfx/car.tga", 7, 300),
            ("b", 1, 2),
        ];
        let data = encode_flat(&expected);
        let entries = parse_dir_entries(&data).unwrap();
        assert_eq!(triples(&entries), expected.to_vec());
    }

    #[test]
    fn test_shared_prefix() {
        let entries = parse_dir_entries(&shared_prefix_stream()).unwrap();
        assert_eq!(
            triples(&entries),
            vec![("a/x.txt", 0, 6), ("a/y.txt", 6, 21)]
        );
    }

    #[test]
    fn test_nested_branches() {
        // Tree: "d/" -> { "a" , "b/" -> { "1", "2" } }, closed by "e".
        let mut data = Vec::new();
        // Root push so "e" can follow the "d/" subtree.
        data.extend_from_slice(&[b'd', 0xC0, b'/', 0x40]);
        data.extend_from_slice(&[b'a', 0x88]);
        trailer(&mut data, 1, 1);
        data.extend_from_slice(&[b'b', 0x40, b'/', 0x40, b'1', 0x88]);
        trailer(&mut data, 2, 2);
        data.extend_from_slice(&[b'2', 0x08]);
        trailer(&mut data, 3, 3);
        data.extend_from_slice(&[b'e', 0x08]);
        trailer(&mut data, 4, 4);

        let entries = parse_dir_entries(&data).unwrap();
        assert_eq!(
            triples(&entries),
            vec![("d/a", 1, 1), ("d/b/1", 2, 2), ("d/b/2", 3, 3), ("e", 4, 4)]
        );
    }

    #[test]
    fn test_trailing_bytes_are_ignored() {
        let mut data = encode_flat(&[("a", 1, 2)]);
        data.extend_from_slice(&[0xDE, 0xAD, 0xBE]);
        let entries = parse_dir_entries(&data).unwrap();
        assert_eq!(triples(&entries), vec![("a", 1, 2)]);
    }

    #[test]
    fn test_unknown_command() {
        let data = [b'a', 0x40, b'b', 0x00];
        match parse_dir_entries(&data) {
            Err(Error::UnknownCommand { command, offset }) => {
                assert_eq!(command, 0x00);
                assert_eq!(offset, 3);
            }
            other => panic!("expected UnknownCommand, got {:?}", other),
        }
    }

    #[test]
    fn test_dangling_append_is_truncated() {
        let data = [b'a', 0x40];
        assert!(matches!(
            parse_dir_entries(&data),
            Err(Error::Truncated { offset: 2, .. })
        ));
    }

    #[test]
    fn test_odd_trailing_byte_is_truncated() {
        let data = [b'a', 0x40, b'b'];
        assert!(matches!(
            parse_dir_entries(&data),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_short_trailer_is_truncated() {
        let data = [b'a', 0x08, 0x01, 0x00, 0x00, 0x00, 0x02];
        assert!(matches!(
            parse_dir_entries(&data),
            Err(Error::Truncated { .. })
        ));
    }

    #[test]
    fn test_unbalanced_push_is_truncated() {
        // The pushed root is restored after "a", so a sibling must follow.
        let mut data = vec![b'a', 0x88];
        trailer(&mut data, 0, 0);
        assert!(matches!(
            parse_dir_entries(&data),
            Err(Error::Truncated { offset: 10, .. })
        ));
    }

    #[test]
    fn test_non_ascii_path() {
        // The bad byte sits at offset 2; its path is finalized by the record
        // ending at offset 4, where the trailer begins.
        let mut data = vec![b'a', 0x40, 0xE9, 0x08];
        trailer(&mut data, 0, 0);
        match parse_dir_entries(&data) {
            Err(Error::NonAsciiPath {
                path,
                byte,
                trailer_offset,
            }) => {
                assert_eq!(byte, 0xE9);
                assert_eq!(trailer_offset, 4);
                assert!(path.starts_with('a'));
            }
            other => panic!("expected NonAsciiPath, got {:?}", other),
        }
    }

    #[test]
    fn test_trie_encoder_shares_prefixes() {
        let entries = [("a/x.txt", 0, 6), ("a/y.txt", 6, 21)];
        assert_eq!(encode_trie(&entries), shared_prefix_stream());
    }

    #[test]
    fn test_path_that_prefixes_another() {
        let expected = [("a", 1, 1), ("ab", 2, 2), ("abc/d", 3, 3), ("b", 4, 4)];
        let entries = parse_dir_entries(&encode_trie(&expected)).unwrap();
        assert_eq!(triples(&entries), expected.to_vec());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

        #[test]
        fn trie_decodes_to_input_triples(
            paths in prop::collection::btree_map(
                "[ab/.]{1,6}",
                (any::<u32>(), any::<u32>()),
                1..24,
            ),
        ) {
            let expected: Vec<(&str, u32, u32)> = paths
                .iter()
                .map(|(path, &(offset, length))| (path.as_str(), offset, length))
                .collect();

            let data = encode_trie(&expected);
            let entries = parse_dir_entries(&data).unwrap();
            prop_assert_eq!(triples(&entries), expected);
        }

        #[test]
        fn trie_decode_stops_at_tree_end(
            paths in prop::collection::btree_set("[a-d/]{1,5}", 1..16),
            garbage in prop::collection::vec(any::<u8>(), 0..8),
        ) {
            let expected: Vec<(&str, u32, u32)> = paths
                .iter()
                .enumerate()
                .map(|(i, path)| (path.as_str(), i as u32, 1))
                .collect();

            let mut data = encode_trie(&expected);
            data.extend_from_slice(&garbage);
            let entries = parse_dir_entries(&data).unwrap();
            prop_assert_eq!(triples(&entries), expected);
        }
    }

    #[test]
    fn test_node_command_roundtrip() {
        for command in [
            NodeCommand::Append,
            NodeCommand::Branch,
            NodeCommand::Terminal,
            NodeCommand::BranchTerminal,
        ] {
            assert_eq!(NodeCommand::try_from(command as u8), Ok(command));
        }
        assert_eq!(NodeCommand::try_from(0x80), Err(0x80));
    }
}
