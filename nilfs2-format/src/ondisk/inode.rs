use bincode::{Decode, Encode};

use crate::consts::INODE_BMAP_SIZE;

/// The two file kinds the formatter ever creates inodes for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
	RegularFile,
	Directory,
}

impl FileKind {
	const fn type_bits(self) -> u16 {
		match self {
			FileKind::RegularFile => 0o10,
			FileKind::Directory => 0o04,
		}
	}
}

/// An inode's inline block map, plus just enough metadata to satisfy a
/// reader: mode, size, link count, times. Every inode the formatter
/// writes fits entirely within [`INODE_BMAP_SIZE`] inline pointers — none
/// of the initial-image files need indirect blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct RawInode {
	pub mode: u16,
	pub flags: u32,
	pub size: u64,
	pub blocks: u64,
	pub links: u32,
	pub ctime: i64,
	pub mtime: i64,
	pub bmap: [u64; INODE_BMAP_SIZE],
}

impl RawInode {
	/// Build the canonical template described for every formatter-created
	/// inode: `mode = (kind<<12)|perm`, one link, `ctime == mtime`, empty
	/// bmap.
	pub fn template(kind: FileKind, perm: u16, size: u64, blocks: u64, ctime: i64) -> Self {
		Self {
			mode: (kind.type_bits() << 12) | (perm & 0o7777),
			flags: 0,
			size,
			blocks,
			links: 1,
			ctime,
			mtime: ctime,
			bmap: [0; INODE_BMAP_SIZE],
		}
	}
}

#[cfg(test)]
mod t {
	use super::*;

	#[test]
	fn template_mode_bits() {
		let ino = RawInode::template(FileKind::Directory, 0o755, 0, 1, 0);
		assert_eq!(ino.mode, 0o40755);
		assert_eq!(ino.links, 1);
	}
}
