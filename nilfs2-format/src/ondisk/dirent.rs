//! Directory-entry encoding for the root directory block.
//!
//! Entry names in the initial image are few and short (`.`, `..`,
//! `.sketch`, `.nilfs`), so this writes them directly into a block buffer
//! rather than going through a generic derive: `bincode::Encode` doesn't
//! have a natural encoding for a record whose trailing field is
//! variable-length and whose length is itself stored earlier in the same
//! record.

pub const DT_UNKNOWN: u8 = 0;
pub const DT_REG: u8 = 1;
pub const DT_DIR: u8 = 2;

/// Fixed portion of a directory entry: inode number, record length, file
/// type, name length. The name itself follows immediately after.
pub const HEADER_LEN: usize = 8 + 2 + 1 + 1;

pub struct DirEntry<'a> {
	pub ino: u64,
	/// Total length of this record, including padding to the next
	/// record (or to the end of the block, for the last entry).
	pub rec_len: u16,
	pub file_type: u8,
	pub name: &'a str,
}

impl<'a> DirEntry<'a> {
	/// Minimum `rec_len` this entry needs: header plus name, unpadded.
	pub fn min_len(name: &str) -> u16 {
		(HEADER_LEN + name.len()) as u16
	}

	/// Write this entry at the start of `buf`. `buf` must be at least
	/// `self.rec_len` bytes; any padding bytes beyond the name are left
	/// untouched (the caller zero-fills the block up front).
	pub fn write_into(&self, buf: &mut [u8]) {
		let name = self.name.as_bytes();
		assert!(HEADER_LEN + name.len() <= self.rec_len as usize);
		assert!(HEADER_LEN + name.len() <= buf.len());

		buf[0..8].copy_from_slice(&self.ino.to_le_bytes());
		buf[8..10].copy_from_slice(&self.rec_len.to_le_bytes());
		buf[10] = self.file_type;
		buf[11] = name.len() as u8;
		buf[HEADER_LEN..HEADER_LEN + name.len()].copy_from_slice(name);
	}
}

#[cfg(test)]
mod t {
	use super::*;

	#[test]
	fn round_trip_fields() {
		let mut buf = [0u8; 32];
		let e = DirEntry {
			ino: 2,
			rec_len: 24,
			file_type: DT_DIR,
			name: "..",
		};
		e.write_into(&mut buf);
		assert_eq!(u64::from_le_bytes(buf[0..8].try_into().unwrap()), 2);
		assert_eq!(u16::from_le_bytes(buf[8..10].try_into().unwrap()), 24);
		assert_eq!(buf[10], DT_DIR);
		assert_eq!(buf[11], 2);
		assert_eq!(&buf[12..14], b"..");
	}
}
