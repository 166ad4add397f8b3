//! The in-memory mirror of every disk block the formatter will write.
//!
//! Grounded in the same shape as a block-level read/write cache: blocks
//! are addressed by number, materialized lazily, and read or written at a
//! byte offset within a block via `encode_at`/`decode_at`, mirroring the
//! block-reader/decoder split this codebase's ancestry uses for on-disk
//! record access. The formatter's pool differs in one way: it is sparse
//! and write-mostly, since most of a freshly formatted device is never
//! touched by the initial image.

use std::collections::BTreeMap;

use bincode::{Decode, Encode};

use crate::{codec::CONFIG, error::internal, FormatError, Result};

/// Sparse, block-indexed buffer pool.
pub struct BlockPool {
	bsize: usize,
	total_blocks: u64,
	blocks: BTreeMap<u64, Vec<u8>>,
}

impl BlockPool {
	pub fn new(bsize: usize, total_blocks: u64) -> Self {
		Self {
			bsize,
			total_blocks,
			blocks: BTreeMap::new(),
		}
	}

	pub fn block_size(&self) -> usize {
		self.bsize
	}

	fn check_bounds(&self, blocknr: u64) -> Result<()> {
		if blocknr >= self.total_blocks {
			return Err(internal!(
				"block {blocknr} out of bounds (total blocks = {})",
				self.total_blocks
			));
		}
		Ok(())
	}

	/// Get a mutable, zero-filled-on-first-touch buffer for `blocknr`.
	pub fn get_mut(&mut self, blocknr: u64) -> Result<&mut [u8]> {
		self.check_bounds(blocknr)?;
		let bsize = self.bsize;
		Ok(self
			.blocks
			.entry(blocknr)
			.or_insert_with(|| vec![0u8; bsize]))
	}

	/// Get an immutable view of `blocknr`, or an all-zero buffer if it was
	/// never touched (without materializing it).
	pub fn get(&self, blocknr: u64) -> Result<&[u8]> {
		self.check_bounds(blocknr)?;
		Ok(self
			.blocks
			.get(&blocknr)
			.map(Vec::as_slice)
			.unwrap_or(&ZERO_BLOCK[..self.bsize.min(ZERO_BLOCK.len())]))
	}

	/// The blocks that have been materialized, in ascending order, as
	/// `(blocknr, bytes)`.
	pub fn populated_blocks(&self) -> impl Iterator<Item = (u64, &[u8])> {
		self.blocks.iter().map(|(&n, b)| (n, b.as_slice()))
	}

	/// Encode `value` at byte offset `pos` (a `(blocknr, in_block_offset)`
	/// pair). The record must not straddle a block boundary.
	pub fn encode_at<T: Encode>(&mut self, blocknr: u64, offset: usize, value: &T) -> Result<()> {
		let block = self.get_mut(blocknr)?;
		if offset > block.len() {
			return Err(internal!(
				"encode_at: offset {offset} beyond block size {}",
				block.len()
			));
		}
		let n = bincode::encode_into_slice(value, &mut block[offset..], CONFIG)
			.map_err(|e| internal!("encode_at(block={blocknr}, offset={offset}): {e}"))?;
		let _ = n;
		Ok(())
	}

	/// Decode a `T` at byte offset `pos` within `blocknr`.
	pub fn decode_at<T: Decode>(&self, blocknr: u64, offset: usize) -> Result<T> {
		let block = self.get(blocknr)?;
		if offset > block.len() {
			return Err(internal!(
				"decode_at: offset {offset} beyond block size {}",
				block.len()
			));
		}
		let (value, _) = bincode::decode_from_slice(&block[offset..], CONFIG)
			.map_err(|e| internal!("decode_at(block={blocknr}, offset={offset}): {e}"))?;
		Ok(value)
	}

	/// Write raw bytes at an offset within a block.
	pub fn write_at(&mut self, blocknr: u64, offset: usize, data: &[u8]) -> Result<()> {
		let block = self.get_mut(blocknr)?;
		if offset + data.len() > block.len() {
			return Err(internal!(
				"write_at: {} bytes at offset {offset} overruns block size {}",
				data.len(),
				block.len()
			));
		}
		block[offset..offset + data.len()].copy_from_slice(data);
		Ok(())
	}
}

const ZERO_BLOCK: [u8; 65536] = [0u8; 65536];

impl From<FormatError> for std::io::Error {
	fn from(e: FormatError) -> Self {
		match e {
			FormatError::Io(e) => e,
			other => std::io::Error::new(std::io::ErrorKind::Other, other.to_string()),
		}
	}
}

#[cfg(test)]
mod t {
	use super::*;

	#[test]
	fn lazy_zero_fill() {
		let pool = BlockPool::new(1024, 16);
		assert_eq!(pool.get(5).unwrap(), &[0u8; 1024][..]);
	}

	#[test]
	fn out_of_bounds_is_internal_error() {
		let mut pool = BlockPool::new(1024, 4);
		assert!(pool.get_mut(4).is_err());
		assert!(pool.get(100).is_err());
	}

	#[test]
	fn encode_decode_roundtrip() {
		let mut pool = BlockPool::new(64, 4);
		pool.encode_at(0, 8, &0xdead_beefu32).unwrap();
		let v: u32 = pool.decode_at(0, 8).unwrap();
		assert_eq!(v, 0xdead_beef);
	}
}
