//! The in-progress initial image: the block pool plus the inode templates
//! that get their `bmap` filled in as the assembler walks the file list.

use std::collections::BTreeMap;

use crate::{layout::Layout, ondisk::{RawInode, Superblock}, pool::BlockPool};

/// Everything the builders, assembler, and commit pass share while
/// constructing the initial image of one formatted device.
pub struct InitialImage {
	pub layout: Layout,
	pub pool: BlockPool,
	/// Inode templates for the seven reserved files, keyed by inode
	/// number. Builders create these with an empty bmap; the assembler
	/// fills `bmap` in as it assigns blocks.
	pub inodes: BTreeMap<u64, RawInode>,
	pub uuid: [u8; 16],
	pub crc_seed: u32,
	pub ctime: i64,
	/// Populated by [`crate::commit::commit`] once every checksum has been
	/// computed.
	pub superblock: Superblock,
	/// Next virtual block number to hand out. VBN 0 is reserved, so this
	/// starts at 1.
	next_vbn: u64,
}

impl InitialImage {
	pub fn new(layout: Layout, uuid: [u8; 16], crc_seed: u32) -> Self {
		let ctime = layout.ctime;
		Self {
			layout,
			pool: BlockPool::new(0, 0), // replaced immediately below
			inodes: BTreeMap::new(),
			uuid,
			crc_seed,
			ctime,
			superblock: Superblock::default(),
			next_vbn: 1,
		}
		.with_pool()
	}

	fn with_pool(mut self) -> Self {
		self.pool = BlockPool::new(self.layout.block_size as usize, self.layout.total_blocks);
		self
	}

	/// Hand out the next unused virtual block number.
	pub fn alloc_vbn(&mut self) -> u64 {
		let vbn = self.next_vbn;
		self.next_vbn += 1;
		vbn
	}

	/// Total virtual block numbers handed out so far (excluding VBN 0).
	pub fn vbns_allocated(&self) -> u64 {
		self.next_vbn - 1
	}
}
