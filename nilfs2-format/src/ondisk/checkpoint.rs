use bincode::{Decode, Encode};

use crate::{ondisk::RawInode, CheckpointNumber};

pub const CP_FLAG_SNAPSHOT: u32 = 1 << 0;
pub const CP_FLAG_INVALID: u32 = 1 << 1;

/// Slot 0 of the checkpoint file: bookkeeping for the checkpoint list as a
/// whole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct CpFileHeader {
	pub ncheckpoints: u64,
	pub nsnapshots: u64,
	/// Head of the (initially empty) snapshot doubly linked list.
	pub snapshot_list_head: CheckpointNumber,
	pub snapshot_list_tail: CheckpointNumber,
}

/// One checkpoint-file entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct Checkpoint {
	pub cno: CheckpointNumber,
	pub flags: u32,
	pub create: i64,
	pub inodes_count: u64,
	pub blocks_count: u64,
	/// Blocks newly written since the previous checkpoint; equal to
	/// `blocks_count` for the first checkpoint.
	pub nblk_inc: u64,
	/// Inline inode the inode file's on-disk record is written into.
	pub ifile_inode: RawInode,
	/// Snapshot list links; `0` when not on the list.
	pub snapshot_prev: CheckpointNumber,
	pub snapshot_next: CheckpointNumber,
}

impl Checkpoint {
	pub fn invalid() -> Self {
		Self {
			flags: CP_FLAG_INVALID,
			..Default::default()
		}
	}
}
