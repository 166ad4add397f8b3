use bincode::{Decode, Encode};

use crate::{ondisk::RawInode, CheckpointNumber};

/// Segment-summary header at the start of a partial segment. The two
/// checksum fields are deliberately first: [`Self::datasum`] then
/// [`Self::sumsum`] occupy the first 8 bytes, so "everything after the
/// leading checksum fields" is just a byte-offset slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct SegmentSummary {
	pub datasum: u32,
	pub sumsum: u32,
	pub magic: u32,
	/// Size in bytes of this fixed header.
	pub bytes: u32,
	pub flags: u16,
	pub seq: u64,
	pub create: i64,
	/// Block number of the next segment in the log.
	pub next: u64,
	pub nblocks: u32,
	pub nfinfo: u32,
	/// Total size in bytes of the header plus every finfo/binfo record.
	pub sumbytes: u32,
}

/// Per-file record within a segment summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct Finfo {
	pub ino: u64,
	pub ndatablk: u32,
	pub nblocks: u32,
	pub cno: CheckpointNumber,
}

/// Per-block record for a file whose blocks are reached through the DAT
/// (i.e. every file except the DAT itself): the assigned virtual block
/// number plus the block's logical offset within the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct BinfoData {
	pub vbn: u64,
	pub block_offset: u64,
}

/// Per-block record for the DAT file, whose blocks are addressed
/// directly: just the logical block offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct BinfoDat {
	pub block_offset: u64,
}

/// Terminal block of a partial segment that closes a checkpoint: points
/// at the root inodes of the three metadata files a reader needs to find
/// everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct SuperRoot {
	pub sum: u32,
	/// Size in bytes of this record.
	pub bytes: u32,
	/// Creation time, excluded from garbage-collection accounting.
	pub create: i64,
	pub flags: u16,
	pub dat: RawInode,
	pub cpfile: RawInode,
	pub sufile: RawInode,
}
