use bincode::{Decode, Encode};

pub const SU_FLAG_ACTIVE: u32 = 1 << 0;
pub const SU_FLAG_DIRTY: u32 = 1 << 1;
pub const SU_FLAG_ERROR: u32 = 1 << 2;

/// Slot 0 of the segment-usage file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct SuFileHeader {
	pub ncleansegs: u64,
	pub ndirtysegs: u64,
	/// Segment number most recently handed out by the allocator.
	pub last_alloc: u64,
}

/// Per-segment usage record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct SegmentUsage {
	pub last_mod: i64,
	pub nblocks: u32,
	pub flags: u32,
}

impl SegmentUsage {
	pub fn clean() -> Self {
		Self::default()
	}

	pub fn active_dirty(last_mod: i64, nblocks: u32) -> Self {
		Self {
			last_mod,
			nblocks,
			flags: SU_FLAG_ACTIVE | SU_FLAG_DIRTY,
		}
	}
}
