use bincode::{Decode, Encode};

use crate::CheckpointNumber;

/// Maps a virtual block number to a physical block and the checkpoint
/// range over which that mapping is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct DatEntry {
	pub blocknr: u64,
	pub start: CheckpointNumber,
	pub end: CheckpointNumber,
}

impl DatEntry {
	/// A DAT entry for a block that lives from its first checkpoint
	/// onward, with no expiry — every block the formatter allocates is
	/// live this way.
	pub fn live(blocknr: u64, start: CheckpointNumber, end: CheckpointNumber) -> Self {
		Self { blocknr, start, end }
	}
}
