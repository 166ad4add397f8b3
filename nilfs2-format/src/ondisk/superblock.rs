use bincode::{Decode, Encode};

use crate::{CheckpointNumber, consts::LABEL_LEN};

/// Static filesystem identity plus the tail pointer to the most recent
/// valid super root. Lives at byte offset [`crate::consts::SB_OFFSET_BYTES`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Encode, Decode)]
pub struct Superblock {
	/// CRC32 over the whole record with this field zeroed.
	pub sum: u32,
	pub magic: u16,
	pub revision: u32,
	/// `log2(block size) - 10`, i.e. block size `= 1024 << log_block_size`.
	pub log_block_size: u32,
	pub nsegments: u64,
	pub blocks_per_segment: u64,
	/// Total device size in bytes, as seen at format time.
	pub dev_size: u64,
	pub first_data_block: u64,
	pub r_segments_percentage: u32,
	pub ctime: i64,
	pub wtime: i64,
	pub uuid: [u8; 16],
	pub volume_label: [u8; LABEL_LEN],
	pub last_cno: CheckpointNumber,
	/// Block number of the most recent partial segment.
	pub last_pseg: u64,
	pub last_seq: u64,
	pub free_blocks_count: u64,
	pub crc_seed: u32,
}
