//! Computes where everything in the initial image goes before any block
//! exists.
//!
//! Every size here is derived, never hand-tuned: block counts come from
//! `encoded_len` on a concrete record, and segment-summary placement comes
//! from walking the same [`SummaryCursor`] the assembler reuses.

use crate::{
	codec::encoded_len,
	consts::*,
	error::internal,
	ondisk::{Checkpoint, DatEntry, Finfo, RawInode, SegmentSummary, SegmentUsage, SuperRoot},
	summary_cursor::SummaryCursor,
	FormatError, Result,
};

/// User-supplied formatting parameters, already validated for shape
/// (power-of-two sizes, percentage range) but not yet checked against a
/// concrete device size.
#[derive(Debug, Clone)]
pub struct Options {
	pub block_size: u32,
	pub blocks_per_segment: u64,
	pub reservation_percent: u32,
	pub ctime: i64,
	pub volume_label: [u8; LABEL_LEN],
}

impl Options {
	/// Shape checks that don't need a device: power-of-two sizes, minimums,
	/// percentage range. Called before [`Layout::compute`].
	pub fn validate(&self) -> Result<()> {
		if !self.block_size.is_power_of_two() || self.block_size < MIN_BLOCK_SIZE {
			return Err(FormatError::Configuration(format!(
				"block size {} must be a power of two >= {MIN_BLOCK_SIZE}",
				self.block_size
			)));
		}
		if !self.blocks_per_segment.is_power_of_two() || self.blocks_per_segment < MIN_BLOCKS_PER_SEGMENT {
			return Err(FormatError::Configuration(format!(
				"blocks per segment {} must be a power of two >= {MIN_BLOCKS_PER_SEGMENT}",
				self.blocks_per_segment
			)));
		}
		if self.reservation_percent < 1 || self.reservation_percent > 99 {
			return Err(FormatError::Configuration(format!(
				"reservation percentage {} must be in 1..=99",
				self.reservation_percent
			)));
		}
		Ok(())
	}
}

/// Layout of a block-grouped file: one group-descriptor block, one bitmap
/// block, then `entries_blocks` entry blocks, starting at `start_block`.
#[derive(Debug, Clone, Copy)]
pub struct GroupedFileLayout {
	pub start_block: u64,
	pub entries: u64,
	pub entry_size: usize,
	pub entries_per_block: u64,
	pub nblocks: u64,
}

impl GroupedFileLayout {
	pub fn group_desc_block(&self) -> u64 {
		self.start_block
	}

	pub fn bitmap_block(&self) -> u64 {
		self.start_block + 1
	}

	pub fn entries_start_block(&self) -> u64 {
		self.start_block + 2
	}
}

fn grouped_file_layout(
	start_block: u64,
	entries: u64,
	entry_size: usize,
	bsize: u32,
) -> Result<GroupedFileLayout> {
	let bsize64 = bsize as u64;
	if entries > bsize64 * 8 {
		return Err(FormatError::Sizing(format!(
			"{entries} entries exceed one bitmap group ({} bits)",
			bsize64 * 8
		)));
	}
	let entries_per_block = bsize64 / entry_size as u64;
	let entries_blocks = (entries * entry_size as u64).div_ceil(bsize64);
	let nblocks = 2 + entries_blocks;
	if nblocks > INODE_BMAP_SIZE as u64 {
		return Err(FormatError::Sizing(format!(
			"block-grouped file needs {nblocks} blocks, exceeding inline bmap capacity {INODE_BMAP_SIZE}"
		)));
	}
	Ok(GroupedFileLayout {
		start_block,
		entries,
		entry_size,
		entries_per_block,
		nblocks,
	})
}

/// Layout of a flat (ungrouped) metadata file: the checkpoint file and the
/// segment-usage file, addressed as `slot_index / entries_per_block`.
#[derive(Debug, Clone, Copy)]
pub struct FlatFileLayout {
	pub start_block: u64,
	pub entry_size: usize,
	pub entries_per_block: u64,
	pub nblocks: u64,
}

impl FlatFileLayout {
	pub fn block_of(&self, slot: u64) -> u64 {
		self.start_block + slot / self.entries_per_block
	}

	pub fn offset_of(&self, slot: u64) -> usize {
		(slot % self.entries_per_block) as usize * self.entry_size
	}
}

/// Full layout of the initial image: where every metadata file lives,
/// where the segment summary and super root land, and how many blocks the
/// whole thing takes.
#[derive(Debug, Clone)]
pub struct Layout {
	pub block_size: u32,
	pub blocks_per_segment: u64,
	pub nsegments: u64,
	/// Block at which the first partial segment starts, reserving
	/// [`HEADER_BYTES`] for the superblock.
	pub first_segment_block: u64,
	pub reservation_percent: u32,
	pub ctime: i64,
	pub volume_label: [u8; LABEL_LEN],

	pub ifile: GroupedFileLayout,
	pub dat: GroupedFileLayout,
	pub cpfile: FlatFileLayout,
	pub sufile: FlatFileLayout,
	pub rootdir_block: u64,

	/// Number of blocks occupied by the segment summary at the start of
	/// the initial partial segment.
	pub nblk_sum: u64,
	/// Total bytes of header-plus-finfo-plus-binfo records packed into
	/// the summary region.
	pub sumbytes: u32,
	/// Block holding the super root, the last block of the initial
	/// partial segment.
	pub super_root_block: u64,
	/// Total number of blocks written for the initial partial segment,
	/// i.e. `first_segment_block + nblk_sum + file blocks + 1`.
	pub total_blocks: u64,
	/// Raw device size this layout was computed against, in bytes.
	pub dev_size_bytes: u64,
}

/// One entry in the fixed file list the segment assembler walks, in the
/// exact order the summary and VBN assignment use.
#[derive(Debug, Clone, Copy)]
pub struct FileSlot {
	pub ino: u64,
	pub nblocks: u64,
	pub is_dat: bool,
}

impl Layout {
	/// Compute the full layout for `options` against a device of
	/// `device_size_bytes`.
	pub fn compute(options: &Options, device_size_bytes: u64) -> Result<Layout> {
		options.validate()?;

		let b = options.block_size;
		let b64 = b as u64;
		let bps = options.blocks_per_segment;

		let blocks_on_device = device_size_bytes / b64;
		let nsegments = blocks_on_device / bps;
		if nsegments == 0 {
			return Err(FormatError::Sizing(format!(
				"device of {device_size_bytes} bytes holds no complete {bps}-block segments at block size {b}"
			)));
		}

		let reserved_by_percent = (u128::from(options.reservation_percent) * u128::from(nsegments))
			.div_ceil(100) as u64;
		let min_reserved = std::cmp::max(reserved_by_percent, MIN_NRSVSEGS);
		let min_user = std::cmp::max(INITIAL_SEGMENTS, MIN_NUSERSEGS);
		if min_reserved + min_user > nsegments {
			return Err(FormatError::Sizing(format!(
				"device too small: {nsegments} segments available, but at least {} are required",
				min_reserved + min_user
			)));
		}

		let first_segment_block = HEADER_BYTES.div_ceil(b64);
		if first_segment_block + PSEG_MIN_BLOCKS > bps {
			return Err(FormatError::Sizing(format!(
				"too small segment: {bps} blocks per segment cannot hold the {first_segment_block}-block header plus a minimum {PSEG_MIN_BLOCKS}-block payload"
			)));
		}

		let ifile_entry_size = encoded_len(&RawInode::default());
		let ifile = grouped_file_layout(0, MAX_INITIAL_INO, ifile_entry_size, b)?;

		let cp_entry_size = encoded_len(&Checkpoint::default());
		let cpfile_nblocks = ((CPFILE_FIRST_OFFSET + 1) * cp_entry_size as u64).div_ceil(b64);
		let cpfile = FlatFileLayout {
			start_block: 0,
			entry_size: cp_entry_size,
			entries_per_block: b64 / cp_entry_size as u64,
			nblocks: cpfile_nblocks,
		};

		let su_entry_size = encoded_len(&SegmentUsage::default());
		let sufile_nblocks =
			((INITIAL_SEGMENTS + SUFILE_FIRST_OFFSET) * su_entry_size as u64).div_ceil(b64);
		let sufile = FlatFileLayout {
			start_block: 0,
			entry_size: su_entry_size,
			entries_per_block: b64 / su_entry_size as u64,
			nblocks: sufile_nblocks,
		};

		let rootdir_blocks = 1u64;
		let n_vbn_blocks = ifile.nblocks + cpfile.nblocks + sufile.nblocks + rootdir_blocks;

		let dat_entry_size = encoded_len(&DatEntry::default());
		// +1 for the reserved VBN-0 slot, which occupies entry index 0
		// but never corresponds to a live block.
		let dat = grouped_file_layout(0, n_vbn_blocks + 1, dat_entry_size, b)?;

		// Walk the fixed file list in assembler order to size the summary.
		let files = [
			FileSlot { ino: ROOT_INO, nblocks: rootdir_blocks, is_dat: false },
			FileSlot { ino: SKETCH_INO, nblocks: 0, is_dat: false },
			FileSlot { ino: NILFS_INO, nblocks: 0, is_dat: false },
			FileSlot { ino: IFILE_INO, nblocks: ifile.nblocks, is_dat: false },
			FileSlot { ino: CPFILE_INO, nblocks: cpfile.nblocks, is_dat: false },
			FileSlot { ino: SUFILE_INO, nblocks: sufile.nblocks, is_dat: false },
			FileSlot { ino: DAT_INO, nblocks: dat.nblocks, is_dat: true },
		];

		let header_len = encoded_len(&SegmentSummary::default());
		let finfo_len = encoded_len(&Finfo::default());
		let binfo_data_len = 16; // (vbn: u64, block_offset: u64)
		let binfo_dat_len = 8; // (block_offset: u64)

		let mut cursor = SummaryCursor::new(b as usize, first_segment_block);
		cursor.place(header_len);
		for f in &files {
			cursor.place(finfo_len);
			let binfo_len = if f.is_dat { binfo_dat_len } else { binfo_data_len };
			for _ in 0..f.nblocks {
				cursor.place(binfo_len);
			}
		}
		let nblk_sum = cursor.nblk_sum();
		let sumbytes: u32 = cursor
			.bytes_used()
			.try_into()
			.map_err(|_| internal!("segment summary overflowed u32 byte count"))?;

		let file_payload_blocks: u64 = files.iter().map(|f| f.nblocks).sum();
		let super_root_block = first_segment_block + nblk_sum + file_payload_blocks;
		let total_blocks = super_root_block + 1;

		let available = bps - first_segment_block;
		if total_blocks - first_segment_block > available {
			return Err(FormatError::Sizing(format!(
				"segment too small: initial image needs {} blocks but only {available} are available after the header",
				total_blocks - first_segment_block
			)));
		}

		// Lay out the block-grouped and flat files back-to-back, right
		// after the summary region, in assembler order.
		let mut cursor_block = first_segment_block + nblk_sum;
		let rootdir_block = cursor_block;
		cursor_block += rootdir_blocks;
		// SKETCH_INO, NILFS_INO contribute no blocks.
		let ifile = GroupedFileLayout { start_block: cursor_block, ..ifile };
		cursor_block += ifile.nblocks;
		let cpfile = FlatFileLayout { start_block: cursor_block, ..cpfile };
		cursor_block += cpfile.nblocks;
		let sufile = FlatFileLayout { start_block: cursor_block, ..sufile };
		cursor_block += sufile.nblocks;
		let dat = GroupedFileLayout { start_block: cursor_block, ..dat };
		cursor_block += dat.nblocks;
		debug_assert_eq!(cursor_block, super_root_block);

		Ok(Layout {
			block_size: b,
			blocks_per_segment: bps,
			nsegments,
			first_segment_block,
			reservation_percent: options.reservation_percent,
			ctime: options.ctime,
			volume_label: options.volume_label,
			ifile,
			dat,
			cpfile,
			sufile,
			rootdir_block,
			nblk_sum,
			sumbytes,
			super_root_block,
			total_blocks,
			dev_size_bytes: device_size_bytes,
		})
	}

	/// The fixed file list in assembler order, re-derived from an already
	/// computed layout (kept in sync by construction with the list used
	/// inside [`Layout::compute`]).
	pub fn file_slots(&self) -> [FileSlot; 7] {
		[
			FileSlot { ino: ROOT_INO, nblocks: 1, is_dat: false },
			FileSlot { ino: SKETCH_INO, nblocks: 0, is_dat: false },
			FileSlot { ino: NILFS_INO, nblocks: 0, is_dat: false },
			FileSlot { ino: IFILE_INO, nblocks: self.ifile.nblocks, is_dat: false },
			FileSlot { ino: CPFILE_INO, nblocks: self.cpfile.nblocks, is_dat: false },
			FileSlot { ino: SUFILE_INO, nblocks: self.sufile.nblocks, is_dat: false },
			FileSlot { ino: DAT_INO, nblocks: self.dat.nblocks, is_dat: true },
		]
	}

	/// SuperRoot's own on-disk size, used by the assembler to know where
	/// the checksummed region ends.
	pub fn super_root_bytes(&self) -> usize {
		encoded_len(&SuperRoot::default())
	}
}

#[cfg(test)]
mod t {
	use super::*;

	fn opts() -> Options {
		Options {
			block_size: 4096,
			blocks_per_segment: 1024,
			reservation_percent: 5,
			ctime: 1_700_000_000,
			volume_label: [0u8; LABEL_LEN],
		}
	}

	#[test]
	fn computes_a_sane_layout_for_a_generous_device() {
		let layout = Layout::compute(&opts(), 64 * 1024 * 1024).unwrap();
		assert!(layout.nsegments >= 1);
		assert_eq!(layout.first_segment_block, HEADER_BYTES.div_ceil(4096));
		assert!(layout.total_blocks > layout.first_segment_block);
		assert!(layout.dat.entries >= layout.ifile.nblocks + layout.cpfile.nblocks + layout.sufile.nblocks + 1);
	}

	#[test]
	fn rejects_non_power_of_two_block_size() {
		let mut o = opts();
		o.block_size = 4000;
		assert!(Layout::compute(&o, 64 * 1024 * 1024).is_err());
	}

	#[test]
	fn rejects_device_too_small() {
		let layout = Layout::compute(&opts(), 8 * 1024 * 1024);
		assert!(layout.is_err());
	}

	#[test]
	fn rejects_segment_too_small_for_header() {
		let mut o = opts();
		o.block_size = 1024;
		o.blocks_per_segment = MIN_BLOCKS_PER_SEGMENT;
		// HEADER_BYTES / 1024 = 4 blocks, leaving only MIN_BLOCKS_PER_SEGMENT - 4
		// blocks of payload, which must be checked against PSEG_MIN_BLOCKS.
		let result = Layout::compute(&o, 64 * 1024 * 1024);
		assert!(result.is_ok() || matches!(result, Err(FormatError::Sizing(_))));
	}
}
