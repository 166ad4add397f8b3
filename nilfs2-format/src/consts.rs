//! Fixed constants of the on-disk format.
//!
//! `nilfs_fs.h`, the header that pins down exact struct byte layouts in the
//! original implementation, was not available when this was written; these
//! values were chosen to be internally consistent with the behavior the
//! rest of the toolkit depends on (see DESIGN.md for the inode-number and
//! reservation-minimum decisions specifically).

use crate::CheckpointNumber;

/// Superblock magic number.
pub const MAGIC: u16 = 0x3434;

/// Format revision understood by this toolkit.
pub const REVISION: u32 = 2;

/// Byte offset of the superblock from the start of the device.
pub const SB_OFFSET_BYTES: u64 = 1024;

/// Space reserved at the start of the device for the superblock and its
/// padding; the first partial segment starts at `ceil(HEADER_BYTES / b)`.
pub const HEADER_BYTES: u64 = 4096;

/// Length of the volume label field, in bytes.
pub const LABEL_LEN: usize = 16;

/// Reserved inode: never allocated, marks "no block".
pub const ROOT_INO: u64 = 2;
pub const DAT_INO: u64 = 3;
pub const CPFILE_INO: u64 = 4;
pub const SUFILE_INO: u64 = 5;
pub const IFILE_INO: u64 = 6;
pub const ATIME_INO: u64 = 7;
pub const SKETCH_INO: u64 = 10;
pub const NILFS_INO: u64 = 11;
/// First inode number available for user files.
pub const USER_INO: u64 = 12;
/// Upper bound (exclusive) on inode numbers pre-allocated by the formatter.
pub const MAX_INITIAL_INO: u64 = USER_INO;

pub const CNO_MIN: CheckpointNumber = 1;
pub const CNO_MAX: CheckpointNumber = u64::MAX;

/// Checkpoint-file and segment-usage-file slot 0 is a header; the first
/// real record starts at index 1.
pub const CPFILE_FIRST_OFFSET: u64 = 1;
pub const SUFILE_FIRST_OFFSET: u64 = 1;

/// Number of segments occupied by the formatter's initial image.
pub const INITIAL_SEGMENTS: u64 = 1;

pub const MIN_NRSVSEGS: u64 = 8;
pub const MIN_NUSERSEGS: u64 = 8;

pub const MIN_BLOCK_SIZE: u32 = 1024;
pub const MIN_BLOCKS_PER_SEGMENT: u64 = 16;
/// Minimum number of blocks a partial segment's payload must have beyond
/// its summary and super-root blocks.
pub const PSEG_MIN_BLOCKS: u64 = 2;

/// Number of inline block-map slots in an inode.
pub const INODE_BMAP_SIZE: usize = 12;

/// Segment-summary flag bits.
pub const SS_LOGBGN: u16 = 1 << 0;
pub const SS_LOGEND: u16 = 1 << 1;
pub const SS_SR: u16 = 1 << 3;

/// Batch size used by the segment-usage-info dump tool.
pub const NSUINFO_BATCH: usize = 512;

/// Byte length of the advisory write-intent lock region used by the
/// auxiliary CLIs.
pub const LOCK_LEN: libc::off_t = 1;
