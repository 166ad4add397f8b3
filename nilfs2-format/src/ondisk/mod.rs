//! On-disk record definitions.
//!
//! Every record here derives `bincode::{Encode, Decode}` instead of being
//! read or written through a pointer cast: nothing in this module ever
//! reinterprets a raw buffer as a typed reference.

mod checkpoint;
mod dat;
mod dirent;
mod group;
mod inode;
mod segment;
mod sufile;
mod superblock;

pub use checkpoint::{Checkpoint, CpFileHeader};
pub use dat::DatEntry;
pub use dirent::{DirEntry, DT_DIR, DT_REG, DT_UNKNOWN};
pub use group::GroupDesc;
pub use inode::{FileKind, RawInode};
pub use segment::{BinfoData, BinfoDat, Finfo, SegmentSummary, SuperRoot};
pub use sufile::{SegmentUsage, SuFileHeader};
pub use superblock::Superblock;
