//! Inode-file builder.
//!
//! Initializes the group descriptor and bitmap of the inode file, reserves
//! every inode below `USER_INO`, and registers the inline templates that
//! the assembler later fills `bmap` into. The entries region itself is
//! left zero here; [`crate::builders::finalize_ifile_entries`] writes the
//! final inode bytes once the assembler has populated every bmap.

use crate::{
	consts::{CPFILE_INO, DAT_INO, IFILE_INO, MAX_INITIAL_INO, NILFS_INO, ROOT_INO, SKETCH_INO, SUFILE_INO},
	image::InitialImage,
	ondisk::{FileKind, RawInode},
	Result,
};

use super::grouped;

pub fn build(image: &mut InitialImage) -> Result<()> {
	let ifile = image.layout.ifile;
	grouped::write_group_and_bitmap(&mut image.pool, &ifile, MAX_INITIAL_INO)?;

	let ctime = image.ctime;
	let bsize = image.layout.block_size as u64;
	let rootdir_blocks = 1u64;
	let entries = [
		(ROOT_INO, FileKind::Directory, 0o755, bsize, rootdir_blocks),
		(SKETCH_INO, FileKind::RegularFile, 0o644, 0, 0),
		(NILFS_INO, FileKind::RegularFile, 0o644, 0, 0),
		(IFILE_INO, FileKind::RegularFile, 0, 0, image.layout.ifile.nblocks),
		(CPFILE_INO, FileKind::RegularFile, 0, 0, image.layout.cpfile.nblocks),
		(SUFILE_INO, FileKind::RegularFile, 0, 0, image.layout.sufile.nblocks),
		(DAT_INO, FileKind::RegularFile, 0, 0, image.layout.dat.nblocks),
	];

	for (ino, kind, perm, size, blocks) in entries {
		image
			.inodes
			.insert(ino, RawInode::template(kind, perm, size, blocks, ctime));
	}

	Ok(())
}
