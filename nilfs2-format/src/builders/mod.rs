//! Metadata-file builders, one module per file in the initial image.
//!
//! Each builder fills the region the layout calculator assigned it.
//! `build_all` runs them in the order that later stages assume.

mod cpfile;
mod dat;
mod grouped;
mod ifile;
mod rootdir;
mod sufile;

use crate::{
	consts::{NILFS_INO, ROOT_INO, SKETCH_INO},
	image::InitialImage,
	Result,
};

pub fn build_all(image: &mut InitialImage) -> Result<()> {
	ifile::build(image)?;
	cpfile::build(image)?;
	sufile::build(image)?;
	dat::build(image)?;
	rootdir::build(image)?;
	Ok(())
}

/// Write the final inode bytes for the three files that live as ordinary
/// inode-file entries, once the assembler has finished populating their
/// `bmap`. The other four reserved files (ifile, cpfile, sufile, dat)
/// carry their authoritative inode record embedded in the checkpoint or
/// super root instead, so their inode-file slots stay zeroed.
pub fn finalize_ifile_entries(image: &mut InitialImage) -> Result<()> {
	let ifile = image.layout.ifile;
	for ino in [ROOT_INO, SKETCH_INO, NILFS_INO] {
		let inode = *image.inodes.get(&ino).expect("template registered during build_all");
		let slot = ino;
		let block = ifile.entries_start_block() + slot / ifile.entries_per_block;
		let offset = (slot % ifile.entries_per_block) as usize * ifile.entry_size;
		image.pool.encode_at(block, offset, &inode)?;
	}
	Ok(())
}
