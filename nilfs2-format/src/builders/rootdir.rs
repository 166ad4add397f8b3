//! Root-directory builder: the one block of directory entries every
//! initial image carries.

use crate::{
	consts::{NILFS_INO, ROOT_INO, SKETCH_INO},
	image::InitialImage,
	ondisk::{DirEntry, DT_DIR, DT_REG},
	Result,
};

fn align8(n: u16) -> u16 {
	(n + 7) & !7
}

pub fn build(image: &mut InitialImage) -> Result<()> {
	let block = image.layout.rootdir_block;
	let bsize = image.layout.block_size as usize;

	let names: [(u64, &str, u8); 4] = [
		(ROOT_INO, ".", DT_DIR),
		(ROOT_INO, "..", DT_DIR),
		(SKETCH_INO, ".sketch", DT_REG),
		(NILFS_INO, ".nilfs", DT_REG),
	];

	let buf = image.pool.get_mut(block)?;
	let mut offset = 0usize;
	for (i, (ino, name, file_type)) in names.iter().enumerate() {
		let rec_len = if i + 1 == names.len() {
			(bsize - offset) as u16
		} else {
			align8(DirEntry::min_len(name))
		};
		let entry = DirEntry {
			ino: *ino,
			rec_len,
			file_type: *file_type,
			name,
		};
		entry.write_into(&mut buf[offset..offset + rec_len as usize]);
		offset += rec_len as usize;
	}

	// "." and ".." both point back at the root directory itself.
	image.inodes.get_mut(&ROOT_INO).expect("root inode template registered by ifile::build").links += 2;

	Ok(())
}
