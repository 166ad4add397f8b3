//! Checkpoint-file builder: header plus the single valid checkpoint of
//! the initial image.

use crate::{
	consts::CPFILE_FIRST_OFFSET,
	image::InitialImage,
	ondisk::{Checkpoint, CpFileHeader},
	Result,
};

pub fn build(image: &mut InitialImage) -> Result<()> {
	let layout = image.layout.cpfile;

	let header = CpFileHeader {
		ncheckpoints: 1,
		nsnapshots: 0,
		snapshot_list_head: 0,
		snapshot_list_tail: 0,
	};
	image
		.pool
		.encode_at(layout.block_of(0), layout.offset_of(0), &header)?;

	let valid = Checkpoint {
		cno: 1,
		flags: 0,
		create: image.ctime,
		..Default::default()
	};
	image.pool.encode_at(
		layout.block_of(CPFILE_FIRST_OFFSET),
		layout.offset_of(CPFILE_FIRST_OFFSET),
		&valid,
	)?;

	let total_slots = layout.nblocks * layout.entries_per_block;
	for slot in (CPFILE_FIRST_OFFSET + 1)..total_slots {
		image
			.pool
			.encode_at(layout.block_of(slot), layout.offset_of(slot), &Checkpoint::invalid())?;
	}

	Ok(())
}
