//! Segment-usage file builder: header plus the usage record for every
//! segment occupied by the initial image. Segments beyond that stay
//! zero-filled, which is exactly [`SegmentUsage::clean`].

use crate::{
	consts::{INITIAL_SEGMENTS, SUFILE_FIRST_OFFSET},
	image::InitialImage,
	ondisk::{SegmentUsage, SuFileHeader},
	Result,
};

pub fn build(image: &mut InitialImage) -> Result<()> {
	let layout = image.layout.sufile;
	let n = image.layout.nsegments;

	let header = SuFileHeader {
		ncleansegs: n - INITIAL_SEGMENTS,
		ndirtysegs: INITIAL_SEGMENTS,
		last_alloc: n - 1,
	};
	image
		.pool
		.encode_at(layout.block_of(0), layout.offset_of(0), &header)?;

	for segnum in 0..INITIAL_SEGMENTS {
		let slot = segnum + SUFILE_FIRST_OFFSET;
		// nblocks is finalized once the assembler knows the segment's
		// total block count; commit::commit_sufile overwrites it.
		let usage = SegmentUsage::active_dirty(image.ctime, 0);
		image
			.pool
			.encode_at(layout.block_of(slot), layout.offset_of(slot), &usage)?;
	}

	Ok(())
}
