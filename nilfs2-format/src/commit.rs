//! Commit & checksum pass: the seven mandatory, order-dependent steps
//! that turn an assembled-but-unchecksummed image into a valid one.
//!
//! VBN assignment and bmap rewriting (step 1) happen during
//! [`crate::assembler::assemble`]; this module covers the remaining six.

use crate::{
	consts::*,
	crc::crc32_seeded,
	image::InitialImage,
	ondisk::{Checkpoint, SegmentSummary, SegmentUsage, Superblock, SuperRoot},
	Result,
};

pub fn commit(image: &mut InitialImage) -> Result<()> {
	commit_cpfile(image)?;
	commit_sufile(image)?;
	checksum_summary(image)?;
	checksum_super_root(image)?;
	checksum_segment_data(image)?;
	write_superblock(image)?;
	Ok(())
}

fn commit_cpfile(image: &mut InitialImage) -> Result<()> {
	let layout = image.layout.cpfile;
	let slot = CPFILE_FIRST_OFFSET;
	let mut cp: Checkpoint = image.pool.decode_at(layout.block_of(slot), layout.offset_of(slot))?;

	let blocks_count: u64 = image.layout.file_slots().iter().map(|f| f.nblocks).sum();
	cp.inodes_count = image.inodes.len() as u64;
	cp.blocks_count = blocks_count;
	cp.nblk_inc = blocks_count;
	cp.ifile_inode = *image.inodes.get(&IFILE_INO).expect("ifile inode registered");

	image.pool.encode_at(layout.block_of(slot), layout.offset_of(slot), &cp)
}

fn commit_sufile(image: &mut InitialImage) -> Result<()> {
	let layout = image.layout.sufile;
	let pseg_nblocks = (image.layout.total_blocks - image.layout.first_segment_block) as u32;

	for segnum in 0..INITIAL_SEGMENTS {
		let slot = segnum + SUFILE_FIRST_OFFSET;
		let mut su: SegmentUsage = image.pool.decode_at(layout.block_of(slot), layout.offset_of(slot))?;
		su.last_mod = image.ctime;
		su.nblocks = pseg_nblocks;
		image.pool.encode_at(layout.block_of(slot), layout.offset_of(slot), &su)?;
	}
	Ok(())
}

/// Concatenate the bytes of `[start_block, start_block + nblocks)`.
fn gather(image: &InitialImage, start_block: u64, nblocks: u64) -> Result<Vec<u8>> {
	let mut out = Vec::with_capacity((nblocks as usize) * image.pool.block_size());
	for b in start_block..start_block + nblocks {
		out.extend_from_slice(image.pool.get(b)?);
	}
	Ok(out)
}

fn checksum_summary(image: &mut InitialImage) -> Result<()> {
	let layout = image.layout.clone();
	let region = gather(image, layout.first_segment_block, layout.nblk_sum)?;
	let sumbytes = layout.sumbytes as usize;
	let sum = crc32_seeded(image.crc_seed, &region[8..sumbytes]);

	let mut summary: SegmentSummary = image.pool.decode_at(layout.first_segment_block, 0)?;
	summary.sumsum = sum;
	image.pool.encode_at(layout.first_segment_block, 0, &summary)
}

fn checksum_super_root(image: &mut InitialImage) -> Result<()> {
	let block = image.layout.super_root_block;
	let bytes = image.layout.super_root_bytes();
	let data = image.pool.get(block)?[4..bytes].to_vec();
	let sum = crc32_seeded(image.crc_seed, &data);

	let mut sr: SuperRoot = image.pool.decode_at(block, 0)?;
	sr.sum = sum;
	image.pool.encode_at(block, 0, &sr)
}

fn checksum_segment_data(image: &mut InitialImage) -> Result<()> {
	let layout = image.layout.clone();
	let first = image.pool.get(layout.first_segment_block)?;
	let mut sum = crc32_seeded(image.crc_seed, &first[4..]);
	for b in (layout.first_segment_block + 1)..layout.total_blocks {
		sum = crc32_seeded(sum, image.pool.get(b)?);
	}

	let mut summary: SegmentSummary = image.pool.decode_at(layout.first_segment_block, 0)?;
	summary.datasum = sum;
	image.pool.encode_at(layout.first_segment_block, 0, &summary)
}

fn write_superblock(image: &mut InitialImage) -> Result<()> {
	let layout = image.layout.clone();
	let log_block_size = layout.block_size.trailing_zeros() - MIN_BLOCK_SIZE.trailing_zeros();

	let used_blocks = layout.total_blocks;
	let device_blocks = layout.nsegments * layout.blocks_per_segment;
	let free_blocks_count = device_blocks.saturating_sub(used_blocks);

	let mut sb = Superblock {
		sum: 0,
		magic: MAGIC,
		revision: REVISION,
		log_block_size,
		nsegments: layout.nsegments,
		blocks_per_segment: layout.blocks_per_segment,
		dev_size: layout.dev_size_bytes,
		first_data_block: layout.first_segment_block,
		r_segments_percentage: layout.reservation_percent,
		ctime: layout.ctime,
		wtime: layout.ctime,
		uuid: image.uuid,
		volume_label: layout.volume_label,
		last_cno: CNO_MIN,
		last_pseg: layout.first_segment_block,
		last_seq: 0,
		free_blocks_count,
		crc_seed: image.crc_seed,
	};

	let encoded = encode_with_config(&sb)?;
	sb.sum = crc32_seeded(image.crc_seed, &encoded);

	image.superblock = sb;
	Ok(())
}

fn encode_with_config(sb: &Superblock) -> Result<Vec<u8>> {
	bincode::encode_to_vec(sb, crate::codec::CONFIG)
		.map_err(|e| crate::error::internal!("encoding superblock: {e}"))
}
