//! Segment assembler: walks the fixed file list, hands out virtual block
//! numbers, and writes the segment summary, DAT entries, and super root.
//!
//! This implements §4.4's "assign VBNs and rewrite all bmaps" as a single
//! pass rather than two: each block is assigned its VBN (or, for the DAT
//! file itself, its physical block directly) at the moment its binfo
//! record is placed.

use crate::{
	builders,
	consts::{CNO_MAX, CNO_MIN, DAT_INO, MAGIC, SS_LOGBGN, SS_LOGEND, SS_SR},
	image::InitialImage,
	layout::FileSlot,
	ondisk::{BinfoData, BinfoDat, DatEntry, Finfo, SegmentSummary, SuperRoot},
	summary_cursor::SummaryCursor,
	Result,
};

pub fn assemble(image: &mut InitialImage) -> Result<()> {
	let layout = image.layout.clone();
	let files: Vec<FileSlot> = layout.file_slots().to_vec();

	let header_len = crate::codec::encoded_len(&SegmentSummary::default());
	let finfo_len = crate::codec::encoded_len(&Finfo::default());
	let binfo_data_len = 16;
	let binfo_dat_len = 8;

	let mut cursor = SummaryCursor::new(layout.block_size as usize, layout.first_segment_block);
	cursor.place(header_len); // reserve room for the header itself

	for file in &files {
		let finfo_pos = cursor.place(finfo_len);
		image.pool.encode_at(
			finfo_pos.0,
			finfo_pos.1,
			&Finfo {
				ino: file.ino,
				ndatablk: file.nblocks as u32,
				nblocks: file.nblocks as u32,
				cno: CNO_MIN,
			},
		)?;

		let start_block = file_start_block(&layout, file.ino);
		for i in 0..file.nblocks {
			let physical = start_block + i;
			let binfo_len = if file.is_dat { binfo_dat_len } else { binfo_data_len };
			let pos = cursor.place(binfo_len);

			if file.is_dat {
				image.pool.encode_at(pos.0, pos.1, &BinfoDat { block_offset: i })?;
				set_bmap(image, file.ino, i, physical)?;
			} else {
				let vbn = image.alloc_vbn();
				write_dat_entry(image, vbn, physical)?;
				image
					.pool
					.encode_at(pos.0, pos.1, &BinfoData { vbn, block_offset: i })?;
				set_bmap(image, file.ino, i, vbn)?;
			}
		}
	}

	debug_assert_eq!(cursor.nblk_sum(), layout.nblk_sum);
	let sumbytes = cursor.bytes_used() as u32;
	debug_assert_eq!(sumbytes, layout.sumbytes);

	finalize_dat_bitmap(image)?;
	builders::finalize_ifile_entries(image)?;

	let pseg_nblocks = layout.total_blocks - layout.first_segment_block;
	let summary = SegmentSummary {
		datasum: 0,
		sumsum: 0,
		magic: MAGIC as u32,
		bytes: header_len as u32,
		flags: SS_LOGBGN | SS_LOGEND | SS_SR,
		seq: 0,
		create: image.ctime,
		next: layout.blocks_per_segment,
		nblocks: pseg_nblocks as u32,
		nfinfo: files.len() as u32,
		sumbytes,
	};
	image
		.pool
		.encode_at(layout.first_segment_block, 0, &summary)?;

	let super_root = SuperRoot {
		sum: 0,
		bytes: layout.super_root_bytes() as u32,
		create: image.ctime,
		flags: 0,
		dat: *image.inodes.get(&DAT_INO).expect("dat inode registered"),
		cpfile: *image
			.inodes
			.get(&crate::consts::CPFILE_INO)
			.expect("cpfile inode registered"),
		sufile: *image
			.inodes
			.get(&crate::consts::SUFILE_INO)
			.expect("sufile inode registered"),
	};
	image.pool.encode_at(layout.super_root_block, 0, &super_root)?;

	Ok(())
}

fn file_start_block(layout: &crate::layout::Layout, ino: u64) -> u64 {
	use crate::consts::*;
	match ino {
		ROOT_INO => layout.rootdir_block,
		IFILE_INO => layout.ifile.start_block,
		CPFILE_INO => layout.cpfile.start_block,
		SUFILE_INO => layout.sufile.start_block,
		DAT_INO => layout.dat.start_block,
		SKETCH_INO | NILFS_INO => 0, // zero-length; never actually indexed
		_ => unreachable!("file list is fixed to the seven reserved inodes"),
	}
}

fn set_bmap(image: &mut InitialImage, ino: u64, offset: u64, value: u64) -> Result<()> {
	let inode = image
		.inodes
		.get_mut(&ino)
		.ok_or_else(|| crate::error::internal!("no inode template registered for inode {ino}"))?;
	inode.bmap[(offset + 1) as usize] = value;
	Ok(())
}

fn write_dat_entry(image: &mut InitialImage, vbn: u64, physical: u64) -> Result<()> {
	let dat = image.layout.dat;
	let block = dat.entries_start_block() + vbn / dat.entries_per_block;
	let offset = (vbn % dat.entries_per_block) as usize * dat.entry_size;
	image
		.pool
		.encode_at(block, offset, &DatEntry::live(physical, CNO_MIN, CNO_MAX))
}

/// Mark VBNs `1..=vbns_allocated` as used in the DAT's own bitmap, on top
/// of the `build`-time reservation of VBN 0.
fn finalize_dat_bitmap(image: &mut InitialImage) -> Result<()> {
	let dat = image.layout.dat;
	let used = image.vbns_allocated() + 1; // + the reserved VBN 0 slot
	let bsize = image.pool.block_size() as u64;
	let nfrees = (bsize * 8 - used) as u32;
	image
		.pool
		.encode_at(dat.group_desc_block(), 0, &crate::ondisk::GroupDesc { nfrees })?;

	let bitmap = image.pool.get_mut(dat.bitmap_block())?;
	for bit in 0..used {
		let byte = (bit / 8) as usize;
		let mask = 1u8 << (bit % 8);
		bitmap[byte] |= mask;
	}
	Ok(())
}
