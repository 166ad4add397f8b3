use std::{
	fs::File,
	io::{Read, Seek, SeekFrom},
};

use clap::Parser;
use nilfs2_format::{
	codec::{self, CONFIG},
	consts::{SB_OFFSET_BYTES, SU_FLAG_ACTIVE, SU_FLAG_DIRTY, SU_FLAG_ERROR},
	ioctl,
	ondisk::{SegmentUsage, Superblock},
};

use crate::cli::Cli;

mod cli;

const NSUINFO_BATCH: usize = nilfs2_format::consts::NSUINFO_BATCH;

fn main() {
	let cli = Cli::parse();

	env_logger::builder()
		.filter_level(cli.verbose.log_level_filter())
		.init();

	match run(&cli) {
		Ok(()) => {}
		Err(e) => {
			eprintln!("nilfs-dump-sui: {e}");
			std::process::exit(1);
		}
	}
}

fn run(cli: &Cli) -> anyhow::Result<()> {
	let mut file = File::open(&cli.device)?;
	let nsegments = read_nsegments(&mut file)?;

	let entry_size = codec::encoded_len(&SegmentUsage::default());
	let mut buf = vec![0u8; entry_size * NSUINFO_BATCH];

	let mut segnum = 0u64;
	while segnum < nsegments {
		let filled = ioctl::get_suinfo(&file, segnum, &mut buf, entry_size as u32)?;
		if filled == 0 {
			break;
		}
		for i in 0..filled as usize {
			let offset = i * entry_size;
			let (su, _): (SegmentUsage, usize) = bincode::decode_from_slice(&buf[offset..], CONFIG)?;
			println!("{} {}{}", su.last_mod, su.nblocks, flag_suffix(su.flags));
		}
		segnum += filled as u64;
	}

	Ok(())
}

fn read_nsegments(file: &mut File) -> anyhow::Result<u64> {
	file.seek(SeekFrom::Start(SB_OFFSET_BYTES))?;
	let mut buf = vec![0u8; codec::encoded_len(&Superblock::default())];
	file.read_exact(&mut buf)?;
	let (sb, _): (Superblock, usize) = bincode::decode_from_slice(&buf, CONFIG)?;
	Ok(sb.nsegments)
}

fn flag_suffix(flags: u32) -> String {
	let mut s = String::new();
	if flags & SU_FLAG_ACTIVE != 0 {
		s.push('a');
	}
	if flags & SU_FLAG_DIRTY != 0 {
		s.push('d');
	}
	if flags & SU_FLAG_ERROR != 0 {
		s.push('e');
	}
	if s.is_empty() {
		s
	} else {
		format!(" {s}")
	}
}
