use std::fs::OpenOptions;

use clap::Parser;
use nilfs2_format::{cno, ioctl, lock};

use crate::cli::{Cli, Mode};

mod cli;

fn main() {
	let cli = Cli::parse();

	env_logger::builder()
		.filter_level(cli.verbose.log_level_filter())
		.init();

	let file = match OpenOptions::new().read(true).write(true).open(&cli.device) {
		Ok(f) => f,
		Err(e) => {
			eprintln!("chcp: {}: {e}", cli.device.display());
			std::process::exit(1);
		}
	};

	let _guard = match lock::acquire(&file) {
		Ok(g) => g,
		Err(e) => {
			eprintln!("chcp: {e}");
			std::process::exit(1);
		}
	};

	let snapshot = cli.mode == Mode::Ss;
	let mut all_ok = true;
	for arg in &cli.cno {
		match cno::parse_cno(arg) {
			Ok(n) => {
				if let Err(e) = ioctl::set_checkpoint_mode(&file, n, snapshot) {
					eprintln!("chcp: {arg}: {e}");
					all_ok = false;
				}
			}
			Err(e) => {
				eprintln!("chcp: {arg}: {e}");
				all_ok = false;
			}
		}
	}

	std::process::exit(if all_ok { 0 } else { 1 });
}
