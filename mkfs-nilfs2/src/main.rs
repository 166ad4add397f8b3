use std::{process::Command, time::SystemTime};

use anyhow::{bail, Context, Result};
use clap::Parser;
use nilfs2_format::{
	consts::LABEL_LEN,
	formatter::{self, FormatRequest},
};

use crate::cli::Cli;

mod cli;

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::builder()
		.filter_level(cli.verbose.log_level_filter())
		.init();

	match run(&cli) {
		Ok(report) => {
			if !cli.quiet {
				println!(
					"mkfs.nilfs2: {} segments of {} blocks ({} blocks written), uuid {}",
					report.nsegments,
					report.blocks_per_segment,
					report.total_blocks_written,
					hex_uuid(&report.uuid),
				);
			}
			Ok(())
		}
		Err(e) => {
			eprintln!("mkfs.nilfs2: {e}");
			eprintln!("mkfs.nilfs2 {}", env!("CARGO_PKG_VERSION"));
			std::process::exit(1);
		}
	}
}

fn run(cli: &Cli) -> Result<nilfs2_format::formatter::FormatReport> {
	if cli.badblocks > 0 {
		run_badblocks_scan(cli)?;
	}

	let now = SystemTime::now()
		.duration_since(SystemTime::UNIX_EPOCH)
		.map(|d| d.as_secs() as i64)
		.unwrap_or(0);
	let ctime = cli.ctime.unwrap_or(now);
	if formatter::is_future_ctime(ctime, now) {
		log::warn!("creation timestamp {ctime} is in the future");
	}

	let mut label = [0u8; LABEL_LEN];
	let bytes = cli.label.as_bytes();
	let n = bytes.len().min(LABEL_LEN);
	label[..n].copy_from_slice(&bytes[..n]);

	let req = FormatRequest {
		device: cli.device.clone(),
		block_size: cli.block_size,
		blocks_per_segment: cli.blocks_per_segment,
		reservation_percent: cli.reservation_percent,
		volume_label: label,
		ctime,
		dry_run: cli.dry_run,
	};

	formatter::format(&req).context("format failed")
}

fn run_badblocks_scan(cli: &Cli) -> Result<()> {
	let mut cmd = Command::new("badblocks");
	if cli.badblocks >= 2 {
		cmd.arg("-w");
	}
	cmd.arg(&cli.device);
	let status = cmd.status().context("running badblocks")?;
	if !status.success() {
		bail!("badblocks pre-scan reported failures on {}", cli.device.display());
	}
	Ok(())
}

fn hex_uuid(uuid: &[u8; 16]) -> String {
	uuid.iter().map(|b| format!("{b:02x}")).collect()
}
