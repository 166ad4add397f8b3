use std::path::PathBuf;

use clap::{ArgAction, Parser};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(name = "mkfs.nilfs2", version, about)]
pub struct Cli {
	/// Path to the device or image file to format
	pub device: PathBuf,

	/// Block size in bytes (power of two)
	#[arg(short = 'b', long, default_value_t = 4096)]
	pub block_size: u32,

	/// Blocks per segment (power of two)
	#[arg(short = 'B', long, default_value_t = 8192)]
	pub blocks_per_segment: u64,

	/// Volume label, truncated to 16 bytes
	#[arg(short = 'L', long, default_value = "")]
	pub label: String,

	/// Reserved-segment percentage, 1..99
	#[arg(short = 'm', long, default_value_t = 5)]
	pub reservation_percent: u32,

	/// Badblocks pre-scan; repeat (-cc) for a read-write scan
	#[arg(short = 'c', action = ArgAction::Count)]
	pub badblocks: u8,

	/// No-write dry run
	#[arg(short = 'n', long)]
	pub dry_run: bool,

	/// Suppress non-error output
	#[arg(short = 'q', long)]
	pub quiet: bool,

	/// Override the creation timestamp (epoch seconds)
	#[arg(short = 'P', long)]
	pub ctime: Option<i64>,

	#[command(flatten)]
	pub verbose: Verbosity<WarnLevel>,
}
