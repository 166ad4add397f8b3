use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

/// Invoked by `mount(8)` as `mount.nilfs2 device mountpoint [-o opts] [-n] [-v]`.
#[derive(Parser)]
#[command(name = "mount.nilfs2", version, about)]
pub struct Cli {
	/// Device to mount
	pub device: PathBuf,

	/// Mountpoint
	pub mountpoint: PathBuf,

	/// Filesystem type, as passed by mount(8) with -t
	#[arg(short = 't', long, default_value = "nilfs2")]
	pub fstype: String,

	/// Comma-separated mount options
	#[arg(short = 'o', long, default_value = "")]
	pub options: String,

	/// Don't call mount(2); only print what would be done
	#[arg(short = 'n', long)]
	pub no_mtab: bool,

	/// Verbose (print the resolved flags/data before mounting)
	#[arg(short = 'v', long)]
	pub verbose_output: bool,

	#[command(flatten)]
	pub verbose: Verbosity<WarnLevel>,
}
