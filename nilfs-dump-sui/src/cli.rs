use std::path::PathBuf;

use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Parser)]
#[command(name = "nilfs-dump-sui", version, about)]
pub struct Cli {
	/// Path to the device
	pub device: PathBuf,

	#[command(flatten)]
	pub verbose: Verbosity<WarnLevel>,
}
