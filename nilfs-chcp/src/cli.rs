use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
	/// Demote back to a regular, garbage-collectible checkpoint
	Cp,
	/// Promote to a snapshot, exempt from garbage collection
	Ss,
}

#[derive(Parser)]
#[command(name = "chcp", version, about)]
pub struct Cli {
	/// Target mode
	pub mode: Mode,

	/// Path to the device
	pub device: PathBuf,

	/// Checkpoint numbers to change
	#[arg(required = true)]
	pub cno: Vec<String>,

	#[command(flatten)]
	pub verbose: Verbosity<WarnLevel>,
}
