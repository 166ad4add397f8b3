use std::path::PathBuf;

/// Errors raised while computing a layout or formatting a device.
///
/// Variants map onto the error kinds every tool in this toolkit agrees on:
/// configuration problems are caught before any I/O, environment and mount
/// conflicts are checked before the device is opened for writing, sizing
/// failures are reported with the concrete shortfall, and internal/IO
/// errors cover everything that shouldn't be reachable from valid input.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
	#[error("{0}")]
	Configuration(String),

	#[error("{path}: {reason}")]
	Environment { path: PathBuf, reason: String },

	#[error("{0}: device is mounted")]
	MountConflict(PathBuf),

	#[error("no checkpoint")]
	NoCheckpoint(u64),

	#[error("{0}")]
	Sizing(String),

	#[error("internal error: {0}")]
	Internal(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FormatError>;

/// (INTERNAL) Build a [`FormatError::Internal`] with a formatted message,
/// for invariants that a correct caller can never violate.
macro_rules! internal {
	($($tk:tt)+) => {
		$crate::FormatError::Internal(format!($($tk)+))
	};
}
pub(crate) use internal;
