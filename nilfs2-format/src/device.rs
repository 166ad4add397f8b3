//! Device writer: mount-conflict guard, device-size query, and the
//! durability-ordered write described in the on-disk format contract.

use std::{
	fs::{File, OpenOptions},
	io::{Seek, SeekFrom, Write},
	os::unix::fs::FileTypeExt,
	path::Path,
};

use crate::{consts::SB_OFFSET_BYTES, error::internal, image::InitialImage, mtab, FormatError, Result};

/// Query the size in bytes of `path`: the block-device size ioctl for a
/// block device, the plain file size otherwise (image-file mode).
pub fn query_size(path: &Path) -> Result<u64> {
	let meta = std::fs::metadata(path).map_err(|e| FormatError::Environment {
		path: path.to_owned(),
		reason: e.to_string(),
	})?;

	if meta.file_type().is_block_device() {
		let file = File::open(path).map_err(|e| FormatError::Environment {
			path: path.to_owned(),
			reason: e.to_string(),
		})?;
		block_device_size(&file).map_err(|e| FormatError::Environment {
			path: path.to_owned(),
			reason: e.to_string(),
		})
	} else {
		Ok(meta.len())
	}
}

#[cfg(target_os = "linux")]
fn block_device_size(file: &File) -> std::io::Result<u64> {
	use std::os::unix::io::AsRawFd;

	const BLKGETSIZE64: libc::c_ulong = 0x80081272;
	let mut size: u64 = 0;
	let ret = unsafe { libc::ioctl(file.as_raw_fd(), BLKGETSIZE64, &mut size as *mut u64) };
	if ret != 0 {
		return Err(std::io::Error::last_os_error());
	}
	Ok(size)
}

#[cfg(not(target_os = "linux"))]
fn block_device_size(_file: &File) -> std::io::Result<u64> {
	Err(std::io::Error::new(
		std::io::ErrorKind::Unsupported,
		"block device size query is only implemented on Linux",
	))
}

/// Abort with a mount-conflict error if `device` is currently mounted.
pub fn check_not_mounted(device: &Path) -> Result<()> {
	if mtab::is_mounted(device)? {
		return Err(FormatError::MountConflict(device.to_owned()));
	}
	Ok(())
}

/// Write the assembled, checksummed image to `device`.
///
/// Order: (a) every populated block of the initial segment, seeked and
/// written individually; (b) fsync; (c) the superblock at
/// [`SB_OFFSET_BYTES`]; (d) fsync. A crash before (d) leaves the device
/// looking like its prior state; nothing after (d) can leave a
/// half-written filesystem.
pub fn write_image(device: &Path, image: &InitialImage, dry_run: bool) -> Result<()> {
	if dry_run {
		return Ok(());
	}

	let mut file = OpenOptions::new()
		.read(true)
		.write(true)
		.open(device)
		.map_err(|e| FormatError::Environment {
			path: device.to_owned(),
			reason: e.to_string(),
		})?;

	let bsize = image.pool.block_size() as u64;
	for (blocknr, data) in image.pool.populated_blocks() {
		file.seek(SeekFrom::Start(blocknr * bsize))
			.map_err(write_failure)?;
		file.write_all(data).map_err(write_failure)?;
	}
	file.sync_all().map_err(write_failure)?;

	let sb_bytes = bincode::encode_to_vec(&image.superblock, crate::codec::CONFIG)
		.map_err(|e| internal!("encoding superblock for write: {e}"))?;
	file.seek(SeekFrom::Start(SB_OFFSET_BYTES)).map_err(write_failure)?;
	file.write_all(&sb_bytes).map_err(write_failure)?;
	file.sync_all().map_err(write_failure)?;

	Ok(())
}

fn write_failure(e: std::io::Error) -> FormatError {
	FormatError::Io(e)
}
