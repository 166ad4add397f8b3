//! Mount-table parsing: the formatter's mount-conflict guard and the mount
//! helper's `gcpid=` bookkeeping both read the same whitespace-delimited,
//! six-field format used by `/etc/mtab` and `/proc/mounts`.

use std::path::Path;

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountEntry {
	pub device: String,
	pub mountpoint: String,
	pub fstype: String,
	pub options: String,
	pub dump: u32,
	pub pass: u32,
}

pub const ETC_MTAB: &str = "/etc/mtab";
pub const PROC_MOUNTS: &str = "/proc/mounts";

/// Parse mount-table text: one entry per non-blank line, six
/// whitespace-delimited fields. Malformed lines are skipped rather than
/// rejecting the whole table, matching how a live `/proc/mounts` can race
/// with a concurrent mount/umount.
pub fn parse(data: &str) -> Vec<MountEntry> {
	data.lines()
		.filter_map(|line| {
			let mut fields = line.split_whitespace();
			let device = fields.next()?.to_owned();
			let mountpoint = fields.next()?.to_owned();
			let fstype = fields.next()?.to_owned();
			let options = fields.next()?.to_owned();
			let dump = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
			let pass = fields.next().and_then(|s| s.parse().ok()).unwrap_or(0);
			Some(MountEntry {
				device,
				mountpoint,
				fstype,
				options,
				dump,
				pass,
			})
		})
		.collect()
}

fn read_table(path: &Path) -> Result<Vec<MountEntry>> {
	let data = std::fs::read_to_string(path).map_err(|e| crate::FormatError::Environment {
		path: path.to_owned(),
		reason: e.to_string(),
	})?;
	Ok(parse(&data))
}

/// Whether `device` appears as the first field of any entry in the host's
/// mount table or the kernel's live `/proc/mounts`.
pub fn is_mounted(device: &Path) -> Result<bool> {
	is_mounted_via(device, Path::new(ETC_MTAB), Path::new(PROC_MOUNTS))
}

fn is_mounted_via(device: &Path, mtab: &Path, proc_mounts: &Path) -> Result<bool> {
	let device_str = device.to_string_lossy();
	for path in [mtab, proc_mounts] {
		if !path.exists() {
			continue;
		}
		let entries = read_table(path)?;
		if entries.iter().any(|e| e.device == device_str) {
			return Ok(true);
		}
	}
	Ok(false)
}

/// Whether `device` is currently mounted read-write as `fstype`. Unlike
/// [`is_mounted`], an existing read-only mount (of this or any other
/// filesystem type) does not count.
pub fn is_rw_mounted(device: &Path, fstype: &str) -> Result<bool> {
	is_rw_mounted_via(device, fstype, Path::new(ETC_MTAB), Path::new(PROC_MOUNTS))
}

fn is_rw_mounted_via(device: &Path, fstype: &str, mtab: &Path, proc_mounts: &Path) -> Result<bool> {
	let device_str = device.to_string_lossy();
	for path in [mtab, proc_mounts] {
		if !path.exists() {
			continue;
		}
		let entries = read_table(path)?;
		if entries
			.iter()
			.any(|e| e.device == device_str && e.fstype == fstype && e.options.split(',').any(|o| o == "rw"))
		{
			return Ok(true);
		}
	}
	Ok(false)
}

/// Return `options` with `gcpid=<pid>` set, replacing any existing
/// `gcpid=` entry.
pub fn set_gcpid_option(options: &str, pid: u32) -> String {
	let mut parts: Vec<String> = options
		.split(',')
		.filter(|p| !p.is_empty() && !p.starts_with("gcpid="))
		.map(str::to_owned)
		.collect();
	parts.push(format!("gcpid={pid}"));
	parts.join(",")
}

/// Return `options` with any `gcpid=` entry removed.
pub fn clear_gcpid_option(options: &str) -> String {
	options
		.split(',')
		.filter(|p| !p.is_empty() && !p.starts_with("gcpid="))
		.collect::<Vec<_>>()
		.join(",")
}

/// Extract the `gcpid=` value from an options string, if present.
pub fn gcpid_option(options: &str) -> Option<u32> {
	options
		.split(',')
		.find_map(|p| p.strip_prefix("gcpid="))
		.and_then(|s| s.parse().ok())
}

fn serialize(entries: &[MountEntry]) -> String {
	entries
		.iter()
		.map(|e| format!("{} {} {} {} {} {}\n", e.device, e.mountpoint, e.fstype, e.options, e.dump, e.pass))
		.collect()
}

fn write_table(path: &Path, entries: &[MountEntry]) -> Result<()> {
	std::fs::write(path, serialize(entries)).map_err(|e| crate::FormatError::Environment {
		path: path.to_owned(),
		reason: e.to_string(),
	})
}

/// Replace (or append) `entry`'s row, matched by device path, in the
/// mount table at `mtab_path`.
pub fn record_entry(mtab_path: &Path, entry: MountEntry) -> Result<()> {
	let mut entries = if mtab_path.exists() {
		read_table(mtab_path)?
	} else {
		Vec::new()
	};
	entries.retain(|e| e.device != entry.device);
	entries.push(entry);
	write_table(mtab_path, &entries)
}

/// Remove the row for `device` from the mount table at `mtab_path`.
pub fn remove_device(mtab_path: &Path, device: &str) -> Result<()> {
	let mut entries = if mtab_path.exists() {
		read_table(mtab_path)?
	} else {
		return Ok(());
	};
	entries.retain(|e| e.device != device);
	write_table(mtab_path, &entries)
}

/// Look up the row for `device` in the mount table at `mtab_path`.
pub fn find_entry(mtab_path: &Path, device: &str) -> Result<Option<MountEntry>> {
	if !mtab_path.exists() {
		return Ok(None);
	}
	Ok(read_table(mtab_path)?.into_iter().find(|e| e.device == device))
}

#[cfg(test)]
mod t {
	use super::*;

	#[test]
	fn parses_six_field_lines() {
		let data = "/dev/sda1 / ext4 rw,relatime 0 1\n/dev/sdb1 /mnt nilfs2 rw,noatime 0 2\n";
		let entries = parse(data);
		assert_eq!(entries.len(), 2);
		assert_eq!(entries[1].device, "/dev/sdb1");
		assert_eq!(entries[1].fstype, "nilfs2");
		assert_eq!(entries[1].pass, 2);
	}

	#[test]
	fn skips_malformed_lines() {
		let entries = parse("garbage\n/dev/sda1 / ext4 rw 0 1\n");
		assert_eq!(entries.len(), 1);
	}

	#[test]
	fn gcpid_roundtrip() {
		let opts = "rw,noatime";
		let with_pid = set_gcpid_option(opts, 4242);
		assert_eq!(gcpid_option(&with_pid), Some(4242));
		let cleared = clear_gcpid_option(&with_pid);
		assert_eq!(gcpid_option(&cleared), None);
	}

	#[test]
	fn replaces_existing_gcpid() {
		let opts = set_gcpid_option("rw,gcpid=1", 2);
		assert_eq!(gcpid_option(&opts), Some(2));
		assert_eq!(opts.matches("gcpid=").count(), 1);
	}

	#[test]
	fn rw_mounted_ignores_an_existing_ro_mount() {
		let tmp = tempfile::tempdir().unwrap();
		let mtab = tmp.path().join("mtab");
		let proc_mounts = tmp.path().join("mounts");
		std::fs::write(&mtab, "/dev/sdb1 /mnt nilfs2 ro 0 0\n").unwrap();
		std::fs::write(&proc_mounts, "").unwrap();

		let device = Path::new("/dev/sdb1");
		assert!(!is_rw_mounted_via(device, "nilfs2", &mtab, &proc_mounts).unwrap());

		std::fs::write(&mtab, "/dev/sdb1 /mnt nilfs2 rw 0 0\n").unwrap();
		assert!(is_rw_mounted_via(device, "nilfs2", &mtab, &proc_mounts).unwrap());
	}
}
