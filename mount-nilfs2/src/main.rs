use std::{
	ffi::CString,
	path::Path,
	process::Command,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use nilfs2_format::mtab::{self, MountEntry};

use crate::{cli::Cli, mountopts::ParsedOptions};

mod cli;
mod mountopts;

fn main() {
	let cli = Cli::parse();

	env_logger::builder()
		.filter_level(cli.verbose.log_level_filter())
		.init();

	if let Err(e) = run(&cli) {
		eprintln!("mount.nilfs2: {e}");
		std::process::exit(1);
	}
}

fn run(cli: &Cli) -> Result<()> {
	let parsed = mountopts::parse(&cli.options);
	let device = cli.device.to_string_lossy().into_owned();

	if cli.verbose_output {
		log::info!(
			"mount.nilfs2: flags=0x{:x} data={:?} remount={}",
			parsed.flags,
			parsed.residual_joined(),
			parsed.is_remount(),
		);
	}

	if !cli.no_mtab {
		do_mount(&cli.device, &cli.mountpoint, &cli.fstype, &parsed)?;
	}

	update_mtab(cli, &parsed, &device)
}

fn do_mount(device: &Path, mountpoint: &Path, fstype: &str, parsed: &ParsedOptions) -> Result<()> {
	let source = CString::new(device.to_string_lossy().as_bytes()).context("device path has an embedded NUL")?;
	let target = CString::new(mountpoint.to_string_lossy().as_bytes()).context("mountpoint has an embedded NUL")?;
	let fstype = CString::new(fstype.as_bytes()).context("fstype has an embedded NUL")?;
	let data = CString::new(parsed.residual_joined()).context("mount data has an embedded NUL")?;

	let ret = unsafe {
		libc::mount(
			source.as_ptr(),
			target.as_ptr(),
			fstype.as_ptr(),
			parsed.flags,
			data.as_ptr() as *const libc::c_void,
		)
	};
	if ret != 0 {
		bail!("mount({}, {}): {}", device.display(), mountpoint.display(), std::io::Error::last_os_error());
	}
	Ok(())
}

fn update_mtab(cli: &Cli, parsed: &ParsedOptions, device: &str) -> Result<()> {
	let mtab_path = Path::new(mtab::ETC_MTAB);
	let existing = mtab::find_entry(mtab_path, device).context("reading mount table")?;
	let want_rw = !parsed.is_readonly();

	let options = if parsed.is_remount() {
		if want_rw {
			let pid = match existing.as_ref().and_then(|e| mtab::gcpid_option(&e.options)) {
				Some(pid) => pid,
				None => spawn_cleaner(&cli.device)?,
			};
			mtab::set_gcpid_option(&parsed.residual_joined(), pid)
		} else {
			if let Some(pid) = existing.as_ref().and_then(|e| mtab::gcpid_option(&e.options)) {
				stop_cleaner(pid);
			}
			mtab::clear_gcpid_option(&parsed.residual_joined())
		}
	} else if want_rw {
		if mtab::is_rw_mounted(&cli.device, &cli.fstype).context("checking existing mounts")? {
			bail!("{} is already mounted read-write", cli.device.display());
		}
		let pid = spawn_cleaner(&cli.device)?;
		mtab::set_gcpid_option(&parsed.residual_joined(), pid)
	} else {
		mtab::clear_gcpid_option(&parsed.residual_joined())
	};

	mtab::record_entry(
		mtab_path,
		MountEntry {
			device: device.to_owned(),
			mountpoint: cli.mountpoint.to_string_lossy().into_owned(),
			fstype: cli.fstype.clone(),
			options,
			dump: 0,
			pass: 0,
		},
	)
	.context("updating mount table")
}

fn spawn_cleaner(device: &Path) -> Result<u32> {
	let child = Command::new("nilfs_cleanerd")
		.arg(device)
		.spawn()
		.context("spawning cleaner daemon")?;
	Ok(child.id())
}

fn stop_cleaner(pid: u32) {
	let ret = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
	if ret != 0 {
		log::warn!("failed to signal cleaner daemon pid {pid}: {}", std::io::Error::last_os_error());
	}
}
