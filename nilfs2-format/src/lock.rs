//! Advisory write-intent lock used by the auxiliary CLIs (mode-change,
//! dump, mount helper) to serialize access to a device's ioctl control
//! file: byte 0, length [`crate::consts::LOCK_LEN`], held for the
//! duration of the operation.

use std::os::unix::io::AsRawFd;

use crate::{consts::LOCK_LEN, error::internal, Result};

/// RAII guard releasing the lock (`F_UNLCK`) on drop.
pub struct WriteIntentLock<'a> {
	fd: std::os::unix::io::RawFd,
	_file: std::marker::PhantomData<&'a ()>,
}

fn flock(fd: libc::c_int, cmd: libc::c_int, lock_type: libc::c_short) -> Result<()> {
	let mut fl: libc::flock = unsafe { std::mem::zeroed() };
	fl.l_type = lock_type;
	fl.l_whence = libc::SEEK_SET as libc::c_short;
	fl.l_start = 0;
	fl.l_len = LOCK_LEN;

	let ret = unsafe { libc::fcntl(fd, cmd, &mut fl as *mut libc::flock) };
	if ret == -1 {
		return Err(internal!("fcntl lock failed: {}", std::io::Error::last_os_error()));
	}
	Ok(())
}

/// Acquire the write-intent lock, blocking until it is available.
pub fn acquire<'a>(file: &'a impl AsRawFd) -> Result<WriteIntentLock<'a>> {
	let fd = file.as_raw_fd();
	flock(fd, libc::F_SETLKW, libc::F_WRLCK as libc::c_short)?;
	Ok(WriteIntentLock {
		fd,
		_file: std::marker::PhantomData,
	})
}

/// Try to acquire the write-intent lock without blocking.
pub fn try_acquire<'a>(file: &'a impl AsRawFd) -> Result<Option<WriteIntentLock<'a>>> {
	let fd = file.as_raw_fd();
	match flock(fd, libc::F_SETLK, libc::F_WRLCK as libc::c_short) {
		Ok(()) => Ok(Some(WriteIntentLock {
			fd,
			_file: std::marker::PhantomData,
		})),
		Err(_) => Ok(None),
	}
}

impl Drop for WriteIntentLock<'_> {
	fn drop(&mut self) {
		let _ = flock(self.fd, libc::F_SETLK, libc::F_UNLCK as libc::c_short);
	}
}
