//! Splits a `-o` option string into kernel `MS_*` flag bits and a
//! filesystem-specific residual string, the way every mount helper's
//! option parser does.

pub struct ParsedOptions {
	pub flags: libc::c_ulong,
	pub residual: Vec<String>,
	pub explicit_ro: bool,
}

pub fn parse(options: &str) -> ParsedOptions {
	let mut flags: libc::c_ulong = 0;
	let mut residual = Vec::new();
	let mut explicit_ro = false;

	for token in options.split(',').filter(|t| !t.is_empty()) {
		match token {
			"ro" => {
				flags |= libc::MS_RDONLY;
				explicit_ro = true;
			}
			"rw" => explicit_ro = false,
			"remount" => flags |= libc::MS_REMOUNT,
			"noatime" => flags |= libc::MS_NOATIME,
			"nodev" => flags |= libc::MS_NODEV,
			"nosuid" => flags |= libc::MS_NOSUID,
			"noexec" => flags |= libc::MS_NOEXEC,
			"sync" => flags |= libc::MS_SYNCHRONOUS,
			_ if token.starts_with("gcpid=") => {}
			other => residual.push(other.to_owned()),
		}
	}

	ParsedOptions {
		flags,
		residual,
		explicit_ro,
	}
}

impl ParsedOptions {
	pub fn is_remount(&self) -> bool {
		self.flags & libc::MS_REMOUNT != 0
	}

	pub fn is_readonly(&self) -> bool {
		self.flags & libc::MS_RDONLY != 0
	}

	pub fn residual_joined(&self) -> String {
		self.residual.join(",")
	}
}

#[cfg(test)]
mod t {
	use super::*;

	#[test]
	fn splits_known_flags_from_residual() {
		let p = parse("noatime,ro,foo=bar,nodev");
		assert!(p.is_readonly());
		assert!(!p.is_remount());
		assert_eq!(p.residual, vec!["foo=bar".to_string()]);
	}

	#[test]
	fn strips_a_stray_gcpid() {
		let p = parse("rw,gcpid=123");
		assert!(p.residual.is_empty());
		assert!(!p.is_readonly());
	}

	#[test]
	fn recognizes_remount() {
		let p = parse("remount,rw");
		assert!(p.is_remount());
		assert!(!p.is_readonly());
	}
}
