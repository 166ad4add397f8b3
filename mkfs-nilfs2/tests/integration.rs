use assert_cmd::Command;
use std::io::Write;

fn image_file(size: u64) -> tempfile::NamedTempFile {
	let mut f = tempfile::NamedTempFile::new().unwrap();
	f.as_file_mut().set_len(size).unwrap();
	f.flush().unwrap();
	f
}

#[test]
fn dry_run_succeeds_without_writing() {
	let img = image_file(64 * 1024 * 1024);
	let before = std::fs::read(img.path()).unwrap();

	Command::cargo_bin("mkfs.nilfs2")
		.unwrap()
		.arg("-n")
		.arg("-q")
		.arg(img.path())
		.assert()
		.success();

	let after = std::fs::read(img.path()).unwrap();
	assert_eq!(before, after, "dry run must not touch the device");
}

#[test]
fn formats_a_small_image_file() {
	let img = image_file(64 * 1024 * 1024);

	Command::cargo_bin("mkfs.nilfs2")
		.unwrap()
		.arg("-q")
		.arg(img.path())
		.assert()
		.success();

	let data = std::fs::read(img.path()).unwrap();
	// The superblock magic should now appear at its fixed byte offset.
	assert_ne!(&data[1024..1026], &[0u8, 0u8]);
}

#[test]
fn rejects_a_device_too_small_for_one_segment() {
	let img = image_file(64 * 1024);

	Command::cargo_bin("mkfs.nilfs2")
		.unwrap()
		.arg(img.path())
		.assert()
		.failure();
}
