use assert_cmd::Command;

#[test]
fn missing_arguments_fails_cleanly() {
	Command::cargo_bin("mount.nilfs2").unwrap().assert().failure();
}

#[test]
fn mounting_an_ordinary_file_without_privileges_fails() {
	let img = tempfile::NamedTempFile::new().unwrap();
	img.as_file().set_len(4096).unwrap();
	let mountpoint = tempfile::tempdir().unwrap();

	Command::cargo_bin("mount.nilfs2")
		.unwrap()
		.arg(img.path())
		.arg(mountpoint.path())
		.assert()
		.failure();
}
