use assert_cmd::Command;

#[test]
fn fails_cleanly_on_a_non_filesystem_image() {
	let img = tempfile::NamedTempFile::new().unwrap();
	img.as_file().set_len(4096).unwrap();

	Command::cargo_bin("nilfs-dump-sui")
		.unwrap()
		.arg(img.path())
		.assert()
		.failure();
}

#[test]
fn missing_device_fails_cleanly() {
	Command::cargo_bin("nilfs-dump-sui")
		.unwrap()
		.arg("/nonexistent/path")
		.assert()
		.failure();
}
