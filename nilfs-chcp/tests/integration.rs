use assert_cmd::Command;

#[test]
fn malformed_cno_fails_without_panicking() {
	let img = tempfile::NamedTempFile::new().unwrap();
	img.as_file().set_len(1024 * 1024).unwrap();

	let output = Command::cargo_bin("chcp")
		.unwrap()
		.args(["cp", img.path().to_str().unwrap(), "not-a-number"])
		.output()
		.unwrap();

	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("not-a-number"));
}

#[test]
fn missing_device_fails_cleanly() {
	Command::cargo_bin("chcp")
		.unwrap()
		.args(["cp", "/nonexistent/path/to/device", "1"])
		.assert()
		.failure();
}
