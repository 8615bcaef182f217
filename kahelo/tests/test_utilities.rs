#![allow(unused)]

use assert_cmd::{Command, cargo};
use image::{Rgb, RgbImage};
use std::{
	fs,
	net::TcpListener,
	path::{Path, PathBuf},
};
use tempfile::{TempDir, tempdir};

#[cfg(windows)]
pub const BINARY_NAME: &str = "kahelo.exe";
#[cfg(not(windows))]
pub const BINARY_NAME: &str = "kahelo";

/// Helper to get a testdata file path.
pub fn get_testdata(filename: &str) -> PathBuf {
	PathBuf::from(env!("CARGO_MANIFEST_DIR"))
		.parent()
		.unwrap()
		.join("testdata")
		.join(filename)
}

/// Helper to get a temp output file path.
pub fn get_temp_output(filename: &str) -> (TempDir, PathBuf) {
	let dir = tempdir().expect("failed to create temp dir");
	let path = dir.path().join(filename);
	(dir, path)
}

/// Helper to create a Command for the kahelo binary, running in `dir`.
pub fn kahelo_cmd(dir: &Path) -> Command {
	let mut cmd = Command::new(cargo::cargo_bin!());
	cmd.current_dir(dir);
	cmd
}

/// Run `kahelo` with `args` in `dir`, expect success and return stdout.
pub fn kahelo_ok(dir: &Path, args: &[&str]) -> String {
	let output = kahelo_cmd(dir).args(args).assert().success().get_output().stdout.clone();
	String::from_utf8(output).unwrap()
}

/// Declare a FOLDER store of PNG tiles and fill it with one plain tile per coordinate.
pub fn make_folder_store(dir: &Path, name: &str, tiles: &[(u8, u32, u32)]) -> PathBuf {
	kahelo_ok(dir, &["describe", name, "--db-format", "FOLDER", "--tile-format", "PNG"]);
	let root = dir.join(name);
	for &(z, x, y) in tiles {
		let path = root.join(z.to_string()).join(x.to_string()).join(format!("{y}.png"));
		fs::create_dir_all(path.parent().unwrap()).unwrap();
		RgbImage::from_pixel(256, 256, Rgb([40, 120, 200])).save(&path).unwrap();
	}
	root
}

/// The value printed for `caption` in a report.
pub fn report_value(stdout: &str, caption: &str) -> u64 {
	let line = stdout
		.lines()
		.find(|line| line.starts_with(caption))
		.unwrap_or_else(|| panic!("no '{caption}' in:\n{stdout}"));
	line[caption.len()..].trim().replace(',', "").parse().unwrap()
}

pub fn free_port() -> u16 {
	TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
}
