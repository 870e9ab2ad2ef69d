use std::path::Path;

use assert_cmd::Command;
use hbs_import_core::AnyEmptyResult;
use insta_cmd::get_cargo_bin;

pub fn hbs_import_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("hbs-import"));
	cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
	cmd
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> AnyEmptyResult {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)?;
	Ok(())
}
