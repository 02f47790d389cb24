#![allow(dead_code)]

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn tagtree_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("tagtree"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("TAGTREE_LOG");
	cmd
}

/// Write `files` into a fresh temporary directory.
pub fn project(files: &[(&str, &str)]) -> std::io::Result<tempfile::TempDir> {
	let tmp = tempfile::tempdir()?;
	for (name, content) in files {
		let path = tmp.path().join(name);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(path, content)?;
	}
	Ok(tmp)
}

pub const HELLO_EVENTS: &str = r#"[
	{"event": "text", "text": "Hello "},
	{"event": "value", "name": "name"},
	{"event": "text", "text": "!"},
	{"event": "enter", "name": "items"},
	{"event": "text", "text": "<"},
	{"event": "value", "name": "x"},
	{"event": "text", "text": ">"},
	{"event": "leave", "name": "items"}
]"#;

pub const HELLO_DATA: &str = r#"{"name": "World", "items": [{"x": 1}, {"x": 2}]}"#;
