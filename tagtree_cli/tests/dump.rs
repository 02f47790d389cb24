mod common;

use similar_asserts::assert_eq;
use tagtree_core::AnyEmptyResult;

#[test]
fn dump_prints_tree_in_document_order() -> AnyEmptyResult {
	let tmp = common::project(&[("events.json", common::HELLO_EVENTS)])?;

	let output = common::tagtree_cmd()
		.arg("dump")
		.arg(tmp.path().join("events.json"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	assert_eq!(
		String::from_utf8(output)?,
		"= Hello \nE name\n= !\nBEGIN # items\n = <\n E x\n = >\nEND # items\n"
	);

	Ok(())
}

#[test]
fn dump_indents_nested_sections() -> AnyEmptyResult {
	let tmp = common::project(&[(
		"events.json",
		r#"[
			{"event": "enter", "name": "list"},
			{"event": "value", "name": "item"},
			{"event": "enter", "name": "empty", "expected": false},
			{"event": "text", "text": "none"},
			{"event": "leave", "name": "empty"},
			{"event": "leave", "name": "list"}
		]"#,
	)])?;

	let output = common::tagtree_cmd()
		.arg("dump")
		.arg(tmp.path().join("events.json"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.get_output()
		.stdout
		.clone();

	insta::assert_snapshot!(String::from_utf8(output)?, @r"
BEGIN # list
 E item
 BEGIN ^ empty
  = none
 END ^ empty
END # list
");

	Ok(())
}

#[test]
fn dump_inlines_partials_from_project_root() -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", r#"[{"event": "partial", "name": "header"}]"#),
		("header.mustache", "<h1>Hi</h1>"),
	])?;

	common::tagtree_cmd()
		.arg("dump")
		.arg(tmp.path().join("events.json"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("= <h1>Hi</h1>\n");

	Ok(())
}

#[test]
fn dump_uses_configured_partial_paths() -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", r#"[{"event": "partial", "name": "nav"}]"#),
		("tagtree.toml", "[partials]\nsuffix = \".html\"\npaths = [\"partials\"]\n"),
		("partials/nav.html", "<nav/>"),
	])?;

	common::tagtree_cmd()
		.arg("dump")
		.arg(tmp.path().join("events.json"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout("= <nav/>\n");

	Ok(())
}

#[test]
fn dump_reports_mismatched_sections() -> AnyEmptyResult {
	let tmp = common::project(&[(
		"events.json",
		r#"[{"event": "enter", "name": "a"}, {"event": "leave", "name": "b"}]"#,
	)])?;

	common::tagtree_cmd()
		.arg("dump")
		.arg(tmp.path().join("events.json"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("tagtree::closing"));

	Ok(())
}

#[test]
fn dump_respects_configured_max_depth() -> AnyEmptyResult {
	let tmp = common::project(&[
		(
			"events.json",
			r#"[
				{"event": "enter", "name": "a"},
				{"event": "enter", "name": "b"},
				{"event": "leave", "name": "b"},
				{"event": "leave", "name": "a"}
			]"#,
		),
		(".tagtree.toml", "max_depth = 1\n"),
	])?;

	common::tagtree_cmd()
		.arg("dump")
		.arg(tmp.path().join("events.json"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("tagtree::too_deep"));

	Ok(())
}

#[test]
fn dump_rejects_invalid_event_scripts() -> AnyEmptyResult {
	let tmp = common::project(&[("events.json", r#"[{"event": "unknown"}]"#)])?;

	common::tagtree_cmd()
		.arg("dump")
		.arg(tmp.path().join("events.json"))
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("error: invalid event script"));

	Ok(())
}

#[test]
fn missing_subcommand_fails() {
	common::tagtree_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("No subcommand specified"));
}
