mod common;

use rstest::rstest;
use tagtree_core::AnyEmptyResult;

fn render_in(
	tmp: &tempfile::TempDir,
	extra: &[&str],
) -> assert_cmd::assert::Assert {
	common::tagtree_cmd()
		.arg("render")
		.arg("--data")
		.arg(tmp.path().join("data.json"))
		.arg(tmp.path().join("events.json"))
		.arg("--path")
		.arg(tmp.path())
		.args(extra)
		.assert()
}

#[test]
fn render_hello_items() -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", common::HELLO_EVENTS),
		("data.json", common::HELLO_DATA),
	])?;

	render_in(&tmp, &[]).success().stdout("Hello World!<1><2>");

	Ok(())
}

#[rstest]
#[case::escaped(r#"[{"event": "value", "name": "html"}]"#, "&lt;b&gt;&amp;")]
#[case::raw(r#"[{"event": "value", "name": "html", "escape": false}]"#, "<b>&")]
#[case::pointer(r#"[{"event": "value", "name": "/a~1b/c"}]"#, "slash")]
#[case::inverted(
	r#"[{"event": "enter", "name": "none", "expected": false}, {"event": "text", "text": "empty"}, {"event": "leave", "name": "none"}]"#,
	"empty"
)]
#[case::object_iteration(
	r#"[{"event": "enter", "name": "map.*"}, {"event": "value", "name": "*"}, {"event": "text", "text": ";"}, {"event": "leave", "name": "map.*"}]"#,
	"one;two;"
)]
#[case::comparison(
	r#"[{"event": "enter", "name": "count>=3"}, {"event": "text", "text": "many"}, {"event": "leave", "name": "count>=3"}]"#,
	"many"
)]
fn render_templates(#[case] events: &str, #[case] expected: &str) -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", events),
		(
			"data.json",
			r#"{"html": "<b>&", "a/b": {"c": "slash"}, "none": [], "map": {"one": 1, "two": 2}, "count": 3}"#,
		),
	])?;

	render_in(&tmp, &[]).success().stdout(expected.to_string());

	Ok(())
}

#[test]
fn render_undefined_tags_softly() -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", r#"[{"event": "text", "text": "["}, {"event": "value", "name": "missing"}, {"event": "text", "text": "]"}]"#),
		("data.json", "{}"),
	])?;

	render_in(&tmp, &[]).success().stdout("[]");

	Ok(())
}

#[test]
fn render_strict_fails_on_undefined_tags() -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", r#"[{"event": "value", "name": "missing"}]"#),
		("data.json", "{}"),
	])?;

	render_in(&tmp, &["--strict"])
		.code(2)
		.stderr(predicates::str::contains("tagtree::undefined_tag"));

	Ok(())
}

#[test]
fn render_strict_from_config() -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", r#"[{"event": "value", "name": "missing"}]"#),
		("data.json", "{}"),
		("tagtree.toml", "strict = true\n"),
	])?;

	render_in(&tmp, &[])
		.code(2)
		.stderr(predicates::str::contains("tagtree::undefined_tag"));

	Ok(())
}

#[test]
fn render_with_extension_override() -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", r#"[{"event": "value", "name": "/a"}]"#),
		("data.json", r#"{"a": "pointer", "/a": "literal"}"#),
	])?;

	render_in(&tmp, &[]).success().stdout("pointer");
	render_in(&tmp, &["--extensions", "equal,compare"])
		.success()
		.stdout("literal");

	Ok(())
}

#[test]
fn render_rejects_unknown_extensions() -> AnyEmptyResult {
	let tmp = common::project(&[
		("events.json", "[]"),
		("data.json", "{}"),
	])?;

	render_in(&tmp, &["--extensions", "bogus"])
		.failure()
		.stderr(predicates::str::contains("unknown extension"));

	Ok(())
}

#[test]
fn render_partials() -> AnyEmptyResult {
	let tmp = common::project(&[
		(
			"events.json",
			r#"[{"event": "partial", "name": "header"}, {"event": "value", "name": "name"}]"#,
		),
		("data.json", r#"{"name": "World"}"#),
		("header.mustache", "<h1>Hi</h1> "),
	])?;

	render_in(&tmp, &[]).success().stdout("<h1>Hi</h1> World");

	Ok(())
}
