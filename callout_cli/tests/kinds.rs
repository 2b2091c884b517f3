mod common;

use callout_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;
use serde_json::Value;

#[test]
fn kinds_lists_builtin_mapping() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::callout_cmd()
		.arg("kinds")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("[!error]")
				.and(predicates::str::contains("-> !!! danger"))
				.and(predicates::str::contains("[!note]")),
		);

	Ok(())
}

#[test]
fn kinds_text_output() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	let output = common::callout_cmd()
		.arg("kinds")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let stdout = String::from_utf8(output.stdout)?;
	insta::assert_snapshot!(stdout, @r"
	[!abstract]  -> !!! abstract
	[!bug]       -> !!! bug
	[!caution]   -> !!! caution
	[!danger]    -> !!! danger
	[!error]     -> !!! danger
	[!example]   -> !!! example
	[!important] -> !!! important
	[!info]      -> !!! info
	[!note]      -> !!! note
	[!question]  -> !!! question
	[!quote]     -> !!! quote
	[!seealso]   -> !!! seealso
	[!success]   -> !!! success
	[!summary]   -> !!! summary
	[!tip]       -> !!! tip
	[!todo]      -> !!! todo
	[!warning]   -> !!! warning
	");

	Ok(())
}

#[test]
fn kinds_json_includes_configured_labels() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "callout.toml", "[kinds]\nhint = \"tip\"\n")?;

	let output = common::callout_cmd()
		.arg("kinds")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;

	assert!(output.status.success());
	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["hint"], "tip");
	assert_eq!(json["note"], "note");
	assert_eq!(json["error"], "danger");

	Ok(())
}

#[test]
fn kinds_rejects_invalid_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "callout.toml", "unknown_key = 1\n")?;

	common::callout_cmd()
		.arg("kinds")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("callout::config_parse"));

	Ok(())
}
