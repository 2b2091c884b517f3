mod common;

use callout_cli::CalloutCli;
use callout_cli::Commands;
use callout_core::AnyEmptyResult;
use clap::Parser;
use predicates::prelude::PredicateBooleanExt;
use rstest::rstest;

#[test]
fn no_subcommand_converts_docs_directory() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(
		tmp.path(),
		"docs/guide.md",
		"# Guide\n\n> [!WARNING]\n> **Heads up**\n>\n> Mind the gap.\n",
	)?;

	common::callout_cmd()
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Converted 1 admonition(s) in 1 file(s).",
		));

	let content = std::fs::read_to_string(tmp.path().join("docs/guide.md"))?;
	similar_asserts::assert_eq!(
		content,
		"# Guide\n\n!!! warning \"Heads up\"\n    Mind the gap.\n"
	);

	Ok(())
}

#[test]
fn convert_is_idempotent() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "docs/index.md", "> [!NOTE]\n> Hello.\n")?;

	common::callout_cmd()
		.arg("convert")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::callout_cmd()
		.arg("convert")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("No admonitions to convert."));

	let content = std::fs::read_to_string(tmp.path().join("docs/index.md"))?;
	similar_asserts::assert_eq!(content, "!!! note\n    Hello.\n");

	Ok(())
}

#[test]
fn dry_run_leaves_files_untouched() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let original = "> [!TIP]\n> Try it.\n";
	common::write(tmp.path(), "docs/a.md", original)?;

	common::callout_cmd()
		.arg("convert")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Dry run: would convert 1 admonition(s) in 1 file(s):")
				.and(predicates::str::contains("docs/a.md (1)")),
		);

	let content = std::fs::read_to_string(tmp.path().join("docs/a.md"))?;
	similar_asserts::assert_eq!(content, original);

	Ok(())
}

#[test]
fn relocate_moves_top_level_markdown_and_converts() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "README.md", "# Project\n\n> [!IMPORTANT]\n> Read me.\n")?;
	common::write(tmp.path(), "CHANGELOG.md", "# Changes\n")?;
	common::write(tmp.path(), "notes.txt", "not markdown\n")?;

	common::callout_cmd()
		.arg("convert")
		.arg("--relocate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(
			predicates::str::contains("Moved README.md -> docs/index.md")
				.and(predicates::str::contains("Moved CHANGELOG.md -> docs/CHANGELOG.md")),
		);

	assert!(!tmp.path().join("README.md").exists());
	assert!(tmp.path().join("notes.txt").is_file());
	let index = std::fs::read_to_string(tmp.path().join("docs/index.md"))?;
	similar_asserts::assert_eq!(index, "# Project\n\n!!! important\n    Read me.\n");

	Ok(())
}

#[rstest]
#[case::upper("README.md")]
#[case::lower("readme.md")]
#[case::mixed("ReadMe.md")]
fn relocate_renames_readme_to_index(#[case] name: &str) -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), name, "# Home\n")?;

	common::callout_cmd()
		.arg("convert")
		.arg("--relocate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(format!(
			"Moved {name} -> docs/index.md"
		)));

	assert!(!tmp.path().join(name).exists());
	let index = std::fs::read_to_string(tmp.path().join("docs/index.md"))?;
	similar_asserts::assert_eq!(index, "# Home\n");

	Ok(())
}

#[test]
fn relocate_from_config_can_be_disabled_on_command_line() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "callout.toml", "relocate = true\n")?;
	common::write(tmp.path(), "README.md", "# Project\n")?;
	common::write(tmp.path(), "docs/a.md", "text\n")?;

	common::callout_cmd()
		.arg("convert")
		.arg("--no-relocate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	assert!(tmp.path().join("README.md").is_file());
	assert!(!tmp.path().join("docs/index.md").exists());

	Ok(())
}

#[test]
fn existing_destination_is_reported_and_kept() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "README.md", "# Root\n")?;
	common::write(tmp.path(), "docs/index.md", "# Existing\n")?;

	common::callout_cmd()
		.arg("convert")
		.arg("--relocate")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("left README.md in place"));

	let index = std::fs::read_to_string(tmp.path().join("docs/index.md"))?;
	similar_asserts::assert_eq!(index, "# Existing\n");
	assert!(tmp.path().join("README.md").is_file());

	Ok(())
}

#[test]
fn docs_dir_flag_overrides_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "callout.toml", "docs_dir = \"docs\"\n")?;
	common::write(tmp.path(), "site/page.md", "> [!CAUTION]\n> Hot.\n")?;

	common::callout_cmd()
		.arg("--docs-dir")
		.arg("site")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let content = std::fs::read_to_string(tmp.path().join("site/page.md"))?;
	similar_asserts::assert_eq!(content, "!!! caution\n    Hot.\n");

	Ok(())
}

#[test]
fn missing_docs_directory_exits_with_error() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::callout_cmd()
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("callout::missing_docs_dir"));

	Ok(())
}

#[test]
fn failing_file_does_not_stop_the_run() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join("docs"))?;
	std::fs::write(tmp.path().join("docs/bad.md"), [0xff_u8, 0xfe, 0x00])?;
	common::write(tmp.path(), "docs/good.md", "> [!NOTE]\n> Fine.\n")?;

	common::callout_cmd()
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(
			predicates::str::contains("bad.md")
				.and(predicates::str::contains("1 file(s) could not be converted")),
		);

	let good = std::fs::read_to_string(tmp.path().join("docs/good.md"))?;
	similar_asserts::assert_eq!(good, "!!! note\n    Fine.\n");

	Ok(())
}

#[test]
fn custom_kinds_from_config_are_applied() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "callout.toml", "[kinds]\nhint = \"tip\"\n")?;
	common::write(tmp.path(), "docs/a.md", "> [!HINT]\n> Psst.\n")?;

	common::callout_cmd()
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	let content = std::fs::read_to_string(tmp.path().join("docs/a.md"))?;
	similar_asserts::assert_eq!(content, "!!! tip\n    Psst.\n");

	Ok(())
}

#[test]
fn verbose_lists_unknown_labels() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), "docs/a.md", "> [!CUSTOM]\n> Kept.\n")?;

	common::callout_cmd()
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("left unknown [!CUSTOM] unchanged at docs/a.md:1"));

	Ok(())
}

#[test]
fn convert_flags_are_accepted_by_cli_parser() {
	let cli = CalloutCli::parse_from(["callout", "convert", "--relocate", "--dry-run"]);
	assert!(matches!(
		cli.command,
		Some(Commands::Convert {
			relocate: true,
			no_relocate: false,
			dry_run: true,
		})
	));

	let cli = CalloutCli::parse_from(["callout"]);
	assert!(cli.command.is_none());

	let result = CalloutCli::try_parse_from(["callout", "convert", "--relocate", "--no-relocate"]);
	assert!(result.is_err());
}
