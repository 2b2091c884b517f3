mod common;

use callout_core::AnyEmptyResult;
use callout_core::CalloutConfig;

#[test]
fn init_creates_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::callout_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"));

	let content = std::fs::read_to_string(tmp.path().join("callout.toml"))?;
	let config = CalloutConfig::parse(&content)?;
	assert_eq!(config.docs_dir, CalloutConfig::default().docs_dir);
	assert!(!config.relocate);
	assert!(config.kinds.is_empty());

	Ok(())
}

#[test]
fn init_leaves_existing_config_alone() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write(tmp.path(), ".config/callout.toml", "docs_dir = \"site\"\n")?;

	common::callout_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Config file already exists"));

	assert!(!tmp.path().join("callout.toml").exists());
	let content = std::fs::read_to_string(tmp.path().join(".config/callout.toml"))?;
	assert_eq!(content, "docs_dir = \"site\"\n");

	Ok(())
}
