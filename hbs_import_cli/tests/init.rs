mod common;

use hbs_import_core::AnyEmptyResult;
use hbs_import_core::config::HbsImportConfig;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::hbs_import_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"));

	let config_path = tmp.path().join("hbs-import.toml");
	assert!(config_path.exists());

	let config = HbsImportConfig::load(tmp.path())?.ok_or("missing config")?;
	assert_eq!(config.components_root()?, "app/pods");
	assert_eq!(
		config.exempt_paths(),
		vec!["dummy/pods/application/template.hbs".to_string()]
	);

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let config_path = tmp.path().join(".hbs-import.toml");
	std::fs::write(&config_path, "existing config")?;

	common::hbs_import_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	let content = std::fs::read_to_string(&config_path)?;
	assert_eq!(content, "existing config");
	assert!(!tmp.path().join("hbs-import.toml").exists());

	Ok(())
}
