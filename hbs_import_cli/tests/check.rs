mod common;

use std::path::Path;

use hbs_import_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

fn sample_project(root: &Path) -> AnyEmptyResult {
	common::write_file(root, "hbs-import.toml", "pod_module_prefix = \"app/pods\"\n")?;
	common::write_file(
		root,
		"app/pods/index/template.hbs",
		"{{import FooBar from \"./foo-bar\"}}\n{{import Card from '../card'}}\n<FooBar /><Card />",
	)?;
	common::write_file(root, "app/pods/card/template.hbs", "<div class=\"card\"></div>")?;
	Ok(())
}

#[test]
fn check_passes_for_valid_project() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	sample_project(tmp.path())?;

	common::hbs_import_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains(
			"Check passed: 2 template(s) checked, 2 import(s) in 1 file(s).",
		));

	Ok(())
}

#[test]
fn check_verbose_lists_templates() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	sample_project(tmp.path())?;

	common::hbs_import_cmd()
		.arg("check")
		.arg("--verbose")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Templates:"))
		.stdout(predicates::str::contains(
			"app/pods/index/template.hbs (2 import(s))",
		));

	Ok(())
}

#[test]
fn check_fails_for_invalid_local_name() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	sample_project(tmp.path())?;
	common::write_file(
		tmp.path(),
		"app/pods/broken/template.hbs",
		"{{import foo-bar from \"./foo-bar\"}}",
	)?;

	common::hbs_import_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stdout(predicates::str::contains("Check passed").not())
		.stderr(predicates::str::contains(
			"\"foo-bar\" is not allowed as a variable name for a template import",
		))
		.stderr(predicates::str::contains(
			"Check failed: 1 template(s) could not be rewritten.",
		));

	Ok(())
}

#[test]
fn check_json_reports_files() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	sample_project(tmp.path())?;

	let output = common::hbs_import_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert!(output.status.success());

	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], serde_json::Value::Bool(true));
	assert_eq!(json["failures"].as_array().map(Vec::len), Some(0));

	let files = json["files"].as_array().ok_or("files should be an array")?;
	assert_eq!(files.len(), 2);
	assert_eq!(files[0]["path"], "app/pods/card/template.hbs");
	assert_eq!(files[0]["imports"], 0);
	assert_eq!(files[1]["path"], "app/pods/index/template.hbs");
	assert_eq!(files[1]["output"], "app/pods/index/template.hbs");
	assert_eq!(files[1]["imports"], 2);
	assert_eq!(
		files[1]["fingerprint"].as_str().map(str::len),
		Some(64),
		"fingerprint should be a hex sha-256 digest"
	);

	Ok(())
}

#[test]
fn check_json_reports_failures() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	sample_project(tmp.path())?;
	common::write_file(
		tmp.path(),
		"app/pods/broken/template.hbs",
		"{{import foo from \"./foo\"}}",
	)?;

	let output = common::hbs_import_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert_eq!(output.status.code(), Some(1));

	let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], serde_json::Value::Bool(false));

	let failures = json["failures"]
		.as_array()
		.ok_or("failures should be an array")?;
	assert_eq!(failures.len(), 1);
	assert_eq!(failures[0]["path"], "app/pods/broken/template.hbs");
	assert_eq!(failures[0]["name"], "foo");

	Ok(())
}

#[test]
fn check_allows_exempt_fixture() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(tmp.path(), "hbs-import.toml", "pod_module_prefix = \"dummy/pods\"\n")?;
	common::write_file(
		tmp.path(),
		"dummy/pods/application/template.hbs",
		"{{import foo from \"./foo\"}}",
	)?;

	common::hbs_import_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Check passed"))
		.stderr(predicates::str::contains("is not allowed as a variable name"));

	Ok(())
}

#[test]
fn check_respects_exclude_patterns() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		"hbs-import.toml",
		"pod_module_prefix = \"app/pods\"\n\n[exclude]\npatterns = [\"vendor/\"]\n",
	)?;
	common::write_file(tmp.path(), "app/pods/index/template.hbs", "Hello")?;
	common::write_file(
		tmp.path(),
		"vendor/broken.hbs",
		"{{import lower from \"./lower\"}}",
	)?;

	common::hbs_import_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("1 template(s) checked"));

	Ok(())
}
