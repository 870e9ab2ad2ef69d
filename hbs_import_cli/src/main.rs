use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use hbs_import_cli::Commands;
use hbs_import_cli::HbsImportCli;
use hbs_import_cli::OutputFormat;
use hbs_import_core::FileTransformer;
use hbs_import_core::ImportError;
use hbs_import_core::ImportTransformer;
use hbs_import_core::TransformerConfig;
use hbs_import_core::config::CONFIG_FILE_CANDIDATES;
use hbs_import_core::config::HbsImportConfig;
use hbs_import_core::project::ProcessResult;
use hbs_import_core::project::ScanOptions;
use hbs_import_core::project::process_project;
use hbs_import_core::project::relative_file_key;
use hbs_import_core::project::write_outputs;
use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn main() {
	let args = HbsImportCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Transform {
			file,
			relative_path,
		}) => run_transform(&args, file, relative_path.as_deref()),
		Some(Commands::Check { format }) => run_check(&args, *format),
		Some(Commands::Build { out }) => run_build(&args, out),
		None => {
			eprintln!("No subcommand specified. Run `hbs-import --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<ImportError>() {
			Ok(import_err) => {
				let report: miette::Report = (*import_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr. `RUST_LOG` wins over the `--verbose` default.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_directive = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.try_init();
}

fn resolve_root(args: &HbsImportCli) -> PathBuf {
	let root = args
		.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
	std::path::absolute(&root).unwrap_or(root)
}

/// Build the transformer and scan options described by the project's config.
fn load_transformer(root: &Path) -> Result<(ImportTransformer, ScanOptions), ImportError> {
	let config = HbsImportConfig::load(root)?.unwrap_or_default();
	let transformer = ImportTransformer::new(
		TransformerConfig::new(config.components_root()?).with_exempt_paths(config.exempt_paths()),
	)?;
	let options = ScanOptions::from_config(Some(&config));
	tracing::debug!(
		root = %root.display(),
		components_root = transformer.project_root(),
		exempt = ?transformer.exempt_paths(),
		"loaded configuration"
	);

	Ok((transformer, options))
}

fn run_init(args: &HbsImportCli) -> CliResult {
	let root = resolve_root(args);

	if let Some(existing) = HbsImportConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	let sample_config = "# hbs-import configuration\n\n# Project-relative directory holding your \
	                     pod components.\n# Relative imports are rewritten against this \
	                     directory.\npod_module_prefix = \"app/pods\"\n\n# Templates where \
	                     invalid import names are reported inline\n# instead of failing the \
	                     build.\n# [exempt]\n# paths = [\"dummy/pods/application/template.hbs\"]\n\n# \
	                     Gitignore-style patterns to skip.\n# [exclude]\n# patterns = \
	                     [\"vendor/\"]\n";

	std::fs::write(&config_path, sample_config)?;
	println!("Created {}", config_path.display());

	Ok(())
}

fn run_transform(args: &HbsImportCli, file: &Path, relative_path: Option<&str>) -> CliResult {
	let root = resolve_root(args);
	let (transformer, _) = load_transformer(&root)?;

	let file = if file.is_absolute() {
		file.to_path_buf()
	} else {
		std::path::absolute(file)?
	};
	let relative_path = relative_path.map_or_else(
		|| relative_file_key(&root, &file),
		|path| path.replace('\\', "/"),
	);
	let content = std::fs::read_to_string(&file)?;

	match transformer.transform(&content, &relative_path) {
		Ok(output) => {
			print!("{output}");
			Ok(())
		}
		Err(error @ ImportError::InvalidLocalName { .. }) => {
			eprintln!("{:?}", miette::Report::new(error));
			process::exit(1);
		}
		Err(error) => Err(error.into()),
	}
}

fn run_check(args: &HbsImportCli, format: OutputFormat) -> CliResult {
	let root = resolve_root(args);
	let (transformer, options) = load_transformer(&root)?;
	let result = process_project(&root, &transformer, &options)?;

	match format {
		OutputFormat::Json => print_check_json(&result),
		OutputFormat::Text => {
			if args.verbose {
				print_file_list(&result);
			}
			if result.is_ok() {
				println!(
					"{} {} template(s) checked, {} import(s) in {} file(s).",
					colored!("Check passed:", green),
					result.files.len(),
					result.import_count(),
					result.rewritten_count(),
				);
			}
		}
	}

	if !result.is_ok() {
		let failures = result.failures.len();
		if matches!(format, OutputFormat::Text) {
			report_failures(result);
			eprintln!(
				"{} {failures} template(s) could not be rewritten.",
				colored!("Check failed:", red)
			);
		}
		process::exit(1);
	}

	Ok(())
}

fn run_build(args: &HbsImportCli, out: &Path) -> CliResult {
	let root = resolve_root(args);
	let (transformer, mut options) = load_transformer(&root)?;

	let out_dir = if out.is_absolute() {
		out.to_path_buf()
	} else {
		root.join(out)
	};
	// Never read back our own output.
	options.skip_dirs.push(out_dir.clone());

	let result = process_project(&root, &transformer, &options)?;

	if !result.is_ok() {
		let failures = result.failures.len();
		report_failures(result);
		eprintln!(
			"{} {failures} template(s) could not be rewritten. Nothing was written.",
			colored!("Build failed:", red)
		);
		process::exit(1);
	}

	if args.verbose {
		print_file_list(&result);
	}

	let written = write_outputs(&out_dir, &result)?;
	println!(
		"{} {written} template(s) to {} ({} import(s) rewritten).",
		colored!("Wrote", green),
		out_dir.display(),
		result.import_count(),
	);

	Ok(())
}

fn print_file_list(result: &ProcessResult) {
	println!("{}", colored!("Templates:", bold));
	for file in &result.files {
		println!("  {} ({} import(s))", file.relative_path, file.import_count);
	}
}

fn report_failures(result: ProcessResult) {
	let mut failures = result.failures;
	failures.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

	for failure in failures {
		eprintln!("{:?}", miette::Report::new(failure.error));
	}
}

fn print_check_json(result: &ProcessResult) {
	let files: Vec<serde_json::Value> = result
		.files
		.iter()
		.map(|file| {
			serde_json::json!({
				"path": file.relative_path,
				"output": relative_file_key(Path::new(""), &file.output_path),
				"fingerprint": file.fingerprint,
				"imports": file.import_count,
			})
		})
		.collect();
	let failures: Vec<serde_json::Value> = result
		.failures
		.iter()
		.map(|failure| {
			let name = match &failure.error {
				ImportError::InvalidLocalName { name, .. } => Some(name.as_str()),
				_ => None,
			};
			serde_json::json!({
				"path": failure.relative_path,
				"name": name,
				"message": failure.error.to_string(),
			})
		})
		.collect();

	let output = serde_json::json!({
		"ok": result.is_ok(),
		"files": files,
		"failures": failures,
	});
	println!("{output}");
}
