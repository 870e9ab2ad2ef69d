use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::FileTransformer;
use crate::Fingerprint;
use crate::ImportError;
use crate::ImportResult;
use crate::config::CONFIG_FILE_CANDIDATES;
use crate::config::HbsImportConfig;
use crate::declaration::extract_imports;

/// Options for controlling how a project is scanned.
#[derive(Debug, Clone, Default)]
pub struct ScanOptions {
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
	/// Directories never descended into, compared by canonical path.
	/// Entries that do not exist are ignored.
	pub skip_dirs: Vec<PathBuf>,
}

impl ScanOptions {
	/// Construct [`ScanOptions`] from an [`HbsImportConfig`].
	pub fn from_config(config: Option<&HbsImportConfig>) -> Self {
		Self {
			exclude_patterns: config
				.map(|c| c.exclude.patterns.clone())
				.unwrap_or_default(),
			disable_gitignore: config.is_some_and(|c| c.disable_gitignore),
			skip_dirs: Vec::new(),
		}
	}
}

/// A template that was rewritten successfully.
#[derive(Debug, Clone)]
pub struct TransformedFile {
	/// Absolute path of the source template.
	pub source: PathBuf,
	/// Project-relative path with forward slashes, as passed to the
	/// transformer.
	pub relative_path: String,
	/// Project-relative path of the rewritten file, carrying the target
	/// extension.
	pub output_path: PathBuf,
	/// Cache key of the `(content, relative_path)` pair.
	pub fingerprint: Fingerprint,
	/// Rewritten template text.
	pub content: String,
	/// Number of import directives that were rewritten.
	pub import_count: usize,
}

/// A template the transformer refused to rewrite.
#[derive(Debug)]
pub struct TransformFailure {
	/// Absolute path of the source template.
	pub source: PathBuf,
	/// Project-relative path with forward slashes.
	pub relative_path: String,
	/// The error raised for this file.
	pub error: ImportError,
}

/// Outcome of running a transformer over every template in a project.
#[derive(Debug, Default)]
pub struct ProcessResult {
	pub files: Vec<TransformedFile>,
	pub failures: Vec<TransformFailure>,
}

impl ProcessResult {
	/// Returns true if every template was rewritten.
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}

	/// Number of templates that contained at least one import.
	pub fn rewritten_count(&self) -> usize {
		self.files.iter().filter(|file| file.import_count > 0).count()
	}

	/// Total number of import directives rewritten across all files.
	pub fn import_count(&self) -> usize {
		self.files.iter().map(|file| file.import_count).sum()
	}
}

/// Run `transformer` over every matching template below `root`.
///
/// Per-file problems are collected in [`ProcessResult::failures`] so that
/// all of them can be reported at once: invalid local names, templates that
/// are not UTF-8, and templates whose output paths collide. Any other error
/// aborts the run.
pub fn process_project(
	root: &Path,
	transformer: &dyn FileTransformer,
	options: &ScanOptions,
) -> ImportResult<ProcessResult> {
	let files = collect_template_files(root, transformer.extensions(), options)?;
	let mut result = ProcessResult::default();

	for file in files {
		let relative_path = relative_file_key(root, &file);
		let Ok(content) = String::from_utf8(std::fs::read(&file)?) else {
			tracing::debug!(file = %relative_path, "template is not valid UTF-8");
			result.failures.push(TransformFailure {
				source: file,
				error: ImportError::InvalidEncoding {
					file: relative_path.clone(),
				},
				relative_path,
			});
			continue;
		};
		let fingerprint = transformer.cache_key(&content, &relative_path);

		match transformer.transform(&content, &relative_path) {
			Ok(output) => {
				let import_count = extract_imports(&content).declarations.len();
				tracing::debug!(
					file = %relative_path,
					imports = import_count,
					%fingerprint,
					"transformed template"
				);
				result.files.push(TransformedFile {
					output_path: Path::new(&relative_path)
						.with_extension(transformer.target_extension()),
					source: file,
					relative_path,
					fingerprint,
					content: output,
					import_count,
				});
			}
			Err(error @ ImportError::InvalidLocalName { .. }) => {
				tracing::debug!(file = %relative_path, "template rejected");
				result.failures.push(TransformFailure {
					source: file,
					relative_path,
					error,
				});
			}
			Err(error) => return Err(error),
		}
	}

	reject_colliding_outputs(&mut result);

	Ok(result)
}

/// Move every file whose output path is shared with another file into the
/// failures, so that no output is silently overwritten.
fn reject_colliding_outputs(result: &mut ProcessResult) {
	let mut writers: HashMap<PathBuf, Vec<String>> = HashMap::new();
	for file in &result.files {
		writers
			.entry(file.output_path.clone())
			.or_default()
			.push(file.relative_path.clone());
	}

	if writers.values().all(|paths| paths.len() < 2) {
		return;
	}

	let (kept, colliding): (Vec<_>, Vec<_>) = std::mem::take(&mut result.files)
		.into_iter()
		.partition(|file| writers.get(&file.output_path).is_none_or(|paths| paths.len() < 2));
	result.files = kept;

	for file in colliding {
		let others = writers
			.get(&file.output_path)
			.map(|paths| {
				paths
					.iter()
					.filter(|path| **path != file.relative_path)
					.map(|path| format!("`{path}`"))
					.collect::<Vec<_>>()
					.join(", ")
			})
			.unwrap_or_default();
		let output = file.output_path.to_string_lossy().replace('\\', "/");
		tracing::debug!(file = %file.relative_path, %output, "output path collision");

		result.failures.push(TransformFailure {
			error: ImportError::OutputCollision {
				file: file.relative_path.clone(),
				output,
				others,
			},
			source: file.source,
			relative_path: file.relative_path,
		});
	}

	result
		.failures
		.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
}

/// Write every transformed file below `out_dir`, creating directories as
/// needed. Returns the number of files written.
pub fn write_outputs(out_dir: &Path, result: &ProcessResult) -> ImportResult<usize> {
	for file in &result.files {
		let destination = out_dir.join(&file.output_path);
		if let Some(parent) = destination.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&destination, &file.content)?;
	}

	Ok(result.files.len())
}

/// Project-relative path of `file` with forward slashes.
pub fn relative_file_key(root: &Path, file: &Path) -> String {
	file.strip_prefix(root)
		.unwrap_or(file)
		.to_string_lossy()
		.replace('\\', "/")
}

/// Collect all templates below `root` whose extension is in `extensions`.
///
/// When `disable_gitignore` is false (the default), files matched by the
/// project's `.gitignore` are skipped. Exclude patterns from `[exclude]` in
/// `hbs-import.toml` follow gitignore syntax and are always applied on top.
pub fn collect_template_files(
	root: &Path,
	extensions: &[&str],
	options: &ScanOptions,
) -> ImportResult<Vec<PathBuf>> {
	let mut files = Vec::new();
	let mut ancestors = HashSet::new();

	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};
	let custom_exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	let skip_dirs: HashSet<PathBuf> = options
		.skip_dirs
		.iter()
		.filter_map(|dir| dir.canonicalize().ok())
		.collect();

	let walker = Walker {
		extensions,
		gitignore: &gitignore,
		custom_exclude: &custom_exclude,
		skip_dirs: &skip_dirs,
	};
	walker.walk_dir(root, true, &mut files, &mut ancestors)?;
	// Sort for deterministic ordering.
	files.sort();
	Ok(files)
}

/// Build a `Gitignore` matcher from exclude patterns specified in
/// `hbs-import.toml` `[exclude]`.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> ImportResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			ImportError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| ImportError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}

/// Hidden directories and `node_modules` are skipped at any depth. Build
/// artifact directories only directly below the project root.
fn is_ignored_directory_name(name: &str, in_root: bool) -> bool {
	name.starts_with('.')
		|| name == "node_modules"
		|| (in_root && matches!(name, "target" | "dist" | "tmp"))
}

fn has_project_config(dir: &Path) -> bool {
	CONFIG_FILE_CANDIDATES
		.iter()
		.any(|candidate| dir.join(candidate).is_file())
}

struct Walker<'a> {
	extensions: &'a [&'a str],
	gitignore: &'a Gitignore,
	custom_exclude: &'a Gitignore,
	skip_dirs: &'a HashSet<PathBuf>,
}

impl Walker<'_> {
	fn walk_dir(
		&self,
		dir: &Path,
		is_root: bool,
		files: &mut Vec<PathBuf>,
		ancestors: &mut HashSet<PathBuf>,
	) -> ImportResult<()> {
		if !dir.is_dir() {
			return Ok(());
		}

		let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
		if self.skip_dirs.contains(&canonical) {
			tracing::debug!(dir = %dir.display(), "skipping directory");
			return Ok(());
		}

		// Only a directory that contains itself is a cycle. Reaching the same
		// directory again through a sibling alias is fine.
		if !ancestors.insert(canonical.clone()) {
			return Err(ImportError::SymlinkCycle {
				path: dir.display().to_string(),
			});
		}

		for entry in std::fs::read_dir(dir)? {
			let path = entry?.path();

			if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
				if is_ignored_directory_name(name, is_root) && path.is_dir() {
					continue;
				}
			}

			let is_dir = path.is_dir();

			if self.gitignore.matched(&path, is_dir).is_ignore() {
				continue;
			}

			if self.custom_exclude.matched(&path, is_dir).is_ignore() {
				continue;
			}

			if is_dir {
				// A nested config file marks a separate project.
				if !is_root && has_project_config(&path) {
					continue;
				}
				self.walk_dir(&path, false, files, ancestors)?;
			} else if self.is_template(&path) {
				files.push(path);
			}
		}

		ancestors.remove(&canonical);

		Ok(())
	}

	fn is_template(&self, path: &Path) -> bool {
		path.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| self.extensions.contains(&ext))
	}
}
