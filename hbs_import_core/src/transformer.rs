use std::fmt::Display;
use std::sync::Arc;

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;

use crate::ImportDeclaration;
use crate::ImportError;
use crate::ImportLogger;
use crate::ImportResult;
use crate::TracingLogger;
use crate::declaration::ExtractedImports;
use crate::declaration::extract_imports;
use crate::resolve::normalize_slashes;
use crate::resolve::resolve_declarations;

/// File extensions the transformer accepts.
pub const TEMPLATE_EXTENSIONS: [&str; 2] = ["hbs", "handlebars"];

/// Extension given to rewritten files.
pub const TARGET_EXTENSION: &str = "hbs";

/// Template paths where an invalid local name is reported inline instead of
/// failing the file. Used by the dummy application's fixture template.
pub const DEFAULT_EXEMPT_PATHS: [&str; 1] = ["dummy/pods/application/template.hbs"];

/// The generic naming rule shown next to every invalid-name warning.
pub const NAMING_HINT: &str =
	"hbs-import: allowed import variable names are CamelCased strings, like: FooBar, TomDale";

const CLOSE_SCOPE: &str = "{{/let}}";

/// Deterministic cache key for a `(content, relative_path)` pair.
///
/// The transform is pure, so identical fingerprints always map to identical
/// output.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
	pub fn of(content: &str, relative_path: &str) -> Self {
		let mut hasher = Sha256::new();
		// Length prefix keeps `("ab", "c")` and `("a", "bc")` apart.
		hasher.update(u64::try_from(content.len()).unwrap_or(u64::MAX).to_le_bytes());
		hasher.update(content.as_bytes());
		hasher.update(relative_path.as_bytes());
		Self(hex::encode(hasher.finalize()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl Display for Fingerprint {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// A text-in/text-out transform applied to every matching file of a build
/// tree.
pub trait FileTransformer: Send + Sync {
	/// Rewrite `content`, which lives at the project-relative `relative_path`.
	fn transform(&self, content: &str, relative_path: &str) -> ImportResult<String>;

	/// Extensions (without the dot) of the files this transformer handles.
	fn extensions(&self) -> &[&str] {
		&TEMPLATE_EXTENSIONS
	}

	/// Extension given to the rewritten files.
	fn target_extension(&self) -> &str {
		TARGET_EXTENSION
	}

	/// Cache key for one invocation of [`FileTransformer::transform`].
	fn cache_key(&self, content: &str, relative_path: &str) -> Fingerprint {
		Fingerprint::of(content, relative_path)
	}
}

/// Settings for an [`ImportTransformer`].
#[derive(Debug, Clone)]
pub struct TransformerConfig {
	/// Directory that resolved relative imports are expressed against.
	pub project_root: String,
	/// Template paths where invalid local names only produce warnings.
	pub exempt_paths: Vec<String>,
	/// Receives a message for every invalid local name.
	pub logger: Arc<dyn ImportLogger>,
}

impl TransformerConfig {
	/// Config with the default exempt paths and a [`TracingLogger`].
	pub fn new(project_root: impl Into<String>) -> Self {
		Self {
			project_root: project_root.into(),
			exempt_paths: DEFAULT_EXEMPT_PATHS.iter().map(ToString::to_string).collect(),
			logger: Arc::new(TracingLogger),
		}
	}

	#[must_use]
	pub fn with_logger(mut self, logger: Arc<dyn ImportLogger>) -> Self {
		self.logger = logger;
		self
	}

	#[must_use]
	pub fn with_exempt_paths<I, S>(mut self, paths: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.exempt_paths = paths.into_iter().map(Into::into).collect();
		self
	}
}

/// Rewrites `{{import Name from "path"}}` directives into nested
/// `{{#let (component 'path') as |Name|}}` scopes.
#[derive(Debug, Clone)]
pub struct ImportTransformer {
	project_root: String,
	exempt_paths: Vec<String>,
	logger: Arc<dyn ImportLogger>,
}

impl ImportTransformer {
	/// Build a transformer, rejecting an empty project root.
	pub fn new(config: TransformerConfig) -> ImportResult<Self> {
		if config.project_root.trim().is_empty() {
			return Err(ImportError::MissingConfiguration("project_root".to_string()));
		}

		Ok(Self {
			project_root: normalize_slashes(&config.project_root),
			exempt_paths: config
				.exempt_paths
				.iter()
				.map(|path| normalize_slashes(path))
				.collect(),
			logger: config.logger,
		})
	}

	pub fn project_root(&self) -> &str {
		&self.project_root
	}

	pub fn exempt_paths(&self) -> &[String] {
		&self.exempt_paths
	}

	/// Whether invalid names in this template are tolerated.
	pub fn is_exempt(&self, relative_path: &str) -> bool {
		let relative_path = normalize_slashes(relative_path);
		self.exempt_paths.iter().any(|path| *path == relative_path)
	}
}

impl FileTransformer for ImportTransformer {
	fn transform(&self, content: &str, relative_path: &str) -> ImportResult<String> {
		rewrite(
			content,
			relative_path,
			&self.project_root,
			self.is_exempt(relative_path),
			self.logger.as_ref(),
		)
	}
}

/// Rewrite a single template with the default exempt paths.
pub fn transform(
	content: &str,
	relative_path: &str,
	project_root: &str,
	logger: &dyn ImportLogger,
) -> ImportResult<String> {
	let normalized = normalize_slashes(relative_path);
	let is_exempt = DEFAULT_EXEMPT_PATHS.contains(&normalized.as_str());
	rewrite(
		content,
		relative_path,
		&normalize_slashes(project_root),
		is_exempt,
		logger,
	)
}

fn rewrite(
	content: &str,
	relative_path: &str,
	project_root: &str,
	is_exempt: bool,
	logger: &dyn ImportLogger,
) -> ImportResult<String> {
	let ExtractedImports {
		body,
		mut declarations,
	} = extract_imports(content);

	if declarations.is_empty() {
		return Ok(body);
	}

	resolve_declarations(&mut declarations, relative_path, project_root);

	let mut header = String::new();
	for declaration in &declarations {
		if !declaration.is_local_name_valid {
			let warning = invalid_name_warning(relative_path, &declaration.local_name);
			logger.warn(&warning);

			if !is_exempt {
				return Err(ImportError::InvalidLocalName {
					file: relative_path.to_string(),
					name: declaration.local_name.clone(),
					message: warning,
				});
			}

			header.push_str(&warning_markers(&declaration.local_name, &warning));
		}

		header.push_str(&open_scope(declaration));
	}

	let footer = CLOSE_SCOPE.repeat(declarations.len());

	Ok(format!("{header}{body}{footer}"))
}

/// Warning for a local name that failed validation.
pub fn invalid_name_warning(relative_path: &str, local_name: &str) -> String {
	format!(
		"hbs-import: warning in file \"{relative_path}\": \"{local_name}\" is not allowed as a \
		 variable name for a template import"
	)
}

fn open_scope(declaration: &ImportDeclaration) -> String {
	format!(
		"{{{{#let (component '{}') as |{}|}}}}",
		declaration.import_path, declaration.local_name
	)
}

fn warning_markers(local_name: &str, warning: &str) -> String {
	let name = escape_html(local_name);
	format!(
		"<pre data-test-name=\"{name}\">{}</pre><pre data-test-global-warn=\"{name}\">{}</pre>",
		escape_html(warning),
		escape_html(NAMING_HINT),
	)
}

fn escape_html(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len());
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			'"' => escaped.push_str("&quot;"),
			'\'' => escaped.push_str("&#39;"),
			other => escaped.push(other),
		}
	}
	escaped
}
