use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::ImportError;
use crate::ImportResult;
use crate::resolve::normalize_slashes;
use crate::transformer::DEFAULT_EXEMPT_PATHS;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"hbs-import.toml",
	".hbs-import.toml",
	".config/hbs-import.toml",
];

/// Configuration loaded from an `hbs-import.toml` file.
///
/// ```toml
/// pod_module_prefix = "app/pods"
///
/// [exempt]
/// paths = ["dummy/pods/application/template.hbs"]
///
/// [exclude]
/// patterns = ["vendor/", "dist/"]
///
/// disable_gitignore = false
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct HbsImportConfig {
	/// Project-relative directory holding the pod components. Relative
	/// imports are rewritten to paths relative to this directory.
	#[serde(default)]
	pub pod_module_prefix: Option<String>,
	/// Templates whose invalid import names are reported inline instead of
	/// failing the build. When the section is absent the dummy application
	/// fixture template is exempt.
	#[serde(default)]
	pub exempt: Option<ExemptConfig>,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// When true, `.gitignore` files are not used for filtering.
	#[serde(default)]
	pub disable_gitignore: bool,
}

/// Allow-list of template paths where invalid names are not fatal.
#[derive(Debug, Default, Deserialize)]
pub struct ExemptConfig {
	/// Project-relative template paths, compared exactly after slash
	/// normalization.
	#[serde(default)]
	pub paths: Vec<String>,
}

/// Configuration for excluding files and directories from scanning.
///
/// Patterns follow gitignore syntax and are applied on top of any
/// `.gitignore` rules (unless `disable_gitignore` is set).
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns relative to the project root.
	///
	/// Examples: `"dist/"`, `"*.generated.hbs"`, `"!keep.hbs"`.
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl HbsImportConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> ImportResult<Option<HbsImportConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Parse config file content.
	pub fn parse(content: &str) -> ImportResult<HbsImportConfig> {
		toml::from_str(content).map_err(|e| ImportError::ConfigParse(e.to_string()))
	}

	/// The components root that relative imports resolve against.
	///
	/// Fails when `pod_module_prefix` is missing or blank, since no import
	/// path can be resolved without it.
	pub fn components_root(&self) -> ImportResult<String> {
		self.pod_module_prefix
			.as_deref()
			.map(str::trim)
			.filter(|prefix| !prefix.is_empty())
			.map(normalize_slashes)
			.ok_or_else(|| ImportError::MissingConfiguration("pod_module_prefix".to_string()))
	}

	/// Configured exempt paths, or the defaults when no `[exempt]` section
	/// was given.
	pub fn exempt_paths(&self) -> Vec<String> {
		match &self.exempt {
			Some(exempt) => exempt.paths.clone(),
			None => DEFAULT_EXEMPT_PATHS.iter().map(ToString::to_string).collect(),
		}
	}
}
