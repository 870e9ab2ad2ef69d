use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum ImportError {
	#[error(transparent)]
	#[diagnostic(code(hbs_import::io_error))]
	Io(#[from] std::io::Error),

	#[error("{message}")]
	#[diagnostic(
		code(hbs_import::invalid_local_name),
		help("import names must be CamelCased letters and digits, like: FooBar, TomDale")
	)]
	InvalidLocalName {
		file: String,
		name: String,
		message: String,
	},

	#[error("missing required configuration: `{0}`")]
	#[diagnostic(
		code(hbs_import::missing_configuration),
		help("add the missing key to hbs-import.toml")
	)]
	MissingConfiguration(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(hbs_import::config_parse),
		help("check that hbs-import.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("template `{file}` is not valid UTF-8")]
	#[diagnostic(
		code(hbs_import::invalid_encoding),
		help("save the template as UTF-8 or exclude it in hbs-import.toml")
	)]
	InvalidEncoding { file: String },

	#[error("template `{file}` would be written to `{output}`, which is also written by {others}")]
	#[diagnostic(
		code(hbs_import::output_collision),
		help("rename or exclude one of the templates so each output path is unique")
	)]
	OutputCollision {
		file: String,
		output: String,
		others: String,
	},

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(hbs_import::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

pub type ImportResult<T> = Result<T, ImportError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
