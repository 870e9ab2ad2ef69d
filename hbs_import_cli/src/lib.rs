use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Rewrite template import directives into nested let scopes.",
	long_about = "hbs-import rewrites `{{import FooBar from \"./foo-bar\"}}` directives in \
	              Handlebars templates into `{{#let (component '...') as |FooBar|}}` blocks \
	              that the template engine understands natively.\n\nQuick start:\n  hbs-import \
	              init       Create an hbs-import.toml\n  hbs-import check      Validate every \
	              template\n  hbs-import build -o  Write the rewritten templates\n  hbs-import \
	              transform  Rewrite one file to stdout"
)]
pub struct HbsImportCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `hbs-import.toml` in the project root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Rewrite a single template and print the result to stdout.
	///
	/// The template's project-relative path decides how relative imports
	/// resolve and whether the file is exempt from name validation. It
	/// defaults to the file's path relative to the project root.
	Transform {
		/// The template file to rewrite.
		file: PathBuf,

		/// Override the project-relative path passed to the transformer.
		#[arg(long)]
		relative_path: Option<String>,
	},
	/// Check that every template in the project can be rewritten.
	///
	/// Runs the transform over all `.hbs` and `.handlebars` files without
	/// writing anything. Exits with a non-zero status code if any template
	/// declares an invalid import name.
	Check {
		/// Output format for check results. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Rewrite every template in the project into an output directory.
	///
	/// The directory structure is mirrored and every file gets the `.hbs`
	/// extension. Nothing is written if any template fails.
	Build {
		/// Directory to write the rewritten templates to. Relative paths
		/// are resolved against the project root.
		#[arg(long, short)]
		out: PathBuf,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each file includes its
	/// project-relative path, output path, fingerprint, and import count.
	Json,
}
