use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Rewrite GitHub-style `> [!NOTE]` admonitions into MkDocs `!!! note` blocks.",
	long_about = "callout converts GitHub-flavoured quoted admonitions into MkDocs admonition \
	              directives, in place, across a documentation tree.\n\nRunning `callout` with no \
	              subcommand performs a full conversion pass.\n\nQuick start:\n  callout         \
	              Convert every *.md file under ./docs\n  callout check   Fail if anything is \
	              left to convert\n  callout kinds   Show the admonition kind mapping\n  callout \
	              init    Create a callout.toml"
)]
pub struct CalloutCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Documentation directory to convert, relative to the project root.
	/// Overrides `docs_dir` in callout.toml.
	#[arg(long, short, global = true)]
	pub docs_dir: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Convert all admonitions in the documentation directory (the default).
	///
	/// Optionally moves top-level `*.md` files into the documentation
	/// directory first (`README.md` becomes `index.md`), then rewrites every
	/// `> [!KIND]` block in every `*.md` file under it. Files are only written
	/// when their content changes.
	Convert {
		/// Move top-level markdown files into the documentation directory
		/// before converting.
		#[arg(long, default_value_t = false, conflicts_with = "no_relocate")]
		relocate: bool,

		/// Do not relocate, even if `relocate = true` in callout.toml.
		#[arg(long, default_value_t = false)]
		no_relocate: bool,

		/// Report what would change without moving or writing any file.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Check that no admonitions are left to convert.
	///
	/// Performs a dry run and exits with a non-zero status code if any file
	/// would be rewritten or relocated. Ideal for CI.
	Check {
		/// Show a line diff for each file that would change.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output, `json` for programmatic consumption, or `github` for
		/// GitHub Actions annotations.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Print the admonition kind mapping in effect for this project.
	Kinds {
		/// Output format for the mapping.
		#[arg(long, value_enum, default_value_t = KindsOutputFormat::Text)]
		format: KindsOutputFormat,
	},
	/// Create a sample `callout.toml` in the project root.
	///
	/// If the file already exists, this command is a no-op and exits
	/// successfully.
	Init,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
	/// GitHub Actions annotation format. Emits `::warning` annotations that
	/// appear inline on pull request diffs.
	Github,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindsOutputFormat {
	/// One `label → kind` pair per line.
	Text,
	/// A JSON object mapping labels to kinds.
	Json,
}
