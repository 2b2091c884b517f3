use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CalloutError {
	#[error(transparent)]
	#[diagnostic(code(callout::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{path}`: {reason}")]
	#[diagnostic(code(callout::read_file))]
	ReadFile { path: String, reason: String },

	#[error("failed to write `{path}`: {reason}")]
	#[diagnostic(
		code(callout::write_file),
		help("check file permissions and free disk space; the original file was left untouched")
	)]
	WriteFile { path: String, reason: String },

	#[error("`{path}` is not valid UTF-8 text")]
	#[diagnostic(
		code(callout::invalid_utf8),
		help("only UTF-8 encoded markdown files can be converted; exclude this file in callout.toml")
	)]
	InvalidUtf8 { path: String },

	#[error("file too large: `{path}` is {size} bytes (limit: {limit} bytes)")]
	#[diagnostic(
		code(callout::file_too_large),
		help("increase `max_file_size` in callout.toml or exclude this file")
	)]
	FileTooLarge { path: String, size: u64, limit: u64 },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(callout::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(callout::config_parse),
		help("check that callout.toml is valid TOML; see `callout init` for a sample")
	)]
	ConfigParse(String),

	#[error("documentation directory not found: `{path}`")]
	#[diagnostic(
		code(callout::missing_docs_dir),
		help("create the directory, pass `--docs-dir`, or set `docs_dir` in callout.toml")
	)]
	MissingDocsDir { path: String },

	#[error("failed to move `{from}` to `{to}`: {reason}")]
	#[diagnostic(code(callout::relocate))]
	Relocate {
		from: String,
		to: String,
		reason: String,
	},
}

pub type CalloutResult<T> = Result<T, CalloutError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
