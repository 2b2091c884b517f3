use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::CalloutError;
use crate::CalloutResult;
use crate::kinds::KindMap;

/// Default maximum file size in bytes (10 MB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Default documentation directory, relative to the project root.
pub const DEFAULT_DOCS_DIR: &str = "docs";

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"callout.toml",
	".callout.toml",
	".config/callout.toml",
];

/// Configuration loaded from a `callout.toml` file.
///
/// ```toml
/// docs_dir = "docs"
/// relocate = true
/// max_file_size = 10485760
/// disable_gitignore = false
///
/// [exclude]
/// patterns = ["drafts/", "*.generated.md"]
///
/// [kinds]
/// callout = "note"
/// hint = "tip"
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalloutConfig {
	/// Documentation directory to convert, relative to the project root.
	#[serde(default = "default_docs_dir")]
	pub docs_dir: PathBuf,
	/// Move top-level `*.md` files into `docs_dir` before converting.
	#[serde(default)]
	pub relocate: bool,
	/// Files larger than this many bytes are reported and left untouched.
	/// Defaults to 10 MB.
	#[serde(default = "default_max_file_size")]
	pub max_file_size: u64,
	/// When true, the project's `.gitignore` is not consulted while walking
	/// the documentation directory.
	#[serde(default)]
	pub disable_gitignore: bool,
	/// Exclusion configuration using gitignore-style patterns.
	#[serde(default)]
	pub exclude: ExcludeConfig,
	/// Extra admonition labels, or overrides of built-in ones. Keys are
	/// matched case-insensitively.
	#[serde(default)]
	pub kinds: BTreeMap<String, String>,
}

impl Default for CalloutConfig {
	fn default() -> Self {
		Self {
			docs_dir: default_docs_dir(),
			relocate: false,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			disable_gitignore: false,
			exclude: ExcludeConfig::default(),
			kinds: BTreeMap::new(),
		}
	}
}

/// Configuration for excluding files and directories from conversion.
///
/// Patterns follow gitignore syntax, are relative to the project root, and
/// are applied on top of any `.gitignore` rules.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Examples: `"drafts/"`, `"*.generated.md"`, `"!keep.md"`.
	#[serde(default)]
	pub patterns: Vec<String>,
}

fn default_docs_dir() -> PathBuf {
	PathBuf::from(DEFAULT_DOCS_DIR)
}

fn default_max_file_size() -> u64 {
	DEFAULT_MAX_FILE_SIZE
}

impl CalloutConfig {
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
	pub fn load(root: &Path) -> CalloutResult<Option<CalloutConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;
		tracing::debug!(path = %config_path.display(), "loaded config");

		Ok(Some(config))
	}

	/// Load the discovered config, falling back to defaults.
	pub fn load_or_default(root: &Path) -> CalloutResult<CalloutConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Parse config from TOML text.
	pub fn parse(content: &str) -> CalloutResult<CalloutConfig> {
		toml::from_str(content).map_err(|e| CalloutError::ConfigParse(e.to_string()))
	}

	/// The kind map described by this config: built-ins plus `[kinds]`.
	pub fn kind_map(&self) -> KindMap {
		KindMap::with_extra(&self.kinds)
	}
}
