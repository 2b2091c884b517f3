use std::path::Path;
use std::path::PathBuf;

use crate::CalloutResult;
use crate::config::CalloutConfig;
use crate::kinds::KindMap;
use crate::relocate::RelocationReport;
use crate::relocate::relocate_markdown;
use crate::walker::ConvertOptions;
use crate::walker::ConvertReport;
use crate::walker::FileFailure;
use crate::walker::convert_file;
use crate::walker::convert_tree;

/// Everything needed for one full pass over a project.
#[derive(Debug, Clone)]
pub struct RunOptions {
	/// Project root. Top-level markdown files are relocated from here, and
	/// `.gitignore`/exclude patterns are anchored here.
	pub root: PathBuf,
	/// Documentation directory to convert. Relative paths are resolved
	/// against `root`.
	pub docs_dir: PathBuf,
	/// Move top-level markdown files into `docs_dir` first.
	pub relocate: bool,
	pub kinds: KindMap,
	pub convert: ConvertOptions,
}

impl RunOptions {
	/// Build options for `root` from its config (or defaults when `None`).
	pub fn from_config(root: &Path, config: &CalloutConfig) -> Self {
		Self {
			root: root.to_path_buf(),
			docs_dir: config.docs_dir.clone(),
			relocate: config.relocate,
			kinds: config.kind_map(),
			convert: ConvertOptions::from_config(root, config),
		}
	}

	/// Discover and load `callout.toml` under `root` and build options from
	/// it.
	pub fn load(root: &Path) -> CalloutResult<Self> {
		let config = CalloutConfig::load_or_default(root)?;
		Ok(Self::from_config(root, &config))
	}

	/// The documentation directory resolved against the project root.
	pub fn docs_path(&self) -> PathBuf {
		self.root.join(&self.docs_dir)
	}
}

/// Outcome of a full pass.
#[derive(Debug, Default)]
pub struct RunReport {
	/// Present when relocation ran.
	pub relocation: Option<RelocationReport>,
	pub conversion: ConvertReport,
}

impl RunReport {
	/// Returns true if no file failed to convert.
	pub fn is_ok(&self) -> bool {
		self.conversion.is_ok()
	}
}

/// Relocate (when enabled) and then convert the documentation directory.
///
/// In a dry run nothing is moved or written; files that relocation would move
/// are converted in memory from their current location.
pub fn run(options: &RunOptions) -> CalloutResult<RunReport> {
	let docs_path = options.docs_path();
	let dry_run = options.convert.dry_run;

	let relocation = if options.relocate {
		Some(relocate_markdown(&options.root, &docs_path, dry_run)?)
	} else {
		None
	};

	let mut conversion = if dry_run && !docs_path.is_dir() && relocation.is_some() {
		ConvertReport::default()
	} else {
		convert_tree(&docs_path, &options.kinds, &options.convert)?
	};

	// Files that would have been moved are previewed from where they are.
	if let Some(relocation) = relocation.as_ref().filter(|_| dry_run) {
		for moved in &relocation.moved {
			match convert_file(&moved.from, &options.kinds, &options.convert) {
				Ok(file) => conversion.files.push(file),
				Err(error) => {
					conversion.failures.push(FileFailure {
						path: moved.from.clone(),
						error,
					});
				}
			}
		}
	}

	tracing::debug!(
		files = conversion.files.len(),
		changed = conversion.changed_files().len(),
		failures = conversion.failures.len(),
		"run complete"
	);

	Ok(RunReport {
		relocation,
		conversion,
	})
}
