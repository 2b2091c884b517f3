use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::CalloutError;
use crate::CalloutResult;
use crate::config::CalloutConfig;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::kinds::KindMap;
use crate::transform::AdmonitionMatch;
use crate::transform::convert;

/// Options controlling which files are visited and how they are rewritten.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
	/// Directory whose `.gitignore` and exclude patterns are anchored. Usually
	/// the project root.
	pub base: PathBuf,
	/// Gitignore-style patterns to exclude from conversion.
	pub exclude_patterns: Vec<String>,
	/// Whether to disable `.gitignore` integration.
	pub disable_gitignore: bool,
	/// Maximum file size to convert in bytes.
	pub max_file_size: u64,
	/// Compute conversions without writing anything.
	pub dry_run: bool,
}

impl Default for ConvertOptions {
	fn default() -> Self {
		Self {
			base: PathBuf::new(),
			exclude_patterns: Vec::new(),
			disable_gitignore: false,
			max_file_size: DEFAULT_MAX_FILE_SIZE,
			dry_run: false,
		}
	}
}

impl ConvertOptions {
	/// Construct [`ConvertOptions`] for a project rooted at `base`.
	pub fn from_config(base: &Path, config: &CalloutConfig) -> Self {
		Self {
			base: base.to_path_buf(),
			exclude_patterns: config.exclude.patterns.clone(),
			disable_gitignore: config.disable_gitignore,
			max_file_size: config.max_file_size,
			dry_run: false,
		}
	}
}

/// Outcome of converting one markdown file.
#[derive(Debug, Clone)]
pub struct FileReport {
	pub path: PathBuf,
	/// Content read from disk.
	pub original: String,
	/// Content after conversion. Equal to `original` when nothing changed.
	pub converted: String,
	/// Admonition blocks found in the file, converted or passed through.
	pub admonitions: Vec<AdmonitionMatch>,
	/// Whether the converted content differs from the original.
	pub changed: bool,
	/// Whether the converted content was written back to disk.
	pub written: bool,
}

impl FileReport {
	/// Number of admonition blocks rewritten in this file.
	pub fn converted_count(&self) -> usize {
		self.admonitions
			.iter()
			.filter(|admonition| admonition.is_converted())
			.count()
	}
}

/// A file that could not be converted.
#[derive(Debug)]
pub struct FileFailure {
	pub path: PathBuf,
	pub error: CalloutError,
}

/// Outcome of converting a whole directory tree.
#[derive(Debug, Default)]
pub struct ConvertReport {
	/// Every file that was read and transformed, in walk order.
	pub files: Vec<FileReport>,
	/// Files that failed to read, decode or write. The walk continues past
	/// them.
	pub failures: Vec<FileFailure>,
}

impl ConvertReport {
	/// Returns true if no file failed.
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}

	/// Files whose content changed.
	pub fn changed_files(&self) -> Vec<&FileReport> {
		self.files.iter().filter(|file| file.changed).collect()
	}

	/// Total number of admonition blocks rewritten across all files.
	pub fn converted_count(&self) -> usize {
		self.files.iter().map(FileReport::converted_count).sum()
	}
}

/// Convert every markdown file under `root`.
///
/// Per-file problems are collected in [`ConvertReport::failures`] and do not
/// stop the walk. Errors that prevent walking at all are returned directly.
pub fn convert_tree(
	root: &Path,
	kinds: &KindMap,
	options: &ConvertOptions,
) -> CalloutResult<ConvertReport> {
	if !root.is_dir() {
		return Err(CalloutError::MissingDocsDir {
			path: root.display().to_string(),
		});
	}

	let files = collect_markdown_files(root, options)?;
	let mut report = ConvertReport::default();

	for path in files {
		match convert_file(&path, kinds, options) {
			Ok(file) => report.files.push(file),
			Err(error) => {
				tracing::warn!(path = %path.display(), %error, "failed to convert file");
				report.failures.push(FileFailure { path, error });
			}
		}
	}

	Ok(report)
}

/// Read, convert and (unless `dry_run`) rewrite a single file in place.
pub fn convert_file(
	path: &Path,
	kinds: &KindMap,
	options: &ConvertOptions,
) -> CalloutResult<FileReport> {
	tracing::debug!(path = %path.display(), "visiting");

	let original = read_markdown(path, options.max_file_size)?;
	let conversion = convert(&original, kinds);
	let changed = conversion.output != original;

	for label in conversion.unknown_labels() {
		tracing::debug!(path = %path.display(), label, "left unknown admonition unchanged");
	}

	let written = changed && !options.dry_run;
	if written {
		write_atomic(path, &conversion.output)?;
		tracing::info!(
			path = %path.display(),
			admonitions = conversion.converted_count(),
			"converted"
		);
	}

	Ok(FileReport {
		path: path.to_path_buf(),
		original,
		converted: conversion.output,
		admonitions: conversion.admonitions,
		changed,
		written,
	})
}

fn read_markdown(path: &Path, max_file_size: u64) -> CalloutResult<String> {
	let read_error = |e: std::io::Error| CalloutError::ReadFile {
		path: path.display().to_string(),
		reason: e.to_string(),
	};

	let size = std::fs::metadata(path).map_err(read_error)?.len();
	if size > max_file_size {
		return Err(CalloutError::FileTooLarge {
			path: path.display().to_string(),
			size,
			limit: max_file_size,
		});
	}

	let bytes = std::fs::read(path).map_err(read_error)?;
	String::from_utf8(bytes).map_err(|_| CalloutError::InvalidUtf8 {
		path: path.display().to_string(),
	})
}

/// Replace `path` with `content` via a sibling temp file and a rename, so a
/// crash never leaves a truncated document behind.
///
/// Symlinks are resolved first so the link survives and its target is the
/// file rewritten. Read-only files are refused rather than replaced, and the
/// original permissions are carried over to the new file.
fn write_atomic(path: &Path, content: &str) -> CalloutResult<()> {
	let write_error = |reason: String| CalloutError::WriteFile {
		path: path.display().to_string(),
		reason,
	};

	let target = std::fs::canonicalize(path).map_err(|e| write_error(e.to_string()))?;
	let permissions = std::fs::metadata(&target)
		.map_err(|e| write_error(e.to_string()))?
		.permissions();
	if permissions.readonly() {
		return Err(write_error("file is read-only".to_string()));
	}

	let file_name = target
		.file_name()
		.map(|name| name.to_string_lossy().to_string())
		.unwrap_or_default();
	let temp_path = target.with_file_name(format!(
		".{file_name}.tmp-{}-{}",
		std::process::id(),
		SystemTime::now()
			.duration_since(UNIX_EPOCH)
			.map_or(0, |duration| duration.as_nanos())
	));

	let result = std::fs::write(&temp_path, content)
		.and_then(|()| std::fs::set_permissions(&temp_path, permissions))
		.and_then(|()| std::fs::rename(&temp_path, &target));

	if let Err(e) = result {
		let _ = std::fs::remove_file(&temp_path);
		return Err(write_error(e.to_string()));
	}

	Ok(())
}

/// Collect every `*.md` file under `root`, sorted for deterministic
/// ordering.
///
/// Unless `disable_gitignore` is set, files matched by the `.gitignore` in
/// `options.base` are skipped. Exclude patterns follow gitignore syntax and
/// are always applied on top.
pub fn collect_markdown_files(
	root: &Path,
	options: &ConvertOptions,
) -> CalloutResult<Vec<PathBuf>> {
	let base = if options.base.as_os_str().is_empty() {
		root
	} else {
		options.base.as_path()
	};

	let gitignore = if options.disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(base)
	};
	let custom_exclude = build_exclude_matcher(base, &options.exclude_patterns)?;

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk_dir(
		root,
		&mut files,
		&gitignore,
		&custom_exclude,
		&mut visited_dirs,
	)?;
	files.sort();

	Ok(files)
}

/// Build a `Gitignore` matcher from exclude patterns in `callout.toml`.
fn build_exclude_matcher(base: &Path, patterns: &[String]) -> CalloutResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(base);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			CalloutError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| CalloutError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(base: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(base);
	let gitignore_path = base.join(".gitignore");
	if gitignore_path.exists() {
		if let Some(error) = builder.add(&gitignore_path) {
			tracing::warn!(
				path = %gitignore_path.display(),
				%error,
				"failed to parse .gitignore, ignoring invalid rules"
			);
		}
	}
	builder.build().unwrap_or_else(|error| {
		tracing::warn!(%error, "failed to build .gitignore rules");
		Gitignore::empty()
	})
}

fn walk_dir(
	dir: &Path,
	files: &mut Vec<PathBuf>,
	gitignore: &Gitignore,
	custom_exclude: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
) -> CalloutResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Detect symlink cycles by tracking canonical paths.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Err(CalloutError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();
		let is_dir = path.is_dir();

		if is_dir && path.file_name().is_some_and(|name| name == ".git") {
			continue;
		}

		// Check against gitignore and exclude patterns from callout.toml.
		if matches_ignore(gitignore, &path, is_dir)
			|| matches_ignore(custom_exclude, &path, is_dir)
		{
			continue;
		}

		if is_dir {
			walk_dir(&path, files, gitignore, custom_exclude, visited_dirs)?;
		} else if is_markdown_file(&path) {
			files.push(path);
		}
	}

	Ok(())
}

/// Paths outside the matcher's root are never ignored by it.
fn matches_ignore(matcher: &Gitignore, path: &Path, is_dir: bool) -> bool {
	path.strip_prefix(matcher.path()).is_ok() && matcher.matched(path, is_dir).is_ignore()
}

/// Check if a path names a markdown file (`*.md`).
pub fn is_markdown_file(path: &Path) -> bool {
	path.file_name()
		.and_then(|name| name.to_str())
		.is_some_and(|name| name.ends_with(".md"))
}
