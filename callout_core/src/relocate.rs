use std::path::Path;
use std::path::PathBuf;

use crate::CalloutError;
use crate::CalloutResult;
use crate::walker::is_markdown_file;

/// File name a top-level readme receives inside the documentation directory.
pub const INDEX_FILE_NAME: &str = "index.md";

/// A file moved (or, in a dry run, that would be moved) into the
/// documentation directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
	pub from: PathBuf,
	pub to: PathBuf,
}

/// Why a top-level markdown file was left where it is.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SkipReason {
	/// A file with the same name already exists in the documentation
	/// directory.
	DestinationExists,
	/// The readme was not renamed because `index.md` already exists.
	IndexExists,
}

/// A top-level markdown file that was not moved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRelocation {
	pub path: PathBuf,
	pub destination: PathBuf,
	pub reason: SkipReason,
}

/// Outcome of a relocation pass.
#[derive(Debug, Default)]
pub struct RelocationReport {
	/// Whether the documentation directory had to be created.
	pub created_docs_dir: bool,
	pub moved: Vec<Relocation>,
	pub skipped: Vec<SkippedRelocation>,
}

/// Move top-level `*.md` files from `root` into `docs_dir`.
///
/// A case-insensitive `readme.md` becomes `docs_dir/index.md`, but only when
/// no `index.md` exists there yet. Any further readme differing only in case
/// is reported as skipped. Existing destinations are never overwritten.
/// Running twice moves nothing the second time.
pub fn relocate_markdown(
	root: &Path,
	docs_dir: &Path,
	dry_run: bool,
) -> CalloutResult<RelocationReport> {
	let mut report = RelocationReport::default();

	if !docs_dir.is_dir() {
		report.created_docs_dir = true;
		if !dry_run {
			std::fs::create_dir_all(docs_dir)?;
			tracing::info!(path = %docs_dir.display(), "created documentation directory");
		}
	} else if same_directory(root, docs_dir) {
		return Ok(report);
	}

	let mut readmes = Vec::new();
	let mut candidates = Vec::new();

	for entry in std::fs::read_dir(root)? {
		let entry = entry?;
		let path = entry.path();

		if !entry.file_type()?.is_file() {
			continue;
		}

		if is_readme(&path) {
			readmes.push(path);
		} else if is_markdown_file(&path) {
			candidates.push(path);
		}
	}

	candidates.sort();
	readmes.sort();

	for path in candidates {
		let Some(file_name) = path.file_name() else {
			continue;
		};
		let destination = docs_dir.join(file_name);
		move_file(path, destination, SkipReason::DestinationExists, dry_run, &mut report)?;
	}

	// Case-sensitive filesystems can hold several readmes. Only the first
	// becomes the index.
	let destination = docs_dir.join(INDEX_FILE_NAME);
	let mut readmes = readmes.into_iter();
	if let Some(path) = readmes.next() {
		move_file(path, destination.clone(), SkipReason::IndexExists, dry_run, &mut report)?;
	}
	for path in readmes {
		skip_file(path, destination.clone(), SkipReason::IndexExists, &mut report);
	}

	Ok(report)
}

fn move_file(
	from: PathBuf,
	to: PathBuf,
	reason_if_taken: SkipReason,
	dry_run: bool,
	report: &mut RelocationReport,
) -> CalloutResult<()> {
	let claimed = report.moved.iter().any(|relocation| relocation.to == to);
	if claimed || to.exists() {
		skip_file(from, to, reason_if_taken, report);
		return Ok(());
	}

	if !dry_run {
		std::fs::rename(&from, &to).map_err(|e| CalloutError::Relocate {
			from: from.display().to_string(),
			to: to.display().to_string(),
			reason: e.to_string(),
		})?;
		tracing::info!(from = %from.display(), to = %to.display(), "moved");
	}

	report.moved.push(Relocation { from, to });
	Ok(())
}

fn skip_file(from: PathBuf, to: PathBuf, reason: SkipReason, report: &mut RelocationReport) {
	tracing::warn!(
		from = %from.display(),
		to = %to.display(),
		"destination exists, leaving file in place"
	);
	report.skipped.push(SkippedRelocation {
		path: from,
		destination: to,
		reason,
	});
}

fn is_readme(path: &Path) -> bool {
	path.file_name()
		.and_then(|name| name.to_str())
		.is_some_and(|name| name.eq_ignore_ascii_case("readme.md"))
}

fn same_directory(a: &Path, b: &Path) -> bool {
	match (a.canonicalize(), b.canonicalize()) {
		(Ok(a), Ok(b)) => a == b,
		_ => a == b,
	}
}
