use std::collections::BTreeMap;

/// Admonition labels recognised out of the box, paired with the MkDocs
/// admonition type they are rewritten to. Source labels are lower-case.
pub const BUILTIN_KINDS: [(&str, &str); 17] = [
	("note", "note"),
	("important", "important"),
	("tip", "tip"),
	("info", "info"),
	("warning", "warning"),
	("caution", "caution"),
	("danger", "danger"),
	("error", "danger"),
	("success", "success"),
	("question", "question"),
	("abstract", "abstract"),
	("summary", "summary"),
	("todo", "todo"),
	("quote", "quote"),
	("seealso", "seealso"),
	("example", "example"),
	("bug", "bug"),
];

/// Read-only lookup from a source admonition label to its destination kind.
///
/// Built once from [`BUILTIN_KINDS`] plus any extra entries (usually the
/// `[kinds]` table of `callout.toml`). Extra entries take precedence over
/// built-ins. Lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KindMap {
	extra: BTreeMap<String, String>,
}

impl KindMap {
	/// The built-in mapping with no extra entries.
	pub fn builtin() -> Self {
		Self::default()
	}

	/// The built-in mapping extended (or overridden) by `extra`. Source labels
	/// are lower-cased; destinations are kept verbatim.
	pub fn with_extra<I, K, V>(extra: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: Into<String>,
	{
		let extra = extra
			.into_iter()
			.map(|(label, kind)| (label.as_ref().to_lowercase(), kind.into()))
			.collect();

		Self { extra }
	}

	/// Resolve a source label to its destination kind, or `None` when the
	/// label is not recognised.
	pub fn resolve(&self, label: &str) -> Option<&str> {
		let label = label.to_lowercase();

		if let Some(kind) = self.extra.get(&label) {
			return Some(kind.as_str());
		}

		BUILTIN_KINDS
			.iter()
			.find(|(source, _)| *source == label)
			.map(|(_, kind)| *kind)
	}

	/// All effective `(source, destination)` pairs, sorted by source label.
	pub fn entries(&self) -> Vec<(&str, &str)> {
		let mut entries: BTreeMap<&str, &str> = BUILTIN_KINDS.iter().copied().collect();
		for (label, kind) in &self.extra {
			entries.insert(label.as_str(), kind.as_str());
		}

		entries.into_iter().collect()
	}

	/// Whether any extra entries were configured on top of the built-ins.
	pub fn has_extra(&self) -> bool {
		!self.extra.is_empty()
	}
}
