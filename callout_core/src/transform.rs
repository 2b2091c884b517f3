//! Conversion of GitHub-style quoted admonitions into MkDocs directive blocks.
//!
//! ```text
//! > [!WARNING]                 !!! warning "Be careful"
//! > **Be careful**       →         This may break things.
//! >
//! > This may break things.
//! ```
//!
//! A block starts at a line ending in `> [!LABEL]` and continues over every
//! following line that starts with `> ` or is a bare `>`. Text before the
//! header on its line is kept as written. Blocks whose label is not in the
//! [`KindMap`] are left exactly as written.

use std::ops::Range;

use crate::kinds::KindMap;

const QUOTE_MARKER: &str = ">";
const QUOTE_PREFIX: &str = "> ";
const HEADER_PREFIX: &str = "> [!";
const DIRECTIVE: &str = "!!!";
const BODY_INDENT: &str = "    ";

/// A quoted admonition block found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmonitionMatch {
	/// Byte range of the block in the source text, from the header's `>` to
	/// the line terminator of its last line.
	pub range: Range<usize>,
	/// 1-indexed line number of the `> [!LABEL]` header.
	pub line: usize,
	/// The label exactly as written between `[!` and `]`.
	pub label: String,
	/// The destination kind, or `None` when the label is not recognised and
	/// the block is passed through unchanged.
	pub kind: Option<String>,
	/// Title taken from a leading `**bold**` body line.
	pub title: Option<String>,
}

impl AdmonitionMatch {
	/// Whether this block is rewritten during conversion.
	pub fn is_converted(&self) -> bool {
		self.kind.is_some()
	}
}

/// The result of converting a single document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
	/// The converted text.
	pub output: String,
	/// Every admonition-shaped block found, in source order, recognised or
	/// not.
	pub admonitions: Vec<AdmonitionMatch>,
}

impl Conversion {
	/// Number of blocks that were rewritten.
	pub fn converted_count(&self) -> usize {
		self.admonitions
			.iter()
			.filter(|admonition| admonition.is_converted())
			.count()
	}

	/// Labels of blocks that were left untouched because they are not in the
	/// kind map.
	pub fn unknown_labels(&self) -> Vec<&str> {
		self.admonitions
			.iter()
			.filter(|admonition| !admonition.is_converted())
			.map(|admonition| admonition.label.as_str())
			.collect()
	}
}

/// Convert every recognised admonition in `text` using the built-in kinds.
pub fn convert_admonitions(text: &str) -> String {
	convert_admonitions_with(text, &KindMap::builtin())
}

/// Convert every recognised admonition in `text` using `kinds`.
pub fn convert_admonitions_with(text: &str, kinds: &KindMap) -> String {
	convert(text, kinds).output
}

/// Find all admonition-shaped blocks in `text` without converting them.
pub fn find_admonitions(text: &str, kinds: &KindMap) -> Vec<AdmonitionMatch> {
	convert(text, kinds).admonitions
}

/// Convert `text` and report the blocks that were found.
///
/// Blocks are matched left to right and never overlap. Text outside of
/// converted blocks is copied byte for byte.
pub fn convert(text: &str, kinds: &KindMap) -> Conversion {
	if !text.contains(HEADER_PREFIX) {
		return Conversion {
			output: text.to_string(),
			admonitions: Vec::new(),
		};
	}

	let lines = split_lines(text);
	let blocks = scan_blocks(&lines);

	if blocks.is_empty() {
		return Conversion {
			output: text.to_string(),
			admonitions: Vec::new(),
		};
	}

	let mut output = String::with_capacity(text.len());
	let mut admonitions = Vec::with_capacity(blocks.len());
	let mut copied_to = 0;

	for block in blocks {
		let header = &lines[block.header];
		let last = &lines[block.lines.end - 1];
		let range = header.start + block.column..last.end;

		output.push_str(&text[copied_to..range.start]);
		copied_to = range.end;

		let kind = kinds.resolve(block.label);
		let (title, rendered) = match kind {
			Some(kind) => {
				let body = extract_body(&lines[block.lines.start + 1..block.lines.end]);
				let (title, body) = split_title(body);
				let rendered =
					render_directive(kind, title, &body, header.terminator, last.terminator);
				(title.map(ToString::to_string), rendered)
			}
			None => {
				tracing::trace!(
					label = block.label,
					line = header.number,
					"unknown admonition label"
				);
				(None, text[range.clone()].to_string())
			}
		};

		output.push_str(&rendered);
		admonitions.push(AdmonitionMatch {
			range,
			line: header.number,
			label: block.label.to_string(),
			kind: kind.map(ToString::to_string),
			title,
		});
	}

	output.push_str(&text[copied_to..]);

	Conversion {
		output,
		admonitions,
	}
}

/// One physical line of the source text.
struct Line<'a> {
	/// 1-indexed line number.
	number: usize,
	/// Byte offset of the first character.
	start: usize,
	/// Byte offset just past the line terminator.
	end: usize,
	/// Line content without its terminator.
	content: &'a str,
	/// `"\n"`, `"\r\n"`, or empty for a final unterminated line.
	terminator: &'a str,
}

fn split_lines(text: &str) -> Vec<Line<'_>> {
	let mut lines = Vec::new();
	let mut offset = 0;

	for (index, raw) in text.split_inclusive('\n').enumerate() {
		let content_len = if raw.ends_with("\r\n") {
			raw.len() - 2
		} else if raw.ends_with('\n') {
			raw.len() - 1
		} else {
			raw.len()
		};

		lines.push(Line {
			number: index + 1,
			start: offset,
			end: offset + raw.len(),
			content: &raw[..content_len],
			terminator: &raw[content_len..],
		});
		offset += raw.len();
	}

	lines
}

/// A run of lines forming one admonition block: the header at `header` and
/// the body lines up to (not including) `lines.end`. The header marker
/// starts `column` bytes into its line.
struct RawBlock<'a> {
	header: usize,
	column: usize,
	lines: Range<usize>,
	label: &'a str,
}

#[derive(Clone, Copy)]
enum ScanState<'a> {
	SeekHeader,
	InBody {
		header: usize,
		column: usize,
		label: &'a str,
	},
}

fn scan_blocks<'a>(lines: &[Line<'a>]) -> Vec<RawBlock<'a>> {
	let mut blocks = Vec::new();
	let mut state = ScanState::SeekHeader;
	let mut index = 0;

	while index < lines.len() {
		match state {
			ScanState::SeekHeader => {
				if let Some((column, label)) = parse_header(lines[index].content) {
					state = ScanState::InBody {
						header: index,
						column,
						label,
					};
				}
				index += 1;
			}
			ScanState::InBody {
				header,
				column,
				label,
			} => {
				if is_quoted_line(lines[index].content) {
					index += 1;
					continue;
				}

				blocks.push(RawBlock {
					header,
					column,
					lines: header..index,
					label,
				});
				state = ScanState::SeekHeader;
			}
		}
	}

	if let ScanState::InBody {
		header,
		column,
		label,
	} = state
	{
		blocks.push(RawBlock {
			header,
			column,
			lines: header..lines.len(),
			label,
		});
	}

	blocks
}

/// Find a `> [!LABEL]` that ends `line` and return its byte column and
/// `LABEL`. The marker may follow other text on the line.
fn parse_header(line: &str) -> Option<(usize, &str)> {
	// A label is word characters only, so no earlier marker can end the line.
	let column = line.rfind(HEADER_PREFIX)?;
	let rest = &line[column + HEADER_PREFIX.len()..];
	let label_len: usize = rest
		.chars()
		.take_while(|&c| is_word_char(c))
		.map(char::len_utf8)
		.sum();

	if label_len == 0 || &rest[label_len..] != "]" {
		return None;
	}

	Some((column, &rest[..label_len]))
}

fn is_word_char(c: char) -> bool {
	c.is_alphanumeric() || c == '_'
}

fn is_quoted_line(line: &str) -> bool {
	line == QUOTE_MARKER || line.starts_with(QUOTE_PREFIX)
}

fn is_blank(line: &str) -> bool {
	line.trim().is_empty()
}

/// Strip the quote marker from each body line and drop leading and trailing
/// blank lines.
fn extract_body<'a>(lines: &[Line<'a>]) -> Vec<&'a str> {
	let stripped: Vec<&str> = lines
		.iter()
		.map(|line| line.content.strip_prefix(QUOTE_PREFIX).unwrap_or(""))
		.collect();

	let Some(first) = stripped.iter().position(|line| !is_blank(line)) else {
		return Vec::new();
	};
	let last = stripped
		.iter()
		.rposition(|line| !is_blank(line))
		.unwrap_or(first);

	stripped[first..=last].to_vec()
}

/// Split a leading `**title**` line off the body. A single blank line after
/// the title is dropped with it.
fn split_title<'a>(body: Vec<&'a str>) -> (Option<&'a str>, Vec<&'a str>) {
	let Some(title) = body.first().and_then(|line| parse_bold_span(line)) else {
		return (None, body);
	};

	let skip = if body.get(1).is_some_and(|line| is_blank(line)) {
		2
	} else {
		1
	};

	(Some(title), body[skip..].to_vec())
}

/// Return the text inside `**…**` when the whole trimmed line is a single
/// bold span.
fn parse_bold_span(line: &str) -> Option<&str> {
	let inner = line.trim().strip_prefix("**")?.strip_suffix("**")?;

	if is_blank(inner) || inner.contains("**") {
		return None;
	}

	Some(inner)
}

fn render_directive(
	kind: &str,
	title: Option<&str>,
	body: &[&str],
	header_terminator: &str,
	final_terminator: &str,
) -> String {
	let newline = if header_terminator.is_empty() {
		"\n"
	} else {
		header_terminator
	};

	let mut rendered = format!("{DIRECTIVE} {kind}");
	if let Some(title) = title {
		rendered.push_str(&format!(" \"{title}\""));
	}

	for line in body {
		rendered.push_str(newline);
		if !is_blank(line) {
			rendered.push_str(BODY_INDENT);
			rendered.push_str(line);
		}
	}

	rendered.push_str(final_terminator);
	rendered
}
