use std::path::Path;
use std::path::PathBuf;
use std::process;

use callout_core::CalloutConfig;
use callout_core::pipeline::RunOptions;
use callout_core::pipeline::RunReport;
use callout_core::pipeline::run;
use callout_core::relocate::RelocationReport;
use callout_core::relocate::SkipReason;
use callout_core::walker::ConvertReport;
use callout_core::walker::FileReport;
use callout_cli::CalloutCli;
use callout_cli::Commands;
use callout_cli::KindsOutputFormat;
use callout_cli::OutputFormat;
use clap::Parser;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = "# callout configuration\n\n# Documentation directory to convert, \
                             relative to this file.\ndocs_dir = \"docs\"\n\n# Move top-level \
                             *.md files into docs_dir first (README.md becomes index.md).\n# \
                             relocate = true\n\n# Skip files by gitignore-style pattern.\n# \
                             [exclude]\n# patterns = [\"drafts/\"]\n\n# Extra admonition labels, \
                             or overrides of the built-in ones.\n# [kinds]\n# hint = \"tip\"\n";

fn main() {
	let args = CalloutCli::parse();

	// Respect NO_COLOR env var, --no-color flag, and terminal support.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		None => run_convert(&args, None, false),
		Some(Commands::Convert {
			relocate,
			no_relocate,
			dry_run,
		}) => run_convert(&args, relocate_override(*relocate, *no_relocate), *dry_run),
		Some(Commands::Check { diff, format }) => run_check(&args, *diff, *format),
		Some(Commands::Kinds { format }) => run_kinds(&args, *format),
		Some(Commands::Init) => run_init(&args),
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<callout_core::CalloutError>() {
			Ok(callout_err) => {
				let report: miette::Report = (*callout_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr so stdout stays clean for `--format json`. `RUST_LOG`
/// overrides the default filter.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_filter = if verbose {
		"warn,callout_core=debug"
	} else {
		"warn"
	};
	let filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn relocate_override(relocate: bool, no_relocate: bool) -> Option<bool> {
	if relocate {
		Some(true)
	} else if no_relocate {
		Some(false)
	} else {
		None
	}
}

fn resolve_root(args: &CalloutCli) -> PathBuf {
	let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
	match &args.path {
		Some(path) => cwd.join(path),
		None => cwd,
	}
}

fn run_options(
	args: &CalloutCli,
	relocate: Option<bool>,
	dry_run: bool,
) -> Result<RunOptions, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let mut options = RunOptions::load(&root)?;

	if let Some(docs_dir) = &args.docs_dir {
		options.docs_dir.clone_from(docs_dir);
	}
	if let Some(relocate) = relocate {
		options.relocate = relocate;
	}
	options.convert.dry_run = dry_run;

	Ok(options)
}

fn run_convert(
	args: &CalloutCli,
	relocate: Option<bool>,
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = run_options(args, relocate, dry_run)?;
	let root = &options.root;
	let mut report = run(&options)?;

	if let Some(relocation) = &report.relocation {
		print_relocation(relocation, root, dry_run);
	}

	let conversion = &report.conversion;
	let changed = conversion.changed_files();
	let converted = conversion.converted_count();

	if changed.is_empty() {
		println!("No admonitions to convert.");
	} else if dry_run {
		println!(
			"Dry run: would convert {converted} admonition(s) in {} file(s):",
			changed.len()
		);
		print_changed_files(&changed, root);
	} else {
		println!(
			"Converted {converted} admonition(s) in {} file(s).",
			changed.len()
		);
		if args.verbose {
			print_changed_files(&changed, root);
		}
	}

	if args.verbose {
		print_unknown_labels(conversion, root);
	}

	report_failures(&mut report, root)
}

fn run_check(
	args: &CalloutCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let options = run_options(args, None, true)?;
	let root = &options.root;
	let mut report = run(&options)?;

	let changed = report.conversion.changed_files();
	let pending_moves = report
		.relocation
		.as_ref()
		.map_or(0, |relocation| relocation.moved.len());
	let is_clean = changed.is_empty() && pending_moves == 0;

	match format {
		OutputFormat::Json => {
			let files: Vec<serde_json::Value> = changed
				.iter()
				.map(|file| {
					let admonitions: Vec<serde_json::Value> = file
						.admonitions
						.iter()
						.filter(|admonition| admonition.is_converted())
						.map(|admonition| {
							serde_json::json!({
								"line": admonition.line,
								"label": admonition.label,
								"kind": admonition.kind,
								"title": admonition.title,
							})
						})
						.collect();
					serde_json::json!({
						"file": make_relative(&file.path, root),
						"admonitions": admonitions,
					})
				})
				.collect();
			let moves: Vec<serde_json::Value> = report
				.relocation
				.iter()
				.flat_map(|relocation| &relocation.moved)
				.map(|moved| {
					serde_json::json!({
						"from": make_relative(&moved.from, root),
						"to": make_relative(&moved.to, root),
					})
				})
				.collect();
			let failures: Vec<serde_json::Value> = report
				.conversion
				.failures
				.iter()
				.map(|failure| {
					serde_json::json!({
						"file": make_relative(&failure.path, root),
						"message": failure.error.to_string(),
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": is_clean && report.is_ok(),
				"files": files,
				"relocations": moves,
				"failures": failures,
			});
			println!("{output}");
		}
		OutputFormat::Github => {
			for file in &changed {
				let rel = make_relative(&file.path, root);
				for admonition in file.admonitions.iter().filter(|a| a.is_converted()) {
					println!(
						"::warning file={rel},line={}::Admonition `[!{}]` has not been converted \
						 to `!!! {}`",
						admonition.line,
						admonition.label,
						admonition.kind.as_deref().unwrap_or_default()
					);
				}
			}
			if let Some(relocation) = &report.relocation {
				for moved in &relocation.moved {
					println!(
						"::warning file={}::File should be moved to `{}`",
						make_relative(&moved.from, root),
						make_relative(&moved.to, root)
					);
				}
			}
			if is_clean {
				println!("All admonitions are converted.");
			} else {
				eprintln!("{}", check_summary(changed.len(), pending_moves));
			}
		}
		OutputFormat::Text => {
			if is_clean {
				println!("Check passed: all admonitions are converted.");
			} else {
				eprintln!("Check failed.");

				if let Some(relocation) = report.relocation.as_ref().filter(|r| !r.moved.is_empty())
				{
					eprintln!();
					eprintln!("Files to relocate:");
					for moved in &relocation.moved {
						eprintln!(
							"  {} -> {}",
							make_relative(&moved.from, root),
							make_relative(&moved.to, root)
						);
					}
				}

				if !changed.is_empty() {
					eprintln!();
					eprintln!("Files with unconverted admonitions:");
					for file in &changed {
						let rel = make_relative(&file.path, root);
						for admonition in file.admonitions.iter().filter(|a| a.is_converted()) {
							eprintln!("  [!{}] at {rel}:{}", admonition.label, admonition.line);
						}

						if show_diff {
							print_diff(&file.original, &file.converted);
						}
					}
				}

				eprintln!();
				eprintln!("{}", check_summary(changed.len(), pending_moves));
			}
		}
	}

	report_failures(&mut report, root)?;

	if !is_clean {
		process::exit(1);
	}

	Ok(())
}

fn check_summary(changed: usize, pending_moves: usize) -> String {
	let mut parts = Vec::new();
	if pending_moves > 0 {
		parts.push(format!("{pending_moves} file(s) need relocating"));
	}
	if changed > 0 {
		parts.push(format!("{changed} file(s) have unconverted admonitions"));
	}
	format!("{}. Run `callout` to fix.", parts.join(" and "))
}

fn run_kinds(
	args: &CalloutCli,
	format: KindsOutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let kinds = CalloutConfig::load_or_default(&root)?.kind_map();
	let entries = kinds.entries();

	match format {
		KindsOutputFormat::Json => {
			let map: serde_json::Map<String, serde_json::Value> = entries
				.iter()
				.map(|(label, kind)| ((*label).to_string(), serde_json::json!(kind)))
				.collect();
			println!("{}", serde_json::Value::Object(map));
		}
		KindsOutputFormat::Text => {
			let width = entries
				.iter()
				.map(|(label, _)| label.len())
				.max()
				.unwrap_or(0);
			for (label, kind) in entries {
				println!("[!{label}]{:pad$} -> !!! {kind}", "", pad = width - label.len());
			}
		}
	}

	Ok(())
}

fn run_init(args: &CalloutCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let config_path = root.join("callout.toml");

	if let Some(existing) = CalloutConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Set `docs_dir` to your documentation directory");
	println!("  2. Run `callout check` to see what would change");
	println!("  3. Run `callout` to convert");

	Ok(())
}

fn print_relocation(relocation: &RelocationReport, root: &Path, dry_run: bool) {
	let verb = if dry_run { "Would move" } else { "Moved" };
	for moved in &relocation.moved {
		println!(
			"{verb} {} -> {}",
			make_relative(&moved.from, root),
			make_relative(&moved.to, root)
		);
	}

	for skipped in &relocation.skipped {
		let reason = match skipped.reason {
			SkipReason::IndexExists => "index already exists",
			_ => "destination already exists",
		};
		eprintln!(
			"{} left {} in place: {} ({reason})",
			colored!("warning:", yellow),
			make_relative(&skipped.path, root),
			make_relative(&skipped.destination, root)
		);
	}
}

fn print_changed_files(files: &[&FileReport], root: &Path) {
	for file in files {
		println!(
			"  {} ({})",
			make_relative(&file.path, root),
			file.converted_count()
		);
	}
}

fn print_unknown_labels(conversion: &ConvertReport, root: &Path) {
	for file in &conversion.files {
		let rel = make_relative(&file.path, root);
		for admonition in file.admonitions.iter().filter(|a| !a.is_converted()) {
			println!(
				"  left unknown [!{}] unchanged at {rel}:{}",
				admonition.label, admonition.line
			);
		}
	}
}

/// Print every per-file failure as a diagnostic and turn them into a
/// single error so the process exits non-zero.
fn report_failures(report: &mut RunReport, root: &Path) -> Result<(), Box<dyn std::error::Error>> {
	if report.is_ok() {
		return Ok(());
	}

	let failures = std::mem::take(&mut report.conversion.failures);
	let count = failures.len();
	for failure in failures {
		let rel = make_relative(&failure.path, root);
		let report = miette::Report::new(failure.error).wrap_err(format!("skipped {rel}"));
		eprintln!("{report:?}");
	}

	Err(format!("{count} file(s) could not be converted").into())
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
