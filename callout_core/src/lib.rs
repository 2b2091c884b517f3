//! `callout_core` is the core library for the `callout` documentation
//! preprocessor. It rewrites GitHub-style quoted admonitions into MkDocs
//! admonition directives, in place, across a documentation tree.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Project root
//!   → Relocator (optional: moves top-level *.md into the docs dir, README.md → index.md)
//!   → Walker (collects *.md under the docs dir, honoring .gitignore and excludes)
//!   → Transformer (rewrites `> [!KIND]` blocks into `!!! kind` blocks)
//!   → Writer (atomic temp-file + rename, only when content changed)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `callout.toml`.
//! - [`kinds`]: The label → admonition kind mapping.
//! - [`transform`]: The text transformation. Pure and total.
//! - [`walker`]: Directory walking and per-file rewriting.
//! - [`relocate`]: Moving top-level markdown files into the docs directory.
//! - [`pipeline`]: A full pass: relocation followed by conversion.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use callout_core::pipeline::RunOptions;
//! use callout_core::pipeline::run;
//! use std::path::Path;
//!
//! let options = RunOptions::load(Path::new(".")).unwrap();
//! let report = run(&options).unwrap();
//! println!("{} admonition(s) converted", report.conversion.converted_count());
//! ```
//!
//! Converting a string directly:
//!
//! ```rust
//! let input = "> [!TIP]\n> Use the cache.\n";
//! let output = callout_core::convert_admonitions(input);
//! assert_eq!(output, "!!! tip\n    Use the cache.\n");
//! ```

pub use config::*;
pub use error::*;
pub use kinds::*;
pub use transform::*;

pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod kinds;
pub mod pipeline;
pub mod relocate;
pub mod transform;
pub mod walker;
