//! helplint core library.
//!
//! This crate exposes programmatic APIs for linting HyperHelp help packages:
//! a help index (`hyperhelp.json`) describing files, topics and a table of
//! contents, plus the plain-text help files it declares.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `models`: Index model, diagnostics and lint result structs.
//! - `parse`: Header, anchor and link body parsers.
//! - `markup`: Locating anchor and link spans in help text.
//! - `source`: Where resource contents come from (disk, memory, buffers).
//! - `store`: Loaded indexes, swapped atomically on reload.
//! - `target`: Mapping a path to the package and files to lint.
//! - `checks`: The lint rules.
//! - `lint`: Running the rules over a target.
//! - `output`: Human/JSON printers.
//! - `error`: Error types for index loading.
//! - `utils`: Supporting helpers.
pub mod checks;
pub mod cli;
pub mod config;
pub mod error;
pub mod lint;
pub mod markup;
pub mod models;
pub mod output;
pub mod parse;
pub mod source;
pub mod store;
pub mod target;
pub mod utils;
