//! helplint CLI binary entry point.
//! Resolves configuration, loads help indexes, and prints results.

use clap::Parser;
use helplint::cli::{Cli, Commands};
use helplint::config::{self, Effective};
use helplint::lint;
use helplint::markup::HelpMarkup;
use helplint::output;
use helplint::source::DiskSource;
use helplint::store::IndexStore;
use helplint::target::resource_for_path;
use helplint::utils::{error_prefix, info_prefix, init_logging, note_prefix};
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", error_prefix(), msg);
    std::process::exit(2);
}

/// Absolute form of `p`, resolving symlinks when the path exists.
fn absolute(p: &Path) -> PathBuf {
    if let Ok(c) = p.canonicalize() {
        return c;
    }
    match std::env::current_dir() {
        Ok(cwd) if p.is_relative() => cwd.join(p),
        _ => p.to_path_buf(),
    }
}

/// Resolve configuration and load every index under the packages root.
fn open_store(
    repo_root: Option<&str>,
    packages_root: Option<&str>,
    output: Option<&str>,
) -> (Effective, IndexStore) {
    let eff = config::resolve_effective(repo_root, packages_root, output);
    if eff.output != "human" && eff.output != "json" {
        fail(format!("Unknown output mode '{}' (expected human or json)", eff.output));
    }
    if config::load_config(&eff.repo_root).is_none() {
        tracing::debug!(repo_root = %eff.repo_root.display(), "no helplint config found; using defaults");
    }
    if !eff.packages_root.is_dir() {
        fail(format!(
            "Packages directory not found: {} (pass --packages-root or configure helplint.toml)",
            eff.packages_root.display()
        ));
    }
    let root = absolute(&eff.packages_root);
    let store = IndexStore::open(Arc::new(DiskSource::new(root)), &eff.index_name);
    (eff, store)
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Lint {
            path,
            repo_root,
            packages_root,
            output,
            verbose,
        } => {
            init_logging(verbose);
            let (eff, store) = open_store(repo_root.as_deref(), packages_root.as_deref(), output.as_deref());
            let pkgs = absolute(&eff.packages_root);
            let Some(resource) = resource_for_path(&absolute(Path::new(&path)), &pkgs) else {
                eprintln!(
                    "{} {}",
                    note_prefix(),
                    format!("{} is not inside {}; nothing to lint", path, pkgs.display())
                );
                return;
            };
            let Some(result) = lint::run_lint(&resource, &store, &HelpMarkup) else {
                eprintln!(
                    "{} {}",
                    note_prefix(),
                    format!("{} is not part of any help package; nothing to lint", resource)
                );
                return;
            };
            if eff.output != "json" && result.summary.files < result.files.len() {
                eprintln!(
                    "{} {}",
                    info_prefix(),
                    format!(
                        "Scanned {} of {} help files",
                        result.summary.files,
                        result.files.len()
                    )
                );
            }
            output::print_lint(&result, &eff.output);
            if result.summary.errors > 0 {
                std::process::exit(1);
            }
        }
        Commands::Packages {
            repo_root,
            packages_root,
            output,
            verbose,
        } => {
            init_logging(verbose);
            let (eff, store) = open_store(repo_root.as_deref(), packages_root.as_deref(), output.as_deref());
            output::print_packages(&store.snapshot(), &eff.output);
        }
    }
}
