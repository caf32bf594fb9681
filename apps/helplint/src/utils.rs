//! Supporting helpers: stderr prefixes, logging setup, resource paths.
//!
//! Resource paths are always posix-style and relative to the packages
//! directory (`Docs/help/index.txt`), regardless of host platform.

use owo_colors::OwoColorize;
use tracing_subscriber::EnvFilter;

fn stderr_colors() -> bool {
    use std::io::IsTerminal;
    std::env::var_os("NO_COLOR").is_none() && std::io::stderr().is_terminal()
}

fn prefix(label: &str, paint: fn(&str) -> String) -> String {
    if stderr_colors() {
        paint(label)
    } else {
        label.to_string()
    }
}

pub fn error_prefix() -> String {
    prefix("error:", |s| s.red().bold().to_string())
}

pub fn note_prefix() -> String {
    prefix("note:", |s| s.cyan().bold().to_string())
}

pub fn info_prefix() -> String {
    prefix("info:", |s| s.blue().bold().to_string())
}

/// Install the global tracing subscriber writing to stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` selects `debug` over `warn`.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose { "helplint=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Normalize a resource path: forward slashes, no `.`/empty segments, `..`
/// folded, no leading or trailing slash.
pub fn normalize_resource(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split(['/', '\\']) {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    parts.join("/")
}

pub fn join_resource(base: &str, rest: &str) -> String {
    normalize_resource(&format!("{}/{}", base, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_resource() {
        assert_eq!(normalize_resource("Docs/help/"), "Docs/help");
        assert_eq!(normalize_resource("./Docs//help/./a.txt"), "Docs/help/a.txt");
        assert_eq!(normalize_resource("Docs\\help\\..\\b.txt"), "Docs/b.txt");
        assert_eq!(join_resource("Docs", "help/"), "Docs/help");
    }
}
