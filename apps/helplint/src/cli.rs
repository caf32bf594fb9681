//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "helplint",
    version,
    about = "Lint HyperHelp help packages",
    long_about = "helplint validates help indexes and help files (anchors, links, titles, table of contents and file coverage).\n\nConfiguration precedence: CLI > helplint.toml > defaults.",
    after_help = "Examples:\n  helplint lint Packages/Docs/help\n  helplint lint Packages/Docs/help/other.txt --output json\n  helplint packages --packages-root ~/.config/sublime-text/Packages",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current helplint version.")]
    Version,
    /// Lint a help package or a single help file
    #[command(
        about = "Run lint checks",
        long_about = "Lint the package whose document root (or index file) is given, or a single help file inside a document root. Any error diagnostic makes the exit code 1.",
        after_help = "Examples:\n  helplint lint Packages/Docs/help\n  helplint lint Packages/Docs/help/hyperhelp.json\n  helplint lint Packages/Docs/help/index.txt --output json"
    )]
    Lint {
        #[arg(help = "Document root, index file or help file to lint")]
        path: String,
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Directory holding one folder per package (default: <repo-root>/Packages)")]
        packages_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Log index loading and rule progress to stderr")]
        verbose: bool,
    },
    /// List the help packages that were found
    #[command(
        about = "List help packages",
        long_about = "Load every help index under the packages directory and list the packages with their document roots and file counts."
    )]
    Packages {
        #[arg(long, help = "Repository root (default: current dir)")]
        repo_root: Option<String>,
        #[arg(long, help = "Directory holding one folder per package (default: <repo-root>/Packages)")]
        packages_root: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
        #[arg(short, long, action = clap::ArgAction::SetTrue, help = "Log index loading to stderr")]
        verbose: bool,
    },
}
