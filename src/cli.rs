//! CLI module - Command-line interface definitions and handlers

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::anchors::kind::FileTypes;
use crate::core::config::{Settings, DEFAULT_DEBOUNCE_MS, DEFAULT_DUPLICATE_INTERVAL_MS};
use crate::core::render::{OutputFormat, RenderConfig};

/// anchorlink - index [[id|label]] anchors in comments and markdown, resolve links to them.
#[derive(Parser, Debug)]
#[command(name = "anchorlink")]
#[command(
    author,
    version,
    about,
    long_about = r#"anchorlink indexes named anchors declared in code comments and markdown,
and resolves links that point at them.

Syntax:
- anchor: [[id|label]]   (inside a comment, or anywhere in markdown)
- link:   [[#id|label]]

Each command prints a ResultSet in the selected format (default: jsonl).

Output formats:
- jsonl: one JSON object per line (best for piping into tools)
- json: a single JSON array
- md: human-friendly Markdown
- raw: excerpts only

Examples:
    anchorlink files
    anchorlink anchor list --by-file
    anchorlink anchor get greeting
    anchorlink links src/main.rs
    anchorlink watch
"#
)]
pub struct Cli {
    /// Root directory of the workspace.
    #[arg(
        long,
        global = true,
        default_value = ".",
        value_name = "ROOT",
        env = "ANCHORLINK_ROOT",
        long_help = "Root directory of the workspace (defaults to the current directory).\n\n\
All paths emitted in results are relative to this root, and ignore files are\n\
read from it."
    )]
    pub root: PathBuf,

    /// Output format (jsonl/json/md/raw).
    #[arg(
        long,
        global = true,
        default_value = "jsonl",
        value_name = "FORMAT",
        long_help = "Select the output format for ResultSet.\n\n\
Supported values:\n\
- jsonl (default)\n\
- json\n\
- md (markdown)\n\
- raw"
    )]
    pub format: OutputFormat,

    /// Disable colored output (when applicable).
    #[arg(
        long,
        global = true,
        long_help = "Disable colored output for watch notices. Useful when piping to files."
    )]
    pub no_color: bool,

    /// Quiet mode (errors only on stderr).
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug diagnostics on stderr).
    #[arg(
        short,
        long,
        global = true,
        long_help = "Enable debug diagnostics on stderr, including per-file scan results and\n\
skipped files. RUST_LOG overrides this when set."
    )]
    pub verbose: bool,

    /// Pretty-print JSON/JSONL output with indentation.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Also recognize the legacy [text](#id) / [text](<>id) forms.
    #[arg(
        long,
        global = true,
        env = "ANCHORLINK_LEGACY_SYNTAX",
        long_help = "Also recognize the legacy syntax:\n\
- comments: [text](#id) declares an anchor, [text](id) links to it\n\
- markdown: [text](<>#id) declares an anchor, [text](<>id) links to it\n\n\
Off by default."
    )]
    pub legacy_syntax: bool,

    /// Add .gitignore patterns to the ignore stack.
    #[arg(
        long,
        global = true,
        env = "ANCHORLINK_USE_GITIGNORE",
        long_help = "Add patterns from ROOT/.gitignore to the ignore stack.\n\n\
.anchorlinkignore and .git/info/anchorlinkignore are always honored."
    )]
    pub use_gitignore: bool,

    /// Map an extra extension onto a file kind (EXT=KIND, repeatable).
    #[arg(
        long = "file-type",
        global = true,
        value_name = "EXT=KIND",
        env = "ANCHORLINK_FILE_TYPES",
        value_delimiter = ',',
        long_help = "Map an extra file extension onto a known kind, e.g. --file-type vue=html.\n\n\
Kinds: c, python, shell, html, lisp, markdown.\n\
May be repeated; the environment variable takes a comma-separated list."
    )]
    pub file_types: Vec<String>,

    /// Quiet period before a rebuild in watch mode (milliseconds).
    #[arg(
        long,
        global = true,
        value_name = "MS",
        default_value_t = DEFAULT_DEBOUNCE_MS,
        env = "ANCHORLINK_DEBOUNCE_MS"
    )]
    pub debounce_ms: u64,

    /// Interval between repeated duplicate warnings in watch mode (milliseconds).
    #[arg(
        long,
        global = true,
        value_name = "MS",
        default_value_t = DEFAULT_DUPLICATE_INTERVAL_MS,
        env = "ANCHORLINK_DUPLICATE_INTERVAL_MS"
    )]
    pub duplicate_interval_ms: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the files that would be indexed.
    #[command(
        long_about = "Walk ROOT and emit one file item per indexable file, after applying\n\
the ignore stack (.anchorlinkignore, .git/info/anchorlinkignore, and optionally\n\
.gitignore). Hidden entries and node_modules are always skipped.\n\n\
Example:\n\
  anchorlink files --use-gitignore\n"
    )]
    Files,

    /// Anchor management commands.
    #[command(
        long_about = "Anchors are declared with [[id|label]] inside comments (or anywhere in\n\
markdown files). Ids use letters, digits, '_' and '-'.\n\n\
Subcommands:\n\
- list: list anchors (or anchor counts per file)\n\
- get: locate an anchor by id\n\
- lint: report duplicate ids\n"
    )]
    Anchor {
        #[command(subcommand)]
        action: AnchorCommands,
    },

    /// Resolve the links in one file.
    #[command(
        long_about = "Scan FILE for [[#id|label]] links and emit one link item per link whose\n\
target exists. Unresolved links are omitted.\n\n\
Example:\n\
  anchorlink links src/main.rs\n"
    )]
    Links {
        /// File to inspect (relative to ROOT, or absolute).
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Keep the index live and report changes until interrupted.
    #[command(
        long_about = "Index ROOT once, then watch it for changes. Edits are debounced\n\
(--debounce-ms) into a single rebuild; duplicate ids are reported at once and\n\
repeated every --duplicate-interval-ms until fixed.\n\n\
Example:\n\
  anchorlink watch --debounce-ms 500\n"
    )]
    Watch,
}

#[derive(Subcommand, Debug)]
pub enum AnchorCommands {
    /// List anchors found under ROOT.
    #[command(
        long_about = "Index ROOT and emit one anchor item per definition, sorted by id.\n\n\
Examples:\n\
  anchorlink anchor list\n\
  anchorlink anchor list --by-file\n"
    )]
    List {
        /// Emit one file item per file with its anchor count instead.
        #[arg(long)]
        by_file: bool,
    },

    /// Locate an anchor by ID.
    #[command(
        long_about = "Emit the location of the first-scanned definition of ID.\n\
Output is empty when the id is unknown.\n\n\
Example:\n\
  anchorlink anchor get greeting\n"
    )]
    Get {
        /// Anchor ID.
        #[arg(value_name = "ID")]
        id: String,
    },

    /// Report duplicate anchor IDs.
    #[command(
        long_about = "Emit one error item (code DUPLICATE_ID) per definition of every id that\n\
is defined more than once. Suitable for CI gating.\n\n\
Example:\n\
  anchorlink anchor lint\n"
    )]
    Lint,
}

impl Cli {
    /// Collect indexing settings from flags and environment
    pub fn settings(&self, root: PathBuf) -> Result<Settings> {
        let mappings = self
            .file_types
            .iter()
            .filter(|mapping| !mapping.trim().is_empty())
            .map(|mapping| FileTypes::parse_mapping(mapping))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Settings::new(root)
            .with_legacy_syntax(self.legacy_syntax)
            .with_gitignore(self.use_gitignore)
            .with_file_types(FileTypes::with_custom(mappings))
            .with_debounce(Duration::from_millis(self.debounce_ms))
            .with_duplicate_interval(Duration::from_millis(self.duplicate_interval_ms)))
    }
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    let render_config = RenderConfig::with_pretty(cli.format, cli.pretty);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let root = cli.root.canonicalize().unwrap_or_else(|_| cli.root.clone());
    let settings = cli.settings(root)?;

    match cli.command {
        Commands::Files => crate::backends::discover::run_files(&settings, render_config),

        Commands::Anchor { action } => match action {
            AnchorCommands::List { by_file } => {
                crate::anchors::api::run_list(&settings, by_file, render_config)
            }
            AnchorCommands::Get { id } => crate::anchors::api::run_get(&settings, &id, render_config),
            AnchorCommands::Lint => crate::anchors::lint::run_lint(&settings, render_config),
        },

        Commands::Links { file } => crate::anchors::api::run_links(&settings, &file, render_config),

        Commands::Watch => crate::backends::watch::run_watch(&settings),
    }
}
