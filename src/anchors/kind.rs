//! File classification
//!
//! Every indexed file maps to one [`FileKind`], which carries the comment
//! prefixes that make a line eligible and the multi-line zone rule (if any)
//! used for docstrings and HTML comment blocks.

use serde::Serialize;
use std::collections::HashMap;

use crate::core::error::IndexError;
use crate::core::paths::file_name;

/// Closed set of file kinds the scanner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// `//` and `/* */` comment languages (C, JS/TS, Rust, Go, JSON with comments, ...)
    #[serde(rename = "c")]
    CStyle,
    /// `#` comments plus triple-quoted docstrings
    Python,
    /// `#` comments (shell, YAML, TOML, Ruby, ...)
    Shell,
    /// `<!-- -->` comments, single and multi-line
    Html,
    /// `;` comments (Lisp family, INI, assembly)
    Lisp,
    /// Every line is eligible
    Markdown,
}

/// Multi-line region treated as comment-equivalent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneRule {
    None,
    /// `"""` / `'''` string literals
    Docstring,
    /// `<!--` ... `-->` blocks
    HtmlComment,
}

/// Which pattern variants apply to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxFamily {
    /// Eligibility gated by comments; legacy forms use `[text](#id)` / `[text](id)`
    Comment,
    /// All lines eligible; legacy forms use `[text](<>#id)` / `[text](<>id)`
    Markdown,
}

const C_STYLE_EXTENSIONS: &[&str] = &[
    "js", "mjs", "cjs", "jsx", "ts", "mts", "cts", "tsx", "json", "jsonc", "c", "h", "cc", "cpp",
    "cxx", "hpp", "cs", "java", "kt", "kts", "go", "rs", "swift", "scala", "dart", "php", "css",
    "scss", "less", "proto",
];
const PYTHON_EXTENSIONS: &[&str] = &["py", "pyi", "pyw"];
const SHELL_EXTENSIONS: &[&str] = &[
    "sh", "bash", "zsh", "fish", "rb", "pl", "r", "yaml", "yml", "toml", "conf", "cfg",
];
const HTML_EXTENSIONS: &[&str] = &["html", "htm", "xhtml", "xml", "svg", "vue"];
const LISP_EXTENSIONS: &[&str] = &["lisp", "lsp", "clj", "cljs", "el", "scm", "rkt", "asm", "ini"];
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdx"];

/// Extension-less files recognized by name
const KNOWN_BASENAMES: &[(&str, FileKind)] = &[
    ("Makefile", FileKind::Shell),
    ("Dockerfile", FileKind::Shell),
    ("Justfile", FileKind::Shell),
    ("Rakefile", FileKind::Shell),
];

impl FileKind {
    pub const ALL: [FileKind; 6] = [
        FileKind::CStyle,
        FileKind::Python,
        FileKind::Shell,
        FileKind::Html,
        FileKind::Lisp,
        FileKind::Markdown,
    ];

    /// Canonical name used in `--file-type` mappings
    pub fn name(self) -> &'static str {
        match self {
            FileKind::CStyle => "c",
            FileKind::Python => "python",
            FileKind::Shell => "shell",
            FileKind::Html => "html",
            FileKind::Lisp => "lisp",
            FileKind::Markdown => "markdown",
        }
    }

    /// Parse a kind name, accepting a few common aliases
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "c" | "js" | "cstyle" => Some(FileKind::CStyle),
            "python" | "py" => Some(FileKind::Python),
            "shell" | "sh" | "hash" => Some(FileKind::Shell),
            "html" | "xml" => Some(FileKind::Html),
            "lisp" | "semicolon" => Some(FileKind::Lisp),
            "markdown" | "md" => Some(FileKind::Markdown),
            _ => None,
        }
    }

    /// Trimmed-line prefixes that mark a single-line comment
    pub fn comment_prefixes(self) -> &'static [&'static str] {
        match self {
            FileKind::CStyle => &["//", "/*", "*", "{/*"],
            FileKind::Python | FileKind::Shell => &["#"],
            FileKind::Html => &["<!--"],
            FileKind::Lisp => &[";"],
            FileKind::Markdown => &[],
        }
    }

    pub fn zone_rule(self) -> ZoneRule {
        match self {
            FileKind::Python => ZoneRule::Docstring,
            FileKind::Html => ZoneRule::HtmlComment,
            _ => ZoneRule::None,
        }
    }

    pub fn family(self) -> SyntaxFamily {
        match self {
            FileKind::Markdown => SyntaxFamily::Markdown,
            _ => SyntaxFamily::Comment,
        }
    }

    fn default_extensions(self) -> &'static [&'static str] {
        match self {
            FileKind::CStyle => C_STYLE_EXTENSIONS,
            FileKind::Python => PYTHON_EXTENSIONS,
            FileKind::Shell => SHELL_EXTENSIONS,
            FileKind::Html => HTML_EXTENSIONS,
            FileKind::Lisp => LISP_EXTENSIONS,
            FileKind::Markdown => MARKDOWN_EXTENSIONS,
        }
    }

    /// The comment prefix a trimmed line starts with, if any
    pub fn matching_prefix(self, trimmed: &str) -> Option<&'static str> {
        self.comment_prefixes()
            .iter()
            .copied()
            .filter(|p| trimmed.starts_with(p))
            .max_by_key(|p| p.len())
    }
}

/// Extension → kind table, built-ins plus user mappings
#[derive(Debug, Clone, Default)]
pub struct FileTypes {
    custom: HashMap<String, FileKind>,
}

impl FileTypes {
    /// Built-in table extended with `(extension, kind)` mappings
    pub fn with_custom(mappings: impl IntoIterator<Item = (String, FileKind)>) -> Self {
        let custom = mappings
            .into_iter()
            .map(|(ext, kind)| (normalize_extension(&ext), kind))
            .collect();
        Self { custom }
    }

    /// Parse one `EXT=KIND` mapping (a leading dot on EXT is allowed)
    pub fn parse_mapping(mapping: &str) -> Result<(String, FileKind), IndexError> {
        let invalid = || IndexError::FileTypeMapping {
            mapping: mapping.to_string(),
            known: FileKind::ALL
                .iter()
                .map(|k| k.name())
                .collect::<Vec<_>>()
                .join(","),
        };

        let (ext, kind) = mapping.split_once('=').ok_or_else(invalid)?;
        let ext = normalize_extension(ext);
        if ext.is_empty() {
            return Err(invalid());
        }
        let kind = FileKind::from_name(kind).ok_or_else(invalid)?;
        Ok((ext, kind))
    }

    /// Classify a root-relative path; `None` means the file is not indexed
    pub fn classify(&self, path: &str) -> Option<FileKind> {
        let name = file_name(path);

        if let Some((_, kind)) = KNOWN_BASENAMES.iter().find(|(base, _)| *base == name) {
            return Some(*kind);
        }

        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        let ext = ext.to_lowercase();

        if let Some(kind) = self.custom.get(&ext) {
            return Some(*kind);
        }

        FileKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.default_extensions().contains(&ext.as_str()))
    }

    /// Whether the path would be indexed
    pub fn is_supported(&self, path: &str) -> bool {
        self.classify(path).is_some()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
