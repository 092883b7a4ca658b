//! Renderer module
//!
//! Renders ResultSet to different output formats: jsonl, json, md, raw

use crate::core::model::{Kind, Range, ResultItem, ResultSet};

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Jsonl,
    Json,
    Markdown,
    Raw,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "jsonl" => Ok(OutputFormat::Jsonl),
            "json" => Ok(OutputFormat::Json),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "raw" => Ok(OutputFormat::Raw),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Render configuration combining format and options
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderConfig {
    pub format: OutputFormat,
    pub pretty: bool,
}

impl RenderConfig {
    /// Create a new render config with pretty option
    pub fn with_pretty(format: OutputFormat, pretty: bool) -> Self {
        Self { format, pretty }
    }
}

/// Renderer for result sets
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with render config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Render a result set to a string
    pub fn render(&self, result_set: &ResultSet) -> String {
        match self.config.format {
            OutputFormat::Jsonl => self.render_jsonl(result_set),
            OutputFormat::Json => self.render_json(result_set),
            OutputFormat::Markdown => self.render_markdown(result_set),
            OutputFormat::Raw => self.render_raw(result_set),
        }
    }

    /// Render as JSON Lines (one JSON object per line)
    fn render_jsonl(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| {
                if self.config.pretty {
                    serde_json::to_string_pretty(item).ok()
                } else {
                    serde_json::to_string(item).ok()
                }
            })
            .collect::<Vec<_>>()
            .join(if self.config.pretty { "\n\n" } else { "\n" })
    }

    /// Render as a single JSON array
    fn render_json(&self, result_set: &ResultSet) -> String {
        if self.config.pretty {
            serde_json::to_string_pretty(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        } else {
            serde_json::to_string(&result_set.items).unwrap_or_else(|_| "[]".to_string())
        }
    }

    /// Render as Markdown
    fn render_markdown(&self, result_set: &ResultSet) -> String {
        let mut output = String::new();

        let mut files = Vec::new();
        let mut anchors = Vec::new();
        let mut links = Vec::new();
        let mut errors = Vec::new();

        for item in &result_set.items {
            match item.kind {
                Kind::File => files.push(item),
                Kind::Anchor => anchors.push(item),
                Kind::Link => links.push(item),
                Kind::Error => errors.push(item),
            }
        }

        if !errors.is_empty() {
            output.push_str("## Errors\n\n");
            for item in errors {
                for error in &item.errors {
                    output.push_str(&format!("- **{}**: {}", error.code, error.message));
                    if let Some(path) = &item.path {
                        output.push_str(&format!(" (`{}`)", path));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !files.is_empty() {
            output.push_str("## Files\n\n");
            for item in files {
                if let Some(path) = &item.path {
                    output.push_str(&format!("- `{}`", path));
                    if let Some(count) = item.meta.anchors {
                        output.push_str(&format!(" ({} anchors)", count));
                    }
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        if !anchors.is_empty() {
            output.push_str("## Anchors\n\n");
            for item in anchors {
                self.render_item_md(&mut output, item);
            }
            output.push('\n');
        }

        if !links.is_empty() {
            output.push_str("## Links\n\n");
            for item in links {
                self.render_item_md(&mut output, item);
            }
            output.push('\n');
        }

        output
    }

    fn render_item_md(&self, output: &mut String, item: &ResultItem) {
        let id = item
            .data
            .as_ref()
            .and_then(|d| d.get("id"))
            .and_then(|v| v.as_str());

        output.push_str("- ");
        if let Some(id) = id {
            output.push_str(&format!("**{}** ", id));
        }
        if let Some(path) = &item.path {
            output.push_str(&format!("`{}`", path));
            match &item.range {
                Some(Range::Column(r)) => {
                    output.push_str(&format!(":{} (cols {}-{})", r.line, r.start, r.end))
                }
                Some(Range::Line(r)) => output.push_str(&format!(" (lines {}-{})", r.start, r.end)),
                None => {}
            }
        }
        if let Some(excerpt) = &item.excerpt {
            output.push_str(&format!(" - {}", excerpt));
        }
        output.push('\n');
    }

    /// Render as raw output (for debugging)
    fn render_raw(&self, result_set: &ResultSet) -> String {
        result_set
            .items
            .iter()
            .filter_map(|item| item.excerpt.clone())
            .collect::<Vec<_>>()
            .join("\n---\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{LinkError, Meta};
    use serde_json::json;

    fn renderer(format: OutputFormat) -> Renderer {
        Renderer::with_config(RenderConfig::with_pretty(format, false))
    }

    #[test]
    fn test_render_jsonl() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("src/main.rs"));
        result_set.push(ResultItem::file("src/lib.rs"));

        let output = renderer(OutputFormat::Jsonl).render(&result_set);

        assert!(output.contains("src/main.rs"));
        assert!(output.contains("src/lib.rs"));
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_render_json() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("src/main.rs"));

        let output = renderer(OutputFormat::Json).render(&result_set);

        assert!(output.starts_with('['));
        assert!(output.ends_with(']'));
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("jsonl".parse::<OutputFormat>().unwrap(), OutputFormat::Jsonl);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("raw".parse::<OutputFormat>().unwrap(), OutputFormat::Raw);
        assert!("yaml".parse::<OutputFormat>().unwrap_err().contains("Unknown format"));
    }

    #[test]
    fn test_render_json_pretty() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("src/main.rs"));

        let config = RenderConfig::with_pretty(OutputFormat::Json, true);
        let output = Renderer::with_config(config).render(&result_set);

        assert!(output.contains("  "));
    }

    #[test]
    fn test_render_markdown_empty() {
        let output = renderer(OutputFormat::Markdown).render(&ResultSet::new());
        assert!(output.is_empty());
    }

    #[test]
    fn test_render_markdown_sections() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::file("src/main.rs").with_meta(Meta {
            anchors: Some(3),
            ..Default::default()
        }));
        result_set.push(
            ResultItem::anchor("src/main.rs", Range::columns(4, 3, 25))
                .with_data(json!({ "id": "greeting" }))
                .with_excerpt("[[greeting|Hello]]"),
        );
        let mut dup = ResultItem::error(LinkError::new("DUPLICATE_ID", "Anchor ID 'x' is used 2 times"));
        dup.path = Some("a.py".to_string());
        result_set.push(dup);

        let output = renderer(OutputFormat::Markdown).render(&result_set);

        assert!(output.contains("## Errors"));
        assert!(output.contains("**DUPLICATE_ID**"));
        assert!(output.contains("`src/main.rs` (3 anchors)"));
        assert!(output.contains("## Anchors"));
        assert!(output.contains("**greeting** `src/main.rs`:4 (cols 3-25)"));
    }

    #[test]
    fn test_render_raw_uses_excerpts() {
        let mut result_set = ResultSet::new();
        result_set.push(ResultItem::link("a.rs", Range::columns(1, 0, 4)).with_excerpt("one"));
        result_set.push(ResultItem::link("a.rs", Range::columns(2, 0, 4)).with_excerpt("two"));

        let output = renderer(OutputFormat::Raw).render(&result_set);
        assert_eq!(output, "one\n---\ntwo");
    }
}
