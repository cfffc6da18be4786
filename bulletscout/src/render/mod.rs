//! Report rendering for a finished [`SearchOutput`].
//!
//! Renderers rely on the coordinator's ordering: matches of one file are
//! contiguous and its pages ascend, so grouping is a single linear pass.
mod html;
mod text;

pub use html::{escape_html, HtmlRenderer};
pub use text::TextRenderer;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::info;

use crate::errors::{SearchError, SearchResult};
use crate::results::SearchOutput;
use crate::search::KeywordMatcher;

/// Output formats a report can be rendered in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(SearchError::config_error(format!(
                "Unknown report format: {other}"
            ))),
        }
    }
}

/// A piece of bullet text, either plain or a keyword occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Plain(&'a str),
    Highlight(&'a str),
}

/// Splits `text` around every case-insensitive occurrence of `keyword`
pub fn highlight_segments<'a>(text: &'a str, keyword: &str) -> Vec<Segment<'a>> {
    let matcher = KeywordMatcher::new(keyword);
    let mut segments = Vec::new();
    let mut last = 0;
    for (start, end) in matcher.find_occurrences(text) {
        if start > last {
            segments.push(Segment::Plain(&text[last..start]));
        }
        segments.push(Segment::Highlight(&text[start..end]));
        last = end;
    }
    if last < text.len() {
        segments.push(Segment::Plain(&text[last..]));
    }
    segments
}

/// Turns a search result into a finished document
pub trait ReportRenderer {
    fn render(&self, output: &SearchOutput) -> SearchResult<String>;
}

/// Pretty-printed JSON of the whole result
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer;

impl ReportRenderer for JsonRenderer {
    fn render(&self, output: &SearchOutput) -> SearchResult<String> {
        Ok(serde_json::to_string_pretty(output)?)
    }
}

/// Renders `output` in `format`; text output is uncoloured
pub fn render(output: &SearchOutput, format: ReportFormat) -> SearchResult<String> {
    match format {
        ReportFormat::Html => HtmlRenderer.render(output),
        ReportFormat::Text => TextRenderer::plain().render(output),
        ReportFormat::Json => JsonRenderer.render(output),
    }
}

/// Renders `output` and writes it to `path`
pub fn write_report(output: &SearchOutput, format: ReportFormat, path: &Path) -> SearchResult<()> {
    let report = render(output, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, report)?;
    info!("Wrote {:?} report to {}", format, path.display());
    Ok(())
}

/// Human-readable modification time used in report headings
pub(crate) fn format_modified(time: std::time::SystemTime) -> String {
    humantime::format_rfc3339_seconds(time).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Match;
    use std::path::PathBuf;
    use std::time::SystemTime;
    use tempfile::tempdir;

    #[test]
    fn test_highlight_segments() {
        let segments = highlight_segments("- Keyword one, keyword two", "KEYWORD");
        assert_eq!(
            segments,
            vec![
                Segment::Plain("- "),
                Segment::Highlight("Keyword"),
                Segment::Plain(" one, "),
                Segment::Highlight("keyword"),
                Segment::Plain(" two"),
            ]
        );
    }

    #[test]
    fn test_highlight_segments_edges() {
        assert_eq!(highlight_segments("cat", "CAT"), vec![Segment::Highlight("cat")]);
        assert_eq!(highlight_segments("dog", "cat"), vec![Segment::Plain("dog")]);
        assert!(highlight_segments("", "cat").is_empty());
    }

    #[test]
    fn test_report_format_parsing() {
        assert_eq!("HTML".parse::<ReportFormat>().unwrap(), ReportFormat::Html);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert_eq!("json".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("pdf".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_write_json_report() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/report.json");
        let output = SearchOutput::from_unordered(
            "keyword",
            vec![Match {
                file_path: PathBuf::from("/docs/a.pdf"),
                page_number: 1,
                bullet_text: "- keyword here".to_string(),
                file_modified: SystemTime::UNIX_EPOCH,
            }],
        );

        write_report(&output, ReportFormat::Json, &path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["keyword"], "keyword");
        assert_eq!(json["matches"][0]["file_path"], "/docs/a.pdf");
        assert_eq!(json["matches"][0]["page_number"], 1);
    }
}
