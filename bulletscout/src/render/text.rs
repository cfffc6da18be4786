use colored::Colorize;
use std::fmt::Write;

use super::{format_modified, highlight_segments, ReportRenderer, Segment};
use crate::errors::SearchResult;
use crate::results::SearchOutput;

/// Terminal report: a heading per document, one line per bullet
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    color: bool,
}

impl TextRenderer {
    pub fn colored() -> Self {
        Self { color: true }
    }

    pub fn plain() -> Self {
        Self { color: false }
    }

    fn heading(&self, text: String) -> String {
        if self.color {
            text.blue().bold().to_string()
        } else {
            text
        }
    }

    fn label(&self, text: String) -> String {
        if self.color {
            text.green().to_string()
        } else {
            text
        }
    }

    fn emphasize(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            format!("[{text}]")
        }
    }
}

impl ReportRenderer for TextRenderer {
    fn render(&self, output: &SearchOutput) -> SearchResult<String> {
        let mut report = String::new();

        for group in output.group_by_file() {
            let _ = writeln!(
                report,
                "{} ({})",
                self.heading(group.file_path.display().to_string()),
                format_modified(group.file_modified)
            );
            for m in group.matches {
                let _ = write!(report, "  {} ", self.label(format!("p.{}:", m.page_number)));
                for segment in highlight_segments(&m.bullet_text, &output.keyword) {
                    match segment {
                        Segment::Plain(s) => report.push_str(s),
                        Segment::Highlight(s) => report.push_str(&self.emphasize(s)),
                    }
                }
                report.push('\n');
            }
            report.push('\n');
        }

        let _ = writeln!(
            report,
            "Found {} matches for \"{}\" in {} files",
            output.len(),
            output.keyword,
            output.files_with_matches()
        );
        Ok(report)
    }
}
