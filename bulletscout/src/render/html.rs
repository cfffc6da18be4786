use std::fmt::Write;

use super::{format_modified, highlight_segments, ReportRenderer, Segment};
use crate::errors::SearchResult;
use crate::results::SearchOutput;

const STYLE: &str = "body{font-family:sans-serif;margin:2em;max-width:60em}\
h2{font-size:1.05em;margin-bottom:0.2em;word-break:break-all}\
.modified{color:#666;font-size:0.85em;margin-top:0}\
.page{color:#666;font-size:0.85em;margin-right:0.5em}\
li{margin:0.3em 0}\
mark{background:#ffe066;padding:0 0.1em}";

/// Escapes text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Standalone HTML page with one section per document
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlRenderer;

impl ReportRenderer for HtmlRenderer {
    fn render(&self, output: &SearchOutput) -> SearchResult<String> {
        let keyword = escape_html(&output.keyword);
        let mut html = String::new();

        // Writing into a String cannot fail
        let _ = write!(
            html,
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>Bullets matching &quot;{keyword}&quot;</title>\n<style>{STYLE}</style>\n\
             </head>\n<body>\n<h1>Bullets matching &quot;{keyword}&quot;</h1>\n"
        );

        if output.is_empty() {
            html.push_str("<p class=\"summary\">No matches found.</p>\n");
        } else {
            let _ = writeln!(
                html,
                "<p class=\"summary\">{} matches in {} files</p>",
                output.len(),
                output.files_with_matches()
            );
        }

        for group in output.group_by_file() {
            let _ = write!(
                html,
                "<section class=\"file\">\n<h2>{}</h2>\n<p class=\"modified\">Modified {}</p>\n<ul>\n",
                escape_html(&group.file_path.display().to_string()),
                format_modified(group.file_modified)
            );
            for m in group.matches {
                let _ = write!(
                    html,
                    "<li><span class=\"page\">p. {}</span>",
                    m.page_number
                );
                for segment in highlight_segments(&m.bullet_text, &output.keyword) {
                    match segment {
                        Segment::Plain(s) => html.push_str(&escape_html(s)),
                        Segment::Highlight(s) => {
                            let _ = write!(html, "<mark>{}</mark>", escape_html(s));
                        }
                    }
                }
                html.push_str("</li>\n");
            }
            html.push_str("</ul>\n</section>\n");
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::Match;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn hit(path: &str, page: u32, text: &str, secs: u64) -> Match {
        Match {
            file_path: PathBuf::from(path),
            page_number: page,
            bullet_text: text.to_string(),
            file_modified: SystemTime::UNIX_EPOCH + Duration::from_secs(secs),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_render_groups_and_highlights() {
        let output = SearchOutput::from_unordered(
            "keyword",
            vec![
                hit("/docs/b.pdf", 1, "- keyword two", 10),
                hit("/docs/a.pdf", 1, "- Keyword <one> & more", 20),
            ],
        );

        let html = HtmlRenderer.render(&output).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("2 matches in 2 files"));
        assert!(html.contains("- <mark>Keyword</mark> &lt;one&gt; &amp; more"));
        assert!(html.contains("- <mark>keyword</mark> two"));
        assert_eq!(html.matches("<section class=\"file\">").count(), 2);

        let a = html.find("/docs/a.pdf").unwrap();
        let b = html.find("/docs/b.pdf").unwrap();
        assert!(a < b, "newer file must come first");
    }

    #[test]
    fn test_keyword_is_escaped() {
        let output = SearchOutput::from_unordered(
            "<script>",
            vec![hit("/x.pdf", 2, "- a <script> tag", 0)],
        );
        let html = HtmlRenderer.render(&output).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("<mark>&lt;script&gt;</mark>"));
    }

    #[test]
    fn test_empty_report() {
        let html = HtmlRenderer.render(&SearchOutput::new("nothing")).unwrap();
        assert!(html.contains("No matches found."));
        assert!(!html.contains("<section"));
    }
}
