use super::classifier::{is_bullet_line, strip_bullet_prefix};

/// One logical bullet item, whitespace-collapsed and without its glyph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulletParagraph {
    pub text: String,
}

/// Single-pass accumulator turning wrapped page lines into bullet paragraphs.
///
/// The builder is either idle (`current == None`) or has one open paragraph.
/// Bullet openers flush and restart it, non-blank lines extend it, and
/// everything else is dropped.
#[derive(Debug, Default)]
pub struct ParagraphBuilder {
    current: Option<String>,
    paragraphs: Vec<BulletParagraph>,
}

impl ParagraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds the next raw line of the page
    pub fn push_line(&mut self, line: &str) {
        if is_bullet_line(line) {
            self.flush();
            self.current = Some(strip_bullet_prefix(line));
        } else if let Some(buffer) = self.current.as_mut() {
            if !line.trim().is_empty() {
                join_continuation(buffer, line);
            }
        }
    }

    /// Emits the open paragraph, if any, and returns to idle
    pub fn flush(&mut self) {
        if let Some(buffer) = self.current.take() {
            let text = normalize_whitespace(&buffer);
            if !text.is_empty() {
                self.paragraphs.push(BulletParagraph { text });
            }
        }
    }

    /// Flushes and returns every paragraph seen so far
    pub fn finish(mut self) -> Vec<BulletParagraph> {
        self.flush();
        self.paragraphs
    }
}

/// Appends a wrapped continuation line, undoing hyphenated word breaks
fn join_continuation(prev: &mut String, next: &str) {
    let kept = prev.trim_end().len();
    if prev[..kept].ends_with('-') {
        prev.truncate(kept - 1);
        prev.push_str(next.trim_start());
    } else {
        prev.push(' ');
        prev.push_str(next);
    }
}

/// Collapses every whitespace run to one space and trims both ends
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Reconstructs the bullet paragraphs of a sequence of page lines
pub fn reconstruct_lines<'a, I>(lines: I) -> Vec<BulletParagraph>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut builder = ParagraphBuilder::new();
    for line in lines {
        builder.push_line(line);
    }
    builder.finish()
}

/// Reconstructs the bullet paragraphs of one page of extracted text
pub fn reconstruct_paragraphs(page_text: &str) -> Vec<BulletParagraph> {
    reconstruct_lines(page_text.lines())
}
