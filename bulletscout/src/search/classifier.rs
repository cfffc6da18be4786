use once_cell::sync::Lazy;
use regex::Regex;

/// Leading characters that open a bullet line
pub const BULLET_GLYPHS: [char; 10] = ['-', '*', '•', '‣', '▪', '◦', '·', '‒', '–', '—'];

// Leading whitespace, exactly one glyph, then at least one whitespace
static BULLET_PREFIX: Lazy<Regex> = Lazy::new(|| {
    let glyphs: String = BULLET_GLYPHS
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    Regex::new(&format!(r"^\s*[{glyphs}]\s+")).expect("bullet prefix regex is valid")
});

/// Returns true if the first non-whitespace character of `line` is a bullet glyph
pub fn is_bullet_line(line: &str) -> bool {
    line.trim_start()
        .chars()
        .next()
        .is_some_and(|c| BULLET_GLYPHS.contains(&c))
}

/// Removes the bullet prefix (indent, glyph, separating whitespace) from `line`.
///
/// Lines without that exact prefix come back trimmed and otherwise untouched,
/// so this is safe to call on arbitrary input.
pub fn strip_bullet_prefix(line: &str) -> String {
    match BULLET_PREFIX.find(line) {
        Some(prefix) => line[prefix.end()..].to_string(),
        None => line.trim().to_string(),
    }
}
