use super::paragraph::BulletParagraph;

/// Marker prepended to every matched paragraph for display
pub const BULLET_MARKER: &str = "- ";

/// Case-insensitive substring matcher for one keyword.
///
/// No tokenization: "cat" matches "category".
#[derive(Debug, Clone)]
pub struct KeywordMatcher {
    keyword_lower: String,
}

impl KeywordMatcher {
    pub fn new(keyword: &str) -> Self {
        Self {
            keyword_lower: keyword.to_lowercase(),
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        matches(text, &self.keyword_lower)
    }

    /// Display text for a matching paragraph, or `None` if it does not match
    pub fn bullet_text(&self, paragraph: &BulletParagraph) -> Option<String> {
        self.is_match(&paragraph.text)
            .then(|| format!("{BULLET_MARKER}{}", paragraph.text))
    }

    /// Byte ranges of every case-insensitive, non-overlapping keyword
    /// occurrence in `text`, in order. Ranges always fall on char boundaries.
    pub fn find_occurrences(&self, text: &str) -> Vec<(usize, usize)> {
        let needle: Vec<char> = self.keyword_lower.chars().collect();
        if needle.is_empty() {
            return Vec::new();
        }

        let chars: Vec<(usize, char)> = text.char_indices().collect();
        let mut ranges = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            match match_len_at(&chars[i..], &needle) {
                Some(len) => {
                    let start = chars[i].0;
                    let end = chars.get(i + len).map_or(text.len(), |&(pos, _)| pos);
                    ranges.push((start, end));
                    i += len;
                }
                None => i += 1,
            }
        }
        ranges
    }
}

/// Tests whether `text` contains `keyword_lower`, ignoring case
pub fn matches(text: &str, keyword_lower: &str) -> bool {
    text.to_lowercase().contains(keyword_lower)
}

/// Number of haystack chars consumed if `needle` matches at the start of `chars`
fn match_len_at(chars: &[(usize, char)], needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    let mut consumed = 0;
    for &(_, c) in chars {
        if matched == needle.len() {
            break;
        }
        // Some chars lower-case to several chars; all of them must line up
        for lower in c.to_lowercase() {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        consumed += 1;
    }
    (matched == needle.len()).then_some(consumed)
}
