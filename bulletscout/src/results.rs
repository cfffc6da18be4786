//! Search result types.
//!
//! Matches are owned values; once the coordinator has sorted them the
//! [`SearchOutput`] is read-only for renderers.
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::metrics::ScanStats;

/// One keyword hit inside one bullet paragraph
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Match {
    /// Absolute path of the source document
    pub file_path: PathBuf,
    /// 1-based page number within the document
    pub page_number: u32,
    /// Paragraph text prefixed with `"- "`
    pub bullet_text: String,
    /// Modification time captured when the file was discovered
    #[serde(serialize_with = "serialize_time")]
    pub file_modified: SystemTime,
}

fn serialize_time<S: Serializer>(time: &SystemTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&humantime::format_rfc3339_seconds(*time))
}

/// Total report order: newest file first, then path (case-insensitive),
/// then page. The exact path breaks ties between paths differing only in
/// case so each file stays contiguous.
pub fn compare_matches(a: &Match, b: &Match) -> Ordering {
    b.file_modified
        .cmp(&a.file_modified)
        .then_with(|| path_key(&a.file_path).cmp(&path_key(&b.file_path)))
        .then_with(|| a.file_path.cmp(&b.file_path))
        .then_with(|| a.page_number.cmp(&b.page_number))
}

fn path_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Sorts matches into report order. Stable, so paragraphs on the same page
/// keep their reading order.
pub fn sort_matches(matches: &mut [Match]) {
    matches.sort_by(compare_matches);
}

/// Consecutive matches from one file
#[derive(Debug, Clone, Copy)]
pub struct FileGroup<'a> {
    pub file_path: &'a Path,
    pub file_modified: SystemTime,
    pub matches: &'a [Match],
}

/// The ordered matches of one search plus the keyword that produced them
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutput {
    pub keyword: String,
    pub matches: Vec<Match>,
    /// Number of candidate documents discovered under the root
    pub files_searched: usize,
    pub stats: ScanStats,
}

impl SearchOutput {
    /// Creates an empty result for `keyword`
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            matches: Vec::new(),
            files_searched: 0,
            stats: ScanStats::default(),
        }
    }

    /// Builds a result from unordered matches, applying the report order
    pub fn from_unordered(keyword: impl Into<String>, mut matches: Vec<Match>) -> Self {
        sort_matches(&mut matches);
        Self {
            matches,
            ..Self::new(keyword)
        }
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Splits the ordered matches into contiguous per-file groups
    pub fn group_by_file(&self) -> Vec<FileGroup<'_>> {
        self.matches
            .chunk_by(|a, b| a.file_path == b.file_path)
            .map(|chunk| FileGroup {
                file_path: &chunk[0].file_path,
                file_modified: chunk[0].file_modified,
                matches: chunk,
            })
            .collect()
    }

    pub fn files_with_matches(&self) -> usize {
        self.group_by_file().len()
    }
}
