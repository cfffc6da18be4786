use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{trace, warn};

use super::matcher::KeywordMatcher;
use super::paragraph::reconstruct_paragraphs;
use crate::document::{DocumentLoader, PageSource};
use crate::errors::SearchResult;
use crate::metrics::ScanMetrics;
use crate::results::Match;

/// Scans single documents for bullet paragraphs containing the keyword
#[derive(Clone)]
pub struct FileScanner {
    matcher: KeywordMatcher,
    loader: Arc<dyn DocumentLoader>,
    metrics: ScanMetrics,
}

impl std::fmt::Debug for FileScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileScanner")
            .field("matcher", &self.matcher)
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

impl FileScanner {
    pub fn new(matcher: KeywordMatcher, loader: Arc<dyn DocumentLoader>) -> Self {
        Self::with_metrics(matcher, loader, ScanMetrics::new())
    }

    pub fn with_metrics(
        matcher: KeywordMatcher,
        loader: Arc<dyn DocumentLoader>,
        metrics: ScanMetrics,
    ) -> Self {
        Self {
            matcher,
            loader,
            metrics,
        }
    }

    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Scans one file. Never fails: a document that cannot be opened, or
    /// whose parser panics, is logged and contributes no matches.
    pub fn scan_file(&self, path: &Path, modified: SystemTime) -> Vec<Match> {
        trace!("Scanning file: {}", path.display());

        let outcome =
            panic::catch_unwind(AssertUnwindSafe(|| self.try_scan_file(path, modified)));
        match outcome {
            Ok(Ok(matches)) => {
                self.metrics.record_file_scanned();
                matches
            }
            Ok(Err(e)) => {
                warn!("Skipping {}: {}", path.display(), e);
                self.metrics.record_file_failed();
                Vec::new()
            }
            Err(_) => {
                warn!("Skipping {}: document parser panicked", path.display());
                self.metrics.record_file_failed();
                Vec::new()
            }
        }
    }

    /// Opens `path` with the loader and scans every page
    pub fn try_scan_file(&self, path: &Path, modified: SystemTime) -> SearchResult<Vec<Match>> {
        let document = self.loader.open(path)?;
        Ok(self.scan_pages(path, document.as_ref(), modified))
    }

    /// Scans the pages of an already opened document in page order.
    /// Unreadable or empty pages are skipped, as are pages whose
    /// extraction panics.
    pub fn scan_pages(
        &self,
        path: &Path,
        pages: &dyn PageSource,
        modified: SystemTime,
    ) -> Vec<Match> {
        let mut matches = Vec::new();

        for page_number in 1..=pages.page_count() {
            let extracted = panic::catch_unwind(AssertUnwindSafe(|| pages.page_text(page_number)));
            let text = match extracted {
                Ok(Ok(text)) if !text.trim().is_empty() => text,
                Ok(Ok(_)) => {
                    trace!("Page {} of {} is empty", page_number, path.display());
                    self.metrics.record_page_skipped();
                    continue;
                }
                Ok(Err(e)) => {
                    warn!("{}", e);
                    self.metrics.record_page_skipped();
                    continue;
                }
                Err(_) => {
                    warn!(
                        "Skipping page {} of {}: text extraction panicked",
                        page_number,
                        path.display()
                    );
                    self.metrics.record_page_skipped();
                    continue;
                }
            };
            self.metrics.record_page_scanned();

            let paragraphs = reconstruct_paragraphs(&text);
            self.metrics.record_paragraphs(paragraphs.len());

            matches.extend(paragraphs.iter().filter_map(|paragraph| {
                self.matcher.bullet_text(paragraph).map(|bullet_text| Match {
                    file_path: path.to_path_buf(),
                    page_number,
                    bullet_text,
                    file_modified: modified,
                })
            }));
        }

        self.metrics.record_matches(matches.len());
        matches
    }
}
