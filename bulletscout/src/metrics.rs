use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::info;

/// Counters shared by every worker of one search
#[derive(Debug, Clone)]
pub struct ScanMetrics {
    files_scanned: Arc<AtomicU64>,
    files_failed: Arc<AtomicU64>,
    files_skipped: Arc<AtomicU64>,
    pages_scanned: Arc<AtomicU64>,
    pages_skipped: Arc<AtomicU64>,
    paragraphs_examined: Arc<AtomicU64>,
    matches_found: Arc<AtomicU64>,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self {
            files_scanned: Arc::new(AtomicU64::new(0)),
            files_failed: Arc::new(AtomicU64::new(0)),
            files_skipped: Arc::new(AtomicU64::new(0)),
            pages_scanned: Arc::new(AtomicU64::new(0)),
            pages_skipped: Arc::new(AtomicU64::new(0)),
            paragraphs_examined: Arc::new(AtomicU64::new(0)),
            matches_found: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Records a file whose scan ran to completion
    pub fn record_file_scanned(&self) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file that could not be opened or parsed
    pub fn record_file_failed(&self) {
        self.files_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a file left unscanned because the search was cancelled
    pub fn record_file_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_scanned(&self) {
        self.pages_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_page_skipped(&self) {
        self.pages_skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_paragraphs(&self, count: usize) {
        self.paragraphs_examined
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_matches(&self, count: usize) {
        self.matches_found.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> ScanStats {
        ScanStats {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_failed: self.files_failed.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            pages_scanned: self.pages_scanned.load(Ordering::Relaxed),
            pages_skipped: self.pages_skipped.load(Ordering::Relaxed),
            paragraphs_examined: self.paragraphs_examined.load(Ordering::Relaxed),
            matches_found: self.matches_found.load(Ordering::Relaxed),
        }
    }

    /// Logs current scan statistics
    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Scan stats:\n\
             Files scanned/failed/skipped: {}/{}/{}\n\
             Pages scanned/skipped: {}/{}\n\
             Paragraphs examined: {}\n\
             Matches: {}",
            stats.files_scanned,
            stats.files_failed,
            stats.files_skipped,
            stats.pages_scanned,
            stats.pages_skipped,
            stats.paragraphs_examined,
            stats.matches_found
        );
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScanStats {
    pub files_scanned: u64,
    pub files_failed: u64,
    pub files_skipped: u64,
    pub pages_scanned: u64,
    pub pages_skipped: u64,
    pub paragraphs_examined: u64,
    pub matches_found: u64,
}
