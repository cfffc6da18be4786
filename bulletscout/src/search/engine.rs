use ignore::WalkBuilder;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use rayon::ThreadPoolBuilder;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::SystemTime;
use tracing::{debug, info, trace};

use super::matcher::KeywordMatcher;
use super::processor::FileScanner;
use crate::config::SearchConfig;
use crate::document::{DocumentLoader, ExtensionLoader};
use crate::errors::{unify_path, SearchError, SearchResult};
use crate::filters::should_include_file;
use crate::metrics::ScanMetrics;
use crate::results::{sort_matches, Match, SearchOutput};

/// A document found under the root, with the modification time captured at discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub path: PathBuf,
    pub modified: SystemTime,
}

/// Cooperative cancellation, checked before each file is started
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Recursively lists the documents under `root` that pass the extension and
/// ignore filters. Entries whose metadata cannot be read are left out.
///
/// Hidden entries and `.ignore`/`.gitignore` rules do not exclude anything;
/// `ignore_patterns` is the only exclusion.
pub fn discover_files(
    root: &Path,
    extensions: &[String],
    ignore_patterns: &[String],
) -> Vec<Candidate> {
    let mut walker = WalkBuilder::new(root);
    walker.standard_filters(false);

    walker
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .filter(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            should_include_file(relative, extensions, ignore_patterns)
        })
        .filter_map(|entry| {
            let modified = entry
                .metadata()
                .ok()
                .and_then(|metadata| metadata.modified().ok());
            match modified {
                Some(modified) => Some(Candidate {
                    path: unify_path(entry.path()),
                    modified,
                }),
                None => {
                    debug!("No modification time for {}", entry.path().display());
                    None
                }
            }
        })
        .collect()
}

/// Runs one search: discovery, a bounded pool of file scanners, then the
/// report ordering. Holds no state between runs.
pub struct SearchEngine {
    config: SearchConfig,
    loader: Arc<dyn DocumentLoader>,
    cancel: CancelFlag,
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            config,
            loader: Arc::new(ExtensionLoader),
            cancel: CancelFlag::new(),
        }
    }

    /// Replaces the document backend
    pub fn with_loader(mut self, loader: Arc<dyn DocumentLoader>) -> Self {
        self.loader = loader;
        self
    }

    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    fn validate(&self) -> SearchResult<()> {
        let root = &self.config.root_path;
        if !root.exists() {
            return Err(SearchError::root_not_found(root));
        }
        if !root.is_dir() {
            return Err(SearchError::config_error(format!(
                "Root path is not a directory: {}",
                root.display()
            )));
        }
        if self.config.keyword.trim().is_empty() {
            return Err(SearchError::config_error("Keyword must not be empty"));
        }
        Ok(())
    }

    pub fn run(&self) -> SearchResult<SearchOutput> {
        self.validate()?;
        let keyword = &self.config.keyword;
        info!(
            "Searching {} for bullets containing {:?}",
            self.config.root_path.display(),
            keyword
        );

        let candidates = discover_files(
            &self.config.root_path,
            &self.config.file_extensions,
            &self.config.ignore_patterns,
        );
        debug!("Found {} candidate documents", candidates.len());

        if candidates.is_empty() {
            return Ok(SearchOutput::new(keyword.clone()));
        }

        let metrics = ScanMetrics::new();
        let scanner = FileScanner::with_metrics(
            KeywordMatcher::new(keyword),
            Arc::clone(&self.loader),
            metrics.clone(),
        );

        let mut matches = self.scan_all(&scanner, &candidates)?;
        sort_matches(&mut matches);

        metrics.log_stats();
        let output = SearchOutput {
            keyword: keyword.clone(),
            matches,
            files_searched: candidates.len(),
            stats: metrics.get_stats(),
        };
        info!(
            "Search complete. Found {} matches in {} files",
            output.len(),
            output.files_with_matches()
        );
        Ok(output)
    }

    /// Fans the candidates out over a pool sized for this call and gathers
    /// per-file results in completion order.
    fn scan_all(
        &self,
        scanner: &FileScanner,
        candidates: &[Candidate],
    ) -> SearchResult<Vec<Match>> {
        let workers = self.config.worker_count().get();
        let pool = ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("bulletscout-worker-{i}"))
            .build()
            .map_err(|e| SearchError::ThreadPool(e.to_string()))?;
        debug!("Scanning with {} workers", workers);

        let progress = self.progress_bar(candidates.len());
        let (sender, receiver) = mpsc::channel::<Vec<Match>>();

        pool.install(|| {
            candidates
                .par_iter()
                .for_each_with(sender, |sender, candidate| {
                    if self.cancel.is_cancelled() {
                        trace!("Cancelled before {}", candidate.path.display());
                        scanner.metrics().record_file_skipped();
                        return;
                    }
                    let matches = scanner.scan_file(&candidate.path, candidate.modified);
                    if let Some(progress) = &progress {
                        progress.inc(1);
                    }
                    // The receiver outlives the pool
                    let _ = sender.send(matches);
                });
        });

        if let Some(progress) = progress {
            progress.finish_and_clear();
        }

        Ok(receiver.into_iter().flatten().collect())
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }
        let style = ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} documents")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        Some(ProgressBar::new(len as u64).with_style(style))
    }
}

/// Searches `config.root_path` for bullet paragraphs containing `config.keyword`
pub fn search(config: &SearchConfig) -> SearchResult<SearchOutput> {
    SearchEngine::new(config.clone()).run()
}
