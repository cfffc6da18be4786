//! Document backends: turn a file path into per-page plain text.
//!
//! The search pipeline only sees [`PageSource`]; which parser produces the
//! pages is decided by a [`DocumentLoader`].

use lopdf::Document;
use memmap2::Mmap;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::trace;

use crate::errors::{SearchError, SearchResult};

/// Files at or above this size are memory-mapped instead of read
pub(crate) const MMAP_THRESHOLD: u64 = 32 * 1024; // 32KB

const FORM_FEED: char = '\x0c';

/// Page-addressable text of one opened document
pub trait PageSource {
    fn page_count(&self) -> u32;

    /// Plain text of the 1-based `page`
    fn page_text(&self, page: u32) -> SearchResult<String>;
}

/// Opens documents for scanning. Shared by every worker of a search.
pub trait DocumentLoader: Send + Sync {
    fn open(&self, path: &Path) -> SearchResult<Box<dyn PageSource>>;
}

/// PDF backend built on `lopdf`
#[derive(Debug, Default, Clone, Copy)]
pub struct PdfLoader;

struct PdfDocument {
    path: PathBuf,
    document: Document,
    pages: Vec<u32>,
}

impl PdfLoader {
    fn load(path: &Path) -> SearchResult<Document> {
        let file = File::open(path).map_err(|e| SearchError::from_io(path, e))?;
        let size = file.metadata().map_err(|e| SearchError::from_io(path, e))?.len();

        let parsed = if size < MMAP_THRESHOLD {
            trace!("Reading {} into memory", path.display());
            let bytes = std::fs::read(path).map_err(|e| SearchError::from_io(path, e))?;
            Document::load_mem(&bytes)
        } else {
            trace!("Memory-mapping {} ({} bytes)", path.display(), size);
            // The map lives only while lopdf parses; the document owns its objects
            let mmap = unsafe { Mmap::map(&file) }.map_err(SearchError::IoError)?;
            Document::load_mem(&mmap)
        };

        parsed.map_err(|e| SearchError::document_open(path, e.to_string()))
    }
}

impl DocumentLoader for PdfLoader {
    fn open(&self, path: &Path) -> SearchResult<Box<dyn PageSource>> {
        let document = Self::load(path)?;
        let pages = document.get_pages().keys().copied().collect();
        Ok(Box::new(PdfDocument {
            path: path.to_path_buf(),
            document,
            pages,
        }))
    }
}

impl PageSource for PdfDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> SearchResult<String> {
        let number = page
            .checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .ok_or_else(|| SearchError::page_extraction(&self.path, page, "no such page"))?;
        self.document
            .extract_text(&[*number])
            .map_err(|e| SearchError::page_extraction(&self.path, page, e.to_string()))
    }
}

/// Plain-text backend: pages are separated by form feeds (`\x0c`), the way
/// text dumps of paginated documents are laid out.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormFeedLoader;

struct FormFeedDocument {
    path: PathBuf,
    pages: Vec<String>,
}

impl FormFeedDocument {
    fn parse(path: &Path, contents: &str) -> Self {
        Self {
            path: path.to_path_buf(),
            pages: contents.split(FORM_FEED).map(str::to_string).collect(),
        }
    }
}

impl DocumentLoader for FormFeedLoader {
    fn open(&self, path: &Path) -> SearchResult<Box<dyn PageSource>> {
        let bytes = std::fs::read(path).map_err(|e| SearchError::from_io(path, e))?;
        let contents = String::from_utf8(bytes)
            .map_err(|e| SearchError::document_open(path, format!("invalid UTF-8: {e}")))?;
        Ok(Box::new(FormFeedDocument::parse(path, &contents)))
    }
}

impl PageSource for FormFeedDocument {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> SearchResult<String> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index as usize))
            .cloned()
            .ok_or_else(|| SearchError::page_extraction(&self.path, page, "no such page"))
    }
}

/// Picks a backend from the file extension: `pdf` or `txt`
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionLoader;

impl DocumentLoader for ExtensionLoader {
    fn open(&self, path: &Path) -> SearchResult<Box<dyn PageSource>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("pdf") => PdfLoader.open(path),
            Some("txt") => FormFeedLoader.open(path),
            _ => Err(SearchError::document_open(path, "unsupported document type")),
        }
    }
}
