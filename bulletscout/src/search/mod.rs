//! Bullet-point keyword search.
//!
//! The pipeline runs leaves first:
//!
//! 1. [`classifier`] decides which lines open a bullet and strips the glyph.
//! 2. [`paragraph`] rebuilds wrapped lines into [`BulletParagraph`]s.
//! 3. [`matcher`] tests paragraphs for the keyword, ignoring case.
//! 4. [`processor`] runs 2 and 3 over every page of one document.
//! 5. [`engine`] discovers documents, scans them on a rayon pool sized per
//!    call and sorts the merged matches into report order.
//!
//! Workers share nothing but the result channel and the atomic counters in
//! [`crate::metrics::ScanMetrics`], so one document failing never touches
//! another document's matches.
//!
//! ```rust,ignore
//! let config = SearchConfig::new("reports", "latency");
//! let output = search(&config)?;
//! for group in output.group_by_file() {
//!     println!("{}: {} bullets", group.file_path.display(), group.matches.len());
//! }
//! ```
pub mod classifier;
pub mod engine;
pub mod matcher;
pub mod paragraph;
pub mod processor;

pub use classifier::{is_bullet_line, strip_bullet_prefix, BULLET_GLYPHS};
pub use engine::{discover_files, search, CancelFlag, Candidate, SearchEngine};
pub use matcher::{KeywordMatcher, BULLET_MARKER};
pub use paragraph::{reconstruct_lines, reconstruct_paragraphs, BulletParagraph, ParagraphBuilder};
pub use processor::FileScanner;
