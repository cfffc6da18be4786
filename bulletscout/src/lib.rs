pub mod config;
pub mod document;
pub mod errors;
pub mod filters;
pub mod metrics;
pub mod render;
pub mod results;
pub mod search;

pub use config::SearchConfig;
pub use document::{DocumentLoader, ExtensionLoader, FormFeedLoader, PageSource, PdfLoader};
pub use errors::{SearchError, SearchResult};
pub use render::{write_report, ReportFormat};
pub use results::{Match, SearchOutput};
pub use search::{search, CancelFlag, SearchEngine};
