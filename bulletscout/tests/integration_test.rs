use anyhow::Result;
use bulletscout::render::{render, ReportFormat};
use bulletscout::{search, DocumentLoader, PageSource, SearchConfig, SearchEngine, SearchError};
use std::fs::{self, File};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tempfile::tempdir;

fn write_doc(dir: &Path, name: &str, contents: &str, modified: SystemTime) -> Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, contents)?;
    File::options().write(true).open(&path)?.set_modified(modified)?;
    Ok(path)
}

fn seconds(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(secs)
}

fn text_config(root: &Path, keyword: &str) -> SearchConfig {
    SearchConfig {
        file_extensions: vec!["txt".to_string()],
        thread_count: NonZeroUsize::new(4),
        ..SearchConfig::new(root, keyword)
    }
}

/// Reads any file as form-feed separated text so tests can use `.pdf` names.
/// Files starting with `CORRUPT` fail to open.
struct TextAsPdfLoader;

impl DocumentLoader for TextAsPdfLoader {
    fn open(&self, path: &Path) -> bulletscout::SearchResult<Box<dyn PageSource>> {
        let contents = fs::read_to_string(path).map_err(|e| SearchError::from_io(path, e))?;
        if contents.starts_with("CORRUPT") {
            return Err(SearchError::document_open(path, "bad xref table"));
        }
        Ok(Box::new(Pages(contents.split('\x0c').map(String::from).collect())))
    }
}

struct Pages(Vec<String>);

impl PageSource for Pages {
    fn page_count(&self) -> u32 {
        self.0.len() as u32
    }

    fn page_text(&self, page: u32) -> bulletscout::SearchResult<String> {
        Ok(self.0[page as usize - 1].clone())
    }
}

#[test]
fn test_end_to_end_two_documents() -> Result<()> {
    let dir = tempdir()?;
    write_doc(
        dir.path(),
        "a.pdf",
        "- widget specs\n- keyword one here",
        seconds(2_000),
    )?;
    write_doc(dir.path(), "b.pdf", "- keyword two", seconds(1_000))?;

    let config = SearchConfig {
        file_extensions: vec!["pdf".to_string()],
        ..SearchConfig::new(dir.path(), "keyword")
    };
    let output = SearchEngine::new(config)
        .with_loader(Arc::new(TextAsPdfLoader))
        .run()?;

    assert_eq!(output.len(), 2);
    assert!(output.matches[0].file_path.ends_with("a.pdf"));
    assert_eq!(output.matches[0].page_number, 1);
    assert_eq!(output.matches[0].bullet_text, "- keyword one here");
    assert!(output.matches[1].file_path.ends_with("b.pdf"));
    assert_eq!(output.matches[1].bullet_text, "- keyword two");

    let html = render(&output, ReportFormat::Html)?;
    assert!(html.contains("- <mark>keyword</mark> one here"));
    assert!(html.contains("- <mark>keyword</mark> two"));
    Ok(())
}

#[test]
fn test_corrupted_file_does_not_hide_others() -> Result<()> {
    let dir = tempdir()?;
    for i in 0..5u64 {
        write_doc(
            dir.path(),
            &format!("ok_{i}.pdf"),
            "- the keyword is here",
            seconds(100 + i),
        )?;
    }
    write_doc(dir.path(), "broken.pdf", "CORRUPT - keyword", seconds(500))?;

    let config = SearchConfig {
        file_extensions: vec!["pdf".to_string()],
        ..SearchConfig::new(dir.path(), "keyword")
    };
    let output = SearchEngine::new(config)
        .with_loader(Arc::new(TextAsPdfLoader))
        .run()?;

    assert_eq!(output.len(), 5);
    assert_eq!(output.files_searched, 6);
    assert_eq!(output.stats.files_failed, 1);
    assert_eq!(output.stats.files_scanned, 5);
    assert!(output
        .matches
        .iter()
        .all(|m| !m.file_path.ends_with("broken.pdf")));
    Ok(())
}

#[test]
fn test_real_pdf_backend_skips_invalid_pdfs() -> Result<()> {
    let dir = tempdir()?;
    write_doc(dir.path(), "fake.pdf", "- keyword but not a pdf", seconds(10))?;
    write_doc(dir.path(), "notes.txt", "- keyword in text", seconds(5))?;

    let config = SearchConfig {
        file_extensions: vec!["pdf".to_string(), "txt".to_string()],
        ..SearchConfig::new(dir.path(), "keyword")
    };
    let output = search(&config)?;

    assert_eq!(output.len(), 1);
    assert!(output.matches[0].file_path.ends_with("notes.txt"));
    assert_eq!(output.stats.files_failed, 1);
    Ok(())
}

#[test]
fn test_newer_file_first_then_pages_ascending() -> Result<()> {
    let dir = tempdir()?;
    write_doc(
        dir.path(),
        "older.txt",
        "- keyword p1\x0c- nothing\x0c- keyword p3\n- keyword p3 again",
        seconds(1_000),
    )?;
    write_doc(
        dir.path(),
        "sub/newer.txt",
        "intro\x0c- KEYWORD on page two",
        seconds(9_000),
    )?;

    let output = search(&text_config(dir.path(), "Keyword"))?;
    let order: Vec<(String, u32, String)> = output
        .matches
        .iter()
        .map(|m| {
            (
                m.file_path.file_name().unwrap().to_string_lossy().into_owned(),
                m.page_number,
                m.bullet_text.clone(),
            )
        })
        .collect();

    assert_eq!(
        order,
        vec![
            ("newer.txt".into(), 2, "- KEYWORD on page two".into()),
            ("older.txt".into(), 1, "- keyword p1".into()),
            ("older.txt".into(), 3, "- keyword p3".into()),
            ("older.txt".into(), 3, "- keyword p3 again".into()),
        ]
    );
    assert_eq!(output.keyword, "Keyword");
    Ok(())
}

#[test]
fn test_substring_and_hyphen_rejoin_across_lines() -> Result<()> {
    let dir = tempdir()?;
    write_doc(
        dir.path(),
        "zoo.txt",
        "• Cate-\ngory theory basics\n• dogs only\n– a concat-\n  enated word",
        seconds(1),
    )?;

    let output = search(&text_config(dir.path(), "CAT"))?;
    let texts: Vec<&str> = output.matches.iter().map(|m| m.bullet_text.as_str()).collect();
    assert_eq!(texts, vec!["- Category theory basics", "- a concatenated word"]);
    Ok(())
}

#[test]
fn test_non_bullet_text_is_not_searchable() -> Result<()> {
    let dir = tempdir()?;
    write_doc(
        dir.path(),
        "prose.txt",
        "This keyword is in prose.\nSo is this keyword.",
        seconds(1),
    )?;

    let output = search(&text_config(dir.path(), "keyword"))?;
    assert!(output.is_empty());
    assert_eq!(output.files_searched, 1);
    assert_eq!(output.stats.files_scanned, 1);
    Ok(())
}

#[test]
fn test_ignore_patterns_and_extensions() -> Result<()> {
    let dir = tempdir()?;
    write_doc(dir.path(), "keep.txt", "- keyword", seconds(3))?;
    write_doc(dir.path(), "archive/old.txt", "- keyword", seconds(2))?;
    write_doc(dir.path(), "other.md", "- keyword", seconds(1))?;

    let config = SearchConfig {
        ignore_patterns: vec!["archive/**".to_string()],
        ..text_config(dir.path(), "keyword")
    };
    let output = search(&config)?;

    assert_eq!(output.len(), 1);
    assert!(output.matches[0].file_path.ends_with("keep.txt"));
    Ok(())
}

#[test]
fn test_empty_folder_and_missing_folder() -> Result<()> {
    let dir = tempdir()?;
    let output = search(&text_config(dir.path(), "keyword"))?;
    assert!(output.is_empty());

    let missing = search(&text_config(&dir.path().join("missing"), "keyword"));
    assert!(matches!(missing, Err(SearchError::RootNotFound(_))));
    Ok(())
}

#[test]
fn test_single_worker_matches_many_workers() -> Result<()> {
    let dir = tempdir()?;
    for i in 0..30u64 {
        write_doc(
            dir.path(),
            &format!("d{i}.txt"),
            &format!("- keyword {i}\x0c- also keyword {i}"),
            seconds(i % 4),
        )?;
    }

    let single = search(&SearchConfig {
        thread_count: NonZeroUsize::new(1),
        ..text_config(dir.path(), "keyword")
    })?;
    let many = search(&SearchConfig {
        thread_count: NonZeroUsize::new(8),
        ..text_config(dir.path(), "keyword")
    })?;

    assert_eq!(single.len(), 60);
    assert_eq!(single.matches, many.matches);
    Ok(())
}
