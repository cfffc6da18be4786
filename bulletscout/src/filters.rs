/// Candidate selection for document discovery.
///
/// Kept as free functions: discovery only needs an extension check and glob
/// exclusions, both evaluated once per walked entry.
use glob::Pattern;
use std::path::Path;

/// Checks if a file carries one of the wanted extensions (case-insensitive).
/// An empty extension list accepts every file.
pub fn has_valid_extension(path: &Path, extensions: &[String]) -> bool {
    if extensions.is_empty() {
        return true;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
}

/// Checks if a file should be ignored based on ignore patterns.
///
/// Patterns are matched against the slash-normalized path and against the
/// bare file name, so `*.tmp.pdf` works without a leading `**/`.
pub fn should_ignore(path: &Path, ignore_patterns: &[String]) -> bool {
    let normalized_path = path.to_string_lossy().replace('\\', "/");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();

    ignore_patterns.iter().any(|pattern| match Pattern::new(pattern) {
        Ok(p) => p.matches(&normalized_path) || p.matches(&file_name),
        Err(_) => false,
    })
}

/// Determines if a file should become a search candidate
pub fn should_include_file(
    path: &Path,
    extensions: &[String],
    ignore_patterns: &[String],
) -> bool {
    has_valid_extension(path, extensions) && !should_ignore(path, ignore_patterns)
}
