use std::path::Path;

pub const SUPPORTED_EXTENSIONS: [&str; 8] =
    ["png", "jpg", "jpeg", "bmp", "gif", "heic", "heif", "pdf"];

#[derive(Debug, Clone)]
pub struct FileMatcher {
    pub filename_matcher: Option<globset::GlobMatcher>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileMatcherResult {
    Matched,
    SkippedDueToName,
    SkippedDueToExtension,
}

impl FileMatcher {
    pub fn new(filename_matcher: Option<globset::GlobMatcher>) -> Self {
        FileMatcher { filename_matcher }
    }

    pub fn from_filter(filename_filter: Option<&globset::Glob>) -> Self {
        Self::new(filename_filter.map(|filter| filter.compile_matcher()))
    }

    pub fn is_supported_extension(path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                SUPPORTED_EXTENSIONS
                    .iter()
                    .any(|supported| supported.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    /// Used for files found while expanding a directory.
    pub fn matches(&self, path: &Path) -> FileMatcherResult {
        if !Self::is_supported_extension(path) {
            return FileMatcherResult::SkippedDueToExtension;
        }

        if let Some(filename_matcher) = &self.filename_matcher {
            let file_name = path
                .file_name()
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            if !filename_matcher.is_match(file_name.as_str()) {
                return FileMatcherResult::SkippedDueToName;
            }
        }

        FileMatcherResult::Matched
    }
}
