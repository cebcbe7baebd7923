use crate::file_tools::{FileMatcher, FileMatcherResult};
use crate::reporter::AppReporter;
use crate::AppResult;
use mime::Mime;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFileKind {
    Image,
    Pdf,
}

impl SourceFileKind {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => SourceFileKind::Pdf,
            _ => SourceFileKind::Image,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceFileKind,
    pub media_type: Option<Mime>,
    pub file_size: Option<u64>,
}

impl SourceFile {
    pub fn new(path: PathBuf) -> Self {
        let kind = SourceFileKind::from_path(&path);
        let media_type = mime_guess::from_path(&path).first();
        let file_size = std::fs::metadata(&path).ok().map(|m| m.len());
        Self {
            path,
            kind,
            media_type,
            file_size,
        }
    }

    /// File name up to its first dot: `scan.2024.png` becomes `scan`.
    pub fn base_name(&self) -> String {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_default();
        match file_name.split('.').next() {
            Some(base) if !base.is_empty() => base.to_string(),
            _ => self
                .path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or(file_name),
        }
    }

    pub fn display_path(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct SourceFilesResult {
    pub files: Vec<SourceFile>,
    pub skipped: usize,
}

/// Resolves command line sources into an ordered file list.
///
/// Files named explicitly are kept in argument order whatever their extension.
/// Directories are walked recursively in path order and only contribute files
/// accepted by `file_matcher`.
pub async fn collect_source_files(
    sources: &[PathBuf],
    file_matcher: &FileMatcher,
    reporter: &AppReporter<'_>,
) -> AppResult<SourceFilesResult> {
    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut files = Vec::new();
    let mut skipped: usize = 0;

    for source in sources {
        let is_dir = match tokio::fs::metadata(source).await {
            Ok(metadata) => metadata.is_dir(),
            Err(err) => {
                // kept as a file so it fails on its own when converted
                tracing::warn!(
                    source = %source.to_string_lossy(),
                    error = %err,
                    "Cannot stat source"
                );
                false
            }
        };
        if is_dir {
            reporter.report(format!("Listing files in dir: {}", source.to_string_lossy()))?;
            let dir_result = list_files_recursive(source.clone(), file_matcher).await?;
            skipped += dir_result.skipped;
            for file in dir_result.files {
                if seen.insert(file.path.clone()) {
                    files.push(file);
                }
            }
        } else if seen.insert(source.clone()) {
            files.push(SourceFile::new(source.clone()));
        }
    }

    tracing::debug!(files = files.len(), skipped, "Collected source files");
    Ok(SourceFilesResult { files, skipped })
}

#[async_recursion::async_recursion]
async fn list_files_recursive(
    dir_path: PathBuf,
    file_matcher: &FileMatcher,
) -> AppResult<SourceFilesResult> {
    let mut entries = tokio::fs::read_dir(&dir_path).await?;
    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        paths.push((entry.path(), entry.file_type().await?));
    }
    paths.sort_by(|(a, _), (b, _)| a.cmp(b));

    let mut files = Vec::new();
    let mut skipped: usize = 0;
    for (path, file_type) in paths {
        if file_type.is_file() {
            match file_matcher.matches(&path) {
                FileMatcherResult::Matched => files.push(SourceFile::new(path)),
                FileMatcherResult::SkippedDueToName
                | FileMatcherResult::SkippedDueToExtension => skipped += 1,
            }
        } else if file_type.is_dir() {
            let dir_files = list_files_recursive(path, file_matcher).await?;
            skipped += dir_files.skipped;
            files.extend(dir_files.files);
        }
    }
    Ok(SourceFilesResult { files, skipped })
}
