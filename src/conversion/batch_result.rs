use image::DynamicImage;
use std::fmt::Display;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum FileOutcome {
    Converted {
        source: PathBuf,
        written: Vec<PathBuf>,
        buffered_pages: usize,
    },
    Failed {
        source: PathBuf,
        error: String,
    },
}

impl FileOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, FileOutcome::Converted { .. })
    }
}

impl Display for FileOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileOutcome::Converted {
                source,
                written,
                buffered_pages,
            } => {
                write!(f, "{} -> ", source.to_string_lossy())?;
                if written.is_empty() {
                    write!(f, "{} page(s) for the combined PDF", buffered_pages)
                } else {
                    let written = written
                        .iter()
                        .map(|path| path.to_string_lossy())
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "{}", written)
                }
            }
            FileOutcome::Failed { source, error } => {
                write!(f, "{}: {}", source.to_string_lossy(), error)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchError {
    File { source: PathBuf, message: String },
    CombinedPdf { message: String },
}

impl Display for BatchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BatchError::File { source, message } => {
                write!(f, "{}: {}", source.to_string_lossy(), message)
            }
            BatchError::CombinedPdf { message } => {
                write!(f, "Error saving combined PDF: {}", message)
            }
        }
    }
}

/// Outcome of one batch run, in file selection order.
#[derive(Debug, Clone)]
pub struct BatchResult {
    pub destination: PathBuf,
    pub outcomes: Vec<FileOutcome>,
    pub errors: Vec<BatchError>,
    pub combined_pdf: Option<PathBuf>,
}

impl BatchResult {
    pub fn new(destination: PathBuf) -> Self {
        Self {
            destination,
            outcomes: Vec::new(),
            errors: Vec::new(),
            combined_pdf: None,
        }
    }

    pub fn record_success(
        &mut self,
        source: PathBuf,
        written: Vec<PathBuf>,
        buffered_pages: usize,
    ) {
        self.outcomes.push(FileOutcome::Converted {
            source,
            written,
            buffered_pages,
        });
    }

    pub fn record_failure(&mut self, source: PathBuf, error: String) {
        self.errors.push(BatchError::File {
            source: source.clone(),
            message: error.clone(),
        });
        self.outcomes.push(FileOutcome::Failed { source, error });
    }

    pub fn record_combined_pdf_failure(&mut self, message: String) {
        self.errors.push(BatchError::CombinedPdf { message });
    }

    pub fn total_files(&self) -> usize {
        self.outcomes.len()
    }

    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_converted()).count()
    }

    /// Failed files. A failed combined PDF write is not counted here but is listed in `errors`.
    pub fn error_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_converted()).count()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn combined_pdf_error(&self) -> Option<&BatchError> {
        self.errors
            .iter()
            .find(|error| matches!(error, BatchError::CombinedPdf { .. }))
    }

    /// Counts files only; a failed combined PDF gets its own sentence.
    pub fn summary(&self) -> String {
        let counts = format!(
            "{} files converted, {} failed.",
            self.success_count(),
            self.error_count()
        );
        match self.combined_pdf_error() {
            Some(error) => format!("{} {}.", counts, error),
            None => counts,
        }
    }

    pub fn written_files(&self) -> Vec<PathBuf> {
        self.outcomes
            .iter()
            .flat_map(|outcome| match outcome {
                FileOutcome::Converted { written, .. } => written.clone(),
                FileOutcome::Failed { .. } => Vec::new(),
            })
            .chain(self.combined_pdf.clone())
            .collect()
    }
}

/// Pages waiting to be merged into the combined PDF. Consumed once at the end of a run.
#[derive(Debug, Default)]
pub struct CombinePdfBuffer {
    pages: Vec<DynamicImage>,
}

impl CombinePdfBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, page: DynamicImage) {
        self.pages.push(DynamicImage::ImageRgb8(page.to_rgb8()));
    }

    pub fn append(&mut self, other: CombinePdfBuffer) {
        self.pages.extend(other.pages);
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn into_pages(self) -> Vec<DynamicImage> {
        self.pages
    }
}
