use indicatif::style::TemplateError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{message}")]
    ValidationError { message: String },
    #[error("Output format '{format}' is not supported by the available codecs")]
    UnsupportedFormat { format: String },
    #[error("PDF renderer is not available. Is the pdfium library installed?")]
    PdfRendererUnavailable,
    #[error("Input/output error: {0}")]
    InputOutputError(#[from] std::io::Error),
    #[error("Template error: {0}")]
    TemplateError(#[from] TemplateError),
    #[cfg(feature = "pdf-render")]
    #[error("PDF conversion error: {0}")]
    PdfiumError(#[from] pdfium_render::prelude::PdfiumError),
    #[cfg(feature = "heif")]
    #[error("HEIF conversion error: {0}")]
    HeifError(#[from] libheif_rs::HeifError),
    #[error("Image conversion error: {0}")]
    ImageError(#[from] image::ImageError),
    #[error("Glob pattern error: {0}")]
    GlobError(#[from] globset::Error),
    #[error("System error: {message}")]
    SystemError { message: String },
}

impl AppError {
    pub fn validation<S: Into<String>>(message: S) -> Self {
        AppError::ValidationError {
            message: message.into(),
        }
    }
}
