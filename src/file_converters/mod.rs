use crate::errors::AppError;
use crate::file_converters::pdf::PdfToImage;
use crate::reporter::AppReporter;
use crate::AppResult;

pub mod image_codec;
pub mod pdf;

#[cfg(feature = "pdf-render")]
mod pdf_image_converter;

#[cfg(feature = "heif")]
mod heif_codec;

pub struct FileConverters {
    pub pdf_image_converter: Option<Box<dyn PdfToImage + 'static>>,
}

impl FileConverters {
    pub fn new() -> Self {
        Self {
            pdf_image_converter: None,
        }
    }

    #[cfg(test)]
    pub fn with_pdf_image_converter(pdf_image_converter: Box<dyn PdfToImage + 'static>) -> Self {
        Self {
            pdf_image_converter: Some(pdf_image_converter),
        }
    }

    /// Binds the PDF renderer. A missing pdfium library only disables PDF support.
    pub fn init(&mut self, reporter: &AppReporter<'_>) -> AppResult<()> {
        #[cfg(feature = "pdf-render")]
        match pdf_image_converter::PdfImageConverter::new() {
            Ok(pdf_image_converter) => {
                tracing::debug!("pdfium library is bound");
                self.pdf_image_converter = Some(Box::new(pdf_image_converter));
            }
            Err(err) => {
                tracing::warn!(error = %err, "Failed to bind pdfium library");
                reporter.warn("pdfium library not found, PDF input and output are disabled")?;
            }
        }
        #[cfg(not(feature = "pdf-render"))]
        reporter.warn("Built without PDF support, PDF input and output are disabled")?;
        Ok(())
    }

    pub fn pdf_converter(&self) -> AppResult<&dyn PdfToImage> {
        self.pdf_image_converter
            .as_deref()
            .ok_or(AppError::PdfRendererUnavailable)
    }
}
