use crate::common_types::{CombinedPdfName, CropMode, JpegQuality, OutputFormat};
use crate::errors::AppError;
use crate::file_converters::pdf::PDF_POINTS_PER_INCH;
use crate::AppResult;
use rsb_derive::Builder;
use rvstruct::ValueStruct;
use std::fmt::Display;

#[derive(Debug, Clone, Builder)]
pub struct ConversionOptions {
    pub output_format: OutputFormat,
    #[default = "JpegQuality::default()"]
    pub jpeg_quality: JpegQuality,
    #[default = "CropMode::None"]
    pub crop_mode: CropMode,
    #[default = "false"]
    pub combine_into_single_pdf: bool,
    pub combined_pdf_name: Option<CombinedPdfName>,
    #[default = "PDF_POINTS_PER_INCH"]
    pub pdf_render_dpi: u16,
}

impl ConversionOptions {
    /// Checks that need no file access, so a bad request never touches the disk.
    pub fn validate(&self) -> AppResult<()> {
        if self.combine_into_single_pdf
            && self
                .combined_pdf_name
                .as_ref()
                .map(|name| name.is_blank())
                .unwrap_or(true)
        {
            return Err(AppError::validation("Enter a name for the combined PDF file"));
        }
        if self.pdf_render_dpi == 0 {
            return Err(AppError::validation("PDF render DPI must be positive"));
        }
        Ok(())
    }
}

impl Display for ConversionOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.combine_into_single_pdf, &self.combined_pdf_name) {
            (true, Some(name)) => write!(f, "single PDF '{}'", name.file_name())?,
            _ if self.output_format.is_jpeg() => write!(
                f,
                "{} (quality {})",
                self.output_format,
                self.jpeg_quality.value()
            )?,
            _ => write!(f, "{}", self.output_format)?,
        }
        write!(f, ", crop: {}", self.crop_mode)
    }
}
