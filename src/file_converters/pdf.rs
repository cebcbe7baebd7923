use crate::AppResult;
use bytes::Bytes;

/// Resolution at which one rendered pixel equals one PDF point.
pub const PDF_POINTS_PER_INCH: u16 = 72;

#[derive(Debug, Clone)]
pub struct PdfInfo {
    pub pages: Vec<PdfPageInfo>,
}

#[derive(Debug, Clone)]
pub struct PdfPageInfo {
    pub page_index: usize,
    pub page_as_image: image::DynamicImage,
}

pub trait PdfToImage {
    /// Rasterizes every page in document order.
    fn convert_to_images(&self, pdf_bytes: Bytes, render_dpi: u16) -> AppResult<PdfInfo>;

    /// Builds a document with one page per image, one image pixel per point, first image first.
    fn images_to_pdf(&self, images: &[image::DynamicImage]) -> AppResult<Bytes>;
}
