use crate::errors::AppError;
use crate::file_converters::pdf::{PdfInfo, PdfPageInfo, PdfToImage, PDF_POINTS_PER_INCH};
use crate::{config_env_var, AppResult};
use bytes::Bytes;
use pdfium_render::prelude::*;
use std::path::PathBuf;

pub struct PdfImageConverter {
    pdfium: Pdfium,
}

impl PdfImageConverter {
    pub fn new() -> AppResult<Self> {
        let executable = std::env::current_exe()?;
        let current_dir = executable
            .parent()
            .ok_or(AppError::SystemError {
                message: "No parent directory for executable".to_string(),
            })?
            .to_path_buf();
        let search_dirs: Vec<PathBuf> = config_env_var("QUACK_PDFIUM_LIB_DIR")
            .ok()
            .map(PathBuf::from)
            .into_iter()
            .chain([
                PathBuf::from("./"),
                PathBuf::from("./lib"),
                current_dir
                    .parent()
                    .map(|p| p.join("lib"))
                    .unwrap_or(current_dir.clone()),
                current_dir.clone(),
            ])
            .collect();

        let bindings = search_dirs
            .iter()
            .find_map(|dir| {
                Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)).ok()
            })
            .map(Ok)
            .unwrap_or_else(Pdfium::bind_to_system_library)?;

        let pdfium = Pdfium::new(bindings);
        Ok(Self { pdfium })
    }
}

impl PdfToImage for PdfImageConverter {
    fn convert_to_images(&self, pdf_bytes: Bytes, render_dpi: u16) -> AppResult<PdfInfo> {
        let render_config = PdfRenderConfig::new()
            .scale_page_by_factor(render_dpi as f32 / PDF_POINTS_PER_INCH as f32);
        let document = self
            .pdfium
            .load_pdf_from_byte_vec(pdf_bytes.to_vec(), None)?;
        let mut pdf_info = PdfInfo { pages: Vec::new() };
        for (page_index, page) in document.pages().iter().enumerate() {
            let image = page.render_with_config(&render_config)?.as_image();
            pdf_info.pages.push(PdfPageInfo {
                page_index,
                page_as_image: image::DynamicImage::ImageRgb8(image.to_rgb8()),
            });
        }
        Ok(pdf_info)
    }

    fn images_to_pdf(&self, images: &[image::DynamicImage]) -> AppResult<Bytes> {
        let mut document = self.pdfium.create_new_pdf()?;
        for src_image in images {
            let width = PdfPoints::new(src_image.width() as f32);
            let height = PdfPoints::new(src_image.height() as f32);
            let mut page = document
                .pages_mut()
                .create_page_at_end(PdfPagePaperSize::from_points(width, height))?;
            let object = PdfPageImageObject::new_with_size(&document, src_image, width, height)?;
            page.objects_mut().add_image_object(object)?;
        }
        Ok(document.save_to_bytes()?.into())
    }
}
