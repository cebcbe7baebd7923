use crate::common_types::OutputFormat;
use crate::conversion::{CombinePdfBuffer, ConversionOptions};
use crate::cropping::{apply_crop_mode, CropOperator};
use crate::file_converters::image_codec::{decode_image, encode_raster};
use crate::file_converters::FileConverters;
use crate::file_tools::{SourceFile, SourceFileKind};
use crate::AppResult;
use bytes::Bytes;
use image::DynamicImage;
use std::path::{Path, PathBuf};

/// What one source file produced.
#[derive(Debug, Default)]
pub struct FileConversion {
    pub written: Vec<PathBuf>,
    pub buffered: CombinePdfBuffer,
}

/// Converts single source files: rasterizes PDFs, crops, then writes or buffers each image.
pub struct ConversionDispatcher<'a> {
    converters: &'a FileConverters,
    operator: &'a dyn CropOperator,
    options: &'a ConversionOptions,
    destination: &'a Path,
}

impl<'a> ConversionDispatcher<'a> {
    pub fn new(
        converters: &'a FileConverters,
        operator: &'a dyn CropOperator,
        options: &'a ConversionOptions,
        destination: &'a Path,
    ) -> Self {
        Self {
            converters,
            operator,
            options,
            destination,
        }
    }

    /// In combine mode the pages come back in `buffered` and nothing is written.
    pub async fn convert(&self, source: &SourceFile) -> AppResult<FileConversion> {
        let data = Bytes::from(tokio::fs::read(&source.path).await?);
        let base_name = source.base_name();
        let mut conversion = FileConversion::default();

        match source.kind {
            SourceFileKind::Pdf => {
                let pdf_info = self
                    .converters
                    .pdf_converter()?
                    .convert_to_images(data, self.options.pdf_render_dpi)?;
                tracing::debug!(
                    file = %source.display_path(),
                    pages = pdf_info.pages.len(),
                    "Rasterized PDF"
                );
                for page in pdf_info.pages {
                    let page_number = page.page_index + 1;
                    let label = format!("{} (page {})", source.display_path(), page_number);
                    let image = apply_crop_mode(
                        page.page_as_image,
                        self.options.crop_mode,
                        self.operator,
                        &label,
                    )?;
                    let file_name = format!(
                        "{}_pagina{}.{}",
                        base_name,
                        page_number,
                        self.options.output_format.extension()
                    );
                    self.write_or_buffer(image, &file_name, &mut conversion)
                        .await?;
                }
            }
            SourceFileKind::Image => {
                let image = decode_image(&data, &source.path)?;
                let image = apply_crop_mode(
                    image,
                    self.options.crop_mode,
                    self.operator,
                    &source.display_path(),
                )?;
                let file_name = format!(
                    "{}.{}",
                    base_name,
                    self.options.output_format.extension()
                );
                self.write_or_buffer(image, &file_name, &mut conversion)
                    .await?;
            }
        }
        Ok(conversion)
    }

    async fn write_or_buffer(
        &self,
        image: DynamicImage,
        file_name: &str,
        conversion: &mut FileConversion,
    ) -> AppResult<()> {
        if self.options.combine_into_single_pdf {
            conversion.buffered.push(image);
            return Ok(());
        }
        let encoded = self.encode(&image)?;
        let output_path = self.destination.join(file_name);
        tokio::fs::write(&output_path, encoded).await?;
        tracing::debug!(output = %output_path.to_string_lossy(), "Written");
        conversion.written.push(output_path);
        Ok(())
    }

    fn encode(&self, image: &DynamicImage) -> AppResult<Bytes> {
        match self.options.output_format {
            OutputFormat::Pdf => self
                .converters
                .pdf_converter()?
                .images_to_pdf(&[DynamicImage::ImageRgb8(image.to_rgb8())]),
            format => encode_raster(image, format, self.options.jpeg_quality),
        }
    }
}


#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::test_pdf::FakePdfConverter;
    use super::*;
    use crate::common_types::{CropMode, JpegQuality};
    use crate::cropping::test_operators::ScriptedCropOperator;
    use crate::cropping::SelectorEvent;
    use crate::errors::AppError;
    use image::GenericImageView;

    fn converters() -> FileConverters {
        FileConverters::with_pdf_image_converter(Box::new(FakePdfConverter::default()))
    }

    async fn write_png(path: &Path, width: u32, height: u32) -> AppResult<()> {
        let bytes = encode_raster(
            &DynamicImage::new_rgba8(width, height),
            OutputFormat::Png,
            JpegQuality::default(),
        )?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    #[tokio::test]
    async fn pdf_pages_are_written_one_file_each(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let temp_dir = tempfile::TempDir::with_prefix("dispatcher_tests_pdf_pages")?;
        let source_path = temp_dir.path().join("report.pdf");
        tokio::fs::write(&source_path, FakePdfConverter::pdf_with_pages(3)).await?;
        let options = ConversionOptions::new(OutputFormat::Png);
        let operator = ScriptedCropOperator::default();
        let converters = converters();
        let dispatcher =
            ConversionDispatcher::new(&converters, &operator, &options, temp_dir.path());

        let conversion = dispatcher.convert(&SourceFile::new(source_path)).await?;

        let names: Vec<String> = conversion
            .written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "report_pagina1.png",
                "report_pagina2.png",
                "report_pagina3.png"
            ]
        );
        let third = image::open(temp_dir.path().join("report_pagina3.png"))?;
        assert_eq!(third.to_rgb8().get_pixel(0, 0)[0], 2);
        assert!(conversion.buffered.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn image_is_cropped_per_manual_selection(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let temp_dir = tempfile::TempDir::with_prefix("dispatcher_tests_manual")?;
        let source_path = temp_dir.path().join("photo.v2.png");
        write_png(&source_path, 100, 100).await?;
        let options = ConversionOptions::new(OutputFormat::Jpeg)
            .with_crop_mode(CropMode::Manual)
            .with_jpeg_quality("40".parse()?);
        let operator = ScriptedCropOperator::with_sessions(vec![vec![
            SelectorEvent::PointerDown { x: 10, y: 10 },
            SelectorEvent::PointerUp { x: 60, y: 60 },
            SelectorEvent::Confirm,
        ]]);
        let converters = converters();
        let dispatcher =
            ConversionDispatcher::new(&converters, &operator, &options, temp_dir.path());

        let conversion = dispatcher.convert(&SourceFile::new(source_path)).await?;

        assert_eq!(conversion.written, vec![temp_dir.path().join("photo.jpeg")]);
        let written = image::open(&conversion.written[0])?;
        assert_eq!(written.dimensions(), (50, 50));
        assert!(!written.color().has_alpha());
        Ok(())
    }

    #[tokio::test]
    async fn each_pdf_page_gets_its_own_square_confirmation(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let temp_dir = tempfile::TempDir::with_prefix("dispatcher_tests_square")?;
        let source_path = temp_dir.path().join("deck.pdf");
        tokio::fs::write(&source_path, FakePdfConverter::pdf_with_pages(2)).await?;
        let options = ConversionOptions::new(OutputFormat::Pdf)
            .with_crop_mode(CropMode::AutoSquare)
            .with_combine_into_single_pdf(true)
            .with_combined_pdf_name("all".to_string().into());
        let operator = ScriptedCropOperator::with_square_answers(vec![true, false]);
        let converters = converters();
        let dispatcher =
            ConversionDispatcher::new(&converters, &operator, &options, temp_dir.path());

        let conversion = dispatcher.convert(&SourceFile::new(source_path)).await?;

        assert!(conversion.written.is_empty());
        let pages = conversion.buffered.into_pages();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].dimensions(), (20, 20));
        assert_eq!(pages[1].dimensions(), (30, 20));
        assert_eq!(operator.seen_labels().len(), 2);
        assert!(operator.seen_labels()[1].ends_with("(page 2)"));
        Ok(())
    }

    #[cfg(not(feature = "heif"))]
    #[tokio::test]
    async fn heif_output_needs_heif_support(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let temp_dir = tempfile::TempDir::with_prefix("dispatcher_tests_heif")?;
        let source_path = temp_dir.path().join("a.png");
        write_png(&source_path, 4, 4).await?;
        let options = ConversionOptions::new(OutputFormat::Heif);
        let operator = ScriptedCropOperator::default();
        let converters = converters();
        let dispatcher =
            ConversionDispatcher::new(&converters, &operator, &options, temp_dir.path());

        let result = dispatcher.convert(&SourceFile::new(source_path)).await;
        assert!(matches!(result, Err(AppError::UnsupportedFormat { .. })));
        assert!(!temp_dir.path().join("a.heif").exists());
        Ok(())
    }

    #[cfg(feature = "heif")]
    #[tokio::test]
    async fn heic_photo_converts_both_ways(
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let temp_dir = tempfile::TempDir::with_prefix("dispatcher_tests_heic")?;
        let source_path = temp_dir.path().join("IMG_0001.png");
        write_png(&source_path, 64, 48).await?;
        let operator = ScriptedCropOperator::default();
        let converters = converters();

        let to_heif = ConversionOptions::new(OutputFormat::Heif);
        let dispatcher =
            ConversionDispatcher::new(&converters, &operator, &to_heif, temp_dir.path());
        let conversion = dispatcher.convert(&SourceFile::new(source_path)).await?;
        let heif_path = temp_dir.path().join("IMG_0001.heif");
        assert_eq!(conversion.written, vec![heif_path.clone()]);

        let heic_path = temp_dir.path().join("IMG_0001.heic");
        tokio::fs::rename(&heif_path, &heic_path).await?;
        let to_png = ConversionOptions::new(OutputFormat::Png).with_crop_mode(CropMode::AutoSquare);
        let square_operator = ScriptedCropOperator::with_square_answers(vec![true]);
        let dispatcher =
            ConversionDispatcher::new(&converters, &square_operator, &to_png, temp_dir.path());
        let conversion = dispatcher.convert(&SourceFile::new(heic_path)).await?;
        let written = image::open(&conversion.written[0])?;
        assert_eq!(written.dimensions(), (48, 48));
        Ok(())
    }

    #[tokio::test]
    async fn pdf_without_renderer_fails() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let temp_dir = tempfile::TempDir::with_prefix("dispatcher_tests_no_renderer")?;
        let source_path = temp_dir.path().join("a.pdf");
        tokio::fs::write(&source_path, FakePdfConverter::pdf_with_pages(1)).await?;
        let options = ConversionOptions::new(OutputFormat::Png);
        let operator = ScriptedCropOperator::default();
        let converters = FileConverters::new();
        let dispatcher =
            ConversionDispatcher::new(&converters, &operator, &options, temp_dir.path());

        let result = dispatcher.convert(&SourceFile::new(source_path)).await;
        assert!(matches!(result, Err(AppError::PdfRendererUnavailable)));
        Ok(())
    }
}
