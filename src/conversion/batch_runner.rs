use crate::conversion::{
    BatchResult, CombinePdfBuffer, ConversionDispatcher, ConversionOptions,
};
use crate::cropping::CropOperator;
use crate::errors::AppError;
use crate::file_converters::FileConverters;
use crate::file_tools::SourceFile;
use crate::reporter::AppReporter;
use crate::AppResult;
use console::Style;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchProgress {
    pub completed: usize,
    pub total: usize,
}

impl BatchProgress {
    pub fn percent(&self) -> f64 {
        (self.completed as f64 / self.total as f64) * 100.0
    }
}

pub trait ProgressObserver {
    /// Called once after every file, whether it converted or failed.
    fn on_progress(&self, progress: BatchProgress);
}

impl ProgressObserver for indicatif::ProgressBar {
    fn on_progress(&self, progress: BatchProgress) {
        tracing::trace!(percent = progress.percent(), "Batch progress");
        self.set_position(progress.completed as u64);
    }
}

/// Runs a batch: one file at a time, in selection order.
pub struct BatchRunner<'a> {
    converters: &'a FileConverters,
    operator: &'a dyn CropOperator,
    reporter: &'a AppReporter<'a>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        converters: &'a FileConverters,
        operator: &'a dyn CropOperator,
        reporter: &'a AppReporter<'a>,
    ) -> Self {
        Self {
            converters,
            operator,
            reporter,
        }
    }

    pub fn validate_request(files: &[SourceFile], options: &ConversionOptions) -> AppResult<()> {
        if files.is_empty() {
            return Err(AppError::validation("Select at least one image or PDF to convert"));
        }
        options.validate()
    }

    /// Fails only on invalid input, before touching any file. Per-file and combined PDF
    /// failures end up in the returned `BatchResult`.
    pub async fn run(
        &self,
        files: Vec<SourceFile>,
        options: &ConversionOptions,
        destination: &Path,
        observer: &dyn ProgressObserver,
    ) -> AppResult<BatchResult> {
        Self::validate_request(&files, options)?;

        tokio::fs::create_dir_all(destination).await?;

        let bold_style = Style::new().bold();
        let dispatcher =
            ConversionDispatcher::new(self.converters, self.operator, options, destination);
        let total = files.len();
        let mut batch_result = BatchResult::new(destination.to_path_buf());
        let mut combine_buffer = CombinePdfBuffer::new();

        for (index, source) in files.into_iter().enumerate() {
            tracing::info!(file = %source.display_path(), kind = ?source.kind, "Converting");
            match dispatcher.convert(&source).await {
                Ok(conversion) => {
                    let buffered_pages = conversion.buffered.len();
                    combine_buffer.append(conversion.buffered);
                    batch_result.record_success(source.path, conversion.written, buffered_pages);
                }
                Err(err) => {
                    tracing::warn!(
                        file = %source.display_path(),
                        error = %err,
                        "Conversion failed"
                    );
                    let reported = self.reporter.report(
                        format!(
                            "{} {}: {}",
                            bold_style.clone().red().apply_to("Failed"),
                            bold_style.apply_to(source.display_path()),
                            err
                        )
                        .as_str(),
                    );
                    if let Err(report_err) = reported {
                        tracing::warn!(error = %report_err, "Failed to report conversion failure");
                    }
                    batch_result.record_failure(source.path, err.to_string());
                }
            }
            observer.on_progress(BatchProgress {
                completed: index + 1,
                total,
            });
        }

        if options.combine_into_single_pdf && !combine_buffer.is_empty() {
            if let Some(name) = options.combined_pdf_name.as_ref() {
                let output_path = destination.join(name.file_name());
                let pages = combine_buffer.into_pages();
                tracing::info!(
                    output = %output_path.to_string_lossy(),
                    pages = pages.len(),
                    "Writing combined PDF"
                );
                let write_result = self.write_combined_pdf(&pages, &output_path).await;
                match write_result {
                    Ok(()) => batch_result.combined_pdf = Some(output_path),
                    Err(err) => {
                        tracing::warn!(error = %err, "Combined PDF failed");
                        batch_result.record_combined_pdf_failure(err.to_string());
                    }
                }
            }
        }

        tracing::info!(
            converted = batch_result.success_count(),
            failed = batch_result.error_count(),
            "Batch finished"
        );
        Ok(batch_result)
    }

    async fn write_combined_pdf(
        &self,
        pages: &[image::DynamicImage],
        output_path: &Path,
    ) -> AppResult<()> {
        let pdf_bytes = self.converters.pdf_converter()?.images_to_pdf(pages)?;
        tokio::fs::write(output_path, pdf_bytes).await?;
        Ok(())
    }
}
