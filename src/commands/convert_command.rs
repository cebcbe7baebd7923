use crate::common_types::{CombinedPdfName, CropMode, JpegQuality, OutputFormat};
use crate::conversion::{BatchResult, BatchRunner, ConversionOptions};
use crate::cropping::TerminalCropOperator;
use crate::file_converters::FileConverters;
use crate::file_tools::{collect_source_files, FileMatcher, SourceFileKind};
use crate::reporter::AppReporter;
use crate::AppResult;
use console::{Style, Term};
use indicatif::*;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ConvertCommandOptions {
    pub file_matcher: FileMatcher,
    pub conversion: ConversionOptions,
    pub assume_yes: bool,
    pub open_previews: bool,
    pub open_destination: bool,
}

impl ConvertCommandOptions {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        filename_filter: Option<globset::Glob>,
        output_format: OutputFormat,
        jpeg_quality: JpegQuality,
        crop_mode: CropMode,
        single_pdf: bool,
        pdf_name: Option<String>,
        pdf_render_dpi: u16,
        assume_yes: bool,
        open_previews: bool,
        open_destination: bool,
    ) -> Self {
        // a single PDF is always a PDF, whatever format was requested
        let output_format = if single_pdf {
            OutputFormat::Pdf
        } else {
            output_format
        };
        let conversion = ConversionOptions::new(output_format)
            .with_jpeg_quality(jpeg_quality)
            .with_crop_mode(crop_mode)
            .with_combine_into_single_pdf(single_pdf)
            .opt_combined_pdf_name(pdf_name.map(CombinedPdfName::from))
            .with_pdf_render_dpi(pdf_render_dpi);
        ConvertCommandOptions {
            file_matcher: FileMatcher::from_filter(filename_filter.as_ref()),
            conversion,
            assume_yes,
            open_previews,
            open_destination,
        }
    }
}

pub async fn command_convert(
    term: &Term,
    sources: &[PathBuf],
    destination: &Path,
    options: ConvertCommandOptions,
) -> AppResult<BatchResult> {
    let bold_style = Style::new().bold();
    let term_reporter = AppReporter::from(term);

    options.conversion.validate()?;
    let source_files = collect_source_files(sources, &options.file_matcher, &term_reporter).await?;
    let files = source_files.files;
    BatchRunner::validate_request(&files, &options.conversion)?;
    term.write_line(
        format!(
            "Converting {} files into {}.\nOutput: {}.",
            bold_style.clone().white().apply_to(files.len()),
            bold_style
                .clone()
                .yellow()
                .apply_to(destination.to_string_lossy()),
            bold_style.clone().green().apply_to(&options.conversion)
        )
        .as_str(),
    )?;

    let mut converters = FileConverters::new();
    if files.iter().any(|f| f.kind == SourceFileKind::Pdf)
        || options.conversion.output_format == OutputFormat::Pdf
        || options.conversion.combine_into_single_pdf
    {
        converters.init(&term_reporter)?;
    }

    let bar = ProgressBar::new(files.len() as u64);
    bar.set_style(
        ProgressStyle::with_template(concat!(
            "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] ",
            "{pos}/{len} files ({percent}%)"
        ))?
        .progress_chars("◉>◯"),
    );
    bar.enable_steady_tick(Duration::from_millis(100));
    let app_reporter = AppReporter::from(&bar);
    let operator = TerminalCropOperator::new(
        term,
        &app_reporter,
        options.assume_yes,
        options.open_previews,
    );

    let runner = BatchRunner::new(&converters, &operator, &app_reporter);
    let batch_result = runner
        .run(files, &options.conversion, destination, &bar)
        .await;
    bar.finish_and_clear();
    let batch_result = batch_result?;

    tracing::debug!(
        written = batch_result.written_files().len(),
        "Conversion outputs written"
    );
    report_summary(term, &batch_result)?;

    if options.open_destination && !batch_result.has_errors() {
        if let Err(err) = open::that(destination) {
            tracing::warn!(error = %err, "Failed to open destination directory");
        }
    }

    Ok(batch_result)
}

fn report_summary(term: &Term, batch_result: &BatchResult) -> AppResult<()> {
    let bold_style = Style::new().bold();
    let dimmed_style = Style::new().dim();
    for outcome in &batch_result.outcomes {
        let line = if outcome.is_converted() {
            dimmed_style.apply_to(format!("- {}", outcome))
        } else {
            Style::new().red().apply_to(format!("- {}", outcome))
        };
        term.write_line(line.to_string().as_str())?;
    }
    if let Some(combined_pdf) = &batch_result.combined_pdf {
        term.write_line(
            format!(
                "Combined PDF: {}",
                bold_style.apply_to(combined_pdf.to_string_lossy())
            )
            .as_str(),
        )?;
    }
    if batch_result.has_errors() {
        term.write_line(
            format!(
                "{}. {}",
                bold_style.clone().yellow().apply_to("Some conversions failed"),
                batch_result.summary()
            )
            .as_str(),
        )?;
    } else {
        term.write_line(
            format!(
                "{} {} files converted and saved in {}",
                bold_style.clone().green().apply_to("Success!"),
                bold_style.apply_to(batch_result.total_files()),
                bold_style.apply_to(batch_result.destination.to_string_lossy())
            )
            .as_str(),
        )?;
    }
    Ok(())
}
