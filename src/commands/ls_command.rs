use crate::file_tools::{collect_source_files, FileMatcher, SourceFilesResult};
use crate::AppResult;
use console::{pad_str, Alignment, Style, Term};
use indicatif::{HumanBytes, TermLike};
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct LsCommandOptions {
    pub file_matcher: FileMatcher,
}

impl LsCommandOptions {
    pub fn new(filename_filter: Option<globset::Glob>) -> Self {
        LsCommandOptions {
            file_matcher: FileMatcher::from_filter(filename_filter.as_ref()),
        }
    }
}

pub async fn command_ls(
    term: &Term,
    sources: &[PathBuf],
    options: LsCommandOptions,
) -> AppResult<SourceFilesResult> {
    let bold_style = Style::new().bold();
    let highlighted = bold_style.clone().white();
    let dimmed_style = Style::new().dim();
    term.write_line(
        format!(
            "Listing files in {}.",
            bold_style.apply_to(
                sources
                    .iter()
                    .map(|source| source.to_string_lossy())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        )
        .as_str(),
    )?;
    let app_reporter = crate::reporter::AppReporter::from(term);
    let list_files_result =
        collect_source_files(sources, &options.file_matcher, &app_reporter).await?;
    let total_size: u64 = list_files_result
        .files
        .iter()
        .map(|f| f.file_size.unwrap_or(0))
        .sum();

    if !list_files_result.files.is_empty() {
        let max_filename_width = std::cmp::min(
            list_files_result
                .files
                .iter()
                .map(|f| f.display_path().len())
                .max()
                .unwrap_or(25)
                + 5,
            (term.width() * 2 / 3) as usize,
        );
        term.write_line(
            format!(
                "\n  {} {} {} {}",
                dimmed_style.apply_to(pad_str(
                    "Filename",
                    max_filename_width,
                    Alignment::Left,
                    None
                )),
                dimmed_style.apply_to(pad_str("Kind", 8, Alignment::Left, None)),
                dimmed_style.apply_to(pad_str("Media Type", 24, Alignment::Left, None)),
                dimmed_style.apply_to(pad_str("Size", 16, Alignment::Left, None))
            )
            .as_str(),
        )?;

        for file in &list_files_result.files {
            term.write_line(
                format!(
                    "- {} {} {} {}",
                    highlighted.apply_to(pad_str(
                        file.display_path().as_str(),
                        max_filename_width,
                        Alignment::Left,
                        Some("...")
                    )),
                    pad_str(
                        format!("{:?}", file.kind).as_str(),
                        8,
                        Alignment::Left,
                        None
                    ),
                    pad_str(
                        file.media_type
                            .as_ref()
                            .map(|mime| mime.to_string())
                            .unwrap_or("".to_string())
                            .as_str(),
                        24,
                        Alignment::Left,
                        None
                    ),
                    highlighted.apply_to(pad_str(
                        format!("{}", HumanBytes(file.file_size.unwrap_or(0))).as_str(),
                        16,
                        Alignment::Left,
                        None
                    ))
                )
                .as_str(),
            )?;
        }
        term.write_line("")?;
    }
    term.write_line(
        format!(
            "{} files found. Total size: {}",
            highlighted.apply_to(list_files_result.files.len()),
            highlighted.apply_to(HumanBytes(total_size))
        )
        .as_str(),
    )?;
    term.write_line(
        format!(
            "{} files skipped/filtered out.",
            dimmed_style.apply_to(list_files_result.skipped.to_string())
        )
        .as_str(),
    )?;
    Ok(list_files_result)
}
