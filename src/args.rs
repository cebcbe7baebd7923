use crate::common_types::{CropMode, JpegQuality, OutputFormat};
use crate::file_converters::pdf::PDF_POINTS_PER_INCH;
use clap::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, about)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    #[command(about = "Convert images and PDF pages into the selected format")]
    Convert {
        #[arg(
            required = true,
            help = "Source files or directories such as /tmp/scan.pdf or /tmp/photos"
        )]
        sources: Vec<PathBuf>,
        #[arg(short = 'd', long, help = "Destination directory for the converted files")]
        destination: PathBuf,
        #[arg(
            short = 't',
            long = "format",
            value_enum,
            default_value_t = OutputFormat::Png,
            help = "Output format"
        )]
        output_format: OutputFormat,
        #[arg(
            short = 'q',
            long = "quality",
            default_value = "90",
            help = "JPEG quality from 10 to 100"
        )]
        jpeg_quality: JpegQuality,
        #[arg(
            short = 'c',
            long = "crop",
            value_enum,
            default_value_t = CropMode::None,
            help = "Crop mode applied to every image and PDF page"
        )]
        crop_mode: CropMode,
        #[arg(
            long,
            help = "Merge every converted image and page into one PDF",
            default_value = "false"
        )]
        single_pdf: bool,
        #[arg(long, help = "File name of the merged PDF, without extension")]
        pdf_name: Option<String>,
        #[arg(
            long = "dpi",
            default_value_t = PDF_POINTS_PER_INCH,
            help = "Resolution used to render PDF pages"
        )]
        pdf_render_dpi: u16,
        #[arg(
            short = 'f',
            long,
            help = "Filter files found in directories by name using glob patterns such as *.png"
        )]
        filename_filter: Option<globset::Glob>,
        #[arg(
            short = 'y',
            long,
            help = "Accept the proposed square crops without asking",
            default_value = "false"
        )]
        assume_yes: bool,
        #[arg(
            long,
            help = "Only print the path of crop previews instead of opening them in a viewer",
            default_value = "false"
        )]
        no_preview: bool,
        #[arg(
            long,
            help = "Open the destination directory when every file was converted",
            default_value = "false"
        )]
        open_destination: bool,
    },
    #[command(about = "List files that would be converted")]
    Ls {
        #[arg(required = true, help = "Source files or directories")]
        sources: Vec<PathBuf>,
        #[arg(
            short = 'f',
            long,
            help = "Filter files found in directories by name using glob patterns such as *.png"
        )]
        filename_filter: Option<globset::Glob>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_convert_defaults() {
        let cli = CliArgs::try_parse_from(["quack", "convert", "a.png", "-d", "/tmp/out"]).unwrap();
        match cli.command {
            CliCommand::Convert {
                sources,
                output_format,
                jpeg_quality,
                crop_mode,
                single_pdf,
                pdf_render_dpi,
                ..
            } => {
                assert_eq!(sources, vec![PathBuf::from("a.png")]);
                assert_eq!(output_format, OutputFormat::Png);
                assert_eq!(jpeg_quality, JpegQuality::default());
                assert_eq!(crop_mode, CropMode::None);
                assert!(!single_pdf);
                assert_eq!(pdf_render_dpi, 72);
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn rejects_quality_out_of_range() {
        assert!(CliArgs::try_parse_from([
            "quack", "convert", "a.png", "-d", "/tmp", "--format", "jpeg", "--quality", "5"
        ])
        .is_err());
        assert!(CliArgs::try_parse_from([
            "quack", "convert", "a.png", "-d", "/tmp", "--crop", "auto", "--quality", "100"
        ])
        .is_ok());
    }
}
