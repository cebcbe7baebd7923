use clap::Parser;
use console::{Style, Term};

use std::error::Error;

mod args;
use crate::commands::*;
use crate::errors::AppError;
use args::*;

mod reporter;

mod errors;

mod commands;

mod file_tools;

mod file_converters;

mod cropping;

mod conversion;

pub type AppResult<T> = Result<T, AppError>;

mod common_types;

pub fn config_env_var(name: &str) -> Result<String, String> {
    std::env::var(name).map_err(|e| format!("{}: {}", name, e))
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let term = Term::stdout();
    let bold_style = Style::new().bold();

    term.write_line(
        format!(
            "{} v{}",
            bold_style.clone().green().apply_to("Quack Converter"),
            bold_style.apply_to(env!("CARGO_PKG_VERSION"))
        )
        .as_str(),
    )?;

    let cli = CliArgs::parse();
    if let Err(err) = handle_args(cli, &term).await {
        term.write_line(
            format!(
                "{}: {}\nDetails: {:?}",
                bold_style.clone().red().apply_to("Error"),
                err,
                err.source()
            )
            .as_str(),
        )?;
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_args(cli: CliArgs, term: &Term) -> AppResult<()> {
    match cli.command {
        CliCommand::Convert {
            sources,
            destination,
            output_format,
            jpeg_quality,
            crop_mode,
            single_pdf,
            pdf_name,
            pdf_render_dpi,
            filename_filter,
            assume_yes,
            no_preview,
            open_destination,
        } => {
            let options = ConvertCommandOptions::new(
                filename_filter,
                output_format,
                jpeg_quality,
                crop_mode,
                single_pdf,
                pdf_name,
                pdf_render_dpi,
                assume_yes,
                !no_preview,
                open_destination,
            );
            let batch_result = command_convert(term, &sources, &destination, options).await?;
            tracing::info!(summary = %batch_result.summary(), "Conversion finished");
        }
        CliCommand::Ls {
            sources,
            filename_filter,
        } => {
            let options = LsCommandOptions::new(filename_filter);
            command_ls(term, &sources, options).await?;
        }
    }

    Ok(())
}
