use crate::common_types::{CropBox, JpegQuality, OutputFormat};
use crate::cropping::{crop_image, CropOperator, CropSelector, SelectorEvent};
use crate::file_converters::image_codec::encode_raster;
use crate::reporter::AppReporter;
use crate::AppResult;
use console::{Style, Term};
use image::DynamicImage;
use std::io::Write;
use std::str::FromStr;
use tempfile::NamedTempFile;

const MANUAL_CROP_HELP: &str = "Commands:
  rect X0,Y0 X1,Y1   draw a rectangle from one corner to the other
  handle X,Y         drag the resize handle (free corner) to X,Y
  down X,Y | move X,Y | up X,Y   raw pointer events
  show               print the current selection
  ok                 crop to the current selection
  cancel             keep the image as it is (also an empty line)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    Pointer(SelectorEvent),
    Rect { from: (i64, i64), to: (i64, i64) },
    Handle { to: (i64, i64) },
    Show,
    Help,
    Confirm,
    Cancel,
}

impl OperatorCommand {
    /// Expands the command into selector events. `None` when there is no handle to grab.
    pub fn to_events(&self, selector: &CropSelector) -> Option<Vec<SelectorEvent>> {
        match self {
            OperatorCommand::Pointer(event) => Some(vec![*event]),
            OperatorCommand::Rect { from, to } => Some(vec![
                SelectorEvent::PointerDown {
                    x: from.0,
                    y: from.1,
                },
                SelectorEvent::PointerUp { x: to.0, y: to.1 },
            ]),
            OperatorCommand::Handle { to } => {
                selector.selection()?;
                let (hx, hy) = selector.free_corner()?;
                Some(vec![
                    SelectorEvent::PointerDown {
                        x: hx as i64,
                        y: hy as i64,
                    },
                    SelectorEvent::PointerMove { x: to.0, y: to.1 },
                    SelectorEvent::PointerUp { x: to.0, y: to.1 },
                ])
            }
            OperatorCommand::Confirm => Some(vec![SelectorEvent::Confirm]),
            OperatorCommand::Cancel => Some(vec![SelectorEvent::Cancel]),
            OperatorCommand::Show | OperatorCommand::Help => Some(vec![]),
        }
    }
}

fn parse_point(s: &str) -> Result<(i64, i64), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("Expected X,Y but got '{}'", s))?;
    let x = x
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("Invalid X coordinate '{}': {}", x, e))?;
    let y = y
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("Invalid Y coordinate '{}': {}", y, e))?;
    Ok((x, y))
}

impl FromStr for OperatorCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let command = parts.next().unwrap_or("").to_lowercase();
        let args: Vec<&str> = parts.collect();
        let single_point = |args: &[&str]| match args {
            [point] => parse_point(point),
            _ => Err(format!("'{}' expects one X,Y argument", command)),
        };
        match command.as_str() {
            "" | "cancel" | "c" => Ok(OperatorCommand::Cancel),
            "ok" | "y" | "yes" => Ok(OperatorCommand::Confirm),
            "show" => Ok(OperatorCommand::Show),
            "help" | "?" => Ok(OperatorCommand::Help),
            "down" => single_point(&args)
                .map(|(x, y)| OperatorCommand::Pointer(SelectorEvent::PointerDown { x, y })),
            "move" => single_point(&args)
                .map(|(x, y)| OperatorCommand::Pointer(SelectorEvent::PointerMove { x, y })),
            "up" => single_point(&args)
                .map(|(x, y)| OperatorCommand::Pointer(SelectorEvent::PointerUp { x, y })),
            "handle" => single_point(&args).map(|to| OperatorCommand::Handle { to }),
            "rect" => match args.as_slice() {
                [from, to] => Ok(OperatorCommand::Rect {
                    from: parse_point(from)?,
                    to: parse_point(to)?,
                }),
                _ => Err("'rect' expects two X,Y arguments".to_string()),
            },
            unknown => Err(format!("Unknown command: {}", unknown)),
        }
    }
}

/// Writes `image` to a temporary PNG. The file is removed when the handle is dropped.
pub fn write_preview(image: &DynamicImage) -> AppResult<NamedTempFile> {
    let mut preview = tempfile::Builder::new()
        .prefix("quack-preview-")
        .suffix(".png")
        .tempfile()?;
    let encoded = encode_raster(image, OutputFormat::Png, JpegQuality::default())?;
    preview.write_all(&encoded)?;
    preview.flush()?;
    Ok(preview)
}

/// Crop dialogs on the terminal. The progress bar is suspended while a prompt is open.
pub struct TerminalCropOperator<'a> {
    term: &'a Term,
    reporter: &'a AppReporter<'a>,
    assume_yes: bool,
    open_previews: bool,
}

impl<'a> TerminalCropOperator<'a> {
    pub fn new(
        term: &'a Term,
        reporter: &'a AppReporter<'a>,
        assume_yes: bool,
        open_previews: bool,
    ) -> Self {
        Self {
            term,
            reporter,
            assume_yes,
            open_previews,
        }
    }

    /// Saves the image for the operator to look at and opens it in the default viewer.
    fn present(&self, image: &DynamicImage) -> AppResult<NamedTempFile> {
        let preview = write_preview(image)?;
        self.term.write_line(
            format!(
                "Preview: {}",
                Style::new().underlined().apply_to(preview.path().to_string_lossy())
            )
            .as_str(),
        )?;
        if self.open_previews {
            if let Err(err) = open::that(preview.path()) {
                tracing::warn!(error = %err, "Failed to open preview");
            }
        }
        Ok(preview)
    }

    fn describe_selection(&self, selector: &CropSelector) -> String {
        selector
            .selection()
            .map(|crop_box| format!("Selection: {}", crop_box))
            .unwrap_or_else(|| "Selection: none".to_string())
    }

    fn run_session(
        &self,
        image: &DynamicImage,
        image_label: &str,
        selector: &mut CropSelector,
    ) -> AppResult<()> {
        let bold_style = Style::new().bold();
        let (width, height) = selector.image_size();
        self.term.write_line(
            format!(
                "Manual crop for {} ({}x{} px)\n{}",
                bold_style.apply_to(image_label),
                width,
                height,
                MANUAL_CROP_HELP
            )
            .as_str(),
        )?;
        let _preview = self.present(image)?;
        while !selector.is_finished() {
            self.term.write_str("crop> ")?;
            let line = self.term.read_line()?;
            let command = match OperatorCommand::from_str(&line) {
                Ok(command) => command,
                Err(message) => {
                    self.term
                        .write_line(Style::new().red().apply_to(message).to_string().as_str())?;
                    continue;
                }
            };
            match command {
                OperatorCommand::Help => self.term.write_line(MANUAL_CROP_HELP)?,
                OperatorCommand::Show => {
                    self.term.write_line(&self.describe_selection(selector))?
                }
                ref command => match command.to_events(selector) {
                    Some(events) => {
                        for event in events {
                            if let Err(rejected) = selector.apply(event) {
                                self.term.write_line(
                                    format!(
                                        "{}: {}",
                                        Style::new().bold().yellow().apply_to("Warning"),
                                        rejected
                                    )
                                    .as_str(),
                                )?;
                            }
                        }
                        if !selector.is_finished() {
                            self.term.write_line(&self.describe_selection(selector))?;
                        }
                    }
                    None => self
                        .term
                        .write_line("There is no rectangle yet, draw one with 'rect'")?,
                },
            }
        }
        Ok(())
    }
}

impl CropOperator for TerminalCropOperator<'_> {
    fn confirm_square(
        &self,
        image: &DynamicImage,
        image_label: &str,
        proposed: CropBox,
    ) -> AppResult<bool> {
        if self.assume_yes {
            return Ok(true);
        }
        self.reporter.suspend(|| {
            self.term.write_line(
                format!(
                    "Square crop for {} ({}x{} px): {}",
                    Style::new().bold().apply_to(image_label),
                    image.width(),
                    image.height(),
                    proposed
                )
                .as_str(),
            )?;
            let _preview = self.present(&crop_image(image, proposed)?)?;
            loop {
                self.term.write_str("Crop to this square? [y/N]: ")?;
                match self.term.read_line()?.trim().to_lowercase().as_str() {
                    "y" | "yes" => return Ok(true),
                    "" | "n" | "no" => return Ok(false),
                    _ => continue,
                }
            }
        })
    }

    fn select_region(
        &self,
        image: &DynamicImage,
        image_label: &str,
        selector: &mut CropSelector,
    ) -> AppResult<()> {
        self.reporter
            .suspend(|| self.run_session(image, image_label, selector))
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;

    #[test]
    fn parses_pointer_commands() {
        assert_eq!(
            OperatorCommand::from_str("down 10,20"),
            Ok(OperatorCommand::Pointer(SelectorEvent::PointerDown {
                x: 10,
                y: 20
            }))
        );
        assert_eq!(
            OperatorCommand::from_str("MOVE -5,7"),
            Ok(OperatorCommand::Pointer(SelectorEvent::PointerMove { x: -5, y: 7 }))
        );
        // a point must not contain spaces
        assert!(OperatorCommand::from_str("up 5, 7").is_err());
        assert_eq!(
            OperatorCommand::from_str("rect 1,2 30,40"),
            Ok(OperatorCommand::Rect {
                from: (1, 2),
                to: (30, 40)
            })
        );
        assert_eq!(
            OperatorCommand::from_str("handle 50,60"),
            Ok(OperatorCommand::Handle { to: (50, 60) })
        );
    }

    #[test]
    fn empty_line_cancels() {
        assert_eq!(OperatorCommand::from_str(""), Ok(OperatorCommand::Cancel));
        assert_eq!(OperatorCommand::from_str("   "), Ok(OperatorCommand::Cancel));
        assert_eq!(OperatorCommand::from_str("ok"), Ok(OperatorCommand::Confirm));
    }

    #[test]
    fn rejects_malformed_commands() {
        assert!(OperatorCommand::from_str("rect 1,2").is_err());
        assert!(OperatorCommand::from_str("down 1;2").is_err());
        assert!(OperatorCommand::from_str("zoom 2,2").is_err());
    }

    #[test]
    fn preview_is_a_readable_png() -> AppResult<()> {
        let image = DynamicImage::new_rgba8(40, 30);
        let square = crate::cropping::compute_square_box(40, 30);
        let preview = write_preview(&crop_image(&image, square)?)?;
        assert_eq!(
            preview.path().extension().and_then(|ext| ext.to_str()),
            Some("png")
        );
        let decoded = image::open(preview.path())?;
        assert_eq!((decoded.width(), decoded.height()), (30, 30));
        let path = preview.path().to_path_buf();
        drop(preview);
        assert!(!path.exists());
        Ok(())
    }

    #[test]
    fn handle_command_drags_free_corner() {
        let mut selector = CropSelector::new(100, 100);
        assert_eq!(
            OperatorCommand::Handle { to: (70, 70) }.to_events(&selector),
            None
        );
        for event in OperatorCommand::from_str("rect 10,10 40,40")
            .unwrap()
            .to_events(&selector)
            .unwrap()
        {
            selector.apply(event).unwrap();
        }
        let handle_events = (OperatorCommand::Handle { to: (70, 80) })
            .to_events(&selector)
            .unwrap();
        for event in handle_events {
            selector.apply(event).unwrap();
        }
        assert_eq!(selector.selection(), Some(CropBox::new(10, 10, 70, 80)));
    }
}
