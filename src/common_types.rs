use clap::ValueEnum;
use rvstruct::ValueStruct;
use std::fmt::Display;
use std::str::FromStr;

#[derive(Debug, Clone, ValueStruct)]
pub struct CombinedPdfName(String);

impl CombinedPdfName {
    pub fn is_blank(&self) -> bool {
        self.value().trim().is_empty()
    }

    pub fn file_name(&self) -> String {
        format!("{}.pdf", self.value().trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueStruct)]
pub struct JpegQuality(u8);

impl JpegQuality {
    pub const MIN: u8 = 10;
    pub const MAX: u8 = 100;
}

impl Default for JpegQuality {
    fn default() -> Self {
        JpegQuality(90)
    }
}

impl FromStr for JpegQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let quality = s
            .trim()
            .parse::<u8>()
            .map_err(|e| format!("Failed to parse JPEG quality: {}", e))?;
        if !(Self::MIN..=Self::MAX).contains(&quality) {
            return Err(format!(
                "JPEG quality must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                quality
            ));
        }
        Ok(JpegQuality(quality))
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Jpeg,
    Jpg,
    Bmp,
    Gif,
    Pdf,
    Heif,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Jpg => "jpg",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Gif => "gif",
            OutputFormat::Pdf => "pdf",
            OutputFormat::Heif => "heif",
        }
    }

    pub fn is_jpeg(&self) -> bool {
        matches!(self, OutputFormat::Jpeg | OutputFormat::Jpg)
    }
}

impl Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CropMode {
    #[default]
    None,
    #[value(name = "auto")]
    AutoSquare,
    Manual,
}

impl Display for CropMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CropMode::None => write!(f, "none"),
            CropMode::AutoSquare => write!(f, "auto square"),
            CropMode::Manual => write!(f, "manual"),
        }
    }
}

/// Axis-aligned rectangle in source pixels. `right` and `bottom` are exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropBox {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CropBox {
    pub fn new(left: u32, top: u32, right: u32, bottom: u32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Builds a box from two arbitrary corners, ordering the coordinates.
    pub fn from_corners(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            left: x0.min(x1),
            top: y0.min(y1),
            right: x0.max(x1),
            bottom: y0.max(y1),
        }
    }

    #[cfg(test)]
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn width(&self) -> u32 {
        self.right.saturating_sub(self.left)
    }

    pub fn height(&self) -> u32 {
        self.bottom.saturating_sub(self.top)
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        !self.is_empty() && self.right <= width && self.bottom <= height
    }
}

impl Display for CropBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}) {}x{}",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}
