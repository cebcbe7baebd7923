use crate::common_types::{JpegQuality, OutputFormat};
use crate::errors::AppError;
use crate::AppResult;
use bytes::Bytes;
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader};
use rvstruct::ValueStruct;
use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

const HEIF_BRANDS: [&[u8; 4]; 8] = [
    b"heic", b"heix", b"hevc", b"hevx", b"heim", b"heis", b"mif1", b"msf1",
];

/// HEIF containers start with an `ftyp` box naming a HEIF brand.
pub fn is_heif(data: &[u8], path: &Path) -> bool {
    let has_heif_brand = data.len() >= 12
        && &data[4..8] == b"ftyp"
        && HEIF_BRANDS.iter().any(|brand| &data[8..12] == *brand);
    has_heif_brand
        || path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("heic") || ext.eq_ignore_ascii_case("heif"))
            .unwrap_or(false)
}

/// Decodes an image, sniffing the format from the content and falling back to the extension.
pub fn decode_image(data: &[u8], path: &Path) -> AppResult<DynamicImage> {
    if is_heif(data, path) {
        return decode_heif(data);
    }
    let mut reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
    if reader.format().is_none() {
        if let Ok(format) = ImageFormat::from_path(path) {
            reader.set_format(format);
        }
    }
    Ok(reader.decode()?)
}

#[cfg(feature = "heif")]
fn decode_heif(data: &[u8]) -> AppResult<DynamicImage> {
    crate::file_converters::heif_codec::decode_heif(data)
}

#[cfg(not(feature = "heif"))]
fn decode_heif(_data: &[u8]) -> AppResult<DynamicImage> {
    Err(AppError::UnsupportedFormat {
        format: OutputFormat::Heif.to_string(),
    })
}

/// Narrows the color type to one the target encoder accepts. Alpha survives where the
/// format has it.
fn encodable_for(image: &DynamicImage, format: OutputFormat) -> Cow<'_, DynamicImage> {
    let color = image.color();
    let supported = match format {
        OutputFormat::Png => !matches!(color, ColorType::Rgb32F | ColorType::Rgba32F),
        OutputFormat::Bmp => matches!(
            color,
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8
        ),
        OutputFormat::Gif | OutputFormat::Heif => {
            matches!(color, ColorType::Rgb8 | ColorType::Rgba8)
        }
        OutputFormat::Jpeg | OutputFormat::Jpg | OutputFormat::Pdf => color == ColorType::Rgb8,
    };
    if supported {
        return Cow::Borrowed(image);
    }
    match (format, color.has_alpha()) {
        (OutputFormat::Png, true) => Cow::Owned(DynamicImage::ImageRgba16(image.to_rgba16())),
        (OutputFormat::Png, false) => Cow::Owned(DynamicImage::ImageRgb16(image.to_rgb16())),
        (OutputFormat::Jpeg | OutputFormat::Jpg | OutputFormat::Pdf, _) | (_, false) => {
            Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8()))
        }
        (_, true) => Cow::Owned(DynamicImage::ImageRgba8(image.to_rgba8())),
    }
}

/// Encodes a raster image. JPEG output is always RGB; other formats keep the source color
/// type when their encoder supports it.
pub fn encode_raster(
    image: &DynamicImage,
    format: OutputFormat,
    jpeg_quality: JpegQuality,
) -> AppResult<Bytes> {
    let image = encodable_for(image, format);
    let mut output = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg | OutputFormat::Jpg => {
            let rgb_image = image.to_rgb8();
            JpegEncoder::new_with_quality(&mut output, *jpeg_quality.value())
                .encode_image(&rgb_image)?;
        }
        OutputFormat::Png => image.write_to(&mut output, ImageFormat::Png)?,
        OutputFormat::Bmp => image.write_to(&mut output, ImageFormat::Bmp)?,
        OutputFormat::Gif => image.write_to(&mut output, ImageFormat::Gif)?,
        OutputFormat::Heif => return encode_heif(&image),
        OutputFormat::Pdf => {
            return Err(AppError::UnsupportedFormat {
                format: format.to_string(),
            })
        }
    }
    Ok(output.into_inner().into())
}

#[cfg(feature = "heif")]
fn encode_heif(image: &DynamicImage) -> AppResult<Bytes> {
    crate::file_converters::heif_codec::encode_heif(image)
}

#[cfg(not(feature = "heif"))]
fn encode_heif(_image: &DynamicImage) -> AppResult<Bytes> {
    Err(AppError::UnsupportedFormat {
        format: OutputFormat::Heif.to_string(),
    })
}
