use crate::errors::AppError;
use crate::AppResult;
use bytes::Bytes;
use image::{DynamicImage, RgbImage, RgbaImage};
use libheif_rs::{Channel, ColorSpace, CompressionFormat, HeifContext, Image, LibHeif, RgbChroma};

fn missing_plane() -> AppError {
    AppError::SystemError {
        message: "HEIF image has no interleaved RGB plane".to_string(),
    }
}

/// Decodes the primary image of a HEIF/HEIC container to 8-bit RGB, or RGBA when it has alpha.
pub fn decode_heif(data: &[u8]) -> AppResult<DynamicImage> {
    let lib_heif = LibHeif::new();
    let context = HeifContext::read_from_bytes(data)?;
    let handle = context.primary_image_handle()?;
    let has_alpha = handle.has_alpha_channel();
    let chroma = if has_alpha {
        RgbChroma::Rgba
    } else {
        RgbChroma::Rgb
    };
    let decoded = lib_heif.decode(&handle, ColorSpace::Rgb(chroma), None)?;
    let planes = decoded.planes();
    let plane = planes.interleaved.ok_or_else(missing_plane)?;

    let channels = if has_alpha { 4 } else { 3 };
    let row_len = plane.width as usize * channels;
    let mut pixels = Vec::with_capacity(row_len * plane.height as usize);
    for row in plane.data.chunks(plane.stride).take(plane.height as usize) {
        pixels.extend_from_slice(&row[..row_len]);
    }

    let image = if has_alpha {
        RgbaImage::from_raw(plane.width, plane.height, pixels).map(DynamicImage::ImageRgba8)
    } else {
        RgbImage::from_raw(plane.width, plane.height, pixels).map(DynamicImage::ImageRgb8)
    };
    image.ok_or_else(missing_plane)
}

/// Encodes an 8-bit RGB or RGBA image as HEVC in a HEIF container.
pub fn encode_heif(image: &DynamicImage) -> AppResult<Bytes> {
    let (width, height) = (image.width(), image.height());
    let (chroma, channels, raw) = if image.color().has_alpha() {
        (RgbChroma::Rgba, 4, image.to_rgba8().into_raw())
    } else {
        (RgbChroma::Rgb, 3, image.to_rgb8().into_raw())
    };

    let mut heif_image = Image::new(width, height, ColorSpace::Rgb(chroma))?;
    heif_image.create_plane(Channel::Interleaved, width, height, 8)?;
    {
        let planes = heif_image.planes_mut();
        let plane = planes.interleaved.ok_or_else(missing_plane)?;
        let stride = plane.stride;
        let data = plane.data;
        let row_len = width as usize * channels;
        for (y, src_row) in raw.chunks(row_len).enumerate() {
            let start = y * stride;
            data[start..start + row_len].copy_from_slice(src_row);
        }
    }

    let lib_heif = LibHeif::new();
    let mut context = HeifContext::new()?;
    let mut encoder = lib_heif.encoder_for_format(CompressionFormat::Hevc)?;
    context.encode_image(&heif_image, &mut encoder, None)?;
    Ok(context.write_to_bytes()?.into())
}
