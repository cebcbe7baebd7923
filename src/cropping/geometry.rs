use crate::common_types::CropBox;
use crate::errors::AppError;
use crate::AppResult;
use image::DynamicImage;

/// Largest square centered in a `width` x `height` image.
pub fn compute_square_box(width: u32, height: u32) -> CropBox {
    let size = width.min(height);
    let left = (width - size) / 2;
    let top = (height - size) / 2;
    CropBox::new(left, top, left + size, top + size)
}

pub fn crop_image(image: &DynamicImage, crop_box: CropBox) -> AppResult<DynamicImage> {
    if !crop_box.fits_within(image.width(), image.height()) {
        return Err(AppError::SystemError {
            message: format!(
                "Crop box {} is outside of image {}x{}",
                crop_box,
                image.width(),
                image.height()
            ),
        });
    }
    Ok(image.crop_imm(
        crop_box.left,
        crop_box.top,
        crop_box.width(),
        crop_box.height(),
    ))
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb, RgbImage};
    use proptest::prelude::*;

    fn patterned_image(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
        }))
    }

    #[test]
    fn square_box_of_landscape_image() {
        assert_eq!(compute_square_box(300, 200), CropBox::new(50, 0, 250, 200));
    }

    #[test]
    fn square_box_of_portrait_image_floors_offset() {
        assert_eq!(compute_square_box(4, 7), CropBox::new(0, 1, 4, 5));
    }

    #[test]
    fn square_box_of_square_image_is_full_image() {
        assert_eq!(compute_square_box(64, 64), CropBox::full(64, 64));
    }

    #[test]
    fn crop_takes_requested_region() -> AppResult<()> {
        let image = patterned_image(100, 100);
        let cropped = crop_image(&image, CropBox::new(10, 10, 60, 60))?;
        assert_eq!(cropped.dimensions(), (50, 50));
        assert_eq!(cropped.get_pixel(0, 0), image.get_pixel(10, 10));
        assert_eq!(cropped.get_pixel(49, 49), image.get_pixel(59, 59));
        Ok(())
    }

    #[test]
    fn crop_outside_image_is_rejected() {
        let image = patterned_image(20, 20);
        assert!(crop_image(&image, CropBox::new(10, 10, 30, 15)).is_err());
        assert!(crop_image(&image, CropBox::new(5, 5, 5, 10)).is_err());
    }

    proptest! {
        #[test]
        fn prop_square_box_is_maximal_and_inside(width in 1u32..5000u32, height in 1u32..5000u32) {
            let crop_box = compute_square_box(width, height);
            prop_assert!(crop_box.fits_within(width, height));
            prop_assert_eq!(crop_box.width(), crop_box.height());
            prop_assert_eq!(crop_box.width(), width.min(height));
        }

        #[test]
        fn prop_recrop_with_full_box_is_idempotent(
            width in 1u32..48u32,
            height in 1u32..48u32,
            x0 in 0u32..48u32,
            y0 in 0u32..48u32,
            x1 in 0u32..48u32,
            y1 in 0u32..48u32,
        ) {
            let image = patterned_image(width, height);
            let crop_box = CropBox::from_corners(
                x0.min(width),
                y0.min(height),
                x1.min(width),
                y1.min(height),
            );
            prop_assume!(!crop_box.is_empty());
            let once = crop_image(&image, crop_box).unwrap();
            let twice = crop_image(&once, CropBox::full(once.width(), once.height())).unwrap();
            prop_assert_eq!(once.to_rgb8().into_raw(), twice.to_rgb8().into_raw());
            prop_assert_eq!(once.dimensions(), twice.dimensions());
        }
    }
}
