use crate::common_types::{CropBox, CropMode};
use crate::cropping::{compute_square_box, crop_image, CropSelector, CropSelectorState};
use crate::AppResult;
use image::DynamicImage;

/// The human side of cropping. Both calls block until the operator decides.
pub trait CropOperator {
    /// Shows the proposed square and returns whether it was accepted.
    fn confirm_square(
        &self,
        image: &DynamicImage,
        image_label: &str,
        proposed: CropBox,
    ) -> AppResult<bool>;

    /// Drives `selector` until it is confirmed or cancelled.
    fn select_region(
        &self,
        image: &DynamicImage,
        image_label: &str,
        selector: &mut CropSelector,
    ) -> AppResult<()>;
}

/// Applies `crop_mode` to one image or page. Declined or cancelled crops return the image
/// unchanged.
pub fn apply_crop_mode(
    image: DynamicImage,
    crop_mode: CropMode,
    operator: &dyn CropOperator,
    image_label: &str,
) -> AppResult<DynamicImage> {
    match crop_mode {
        CropMode::None => Ok(image),
        CropMode::AutoSquare => {
            let square = compute_square_box(image.width(), image.height());
            if operator.confirm_square(&image, image_label, square)? {
                tracing::debug!(image = image_label, %square, "Square crop accepted");
                crop_image(&image, square)
            } else {
                tracing::debug!(image = image_label, "Square crop declined");
                Ok(image)
            }
        }
        CropMode::Manual => {
            let mut selector = CropSelector::new(image.width(), image.height());
            operator.select_region(&image, image_label, &mut selector)?;
            match selector.state() {
                CropSelectorState::Confirmed(crop_box) => {
                    tracing::debug!(image = image_label, %crop_box, "Manual crop confirmed");
                    crop_image(&image, crop_box)
                }
                _ => {
                    tracing::debug!(image = image_label, "Manual crop cancelled");
                    Ok(image)
                }
            }
        }
    }
}

#[cfg(test)]
pub mod test_operators {
    use super::*;
    use crate::cropping::SelectorEvent;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays prepared answers: one bool per square preview, one event script per manual session.
    #[derive(Default)]
    pub struct ScriptedCropOperator {
        square_answers: Mutex<VecDeque<bool>>,
        sessions: Mutex<VecDeque<Vec<SelectorEvent>>>,
        pub labels: Mutex<Vec<String>>,
    }

    impl ScriptedCropOperator {
        pub fn with_square_answers(answers: Vec<bool>) -> Self {
            Self {
                square_answers: Mutex::new(answers.into()),
                ..Default::default()
            }
        }

        pub fn with_sessions(sessions: Vec<Vec<SelectorEvent>>) -> Self {
            Self {
                sessions: Mutex::new(sessions.into()),
                ..Default::default()
            }
        }

        pub fn seen_labels(&self) -> Vec<String> {
            self.labels.lock().unwrap().clone()
        }
    }

    impl CropOperator for ScriptedCropOperator {
        fn confirm_square(
            &self,
            _image: &DynamicImage,
            image_label: &str,
            _proposed: CropBox,
        ) -> AppResult<bool> {
            self.labels.lock().unwrap().push(image_label.to_string());
            Ok(self.square_answers.lock().unwrap().pop_front().unwrap_or(false))
        }

        fn select_region(
            &self,
            _image: &DynamicImage,
            image_label: &str,
            selector: &mut CropSelector,
        ) -> AppResult<()> {
            self.labels.lock().unwrap().push(image_label.to_string());
            let events = self.sessions.lock().unwrap().pop_front().unwrap_or_default();
            for event in events {
                // rejected confirmations keep the session open, like a warning dialog would
                let _ = selector.apply(event);
                if selector.is_finished() {
                    break;
                }
            }
            if !selector.is_finished() {
                selector.cancel();
            }
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::test_operators::ScriptedCropOperator;
    use super::*;
    use crate::cropping::SelectorEvent;
    use image::GenericImageView;

    fn image_100() -> DynamicImage {
        DynamicImage::new_rgb8(100, 100)
    }

    #[test]
    fn manual_cancel_returns_unmodified_image() -> AppResult<()> {
        let operator = ScriptedCropOperator::with_sessions(vec![vec![
            SelectorEvent::PointerDown { x: 10, y: 10 },
            SelectorEvent::PointerUp { x: 60, y: 60 },
            SelectorEvent::Cancel,
        ]]);
        let result = apply_crop_mode(image_100(), CropMode::Manual, &operator, "a.png")?;
        assert_eq!(result.dimensions(), (100, 100));
        Ok(())
    }

    #[test]
    fn manual_confirm_crops_to_box() -> AppResult<()> {
        let operator = ScriptedCropOperator::with_sessions(vec![vec![
            SelectorEvent::PointerDown { x: 10, y: 10 },
            SelectorEvent::PointerMove { x: 40, y: 40 },
            SelectorEvent::PointerUp { x: 60, y: 60 },
            SelectorEvent::Confirm,
        ]]);
        let result = apply_crop_mode(image_100(), CropMode::Manual, &operator, "a.png")?;
        assert_eq!(result.dimensions(), (50, 50));
        Ok(())
    }

    #[test]
    fn early_confirm_is_ignored_until_selection_exists() -> AppResult<()> {
        let operator = ScriptedCropOperator::with_sessions(vec![vec![
            SelectorEvent::Confirm,
            SelectorEvent::PointerDown { x: 0, y: 0 },
            SelectorEvent::PointerUp { x: 30, y: 20 },
            SelectorEvent::Confirm,
        ]]);
        let result = apply_crop_mode(image_100(), CropMode::Manual, &operator, "a.png")?;
        assert_eq!(result.dimensions(), (30, 20));
        Ok(())
    }

    #[test]
    fn square_preview_must_be_accepted() -> AppResult<()> {
        let operator = ScriptedCropOperator::with_square_answers(vec![true, false]);
        let landscape = DynamicImage::new_rgb8(120, 80);
        let accepted = apply_crop_mode(landscape.clone(), CropMode::AutoSquare, &operator, "1")?;
        let declined = apply_crop_mode(landscape, CropMode::AutoSquare, &operator, "2")?;
        assert_eq!(accepted.dimensions(), (80, 80));
        assert_eq!(declined.dimensions(), (120, 80));
        assert_eq!(operator.seen_labels(), vec!["1", "2"]);
        Ok(())
    }

    #[test]
    fn no_crop_never_asks_operator() -> AppResult<()> {
        let operator = ScriptedCropOperator::default();
        let result = apply_crop_mode(image_100(), CropMode::None, &operator, "a.png")?;
        assert_eq!(result.dimensions(), (100, 100));
        assert!(operator.seen_labels().is_empty());
        Ok(())
    }
}
