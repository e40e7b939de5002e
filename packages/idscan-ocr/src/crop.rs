use async_trait::async_trait;
use image::DynamicImage;
use thiserror::Error;

use crate::region::NormalizedRect;

#[derive(Debug, Error)]
pub enum CropError {
    #[error("card image is empty")]
    EmptyImage,
    #[error("rectangle {0:?} is outside the card bounds")]
    OutOfBounds(NormalizedRect),
}

/// Cuts a sub-image out of a card photo given a card-relative rectangle.
#[async_trait]
pub trait CardCropper: Send + Sync {
    async fn crop(
        &self,
        card: &DynamicImage,
        rect: &NormalizedRect,
    ) -> Result<DynamicImage, CropError>;
}

/// In-process cropper backed by the `image` crate.
#[derive(Debug, Clone)]
pub struct ImageCropper {
    min_size: u32,
}

impl ImageCropper {
    pub fn new() -> Self {
        Self { min_size: 8 }
    }

    /// Smallest width/height (in pixels) a crop is widened to, card size permitting.
    pub fn with_min_size(mut self, min_size: u32) -> Self {
        self.min_size = min_size.max(1);
        self
    }

    pub fn crop_sync(
        &self,
        card: &DynamicImage,
        rect: &NormalizedRect,
    ) -> Result<DynamicImage, CropError> {
        let (card_w, card_h) = (card.width(), card.height());
        if card_w == 0 || card_h == 0 {
            return Err(CropError::EmptyImage);
        }

        let sx = (rect.x.max(0.0) * card_w as f32).floor() as u32;
        let sy = (rect.y.max(0.0) * card_h as f32).floor() as u32;
        if sx >= card_w || sy >= card_h {
            return Err(CropError::OutOfBounds(*rect));
        }

        let sw = ((rect.width * card_w as f32).round() as u32)
            .max(self.min_size)
            .min(card_w - sx);
        let sh = ((rect.height * card_h as f32).round() as u32)
            .max(self.min_size)
            .min(card_h - sy);
        if sw == 0 || sh == 0 {
            return Err(CropError::OutOfBounds(*rect));
        }

        Ok(card.crop_imm(sx, sy, sw, sh))
    }
}

impl Default for ImageCropper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CardCropper for ImageCropper {
    async fn crop(
        &self,
        card: &DynamicImage,
        rect: &NormalizedRect,
    ) -> Result<DynamicImage, CropError> {
        self.crop_sync(card, rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn card(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::new(w, h))
    }

    #[test]
    fn crops_relative_rectangle() {
        let cropper = ImageCropper::new();
        let out = cropper
            .crop_sync(&card(200, 100), &NormalizedRect::new(0.5, 0.5, 0.25, 0.2))
            .unwrap();
        assert_eq!((out.width(), out.height()), (50, 20));
    }

    #[test]
    fn widens_tiny_crops_to_min_size() {
        let cropper = ImageCropper::new();
        let out = cropper
            .crop_sync(&card(200, 100), &NormalizedRect::new(0.1, 0.1, 0.01, 0.01))
            .unwrap();
        assert_eq!((out.width(), out.height()), (8, 8));
    }

    #[test]
    fn clamps_to_card_edge() {
        let cropper = ImageCropper::new();
        let out = cropper
            .crop_sync(&card(100, 100), &NormalizedRect::new(0.9, 0.9, 0.5, 0.5))
            .unwrap();
        assert_eq!((out.width(), out.height()), (10, 10));
    }

    #[test]
    fn rejects_empty_card() {
        let cropper = ImageCropper::new();
        let err = cropper
            .crop_sync(&card(0, 0), &NormalizedRect::new(0.0, 0.0, 0.5, 0.5))
            .unwrap_err();
        assert!(matches!(err, CropError::EmptyImage));
    }
}
