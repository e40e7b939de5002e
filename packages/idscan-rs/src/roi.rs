//! Per-field sub-images cut out of a card photo.
use image::{DynamicImage, GrayImage, Luma};
use idscan_ocr::CardCropper;
use std::collections::HashMap;
use tracing::{debug, warn};

use crate::templates::RoiSet;
use crate::types::FieldKey;

/// Remaps per-pixel brightness linearly so the darkest pixel becomes black
/// and the brightest white. A flat image is returned as plain grayscale.
pub fn contrast_stretch(image: &DynamicImage) -> DynamicImage {
    let rgb = image.to_rgb8();
    let brightness = |x: u32, y: u32| -> u8 {
        let p = rgb.get_pixel(x, y);
        ((u16::from(p[0]) + u16::from(p[1]) + u16::from(p[2])) / 3) as u8
    };

    let (mut min, mut max) = (u8::MAX, u8::MIN);
    for (x, y, _) in rgb.enumerate_pixels() {
        let v = brightness(x, y);
        min = min.min(v);
        max = max.max(v);
    }

    let range = max.saturating_sub(min);
    let stretched = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let v = brightness(x, y);
        if range == 0 {
            return Luma([v]);
        }
        let scaled = (u32::from(v - min) * 255 + u32::from(range) / 2) / u32::from(range);
        Luma([scaled.min(255) as u8])
    });
    DynamicImage::ImageLuma8(stretched)
}

/// Crops and normalizes every requested field that has a region in `rois`.
///
/// Keys without a region are left out of the map. A crop that fails is
/// logged and left out as well; the rest of the fields are still returned.
pub async fn crop_fields_from_card(
    cropper: &dyn CardCropper,
    card: &DynamicImage,
    rois: &RoiSet,
    keys: &[FieldKey],
    padding: f32,
) -> HashMap<FieldKey, DynamicImage> {
    let mut fields = HashMap::new();

    for &key in keys {
        let Some(spec) = rois.get(key) else {
            debug!(field = %key, id_type = %rois.id_type(), "no region defined, skipping");
            continue;
        };

        let rect = spec.rect().padded(padding);
        match cropper.crop(card, &rect).await {
            Ok(sub_image) => {
                fields.insert(key, contrast_stretch(&sub_image));
            }
            Err(e) => warn!(field = %key, error = %e, "field crop failed"),
        }
    }

    fields
}
