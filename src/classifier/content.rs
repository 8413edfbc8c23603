use image::{imageops::FilterType, RgbaImage};
use serde::Serialize;
use tracing::debug;

// Every image is stretched onto a fixed square before counting, so one
// classification always costs SAMPLE_SIZE^2 pixel tests.
const SAMPLE_SIZE: u32 = 150;
const SKIN_RATIO_MAX: f64 = 0.35;
const GREEN_RATIO_MIN: f64 = 0.05;

const REASON_UNREADABLE: &str = "Could not read the image file.";
const REASON_HUMAN: &str =
    "Human or person detected in the image. Please upload a crop or plant leaf photo only.";
const REASON_NOT_PLANT: &str = "The image doesn't appear to contain sufficient crop or plant content. Please upload a clear photo of a crop leaf or plant.";

/// Outcome of the image content check.
///
/// `reason` is empty when the image is accepted and a user-facing
/// explanation otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub valid: bool,
    pub reason: String,
}

impl Verdict {
    fn accepted() -> Self {
        Self {
            valid: true,
            reason: String::new(),
        }
    }

    fn rejected(reason: &str) -> Self {
        Self {
            valid: false,
            reason: reason.to_string(),
        }
    }
}

/// Decide from pixel content alone whether `bytes` plausibly shows a crop
/// or plant photo.
///
/// A failed decode is folded into a rejection verdict; this function never
/// errors.
pub fn classify_image_content(bytes: &[u8]) -> Verdict {
    let decoded = match image::load_from_memory(bytes) {
        Ok(img) => img,
        Err(err) => {
            debug!("image decode failed: {err}");
            return Verdict::rejected(REASON_UNREADABLE);
        }
    };

    let sample = image::imageops::resize(
        &decoded.to_rgba8(),
        SAMPLE_SIZE,
        SAMPLE_SIZE,
        FilterType::Triangle,
    );

    let (skin_ratio, green_ratio) = pixel_ratios(&sample);
    debug!(skin_ratio, green_ratio, "image content ratios");
    verdict_from_ratios(skin_ratio, green_ratio)
}

fn pixel_ratios(sample: &RgbaImage) -> (f64, f64) {
    let mut skin_pixels = 0u32;
    let mut green_pixels = 0u32;

    for pixel in sample.pixels() {
        let [r, g, b, _] = pixel.0;
        if is_skin_tone(r, g, b) {
            skin_pixels += 1;
        }
        if is_strict_green(r, g, b) {
            green_pixels += 1;
        }
    }

    let total = (sample.width() * sample.height()) as f64;
    (skin_pixels as f64 / total, green_pixels as f64 / total)
}

// Warm red-dominant pixels across light to dark skin tones; grey,
// blown-out and strongly blue pixels stay out.
fn is_skin_tone(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    r > 60
        && g > 30
        && b > 10
        && r > g
        && r > b
        && (r - g) > 10
        && r < 250
        && (r - g).abs() < 100
        && b < 180
}

// Green has to clearly beat both other channels, which keeps desaturated
// background foliage from counting.
fn is_strict_green(r: u8, g: u8, b: u8) -> bool {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    g > r + 25 && g > b + 20 && g > 70 && g < 240
}

fn verdict_from_ratios(skin_ratio: f64, green_ratio: f64) -> Verdict {
    // The high skin bar tolerates brown soil and necrotic tissue; the low
    // green floor admits fruit and mostly-brown diseased material.
    if skin_ratio > SKIN_RATIO_MAX {
        return Verdict::rejected(REASON_HUMAN);
    }
    if green_ratio < GREEN_RATIO_MIN {
        return Verdict::rejected(REASON_NOT_PLANT);
    }
    Verdict::accepted()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Cursor;

    const SKIN: Rgba<u8> = Rgba([200, 120, 90, 255]);
    const LEAF_GREEN: Rgba<u8> = Rgba([40, 180, 60, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn png_bytes(img: &RgbaImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)
            .expect("png encode");
        buf.into_inner()
    }

    fn solid(color: Rgba<u8>) -> RgbaImage {
        RgbaImage::from_pixel(SAMPLE_SIZE, SAMPLE_SIZE, color)
    }

    /// Square sample with the first `n` pixels set to `color`, rest black.
    fn partial(color: Rgba<u8>, n: u32) -> RgbaImage {
        let mut img = solid(BLACK);
        for (i, pixel) in img.pixels_mut().enumerate() {
            if (i as u32) < n {
                *pixel = color;
            }
        }
        img
    }

    #[test]
    fn skin_predicate() {
        assert!(is_skin_tone(200, 120, 90));
        assert!(is_skin_tone(110, 70, 50)); // darker tone
        assert!(!is_skin_tone(200, 120, 200)); // too blue
        assert!(!is_skin_tone(128, 128, 128)); // grey, red does not dominate
        assert!(!is_skin_tone(255, 160, 120)); // blown out
    }

    #[test]
    fn green_predicate() {
        assert!(is_strict_green(40, 180, 60));
        assert!(!is_strict_green(100, 120, 110)); // desaturated background green
        assert!(!is_strict_green(30, 60, 20)); // too dark
        assert!(!is_strict_green(200, 250, 100)); // overexposed
    }

    #[test]
    fn skin_and_green_counts_are_exact() {
        let total = SAMPLE_SIZE * SAMPLE_SIZE;
        let img = partial(SKIN, total * 35 / 100);
        let (skin, green) = pixel_ratios(&img);
        assert!((skin - 0.35).abs() < 1e-9);
        assert_eq!(green, 0.0);
    }

    #[test]
    fn skin_gate_is_strictly_greater() {
        // exactly at the threshold the skin gate stays closed and the
        // verdict falls through to the green floor
        let at = verdict_from_ratios(0.35, 0.0);
        assert!(!at.valid);
        assert_eq!(at.reason, REASON_NOT_PLANT);

        let above = verdict_from_ratios(0.351, 0.5);
        assert_eq!(above.reason, REASON_HUMAN);

        let below = verdict_from_ratios(0.349, 0.10);
        assert!(below.valid);
    }

    #[test]
    fn green_floor_is_strictly_less() {
        let under = verdict_from_ratios(0.0, 0.049);
        assert_eq!(under.reason, REASON_NOT_PLANT);

        let at = verdict_from_ratios(0.0, 0.05);
        assert!(at.valid);
        assert!(at.reason.is_empty());
    }

    #[test]
    fn solid_green_photo_is_accepted() {
        let verdict = classify_image_content(&png_bytes(&solid(LEAF_GREEN)));
        assert!(verdict.valid, "reason: {}", verdict.reason);
    }

    #[test]
    fn solid_skin_photo_is_rejected_as_human() {
        let verdict = classify_image_content(&png_bytes(&solid(SKIN)));
        assert!(!verdict.valid);
        assert_eq!(verdict.reason, REASON_HUMAN);
    }

    #[test]
    fn grey_photo_is_rejected_for_missing_plant_content() {
        let verdict = classify_image_content(&png_bytes(&solid(Rgba([128, 128, 128, 255]))));
        assert!(!verdict.valid);
        assert_eq!(verdict.reason, REASON_NOT_PLANT);
    }

    #[test]
    fn non_square_input_is_stretched_not_cropped() {
        // a wide all-green image stays all green after the stretch
        let img = RgbaImage::from_pixel(600, 100, LEAF_GREEN);
        let verdict = classify_image_content(&png_bytes(&img));
        assert!(verdict.valid);
    }

    #[test]
    fn undecodable_bytes_yield_a_rejection_not_an_error() {
        let verdict = classify_image_content(b"definitely not an image");
        assert!(!verdict.valid);
        assert_eq!(verdict.reason, REASON_UNREADABLE);

        let empty = classify_image_content(&[]);
        assert!(!empty.valid);
        assert!(!empty.reason.is_empty());
    }

    #[test]
    fn classification_is_deterministic() {
        let bytes = png_bytes(&solid(LEAF_GREEN));
        assert_eq!(classify_image_content(&bytes), classify_image_content(&bytes));
    }
}
