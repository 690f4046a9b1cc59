use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Caption ink for bright backgrounds.
pub const DARK_TEXT: Rgba<u8> = Rgba([15, 15, 15, 255]);
/// Caption ink for dark backgrounds, and the fallback when the dominant
/// color cannot be read at all.
pub const LIGHT_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);

const BRIGHTNESS_THRESHOLD: f32 = 130.0;
const SAMPLE_EDGE: u32 = 100;
const BUCKET_BITS: u32 = 4;

/// Perceived brightness of an RGB triple, ITU-R 601 luma weights.
pub fn perceived_brightness(r: u8, g: u8, b: u8) -> f32 {
    (r as f32 * 299.0 + g as f32 * 587.0 + b as f32 * 114.0) / 1000.0
}

/// Estimate the dominant color of an image.
///
/// Works on a downsampled copy (at most 100px per side), drops
/// near-transparent and near-white pixels, then buckets the rest into a
/// 16-level-per-channel histogram and averages the winning bucket. Returns
/// `None` when nothing survives the filters, e.g. a fully transparent or
/// pure white canvas.
pub fn dominant_color(image: &RgbaImage) -> Option<(u8, u8, u8)> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return None;
    }

    let sampled;
    let source = if w > SAMPLE_EDGE || h > SAMPLE_EDGE {
        sampled = imageops::resize(image, w.min(SAMPLE_EDGE), h.min(SAMPLE_EDGE), FilterType::Triangle);
        &sampled
    } else {
        image
    };

    // bucket -> (count, sum_r, sum_g, sum_b); BTreeMap keeps tie-breaking
    // deterministic
    let mut histogram: std::collections::BTreeMap<u32, (u64, u64, u64, u64)> =
        std::collections::BTreeMap::new();

    for Rgba([r, g, b, a]) in source.pixels().copied() {
        if a < 125 {
            continue;
        }
        if r > 250 && g > 250 && b > 250 {
            continue;
        }
        let key = ((r as u32 >> BUCKET_BITS) << 8)
            | ((g as u32 >> BUCKET_BITS) << 4)
            | (b as u32 >> BUCKET_BITS);
        let entry = histogram.entry(key).or_insert((0, 0, 0, 0));
        entry.0 += 1;
        entry.1 += r as u64;
        entry.2 += g as u64;
        entry.3 += b as u64;
    }

    let (count, sum_r, sum_g, sum_b) = histogram.values().copied().max_by_key(|&(count, ..)| count)?;

    Some((
        (sum_r / count) as u8,
        (sum_g / count) as u8,
        (sum_b / count) as u8,
    ))
}

/// Pick a caption color that stays readable against the image: dark ink on
/// bright backgrounds, light ink otherwise. Failure to read a dominant
/// color is never an error; light ink is the safe default.
pub fn caption_color_for(image: &RgbaImage) -> Rgba<u8> {
    match dominant_color(image) {
        Some((r, g, b)) => {
            if perceived_brightness(r, g, b) > BRIGHTNESS_THRESHOLD {
                DARK_TEXT
            } else {
                LIGHT_TEXT
            }
        }
        None => LIGHT_TEXT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba(rgba))
    }

    #[test]
    fn brightness_matches_luma_weights() {
        assert_eq!(perceived_brightness(255, 255, 255), 255.0);
        assert_eq!(perceived_brightness(0, 0, 0), 0.0);
        assert_eq!(perceived_brightness(130, 130, 130), 130.0);
    }

    #[test]
    fn solid_color_is_its_own_dominant() {
        let img = solid(50, 50, [200, 30, 30, 255]);
        assert_eq!(dominant_color(&img), Some((200, 30, 30)));
    }

    #[test]
    fn majority_color_wins() {
        let mut img = solid(40, 40, [10, 10, 80, 255]);
        for x in 0..10 {
            for y in 0..10 {
                img.put_pixel(x, y, Rgba([240, 10, 10, 255]));
            }
        }
        let (r, g, b) = dominant_color(&img).unwrap();
        assert!(b > r, "expected the blue majority, got ({}, {}, {})", r, g, b);
    }

    #[test]
    fn transparent_and_white_pixels_are_ignored() {
        assert_eq!(dominant_color(&solid(20, 20, [0, 0, 0, 0])), None);
        assert_eq!(dominant_color(&solid(20, 20, [255, 255, 255, 255])), None);
    }

    #[test]
    fn bright_background_gets_dark_text() {
        // the fallback background gray
        let img = solid(64, 64, [235, 235, 235, 255]);
        assert_eq!(caption_color_for(&img), DARK_TEXT);
    }

    #[test]
    fn dark_background_gets_light_text() {
        let img = solid(64, 64, [20, 20, 20, 255]);
        assert_eq!(caption_color_for(&img), LIGHT_TEXT);
    }

    #[test]
    fn threshold_boundary_is_exclusive() {
        // brightness exactly 130 is not "bright"
        let img = solid(32, 32, [130, 130, 130, 255]);
        assert_eq!(caption_color_for(&img), LIGHT_TEXT);
    }

    #[test]
    fn unreadable_dominant_defaults_to_light_text() {
        let img = solid(32, 32, [0, 0, 0, 0]);
        assert_eq!(caption_color_for(&img), LIGHT_TEXT);
    }
}
