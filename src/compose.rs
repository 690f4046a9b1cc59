use crate::asset::ImageAsset;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Product width as a fraction of the background's short side.
pub const PRODUCT_WIDTH_RATIO: f32 = 0.45;
/// Logo width as a fraction of the background's short side.
pub const LOGO_WIDTH_RATIO: f32 = 0.12;
/// Top-right inset for the logo, in pixels.
pub const LOGO_MARGIN: i64 = 40;

/// Places a product shot and a logo onto a background. Placement is fully
/// determined by the three image sizes; there is no randomness here.
pub struct Compositor;

impl Compositor {
    pub fn new() -> Self {
        Self
    }

    /// Product centered at `0.45 * short_side` width, logo at
    /// `0.12 * short_side` inset 40px from the top-right corner. Both are
    /// resampled with Lanczos3 and pasted through their own alpha, and the
    /// background argument is left untouched.
    pub fn composite(
        &self,
        background: &ImageAsset,
        product: &ImageAsset,
        logo: &ImageAsset,
    ) -> ImageAsset {
        let (bg_w, bg_h) = background.dimensions();
        let short = bg_w.min(bg_h);

        let mut canvas = background.as_rgba().clone();

        let product_width = (short as f32 * PRODUCT_WIDTH_RATIO).round() as u32;
        let product_scaled = scale_to_width(product.as_rgba(), product_width);
        let px = ((bg_w as f32 - product_scaled.width() as f32) / 2.0).round() as i64;
        let py = ((bg_h as f32 - product_scaled.height() as f32) / 2.0).round() as i64;
        paste_over(&mut canvas, &product_scaled, px, py);

        let logo_width = (short as f32 * LOGO_WIDTH_RATIO).round() as u32;
        let logo_scaled = scale_to_width(logo.as_rgba(), logo_width);
        let lx = bg_w as i64 - logo_scaled.width() as i64 - LOGO_MARGIN;
        paste_over(&mut canvas, &logo_scaled, lx, LOGO_MARGIN);

        ImageAsset::new(canvas)
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// Resize to a target width, preserving aspect ratio.
fn scale_to_width(image: &RgbaImage, target_width: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let target_height = ((target_width as f32 * h as f32) / w as f32).round() as u32;
    imageops::resize(image, target_width, target_height, FilterType::Lanczos3)
}

/// Paste `overlay` onto `canvas` at the given offset, blending through the
/// overlay's alpha channel. Offsets may be negative and the overlay may run
/// past the canvas edge; out-of-bounds pixels are skipped.
fn paste_over(canvas: &mut RgbaImage, overlay: &RgbaImage, x_offset: i64, y_offset: i64) {
    let (canvas_w, canvas_h) = canvas.dimensions();
    let (overlay_w, overlay_h) = overlay.dimensions();

    for dy in 0..overlay_h {
        let y = y_offset + dy as i64;
        if y < 0 || y >= canvas_h as i64 {
            continue;
        }

        for dx in 0..overlay_w {
            let x = x_offset + dx as i64;
            if x < 0 || x >= canvas_w as i64 {
                continue;
            }

            let over = overlay.get_pixel(dx, dy);
            if over.0[3] == 0 {
                continue;
            }

            let under = canvas.get_pixel(x as u32, y as u32);
            let blended = blend_pixel(under, over);
            canvas.put_pixel(x as u32, y as u32, blended);
        }
    }
}

fn blend_pixel(under: &Rgba<u8>, over: &Rgba<u8>) -> Rgba<u8> {
    let alpha = over.0[3] as f32 / 255.0;
    let inv_alpha = 1.0 - alpha;

    Rgba([
        (over.0[0] as f32 * alpha + under.0[0] as f32 * inv_alpha).round() as u8,
        (over.0[1] as f32 * alpha + under.0[1] as f32 * inv_alpha).round() as u8,
        (over.0[2] as f32 * alpha + under.0[2] as f32 * inv_alpha).round() as u8,
        (over.0[3] as f32 + under.0[3] as f32 * inv_alpha).round().min(255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid_asset(w: u32, h: u32, rgba: [u8; 4]) -> ImageAsset {
        ImageAsset::new(RgbaImage::from_pixel(w, h, Rgba(rgba)))
    }

    fn span_of_color(canvas: &RgbaImage, y: u32, rgba: [u8; 4]) -> Option<(u32, u32)> {
        let mut min_x = None;
        let mut max_x = None;
        for x in 0..canvas.width() {
            if canvas.get_pixel(x, y) == &Rgba(rgba) {
                if min_x.is_none() {
                    min_x = Some(x);
                }
                max_x = Some(x);
            }
        }
        Some((min_x?, max_x?))
    }

    #[test]
    fn output_matches_background_dimensions() {
        let compositor = Compositor::new();
        let background = solid_asset(300, 200, [0, 0, 200, 255]);
        let product = solid_asset(100, 80, [200, 0, 0, 255]);
        let logo = solid_asset(50, 25, [0, 200, 0, 255]);

        let out = compositor.composite(&background, &product, &logo);
        assert_eq!(out.dimensions(), (300, 200));
    }

    #[test]
    fn product_is_centered_at_45_percent_of_short_side() {
        let compositor = Compositor::new();
        let background = solid_asset(300, 200, [0, 0, 200, 255]);
        let product = solid_asset(100, 80, [200, 0, 0, 255]);
        let logo = solid_asset(50, 25, [0, 200, 0, 255]);

        let out = compositor.composite(&background, &product, &logo);
        let canvas = out.as_rgba();

        // short side 200 -> product width 90, height 72, top-left (105, 64)
        let (min_x, max_x) = span_of_color(canvas, 100, [200, 0, 0, 255]).unwrap();
        let width = max_x - min_x + 1;
        assert!((89..=91).contains(&width), "product width was {}", width);
        assert!((104..=106).contains(&min_x), "product started at {}", min_x);
    }

    #[test]
    fn logo_sits_in_the_top_right_corner() {
        let compositor = Compositor::new();
        let background = solid_asset(300, 200, [0, 0, 200, 255]);
        let product = solid_asset(100, 80, [200, 0, 0, 255]);
        let logo = solid_asset(50, 25, [0, 200, 0, 255]);

        let out = compositor.composite(&background, &product, &logo);
        let canvas = out.as_rgba();

        // short side 200 -> logo width 24, pasted at x = 300 - 24 - 40 = 236
        let (min_x, max_x) = span_of_color(canvas, 42, [0, 200, 0, 255]).unwrap();
        let width = max_x - min_x + 1;
        assert!((23..=25).contains(&width), "logo width was {}", width);
        assert!((235..=237).contains(&min_x), "logo started at {}", min_x);
        assert!(max_x < 300 - LOGO_MARGIN as u32, "logo crossed the margin");
    }

    #[test]
    fn background_argument_is_not_mutated() {
        let compositor = Compositor::new();
        let background = solid_asset(120, 100, [0, 0, 200, 255]);
        let product = solid_asset(40, 40, [200, 0, 0, 255]);
        let logo = solid_asset(20, 20, [0, 200, 0, 255]);

        let out = compositor.composite(&background, &product, &logo);

        assert!(background
            .as_rgba()
            .pixels()
            .all(|p| p == &Rgba([0, 0, 200, 255])));
        assert_ne!(out.as_rgba().get_pixel(60, 50), &Rgba([0, 0, 200, 255]));
    }

    #[test]
    fn transparent_product_pixels_leave_background_visible() {
        let compositor = Compositor::new();
        let background = solid_asset(100, 100, [0, 0, 200, 255]);
        let product = solid_asset(30, 30, [200, 0, 0, 0]);
        let logo = solid_asset(10, 10, [0, 200, 0, 0]);

        let out = compositor.composite(&background, &product, &logo);
        assert!(out.as_rgba().pixels().all(|p| p == &Rgba([0, 0, 200, 255])));
    }

    #[test]
    fn oversized_tall_product_is_clipped_not_fatal() {
        let compositor = Compositor::new();
        let background = solid_asset(100, 100, [0, 0, 200, 255]);
        // aspect-preserved height blows far past the canvas
        let product = solid_asset(10, 1000, [200, 0, 0, 255]);
        let logo = solid_asset(10, 10, [0, 200, 0, 255]);

        let out = compositor.composite(&background, &product, &logo);
        assert_eq!(out.dimensions(), (100, 100));
        // product column still landed in the center, below the logo area
        assert_eq!(out.as_rgba().get_pixel(50, 80), &Rgba([200, 0, 0, 255]));
    }
}
