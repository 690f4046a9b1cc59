use crate::asset::ImageAsset;
use crate::error::{ForgeError, Result};
use crate::palette;
use image::{Rgba, RgbaImage};
use rand::Rng;
use rusttype::{point, Font, Scale};
use std::path::Path;

/// The one typeface the styler renders with. Checked at construction so a
/// missing font fails the run before any network call, not at variant five.
pub const REQUIRED_FONT: &str = "Inter-SemiBold-Italic-600.otf";

/// Caption anchors as fractions of (width, height): bottom-left,
/// bottom-right, top-left, top-right, center-left, mid-bottom.
pub const ANCHOR_FRACTIONS: [(f32, f32); 6] = [
    (0.08, 0.80),
    (0.55, 0.80),
    (0.08, 0.10),
    (0.55, 0.10),
    (0.20, 0.45),
    (0.20, 0.65),
];

const FONT_SIZE_RATIO: f32 = 0.035;
const SHADOW_COLOR: Rgba<u8> = Rgba([0, 0, 0, 120]);
const SHADOW_OFFSETS: [(i32, i32); 5] = [(1, 1), (-1, -1), (1, -1), (-1, 1), (2, 2)];

/// Picks an anchor index given the number of anchors. Swappable so tests
/// can pin placement while production stays uniformly random.
pub type AnchorPicker = Box<dyn Fn(usize) -> usize + Send + Sync>;

/// Burns a caption into an image: contrast-aware ink color, one of six
/// proportional anchors, soft shadow under the text.
pub struct CaptionStyler {
    font: Font<'static>,
    pick_anchor: AnchorPicker,
}

impl CaptionStyler {
    /// Load the required typeface from the configured fonts directory.
    pub fn from_fonts_dir(fonts_dir: &Path) -> Result<Self> {
        if !fonts_dir.is_dir() {
            return Err(ForgeError::Config(format!(
                "Fonts directory not found: {}",
                fonts_dir.display()
            )));
        }

        let font_path = fonts_dir.join(REQUIRED_FONT);
        if !font_path.is_file() {
            return Err(ForgeError::Config(format!(
                "Required font missing: {}",
                font_path.display()
            )));
        }

        Self::from_font_bytes(std::fs::read(&font_path)?)
    }

    pub fn from_font_bytes(bytes: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| ForgeError::Config("Failed to parse caption font".into()))?;

        Ok(Self {
            font,
            pick_anchor: random_picker(),
        })
    }

    pub fn with_anchor_picker(mut self, picker: AnchorPicker) -> Self {
        self.pick_anchor = picker;
        self
    }

    /// Returns a new image with the caption drawn on; the input is left
    /// untouched. Never fails: an unreadable dominant color just means
    /// light ink.
    pub fn apply_caption(&self, image: &ImageAsset, caption: &str) -> ImageAsset {
        let mut canvas = image.as_rgba().clone();
        let (width, height) = canvas.dimensions();

        let color = palette::caption_color_for(&canvas);

        let index = (self.pick_anchor)(ANCHOR_FRACTIONS.len()) % ANCHOR_FRACTIONS.len();
        let (fx, fy) = ANCHOR_FRACTIONS[index];
        let x = (width as f32 * fx) as i32;
        let y = (height as f32 * fy) as i32;

        let size = (height as f32 * FONT_SIZE_RATIO).round();
        let scale = Scale::uniform(size);

        for (ox, oy) in SHADOW_OFFSETS {
            draw_text(&mut canvas, caption, &self.font, scale, x + ox, y + oy, SHADOW_COLOR);
        }
        draw_text(&mut canvas, caption, &self.font, scale, x, y, color);

        ImageAsset::new(canvas)
    }
}

fn random_picker() -> AnchorPicker {
    Box::new(|len| rand::rng().random_range(0..len))
}

fn draw_text(
    canvas: &mut RgbaImage,
    text: &str,
    font: &Font,
    scale: Scale,
    x: i32,
    y: i32,
    color: Rgba<u8>,
) {
    let v_metrics = font.v_metrics(scale);
    let glyphs: Vec<_> = font
        .layout(text, scale, point(0.0, v_metrics.ascent))
        .collect();

    for glyph in glyphs {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, gv| {
                let px = x + gx as i32 + bb.min.x;
                let py = y + gy as i32 + bb.min.y;

                if px < 0 || py < 0 || px >= canvas.width() as i32 || py >= canvas.height() as i32 {
                    return;
                }

                let alpha = (gv * color[3] as f32).round() as u8;
                let overlay = Rgba([color[0], color[1], color[2], alpha]);
                let pixel = canvas.get_pixel_mut(px as u32, py as u32);
                blend_coverage(pixel, &overlay);
            });
        }
    }
}

fn blend_coverage(base: &mut Rgba<u8>, overlay: &Rgba<u8>) {
    let alpha = overlay[3] as f32 / 255.0;
    if alpha <= 0.0 {
        return;
    }

    let inv_alpha = 1.0 - alpha;
    for idx in 0..3 {
        base[idx] = (overlay[idx] as f32 * alpha + base[idx] as f32 * inv_alpha)
            .round()
            .clamp(0.0, 255.0) as u8;
    }
    base[3] = 255;
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_FONT: &[u8] = include_bytes!("../tests/assets/DejaVuSans.ttf");

    fn styler_with_anchor(index: usize) -> CaptionStyler {
        CaptionStyler::from_font_bytes(TEST_FONT.to_vec())
            .unwrap()
            .with_anchor_picker(Box::new(move |_| index))
    }

    fn solid_asset(w: u32, h: u32, rgba: [u8; 4]) -> ImageAsset {
        ImageAsset::new(RgbaImage::from_pixel(w, h, Rgba(rgba)))
    }

    fn changed_pixels(before: &ImageAsset, after: &ImageAsset) -> Vec<(u32, u32)> {
        let (a, b) = (before.as_rgba(), after.as_rgba());
        let mut out = Vec::new();
        for y in 0..a.height() {
            for x in 0..a.width() {
                if a.get_pixel(x, y) != b.get_pixel(x, y) {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn missing_fonts_dir_is_a_config_error() {
        let result = CaptionStyler::from_fonts_dir(Path::new("/nonexistent/fonts"));
        assert!(matches!(result, Err(ForgeError::Config(_))));
    }

    #[test]
    fn missing_font_file_is_a_config_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = CaptionStyler::from_fonts_dir(tmp.path());
        assert!(matches!(result, Err(ForgeError::Config(_))));
    }

    #[test]
    fn unparseable_font_is_a_config_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join(REQUIRED_FONT), b"definitely not a font").unwrap();
        let result = CaptionStyler::from_fonts_dir(tmp.path());
        assert!(matches!(result, Err(ForgeError::Config(_))));
    }

    #[test]
    fn valid_fonts_dir_loads() {
        let tmp = tempfile::TempDir::new().unwrap();
        std::fs::write(tmp.path().join(REQUIRED_FONT), TEST_FONT).unwrap();
        assert!(CaptionStyler::from_fonts_dir(tmp.path()).is_ok());
    }

    #[test]
    fn forced_anchor_keeps_text_in_its_corner() {
        let styler = styler_with_anchor(0); // bottom-left: (0.08w, 0.80h)
        let input = solid_asset(800, 600, [20, 20, 20, 255]);

        let output = styler.apply_caption(&input, "Sale");
        let changed = changed_pixels(&input, &output);

        assert!(!changed.is_empty(), "caption drew nothing");
        for (x, y) in &changed {
            assert!(*y >= 440, "pixel ({}, {}) outside the bottom band", x, y);
            assert!(*x < 400, "pixel ({}, {}) outside the left half", x, y);
        }
    }

    #[test]
    fn each_anchor_lands_in_a_distinct_region() {
        let input = solid_asset(800, 600, [20, 20, 20, 255]);

        let top = styler_with_anchor(2).apply_caption(&input, "Sale");
        let bottom = styler_with_anchor(0).apply_caption(&input, "Sale");

        let top_changed = changed_pixels(&input, &top);
        let bottom_changed = changed_pixels(&input, &bottom);
        assert!(top_changed.iter().all(|(_, y)| *y < 300));
        assert!(bottom_changed.iter().all(|(_, y)| *y >= 300));
    }

    #[test]
    fn bright_image_gets_dark_ink() {
        let styler = styler_with_anchor(0);
        let input = solid_asset(800, 600, [235, 235, 235, 255]);

        let output = styler.apply_caption(&input, "Discover more");
        let darkest = output
            .as_rgba()
            .pixels()
            .map(|p| p.0[0])
            .min()
            .unwrap();
        assert!(darkest < 50, "expected dark ink, darkest channel {}", darkest);
    }

    #[test]
    fn dark_image_gets_light_ink() {
        let styler = styler_with_anchor(0);
        let input = solid_asset(800, 600, [20, 20, 20, 255]);

        let output = styler.apply_caption(&input, "Discover more");
        let brightest = output
            .as_rgba()
            .pixels()
            .map(|p| p.0[0])
            .max()
            .unwrap();
        assert!(brightest > 200, "expected light ink, brightest channel {}", brightest);
    }

    #[test]
    fn input_image_is_not_mutated() {
        let styler = styler_with_anchor(0);
        let input = solid_asset(400, 300, [20, 20, 20, 255]);

        let _ = styler.apply_caption(&input, "Sale");
        assert!(input.as_rgba().pixels().all(|p| p == &Rgba([20, 20, 20, 255])));
    }

    #[test]
    fn empty_caption_is_a_no_op_on_pixels() {
        let styler = styler_with_anchor(0);
        let input = solid_asset(400, 300, [20, 20, 20, 255]);

        let output = styler.apply_caption(&input, "");
        assert!(changed_pixels(&input, &output).is_empty());
    }
}
