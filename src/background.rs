use crate::asset::ImageAsset;
use crate::models::ResolutionTier;
use crate::services::GenerateImage;
use image::{Rgba, RgbaImage};
use std::sync::Arc;

const BASE_COAT: Rgba<u8> = Rgba([225, 225, 225, 255]);
const WASH_COAT: Rgba<u8> = Rgba([235, 235, 235, 255]);

/// Outcome of a background request. The fallback branch stays visible so
/// callers and tests can tell a generated scene from the substitute canvas;
/// downstream compositing treats both identically.
pub enum Background {
    Generated(ImageAsset),
    Fallback { image: ImageAsset, reason: String },
}

impl Background {
    pub fn image(&self) -> &ImageAsset {
        match self {
            Background::Generated(image) => image,
            Background::Fallback { image, .. } => image,
        }
    }

    pub fn into_image(self) -> ImageAsset {
        match self {
            Background::Generated(image) => image,
            Background::Fallback { image, .. } => image,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Background::Fallback { .. })
    }

    pub fn fallback_reason(&self) -> Option<&str> {
        match self {
            Background::Generated(_) => None,
            Background::Fallback { reason, .. } => Some(reason),
        }
    }
}

/// Obtains backgrounds from a generation service, substituting a neutral
/// studio-gray canvas when the service misbehaves in any way.
pub struct BackgroundProvider {
    generator: Arc<dyn GenerateImage>,
}

impl BackgroundProvider {
    pub fn new(generator: Arc<dyn GenerateImage>) -> Self {
        Self { generator }
    }

    /// Never fails outward: network errors, timeouts, malformed payloads
    /// and unrecognized response shapes all collapse into the fallback
    /// branch, logged with the triggering reason.
    pub async fn obtain(&self, prompt: &str, tier: ResolutionTier) -> Background {
        let (width, height) = tier.dimensions();

        match self.generator.generate(prompt, width, height).await {
            Ok(image) => Background::Generated(image),
            Err(e) => {
                let reason = e.to_string();
                log::warn!("Background generation failed, using fallback: {}", reason);
                Background::Fallback {
                    image: fallback_canvas(width, height),
                    reason,
                }
            }
        }
    }
}

/// Flat light-gray canvas at the exact target size: a base coat with a
/// full-canvas wash one shade lighter over it, so it reads as a studio
/// backdrop rather than an error indicator.
pub fn fallback_canvas(width: u32, height: u32) -> ImageAsset {
    let mut canvas = RgbaImage::from_pixel(width, height, BASE_COAT);
    for pixel in canvas.pixels_mut() {
        *pixel = WASH_COAT;
    }
    ImageAsset::new(canvas)
}
