use crate::asset::ImageAsset;
use crate::error::Result;
use async_trait::async_trait;

/// Text-to-image generation. Implementations return a decoded asset at the
/// requested dimensions or an error; substitution policy lives with the
/// caller, not here.
#[async_trait]
pub trait GenerateImage: Send + Sync {
    async fn generate(&self, prompt: &str, width: u32, height: u32) -> Result<ImageAsset>;
}

/// Short-form copy generation. One prompt in, one non-empty caption out.
#[async_trait]
pub trait GenerateCaption: Send + Sync {
    async fn caption(&self, prompt: &str) -> Result<String>;
}
