pub mod caption_client;
pub mod image_client;
pub mod traits;

use crate::{config::Config, error::Result};
use std::sync::Arc;

pub use caption_client::OpenAiCaptionClient;
pub use image_client::FreepikImageClient;
pub use traits::{GenerateCaption, GenerateImage};

/// The pair of upstream generators a pipeline talks to. Held behind trait
/// objects so runs can be driven by the real services or by test doubles.
#[derive(Clone)]
pub struct Services {
    image: Arc<dyn GenerateImage>,
    caption: Arc<dyn GenerateCaption>,
}

impl Services {
    pub fn from_config(config: &Config) -> Result<Self> {
        let image = FreepikImageClient::new(config.freepik.clone().unwrap_or_default())?;
        let caption = OpenAiCaptionClient::new(config.openai.clone().unwrap_or_default())?;

        Ok(Self {
            image: Arc::new(image),
            caption: Arc::new(caption),
        })
    }

    pub fn new(image: Arc<dyn GenerateImage>, caption: Arc<dyn GenerateCaption>) -> Self {
        Self { image, caption }
    }

    pub fn image(&self) -> &Arc<dyn GenerateImage> {
        &self.image
    }

    pub fn caption(&self) -> &Arc<dyn GenerateCaption> {
        &self.caption
    }
}
