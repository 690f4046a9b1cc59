//! Batch generation of branded ad creatives: AI backgrounds with a
//! deterministic fallback, product/logo compositing, contrast-aware
//! captions and a zipped creative pack per run.

pub mod archive;
pub mod asset;
pub mod background;
pub mod caption;
pub mod compose;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod palette;
pub mod pipeline;
pub mod prompts;
pub mod services;

pub use archive::package_creatives;
pub use asset::ImageAsset;
pub use background::{Background, BackgroundProvider};
pub use caption::{AnchorPicker, CaptionStyler};
pub use compose::Compositor;
pub use config::{Config, FreepikConfig, OpenAiConfig};
pub use error::{ForgeError, Result};
pub use models::{GenerationRequest, ResolutionTier};
pub use pipeline::{CaptionOutcome, CreativePipeline, RunArtifacts};
pub use services::{
    FreepikImageClient, GenerateCaption, GenerateImage, OpenAiCaptionClient, Services,
};
