use crate::archive::package_creatives;
use crate::asset::ImageAsset;
use crate::background::BackgroundProvider;
use crate::caption::{AnchorPicker, CaptionStyler};
use crate::compose::Compositor;
use crate::config::Config;
use crate::error::{ForgeError, Result};
use crate::logger::{self, Timer};
use crate::models::GenerationRequest;
use crate::prompts;
use crate::services::{GenerateCaption, Services};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

const RUN_ID_LEN: usize = 10;
const SCRATCH_PREFIX: &str = "adforge_";

/// How the caption text for one variant was obtained.
#[derive(Debug)]
pub enum CaptionOutcome {
    Generated(String),
    Fallback { text: String, reason: String },
}

impl CaptionOutcome {
    pub fn text(&self) -> &str {
        match self {
            CaptionOutcome::Generated(text) => text,
            CaptionOutcome::Fallback { text, .. } => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, CaptionOutcome::Fallback { .. })
    }
}

/// What a finished run leaves on disk. The scratch directory is never
/// cleaned up by the pipeline itself; the archive has to outlive the run
/// so the caller can hand it out.
#[derive(Debug)]
pub struct RunArtifacts {
    pub run_id: String,
    pub archive_path: PathBuf,
    pub creatives: Vec<PathBuf>,
    pub fallback_backgrounds: u32,
    pub fallback_captions: u32,
}

/// End-to-end creative run: background → composite → caption → persist →
/// package. Construction validates credentials and loads the caption font
/// once, so a misconfigured environment fails before any variant work.
pub struct CreativePipeline {
    provider: BackgroundProvider,
    captioner: Arc<dyn GenerateCaption>,
    compositor: Compositor,
    styler: CaptionStyler,
    output_root: PathBuf,
}

impl CreativePipeline {
    pub fn new(config: &Config, services: Services) -> Result<Self> {
        config.validate()?;
        let styler = CaptionStyler::from_fonts_dir(&config.fonts_dir())?;

        Ok(Self {
            provider: BackgroundProvider::new(services.image().clone()),
            captioner: services.caption().clone(),
            compositor: Compositor::new(),
            styler,
            output_root: config.output_root(),
        })
    }

    /// Replace the anchor picker, e.g. to pin caption placement in tests.
    pub fn with_anchor_picker(mut self, picker: AnchorPicker) -> Self {
        self.styler = self.styler.with_anchor_picker(picker);
        self
    }

    /// Produce the full creative pack for one request. Unreadable inputs
    /// fail fast; upstream generation failures are absorbed per variant as
    /// fallback backgrounds and captions, so a reachable filesystem is the
    /// only thing that can stop a run once it starts.
    pub async fn run(
        &self,
        request: &GenerationRequest,
        product_path: &Path,
        logo_path: &Path,
    ) -> Result<RunArtifacts> {
        let product = ImageAsset::from_path(product_path).map_err(|e| {
            ForgeError::InvalidInput(format!("Product must be a readable PNG or JPG image: {}", e))
        })?;
        let logo = ImageAsset::from_path(logo_path).map_err(|e| {
            ForgeError::InvalidInput(format!("Logo must be a readable PNG or JPG image: {}", e))
        })?;

        let run_id = new_run_id();
        let scratch = RunScratch::create(&self.output_root, &run_id)?;
        scratch.stage_input(product_path, "product")?;
        scratch.stage_input(logo_path, "logo")?;

        let count = request.clamped_count();
        let (width, height) = request.tier.dimensions();
        logger::log_run_banner(&run_id, &request.brand_name, count, width, height);
        // Logs the total duration when it drops at the end of the run.
        let _timer = Timer::new(&format!("creative run {}", run_id));

        let background_prompt = prompts::background_prompt(&request.brand_name, &request.tone);
        let caption_prompt =
            prompts::caption_prompt(&request.brand_name, &request.tone, &request.language);

        let mut creatives = Vec::with_capacity(count as usize);
        let mut fallback_backgrounds = 0;
        let mut fallback_captions = 0;

        for index in 1..=count {
            let background = self.provider.obtain(&background_prompt, request.tier).await;
            if background.is_fallback() {
                fallback_backgrounds += 1;
            }

            let composite = self
                .compositor
                .composite(background.image(), &product, &logo);

            let caption = self.caption_for(&caption_prompt, &request.brand_name).await;
            if caption.is_fallback() {
                fallback_captions += 1;
            }

            let styled = self.styler.apply_caption(&composite, caption.text());

            let out_path = scratch.output_dir().join(format!("creative_{:02}.png", index));
            styled.save_png(&out_path)?;
            log::info!("Variant {:02}/{:02} saved: {}", index, count, out_path.display());
            creatives.push(out_path);
        }

        let archive_path = scratch
            .base()
            .join(format!("creative_pack_{}.zip", run_id));
        let archive_path = package_creatives(scratch.output_dir(), &archive_path, true)?;

        Ok(RunArtifacts {
            run_id,
            archive_path,
            creatives,
            fallback_backgrounds,
            fallback_captions,
        })
    }

    async fn caption_for(&self, prompt: &str, brand: &str) -> CaptionOutcome {
        match self.captioner.caption(prompt).await {
            Ok(text) => CaptionOutcome::Generated(text),
            Err(e) => {
                log::warn!("Caption generation failed, using fallback: {}", e);
                CaptionOutcome::Fallback {
                    text: prompts::fallback_caption(brand),
                    reason: e.to_string(),
                }
            }
        }
    }
}

fn new_run_id() -> String {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..RUN_ID_LEN].to_string()
}

/// Per-run scratch layout: `<root>/adforge_<run_id>/{input,output}`.
/// Inputs are copied in so a run folder is self-contained for debugging.
struct RunScratch {
    base: PathBuf,
    input: PathBuf,
    output: PathBuf,
}

impl RunScratch {
    fn create(root: &Path, run_id: &str) -> Result<Self> {
        let base = root.join(format!("{}{}", SCRATCH_PREFIX, run_id));
        let input = base.join("input");
        let output = base.join("output");
        std::fs::create_dir_all(&input)?;
        std::fs::create_dir_all(&output)?;
        Ok(Self {
            base,
            input,
            output,
        })
    }

    fn stage_input(&self, source: &Path, stem: &str) -> Result<PathBuf> {
        let name = match source.extension().and_then(|e| e.to_str()) {
            Some(ext) => format!("{}.{}", stem, ext),
            None => stem.to_string(),
        };
        let dest = self.input.join(name);
        std::fs::copy(source, &dest)?;
        Ok(dest)
    }

    fn base(&self) -> &Path {
        &self.base
    }

    fn output_dir(&self) -> &Path {
        &self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_are_short_lowercase_hex() {
        let id = new_run_id();
        assert_eq!(id.len(), RUN_ID_LEN);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(id, id.to_lowercase());
        assert_ne!(id, new_run_id());
    }

    #[test]
    fn scratch_creates_input_and_output_dirs() {
        let tmp = tempfile::TempDir::new().unwrap();
        let scratch = RunScratch::create(tmp.path(), "abc123def0").unwrap();

        assert_eq!(scratch.base(), tmp.path().join("adforge_abc123def0"));
        assert!(scratch.input.is_dir());
        assert!(scratch.output_dir().is_dir());
    }

    #[test]
    fn staged_inputs_keep_their_extension() {
        let tmp = tempfile::TempDir::new().unwrap();
        let source = tmp.path().join("photo.JPG");
        std::fs::write(&source, b"bytes").unwrap();

        let scratch = RunScratch::create(tmp.path(), "abc123def0").unwrap();
        let staged = scratch.stage_input(&source, "product").unwrap();

        assert_eq!(staged.file_name().unwrap(), "product.JPG");
        assert!(staged.is_file());
        assert!(source.is_file());
    }

    #[test]
    fn caption_outcome_exposes_text_and_branch() {
        let generated = CaptionOutcome::Generated("Crafted for you".into());
        assert_eq!(generated.text(), "Crafted for you");
        assert!(!generated.is_fallback());

        let fallback = CaptionOutcome::Fallback {
            text: "Discover Acme today.".into(),
            reason: "timeout".into(),
        };
        assert_eq!(fallback.text(), "Discover Acme today.");
        assert!(fallback.is_fallback());
    }
}
