use serde::{Deserialize, Serialize};

pub const MIN_VARIANTS: u32 = 1;
pub const MAX_VARIANTS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTier {
    #[default]
    Standard,
    Hd,
}

impl ResolutionTier {
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResolutionTier::Standard => (1024, 1024),
            ResolutionTier::Hd => (2048, 2048),
        }
    }
}

/// One batch request. Immutable once a run starts; every variant of the run
/// reads the same brand, tone and tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub brand_name: String,
    pub tone: String,
    pub count: u32,
    #[serde(default)]
    pub tier: ResolutionTier,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "english".to_string()
}

impl GenerationRequest {
    pub fn new(brand_name: impl Into<String>, tone: impl Into<String>, count: u32) -> Self {
        Self {
            brand_name: brand_name.into(),
            tone: tone.into(),
            count,
            tier: ResolutionTier::default(),
            language: default_language(),
        }
    }

    pub fn with_tier(mut self, tier: ResolutionTier) -> Self {
        self.tier = tier;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Requested count bounded to `[1, 10]`. Out-of-range values are
    /// adjusted silently rather than rejected.
    pub fn clamped_count(&self) -> u32 {
        self.count.clamp(MIN_VARIANTS, MAX_VARIANTS)
    }
}
