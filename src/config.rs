use crate::error::{ForgeError, Result};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct FreepikConfig {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
}

/// Top-level configuration for a pipeline. Components receive everything
/// they need at construction; nothing in the library reads the environment
/// after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub freepik: Option<FreepikConfig>,
    pub openai: Option<OpenAiConfig>,
    pub fonts_dir: Option<PathBuf>,
    pub output_root: Option<PathBuf>,
}

impl Default for FreepikConfig {
    fn default() -> Self {
        FreepikConfig {
            api_key: None,
            endpoint: None,
        }
    }
}

impl FreepikConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("FREEPIK_API_KEY").ok();
        let endpoint = env::var("FREEPIK_ENDPOINT").ok();

        FreepikConfig { api_key, endpoint }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_key: None,
            model: None,
        }
    }
}

impl OpenAiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("OPENAI_API_KEY").ok();
        let model = env::var("OPENAI_MODEL").ok();

        OpenAiConfig { api_key, model }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            freepik: None,
            openai: None,
            fonts_dir: None,
            output_root: None,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let fonts_dir = env::var("ADFORGE_FONTS_DIR").ok().map(PathBuf::from);
        let output_root = env::var("ADFORGE_OUTPUT_DIR").ok().map(PathBuf::from);

        Config {
            freepik: Some(FreepikConfig::from_env()),
            openai: Some(OpenAiConfig::from_env()),
            fonts_dir,
            output_root,
        }
    }

    pub fn with_freepik(mut self, config: FreepikConfig) -> Self {
        self.freepik = Some(config);
        self
    }

    pub fn with_openai(mut self, config: OpenAiConfig) -> Self {
        self.openai = Some(config);
        self
    }

    pub fn with_fonts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fonts_dir = Some(dir.into());
        self
    }

    pub fn with_output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_root = Some(dir.into());
        self
    }

    pub fn fonts_dir(&self) -> PathBuf {
        self.fonts_dir.clone().unwrap_or_else(|| PathBuf::from("fonts"))
    }

    pub fn output_root(&self) -> PathBuf {
        self.output_root.clone().unwrap_or_else(env::temp_dir)
    }

    /// Preflight check run before any work starts: both upstream services
    /// need credentials. Failing here beats failing ten variants in.
    pub fn validate(&self) -> Result<()> {
        let freepik_ok = self
            .freepik
            .as_ref()
            .and_then(|c| c.api_key.as_ref())
            .map_or(false, |k| !k.is_empty());
        if !freepik_ok {
            return Err(ForgeError::Config("FREEPIK_API_KEY missing".into()));
        }

        let openai_ok = self
            .openai
            .as_ref()
            .and_then(|c| c.api_key.as_ref())
            .map_or(false, |k| !k.is_empty());
        if !openai_ok {
            return Err(ForgeError::Config("OPENAI_API_KEY missing".into()));
        }

        Ok(())
    }
}
