use adforge::{Config, CreativePipeline, GenerationRequest, ResolutionTier, Services};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file first
    match dotenv::dotenv() {
        Ok(_) => log::info!("✅ .env file loaded successfully"),
        Err(_) => log::warn!("⚠️  No .env file found, using system environment variables"),
    }

    adforge::logger::init_with_config(
        adforge::logger::LoggerConfig::development().with_level(adforge::logger::LogLevel::Debug),
    )?;

    log::info!("🔍 Checking creative environment...");

    let config = Config::from_env();
    adforge::logger::log_config_info(&config);

    if let Err(e) = config.validate() {
        log::error!("❌ Configuration invalid: {}", e);
        return Err(e.into());
    }

    let product_path = match env::var("ADFORGE_PRODUCT") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            log::error!("❌ ADFORGE_PRODUCT not set (path to the product photo)");
            return Err("ADFORGE_PRODUCT missing".into());
        }
    };
    let logo_path = match env::var("ADFORGE_LOGO") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            log::error!("❌ ADFORGE_LOGO not set (path to the brand logo)");
            return Err("ADFORGE_LOGO missing".into());
        }
    };

    let brand = env::var("ADFORGE_BRAND").unwrap_or_default();
    let tone = env::var("ADFORGE_TONE").unwrap_or_else(|_| "premium".to_string());
    let count = env::var("ADFORGE_COUNT")
        .ok()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(10);
    let tier = match env::var("ADFORGE_TIER").as_deref() {
        Ok("hd") | Ok("HD") => ResolutionTier::Hd,
        Ok("standard") | Err(_) => ResolutionTier::Standard,
        Ok(other) => {
            log::warn!("⚠️  Unknown tier '{}', using standard", other);
            ResolutionTier::Standard
        }
    };
    let language = env::var("ADFORGE_LANGUAGE").unwrap_or_else(|_| "english".to_string());

    let request = GenerationRequest::new(brand, tone, count)
        .with_tier(tier)
        .with_language(language);

    log::info!("🔄 Creating generation services...");
    let services = match Services::from_config(&config) {
        Ok(services) => {
            log::info!("✅ Freepik and OpenAI clients initialized");
            services
        }
        Err(e) => {
            log::error!("❌ Failed to initialize services: {}", e);
            return Err(e.into());
        }
    };

    let pipeline = match CreativePipeline::new(&config, services) {
        Ok(pipeline) => {
            log::info!("✅ Creative pipeline ready");
            pipeline
        }
        Err(e) => {
            log::error!("❌ Failed to build pipeline: {}", e);
            return Err(e.into());
        }
    };

    log::info!("🎨 Generating creative pack...");
    match pipeline.run(&request, &product_path, &logo_path).await {
        Ok(artifacts) => {
            log::info!("✅ Run {} complete!", artifacts.run_id);
            log::info!("🖼️  Creatives rendered: {}", artifacts.creatives.len());
            if artifacts.fallback_backgrounds > 0 {
                log::warn!(
                    "⚠️  {} background(s) used the fallback canvas",
                    artifacts.fallback_backgrounds
                );
            }
            if artifacts.fallback_captions > 0 {
                log::warn!(
                    "⚠️  {} caption(s) used the fallback text",
                    artifacts.fallback_captions
                );
            }
            log::info!("📦 Creative pack: {}", artifacts.archive_path.display());
        }
        Err(e) => {
            log::error!("❌ Creative run failed: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
