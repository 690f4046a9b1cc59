//! Prompt construction for the two upstream generators. Wording is tuned
//! for backgrounds that leave room for compositing: studio-style scenes,
//! no baked-in text.

pub fn background_prompt(brand_name: &str, tone: &str) -> String {
    let brand = if brand_name.is_empty() {
        "a brand"
    } else {
        brand_name
    };
    format!(
        "Create a premium advertising background for {}. Tone: {}. Do not add text.",
        brand, tone
    )
}

pub fn caption_prompt(brand_name: &str, tone: &str, language: &str) -> String {
    format!(
        "Create a premium, minimal, 4-7 word advertising caption.\n\
         Brand: {}\n\
         Tone: {}\n\
         Language: {}\n\
         No emojis. No hashtags. No special characters.",
        brand_name, tone, language
    )
}

/// Used whenever caption generation fails; a run never ships a creative
/// without some caption on it.
pub fn fallback_caption(brand_name: &str) -> String {
    let brand = if brand_name.is_empty() {
        "our brand"
    } else {
        brand_name
    };
    format!("Discover {} today.", brand)
}
