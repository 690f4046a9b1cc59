use serde::Deserialize;

/// The text-to-image endpoint has shipped more than one response layout.
/// All fields are optional so one struct can absorb every known shape; the
/// client decides which branch is usable.
#[derive(Debug, Deserialize)]
pub struct FreepikImageResponse {
    pub data: Option<Vec<FreepikImageItem>>,
    pub image_base64: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FreepikImageItem {
    pub b64: Option<String>,
    pub url: Option<String>,
}
