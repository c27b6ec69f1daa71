//! # Share Links
//!
//! Deep links carrying either a style id (`?style=formal`) or a custom
//! prompt (`?custom=<base64 of {"prompt": "..."}>`). Links are produced for
//! the clipboard and decoded once at startup; decoding never fails loudly.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::{
    error::{Result, ShareError},
    styles::{StylePreset, StyleRegistry},
};

pub const STYLE_PARAM: &str = "style";
pub const CUSTOM_PARAM: &str = "custom";

/// Default page shared links point at
pub const DEFAULT_BASE_URL: &str = "https://lumina.app/";

/// What a link asks the session to preselect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeepLink {
    None,
    Style(StylePreset),
    Custom(String),
}

#[derive(Serialize, Deserialize)]
struct CustomPayload {
    prompt: String,
}

/// Parse the base URL links are built on
pub fn parse_base(base: &str) -> Result<Url> {
    Url::parse(base).map_err(|_| ShareError::InvalidBase { url: base.to_string() }.into())
}

/// Link selecting the given style
pub fn style_link(base: &Url, style: &StylePreset) -> Url {
    with_param(base, STYLE_PARAM, &style.id)
}

/// Link carrying a custom prompt; blank prompts have nothing to share
pub fn custom_link(base: &Url, prompt: &str) -> Result<Url> {
    if prompt.trim().is_empty() {
        return Err(ShareError::Empty { reason: "custom prompt is blank".to_string() }.into());
    }
    Ok(with_param(base, CUSTOM_PARAM, &encode_custom(prompt)?))
}

/// Base64 of `{"prompt": ...}`
pub fn encode_custom(prompt: &str) -> Result<String> {
    let json = serde_json::to_string(&CustomPayload { prompt: prompt.to_string() })?;
    Ok(BASE64.encode(json))
}

/// Inverse of [`encode_custom`]; `None` for anything malformed or empty
pub fn decode_custom(encoded: &str) -> Option<String> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| debug!("Failed to decode shared style: {}", e))
        .ok()?;
    let payload: CustomPayload = serde_json::from_slice(&bytes)
        .map_err(|e| debug!("Failed to decode shared style: {}", e))
        .ok()?;
    Some(payload.prompt).filter(|p| !p.is_empty())
}

/// Read a page URL against the catalog
///
/// A `style` parameter wins over `custom`, even when the style is unknown.
pub fn decode(url: &Url, catalog: &StyleRegistry) -> DeepLink {
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
    };

    if let Some(id) = param(STYLE_PARAM) {
        return match catalog.get_style(&id) {
            Some(style) => DeepLink::Style(style.clone()),
            None => {
                debug!("Shared style '{}' is not in the catalog", id);
                DeepLink::None
            }
        };
    }

    param(CUSTOM_PARAM)
        .and_then(|encoded| decode_custom(&encoded))
        .map(DeepLink::Custom)
        .unwrap_or(DeepLink::None)
}

/// Parse and decode a link string; unparseable input decodes to `None`
pub fn decode_str(link: &str, catalog: &StyleRegistry) -> DeepLink {
    match Url::parse(link) {
        Ok(url) => decode(&url, catalog),
        Err(e) => {
            debug!("Ignoring unparseable link: {}", e);
            DeepLink::None
        }
    }
}

/// Copy of `base` with `key` set to `value`, replacing earlier values
fn with_param(base: &Url, key: &str, value: &str) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(k, _)| k != key)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut query = url.query_pairs_mut();
        query.extend_pairs(kept);
        query.append_pair(key, value);
    }
    url
}
