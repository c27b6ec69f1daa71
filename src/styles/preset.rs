use serde::{Deserialize, Serialize};

/// A named outfit-transformation instruction bundle
///
/// Field names serialize in the camel-case layout the wardrobe file has
/// always used, so collections written by earlier versions still load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StylePreset {
    /// Unique identifier, also used in share links
    pub id: String,

    /// Display name
    pub name: String,

    /// One-line description shown under the name
    pub description: String,

    /// Instruction sent to the image model
    pub prompt: String,

    /// Icon glyph
    pub icon: String,

    /// Set for styles the user created
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_custom: bool,
}

impl StylePreset {
    /// Build a built-in preset
    pub fn builtin(id: &str, name: &str, description: &str, prompt: &str, icon: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            prompt: prompt.to_string(),
            icon: icon.to_string(),
            is_custom: false,
        }
    }
}

/// Built-in presets, in display order
pub fn builtin_presets() -> Vec<StylePreset> {
    vec![
        StylePreset::builtin(
            "cyberpunk",
            "Cyberpunk",
            "Neon-infused futuristic streetwear",
            "Change my outfit to a high-fashion cyberpunk streetwear look with neon accents, tech-wear materials, and glowing futuristic details.",
            "🚀",
        ),
        StylePreset::builtin(
            "formal",
            "Executive",
            "Sharp tailored business attire",
            "Change my outfit to a perfectly tailored, expensive-looking charcoal grey business suit with a crisp white shirt and silk tie.",
            "💼",
        ),
        StylePreset::builtin(
            "bohemian",
            "Boho Chic",
            "Flowy, artistic, and relaxed",
            "Change my outfit to a stylish bohemian look with flowy fabrics, earthy tones, layered accessories, and artistic patterns.",
            "🎨",
        ),
        StylePreset::builtin(
            "regal",
            "Royal Gala",
            "Elegant evening formal wear",
            "Change my outfit to a breathtaking royal gala evening gown/tuxedo with gold embroidery and premium velvet textures.",
            "👑",
        ),
        StylePreset::builtin(
            "sporty",
            "Athleisure",
            "Premium performance gear",
            "Change my outfit to high-end designer athletic wear with modern breathable fabrics and sleek performance aesthetics.",
            "🏃",
        ),
        StylePreset::builtin(
            "steampunk",
            "Steampunk",
            "Victorian industrial fantasy",
            "Change my outfit to an elaborate steampunk ensemble with leather corsetry/vests, brass gears, and Victorian industrial elements.",
            "⚙️",
        ),
    ]
}
