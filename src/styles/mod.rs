//! # Style Catalog
//!
//! Built-in outfit presets plus the user's own saved styles.
//!
//! ## Built-in Styles
//!
//! - **Cyberpunk**: Neon-infused futuristic streetwear
//! - **Executive**: Sharp tailored business attire
//! - **Boho Chic**: Flowy, artistic, and relaxed
//! - **Royal Gala**: Elegant evening formal wear
//! - **Athleisure**: Premium performance gear
//! - **Steampunk**: Victorian industrial fantasy
//!
//! ## Usage
//!
//! ```rust
//! use lumina_wardrobe::styles::StyleRegistry;
//!
//! let registry = StyleRegistry::new();
//! let executive = registry.get_style("formal").unwrap();
//! assert_eq!(executive.name, "Executive");
//! ```

pub mod preset;
pub mod registry;

// Re-exports for convenience
pub use preset::{builtin_presets, StylePreset};
pub use registry::StyleRegistry;
