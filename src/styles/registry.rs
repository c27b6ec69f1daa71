use crate::styles::{builtin_presets, StylePreset};

/// Combined catalog of built-in and user-created styles
///
/// Built-in presets always come first, followed by user styles in creation
/// order. Lookups go through the combined list, so share links can resolve
/// both kinds.
#[derive(Debug, Clone)]
pub struct StyleRegistry {
    styles: Vec<StylePreset>,
}

impl StyleRegistry {
    /// Create a registry holding only the built-in presets
    pub fn new() -> Self {
        Self {
            styles: builtin_presets(),
        }
    }

    /// Create a registry with the built-ins followed by the given user styles
    pub fn with_user_styles<'a, I>(user_styles: I) -> Self
    where
        I: IntoIterator<Item = &'a StylePreset>,
    {
        let mut registry = Self::new();
        for style in user_styles {
            registry.register(style.clone());
        }
        registry
    }

    /// Register a user style; a style with an already known id is ignored
    pub fn register(&mut self, style: StylePreset) -> bool {
        if self.has_style(&style.id) {
            return false;
        }
        self.styles.push(style);
        true
    }

    /// Get a style by id
    pub fn get_style(&self, id: &str) -> Option<&StylePreset> {
        self.styles.iter().find(|s| s.id == id)
    }

    /// All styles in display order
    pub fn styles(&self) -> &[StylePreset] {
        &self.styles
    }

    /// Styles filtered to the given favorites, keeping display order
    pub fn favorites<'a>(&'a self, favorites: &'a [String]) -> impl Iterator<Item = &'a StylePreset> + 'a {
        self.styles.iter().filter(move |s| favorites.contains(&s.id))
    }

    /// Check if a style is available
    pub fn has_style(&self, id: &str) -> bool {
        self.styles.iter().any(|s| s.id == id)
    }

    /// Get the number of registered styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

impl Default for StyleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
