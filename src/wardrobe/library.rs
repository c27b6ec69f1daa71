use tracing::{debug, info};

use crate::{
    error::{Result, WardrobeError},
    styles::{StylePreset, StyleRegistry},
    wardrobe::{WardrobeData, WardrobeStore},
};

const CUSTOM_DESCRIPTION: &str = "Your custom vision";
const CUSTOM_ICON: &str = "✨";

/// Favorites and user-created styles, backed by a [`WardrobeStore`]
///
/// Loaded once at construction. Every mutation builds the next collections,
/// saves them, and only then replaces the in-memory copy, so a failed save
/// leaves the library unchanged.
pub struct StyleLibrary {
    store: Box<dyn WardrobeStore>,
    data: WardrobeData,
    registry: StyleRegistry,
}

impl StyleLibrary {
    /// Load the library from the given store
    pub fn load(store: Box<dyn WardrobeStore>) -> Result<Self> {
        let data = store.load()?;
        let registry = StyleRegistry::with_user_styles(&data.user_styles);
        debug!(
            "Loaded wardrobe: {} favorites, {} custom styles",
            data.favorites.len(),
            data.user_styles.len()
        );
        Ok(Self { store, data, registry })
    }

    /// Combined built-in and custom catalog
    pub fn catalog(&self) -> &StyleRegistry {
        &self.registry
    }

    pub fn favorites(&self) -> &[String] {
        &self.data.favorites
    }

    pub fn user_styles(&self) -> &[StylePreset] {
        &self.data.user_styles
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.data.favorites.iter().any(|f| f == id)
    }

    /// Styles shown in the grid, optionally restricted to favorites
    pub fn visible_styles(&self, only_favorites: bool) -> Vec<&StylePreset> {
        if only_favorites {
            self.registry.favorites(&self.data.favorites).collect()
        } else {
            self.registry.styles().iter().collect()
        }
    }

    /// Add or remove a favorite; returns whether the style is now a favorite
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let mut next = self.data.clone();
        let now_favorite = if next.favorites.iter().any(|f| f == id) {
            next.favorites.retain(|f| f != id);
            false
        } else {
            next.favorites.push(id.to_string());
            true
        };

        self.commit(next)?;
        debug!("Favorite {} -> {}", id, now_favorite);
        Ok(now_favorite)
    }

    /// Create and persist a custom style from a name and prompt
    pub fn create_custom_style(&mut self, name: &str, prompt: &str) -> Result<StylePreset> {
        let name = name.trim();
        let prompt = prompt.trim();
        if name.is_empty() {
            return Err(WardrobeError::InvalidStyle { field: "a name".to_string() }.into());
        }
        if prompt.is_empty() {
            return Err(WardrobeError::InvalidStyle { field: "a prompt".to_string() }.into());
        }

        let style = StylePreset {
            id: self.next_custom_id(),
            name: name.to_string(),
            description: CUSTOM_DESCRIPTION.to_string(),
            prompt: prompt.to_string(),
            icon: CUSTOM_ICON.to_string(),
            is_custom: true,
        };

        let mut next = self.data.clone();
        next.user_styles.push(style.clone());
        self.commit(next)?;

        info!("✨ Saved custom style '{}' ({})", style.name, style.id);
        Ok(style)
    }

    /// Delete a custom style and drop it from the favorites
    pub fn delete_custom_style(&mut self, id: &str) -> Result<StylePreset> {
        let Some(style) = self.data.user_styles.iter().find(|s| s.id == id).cloned() else {
            if self.registry.has_style(id) {
                return Err(WardrobeError::BuiltinStyle { id: id.to_string() }.into());
            }
            return Err(WardrobeError::NotFound { id: id.to_string() }.into());
        };

        let mut next = self.data.clone();
        next.user_styles.retain(|s| s.id != id);
        next.favorites.retain(|f| f != id);
        self.commit(next)?;

        info!("🗑️  Deleted custom style '{}'", style.name);
        Ok(style)
    }

    fn commit(&mut self, next: WardrobeData) -> Result<()> {
        self.store.save(&next)?;
        self.registry = StyleRegistry::with_user_styles(&next.user_styles);
        self.data = next;
        Ok(())
    }

    fn next_custom_id(&self) -> String {
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let id = format!("custom-{}", millis);
            if !self.registry.has_style(&id) {
                return id;
            }
            millis += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wardrobe::MemoryStore;

    fn library() -> (StyleLibrary, MemoryStore) {
        let store = MemoryStore::new();
        let library = StyleLibrary::load(Box::new(store.clone())).unwrap();
        (library, store)
    }

    #[test]
    fn test_toggle_favorite_twice_restores_membership() {
        let (mut library, store) = library();
        library.toggle_favorite("cyberpunk").unwrap();
        let before = library.favorites().to_vec();

        assert!(library.toggle_favorite("formal").unwrap());
        assert!(!library.toggle_favorite("formal").unwrap());

        assert_eq!(library.favorites(), before.as_slice());
        assert_eq!(store.snapshot().favorites, before);
        assert_eq!(store.save_count(), 3);
    }

    #[test]
    fn test_create_requires_name_and_prompt() {
        let (mut library, store) = library();
        assert!(library.create_custom_style("  ", "velvet").is_err());
        assert!(library.create_custom_style("Velvet", "   ").is_err());
        assert_eq!(store.save_count(), 0);
    }

    #[test]
    fn test_created_styles_have_unique_ids() {
        let (mut library, store) = library();
        let a = library.create_custom_style(" Neon Knight ", "glowing armor").unwrap();
        let b = library.create_custom_style("Neon Knight", "glowing armor").unwrap();

        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("custom-"));
        assert_eq!(a.name, "Neon Knight");
        assert!(a.is_custom);
        assert_eq!(library.catalog().len(), 8);
        assert_eq!(store.snapshot().user_styles.len(), 2);
    }

    #[test]
    fn test_delete_removes_style_and_favorite() {
        let (mut library, store) = library();
        let style = library.create_custom_style("Mine", "silk robe").unwrap();
        library.toggle_favorite(&style.id).unwrap();
        library.toggle_favorite("regal").unwrap();

        library.delete_custom_style(&style.id).unwrap();

        assert!(!library.catalog().has_style(&style.id));
        assert!(!library.is_favorite(&style.id));
        assert!(library.is_favorite("regal"));
        assert_eq!(store.snapshot().favorites, vec!["regal".to_string()]);
        assert!(store.snapshot().user_styles.is_empty());
    }

    #[test]
    fn test_builtins_cannot_be_deleted() {
        let (mut library, _) = library();
        let err = library.delete_custom_style("formal").unwrap_err();
        assert!(matches!(
            err,
            crate::error::LuminaError::Wardrobe(WardrobeError::BuiltinStyle { .. })
        ));
        assert!(library.delete_custom_style("nope").is_err());
    }

    #[test]
    fn test_visible_styles_favorites_only() {
        let (mut library, _) = library();
        library.toggle_favorite("sporty").unwrap();

        let visible = library.visible_styles(true);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "sporty");
        assert_eq!(library.visible_styles(false).len(), 6);
    }

    #[test]
    fn test_reload_from_store() {
        let (mut library, store) = library();
        let style = library.create_custom_style("Mine", "silk robe").unwrap();

        let reloaded = StyleLibrary::load(Box::new(store)).unwrap();
        assert_eq!(reloaded.catalog().get_style(&style.id), Some(&style));
    }
}
