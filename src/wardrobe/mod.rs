//! # Wardrobe
//!
//! Favorites and user-created styles, persisted through an injected
//! [`WardrobeStore`]. The library is loaded once and written on every change.

pub mod library;
pub mod store;

pub use library::StyleLibrary;
pub use store::{JsonFileStore, MemoryStore, WardrobeData, WardrobeStore};
