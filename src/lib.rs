//! # Lumina Wardrobe
//!
//! Try on new outfits from a single photo with generative image and video models.
//!
//! This library provides the session flow behind a virtual fitting room: take a
//! photo, let the model describe what you are wearing, pick a style (or write
//! your own), and get back an edited photo and optionally a short video.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use lumina_wardrobe::{
//!     capture::{CaptureProvider, StillFrameCamera},
//!     config::Config,
//!     gateway::{EnvCredentials, GeminiGateway},
//!     wardrobe::{JsonFileStore, StyleLibrary},
//!     Studio,
//! };
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let credentials = Arc::new(EnvCredentials::new(&config.gateway.api_key_env));
//! let gateway = Arc::new(GeminiGateway::new(config.gateway.clone(), credentials.clone())?);
//! let library = StyleLibrary::load(Box::new(JsonFileStore::new(config.wardrobe.resolve_path())))?;
//!
//! let studio = Studio::new(&config, library, gateway, credentials)?;
//! let mut camera = CaptureProvider::new(Box::new(StillFrameCamera::new("me.jpg")), config.capture.clone());
//!
//! studio.start_camera(&mut camera).await?;
//! studio.capture(&mut camera).await?;
//! studio.select_style("cyberpunk").await?;
//! studio.transform().await?;
//!
//! if let Some(artifact) = studio.artifact().await {
//!     artifact.save("out/")?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`session`] - View state machine and progress messages
//! - [`studio`] - Async orchestration of the session and the gateway
//! - [`capture`] - Camera devices and captured stills
//! - [`gateway`] - Outfit analysis, image editing and video generation
//! - [`styles`] / [`wardrobe`] - Built-in presets, favorites and custom styles
//! - [`share`] - Share links that preselect a style
//! - [`export`] - Saving and sharing the result
//! - [`config`] - Configuration management
//!
//! ## Custom Gateways
//!
//! Any backend can drive the session by implementing
//! [`TransformationGateway`](gateway::TransformationGateway):
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use lumina_wardrobe::capture::DataUri;
//! use lumina_wardrobe::gateway::{AnimateRequest, TransformRequest, TransformationGateway};
//! use lumina_wardrobe::Result;
//!
//! struct EchoGateway;
//!
//! #[async_trait]
//! impl TransformationGateway for EchoGateway {
//!     async fn analyze(&self, _image: &DataUri) -> Result<String> {
//!         Ok("a plain t-shirt".to_string())
//!     }
//!
//!     async fn transform(&self, request: &TransformRequest) -> Result<DataUri> {
//!         Ok(request.image.clone())
//!     }
//!
//!     async fn animate(&self, request: &AnimateRequest) -> Result<DataUri> {
//!         Ok(request.image.clone())
//!     }
//! }
//! ```

pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod gateway;
pub mod session;
pub mod share;
pub mod studio;
pub mod styles;
pub mod wardrobe;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{LuminaError, Result},
    session::{Session, SessionMachine, Step, StepKind},
    studio::Studio,
    styles::{StylePreset, StyleRegistry},
};
