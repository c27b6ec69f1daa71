//! # Transformation Gateway
//!
//! Boundary to the external generative service. The session core only ever
//! sees the [`TransformationGateway`] trait; [`GeminiGateway`] is the HTTP
//! implementation used by the CLI.
//!
//! Every call is attempted once per user action. Retrying is the user's call.

pub mod credentials;
pub mod gemini;
pub mod prompts;

use async_trait::async_trait;

use crate::{capture::DataUri, error::Result};

pub use credentials::{CredentialProvider, EnvCredentials, StaticCredentials};
pub use gemini::GeminiGateway;

/// Inputs for an outfit transformation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    /// The captured photo
    pub image: DataUri,

    /// Active prompt (preset prompt or prefixed custom prompt)
    pub prompt: String,

    /// Description of the outfit currently worn
    pub base_description: String,

    /// Ask for a portrait-style blurred background
    pub blur_background: bool,
}

/// Inputs for animating a transformed look
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimateRequest {
    /// The transformed still
    pub image: DataUri,

    /// Style name used in the motion prompt
    pub style_name: String,
}

/// Operations offered by the generative service
#[async_trait]
pub trait TransformationGateway: Send + Sync {
    /// Describe the outfit in the photo. Best effort: callers fall back to a
    /// default description on failure.
    async fn analyze(&self, image: &DataUri) -> Result<String>;

    /// Produce the restyled photo
    async fn transform(&self, request: &TransformRequest) -> Result<DataUri>;

    /// Produce a short video of the restyled look
    async fn animate(&self, request: &AnimateRequest) -> Result<DataUri>;
}
