use thiserror::Error;

/// Main error type for the Lumina library
#[derive(Error, Debug)]
pub enum LuminaError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Wardrobe error: {0}")]
    Wardrobe(#[from] WardrobeError),

    #[error("Share link error: {0}")]
    Share(#[from] ShareError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Generic error: {0}")]
    Generic(String),
}

/// Camera and still-frame errors
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Camera unavailable: {reason}")]
    DeviceUnavailable { reason: String },

    #[error("Camera is not running")]
    NotStarted,

    #[error("Frame grab failed: {reason}")]
    FrameFailed { reason: String },

    #[error("Image encoding failed: {reason}")]
    EncodingFailed { reason: String },

    #[error("Invalid data URI: {details}")]
    InvalidDataUri { details: String },
}

/// Errors from the external generative service
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Service returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Service response contained no {expected}")]
    EmptyResponse { expected: String },

    #[error("No API key selected (set {env_var} or select a key)")]
    MissingCredential { env_var: String },

    #[error("Video generation did not finish within {seconds}s")]
    VideoTimeout { seconds: u64 },
}

/// View state machine errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot {action} while in the {step} step")]
    InvalidTransition { action: String, step: String },

    #[error("No captured image")]
    MissingCapture,

    #[error("No style selected and no custom prompt")]
    EmptyPrompt,

    #[error("Outfit analysis still running")]
    AnalysisPending,

    #[error("Camera error: {message}")]
    CameraBlocked { message: String },
}

/// Favorites and custom style errors
#[derive(Error, Debug)]
pub enum WardrobeError {
    #[error("Custom style needs {field}")]
    InvalidStyle { field: String },

    #[error("Style not found: {id}")]
    NotFound { id: String },

    #[error("Built-in style cannot be deleted: {id}")]
    BuiltinStyle { id: String },

    #[error("Failed to persist wardrobe to {path}: {reason}")]
    PersistFailed { path: String, reason: String },
}

/// Share link errors
#[derive(Error, Debug)]
pub enum ShareError {
    #[error("Invalid base URL: {url}")]
    InvalidBase { url: String },

    #[error("Nothing to share: {reason}")]
    Empty { reason: String },
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration file: {path}")]
    ParseFailed { path: String },

    #[error("Invalid configuration value: {key} = {value}")]
    InvalidValue { key: String, value: String },

    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },
}

/// Convenience type alias for Results using LuminaError
pub type Result<T> = std::result::Result<T, LuminaError>;

impl LuminaError {
    /// Create a generic error with a custom message
    pub fn generic<S: Into<String>>(message: S) -> Self {
        Self::Generic(message.into())
    }

    /// Check if this error is recoverable (the user can retry the action)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) => true,
            Self::Gateway(GatewayError::MissingCredential { .. }) => false,
            Self::Gateway(_) => true,
            Self::Session(SessionError::AnalysisPending) => true,
            // Device access needs leaving and re-entering the camera step
            Self::Capture(CaptureError::DeviceUnavailable { .. }) => false,
            Self::Capture(CaptureError::FrameFailed { .. }) => true,
            _ => false,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Capture(CaptureError::DeviceUnavailable { .. }) => {
                "Unable to access camera. Please check permissions.".to_string()
            }
            Self::Gateway(GatewayError::MissingCredential { env_var }) => {
                format!("No API key available. Set {} or select a key before animating.", env_var)
            }
            Self::Wardrobe(WardrobeError::NotFound { id }) => {
                format!("Style '{}' not found. Run `lumina styles` to list available styles.", id)
            }
            Self::Config(ConfigError::FileNotFound { path }) => {
                format!("Configuration file '{}' not found.", path)
            }
            _ => self.to_string(),
        }
    }
}
