//! # Capture
//!
//! Camera contract and still-frame extraction. A [`CameraDevice`] hands out
//! streams; the [`CaptureProvider`] owns at most one of them, mirrors
//! front-camera stills, and encodes them as PNG data URIs.

pub mod frame;
pub mod provider;
pub mod still;

use serde::{Deserialize, Serialize};

pub use frame::{CapturedImage, DataUri};
pub use provider::{CameraDevice, CameraStream, CaptureProvider, CAMERA_ERROR_MESSAGE};
pub use still::StillFrameCamera;

/// Which camera is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// User-facing camera (selfie)
    Front,
    /// Environment-facing camera
    Back,
}

impl Facing {
    pub fn toggled(self) -> Self {
        match self {
            Facing::Front => Facing::Back,
            Facing::Back => Facing::Front,
        }
    }
}
