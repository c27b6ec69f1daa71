use std::path::{Path, PathBuf};

use image::{imageops, RgbaImage};
use tracing::debug;

use crate::{
    capture::{CameraDevice, CameraStream, Facing},
    config::CaptureConfig,
    error::{CaptureError, Result},
};

/// Camera device backed by a photo on disk
///
/// The photo is treated as the self-view the user would see. Front-facing
/// streams deliver it the way a user-facing sensor does (horizontally
/// flipped), so a captured still comes out identical to the photo.
pub struct StillFrameCamera {
    path: PathBuf,
}

impl StillFrameCamera {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl CameraDevice for StillFrameCamera {
    fn open(&mut self, facing: Facing, config: &CaptureConfig) -> Result<Box<dyn CameraStream>> {
        let photo = image::open(&self.path).map_err(|e| CaptureError::DeviceUnavailable {
            reason: format!("{}: {}", self.path.display(), e),
        })?;

        let mut frame = photo.to_rgba8();
        if frame.width() < config.ideal_width || frame.height() < config.ideal_height {
            debug!(
                "Photo {}x{} is below the preferred {}x{}",
                frame.width(), frame.height(), config.ideal_width, config.ideal_height
            );
        }
        if facing == Facing::Front {
            imageops::flip_horizontal_in_place(&mut frame);
        }

        Ok(Box::new(StillFrameStream { frame: Some(frame) }))
    }
}

struct StillFrameStream {
    frame: Option<RgbaImage>,
}

impl CameraStream for StillFrameStream {
    fn grab_frame(&mut self) -> Result<RgbaImage> {
        self.frame.clone().ok_or_else(|| CaptureError::FrameFailed {
            reason: "stream stopped".to_string(),
        }.into())
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}
