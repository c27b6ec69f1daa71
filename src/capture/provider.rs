use image::{imageops, RgbaImage};
use tracing::{debug, info, warn};

use crate::{
    capture::{CapturedImage, DataUri, Facing},
    config::CaptureConfig,
    error::{CaptureError, Result},
};

/// Message shown when the camera cannot be opened
pub const CAMERA_ERROR_MESSAGE: &str = "Unable to access camera. Please check permissions.";

/// A live feed acquired from a [`CameraDevice`]
pub trait CameraStream: Send {
    /// Grab the current frame as the sensor delivers it
    fn grab_frame(&mut self) -> Result<RgbaImage>;

    /// Release the underlying device resource
    fn stop(&mut self);
}

/// Source of camera streams
pub trait CameraDevice: Send {
    /// Acquire a stream for the requested camera
    fn open(&mut self, facing: Facing, config: &CaptureConfig) -> Result<Box<dyn CameraStream>>;
}

/// Owns at most one camera stream and turns frames into captured stills
///
/// A stream is always stopped before the next one is opened, whether the
/// camera is restarted, the facing is switched, or the provider is dropped.
pub struct CaptureProvider {
    device: Box<dyn CameraDevice>,
    config: CaptureConfig,
    facing: Facing,
    stream: Option<Box<dyn CameraStream>>,
    error: Option<String>,
}

impl CaptureProvider {
    pub fn new(device: Box<dyn CameraDevice>, config: CaptureConfig) -> Self {
        let facing = config.default_facing;
        Self {
            device,
            config,
            facing,
            stream: None,
            error: None,
        }
    }

    /// Open the camera for the current facing
    pub fn start(&mut self) -> Result<()> {
        self.release();

        match self.device.open(self.facing, &self.config) {
            Ok(stream) => {
                info!("📷 Camera started ({:?})", self.facing);
                self.stream = Some(stream);
                self.error = None;
                Ok(())
            }
            Err(e) => {
                warn!("Error accessing camera: {}", e);
                self.error = Some(CAMERA_ERROR_MESSAGE.to_string());
                Err(CaptureError::DeviceUnavailable { reason: e.to_string() }.into())
            }
        }
    }

    /// Switch between front and back cameras and reopen
    pub fn toggle_facing(&mut self) -> Result<()> {
        self.facing = self.facing.toggled();
        debug!("Switching camera to {:?}", self.facing);
        self.start()
    }

    /// Capture a still frame
    ///
    /// Front camera frames are flipped horizontally so the saved image
    /// matches the mirrored self-view the user saw.
    pub fn capture(&mut self) -> Result<CapturedImage> {
        if let Some(message) = &self.error {
            return Err(CaptureError::DeviceUnavailable { reason: message.clone() }.into());
        }
        let stream = self.stream.as_mut().ok_or(CaptureError::NotStarted)?;

        let mut frame = stream.grab_frame()?;
        if self.facing == Facing::Front {
            imageops::flip_horizontal_in_place(&mut frame);
        }

        debug!("Captured {}x{} frame", frame.width(), frame.height());
        Ok(CapturedImage::new(DataUri::from_png(&frame)?))
    }

    /// Stop the camera
    pub fn shutdown(&mut self) {
        self.release();
    }

    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Whether the live preview should be drawn mirrored
    pub fn preview_is_mirrored(&self) -> bool {
        self.facing == Facing::Front
    }

    pub fn is_running(&self) -> bool {
        self.stream.is_some()
    }

    /// The device error, if opening the camera failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
            debug!("Camera stream released");
        }
    }
}

impl Drop for CaptureProvider {
    fn drop(&mut self) {
        self.release();
    }
}
