use std::path::{Path, PathBuf};

use image::{imageops, imageops::FilterType, Rgba, RgbaImage};
use tracing::info;

use crate::{
    capture::DataUri,
    error::Result,
    session::Step,
};

/// Title used for native share sheets
pub const SHARE_TITLE: &str = "Lumina Look";

/// What the result screen offers for download and sharing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Image(DataUri),
    Video(DataUri),
}

/// Payload handed to a native share action
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub title: String,
    pub url: String,
}

impl Artifact {
    /// The video when one is showing, else the result image
    pub fn from_step(step: &Step) -> Option<Self> {
        match step {
            Step::Result { video: Some(video), .. } => Some(Artifact::Video(video.clone())),
            Step::Result { image, .. } => Some(Artifact::Image(image.clone())),
            _ => None,
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::Image(_) => "look.png",
            Artifact::Video(_) => "lumina-motion.mp4",
        }
    }

    pub fn data(&self) -> &DataUri {
        match self {
            Artifact::Image(data) | Artifact::Video(data) => data,
        }
    }

    /// Write the artifact into `dir`; images are normalized to PNG
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(self.file_name());

        match self {
            Artifact::Image(data) if data.mime() != "image/png" => {
                let png = DataUri::from_png(&data.decode_image()?.to_rgba8())?;
                std::fs::write(&path, png.bytes())?;
            }
            _ => std::fs::write(&path, self.data().bytes())?,
        }

        info!("💾 Saved {:?}", path);
        Ok(path)
    }

    pub fn share_payload(&self) -> SharePayload {
        SharePayload {
            title: SHARE_TITLE.to_string(),
            url: self.data().to_string(),
        }
    }
}

/// Composite shown on the result screen: the result laid over the original
/// at `intensity` percent, or the original alone while comparing
pub fn blend_preview(original: &DataUri, result: &DataUri, intensity: u8, show_original: bool) -> Result<RgbaImage> {
    let base = original.decode_image()?.to_rgba8();
    let mut overlay = result.decode_image()?.to_rgba8();
    if overlay.dimensions() != base.dimensions() {
        overlay = imageops::resize(&overlay, base.width(), base.height(), FilterType::Triangle);
    }

    let alpha = if show_original { 0.0 } else { f32::from(intensity.min(100)) / 100.0 };
    let blended = RgbaImage::from_fn(base.width(), base.height(), |x, y| {
        let under = base.get_pixel(x, y);
        let over = overlay.get_pixel(x, y);
        let mix = |i: usize| (f32::from(under[i]) * (1.0 - alpha) + f32::from(over[i]) * alpha).round() as u8;
        Rgba([mix(0), mix(1), mix(2), under[3].max(over[3])])
    });

    Ok(blended)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CapturedImage;
    use tempfile::tempdir;

    fn solid(width: u32, height: u32, value: u8) -> DataUri {
        DataUri::from_png(&RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255]))).unwrap()
    }

    fn result_step(video: Option<DataUri>) -> Step {
        Step::Result {
            capture: CapturedImage::new(solid(2, 2, 0)),
            image: solid(2, 2, 200),
            video,
            error: None,
        }
    }

    #[test]
    fn test_artifact_prefers_video() {
        let video = DataUri::new("video/mp4", vec![1, 2, 3]);
        let artifact = Artifact::from_step(&result_step(Some(video.clone()))).unwrap();
        assert_eq!(artifact, Artifact::Video(video));
        assert_eq!(artifact.file_name(), "lumina-motion.mp4");

        let image = Artifact::from_step(&result_step(None)).unwrap();
        assert_eq!(image.file_name(), "look.png");
        assert!(Artifact::from_step(&Step::Welcome).is_none());
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempdir().unwrap();
        let artifact = Artifact::Video(DataUri::new("video/mp4", vec![4, 5, 6]));
        let path = artifact.save(dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![4, 5, 6]);
    }

    #[test]
    fn test_save_converts_jpeg_to_png() {
        let dir = tempdir().unwrap();
        let mut jpeg = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30])))
            .write_to(&mut jpeg, image::ImageOutputFormat::Jpeg(90))
            .unwrap();

        let artifact = Artifact::Image(DataUri::new("image/jpeg", jpeg.into_inner()));
        let path = artifact.save(dir.path()).unwrap();
        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
        assert_eq!(image::load_from_memory(&bytes).unwrap().width(), 2);
    }

    #[test]
    fn test_share_payload() {
        let payload = Artifact::Image(DataUri::new("image/png", vec![0])).share_payload();
        assert_eq!(payload.title, "Lumina Look");
        assert!(payload.url.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_blend_intensity() {
        let original = solid(2, 2, 0);
        let result = solid(4, 4, 200);

        let full = blend_preview(&original, &result, 100, false).unwrap();
        assert_eq!(full.dimensions(), (2, 2));
        assert_eq!(full.get_pixel(0, 0)[0], 200);

        let half = blend_preview(&original, &result, 50, false).unwrap();
        assert_eq!(half.get_pixel(1, 1)[0], 100);

        let compare = blend_preview(&original, &result, 100, true).unwrap();
        assert_eq!(compare.get_pixel(0, 0)[0], 0);
    }
}
