use std::fmt;
use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};

use crate::error::{CaptureError, Result};

/// An encoded image or video carried as a `data:` URI
#[derive(Clone, PartialEq, Eq)]
pub struct DataUri {
    mime: String,
    bytes: Vec<u8>,
}

impl DataUri {
    pub fn new<S: Into<String>>(mime: S, bytes: Vec<u8>) -> Self {
        Self { mime: mime.into(), bytes }
    }

    /// Parse a `data:<mime>;base64,<payload>` string
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = |details: &str| CaptureError::InvalidDataUri { details: details.to_string() };

        let rest = uri.strip_prefix("data:").ok_or_else(|| invalid("missing data: prefix"))?;
        let (header, payload) = rest.split_once(',').ok_or_else(|| invalid("missing payload"))?;
        let mime = header
            .strip_suffix(";base64")
            .ok_or_else(|| invalid("only base64 payloads are supported"))?;
        if mime.is_empty() {
            return Err(invalid("missing mime type").into());
        }

        let bytes = BASE64.decode(payload.trim()).map_err(|e| invalid(&e.to_string()))?;
        Ok(Self::new(mime, bytes))
    }

    /// Encode an RGBA frame as PNG
    pub fn from_png(frame: &RgbaImage) -> Result<Self> {
        let mut buffer = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(frame.clone())
            .write_to(&mut buffer, ImageOutputFormat::Png)
            .map_err(|e| CaptureError::EncodingFailed { reason: e.to_string() })?;
        Ok(Self::new("image/png", buffer.into_inner()))
    }

    /// Decode the payload as an image
    pub fn decode_image(&self) -> Result<DynamicImage> {
        image::load_from_memory(&self.bytes)
            .map_err(|e| CaptureError::EncodingFailed { reason: e.to_string() }.into())
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Base64 payload without the `data:` header
    pub fn base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime, self.base64())
    }
}

impl fmt::Debug for DataUri {
    // Payloads are megabytes; never dump them into logs
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUri")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A still frame taken from the camera, plus the outfit description once known
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedImage {
    pub image: DataUri,
    pub analysis: Option<String>,
}

impl CapturedImage {
    pub fn new(image: DataUri) -> Self {
        Self { image, analysis: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_png_frame_survives_data_uri() {
        let frame = RgbaImage::from_fn(4, 2, |x, _| Rgba([x as u8 * 60, 0, 0, 255]));
        let uri = DataUri::from_png(&frame).unwrap();
        assert_eq!(uri.mime(), "image/png");

        let parsed = DataUri::parse(&uri.to_string()).unwrap();
        assert_eq!(parsed, uri);
        assert_eq!(parsed.decode_image().unwrap().to_rgba8(), frame);
    }

    #[test]
    fn test_rejects_malformed_uris() {
        assert!(DataUri::parse("image/png;base64,AAAA").is_err());
        assert!(DataUri::parse("data:image/png,AAAA").is_err());
        assert!(DataUri::parse("data:;base64,AAAA").is_err());
        assert!(DataUri::parse("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_debug_omits_payload() {
        let uri = DataUri::new("video/mp4", vec![0; 2048]);
        let debug = format!("{:?}", uri);
        assert!(debug.contains("2048"));
        assert!(!debug.contains("AAAA"));
    }
}
