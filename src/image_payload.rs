//! Uploaded images and their transport encoding.
//!
//! The payload sent to the model is the base64 part of a data URL, i.e.
//! everything after the first comma of `data:<mime>;base64,<data>`, paired
//! with the MIME type the upload declared.

use axum::body::Bytes;
use base64::{engine::general_purpose, Engine as _};
use image::ImageFormat;

const FALLBACK_MIME: &str = "application/octet-stream";

/// The image the user currently holds. Cheap to clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime_type: String,
    pub data: Bytes,
}

/// Base64 data plus MIME type, re-derived for every analysis request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImagePayload {
    pub data: String,
    pub mime_type: String,
}

impl UploadedImage {
    /// Build an upload from a multipart field. When the browser did not
    /// declare a usable content type, the format is sniffed from the bytes.
    pub fn new(
        file_name: impl Into<String>,
        declared_mime: Option<&str>,
        data: impl Into<Bytes>,
    ) -> Self {
        let data = data.into();
        let mime_type = match declared_mime.map(str::trim) {
            Some(mime) if !mime.is_empty() && mime != FALLBACK_MIME => mime.to_string(),
            _ => sniff_mime(&data).unwrap_or(FALLBACK_MIME).to_string(),
        };

        Self {
            file_name: file_name.into(),
            mime_type,
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            general_purpose::STANDARD.encode(&self.data)
        )
    }

    pub fn encode(&self) -> EncodedImagePayload {
        let data_url = self.data_url();
        let data = data_url
            .split_once(',')
            .map(|(_, data)| data.to_string())
            .unwrap_or_default();

        EncodedImagePayload {
            data,
            mime_type: self.mime_type.clone(),
        }
    }
}

fn sniff_mime(data: &[u8]) -> Option<&'static str> {
    let mime = match image::guess_format(data).ok()? {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::Gif => "image/gif",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        ImageFormat::Avif => "image/avif",
        ImageFormat::Ico => "image/x-icon",
        _ => return None,
    };
    Some(mime)
}
