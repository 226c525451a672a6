//! Image encoding: read a file into a transport payload tagged with a MIME type.
//!
//! No decoding happens here. The MIME type comes from the [`MimePolicy`]:
//! magic-byte sniffing by default, the file extension, or a fixed `image/png`
//! for parity with older runs.

use image::ImageFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PipelineError, PipelineResult};
use crate::llm::provider::ImageInput;

const FALLBACK_MEDIA_TYPE: &str = "image/png";

/// How the MIME type sent with an image is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MimePolicy {
    /// Sniff magic bytes, then fall back to the extension, then to PNG
    #[default]
    Content,
    /// Use the file extension, falling back to PNG
    Extension,
    /// Always `image/png`, whatever the file actually holds
    FixedPng,
}

impl MimePolicy {
    /// Parse a policy name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "content" => Some(Self::Content),
            "extension" => Some(Self::Extension),
            "fixed-png" | "fixed_png" | "png" => Some(Self::FixedPng),
            _ => None,
        }
    }
}

/// Reads image files into [`ImageInput`] payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageEncoder {
    policy: MimePolicy,
}

impl ImageEncoder {
    /// Create an encoder with the given MIME policy.
    pub fn new(policy: MimePolicy) -> Self {
        Self { policy }
    }

    /// Read `path` and wrap its bytes in a payload.
    ///
    /// Fails with [`PipelineError::FileNotFound`] before reading anything if the
    /// path does not exist.
    pub async fn encode(&self, path: &Path) -> PipelineResult<ImageInput> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| PipelineError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        let media_type = self.media_type_for(path, &bytes);
        tracing::debug!(
            "Encoded {:?} ({} bytes, {media_type})",
            path,
            bytes.len()
        );
        Ok(ImageInput::from_bytes(&bytes, media_type))
    }

    /// Choose the MIME type for a file according to the policy.
    pub fn media_type_for(&self, path: &Path, bytes: &[u8]) -> &'static str {
        match self.policy {
            MimePolicy::Content => sniffed_media_type(bytes)
                .or_else(|| extension_media_type(path))
                .unwrap_or(FALLBACK_MEDIA_TYPE),
            MimePolicy::Extension => extension_media_type(path).unwrap_or(FALLBACK_MEDIA_TYPE),
            MimePolicy::FixedPng => {
                if let Some(actual) = sniffed_media_type(bytes) {
                    if actual != FALLBACK_MEDIA_TYPE {
                        tracing::warn!(
                            "{:?} looks like {actual} but is sent as {FALLBACK_MEDIA_TYPE} (mime_policy = fixed-png)",
                            path
                        );
                    }
                }
                FALLBACK_MEDIA_TYPE
            }
        }
    }
}

/// MIME type detected from the leading bytes, if recognizable.
fn sniffed_media_type(bytes: &[u8]) -> Option<&'static str> {
    image::guess_format(bytes).ok().and_then(format_media_type)
}

/// MIME type implied by the file extension, if known.
fn extension_media_type(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        _ => None,
    }
}

fn format_media_type(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Jpeg => Some("image/jpeg"),
        ImageFormat::Png => Some("image/png"),
        ImageFormat::WebP => Some("image/webp"),
        ImageFormat::Gif => Some("image/gif"),
        _ => None,
    }
}
