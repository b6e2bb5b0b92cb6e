//! Image-captioning screen: decode an upload, preview it, caption it.

use crate::error::SwagAiError;
use crate::gateway::ModelGateway;
use crate::prompts::CAPTION_PROMPT;
use crate::render::RenderOp;
use crate::screens::{Phase, Screen};
use image::DynamicImage;
use tracing::{debug, warn};

/// Preview dimensions shown next to the caption.
pub const PREVIEW_WIDTH: u32 = 800;
pub const PREVIEW_HEIGHT: u32 = 500;

/// Extensions the upload widget accepts.
pub const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An uploaded image: raw bytes plus the declared extension. Transient —
/// owned by the render pass that carries it, never persisted.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub extension: String,
}

/// Events the captioning screen reacts to.
#[derive(Debug)]
pub enum CaptionEvent {
    /// The screen was selected; nothing to show yet.
    Activated,
    /// The user pressed the generate button with an image present.
    GenerateCaption(UploadedImage),
}

/// Captioning screen state — purely the request phase; uploads are
/// transient and never stored here.
#[derive(Debug, Default)]
pub struct CaptionState {
    pub phase: Phase,
}

/// Handle one captioning event.
///
/// The preview is resized to exactly 800×500 before display; the gateway
/// receives the decoded image at its original size. Any decode or gateway
/// failure renders inline and leaves the page usable.
pub async fn handle(
    state: &mut CaptionState,
    event: CaptionEvent,
    gateway: &dyn ModelGateway,
) -> Vec<RenderOp> {
    let mut ops = vec![RenderOp::Title(Screen::ImageCaptioning.title().to_string())];

    let upload = match event {
        CaptionEvent::Activated => return ops,
        CaptionEvent::GenerateCaption(upload) => upload,
    };

    let image = match decode_upload(&upload) {
        Ok(image) => image,
        Err(e) => {
            warn!("Caption upload rejected: {e}");
            ops.push(RenderOp::Error(e.to_string()));
            return ops;
        }
    };

    let preview = image.resize_exact(
        PREVIEW_WIDTH,
        PREVIEW_HEIGHT,
        image::imageops::FilterType::Lanczos3,
    );
    ops.push(RenderOp::Image {
        image: preview,
        caption: None,
    });

    state.phase = Phase::AwaitingResponse;
    match gateway.caption_image(CAPTION_PROMPT, &image).await {
        Ok(caption) => {
            debug!("Caption received ({} chars)", caption.len());
            ops.push(RenderOp::Info(caption));
        }
        Err(e) => {
            warn!("caption_image failed: {e}");
            ops.push(RenderOp::Error(e.to_string()));
        }
    }
    state.phase = Phase::Idle;

    ops
}

/// Validate the declared extension and decode the bytes.
fn decode_upload(upload: &UploadedImage) -> Result<DynamicImage, SwagAiError> {
    let extension = upload.extension.to_ascii_lowercase();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(SwagAiError::UnsupportedImageType { extension });
    }
    image::load_from_memory(&upload.bytes).map_err(|e| SwagAiError::ImageDecode {
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_check_is_case_insensitive() {
        let upload = UploadedImage {
            bytes: vec![],
            extension: "PNG".into(),
        };
        // Passes the extension gate, fails decode (empty bytes).
        assert!(matches!(
            decode_upload(&upload),
            Err(SwagAiError::ImageDecode { .. })
        ));
    }

    #[test]
    fn rejects_unlisted_extension() {
        let upload = UploadedImage {
            bytes: vec![0; 16],
            extension: "webp".into(),
        };
        assert!(matches!(
            decode_upload(&upload),
            Err(SwagAiError::UnsupportedImageType { .. })
        ));
    }
}
