//! Image encoding: `DynamicImage` → base64 PNG data-URI.
//!
//! OpenAI-compatible vision endpoints accept images as data-URIs embedded
//! in the JSON request body. PNG is used regardless of the upload's
//! original format — it is lossless, so the model sees exactly the pixels
//! the user uploaded.

use crate::error::SwagAiError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// Encode a decoded image as a `data:image/png;base64,…` URI for the
/// vision request.
pub fn encode_image_data_uri(img: &DynamicImage) -> Result<String, SwagAiError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| SwagAiError::ImageEncode {
            detail: e.to_string(),
        })?;

    let b64 = STANDARD.encode(&buf);
    debug!("Encoded image → {} bytes base64", b64.len());

    Ok(format!("data:image/png;base64,{b64}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let uri = encode_image_data_uri(&img).expect("encode should succeed");
        let b64 = uri
            .strip_prefix("data:image/png;base64,")
            .expect("data-URI prefix");
        let decoded = STANDARD.decode(b64).expect("valid base64");
        // PNG magic
        assert_eq!(&decoded[..4], &[0x89, b'P', b'N', b'G']);
    }
}
