//! Document extraction: PDF bytes → per-page text and embedded images.
//!
//! The [`DocumentExtractor`] trait mirrors the gateway trait's purpose:
//! screen handlers stay testable with a scripted extractor while
//! production uses [`PdfiumExtractor`]. pdfium wraps a C++ library with
//! thread-local state, so the real extraction runs inside
//! `tokio::task::spawn_blocking` rather than on the async workers.

use crate::error::SwagAiError;
use async_trait::async_trait;
use image::DynamicImage;
use pdfium_render::prelude::*;
use tracing::{debug, info};

/// One page's extraction result. `text` is `None` when the page carries no
/// extractable text (pure-image scans); images appear in page order.
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    pub text: Option<String>,
    pub images: Vec<DynamicImage>,
}

/// External component turning PDF bytes into per-page text and images.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    /// Extract every page of the document, in order. Called once per
    /// upload; the result is wholly owned by the caller.
    async fn extract(&self, pdf_bytes: &[u8]) -> Result<Vec<ExtractedPage>, SwagAiError>;
}

/// pdfium-backed extractor.
#[derive(Debug, Default)]
pub struct PdfiumExtractor;

impl PdfiumExtractor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentExtractor for PdfiumExtractor {
    async fn extract(&self, pdf_bytes: &[u8]) -> Result<Vec<ExtractedPage>, SwagAiError> {
        // Validate the magic bytes up front so a mis-typed upload gets a
        // meaningful error rather than a pdfium parse failure.
        if pdf_bytes.len() >= 4 && &pdf_bytes[..4] != b"%PDF" {
            let mut magic = [0u8; 4];
            magic.copy_from_slice(&pdf_bytes[..4]);
            return Err(SwagAiError::NotAPdf { magic });
        }

        let bytes = pdf_bytes.to_vec();
        tokio::task::spawn_blocking(move || extract_blocking(&bytes))
            .await
            .map_err(|e| SwagAiError::Internal(format!("extraction task panicked: {e}")))?
    }
}

/// Blocking implementation of the extraction pass.
fn extract_blocking(bytes: &[u8]) -> Result<Vec<ExtractedPage>, SwagAiError> {
    let pdfium = Pdfium::default();

    let document = pdfium
        .load_pdf_from_byte_slice(bytes, None)
        .map_err(|e| SwagAiError::Extraction {
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    info!("PDF loaded: {} pages", pages.len());

    let mut extracted = Vec::with_capacity(pages.len() as usize);

    for (index, page) in pages.iter().enumerate() {
        let text = page
            .text()
            .map(|t| t.all())
            .ok()
            .filter(|t| !t.is_empty());

        let mut images = Vec::new();
        for object in page.objects().iter() {
            if let Some(image_object) = object.as_image_object() {
                match image_object.get_raw_image() {
                    Ok(img) => images.push(img),
                    // A single undecodable embedded image is not worth
                    // failing the whole document over.
                    Err(e) => debug!("Page {}: skipping embedded image: {e:?}", index + 1),
                }
            }
        }

        debug!(
            "Page {}: {} chars of text, {} images",
            index + 1,
            text.as_deref().map_or(0, str::len),
            images.len()
        );

        extracted.push(ExtractedPage { text, images });
    }

    Ok(extracted)
}
