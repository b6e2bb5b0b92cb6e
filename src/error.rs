//! Error types for the swag-ai library.
//!
//! One enum covers the whole taxonomy because every failure here is
//! surfaced the same way: handlers catch it and render an inline
//! [`crate::render::RenderOp::Error`] message, leaving the screen usable.
//! There is no transient/permanent distinction and nothing is retried.

use thiserror::Error;

/// All errors returned by the swag-ai library.
#[derive(Debug, Error)]
pub enum SwagAiError {
    // ── Upload errors ─────────────────────────────────────────────────────
    /// Uploaded image has an extension outside the accepted set (jpg/jpeg/png).
    #[error("Unsupported image type '.{extension}' — accepted: jpg, jpeg, png")]
    UnsupportedImageType { extension: String },

    /// Uploaded image bytes could not be decoded.
    #[error("Error processing the image: {detail}")]
    ImageDecode { detail: String },

    /// Uploaded document does not start with the PDF magic bytes.
    #[error("Uploaded file is not a valid PDF (first bytes: {magic:?})")]
    NotAPdf { magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// pdfium could not open or read the document.
    #[error("PDF extraction failed: {detail}")]
    Extraction { detail: String },

    // ── Gateway errors ────────────────────────────────────────────────────
    /// No API key was configured or found in the environment.
    #[error("Model gateway is not configured.\n{hint}")]
    ProviderNotConfigured { hint: String },

    /// The HTTP request to the model API could not be sent or read.
    #[error("Model gateway request failed: {detail}")]
    GatewayRequest { detail: String },

    /// The model API answered with a non-success HTTP status.
    #[error("Model gateway returned HTTP {status}: {detail}")]
    GatewayStatus { status: u16, detail: String },

    /// The model API answered 200 but the body carried no usable text.
    #[error("Model gateway returned a response with no content: {detail}")]
    EmptyResponse { detail: String },

    /// `send_turn` was called with a handle the gateway never issued.
    #[error("Unknown conversation handle: {handle}")]
    UnknownConversation { handle: String },

    /// Encoding an image for the vision request failed.
    #[error("Failed to encode image for the vision request: {detail}")]
    ImageEncode { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
