//! Prompt text sent to the model gateway.
//!
//! Centralising every prompt here keeps behaviour changes to one place and
//! lets unit tests inspect the exact strings without calling a real model.

/// Fixed prompt sent alongside an uploaded image on the captioning screen.
pub const CAPTION_PROMPT: &str = "Write a short caption for this image";

/// Build the document-Q&A prompt: the full extracted text, a literal
/// separator, then the user's question. The layout is exact — downstream
/// consumers (and tests) rely on it byte for byte.
pub fn context_question_prompt(full_text: &str, question: &str) -> String {
    format!("{full_text}\n\nQuestion: {question}")
}
