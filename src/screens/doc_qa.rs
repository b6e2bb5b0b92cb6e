//! Document Q&A screen: extract a PDF once, then answer questions over it.

use crate::extract::{DocumentExtractor, ExtractedPage};
use crate::gateway::ModelGateway;
use crate::prompts::context_question_prompt;
use crate::render::RenderOp;
use crate::screens::{Phase, Screen};
use image::DynamicImage;
use tracing::{info, warn};

/// The derived view of one uploaded PDF: all page text concatenated, every
/// embedded image in page order. Wholly replaced on re-upload.
#[derive(Debug, Clone, Default)]
pub struct ExtractedDocument {
    pub full_text: String,
    pub images: Vec<DynamicImage>,
}

/// Flatten per-page extraction into the document view.
///
/// Each page contributes its text followed by a newline; pages with
/// empty/absent text contribute nothing. Images from all pages are
/// collected into one ordered sequence.
pub fn assemble_document(pages: Vec<ExtractedPage>) -> ExtractedDocument {
    let mut full_text = String::new();
    let mut images = Vec::new();

    for page in pages {
        if let Some(text) = page.text {
            if !text.is_empty() {
                full_text.push_str(&text);
                full_text.push('\n');
            }
        }
        images.extend(page.images);
    }

    ExtractedDocument { full_text, images }
}

/// Events the document-Q&A screen reacts to.
#[derive(Debug)]
pub enum DocQaEvent {
    /// The screen was selected; render whatever was extracted before.
    Activated,
    /// A PDF was uploaded, replacing any previous document.
    Uploaded(Vec<u8>),
    /// The user asked a question about the current document.
    Asked(String),
}

/// Document-Q&A screen state.
#[derive(Debug, Default)]
pub struct DocQaState {
    pub document: Option<ExtractedDocument>,
    pub phase: Phase,
}

/// Handle one document-Q&A event and render the whole page.
///
/// Upload runs the extractor exactly once and replaces the stored document
/// entirely — there is no incremental update. Asking requires non-empty
/// question text and an extracted document; the prompt sent to the gateway
/// is exactly `full_text + "\n\nQuestion: " + question`.
pub async fn handle(
    state: &mut DocQaState,
    event: DocQaEvent,
    gateway: &dyn ModelGateway,
    extractor: &dyn DocumentExtractor,
) -> Vec<RenderOp> {
    let mut ops = vec![RenderOp::Title(Screen::DocumentQa.title().to_string())];

    match event {
        DocQaEvent::Activated => {
            render_document(state, &mut ops);
        }
        DocQaEvent::Uploaded(bytes) => {
            state.phase = Phase::AwaitingResponse;
            match extractor.extract(&bytes).await {
                Ok(pages) => {
                    let document = assemble_document(pages);
                    info!(
                        "Extracted {} chars of text and {} images",
                        document.full_text.len(),
                        document.images.len()
                    );
                    state.document = Some(document);
                    render_document(state, &mut ops);
                }
                Err(e) => {
                    warn!("PDF extraction failed: {e}");
                    // The previous document is retained; keep it on screen
                    // alongside the failure.
                    render_document(state, &mut ops);
                    ops.push(RenderOp::Error(e.to_string()));
                }
            }
            state.phase = Phase::Idle;
        }
        DocQaEvent::Asked(question) => {
            render_document(state, &mut ops);

            if question.is_empty() {
                return ops;
            }
            let Some(document) = &state.document else {
                // Question without a document: the upload widget gates this
                // in a real surface; render-side it is simply a no-op.
                return ops;
            };

            let prompt = context_question_prompt(&document.full_text, &question);
            state.phase = Phase::AwaitingResponse;
            match gateway.answer_over_context(&prompt).await {
                Ok(answer) => ops.push(RenderOp::Markdown(answer)),
                Err(e) => {
                    warn!("answer_over_context failed: {e}");
                    ops.push(RenderOp::Error(e.to_string()));
                }
            }
            state.phase = Phase::Idle;
        }
    }

    ops
}

/// Emit the extracted text area and the image gallery for the current
/// document, if any.
fn render_document(state: &DocQaState, ops: &mut Vec<RenderOp>) {
    let Some(document) = &state.document else {
        return;
    };

    ops.push(RenderOp::TextArea {
        label: "Extracted Text".to_string(),
        content: document.full_text.clone(),
    });

    if !document.images.is_empty() {
        ops.push(RenderOp::Subheading(
            "Images Extracted from PDF:".to_string(),
        ));
        for (idx, image) in document.images.iter().enumerate() {
            ops.push(RenderOp::Image {
                image: image.clone(),
                caption: Some(format!("Image {}", idx + 1)),
            });
        }
    }
}
