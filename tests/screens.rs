//! Integration tests for the four screen handlers.
//!
//! Every test drives `screens::dispatch` against scripted gateway and
//! extractor implementations — no network, no pdfium, no UI harness.

use async_trait::async_trait;
use image::{DynamicImage, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Mutex;
use swag_ai::screens::ask::AskEvent;
use swag_ai::screens::caption::{CaptionEvent, UploadedImage};
use swag_ai::screens::chat::ChatEvent;
use swag_ai::screens::doc_qa::DocQaEvent;
use swag_ai::{
    dispatch, DocumentExtractor, ExtractedPage, ModelGateway, RenderOp, Role, ScreenEvent,
    SessionContext, SessionId, SwagAiError,
};

// ── Scripted collaborators ───────────────────────────────────────────────────

/// Gateway that answers from a script and records every prompt it saw.
#[derive(Default)]
struct ScriptedGateway {
    /// Prompts received by caption/context/generate calls, and turn texts.
    prompts: Mutex<Vec<String>>,
    turn_count: Mutex<usize>,
    fail_start: bool,
    fail_send_turn: bool,
    fail_caption: bool,
    fail_answer: bool,
    fail_generate: bool,
}

impl ScriptedGateway {
    fn recorded(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    fn gateway_error() -> SwagAiError {
        SwagAiError::GatewayStatus {
            status: 503,
            detail: "scripted failure".into(),
        }
    }
}

#[async_trait]
impl ModelGateway for ScriptedGateway {
    async fn start_conversation(&self) -> Result<SessionId, SwagAiError> {
        if self.fail_start {
            return Err(Self::gateway_error());
        }
        Ok(SessionId::new())
    }

    async fn send_turn(&self, _session: SessionId, text: &str) -> Result<String, SwagAiError> {
        if self.fail_send_turn {
            return Err(Self::gateway_error());
        }
        self.prompts.lock().unwrap().push(text.to_string());
        let mut count = self.turn_count.lock().unwrap();
        *count += 1;
        Ok(format!("reply-{}", *count))
    }

    async fn caption_image(
        &self,
        prompt: &str,
        image: &DynamicImage,
    ) -> Result<String, SwagAiError> {
        if self.fail_caption {
            return Err(Self::gateway_error());
        }
        self.prompts
            .lock()
            .unwrap()
            .push(format!("{prompt} [{}x{}]", image.width(), image.height()));
        Ok("a scripted caption".to_string())
    }

    async fn answer_over_context(&self, prompt: &str) -> Result<String, SwagAiError> {
        if self.fail_answer {
            return Err(Self::gateway_error());
        }
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("scripted answer".to_string())
    }

    async fn generate(&self, prompt: &str) -> Result<String, SwagAiError> {
        if self.fail_generate {
            return Err(Self::gateway_error());
        }
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("scripted response".to_string())
    }
}

/// Extractor that returns a canned page list.
struct ScriptedExtractor {
    pages: Vec<ExtractedPage>,
}

impl ScriptedExtractor {
    fn with_texts(texts: &[Option<&str>]) -> Self {
        Self {
            pages: texts
                .iter()
                .map(|t| ExtractedPage {
                    text: t.map(str::to_string),
                    images: Vec::new(),
                })
                .collect(),
        }
    }

    fn empty() -> Self {
        Self { pages: Vec::new() }
    }
}

#[async_trait]
impl DocumentExtractor for ScriptedExtractor {
    async fn extract(&self, _pdf_bytes: &[u8]) -> Result<Vec<ExtractedPage>, SwagAiError> {
        Ok(self.pages.clone())
    }
}

/// Extractor that fails every call.
struct FailingExtractor;

#[async_trait]
impl DocumentExtractor for FailingExtractor {
    async fn extract(&self, _pdf_bytes: &[u8]) -> Result<Vec<ExtractedPage>, SwagAiError> {
        Err(SwagAiError::Extraction {
            detail: "scripted extraction failure".into(),
        })
    }
}

// ── Test helpers ─────────────────────────────────────────────────────────────

fn test_image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([0, 128, 255, 255]),
    ))
}

/// Encode a small valid PNG upload in memory.
fn png_upload() -> UploadedImage {
    let mut bytes = Vec::new();
    test_image(32, 20)
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .expect("in-memory PNG encode");
    UploadedImage {
        bytes,
        extension: "png".into(),
    }
}

fn errors_in(ops: &[RenderOp]) -> Vec<&RenderOp> {
    ops.iter().filter(|op| op.is_error()).collect()
}

// ── Chat ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn chat_history_alternates_after_n_submissions() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    for i in 0..3 {
        let event = ScreenEvent::Chat(ChatEvent::Submitted(format!("message {i}")));
        let ops = dispatch(&mut ctx, event, &gateway, &extractor).await;
        assert!(errors_in(&ops).is_empty(), "no errors expected");
    }

    let turns = ctx.chat.session.turns();
    assert_eq!(turns.len(), 6, "3 user + 3 assistant turns");
    assert!(ctx.chat.session.is_strictly_alternating());
    assert_eq!(turns[0].role, Role::User);
    assert_eq!(turns[0].text, "message 0");
    assert_eq!(turns[5].role, Role::Assistant);
    assert_eq!(turns[5].text, "reply-3");
}

#[tokio::test]
async fn chat_renders_full_history_every_pass() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    for text in ["one", "two"] {
        let event = ScreenEvent::Chat(ChatEvent::Submitted(text.into()));
        dispatch(&mut ctx, event, &gateway, &extractor).await;
    }

    // A plain activation re-renders everything said so far.
    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Chat(ChatEvent::Activated),
        &gateway,
        &extractor,
    )
    .await;
    let messages: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            RenderOp::ChatMessage { role, text } => Some((*role, text.as_str())),
            _ => None,
        })
        .collect();
    assert_eq!(
        messages,
        vec![
            ("user", "one"),
            ("assistant", "reply-1"),
            ("user", "two"),
            ("assistant", "reply-2"),
        ]
    );
}

#[tokio::test]
async fn chat_failure_rolls_back_user_turn() {
    let gateway = ScriptedGateway {
        fail_send_turn: true,
        ..Default::default()
    };
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Chat(ChatEvent::Submitted("doomed".into())),
        &gateway,
        &extractor,
    )
    .await;

    assert_eq!(errors_in(&ops).len(), 1, "failure must render inline");
    assert!(
        ctx.chat.session.turns().is_empty(),
        "unanswered user turn must be rolled back"
    );
    assert!(ctx.chat.session.is_strictly_alternating());
}

#[tokio::test]
async fn chat_start_failure_renders_inline_error() {
    let gateway = ScriptedGateway {
        fail_start: true,
        ..Default::default()
    };
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Chat(ChatEvent::Activated),
        &gateway,
        &extractor,
    )
    .await;
    assert_eq!(errors_in(&ops).len(), 1);
    assert!(ctx.chat.session.handle().is_none());
}

#[tokio::test]
async fn chat_empty_submission_is_a_no_op() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    dispatch(
        &mut ctx,
        ScreenEvent::Chat(ChatEvent::Submitted(String::new())),
        &gateway,
        &extractor,
    )
    .await;
    assert!(ctx.chat.session.turns().is_empty());
    assert!(gateway.recorded().is_empty(), "nothing sent to the gateway");
}

// ── Document Q&A ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn doc_text_concatenation_skips_empty_pages() {
    let gateway = ScriptedGateway::default();
    let extractor =
        ScriptedExtractor::with_texts(&[Some("alpha"), None, Some(""), Some("delta")]);
    let mut ctx = SessionContext::new();

    dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Uploaded(b"%PDF-1.7 fake".to_vec())),
        &gateway,
        &extractor,
    )
    .await;

    let document = ctx.doc_qa.document.as_ref().expect("document stored");
    assert_eq!(document.full_text, "alpha\ndelta\n");
}

#[tokio::test]
async fn reupload_replaces_document_entirely() {
    let gateway = ScriptedGateway::default();
    let mut ctx = SessionContext::new();

    let first = ScriptedExtractor {
        pages: vec![ExtractedPage {
            text: Some("old text".into()),
            images: vec![test_image(4, 4), test_image(4, 4)],
        }],
    };
    dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Uploaded(b"%PDF one".to_vec())),
        &gateway,
        &first,
    )
    .await;

    let second = ScriptedExtractor::with_texts(&[Some("new text")]);
    dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Uploaded(b"%PDF two".to_vec())),
        &gateway,
        &second,
    )
    .await;

    let document = ctx.doc_qa.document.as_ref().expect("document stored");
    assert_eq!(document.full_text, "new text\n");
    assert!(
        document.images.is_empty(),
        "old images must not survive a re-upload"
    );
}

#[tokio::test]
async fn doc_question_prompt_is_exact() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::with_texts(&[Some("page one"), Some("page two")]);
    let mut ctx = SessionContext::new();

    dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Uploaded(b"%PDF fake".to_vec())),
        &gateway,
        &extractor,
    )
    .await;
    let ops = dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Asked("What is this about?".into())),
        &gateway,
        &extractor,
    )
    .await;

    assert_eq!(
        gateway.recorded(),
        vec!["page one\npage two\n\n\nQuestion: What is this about?".to_string()]
    );
    assert!(ops
        .iter()
        .any(|op| matches!(op, RenderOp::Markdown(text) if text == "scripted answer")));
}

#[tokio::test]
async fn failed_reupload_keeps_previous_document_on_screen() {
    let gateway = ScriptedGateway::default();
    let mut ctx = SessionContext::new();

    let first = ScriptedExtractor::with_texts(&[Some("kept text")]);
    dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Uploaded(b"%PDF one".to_vec())),
        &gateway,
        &first,
    )
    .await;

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Uploaded(b"%PDF two".to_vec())),
        &gateway,
        &FailingExtractor,
    )
    .await;

    assert_eq!(errors_in(&ops).len(), 1, "failure must render inline");
    let document = ctx.doc_qa.document.as_ref().expect("document retained");
    assert_eq!(document.full_text, "kept text\n");
    assert!(
        ops.iter()
            .any(|op| matches!(op, RenderOp::TextArea { content, .. } if content == "kept text\n")),
        "retained document stays visible alongside the error"
    );
}

#[tokio::test]
async fn doc_answer_failure_renders_inline_and_keeps_document() {
    let gateway = ScriptedGateway {
        fail_answer: true,
        ..Default::default()
    };
    let extractor = ScriptedExtractor::with_texts(&[Some("context")]);
    let mut ctx = SessionContext::new();

    dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Uploaded(b"%PDF fake".to_vec())),
        &gateway,
        &extractor,
    )
    .await;
    let ops = dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Asked("lost cause?".into())),
        &gateway,
        &extractor,
    )
    .await;

    assert_eq!(errors_in(&ops).len(), 1);
    assert!(
        !ops.iter()
            .any(|op| matches!(op, RenderOp::Markdown(_))),
        "no answer rendered on failure"
    );
    assert!(ctx.doc_qa.document.is_some(), "document survives the failure");
}

#[tokio::test]
async fn doc_question_without_document_is_a_no_op() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Asked("anyone there?".into())),
        &gateway,
        &extractor,
    )
    .await;
    assert!(gateway.recorded().is_empty());
    assert!(errors_in(&ops).is_empty());
}

#[tokio::test]
async fn doc_images_render_with_one_based_captions() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor {
        pages: vec![
            ExtractedPage {
                text: Some("text".into()),
                images: vec![test_image(8, 8)],
            },
            ExtractedPage {
                text: None,
                images: vec![test_image(8, 8)],
            },
        ],
    };
    let mut ctx = SessionContext::new();

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::DocQa(DocQaEvent::Uploaded(b"%PDF fake".to_vec())),
        &gateway,
        &extractor,
    )
    .await;

    let captions: Vec<_> = ops
        .iter()
        .filter_map(|op| match op {
            RenderOp::Image { caption, .. } => caption.as_deref(),
            _ => None,
        })
        .collect();
    assert_eq!(captions, vec!["Image 1", "Image 2"]);
    assert!(ops
        .iter()
        .any(|op| matches!(op, RenderOp::Subheading(text) if text == "Images Extracted from PDF:")));
}

// ── Image captioning ─────────────────────────────────────────────────────────

#[tokio::test]
async fn caption_preview_is_exactly_800_by_500() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Caption(CaptionEvent::GenerateCaption(png_upload())),
        &gateway,
        &extractor,
    )
    .await;

    let preview = ops
        .iter()
        .find_map(|op| match op {
            RenderOp::Image { image, .. } => Some(image),
            _ => None,
        })
        .expect("preview rendered");
    assert_eq!((preview.width(), preview.height()), (800, 500));

    // The gateway saw the fixed prompt and the image at its original size.
    assert_eq!(
        gateway.recorded(),
        vec!["Write a short caption for this image [32x20]".to_string()]
    );
    assert!(ops
        .iter()
        .any(|op| matches!(op, RenderOp::Info(text) if text == "a scripted caption")));
}

#[tokio::test]
async fn caption_gateway_failure_keeps_preview_visible() {
    let gateway = ScriptedGateway {
        fail_caption: true,
        ..Default::default()
    };
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Caption(CaptionEvent::GenerateCaption(png_upload())),
        &gateway,
        &extractor,
    )
    .await;

    assert_eq!(errors_in(&ops).len(), 1, "failure must render inline");
    assert!(
        ops.iter().any(|op| matches!(op, RenderOp::Image { .. })),
        "preview stays visible alongside the error"
    );
    assert!(
        !ops.iter().any(|op| matches!(op, RenderOp::Info(_))),
        "no caption rendered on failure"
    );
}

#[tokio::test]
async fn corrupt_image_yields_inline_error_not_a_crash() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let upload = UploadedImage {
        bytes: b"definitely not image data".to_vec(),
        extension: "jpg".into(),
    };
    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Caption(CaptionEvent::GenerateCaption(upload)),
        &gateway,
        &extractor,
    )
    .await;

    assert_eq!(errors_in(&ops).len(), 1);
    assert!(gateway.recorded().is_empty(), "gateway must not be called");
}

#[tokio::test]
async fn unsupported_extension_yields_inline_error() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let upload = UploadedImage {
        bytes: png_upload().bytes,
        extension: "bmp".into(),
    };
    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Caption(CaptionEvent::GenerateCaption(upload)),
        &gateway,
        &extractor,
    )
    .await;
    assert_eq!(errors_in(&ops).len(), 1);
}

// ── Ask anything ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn ask_forwards_prompt_verbatim_and_displays_reply_untouched() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Ask(AskEvent::Submitted("2+2?".into())),
        &gateway,
        &extractor,
    )
    .await;

    assert_eq!(gateway.recorded(), vec!["2+2?".to_string()]);
    assert!(ops
        .iter()
        .any(|op| matches!(op, RenderOp::Markdown(text) if text == "scripted response")));
}

#[tokio::test]
async fn ask_failure_renders_inline_error() {
    let gateway = ScriptedGateway {
        fail_generate: true,
        ..Default::default()
    };
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    let ops = dispatch(
        &mut ctx,
        ScreenEvent::Ask(AskEvent::Submitted("doomed".into())),
        &gateway,
        &extractor,
    )
    .await;

    assert_eq!(errors_in(&ops).len(), 1);
    assert!(!ops.iter().any(|op| matches!(op, RenderOp::Markdown(_))));
}

#[tokio::test]
async fn ask_keeps_no_state_between_submissions() {
    let gateway = ScriptedGateway::default();
    let extractor = ScriptedExtractor::empty();
    let mut ctx = SessionContext::new();

    for prompt in ["first", "second"] {
        dispatch(
            &mut ctx,
            ScreenEvent::Ask(AskEvent::Submitted(prompt.into())),
            &gateway,
            &extractor,
        )
        .await;
    }
    // Each call carried only its own prompt — no accumulated context.
    assert_eq!(gateway.recorded(), vec!["first", "second"]);
}
