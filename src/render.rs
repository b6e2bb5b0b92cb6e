//! Render instructions: what a screen handler wants shown, decoupled from
//! any concrete presentation surface.
//!
//! Handlers return a flat `Vec<RenderOp>` describing the full page for the
//! current state and event — the surface (CLI, web, tests) re-renders from
//! scratch every interaction, so ops never patch earlier output.

use image::DynamicImage;

/// One display instruction, emitted in page order.
#[derive(Debug, Clone)]
pub enum RenderOp {
    /// Page title, first op of every render pass.
    Title(String),
    /// A secondary heading.
    Subheading(String),
    /// One conversation turn, tagged with its display role.
    ChatMessage { role: &'static str, text: String },
    /// Model output rendered as markdown.
    Markdown(String),
    /// A highlighted informational callout (caption results).
    Info(String),
    /// An inline error message; the page stays usable.
    Error(String),
    /// An editable multi-line text area.
    TextArea { label: String, content: String },
    /// A decoded image with an optional caption line.
    Image {
        image: DynamicImage,
        caption: Option<String>,
    },
}

impl RenderOp {
    /// True for ops that report a failure.
    pub fn is_error(&self) -> bool {
        matches!(self, RenderOp::Error(_))
    }
}
