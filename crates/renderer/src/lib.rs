//! Renderer crate for Deckshade.
//!
//! The module glues the gallery window, the `wgpu` effect pipelines and the
//! per-card pass executor together. The overall flow is:
//!
//! ```text
//!   CLI / deckshade
//!          │ RendererConfig + Gallery
//!          ▼
//!   run_gallery ──▶ winit event loop ──▶ SceneRenderer::render()
//!          ▲                                      │
//!          │ tick timers / input          ChainPlan ─▶ ping-pong passes ─▶ composite
//! ```
//!
//! `SceneRenderer` owns all GPU resources (surface, device, pipelines,
//! uniforms, card textures), while `run_gallery` is the thin entry point that
//! drives timers, input and frame pacing. Each card's enabled effects are
//! planned on the CPU by the `effects` crate and replayed here as one WGSL
//! render pass per stage.

mod cardimage;
mod context;
mod passes;
mod pipeline;
mod runtime;
mod uniforms;
mod window;

pub use runtime::{time_source_for_policy, FrameScheduler, RenderPolicy};
pub use window::run_gallery;

/// Everything the binary decides before handing control to the window loop.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Base window title; the focused card's title is appended to it.
    pub title: String,
    pub policy: RenderPolicy,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            surface_size: (393, 852),
            title: "Deckshade".to_string(),
            policy: RenderPolicy::default(),
        }
    }
}
