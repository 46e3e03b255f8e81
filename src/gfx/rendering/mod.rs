// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles render pipelines, GPU resource management, and frame rendering.

pub mod pipeline_manager;
pub mod render_engine;
pub mod render_pass_ext;
pub mod settings;
pub mod target;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager};
pub use render_engine::RenderEngine;
pub use settings::{OutputEncoding, RenderSettings, ToneMapping};
pub use target::{OverlayPass, RenderTarget};
