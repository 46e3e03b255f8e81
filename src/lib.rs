// src/lib.rs
//! Sketchbook
//!
//! A small scaffold for 3D sketches built on wgpu and winit: an HDR
//! environment map for lighting and background, a damped orbit camera and a
//! Dear ImGui debug panel of live parameters.

pub mod app;
pub mod demo;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod sketch;
pub mod ui;
pub mod wgpu_utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use app::{AppConfig, AppCore, AppHost, StopHandle};
pub use error::AppError;
pub use sketch::{FrameContext, SetupContext, Sketch};

