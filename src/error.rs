//! Error types
//!
//! Every failure in the crate is terminal for the sketch: nothing is retried.
//! Failures that happen before the first frame are reported as
//! [`InitializationFailure`] so callers can tell a broken start-up from a
//! runtime fault.

use std::path::PathBuf;

use thiserror::Error;

/// GPU-side failures
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create a rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable graphics adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    #[error("surface offers no usable texture format")]
    NoSurfaceFormat,

    #[error("failed to acquire the next frame: {0}")]
    Frame(#[from] wgpu::SurfaceError),

    #[error("{width}x{height} texture exceeds the device limit of {limit}")]
    TextureTooLarge { width: u32, height: u32, limit: u32 },

    #[error("render pipeline '{0}' could not be created")]
    MissingPipeline(String),
}

/// Failures while fetching, decoding or prefiltering an environment map
#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a Radiance HDR image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("environment image has no pixels")]
    Empty,

    #[error("environment fetch worker exited before delivering a result")]
    WorkerLost,

    #[error("failed to prefilter environment: {0}")]
    Prefilter(#[from] RenderError),
}

/// Invalid debug panel registrations
#[derive(Debug, Error, PartialEq)]
pub enum PanelError {
    #[error("a parameter named '{0}' is already registered")]
    DuplicateName(String),

    #[error("parameter '{name}' needs min < max and a positive step (got {min}..{max} step {step})")]
    InvalidRange {
        name: String,
        min: f32,
        max: f32,
        step: f32,
    },
}

/// Anything that stops a sketch from reaching its first frame
#[derive(Debug, Error)]
pub enum InitializationFailure {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[source] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create renderer: {0}")]
    Renderer(#[from] RenderError),

    #[error("sketch setup failed: {0:#}")]
    Setup(#[source] anyhow::Error),
}

/// Top-level error returned by [`AppHost`](crate::app::AppHost)
#[derive(Debug, Error)]
pub enum AppError {
    #[error("initialization failed: {0}")]
    Initialization(#[from] InitializationFailure),

    #[error("rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}
