//! # Graphics Module
//!
//! Everything needed to put a lit 3D scene on screen.
//!
//! - **Camera** ([`camera`]) - perspective camera and damped orbit controls
//! - **Environment** ([`environment`]) - HDR panorama loading and prefiltering
//! - **Geometry** ([`geometry`]) - procedural meshes
//! - **Rendering** ([`rendering`]) - the wgpu render engine behind [`RenderTarget`]
//! - **Resources** ([`resources`]) - materials, textures, uniforms and bind groups
//! - **Scene** ([`scene`]) - meshes, environment and background
//!
//! [`RenderTarget`]: rendering::RenderTarget

pub mod camera;
pub mod clock;
pub mod environment;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitControls, OrbitControlsConfig, PerspectiveCamera};
pub use clock::Clock;
pub use environment::{EnvironmentLoader, EnvironmentMap, EnvironmentSource, HdrImage};
pub use rendering::{RenderEngine, RenderSettings, RenderTarget};
pub use scene::{Background, Mesh, MeshId, Scene};
