//! # Scene Management Module
//!
//! A deliberately flat scene: a list of meshes, an optional environment map
//! used for image-based lighting, and a background.
//!
//! ## Key Components
//!
//! - [`Scene`] - container for meshes, environment and background
//! - [`Mesh`] - geometry + [`StandardMaterial`] with a position/rotation/scale transform
//! - [`Euler`] - rotation angles in radians
//! - [`Vertex3D`] - GPU vertex layout
//!
//! [`StandardMaterial`]: crate::gfx::resources::material::StandardMaterial

pub mod object;
pub mod scene;
pub mod vertex;

pub use object::{Euler, Mesh, MeshId};
pub use scene::{Background, Scene};
pub use vertex::Vertex3D;
