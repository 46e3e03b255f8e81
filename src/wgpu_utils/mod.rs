// src/wgpu_utils/mod.rs
//! Small wgpu helpers shared by the render engine and the environment prefilter.

pub mod binding_types;
pub mod uniform_buffer;

pub use binding_types::*;
pub use uniform_buffer::UniformBuffer;
