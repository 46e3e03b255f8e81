//! The renderer interface the application drives
//!
//! [`RenderEngine`](super::RenderEngine) is the real implementation; the
//! application core only ever sees this trait.

use crate::{
    error::RenderError,
    gfx::{
        camera::PerspectiveCamera,
        environment::{EnvironmentMap, HdrImage},
        scene::Scene,
    },
};

/// Everything an overlay (the debug panel) needs to draw on top of a frame
pub struct OverlayPass<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
}

pub trait RenderTarget {
    /// Current surface size in pixels
    fn size(&self) -> (u32, u32);

    /// Resizes the surface and every size-dependent target; zero sizes are ignored.
    /// Sizes beyond [`max_texture_dimension`](Self::max_texture_dimension) are
    /// scaled down to fit, keeping the aspect ratio.
    fn resize(&mut self, width: u32, height: u32);

    /// Largest texture side the device accepts
    fn max_texture_dimension(&self) -> u32;

    /// Converts a panorama into a roughness-prefiltered environment map
    fn prefilter_environment(&mut self, image: &HdrImage) -> Result<EnvironmentMap, RenderError>;

    /// Draws `scene` from `camera`, then runs `overlay` on the final view
    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        overlay: &mut dyn FnMut(OverlayPass<'_>),
    ) -> Result<(), RenderError>;
}
