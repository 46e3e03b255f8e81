//! Test doubles shared by the unit tests

use std::path::PathBuf;

use image::{codecs::hdr::HdrEncoder, Rgb};

use crate::{
    error::RenderError,
    gfx::{
        camera::PerspectiveCamera,
        environment::{EnvironmentId, EnvironmentMap, HdrImage, PrefilterPlan},
        rendering::{OverlayPass, RenderSettings, RenderTarget},
        scene::Scene,
    },
};

/// Encodes a `width` x `height` Radiance image whose pixels come from `pixel`
pub fn encode_hdr(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [f32; 3]) -> Vec<u8> {
    let data: Vec<Rgb<f32>> = (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .map(|(x, y)| Rgb(pixel(x, y)))
        .collect();

    let mut bytes = Vec::new();
    HdrEncoder::new(&mut bytes)
        .encode(&data, width as usize, height as usize)
        .unwrap();
    bytes
}

/// Writes `bytes` to a per-process file in the temp directory
pub fn write_temp_file(name: &str, bytes: &[u8]) -> PathBuf {
    let path = std::env::temp_dir().join(format!("sketchbook-{}-{}", std::process::id(), name));
    std::fs::write(&path, bytes).unwrap();
    path
}

/// GPU-free [`RenderTarget`] that records what it was asked to do
#[derive(Debug)]
pub struct FakeRenderer {
    pub size: (u32, u32),
    pub resizes: Vec<(u32, u32)>,
    pub render_count: usize,
    pub prefiltered: Vec<(u32, u32)>,
    pub max_texture_dimension: u32,
    next_id: u32,
}

impl FakeRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            resizes: Vec::new(),
            render_count: 0,
            prefiltered: Vec::new(),
            max_texture_dimension: 4096,
            next_id: 0,
        }
    }

    pub fn with_max_texture_dimension(mut self, max: u32) -> Self {
        self.max_texture_dimension = max;
        self
    }
}

impl RenderTarget for FakeRenderer {
    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        let size = RenderSettings::clamp_surface_size(width, height, self.max_texture_dimension);
        self.size = size;
        self.resizes.push(size);
    }

    fn max_texture_dimension(&self) -> u32 {
        self.max_texture_dimension
    }

    fn prefilter_environment(&mut self, image: &HdrImage) -> Result<EnvironmentMap, RenderError> {
        let (width, height) = (image.width(), image.height());
        if width > self.max_texture_dimension || height > self.max_texture_dimension {
            return Err(RenderError::TextureTooLarge {
                width,
                height,
                limit: self.max_texture_dimension,
            });
        }

        self.prefiltered.push((width, height));
        let plan = PrefilterPlan::for_source(width, height);
        let (base_width, base_height) = plan.base_size();
        let id = EnvironmentId(self.next_id);
        self.next_id += 1;
        Ok(EnvironmentMap::new(id, base_width, base_height, plan.mip_level_count()))
    }

    fn render(
        &mut self,
        _scene: &Scene,
        _camera: &PerspectiveCamera,
        _overlay: &mut dyn FnMut(OverlayPass<'_>),
    ) -> Result<(), RenderError> {
        self.render_count += 1;
        Ok(())
    }
}
