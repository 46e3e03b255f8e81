//! Roughness-prefiltered environment maps (PMREM)
//!
//! The output keeps the equirectangular layout of the source panorama. Every
//! mip level holds the radiance seen by a GGX lobe of increasing roughness,
//! so shading can pick a level with `roughness * max_lod`.

use std::sync::Arc;

use log::debug;
use wgpu::{Device, Queue};

use crate::{
    error::RenderError,
    gfx::{
        rendering::pipeline_manager::{PipelineConfig, PipelineManager},
        resources::texture_resource::TextureResource,
    },
    wgpu_utils::{binding_types, UniformBuffer},
};

use super::HdrImage;

/// One mip level of the prefiltered map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrefilterLevel {
    pub width: u32,
    pub height: u32,
    pub roughness: f32,
    pub sample_count: u32,
}

/// Mip chain layout for a given source panorama
#[derive(Debug, Clone, PartialEq)]
pub struct PrefilterPlan {
    pub levels: Vec<PrefilterLevel>,
}

impl PrefilterPlan {
    pub const MAX_WIDTH: u32 = 1024;
    pub const MIN_WIDTH: u32 = 8;
    pub const SAMPLE_COUNT: u32 = 256;

    pub fn for_source(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let base_width = width.min(Self::MAX_WIDTH);
        let base_height = ((height as u64 * base_width as u64) / width as u64).max(1) as u32;

        // Sizes follow wgpu's mip rule: level i is max(1, base >> i)
        let mut sizes = vec![(base_width, base_height)];
        let (mut w, mut h) = (base_width, base_height);
        while w / 2 >= Self::MIN_WIDTH {
            w /= 2;
            h = (h / 2).max(1);
            sizes.push((w, h));
        }

        let last = (sizes.len() - 1).max(1) as f32;
        let levels = sizes
            .into_iter()
            .enumerate()
            .map(|(i, (width, height))| {
                let roughness = i as f32 / last;
                PrefilterLevel {
                    width,
                    height,
                    roughness,
                    sample_count: if i == 0 { 1 } else { Self::SAMPLE_COUNT },
                }
            })
            .collect();

        Self { levels }
    }

    pub fn base_size(&self) -> (u32, u32) {
        self.levels
            .first()
            .map(|level| (level.width, level.height))
            .unwrap_or((1, 1))
    }

    pub fn mip_level_count(&self) -> u32 {
        self.levels.len() as u32
    }
}

/// Uniform block read by `prefilter.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct PrefilterParams {
    roughness: f32,
    sample_count: u32,
    source_width: u32,
    source_height: u32,
}

/// Prefiltered texture together with the plan that produced it
pub struct PrefilteredEnvironment {
    pub texture: TextureResource,
    pub plan: PrefilterPlan,
}

/// GPU helper that turns an [`HdrImage`] into a prefiltered mip chain
///
/// Holds its own pipeline; callers create one per conversion and drop it
/// once the map exists.
pub struct PmremGenerator {
    device: Arc<Device>,
    queue: Arc<Queue>,
    pipeline_manager: PipelineManager,
    layout: wgpu::BindGroupLayout,
}

impl PmremGenerator {
    pub fn new(device: Arc<Device>, queue: Arc<Queue>) -> Self {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Prefilter Layout"),
            entries: &[
                binding_types::fragment_entry(0, binding_types::uniform()),
                binding_types::fragment_entry(1, binding_types::texture_2d_unfilterable()),
            ],
        });

        let mut pipeline_manager = PipelineManager::new(device.clone());
        pipeline_manager.load_shader("prefilter", include_str!("prefilter.wgsl"));
        pipeline_manager.register_pipeline(
            "Prefilter",
            PipelineConfig::default()
                .with_label("PREFILTER")
                .with_shader("prefilter")
                .with_bind_group_layouts(vec![layout.clone()])
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format: TextureResource::ENVIRONMENT_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })])
                .with_cull_mode(None)
                .with_no_vertex_buffers(),
        );

        Self {
            device,
            queue,
            pipeline_manager,
            layout,
        }
    }

    /// Uploads `image` and renders every level of its [`PrefilterPlan`]
    pub fn from_equirectangular(
        &mut self,
        image: &HdrImage,
    ) -> Result<PrefilteredEnvironment, RenderError> {
        let limit = self.device.limits().max_texture_dimension_2d;
        if image.width() > limit || image.height() > limit {
            return Err(RenderError::TextureTooLarge {
                width: image.width(),
                height: image.height(),
                limit,
            });
        }

        let plan = PrefilterPlan::for_source(image.width(), image.height());
        let (width, height) = plan.base_size();
        debug!(
            "Prefiltering {}x{} panorama into {}x{} with {} levels",
            image.width(),
            image.height(),
            width,
            height,
            plan.mip_level_count()
        );

        let source = TextureResource::create_hdr_source(&self.device, &self.queue, image);
        let output = TextureResource::create_environment_target(
            &self.device,
            width,
            height,
            plan.mip_level_count(),
        );

        let pipeline = self
            .pipeline_manager
            .get_pipeline("Prefilter")
            .ok_or_else(|| RenderError::MissingPipeline("Prefilter".to_string()))?;

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Prefilter Encoder"),
            });

        // Each level needs its own parameters; they stay alive until submit
        let mut level_resources = Vec::with_capacity(plan.levels.len());
        for (mip, level) in plan.levels.iter().enumerate() {
            let params = UniformBuffer::new_with_data(
                &self.device,
                &PrefilterParams {
                    roughness: level.roughness,
                    sample_count: level.sample_count,
                    source_width: image.width(),
                    source_height: image.height(),
                },
            );
            let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Prefilter Bind Group"),
                layout: &self.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: params.binding_resource(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&source.view),
                    },
                ],
            });
            let target = output.texture.create_view(&wgpu::TextureViewDescriptor {
                label: Some("Prefilter Level"),
                base_mip_level: mip as u32,
                mip_level_count: Some(1),
                ..Default::default()
            });

            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Prefilter Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                });
                pass.set_pipeline(pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.draw(0..3, 0..1);
            }

            level_resources.push((params, bind_group, target));
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        drop(level_resources);
        source.texture.destroy();

        Ok(PrefilteredEnvironment {
            texture: output,
            plan,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_for_1k_panorama() {
        let plan = PrefilterPlan::for_source(1024, 512);
        let widths: Vec<_> = plan.levels.iter().map(|l| l.width).collect();

        assert_eq!(widths, vec![1024, 512, 256, 128, 64, 32, 16, 8]);
        assert_eq!(plan.base_size(), (1024, 512));
        assert_eq!(plan.levels[0].roughness, 0.0);
        assert_eq!(plan.levels[0].sample_count, 1);
        assert!((plan.levels[1].roughness - 1.0 / 7.0).abs() < 1e-6);
        assert_eq!(plan.levels[7].roughness, 1.0);
        assert_eq!(plan.levels[7].height, 4);
    }

    #[test]
    fn test_plan_caps_width() {
        let plan = PrefilterPlan::for_source(4096, 2048);
        assert_eq!(plan.base_size(), (1024, 512));
        assert_eq!(plan.mip_level_count(), 8);
    }

    #[test]
    fn test_plan_sizes_match_mip_rule() {
        let plan = PrefilterPlan::for_source(1000, 500);
        for (i, level) in plan.levels.iter().enumerate() {
            assert_eq!(level.width, (1000u32 >> i).max(1));
            assert_eq!(level.height, (500u32 >> i).max(1));
        }
        assert_eq!(plan.levels.last().map(|l| l.width), Some(15));
    }

    #[test]
    fn test_plan_for_tiny_source_is_single_level() {
        let plan = PrefilterPlan::for_source(4, 2);
        assert_eq!(plan.mip_level_count(), 1);
        assert_eq!(plan.levels[0].roughness, 0.0);
        assert_eq!(plan.base_size(), (4, 2));
    }

    #[test]
    fn test_roughness_increases_monotonically() {
        let plan = PrefilterPlan::for_source(512, 256);
        assert!(plan
            .levels
            .windows(2)
            .all(|pair| pair[0].roughness < pair[1].roughness));
    }
}
