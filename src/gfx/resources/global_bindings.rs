//! Global uniform bindings for camera and environment data
//!
//! Manages the uniform buffer and bind groups for per-frame state shared by
//! every draw: camera matrices, tone mapping, and the environment map used
//! for lighting and the sky.

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    gfx::{
        camera::PerspectiveCamera, environment::EnvironmentMap, rendering::settings::RenderSettings,
    },
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

use super::texture_resource::TextureResource;

/// Global uniform buffer content
///
/// MUST match the `Globals` struct in `common.wgsl` exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub inv_view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub exposure: f32,
    pub tone_mapping: u32,
    pub encode_srgb: u32,
    pub env_max_lod: f32,
    pub has_environment: u32,
    _padding: [u32; 3],
}

impl GlobalUniform {
    pub fn new(
        camera: &PerspectiveCamera,
        settings: &RenderSettings,
        encode_srgb: bool,
        environment: Option<&EnvironmentMap>,
    ) -> Self {
        let view_proj = camera.view_projection_matrix();
        let inv_view_proj = view_proj.invert().unwrap_or_else(Matrix4::identity);

        Self {
            view_proj: view_proj.into(),
            inv_view_proj: inv_view_proj.into(),
            camera_position: camera.position_h(),
            exposure: settings.exposure,
            tone_mapping: settings.tone_mapping.shader_id(),
            encode_srgb: encode_srgb as u32,
            env_max_lod: environment.map_or(0.0, EnvironmentMap::max_lod),
            has_environment: environment.is_some() as u32,
            _padding: [0; 3],
        }
    }
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUniform>;

/// Group 0 of every scene pipeline: the global uniform buffer
pub struct GlobalBindings {
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device, ubo: &GlobalUBO) -> Self {
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[binding_types::entry(0, binding_types::uniform())],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.binding_resource(),
            }],
        });

        Self {
            bind_group_layout,
            bind_group,
        }
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

/// Layout for an environment texture + sampler pair
pub fn environment_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Environment Bind Group Layout"),
        entries: &[
            binding_types::fragment_entry(0, binding_types::texture_2d()),
            binding_types::fragment_entry(
                1,
                binding_types::sampler(wgpu::SamplerBindingType::Filtering),
            ),
        ],
    })
}

pub fn create_environment_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    texture: &TextureResource,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Environment Bind Group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::environment::EnvironmentId;

    #[test]
    fn test_layout_matches_shader_struct() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 176);
    }

    #[test]
    fn test_environment_flags() {
        let camera = PerspectiveCamera::for_viewport(800, 600);
        let settings = RenderSettings::default();

        let without = GlobalUniform::new(&camera, &settings, false, None);
        assert_eq!(without.has_environment, 0);
        assert_eq!(without.env_max_lod, 0.0);
        assert_eq!(without.tone_mapping, 1);

        let map = EnvironmentMap::new(EnvironmentId(3), 1024, 512, 8);
        let with = GlobalUniform::new(&camera, &settings, true, Some(&map));
        assert_eq!(with.has_environment, 1);
        assert_eq!(with.env_max_lod, 7.0);
        assert_eq!(with.encode_srgb, 1);
        assert_eq!(with.camera_position, [0.0, 0.0, 5.0, 1.0]);
    }

    #[test]
    fn test_inverse_view_projection_round_trips() {
        let camera = PerspectiveCamera::for_viewport(1024, 768);
        let globals = GlobalUniform::new(&camera, &RenderSettings::default(), false, None);
        let product = Matrix4::from(globals.view_proj) * Matrix4::from(globals.inv_view_proj);
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        let product: [[f32; 4]; 4] = product.into();

        for (row, expected) in product.iter().zip(identity.iter()) {
            for (value, want) in row.iter().zip(expected.iter()) {
                assert!((value - want).abs() < 1e-3);
            }
        }
    }
}
