//! Per-object uniforms: transform and material, bound at group 1

use cgmath::{Matrix, Matrix4, SquareMatrix};

use crate::{
    gfx::scene::Mesh,
    wgpu_utils::{binding_types, uniform_buffer::UniformBuffer},
};

/// MUST match the `Object` struct in `standard.wgsl`
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    pub metalness: f32,
    pub roughness: f32,
    pub env_map_intensity: f32,
    _padding: f32,
}

impl ObjectUniform {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let model = mesh.model_matrix();
        // Inverse transpose keeps normals perpendicular under non-uniform scale
        let normal_matrix = model
            .invert()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity);
        let material = &mesh.material;

        Self {
            model: model.into(),
            normal_matrix: normal_matrix.into(),
            base_color: material.color,
            metalness: material.metalness,
            roughness: material.roughness,
            env_map_intensity: material.env_map_intensity,
            _padding: 0.0,
        }
    }
}

/// GPU state for one mesh: its buffers plus uniform and bind group
pub struct ObjectResources {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
    pub uniform: UniformBuffer<ObjectUniform>,
    pub bind_group: wgpu::BindGroup,
}

impl ObjectResources {
    pub fn upload(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, mesh: &Mesh) -> Self {
        use wgpu::util::DeviceExt;

        let vertices = mesh.geometry.to_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Vertex Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Index Buffer", mesh.name)),
            contents: bytemuck::cast_slice(&mesh.geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform = UniformBuffer::new_with_data(device, &ObjectUniform::from_mesh(mesh));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Bind Group", mesh.name)),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform.binding_resource(),
            }],
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.geometry.indices.len() as u32,
            uniform,
            bind_group,
        }
    }
}

pub fn object_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("Object Bind Group Layout"),
        entries: &[binding_types::entry(0, binding_types::uniform())],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_icosahedron, resources::material::StandardMaterial, scene::Euler,
    };
    use cgmath::Vector3;

    #[test]
    fn test_layout_matches_shader_struct() {
        assert_eq!(std::mem::size_of::<ObjectUniform>(), 160);
    }

    #[test]
    fn test_from_mesh_copies_material() {
        let material = StandardMaterial::new([0.2, 0.4, 0.6, 1.0], 0.7, 0.3).with_env_map_intensity(2.0);
        let mesh = Mesh::new("ico", generate_icosahedron(1.0, 0), material);
        let uniform = ObjectUniform::from_mesh(&mesh);

        assert_eq!(uniform.base_color, [0.2, 0.4, 0.6, 1.0]);
        assert_eq!(uniform.metalness, 0.7);
        assert_eq!(uniform.roughness, 0.3);
        assert_eq!(uniform.env_map_intensity, 2.0);
    }

    #[test]
    fn test_normal_matrix_for_rotation_equals_model() {
        let mut mesh = Mesh::new("ico", generate_icosahedron(1.0, 0), StandardMaterial::default());
        mesh.rotation = Euler::new(0.3, 0.3, 0.0);
        let uniform = ObjectUniform::from_mesh(&mesh);

        for (a, b) in uniform
            .model
            .iter()
            .flatten()
            .zip(uniform.normal_matrix.iter().flatten())
        {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_normal_matrix_undoes_non_uniform_scale() {
        let mut mesh = Mesh::new("ico", generate_icosahedron(1.0, 0), StandardMaterial::default());
        mesh.scale = Vector3::new(2.0, 1.0, 1.0);
        let uniform = ObjectUniform::from_mesh(&mesh);

        assert!((uniform.normal_matrix[0][0] - 0.5).abs() < 1e-6);
        assert!((uniform.normal_matrix[1][1] - 1.0).abs() < 1e-6);
    }
}
