//! Meshes placed in a [`Scene`](super::Scene)

use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::{geometry::GeometryData, resources::material::StandardMaterial};

/// Stable handle to a mesh inside its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshId(pub(crate) usize);

impl MeshId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Euler angles in radians, applied in X then Y then Z order
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Euler {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Euler {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn to_matrix(self) -> Matrix4<f32> {
        Matrix4::from_angle_x(Rad(self.x))
            * Matrix4::from_angle_y(Rad(self.y))
            * Matrix4::from_angle_z(Rad(self.z))
    }
}

/// Geometry + material pairing with a transform
pub struct Mesh {
    pub name: String,
    pub geometry: GeometryData,
    pub material: StandardMaterial,
    pub position: Vector3<f32>,
    pub rotation: Euler,
    pub scale: Vector3<f32>,
    pub visible: bool,
}

impl Mesh {
    pub fn new(name: &str, geometry: GeometryData, material: StandardMaterial) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material,
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Euler::default(),
            scale: Vector3::new(1.0, 1.0, 1.0),
            visible: true,
        }
    }

    /// Model matrix, composed as T * R * S
    pub fn model_matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * self.rotation.to_matrix()
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_icosahedron;
    use cgmath::{SquareMatrix, Vector4};

    #[test]
    fn test_new_mesh_has_identity_transform() {
        let mesh = Mesh::new("ico", generate_icosahedron(1.0, 0), StandardMaterial::default());
        assert_eq!(mesh.model_matrix(), Matrix4::identity());
        assert!(mesh.visible);
    }

    #[test]
    fn test_model_matrix_applies_scale_then_rotation_then_translation() {
        let mut mesh = Mesh::new("ico", generate_icosahedron(1.0, 0), StandardMaterial::default());
        mesh.scale = Vector3::new(2.0, 2.0, 2.0);
        mesh.rotation = Euler::new(0.0, 0.0, std::f32::consts::FRAC_PI_2);
        mesh.position = Vector3::new(0.0, 0.0, -3.0);

        let p = mesh.model_matrix() * Vector4::new(1.0, 0.0, 0.0, 1.0);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 2.0).abs() < 1e-5);
        assert!((p.z + 3.0).abs() < 1e-5);
    }
}
