use crate::gfx::environment::EnvironmentMap;

use super::object::{Mesh, MeshId};

/// What the renderer paints behind the meshes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Background {
    /// Leave the cleared (transparent) surface as is
    #[default]
    None,
    /// Solid RGBA color in linear space
    Color([f32; 4]),
    /// The environment map itself, drawn as a sky
    Environment(EnvironmentMap),
}

/// Scene graph root: the meshes, plus the environment used to light them
#[derive(Default)]
pub struct Scene {
    pub objects: Vec<Mesh>,
    /// Image-based lighting for every standard material in the scene
    pub environment: Option<EnvironmentMap>,
    pub background: Background,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mesh and returns its handle
    pub fn add(&mut self, mesh: Mesh) -> MeshId {
        self.objects.push(mesh);
        MeshId(self.objects.len() - 1)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&Mesh> {
        self.objects.get(id.0)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut Mesh> {
        self.objects.get_mut(id.0)
    }

    /// Iterates visible meshes with their handles
    pub fn visible_meshes(&self) -> impl Iterator<Item = (MeshId, &Mesh)> {
        self.objects
            .iter()
            .enumerate()
            .filter(|(_, mesh)| mesh.visible)
            .map(|(i, mesh)| (MeshId(i), mesh))
    }

    /// Installs `map` as both the lighting environment and the background
    pub fn use_environment(&mut self, map: EnvironmentMap) {
        self.environment = Some(map);
        self.background = Background::Environment(map);
    }

    pub fn get_object_count(&self) -> usize {
        self.objects.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        environment::EnvironmentId, geometry::generate_icosahedron,
        resources::material::StandardMaterial,
    };

    fn ico(name: &str) -> Mesh {
        Mesh::new(name, generate_icosahedron(1.0, 0), StandardMaterial::default())
    }

    #[test]
    fn test_add_returns_stable_handles() {
        let mut scene = Scene::new();
        let a = scene.add(ico("a"));
        let b = scene.add(ico("b"));

        assert_ne!(a, b);
        assert_eq!(scene.mesh(a).map(|m| m.name.as_str()), Some("a"));
        assert_eq!(scene.mesh(b).map(|m| m.name.as_str()), Some("b"));
        assert_eq!(scene.get_object_count(), 2);
    }

    #[test]
    fn test_hidden_meshes_are_skipped() {
        let mut scene = Scene::new();
        let a = scene.add(ico("a"));
        scene.add(ico("b"));
        scene.mesh_mut(a).unwrap().visible = false;

        let names: Vec<_> = scene.visible_meshes().map(|(_, m)| m.name.clone()).collect();
        assert_eq!(names, vec!["b".to_string()]);
    }

    #[test]
    fn test_use_environment_sets_lighting_and_background() {
        let mut scene = Scene::new();
        assert_eq!(scene.environment, None);
        assert_eq!(scene.background, Background::None);

        let map = EnvironmentMap::new(EnvironmentId(7), 64, 32, 4);
        scene.use_environment(map);

        assert_eq!(scene.environment, Some(map));
        assert_eq!(scene.background, Background::Environment(map));
    }
}
