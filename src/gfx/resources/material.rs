//! Physically based material for meshes lit by the environment map

/// Metallic-roughness material
///
/// Defaults match a plain white dielectric: fully rough, not metallic, lit
/// by the scene environment at full strength.
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMaterial {
    /// Linear RGBA base color
    pub color: [f32; 4],
    /// 0.0 = mirror, 1.0 = fully diffuse
    pub roughness: f32,
    /// 0.0 = dielectric, 1.0 = metal
    pub metalness: f32,
    /// Multiplier on the light taken from the scene environment
    pub env_map_intensity: f32,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0, 1.0],
            roughness: 1.0,
            metalness: 0.0,
            env_map_intensity: 1.0,
        }
    }
}

impl StandardMaterial {
    pub fn new(color: [f32; 4], metalness: f32, roughness: f32) -> Self {
        Self {
            color,
            metalness: metalness.clamp(0.0, 1.0),
            roughness: roughness.clamp(0.0, 1.0),
            ..Default::default()
        }
    }

    /// Builder pattern: Set base color from RGB values
    pub fn with_color(mut self, r: f32, g: f32, b: f32) -> Self {
        self.color = [r, g, b, self.color[3]];
        self
    }

    /// Builder pattern: Set metallic factor
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    /// Builder pattern: Set roughness factor
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_env_map_intensity(mut self, intensity: f32) -> Self {
        self.env_map_intensity = intensity.max(0.0);
        self
    }
}
