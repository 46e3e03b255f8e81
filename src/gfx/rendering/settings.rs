//! Renderer configuration fixed at construction time

/// Operator mapping HDR radiance to displayable values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapping {
    /// Clamp only
    None,
    /// Filmic curve fitted to the ACES reference transform
    #[default]
    AcesFilmic,
}

impl ToneMapping {
    /// Selector value read by the shaders
    pub fn shader_id(self) -> u32 {
        match self {
            ToneMapping::None => 0,
            ToneMapping::AcesFilmic => 1,
        }
    }
}

/// Color space of the final framebuffer values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputEncoding {
    Linear,
    #[default]
    Srgb,
}

/// How the renderer is set up
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Use 4x MSAA when the surface format supports it
    pub antialias: bool,
    /// Request an alpha-blended surface and clear to transparent
    pub transparent: bool,
    pub tone_mapping: ToneMapping,
    pub exposure: f32,
    pub output_encoding: OutputEncoding,
    /// Wait for vertical sync when presenting
    pub vsync: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            antialias: true,
            transparent: true,
            tone_mapping: ToneMapping::AcesFilmic,
            exposure: 1.0,
            output_encoding: OutputEncoding::Srgb,
            vsync: true,
        }
    }
}

impl RenderSettings {
    pub const MSAA_SAMPLES: u32 = 4;

    pub fn with_antialias(mut self, antialias: bool) -> Self {
        self.antialias = antialias;
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }

    pub fn with_tone_mapping(mut self, tone_mapping: ToneMapping, exposure: f32) -> Self {
        self.tone_mapping = tone_mapping;
        self.exposure = exposure.max(0.0);
        self
    }

    pub fn with_output_encoding(mut self, encoding: OutputEncoding) -> Self {
        self.output_encoding = encoding;
        self
    }

    pub fn with_vsync(mut self, vsync: bool) -> Self {
        self.vsync = vsync;
        self
    }

    /// Sample count to use given whether the surface format can multisample
    pub fn sample_count(&self, format_supports_msaa: bool) -> u32 {
        if self.antialias && format_supports_msaa {
            Self::MSAA_SAMPLES
        } else {
            1
        }
    }

    /// Picks the surface format
    ///
    /// With sRGB output an sRGB format lets the hardware encode; the returned
    /// flag says whether the shaders must encode instead.
    pub fn choose_surface_format(
        &self,
        formats: &[wgpu::TextureFormat],
    ) -> Option<(wgpu::TextureFormat, bool)> {
        let first = *formats.first()?;
        match self.output_encoding {
            OutputEncoding::Srgb => Some(
                formats
                    .iter()
                    .copied()
                    .find(|f| f.is_srgb())
                    .map(|f| (f, false))
                    .unwrap_or((first, true)),
            ),
            OutputEncoding::Linear => Some(
                formats
                    .iter()
                    .copied()
                    .find(|f| !f.is_srgb())
                    .map(|f| (f, false))
                    .unwrap_or((first, false)),
            ),
        }
    }

    /// Picks the composite alpha mode, preferring blended modes when transparent
    pub fn choose_alpha_mode(
        &self,
        modes: &[wgpu::CompositeAlphaMode],
    ) -> wgpu::CompositeAlphaMode {
        let fallback = modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        if !self.transparent {
            return fallback;
        }
        [
            wgpu::CompositeAlphaMode::PreMultiplied,
            wgpu::CompositeAlphaMode::PostMultiplied,
        ]
        .into_iter()
        .find(|mode| modes.contains(mode))
        .unwrap_or(fallback)
    }

    pub fn present_mode(&self) -> wgpu::PresentMode {
        if self.vsync {
            wgpu::PresentMode::AutoVsync
        } else {
            wgpu::PresentMode::AutoNoVsync
        }
    }

    /// Scales a surface size down, keeping its aspect ratio, until neither
    /// side exceeds `limit`. Sides never drop below one pixel.
    pub fn clamp_surface_size(width: u32, height: u32, limit: u32) -> (u32, u32) {
        let (width, height, limit) = (width.max(1), height.max(1), limit.max(1));
        let longest = width.max(height);
        if longest <= limit {
            return (width, height);
        }

        let scale = |side: u32| ((side as u64 * limit as u64 / longest as u64) as u32).clamp(1, limit);
        (scale(width), scale(height))
    }

    /// Clear color for backgrounds that do not paint every pixel
    pub fn clear_color(&self) -> wgpu::Color {
        if self.transparent {
            wgpu::Color::TRANSPARENT
        } else {
            wgpu::Color::BLACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wgpu::{CompositeAlphaMode, TextureFormat};

    #[test]
    fn test_defaults() {
        let settings = RenderSettings::default();
        assert!(settings.antialias);
        assert!(settings.transparent);
        assert_eq!(settings.tone_mapping, ToneMapping::AcesFilmic);
        assert_eq!(settings.exposure, 1.0);
        assert_eq!(settings.output_encoding, OutputEncoding::Srgb);
    }

    #[test]
    fn test_sample_count() {
        let settings = RenderSettings::default();
        assert_eq!(settings.sample_count(true), 4);
        assert_eq!(settings.sample_count(false), 1);
        assert_eq!(settings.with_antialias(false).sample_count(true), 1);
    }

    #[test]
    fn test_prefers_srgb_surface() {
        let settings = RenderSettings::default();
        let formats = [TextureFormat::Bgra8Unorm, TextureFormat::Bgra8UnormSrgb];
        assert_eq!(
            settings.choose_surface_format(&formats),
            Some((TextureFormat::Bgra8UnormSrgb, false))
        );
    }

    #[test]
    fn test_encodes_in_shader_without_srgb_surface() {
        let settings = RenderSettings::default();
        assert_eq!(
            settings.choose_surface_format(&[TextureFormat::Rgba8Unorm]),
            Some((TextureFormat::Rgba8Unorm, true))
        );
        assert_eq!(settings.choose_surface_format(&[]), None);
    }

    #[test]
    fn test_linear_output_avoids_srgb() {
        let settings = RenderSettings::default().with_output_encoding(OutputEncoding::Linear);
        let formats = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];
        assert_eq!(
            settings.choose_surface_format(&formats),
            Some((TextureFormat::Bgra8Unorm, false))
        );
    }

    #[test]
    fn test_alpha_mode_preference() {
        let settings = RenderSettings::default();
        let modes = [CompositeAlphaMode::Opaque, CompositeAlphaMode::PostMultiplied];
        assert_eq!(settings.choose_alpha_mode(&modes), CompositeAlphaMode::PostMultiplied);
        assert_eq!(
            settings.choose_alpha_mode(&[CompositeAlphaMode::Opaque]),
            CompositeAlphaMode::Opaque
        );
        assert_eq!(
            settings.with_transparent(false).choose_alpha_mode(&modes),
            CompositeAlphaMode::Opaque
        );
    }

    #[test]
    fn test_clamp_surface_size() {
        assert_eq!(RenderSettings::clamp_surface_size(1200, 800, 4096), (1200, 800));
        assert_eq!(RenderSettings::clamp_surface_size(4096, 4096, 4096), (4096, 4096));
        assert_eq!(RenderSettings::clamp_surface_size(5120, 2880, 4096), (4096, 2304));
        assert_eq!(RenderSettings::clamp_surface_size(1000, 9000, 4096), (455, 4096));
        assert_eq!(RenderSettings::clamp_surface_size(100_000, 1, 2048), (2048, 1));
        assert_eq!(RenderSettings::clamp_surface_size(0, 0, 2048), (1, 1));
    }

    #[test]
    fn test_clear_color_follows_transparency() {
        assert_eq!(RenderSettings::default().clear_color().a, 0.0);
        assert_eq!(
            RenderSettings::default().with_transparent(false).clear_color().a,
            1.0
        );
    }
}
