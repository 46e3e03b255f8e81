//! # Environment Maps
//!
//! HDR panoramas used as image-based lighting and as the visible sky.
//!
//! Loading happens in two stages:
//!
//! 1. [`EnvironmentLoader::fetch`] downloads (or reads) and decodes a Radiance
//!    `.hdr` file on a worker thread, returning an [`HdrImage`].
//! 2. The renderer prefilters the image into a mip chain where each level is
//!    blurred for a higher GGX roughness ([`PrefilterPlan`]), and hands back an
//!    [`EnvironmentMap`] handle.
//!
//! [`EnvironmentLoader::load`] runs both stages and drops the decoded image
//! once the GPU copy exists.

pub mod hdr;
pub mod loader;
pub mod prefilter;

use std::path::PathBuf;

pub use hdr::HdrImage;
pub use loader::EnvironmentLoader;
pub use prefilter::{PrefilterLevel, PrefilterPlan};

/// Identifies a prefiltered texture owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentId(pub(crate) u32);

impl EnvironmentId {
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Handle to an immutable, prefiltered environment texture
///
/// Cheap to copy; the texture itself lives in the renderer that produced it
/// and is shared by every place the handle is used (lighting and background).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvironmentMap {
    id: EnvironmentId,
    width: u32,
    height: u32,
    mip_levels: u32,
}

impl EnvironmentMap {
    pub fn new(id: EnvironmentId, width: u32, height: u32, mip_levels: u32) -> Self {
        Self {
            id,
            width,
            height,
            mip_levels: mip_levels.max(1),
        }
    }

    pub fn id(&self) -> EnvironmentId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    /// Highest mip level, i.e. the level filtered for roughness 1.0
    pub fn max_lod(&self) -> f32 {
        (self.mip_levels - 1) as f32
    }
}

/// Where a panorama comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentSource {
    Url(String),
    File(PathBuf),
}

impl EnvironmentSource {
    /// `http://` and `https://` locations are fetched over the network, a
    /// `file://` prefix is stripped, anything else is a filesystem path.
    pub fn parse(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Url(trimmed.to_string())
        } else if let Some(path) = trimmed.strip_prefix("file://") {
            Self::File(PathBuf::from(path))
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl From<&str> for EnvironmentSource {
    fn from(location: &str) -> Self {
        Self::parse(location)
    }
}

impl std::fmt::Display for EnvironmentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
