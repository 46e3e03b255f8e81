//! # Sketchbook Prelude
//!
//! Commonly used types for writing sketches.
//!
//! ```no_run
//! use sketchbook::prelude::*;
//!
//! struct Still;
//!
//! impl Sketch for Still {
//!     async fn setup(&mut self, ctx: &mut SetupContext<'_>) -> anyhow::Result<()> {
//!         ctx.enable_orbit_controls(OrbitControlsConfig::default().with_damping(true));
//!         let sky = ctx.load_environment(&EnvironmentSource::parse("studio.hdr")).await?;
//!         ctx.scene.use_environment(sky);
//!         ctx.scene.add(Mesh::new(
//!             "ball",
//!             generate_icosahedron(1.0, 3),
//!             StandardMaterial::default().with_roughness(0.2),
//!         ));
//!         Ok(())
//!     }
//!
//!     fn tick(&mut self, ctx: &mut FrameContext<'_>) {
//!         ctx.update_controls();
//!     }
//! }
//!
//! fn main() -> Result<(), AppError> {
//!     AppHost::new(AppConfig::default(), Still)?.run()
//! }
//! ```

// Application
pub use crate::app::{AppConfig, AppCore, AppHost, FrameOutcome, Phase, StopHandle};
pub use crate::demo::SpinningMesh;
pub use crate::error::{AppError, EnvironmentError, PanelError, RenderError};
pub use crate::sketch::{FrameContext, SetupContext, Sketch};

// Graphics and scene
pub use crate::gfx::camera::{OrbitControls, OrbitControlsConfig, PerspectiveCamera};
pub use crate::gfx::environment::{EnvironmentMap, EnvironmentSource};
pub use crate::gfx::geometry::{generate_icosahedron, GeometryData};
pub use crate::gfx::rendering::{OutputEncoding, RenderSettings, ToneMapping};
pub use crate::gfx::resources::StandardMaterial;
pub use crate::gfx::scene::{Background, Euler, Mesh, MeshId, Scene};

// Debug panel
pub use crate::ui::{ParamId, Params};

pub use cgmath::Vector3;
