//! The bundled demo: a white icosahedron spinning under an HDR sky

use anyhow::Context;
use log::debug;

use crate::{
    gfx::{
        camera::OrbitControlsConfig,
        environment::EnvironmentSource,
        geometry::generate_icosahedron,
        resources::StandardMaterial,
        scene::{Mesh, MeshId},
    },
    sketch::{FrameContext, SetupContext, Sketch},
    ui::ParamId,
};

/// Poly Haven's 1k "Empty Warehouse 01" panorama
pub const DEFAULT_ENVIRONMENT_URL: &str =
    "https://dl.polyhaven.org/file/ph-assets/HDRIs/hdr/1k/empty_warehouse_01_1k.hdr";

/// Spins one mesh about x and y at `speed` radians per second
pub struct SpinningMesh {
    environment: EnvironmentSource,
    mesh: Option<MeshId>,
    speed: Option<ParamId>,
}

impl Default for SpinningMesh {
    fn default() -> Self {
        Self::new(EnvironmentSource::parse(DEFAULT_ENVIRONMENT_URL))
    }
}

impl SpinningMesh {
    pub const SPEED_NAME: &'static str = "speed";

    pub fn new(environment: EnvironmentSource) -> Self {
        Self {
            environment,
            mesh: None,
            speed: None,
        }
    }

    pub fn mesh(&self) -> Option<MeshId> {
        self.mesh
    }
}

impl Sketch for SpinningMesh {
    async fn setup(&mut self, ctx: &mut SetupContext<'_>) -> anyhow::Result<()> {
        ctx.enable_orbit_controls(OrbitControlsConfig::default().with_damping(true));

        let environment = ctx
            .load_environment(&self.environment)
            .await
            .with_context(|| format!("loading environment {}", self.environment))?;
        ctx.scene.use_environment(environment);

        let mesh = Mesh::new(
            "icosahedron",
            generate_icosahedron(1.0, 0),
            StandardMaterial::default(),
        );
        self.mesh = Some(ctx.scene.add(mesh));

        self.speed = Some(ctx.add_slider(Self::SPEED_NAME, 0.0, 3.0, 0.01, 1.0)?);
        debug!("Spinning mesh ready");
        Ok(())
    }

    fn tick(&mut self, ctx: &mut FrameContext<'_>) {
        let speed = self.speed.map_or(0.0, |id| ctx.params.get(id));

        if let Some(mesh) = self.mesh.and_then(|id| ctx.scene.mesh_mut(id)) {
            mesh.rotation.y += ctx.delta * speed;
            mesh.rotation.x = mesh.rotation.y;
        }

        ctx.update_controls();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{AppConfig, AppCore, FrameOutcome, Phase},
        error::{AppError, EnvironmentError, InitializationFailure},
        gfx::{rendering::OverlayPass, scene::Background},
        testing::{encode_hdr, write_temp_file, FakeRenderer},
        ui::DebugPanel,
    };
    use approx::assert_relative_eq;
    use futures::executor::block_on;

    fn no_overlay(_pass: OverlayPass<'_>, _panel: &mut DebugPanel) {}

    fn running_demo(name: &str, width: u32, height: u32) -> (AppCore<SpinningMesh>, FakeRenderer) {
        let path = write_temp_file(name, &encode_hdr(16, 8, |x, y| [x as f32, y as f32, 1.0]));
        let sketch = SpinningMesh::new(EnvironmentSource::File(path));
        let config = AppConfig::default().with_size(width, height);
        let mut core = AppCore::new(sketch, &config);
        let mut renderer = FakeRenderer::new(width, height);

        block_on(core.initialize(&mut renderer)).unwrap();
        (core, renderer)
    }

    fn rotation(core: &AppCore<SpinningMesh>) -> (f32, f32) {
        let id = core.sketch().mesh().unwrap();
        let mesh = core.scene().mesh(id).unwrap();
        (mesh.rotation.x, mesh.rotation.y)
    }

    #[test]
    fn test_setup_builds_the_scene() {
        let (core, renderer) = running_demo("demo-setup.hdr", 800, 600);

        assert_eq!(core.phase(), Phase::Running);
        assert_eq!(core.scene().get_object_count(), 1);
        assert_eq!(renderer.prefiltered, vec![(16, 8)]);

        let environment = core.scene().environment.unwrap();
        assert_eq!(core.scene().background, Background::Environment(environment));

        let controls = core.controls().unwrap();
        assert!(controls.config.enable_damping);

        let speed = core.panel().params().param(core.panel().params().id("speed").unwrap()).unwrap();
        assert_eq!((speed.min(), speed.max(), speed.step(), speed.value()), (0.0, 3.0, 0.01, 1.0));

        let id = core.sketch().mesh().unwrap();
        assert_eq!(core.scene().mesh(id).unwrap().material, StandardMaterial::default());
    }

    #[test]
    fn test_end_to_end() {
        let (mut core, mut renderer) = running_demo("demo-e2e.hdr", 800, 600);
        assert_relative_eq!(core.camera().aspect, 800.0 / 600.0);

        core.step(0.1, &mut renderer, &mut no_overlay).unwrap();
        let (x, y) = rotation(&core);
        assert_relative_eq!(y, 0.1, epsilon = 1e-6);
        assert_eq!(x, y);

        core.resize(1024, 768, &mut renderer);
        assert_relative_eq!(core.camera().aspect, 1024.0 / 768.0);
        assert_eq!(renderer.size, (1024, 768));

        core.panel_mut().set("speed", 2.0);
        core.step(0.05, &mut renderer, &mut no_overlay).unwrap();
        let (x, y) = rotation(&core);
        assert_relative_eq!(y, 0.2, epsilon = 1e-6);
        assert_eq!(x, y);
        assert_eq!(renderer.render_count, 2);
    }

    #[test]
    fn test_rotation_grows_by_delta_times_speed() {
        let (mut core, mut renderer) = running_demo("demo-growth.hdr", 640, 480);
        core.panel_mut().set("speed", 1.5);

        let mut expected = 0.0;
        for delta in [0.0, 0.016, 0.033, 0.5] {
            core.step(delta, &mut renderer, &mut no_overlay).unwrap();
            expected += delta * 1.5;
            let (x, y) = rotation(&core);
            assert_relative_eq!(y, expected, epsilon = 1e-5);
            assert_eq!(x, y);
        }
    }

    #[test]
    fn test_zero_speed_holds_rotation() {
        let (mut core, mut renderer) = running_demo("demo-still.hdr", 800, 600);
        core.step(0.3, &mut renderer, &mut no_overlay).unwrap();
        let before = rotation(&core);

        core.panel_mut().set("speed", 0.0);
        for _ in 0..5 {
            assert_eq!(
                core.step(0.2, &mut renderer, &mut no_overlay).unwrap(),
                FrameOutcome::Rendered
            );
        }

        assert_eq!(rotation(&core), before);
    }

    #[test]
    fn test_missing_environment_fails_setup() {
        let sketch = SpinningMesh::new(EnvironmentSource::parse("/definitely/not/here/sky.hdr"));
        let mut core = AppCore::new(sketch, &AppConfig::default());
        let mut renderer = FakeRenderer::new(800, 600);

        let err = block_on(core.initialize(&mut renderer)).unwrap_err();

        let AppError::Initialization(InitializationFailure::Setup(source)) = &err else {
            panic!("unexpected error: {err:?}");
        };
        assert!(source.downcast_ref::<EnvironmentError>().is_some());
        assert_eq!(core.scene().get_object_count(), 0);
        assert_eq!(core.phase(), Phase::Failed);
    }

    #[test]
    fn test_default_points_at_polyhaven() {
        let sketch = SpinningMesh::default();
        assert_eq!(sketch.environment, EnvironmentSource::Url(DEFAULT_ENVIRONMENT_URL.to_string()));
        assert!(sketch.mesh().is_none());
    }
}
