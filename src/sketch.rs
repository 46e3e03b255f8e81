//! The sketch interface
//!
//! A sketch is the user code driven by [`AppHost`](crate::app::AppHost): it
//! builds its scene once in [`Sketch::setup`] and animates it in
//! [`Sketch::tick`]. Everything it may touch is handed over explicitly
//! through [`SetupContext`] and [`FrameContext`].

use crate::{
    error::{EnvironmentError, PanelError},
    gfx::{
        camera::{OrbitControls, OrbitControlsConfig, PerspectiveCamera},
        environment::{EnvironmentLoader, EnvironmentMap, EnvironmentSource},
        rendering::RenderTarget,
        scene::Scene,
    },
    ui::{DebugPanel, ParamId, Params},
};

/// User code run by the application
///
/// `setup` may await (typically on an environment download); the frame loop
/// does not start until it resolves. Returning an error aborts the
/// application before the first frame.
#[allow(async_fn_in_trait)]
pub trait Sketch {
    async fn setup(&mut self, ctx: &mut SetupContext<'_>) -> anyhow::Result<()>;

    fn tick(&mut self, ctx: &mut FrameContext<'_>);
}

/// What a sketch can reach while setting up
pub struct SetupContext<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a mut PerspectiveCamera,
    pub renderer: &'a mut dyn RenderTarget,
    pub panel: &'a mut DebugPanel,
    pub(crate) controls: &'a mut Option<OrbitControls>,
    pub(crate) loader: &'a EnvironmentLoader,
}

impl SetupContext<'_> {
    /// Current surface size in pixels
    pub fn viewport(&self) -> (u32, u32) {
        self.renderer.size()
    }

    /// Attaches orbit controls to the camera, replacing any previous ones
    pub fn enable_orbit_controls(&mut self, config: OrbitControlsConfig) -> &mut OrbitControls {
        let (_, height) = self.renderer.size();
        let mut controls = OrbitControls::new(config, height);
        controls.target = self.camera.target;
        self.controls.insert(controls)
    }

    /// Fetches and prefilters a panorama; the map is not installed anywhere
    pub async fn load_environment(
        &mut self,
        source: &EnvironmentSource,
    ) -> Result<EnvironmentMap, EnvironmentError> {
        self.loader.load(source, &mut *self.renderer).await
    }

    pub fn add_slider(
        &mut self,
        name: &str,
        min: f32,
        max: f32,
        step: f32,
        initial: f32,
    ) -> Result<ParamId, PanelError> {
        self.panel.add_slider(name, min, max, step, initial)
    }
}

/// Per-frame view of the application state
pub struct FrameContext<'a> {
    pub scene: &'a mut Scene,
    pub camera: &'a mut PerspectiveCamera,
    pub controls: Option<&'a mut OrbitControls>,
    pub params: &'a Params,
    /// Seconds since the first frame
    pub elapsed: f32,
    /// Seconds since the previous frame
    pub delta: f32,
}

impl FrameContext<'_> {
    /// Advances the orbit controls, if any, and returns whether the camera moved
    pub fn update_controls(&mut self) -> bool {
        match self.controls.as_deref_mut() {
            Some(controls) => controls.update(self.camera),
            None => false,
        }
    }
}
