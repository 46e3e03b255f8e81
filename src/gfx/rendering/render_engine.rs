//! WGPU-based rendering engine
//!
//! Owns the surface, device, and every GPU resource: depth and MSAA targets,
//! pipelines, per-mesh buffers, and the prefiltered environment maps the
//! scene refers to by handle.

use std::{collections::HashMap, sync::Arc};

use log::{debug, error, info, warn};
use wgpu::{Device, Queue, TextureFormat};

use crate::{
    error::RenderError,
    gfx::{
        camera::PerspectiveCamera,
        environment::{prefilter::PmremGenerator, EnvironmentId, EnvironmentMap, HdrImage},
        resources::{
            global_bindings::{
                create_environment_bind_group, environment_bind_group_layout, GlobalBindings,
                GlobalUBO, GlobalUniform,
            },
            object_bindings::{object_bind_group_layout, ObjectResources, ObjectUniform},
            texture_resource::TextureResource,
        },
        scene::{Background, MeshId, Scene},
    },
};

use super::{
    pipeline_manager::{PipelineConfig, PipelineManager},
    render_pass_ext::DrawObject,
    settings::RenderSettings,
    target::{OverlayPass, RenderTarget},
};

const STANDARD_PIPELINE: &str = "Standard";
const SKYBOX_PIPELINE: &str = "Skybox";

/// Surfaces, depth and MSAA targets must all fit the device texture limit
fn fit_surface_size(width: u32, height: u32, limit: u32) -> (u32, u32) {
    let fitted = RenderSettings::clamp_surface_size(width, height, limit);
    if fitted != (width, height) && width > 0 && height > 0 {
        warn!(
            "Surface {}x{} exceeds the device limit of {}, rendering at {}x{}",
            width, height, limit, fitted.0, fitted.1
        );
    }
    fitted
}

/// A prefiltered environment resident on the GPU
struct GpuEnvironment {
    // Keeps the texture alive for the bind group
    _texture: TextureResource,
    bind_group: wgpu::BindGroup,
}

/// Core rendering engine managing GPU resources and draw calls
///
/// The RenderEngine handles all low-level graphics operations including:
/// - Surface and device management
/// - Pipeline creation and management
/// - Depth and multisample targets
/// - Environment prefiltering and image-based lighting
/// - UI overlay rendering
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<Device>,
    queue: Arc<Queue>,
    config: wgpu::SurfaceConfiguration,
    settings: RenderSettings,
    format: TextureFormat,
    encode_srgb: bool,
    sample_count: u32,
    depth_texture: TextureResource,
    msaa_target: Option<TextureResource>,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,
    object_layout: wgpu::BindGroupLayout,
    environment_layout: wgpu::BindGroupLayout,
    placeholder_environment: GpuEnvironment,
    environments: HashMap<EnvironmentId, GpuEnvironment>,
    next_environment_id: u32,
    objects: HashMap<MeshId, ObjectResources>,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `settings` - Antialiasing, transparency, tone mapping and output encoding
    ///
    /// # Errors
    /// Fails when no surface, adapter or device can be created
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        settings: &RenderSettings,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        info!("Using adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: adapter.limits().max_texture_dimension_2d,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let (format, encode_srgb) = settings
            .choose_surface_format(&surface_capabilities.formats)
            .ok_or(RenderError::NoSurfaceFormat)?;
        let alpha_mode = settings.choose_alpha_mode(&surface_capabilities.alpha_modes);

        let format_features = adapter.get_texture_format_features(format);
        let sample_count = settings.sample_count(
            format_features
                .flags
                .sample_count_supported(RenderSettings::MSAA_SAMPLES),
        );
        debug!(
            "Surface format {:?} (shader sRGB encoding: {}), {}x MSAA, alpha mode {:?}",
            format, encode_srgb, sample_count, alpha_mode
        );

        let (width, height) =
            fit_surface_size(width, height, device.limits().max_texture_dimension_2d);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: settings.present_mode(),
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(
            &device,
            config.width,
            config.height,
            sample_count,
            "depth_texture",
        );
        let msaa_target = (sample_count > 1).then(|| {
            TextureResource::create_msaa_target(
                &device,
                format,
                config.width,
                config.height,
                sample_count,
            )
        });

        let global_ubo = GlobalUBO::new(&device);
        let global_bindings = GlobalBindings::new(&device, &global_ubo);
        let object_layout = object_bind_group_layout(&device);
        let environment_layout = environment_bind_group_layout(&device);

        let placeholder_texture = TextureResource::create_placeholder_environment(&device, &queue);
        let placeholder_environment = GpuEnvironment {
            bind_group: create_environment_bind_group(
                &device,
                &environment_layout,
                &placeholder_texture,
            ),
            _texture: placeholder_texture,
        };

        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader(
            "standard",
            concat!(include_str!("common.wgsl"), include_str!("standard.wgsl")),
        );
        pipeline_manager.load_shader(
            "skybox",
            concat!(include_str!("common.wgsl"), include_str!("skybox.wgsl")),
        );

        let color_target = Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::REPLACE),
            write_mask: wgpu::ColorWrites::ALL,
        });

        pipeline_manager.register_pipeline(
            STANDARD_PIPELINE,
            PipelineConfig::default()
                .with_label("STANDARD")
                .with_shader("standard")
                .with_depth(
                    TextureResource::DEPTH_FORMAT,
                    wgpu::CompareFunction::Less,
                    true,
                )
                .with_sample_count(sample_count)
                .with_color_targets(vec![color_target.clone()])
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_layout.clone(),
                    environment_layout.clone(),
                ]),
        );

        // Drawn after the meshes at the far plane, so it only fills what they leave
        pipeline_manager.register_pipeline(
            SKYBOX_PIPELINE,
            PipelineConfig::default()
                .with_label("SKYBOX")
                .with_shader("skybox")
                .with_depth(
                    TextureResource::DEPTH_FORMAT,
                    wgpu::CompareFunction::LessEqual,
                    false,
                )
                .with_sample_count(sample_count)
                .with_color_targets(vec![color_target])
                .with_cull_mode(None)
                .with_no_vertex_buffers()
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    environment_layout.clone(),
                ]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for e in errors {
                error!("{}", e);
            }
        }

        info!(
            "Renderer ready: {}x{} {:?}, tone mapping {:?}",
            config.width, config.height, format, settings.tone_mapping
        );

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            settings: settings.clone(),
            format,
            encode_srgb,
            sample_count,
            depth_texture,
            msaa_target,
            pipeline_manager,
            global_ubo,
            global_bindings,
            object_layout,
            environment_layout,
            placeholder_environment,
            environments: HashMap::new(),
            next_environment_id: 0,
            objects: HashMap::new(),
        })
    }

    /// Returns reference to the wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns reference to the wgpu command queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    ///
    /// Used for creating compatible render targets and UI systems.
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Creates GPU buffers for meshes seen for the first time and refreshes
    /// every visible mesh's uniforms
    fn sync_objects(&mut self, scene: &Scene) {
        for (id, mesh) in scene.visible_meshes() {
            let resources = self.objects.entry(id).or_insert_with(|| {
                debug!(
                    "Uploading mesh '{}' ({} triangles)",
                    mesh.name,
                    mesh.geometry.triangle_count()
                );
                ObjectResources::upload(&self.device, &self.object_layout, mesh)
            });
            resources
                .uniform
                .update_content(&self.queue, ObjectUniform::from_mesh(mesh));
        }
    }

    fn recreate_targets(&mut self) {
        self.depth_texture = TextureResource::create_depth_texture(
            &self.device,
            self.config.width,
            self.config.height,
            self.sample_count,
            "depth_texture",
        );
        if self.sample_count > 1 {
            self.msaa_target = Some(TextureResource::create_msaa_target(
                &self.device,
                self.format,
                self.config.width,
                self.config.height,
                self.sample_count,
            ));
        }
    }

    fn clear_color(&self, background: &Background) -> wgpu::Color {
        match background {
            Background::Color([r, g, b, a]) => wgpu::Color {
                r: *r as f64,
                g: *g as f64,
                b: *b as f64,
                a: *a as f64,
            },
            _ => self.settings.clear_color(),
        }
    }
}

impl RenderTarget for RenderEngine {
    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigures the surface and recreates the depth and MSAA targets
    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let (width, height) =
            fit_surface_size(width, height, self.device.limits().max_texture_dimension_2d);
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.recreate_targets();
    }

    fn max_texture_dimension(&self) -> u32 {
        self.device.limits().max_texture_dimension_2d
    }

    fn prefilter_environment(&mut self, image: &HdrImage) -> Result<EnvironmentMap, RenderError> {
        let mut generator = PmremGenerator::new(self.device.clone(), self.queue.clone());
        let prefiltered = generator.from_equirectangular(image)?;
        drop(generator);

        let id = EnvironmentId(self.next_environment_id);
        self.next_environment_id += 1;

        let (width, height) = prefiltered.plan.base_size();
        let map = EnvironmentMap::new(id, width, height, prefiltered.plan.mip_level_count());
        let bind_group =
            create_environment_bind_group(&self.device, &self.environment_layout, &prefiltered.texture);
        self.environments.insert(
            id,
            GpuEnvironment {
                _texture: prefiltered.texture,
                bind_group,
            },
        );

        debug!("Stored environment {:?}", map);
        Ok(map)
    }

    fn render(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        overlay: &mut dyn FnMut(OverlayPass<'_>),
    ) -> Result<(), RenderError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring and skipping frame");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out waiting for the next frame");
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        // Handles pointing at maps this engine never produced are ignored
        let lighting = scene
            .environment
            .filter(|map| self.environments.contains_key(&map.id()));
        self.global_ubo.update_content(
            &self.queue,
            GlobalUniform::new(
                camera,
                &self.settings,
                self.encode_srgb,
                lighting.as_ref(),
            ),
        );
        self.sync_objects(scene);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let (view, resolve_target) = match &self.msaa_target {
                Some(msaa) => (&msaa.view, Some(&frame_view)),
                None => (&frame_view, None),
            };

            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color(&scene.background)),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);

            if let Some(pipeline) = self.pipeline_manager.pipeline(STANDARD_PIPELINE) {
                let environment = lighting
                    .and_then(|map| self.environments.get(&map.id()))
                    .unwrap_or(&self.placeholder_environment);

                render_pass.set_pipeline(pipeline);
                render_pass.set_bind_group(2, &environment.bind_group, &[]);
                for (id, _) in scene.visible_meshes() {
                    if let Some(object) = self.objects.get(&id) {
                        render_pass.draw_object(1, object);
                    }
                }
            }

            if let Background::Environment(map) = scene.background {
                if let (Some(pipeline), Some(environment)) = (
                    self.pipeline_manager.pipeline(SKYBOX_PIPELINE),
                    self.environments.get(&map.id()),
                ) {
                    render_pass.set_pipeline(pipeline);
                    render_pass.set_bind_group(1, &environment.bind_group, &[]);
                    render_pass.draw(0..3, 0..1);
                }
            }
        }

        overlay(OverlayPass {
            device: &self.device,
            queue: &self.queue,
            encoder: &mut encoder,
            view: &frame_view,
        });

        self.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
