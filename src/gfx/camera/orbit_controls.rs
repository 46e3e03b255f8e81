use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, Zero};
use std::f32::consts::PI;
use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, MouseButton, MouseScrollDelta, WindowEvent},
};

use super::perspective::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Tuning for [`OrbitControls`]
#[derive(Debug, Clone, Copy)]
pub struct OrbitControlsConfig {
    /// Spread input over several frames instead of applying it at once
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per update when damping
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
}

impl Default for OrbitControlsConfig {
    fn default() -> Self {
        Self {
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
        }
    }
}

impl OrbitControlsConfig {
    pub fn with_damping(mut self, enable: bool) -> Self {
        self.enable_damping = enable;
        self
    }
}

/// Orbits a [`PerspectiveCamera`] around a target point
///
/// Input only accumulates motion; nothing moves until [`update`] runs, which
/// a sketch calls once per frame. Left drag rotates, shift + left drag pans,
/// the wheel zooms.
///
/// [`update`]: OrbitControls::update
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub config: OrbitControlsConfig,
    pub target: Point3<f32>,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_offset: Vector3<f32>,
    pending_pan: (f32, f32),
    viewport_height: f32,
    is_mouse_pressed: bool,
    is_shift_held: bool,
}

impl OrbitControls {
    pub fn new(config: OrbitControlsConfig, viewport_height: u32) -> Self {
        Self {
            config,
            target: Point3::origin(),
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vector3::zero(),
            pending_pan: (0.0, 0.0),
            viewport_height: viewport_height.max(1) as f32,
            is_mouse_pressed: false,
            is_shift_held: false,
        }
    }

    pub fn set_viewport_height(&mut self, height: u32) {
        if height > 0 {
            self.viewport_height = height as f32;
        }
    }

    /// Queues a rotation from a pointer drag of (`dx`, `dy`) pixels
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let full_turn = 2.0 * PI * self.config.rotate_speed / self.viewport_height;
        self.theta_delta -= dx * full_turn;
        self.phi_delta -= dy * full_turn;
    }

    /// Queues a zoom; positive `steps` move the camera toward the target
    pub fn zoom(&mut self, steps: f32) {
        let zoom_scale = 0.95_f32.powf(self.config.zoom_speed);
        self.scale *= zoom_scale.powf(steps);
    }

    /// Queues a pan from a pointer drag of (`dx`, `dy`) pixels
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.pending_pan.0 += dx * self.config.pan_speed;
        self.pending_pan.1 += dy * self.config.pan_speed;
    }

    /// Returns true while damped motion is still settling
    pub fn is_settling(&self) -> bool {
        self.theta_delta.abs() > EPS
            || self.phi_delta.abs() > EPS
            || self.pan_offset.magnitude2() > EPS
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y, .. }) => *y as f32 / 50.0,
                };
                self.zoom(steps);
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.is_shift_held = modifiers.state().shift_key();
            }
            WindowEvent::Focused(false) => {
                self.is_mouse_pressed = false;
            }
            _ => (),
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if !self.is_mouse_pressed {
                return;
            }
            let (dx, dy) = (delta.0 as f32, delta.1 as f32);
            if self.is_shift_held {
                self.pan(dx, dy);
            } else {
                self.rotate(dx, dy);
            }
        }
    }

    /// Applies queued motion to `camera`; returns true if the camera moved
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let factor = if self.config.enable_damping {
            self.config.damping_factor
        } else {
            1.0
        };

        self.resolve_pending_pan(camera);

        let offset = camera.position - self.target;
        let mut radius = offset.magnitude();
        let mut theta = offset.x.atan2(offset.z);
        let mut phi = if radius > 0.0 {
            (offset.y / radius).clamp(-1.0, 1.0).acos()
        } else {
            0.0
        };

        theta += self.theta_delta * factor;
        phi += self.phi_delta * factor;
        phi = phi.clamp(
            self.config.min_polar_angle.max(EPS),
            self.config.max_polar_angle.min(PI - EPS),
        );

        radius = (radius * self.scale).clamp(self.config.min_distance, self.config.max_distance);

        self.target += self.pan_offset * factor;

        let offset = Vector3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );

        let previous = camera.position;
        camera.position = self.target + offset;
        camera.target = self.target;

        if self.config.enable_damping {
            let keep = 1.0 - self.config.damping_factor;
            self.theta_delta *= keep;
            self.phi_delta *= keep;
            self.pan_offset *= keep;
        } else {
            self.theta_delta = 0.0;
            self.phi_delta = 0.0;
            self.pan_offset = Vector3::zero();
        }
        self.scale = 1.0;

        (camera.position - previous).magnitude2() > EPS
    }

    /// Converts screen-space pan into a world-space offset in the camera plane
    fn resolve_pending_pan(&mut self, camera: &PerspectiveCamera) {
        let (dx, dy) = std::mem::take(&mut self.pending_pan);
        if dx == 0.0 && dy == 0.0 {
            return;
        }

        let offset = camera.position - self.target;
        let target_distance = offset.magnitude() * (camera.fov.to_radians() / 2.0).tan();
        let forward = (camera.target - camera.position).normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward).normalize();

        let world_per_pixel = 2.0 * target_distance / self.viewport_height;
        self.pan_offset += (-right * dx + up * dy) * world_per_pixel;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::for_viewport(800, 600)
    }

    fn distance(camera: &PerspectiveCamera) -> f32 {
        (camera.position - camera.target).magnitude()
    }

    #[test]
    fn test_update_without_input_keeps_camera_still() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(OrbitControlsConfig::default().with_damping(true), 600);
        assert!(!controls.update(&mut cam));
        assert!((cam.position - Point3::new(0.0, 0.0, 5.0)).magnitude() < 1e-5);
    }

    #[test]
    fn test_undamped_rotation_applies_at_once() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(OrbitControlsConfig::default(), 600);

        // a quarter of the viewport height turns a quarter circle
        controls.rotate(-150.0, 0.0);
        assert!(controls.update(&mut cam));
        assert!((cam.position.x - 5.0).abs() < 1e-4);
        assert!(cam.position.z.abs() < 1e-4);
        assert!(!controls.is_settling());
        assert!(!controls.update(&mut cam));
    }

    #[test]
    fn test_damping_spreads_motion_and_converges() {
        let mut cam = camera();
        let mut controls =
            OrbitControls::new(OrbitControlsConfig::default().with_damping(true), 600);

        controls.rotate(-150.0, 0.0);
        controls.update(&mut cam);
        let first_step = cam.position.x.atan2(cam.position.z);
        assert!((first_step - 0.05 * PI / 2.0).abs() < 1e-4);
        assert!(controls.is_settling());

        for _ in 0..400 {
            controls.update(&mut cam);
        }
        let theta = cam.position.x.atan2(cam.position.z);
        assert!((theta - PI / 2.0).abs() < 1e-3);
        assert!((distance(&cam) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_polar_angle_never_reaches_pole() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(OrbitControlsConfig::default(), 600);
        controls.rotate(0.0, 10_000.0);
        controls.update(&mut cam);

        assert!(cam.position.y <= 5.0);
        assert!(cam.position.y > 4.99);
        assert!(!cam.position.x.is_nan() && !cam.position.z.is_nan());
        assert!((distance(&cam) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_is_clamped_to_distance_bounds() {
        let mut cam = camera();
        let config = OrbitControlsConfig {
            min_distance: 2.0,
            max_distance: 6.0,
            ..Default::default()
        };
        let mut controls = OrbitControls::new(config, 600);

        controls.zoom(1.0);
        controls.update(&mut cam);
        assert!((distance(&cam) - 4.75).abs() < 1e-4);

        controls.zoom(100.0);
        controls.update(&mut cam);
        assert!((distance(&cam) - 2.0).abs() < 1e-4);

        controls.zoom(-100.0);
        controls.update(&mut cam);
        assert!((distance(&cam) - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(OrbitControlsConfig::default(), 600);

        controls.pan(100.0, 0.0);
        controls.update(&mut cam);

        assert!(controls.target.x < 0.0);
        assert!((cam.target - controls.target).magnitude() < 1e-6);
        assert!((distance(&cam) - 5.0).abs() < 1e-4);
        assert!((cam.position.x - controls.target.x).abs() < 1e-4);
    }
}
