use cgmath::{perspective, Deg, EuclideanSpace, Matrix4, Point3, SquareMatrix, Vector3};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Perspective camera looking at a target point, y up
///
/// The projection matrix is cached; anything that changes `fov`, `aspect`,
/// `near` or `far` must be followed by [`update_projection_matrix`].
///
/// [`update_projection_matrix`]: PerspectiveCamera::update_projection_matrix
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub const DEFAULT_FOV: f32 = 75.0;
    pub const DEFAULT_NEAR: f32 = 0.1;
    pub const DEFAULT_FAR: f32 = 1000.0;
    pub const DEFAULT_DISTANCE: f32 = 5.0;

    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Point3::origin(),
            target: Point3::origin(),
            up: Vector3::unit_y(),
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// The sketch camera: 75 degree fov, clip planes 0.1..1000, five units
    /// back along +z looking at the origin, aspect matching the viewport
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let mut camera = Self::new(
            Self::DEFAULT_FOV,
            1.0,
            Self::DEFAULT_NEAR,
            Self::DEFAULT_FAR,
        );
        camera.position = Point3::new(0.0, 0.0, Self::DEFAULT_DISTANCE);
        camera.set_viewport(width, height);
        camera
    }

    /// Matches the aspect ratio to a viewport. A zero-height viewport (a
    /// minimized window) leaves the camera untouched.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.aspect = width as f32 / height as f32;
        self.update_projection_matrix();
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection =
            OPENGL_TO_WGPU_MATRIX * perspective(Deg(self.fov), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }

    /// Position in homogeneous coordinates, as the shaders expect it
    pub fn position_h(&self) -> [f32; 4] {
        [self.position.x, self.position.y, self.position.z, 1.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use cgmath::{Transform, Vector4};

    #[test]
    fn test_for_viewport_defaults() {
        let camera = PerspectiveCamera::for_viewport(800, 600);
        assert_eq!(camera.fov, 75.0);
        assert_eq!(camera.near, 0.1);
        assert_eq!(camera.far, 1000.0);
        assert_eq!(camera.position, Point3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target, Point3::origin());
        assert_relative_eq!(camera.aspect, 800.0 / 600.0);
    }

    #[test]
    fn test_set_viewport_updates_aspect_exactly() {
        let mut camera = PerspectiveCamera::for_viewport(800, 600);
        camera.set_viewport(1920, 1080);
        assert_eq!(camera.aspect, 1920.0 / 1080.0);

        let before = camera.projection_matrix();
        camera.set_viewport(640, 0);
        assert_eq!(camera.aspect, 1920.0 / 1080.0);
        assert_eq!(camera.projection_matrix(), before);
    }

    #[test]
    fn test_origin_projects_to_screen_center_inside_depth_range() {
        let camera = PerspectiveCamera::for_viewport(800, 600);
        let clip = camera.view_projection_matrix() * Vector4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = clip.truncate() / clip.w;

        assert!(ndc.x.abs() < 1e-5);
        assert!(ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn test_near_and_far_planes_map_to_wgpu_depth_range() {
        let camera = PerspectiveCamera::for_viewport(800, 600);
        let proj = camera.projection_matrix();

        let near = proj.transform_point(Point3::new(0.0, 0.0, -0.1));
        let far = proj.transform_point(Point3::new(0.0, 0.0, -1000.0));
        assert!(near.z.abs() < 1e-4);
        assert!((far.z - 1.0).abs() < 1e-4);
    }
}
