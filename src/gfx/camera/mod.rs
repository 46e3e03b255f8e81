pub mod orbit_controls;
pub mod perspective;

pub use orbit_controls::{OrbitControls, OrbitControlsConfig};
pub use perspective::PerspectiveCamera;
