//! # User Interface Module
//!
//! A Dear ImGui debug panel drawn over the rendered scene.
//!
//! - [`UiManager`] - ImGui integration with winit and wgpu: input capture,
//!   frame timing, font scaling and overlay rendering
//! - [`DebugPanel`] - the always-visible window of sliders sketches register
//!   during setup
//! - [`Params`] - read-only view of the slider values, handed to every frame
//!
//! ```
//! use sketchbook::ui::DebugPanel;
//!
//! let mut panel = DebugPanel::new("Debug");
//! let speed = panel.add_slider("speed", 0.0, 3.0, 0.01, 1.0).unwrap();
//! panel.set("speed", 5.0);
//! assert_eq!(panel.params().get(speed), 3.0);
//! ```

pub mod manager;
pub mod panel;
pub mod params;

// Re-export main types
pub use manager::UiManager;
pub use panel::DebugPanel;
pub use params::{NumericParam, ParamId, ParamKey, Params};
