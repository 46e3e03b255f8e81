// src/ui/panel.rs
//! The debug panel: one always-visible ImGui window of sliders
//!
//! Sketches register sliders during setup and read them every frame through
//! [`Params`]. Values only change through the panel, either from the slider
//! widgets in [`DebugPanel::draw`] or programmatically with
//! [`DebugPanel::set`], which applies the same clamping and snapping.

use log::debug;

use crate::error::PanelError;

use super::params::{NumericParam, ParamId, ParamKey, Params};

pub struct DebugPanel {
    title: String,
    params: Params,
}

impl DebugPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            params: Params::default(),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Registers a slider over `min..=max` moving in increments of `step`
    pub fn add_slider(
        &mut self,
        name: &str,
        min: f32,
        max: f32,
        step: f32,
        initial: f32,
    ) -> Result<ParamId, PanelError> {
        let param = NumericParam::new(name, min, max, step, initial)?;
        debug!(
            "Debug panel slider '{}' in {}..={} step {} = {}",
            name,
            min,
            max,
            step,
            param.value()
        );
        self.params.insert(param)
    }

    /// Writes a value as if the slider had been dragged to it
    ///
    /// Returns the stored (clamped and snapped) value, or `None` for an
    /// unknown parameter.
    pub fn set(&mut self, key: impl ParamKey, value: f32) -> Option<f32> {
        self.params.set(key, value)
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Builds the panel window for this frame
    pub fn draw(&mut self, ui: &imgui::Ui) {
        let Self { title, params } = self;

        ui.window(title.as_str())
            .position([16.0, 16.0], imgui::Condition::FirstUseEver)
            .always_auto_resize(true)
            .collapsible(true)
            .build(|| {
                for param in params.iter_mut() {
                    let mut value = param.value();
                    let format = format!("%.{}f", param.display_decimals());
                    let changed = ui
                        .slider_config(param.name(), param.min(), param.max())
                        .display_format(format.as_str())
                        .build(&mut value);
                    if changed {
                        param.set(value);
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_set_slider() {
        let mut panel = DebugPanel::new("Debug");
        let speed = panel.add_slider("speed", 0.0, 3.0, 0.01, 1.0).unwrap();

        assert_eq!(panel.params().get(speed), 1.0);
        assert_eq!(panel.set("speed", 5.0), Some(3.0));
        assert_eq!(panel.set(speed, -1.0), Some(0.0));
        assert_eq!(panel.params().get(speed), 0.0);
    }

    #[test]
    fn test_set_unknown_parameter() {
        let mut panel = DebugPanel::new("Debug");
        assert_eq!(panel.set("speed", 1.0), None);
    }

    #[test]
    fn test_registration_errors_surface() {
        let mut panel = DebugPanel::new("Debug");
        panel.add_slider("speed", 0.0, 3.0, 0.01, 1.0).unwrap();

        assert!(matches!(
            panel.add_slider("speed", 0.0, 1.0, 0.1, 0.0),
            Err(PanelError::DuplicateName(_))
        ));
        assert!(matches!(
            panel.add_slider("size", 2.0, 1.0, 0.1, 1.5),
            Err(PanelError::InvalidRange { .. })
        ));
        assert_eq!(panel.params().len(), 1);
    }
}
