//! Named numeric parameters edited through the debug panel

use crate::error::PanelError;

/// Handle to a parameter registered on a [`DebugPanel`](super::DebugPanel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(usize);

/// A bounded value on a fixed step grid
#[derive(Debug, Clone, PartialEq)]
pub struct NumericParam {
    name: String,
    min: f32,
    max: f32,
    step: f32,
    value: f32,
}

impl NumericParam {
    pub fn new(name: &str, min: f32, max: f32, step: f32, initial: f32) -> Result<Self, PanelError> {
        let valid = min.is_finite() && max.is_finite() && min < max && step.is_finite() && step > 0.0;
        if !valid {
            return Err(PanelError::InvalidRange {
                name: name.to_string(),
                min,
                max,
                step,
            });
        }

        let mut param = Self {
            name: name.to_string(),
            min,
            max,
            step,
            value: min,
        };
        param.set(initial);
        Ok(param)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Clamps `value` to the range and snaps it to the step grid
    pub fn constrain(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.value;
        }
        if value <= self.min {
            return self.min;
        }
        if value >= self.max {
            return self.max;
        }
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }

    /// Stores the constrained value and returns it
    pub fn set(&mut self, value: f32) -> f32 {
        self.value = self.constrain(value);
        self.value
    }

    /// Digits after the decimal point needed to show one step
    pub fn display_decimals(&self) -> usize {
        (-self.step.log10() - 1e-4).ceil().max(0.0) as usize
    }
}

/// Lets parameters be addressed by name or by id
pub trait ParamKey {
    fn resolve(&self, params: &Params) -> Option<ParamId>;
}

impl ParamKey for ParamId {
    fn resolve(&self, params: &Params) -> Option<ParamId> {
        (self.0 < params.entries.len()).then_some(*self)
    }
}

impl ParamKey for &str {
    fn resolve(&self, params: &Params) -> Option<ParamId> {
        params.id(self)
    }
}

/// Read access to every registered parameter
#[derive(Debug, Clone, Default)]
pub struct Params {
    entries: Vec<NumericParam>,
}

impl Params {
    /// Current value of `id`; ids from another panel read as 0.0
    pub fn get(&self, id: ParamId) -> f32 {
        self.entries.get(id.0).map_or(0.0, NumericParam::value)
    }

    pub fn value(&self, name: &str) -> Option<f32> {
        self.id(name).map(|id| self.get(id))
    }

    pub fn id(&self, name: &str) -> Option<ParamId> {
        self.entries
            .iter()
            .position(|p| p.name == name)
            .map(ParamId)
    }

    pub fn param(&self, id: ParamId) -> Option<&NumericParam> {
        self.entries.get(id.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &NumericParam> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn insert(&mut self, param: NumericParam) -> Result<ParamId, PanelError> {
        if self.id(param.name()).is_some() {
            return Err(PanelError::DuplicateName(param.name));
        }
        self.entries.push(param);
        Ok(ParamId(self.entries.len() - 1))
    }

    pub(crate) fn set(&mut self, key: impl ParamKey, value: f32) -> Option<f32> {
        let id = key.resolve(self)?;
        self.entries.get_mut(id.0).map(|p| p.set(value))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut NumericParam> {
        self.entries.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn speed() -> NumericParam {
        NumericParam::new("speed", 0.0, 3.0, 0.01, 1.0).unwrap()
    }

    #[test]
    fn test_clamps_to_range() {
        let mut param = speed();
        assert_eq!(param.set(5.0), 3.0);
        assert_eq!(param.set(-1.0), 0.0);
        assert_eq!(param.value(), 0.0);
    }

    #[test]
    fn test_snaps_to_step() {
        let mut param = speed();
        assert_relative_eq!(param.set(1.234), 1.23, epsilon = 1e-5);
        assert_relative_eq!(param.set(1.236), 1.24, epsilon = 1e-5);
        assert_relative_eq!(param.set(2.0), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn test_nan_keeps_previous_value() {
        let mut param = speed();
        assert_eq!(param.set(f32::NAN), 1.0);
    }

    #[test]
    fn test_initial_value_is_constrained() {
        let param = NumericParam::new("gain", 0.0, 1.0, 0.5, 0.8).unwrap();
        assert_eq!(param.value(), 1.0);
    }

    #[test]
    fn test_rejects_bad_ranges() {
        assert!(matches!(
            NumericParam::new("x", 1.0, 1.0, 0.1, 1.0),
            Err(PanelError::InvalidRange { .. })
        ));
        assert!(NumericParam::new("x", 0.0, 1.0, 0.0, 0.5).is_err());
        assert!(NumericParam::new("x", 0.0, f32::INFINITY, 0.1, 0.5).is_err());
    }

    #[test]
    fn test_display_decimals() {
        assert_eq!(speed().display_decimals(), 2);
        assert_eq!(NumericParam::new("n", 0.0, 10.0, 1.0, 0.0).unwrap().display_decimals(), 0);
        assert_eq!(NumericParam::new("n", 0.0, 1.0, 0.25, 0.0).unwrap().display_decimals(), 1);
    }

    #[test]
    fn test_lookup_by_name_and_id() {
        let mut params = Params::default();
        let id = params.insert(speed()).unwrap();

        assert_eq!(params.id("speed"), Some(id));
        assert_eq!(params.get(id), 1.0);
        assert_eq!(params.value("speed"), Some(1.0));
        assert_eq!(params.value("missing"), None);

        assert_eq!(params.set("speed", 2.0), Some(2.0));
        assert_eq!(params.set(id, 0.5), Some(0.5));
        assert_eq!(params.set("missing", 0.5), None);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut params = Params::default();
        params.insert(speed()).unwrap();
        assert_eq!(
            params.insert(speed()),
            Err(PanelError::DuplicateName("speed".to_string()))
        );
        assert_eq!(params.len(), 1);
    }
}
