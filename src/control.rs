use crate::gray_scott_model::Parameter;
use crate::model_presets::{
    DEFAULT_DIFFUSION_U, DEFAULT_DIFFUSION_V, DEFAULT_FEED, DEFAULT_KILL,
};
use std::collections::HashMap;

pub const OPERATOR_MIN: f64 = 0.001;
pub const OPERATOR_MAX: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterSpec {
    pub min: f64,
    pub max: f64,
    pub increment: f64,
    pub default: f64,
}

impl ParameterSpec {
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

lazy_static::lazy_static! {
    static ref PARAMETER_SPECS: HashMap<Parameter, ParameterSpec> = {
        let spec = |increment, default| ParameterSpec {
            min: OPERATOR_MIN,
            max: OPERATOR_MAX,
            increment,
            default,
        };

        let mut map = HashMap::new();
        map.insert(Parameter::DiffusionU, spec(0.001, DEFAULT_DIFFUSION_U));
        map.insert(Parameter::DiffusionV, spec(0.001, DEFAULT_DIFFUSION_V));
        map.insert(Parameter::Feed, spec(0.0001, DEFAULT_FEED));
        map.insert(Parameter::Kill, spec(0.0001, DEFAULT_KILL));
        map
    };
}

impl Parameter {
    /// Operator-facing limits and increment for this parameter.
    pub fn spec(&self) -> ParameterSpec {
        PARAMETER_SPECS[self]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// Messages a control surface sends to the simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlCommand {
    /// Set a parameter to `value`, clamped to the operator range.
    SetParameter(Parameter, f64),
    /// Nudge a parameter by one increment.
    Adjust(Parameter, Direction),
    /// Re-randomize the grids and restore default parameters.
    Reset,
    Save,
    Load,
}

impl ControlCommand {
    /// Value a parameter command would produce from `current`, or `None` for
    /// commands that do not touch a single parameter.
    pub fn target_value(&self, current: f64) -> Option<(Parameter, f64)> {
        match *self {
            ControlCommand::SetParameter(parameter, value) => {
                Some((parameter, parameter.spec().clamp(value)))
            }
            ControlCommand::Adjust(parameter, direction) => {
                let spec = parameter.spec();
                let delta = match direction {
                    Direction::Up => spec.increment,
                    Direction::Down => -spec.increment,
                };
                Some((parameter, spec.clamp(current + delta)))
            }
            _ => None,
        }
    }
}
