use std::fmt;

use crate::material::{MaterialHandle, UniformSlot};
use crate::paint::Color;

/// The tunables exposed to the control surface.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ParamId {
    BaseColor,
    Repetition,
    HighlightColor,
    HighlightLowThreshold,
    HighlightHighThreshold,
    ShadowColor,
    ShadowLowThreshold,
    ShadowHighThreshold,
    BackgroundColor,
}

/// Value of a tunable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ParamValue {
    Color(Color),
    Number(f32),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Color(c) => f.write_str(&c.to_hex()),
            ParamValue::Number(v) => write!(f, "{v:.2}"),
        }
    }
}

/// Where an edit of a parameter lands.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Binding {
    Uniform(UniformSlot),
    ClearColor,
}

/// Maps each parameter to its one hook.
pub const fn binding(id: ParamId) -> Binding {
    match id {
        ParamId::BaseColor => Binding::Uniform(UniformSlot::BaseColor),
        ParamId::Repetition => Binding::Uniform(UniformSlot::Repetition),
        ParamId::HighlightColor => Binding::Uniform(UniformSlot::HighlightColor),
        ParamId::HighlightLowThreshold => Binding::Uniform(UniformSlot::HighlightLowThreshold),
        ParamId::HighlightHighThreshold => Binding::Uniform(UniformSlot::HighlightHighThreshold),
        ParamId::ShadowColor => Binding::Uniform(UniformSlot::ShadowColor),
        ParamId::ShadowLowThreshold => Binding::Uniform(UniformSlot::ShadowLowThreshold),
        ParamId::ShadowHighThreshold => Binding::Uniform(UniformSlot::ShadowHighThreshold),
        ParamId::BackgroundColor => Binding::ClearColor,
    }
}

/// Everything a hook may write to.
pub struct ParamTargets<'a> {
    pub material: &'a MaterialHandle,
    pub clear_color: &'a mut Color,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CONTROLS;

    #[test]
    fn every_control_has_a_distinct_hook() {
        let mut seen = Vec::new();
        for spec in CONTROLS.iter() {
            let b = binding(spec.id);
            assert!(!seen.contains(&b), "{:?} bound twice", b);
            seen.push(b);
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn background_is_not_a_uniform() {
        assert_eq!(binding(ParamId::BackgroundColor), Binding::ClearColor);
        assert_eq!(binding(ParamId::Repetition), Binding::Uniform(UniformSlot::Repetition));
    }
}
