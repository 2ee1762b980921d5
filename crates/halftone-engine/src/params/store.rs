use std::fmt;

use crate::material::{MaterialError, UniformValue};
use crate::paint::{Color, ColorParseError};

use super::{
    binding, Binding, ControlKind, ControlSpec, MaterialParameters, ParamId, ParamTargets,
    ParamValue, RendererParameters,
};

/// A change requested by the control surface.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ParamEdit {
    pub id: ParamId,
    pub value: ParamValue,
}

impl ParamEdit {
    #[inline]
    pub const fn new(id: ParamId, value: ParamValue) -> Self {
        Self { id, value }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParamError {
    /// A color was given for a numeric parameter or the other way around.
    TypeMismatch { id: ParamId, value: ParamValue },
    /// Typed color text did not parse.
    InvalidColor(ColorParseError),
    Material(MaterialError),
}

impl fmt::Display for ParamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamError::TypeMismatch { id, value } => {
                write!(f, "parameter {id:?} cannot take {value}")
            }
            ParamError::InvalidColor(e) => write!(f, "{e}"),
            ParamError::Material(e) => write!(f, "material rejected edit: {e}"),
        }
    }
}

impl std::error::Error for ParamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParamError::Material(e) => Some(e),
            ParamError::InvalidColor(e) => Some(e),
            ParamError::TypeMismatch { .. } => None,
        }
    }
}

impl From<ColorParseError> for ParamError {
    fn from(e: ColorParseError) -> Self {
        ParamError::InvalidColor(e)
    }
}

impl From<MaterialError> for ParamError {
    fn from(e: MaterialError) -> Self {
        ParamError::Material(e)
    }
}

/// Current tunable values.
///
/// The store is the only place parameter values live. Pushing them anywhere
/// else happens only through [`apply_edit`](Self::apply_edit).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParameterStore {
    pub material: MaterialParameters,
    pub renderer: RendererParameters,
}

impl ParameterStore {
    pub fn new(material: MaterialParameters, renderer: RendererParameters) -> Self {
        Self { material, renderer }
    }

    pub fn get(&self, id: ParamId) -> ParamValue {
        let m = &self.material;
        match id {
            ParamId::BaseColor => ParamValue::Color(m.base_color),
            ParamId::Repetition => ParamValue::Number(m.repetition),
            ParamId::HighlightColor => ParamValue::Color(m.highlight_color),
            ParamId::HighlightLowThreshold => ParamValue::Number(m.highlight_low),
            ParamId::HighlightHighThreshold => ParamValue::Number(m.highlight_high),
            ParamId::ShadowColor => ParamValue::Color(m.shadow_color),
            ParamId::ShadowLowThreshold => ParamValue::Number(m.shadow_low),
            ParamId::ShadowHighThreshold => ParamValue::Number(m.shadow_high),
            ParamId::BackgroundColor => ParamValue::Color(self.renderer.background_color),
        }
    }

    /// Programmatic write. Stores the value and fires no hook.
    pub fn set(&mut self, id: ParamId, value: ParamValue) -> Result<(), ParamError> {
        let mismatch = || ParamError::TypeMismatch { id, value };
        let m = &mut self.material;

        match value {
            ParamValue::Color(c) => {
                let slot: &mut Color = match id {
                    ParamId::BaseColor => &mut m.base_color,
                    ParamId::HighlightColor => &mut m.highlight_color,
                    ParamId::ShadowColor => &mut m.shadow_color,
                    ParamId::BackgroundColor => &mut self.renderer.background_color,
                    _ => return Err(mismatch()),
                };
                *slot = c;
            }
            ParamValue::Number(v) => {
                let slot: &mut f32 = match id {
                    ParamId::Repetition => &mut m.repetition,
                    ParamId::HighlightLowThreshold => &mut m.highlight_low,
                    ParamId::HighlightHighThreshold => &mut m.highlight_high,
                    ParamId::ShadowLowThreshold => &mut m.shadow_low,
                    ParamId::ShadowHighThreshold => &mut m.shadow_high,
                    _ => return Err(mismatch()),
                };
                *slot = v;
            }
        }
        Ok(())
    }

    /// Control-surface write: constrains the value to the control's range,
    /// stores it, then fires exactly the hook [`binding`] names for it.
    ///
    /// Returns the value actually stored.
    pub fn apply_edit(
        &mut self,
        edit: ParamEdit,
        targets: &mut ParamTargets<'_>,
    ) -> Result<ParamValue, ParamError> {
        let value = match (ControlSpec::find(edit.id).map(|s| s.kind), edit.value) {
            (Some(kind @ ControlKind::Range { .. }), ParamValue::Number(v)) => {
                ParamValue::Number(kind.constrain(v))
            }
            (_, value) => value,
        };

        self.set(edit.id, value)?;

        match (binding(edit.id), value) {
            (Binding::Uniform(slot), ParamValue::Color(c)) => {
                targets.material.set_uniform(slot, UniformValue::Color(c))?
            }
            (Binding::Uniform(slot), ParamValue::Number(v)) => {
                targets.material.set_uniform(slot, UniformValue::Float(v))?
            }
            (Binding::ClearColor, ParamValue::Color(c)) => *targets.clear_color = c,
            (Binding::ClearColor, value) => {
                return Err(ParamError::TypeMismatch { id: edit.id, value });
            }
        }

        log::info!("{:?} = {}", edit.id, value);
        Ok(value)
    }
}
