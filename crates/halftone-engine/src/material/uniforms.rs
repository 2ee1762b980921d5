use bytemuck::{Pod, Zeroable};

use crate::paint::Color;

use super::MaterialError;

/// CPU mirror of the `Halftone` uniform block in `halftone_fragment.wgsl`.
///
/// Field order and padding match the WGSL struct (80 bytes, 16-byte aligned).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct HalftoneUniforms {
    pub base_color: [f32; 4],
    pub shadow_color: [f32; 4],
    pub highlight_color: [f32; 4],
    pub resolution: [f32; 2],
    pub repetition: f32,
    pub shadow_low: f32,
    pub shadow_high: f32,
    pub highlight_low: f32,
    pub highlight_high: f32,
    pub _pad: f32,
}

impl HalftoneUniforms {
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn get(&self, slot: UniformSlot) -> UniformValue {
        match slot {
            UniformSlot::BaseColor => UniformValue::Color(color_from(self.base_color)),
            UniformSlot::Resolution => UniformValue::Vec2(self.resolution),
            UniformSlot::Repetition => UniformValue::Float(self.repetition),
            UniformSlot::ShadowColor => UniformValue::Color(color_from(self.shadow_color)),
            UniformSlot::ShadowLowThreshold => UniformValue::Float(self.shadow_low),
            UniformSlot::ShadowHighThreshold => UniformValue::Float(self.shadow_high),
            UniformSlot::HighlightColor => UniformValue::Color(color_from(self.highlight_color)),
            UniformSlot::HighlightLowThreshold => UniformValue::Float(self.highlight_low),
            UniformSlot::HighlightHighThreshold => UniformValue::Float(self.highlight_high),
        }
    }

    /// Writes one slot. The value shape must match the slot.
    pub fn set(&mut self, slot: UniformSlot, value: UniformValue) -> Result<(), MaterialError> {
        let mismatch = || MaterialError::TypeMismatch { slot, value };

        match (slot, value) {
            (UniformSlot::BaseColor, UniformValue::Color(c)) => self.base_color = c.to_array(),
            (UniformSlot::ShadowColor, UniformValue::Color(c)) => self.shadow_color = c.to_array(),
            (UniformSlot::HighlightColor, UniformValue::Color(c)) => {
                self.highlight_color = c.to_array()
            }
            (UniformSlot::Resolution, UniformValue::Vec2(v)) => self.resolution = v,
            (slot, UniformValue::Float(v)) => match slot {
                UniformSlot::Repetition => self.repetition = v,
                UniformSlot::ShadowLowThreshold => self.shadow_low = v,
                UniformSlot::ShadowHighThreshold => self.shadow_high = v,
                UniformSlot::HighlightLowThreshold => self.highlight_low = v,
                UniformSlot::HighlightHighThreshold => self.highlight_high = v,
                _ => return Err(mismatch()),
            },
            _ => return Err(mismatch()),
        }
        Ok(())
    }
}

#[inline]
fn color_from(c: [f32; 4]) -> Color {
    Color { r: c[0], g: c[1], b: c[2], a: c[3] }
}

/// Named uniform slots of the halftone program.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum UniformSlot {
    BaseColor,
    Resolution,
    Repetition,
    ShadowColor,
    ShadowLowThreshold,
    ShadowHighThreshold,
    HighlightColor,
    HighlightLowThreshold,
    HighlightHighThreshold,
}

impl UniformSlot {
    pub const ALL: [UniformSlot; 9] = [
        UniformSlot::BaseColor,
        UniformSlot::Resolution,
        UniformSlot::Repetition,
        UniformSlot::ShadowColor,
        UniformSlot::ShadowLowThreshold,
        UniformSlot::ShadowHighThreshold,
        UniformSlot::HighlightColor,
        UniformSlot::HighlightLowThreshold,
        UniformSlot::HighlightHighThreshold,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            UniformSlot::BaseColor => "baseColor",
            UniformSlot::Resolution => "resolution",
            UniformSlot::Repetition => "repetition",
            UniformSlot::ShadowColor => "shadowColor",
            UniformSlot::ShadowLowThreshold => "shadowLowThreshold",
            UniformSlot::ShadowHighThreshold => "shadowHighThreshold",
            UniformSlot::HighlightColor => "highlightColor",
            UniformSlot::HighlightLowThreshold => "highlightLowThreshold",
            UniformSlot::HighlightHighThreshold => "highlightHighThreshold",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, MaterialError> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.name() == name)
            .ok_or_else(|| MaterialError::UnknownUniform(name.to_string()))
    }
}

/// A value pushed into a [`UniformSlot`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum UniformValue {
    Color(Color),
    Vec2([f32; 2]),
    Float(f32),
}
