use crate::material::HalftoneUniforms;
use crate::paint::Color;

/// Live material tunables.
///
/// No ordering is enforced between a band's low and high threshold.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MaterialParameters {
    pub base_color: Color,
    pub repetition: f32,

    pub highlight_color: Color,
    pub highlight_low: f32,
    pub highlight_high: f32,

    pub shadow_color: Color,
    pub shadow_low: f32,
    pub shadow_high: f32,
}

impl Default for MaterialParameters {
    fn default() -> Self {
        Self {
            base_color: Color::from_srgb_u8(0xff, 0x76, 0x4d),
            repetition: 100.0,

            highlight_color: Color::from_srgb_u8(0xe5, 0xff, 0xe0),
            highlight_low: 0.5,
            highlight_high: 1.5,

            shadow_color: Color::from_srgb_u8(0x8e, 0x19, 0xb8),
            shadow_low: -0.8,
            shadow_high: 1.5,
        }
    }
}

impl MaterialParameters {
    /// Initial uniform block for these parameters at the given surface resolution.
    pub fn to_uniforms(&self, resolution: [f32; 2]) -> HalftoneUniforms {
        HalftoneUniforms {
            base_color: self.base_color.to_array(),
            shadow_color: self.shadow_color.to_array(),
            highlight_color: self.highlight_color.to_array(),
            resolution,
            repetition: self.repetition,
            shadow_low: self.shadow_low,
            shadow_high: self.shadow_high,
            highlight_low: self.highlight_low,
            highlight_high: self.highlight_high,
            _pad: 0.0,
        }
    }
}

/// Renderer tunables.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RendererParameters {
    pub background_color: Color,
}

impl Default for RendererParameters {
    fn default() -> Self {
        Self { background_color: Color::from_srgb_u8(0x26, 0x13, 0x2f) }
    }
}
