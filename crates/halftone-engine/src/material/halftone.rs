use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::Rc;

use naga::valid::{Capabilities, ValidationFlags, Validator};

use super::{HalftoneUniforms, MaterialError, ShaderStage, UniformSlot, UniformValue};

/// WGSL sources of the halftone program.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderSources {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl ShaderSources {
    /// The sources shipped with the crate.
    pub fn builtin() -> Self {
        Self {
            vertex: Cow::Borrowed(include_str!("shaders/halftone_vertex.wgsl")),
            fragment: Cow::Borrowed(include_str!("shaders/halftone_fragment.wgsl")),
        }
    }

    pub fn source(&self, stage: ShaderStage) -> &str {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

/// The single shader program of the scene and its uniform set.
///
/// Invariant: `uniforms` holds exactly the last pushed value of every slot.
/// Nothing writes it except [`MaterialHandle::set_uniform`].
#[derive(Debug)]
pub struct HalftoneMaterial {
    sources: ShaderSources,
    uniforms: HalftoneUniforms,
    revision: u64,
}

impl HalftoneMaterial {
    /// Validates both stages and wraps the material in a shared handle.
    pub fn new(
        sources: ShaderSources,
        initial: HalftoneUniforms,
    ) -> Result<MaterialHandle, MaterialError> {
        validate_stage(&sources, ShaderStage::Vertex)?;
        validate_stage(&sources, ShaderStage::Fragment)?;

        log::debug!("halftone material compiled");

        Ok(MaterialHandle(Rc::new(RefCell::new(Self {
            sources,
            uniforms: initial,
            revision: 0,
        }))))
    }

    #[inline]
    pub fn sources(&self) -> &ShaderSources {
        &self.sources
    }

    #[inline]
    pub fn uniforms(&self) -> &HalftoneUniforms {
        &self.uniforms
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

fn validate_stage(sources: &ShaderSources, stage: ShaderStage) -> Result<(), MaterialError> {
    let src = sources.source(stage);

    let module = naga::front::wgsl::parse_str(src).map_err(|e| MaterialError::Compile {
        stage,
        message: e.emit_to_string(src),
    })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|e| MaterialError::Compile {
            stage,
            message: e.as_inner().to_string(),
        })?;

    let naga_stage = match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    };
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.stage == naga_stage && ep.name == stage.entry_point());
    if !found {
        return Err(MaterialError::MissingEntryPoint { stage });
    }

    Ok(())
}

/// Shared reference to the scene's one [`HalftoneMaterial`].
///
/// Clones point at the same material; [`ptr_eq`](Self::ptr_eq) tells whether
/// two parts share it.
#[derive(Debug, Clone)]
pub struct MaterialHandle(Rc<RefCell<HalftoneMaterial>>);

impl MaterialHandle {
    /// Pushes one uniform value. Visible to every holder immediately; uploaded
    /// to the GPU on the next render.
    pub fn set_uniform(&self, slot: UniformSlot, value: UniformValue) -> Result<(), MaterialError> {
        let mut material = self.0.borrow_mut();
        material.uniforms.set(slot, value)?;
        material.revision = material.revision.wrapping_add(1);
        Ok(())
    }

    /// Looks a slot up by its program name, then pushes.
    pub fn set_uniform_by_name(&self, name: &str, value: UniformValue) -> Result<(), MaterialError> {
        self.set_uniform(UniformSlot::from_name(name)?, value)
    }

    pub fn uniform(&self, slot: UniformSlot) -> UniformValue {
        self.0.borrow().uniforms.get(slot)
    }

    /// Snapshot of the full uniform block.
    pub fn uniforms(&self) -> HalftoneUniforms {
        self.0.borrow().uniforms
    }

    pub fn revision(&self) -> u64 {
        self.0.borrow().revision
    }

    pub fn sources(&self) -> ShaderSources {
        self.0.borrow().sources.clone()
    }

    #[inline]
    pub fn ptr_eq(&self, other: &MaterialHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[cfg(test)]
mod tests {
    use bytemuck::Zeroable;

    use super::*;
    use crate::paint::Color;

    fn material() -> MaterialHandle {
        HalftoneMaterial::new(ShaderSources::builtin(), HalftoneUniforms::zeroed()).unwrap()
    }

    // ── compile ────────────────────────────────────────────────────────────

    #[test]
    fn builtin_sources_validate() {
        let handle = material();
        assert_eq!(handle.revision(), 0);
    }

    #[test]
    fn broken_fragment_reports_stage() {
        let sources = ShaderSources {
            fragment: Cow::Borrowed("@fragment fn fs_main( -> @location(0) vec4<f32> {}"),
            ..ShaderSources::builtin()
        };
        let err = HalftoneMaterial::new(sources, HalftoneUniforms::zeroed()).unwrap_err();
        assert!(matches!(err, MaterialError::Compile { stage: ShaderStage::Fragment, .. }));
    }

    #[test]
    fn invalid_module_is_rejected() {
        // Parses, but returns a vec3 where a vec4 is declared.
        let sources = ShaderSources {
            vertex: Cow::Borrowed(
                "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return vec3<f32>(0.0); }",
            ),
            ..ShaderSources::builtin()
        };
        let err = HalftoneMaterial::new(sources, HalftoneUniforms::zeroed()).unwrap_err();
        assert!(matches!(err, MaterialError::Compile { stage: ShaderStage::Vertex, .. }));
    }

    #[test]
    fn missing_entry_point_is_reported() {
        let sources = ShaderSources {
            fragment: Cow::Borrowed(
                "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0); }",
            ),
            ..ShaderSources::builtin()
        };
        let err = HalftoneMaterial::new(sources, HalftoneUniforms::zeroed()).unwrap_err();
        assert_eq!(err, MaterialError::MissingEntryPoint { stage: ShaderStage::Fragment });
    }

    // ── sharing ────────────────────────────────────────────────────────────

    #[test]
    fn clones_share_uniforms() {
        let a = material();
        let b = a.clone();

        a.set_uniform(UniformSlot::BaseColor, UniformValue::Color(Color::linear(1.0, 0.0, 0.0)))
            .unwrap();

        assert!(a.ptr_eq(&b));
        assert_eq!(b.uniforms().base_color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(b.revision(), 1);
    }

    #[test]
    fn separate_materials_are_distinct() {
        assert!(!material().ptr_eq(&material()));
    }

    #[test]
    fn rejected_push_keeps_revision() {
        let m = material();
        assert!(m.set_uniform(UniformSlot::Repetition, UniformValue::Vec2([0.0; 2])).is_err());
        assert_eq!(m.revision(), 0);
    }

    #[test]
    fn push_by_name() {
        let m = material();
        m.set_uniform_by_name("repetition", UniformValue::Float(50.0)).unwrap();
        assert_eq!(m.uniform(UniformSlot::Repetition), UniformValue::Float(50.0));
        assert!(m.set_uniform_by_name("nope", UniformValue::Float(1.0)).is_err());
    }
}
