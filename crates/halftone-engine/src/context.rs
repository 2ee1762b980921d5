//! Application state shared by the per-frame loop.

use crate::camera::{OrbitControls, OrbitSettings, PerspectiveCamera};
use crate::material::{
    HalftoneMaterial, MaterialError, MaterialHandle, ShaderSources, UniformSlot, UniformValue,
};
use crate::paint::Color;
use crate::params::{
    ControlSurface, ParamEdit, ParamError, ParamTargets, ParamValue, ParameterStore,
};
use crate::scene::{SceneComposition, SceneConfig};
use crate::viewport::{ResizeEvent, ViewportState};

/// Everything the frame loop reads or mutates, built once at startup.
///
/// Invariants:
/// - `camera.aspect()` equals `viewport.aspect()`
/// - the material's resolution uniform equals `viewport.resolution()`
/// - `surface_size` equals `viewport.physical_size()`
///
/// All three are restored together by [`apply_resize`](Self::apply_resize).
#[derive(Debug)]
pub struct AppContext {
    pub viewport: ViewportState,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    /// Keyboard cursor over the parameter controls.
    pub panel: ControlSurface,
    pub params: ParameterStore,
    pub scene: SceneComposition,
    clear_color: Color,
    surface_size: (u32, u32),
    pending_resize: Option<ResizeEvent>,
}

impl AppContext {
    /// Compiles the material and builds the procedural scene.
    pub fn new(
        config: &SceneConfig,
        params: ParameterStore,
        sources: ShaderSources,
        initial: ResizeEvent,
    ) -> Result<Self, MaterialError> {
        let viewport = ViewportState::new(initial);
        let camera = PerspectiveCamera::new(config.camera, viewport.aspect());
        let material =
            HalftoneMaterial::new(sources, params.material.to_uniforms(viewport.resolution()))?;
        let scene = SceneComposition::procedural(material, &config.layout);

        Ok(Self {
            viewport,
            camera,
            controls: OrbitControls::new(OrbitSettings::default()),
            panel: ControlSurface::new(),
            clear_color: params.renderer.background_color,
            params,
            scene,
            surface_size: viewport.physical_size(),
            pending_resize: None,
        })
    }

    #[inline]
    pub fn material(&self) -> &MaterialHandle {
        self.scene.material()
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    /// Physical size the render surface should have.
    #[inline]
    pub fn surface_size(&self) -> (u32, u32) {
        self.surface_size
    }

    /// Records a host resize for the next tick. Later requests replace earlier ones.
    pub fn request_resize(&mut self, event: ResizeEvent) {
        self.pending_resize = Some(event);
    }

    pub fn take_pending_resize(&mut self) -> Option<ResizeEvent> {
        self.pending_resize.take()
    }

    /// Applies a resize: viewport, camera projection, surface size and
    /// resolution uniform, in one call.
    pub fn apply_resize(&mut self, event: ResizeEvent) -> Result<(), MaterialError> {
        self.viewport.resize(event);
        self.camera.set_aspect(self.viewport.aspect());
        self.surface_size = self.viewport.physical_size();
        self.scene
            .material()
            .set_uniform(UniformSlot::Resolution, UniformValue::Vec2(self.viewport.resolution()))?;

        log::debug!(
            "resized to {}x{} @{} (surface {}x{})",
            self.viewport.width,
            self.viewport.height,
            self.viewport.pixel_ratio,
            self.surface_size.0,
            self.surface_size.1,
        );
        Ok(())
    }

    /// Routes a control-surface edit through the store to its hook.
    pub fn apply_edit(&mut self, edit: ParamEdit) -> Result<ParamValue, ParamError> {
        let mut targets = ParamTargets {
            material: self.scene.material(),
            clear_color: &mut self.clear_color,
        };
        self.params.apply_edit(edit, &mut targets)
    }
}
