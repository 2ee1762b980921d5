use anyhow::bail;
use winit::dpi::PhysicalSize;
use winit::window::{Window, WindowId};

use crate::animation::{FrameSubmitter, SceneView};
use crate::device::{Gpu, SurfaceErrorAction};
use crate::input::{InputFrame, InputState};
use crate::render::{HalftoneRenderer, RenderCtx, RenderTarget};
use crate::time::FrameTime;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    pub fn set_title(&self, title: &str) {
        self.window.set_title(title);
    }
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// A [`FrameSubmitter`] presenting to this window's surface through `renderer`.
    pub fn submitter<'s>(&'s mut self, renderer: &'s mut HalftoneRenderer) -> SurfaceSubmitter<'s, 'w> {
        SurfaceSubmitter { window: self.window.window, gpu: self.gpu, renderer }
    }
}

/// Presents [`SceneView`]s on a window surface.
///
/// The surface is reconfigured to `view.surface_size` before acquiring the
/// frame, so a resize applied during the tick takes effect in the same frame.
///
/// The viewport caps its device pixel ratio at 2, so on displays with a
/// higher scale factor the surface is smaller than the window's physical size
/// and the compositor stretches it to fill the window.
pub struct SurfaceSubmitter<'s, 'w> {
    window: &'s Window,
    gpu: &'s mut Gpu<'w>,
    renderer: &'s mut HalftoneRenderer,
}

impl FrameSubmitter for SurfaceSubmitter<'_, '_> {
    fn submit(&mut self, view: &SceneView<'_>) -> anyhow::Result<()> {
        let (width, height) = view.surface_size;
        let wanted = PhysicalSize::new(width, height);
        if self.gpu.size() != wanted {
            let window_size = self.window.inner_size();
            if surface_below_window(window_size, wanted) {
                log::info!(
                    "surface {}x{} is smaller than window {}x{}; output will be upscaled",
                    wanted.width,
                    wanted.height,
                    window_size.width,
                    window_size.height
                );
            }
            self.gpu.resize(wanted);
        }

        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let message = err.to_string();
                match self.gpu.handle_surface_error(err) {
                    SurfaceErrorAction::Fatal => bail!("unrecoverable surface error: {message}"),
                    action => {
                        log::debug!("{action}: {message}");
                        return Ok(());
                    }
                }
            }
        };

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let rctx = RenderCtx::new(self.gpu.device(), self.gpu.queue(), self.gpu.surface_format());
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, frame.size);
            self.renderer.render(&rctx, &mut target, view);
        }

        self.window.pre_present_notify();
        self.gpu.submit(frame);
        Ok(())
    }
}

/// True when `surface` covers fewer physical pixels than `window` on either axis.
fn surface_below_window(window: PhysicalSize<u32>, surface: PhysicalSize<u32>) -> bool {
    surface.width < window.width || surface.height < window.height
}
