mod panel;

use std::path::PathBuf;

use anyhow::{Context, Result};
use winit::dpi::LogicalSize;

use halftone_engine::animation::AnimationLoop;
use halftone_engine::asset::{GltfLoader, PendingAsset};
use halftone_engine::context::AppContext;
use halftone_engine::core::{App, AppControl, FrameCtx};
use halftone_engine::device::GpuInit;
use halftone_engine::logging::{init_logging, LoggingConfig};
use halftone_engine::material::ShaderSources;
use halftone_engine::params::ParameterStore;
use halftone_engine::render::HalftoneRenderer;
use halftone_engine::scene::SceneConfig;
use halftone_engine::viewport::ResizeEvent;
use halftone_engine::window::{Runtime, RuntimeConfig};

use crate::panel::Panel;

const WINDOW_WIDTH: f64 = 1280.0;
const WINDOW_HEIGHT: f64 = 720.0;

struct Studio {
    ctx: AppContext,
    anim: AnimationLoop,
    renderer: HalftoneRenderer,
    panel: Panel,
    title_dirty: bool,
}

impl App for Studio {
    fn on_resize(&mut self, event: ResizeEvent) {
        self.ctx.request_resize(event);
    }

    fn on_frame(&mut self, frame: &mut FrameCtx<'_, '_>) -> AppControl {
        let outcome = self.panel.handle_keys(&mut self.ctx, frame.input_frame);
        if outcome.quit {
            return AppControl::Exit;
        }
        self.title_dirty |= outcome.changed;

        self.ctx
            .controls
            .handle_input(frame.input, frame.input_frame, self.ctx.viewport.height);

        let elapsed = frame.time.elapsed;
        let result = {
            let mut submitter = frame.submitter(&mut self.renderer);
            self.anim.tick(&mut self.ctx, elapsed, &mut submitter)
        };
        if let Err(e) = result {
            log::error!("frame {} failed: {e:#}", self.anim.frames());
            return AppControl::Exit;
        }

        if self.title_dirty {
            frame.window.set_title(&panel::status_line(&self.ctx, &self.panel));
            self.title_dirty = false;
        }

        AppControl::Continue
    }
}

fn run() -> Result<()> {
    let mut config = SceneConfig::default();
    if let Some(path) = std::env::args_os().nth(1) {
        config.asset_path = PathBuf::from(path);
    }

    let initial = ResizeEvent::new(WINDOW_WIDTH as f32, WINDOW_HEIGHT as f32, 1.0);
    let mut ctx = AppContext::new(&config, ParameterStore::default(), ShaderSources::builtin(), initial)
        .context("halftone material failed to compile")?;

    ctx.scene.attach(PendingAsset::spawn(GltfLoader, config.asset_path.clone()));

    let studio = Studio {
        ctx,
        anim: AnimationLoop::new(),
        renderer: HalftoneRenderer::default(),
        panel: Panel::new(),
        title_dirty: true,
    };

    let runtime = RuntimeConfig {
        title: "halftone".to_string(),
        initial_size: LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT),
    };
    Runtime::run(runtime, GpuInit::default(), studio)
}

fn main() {
    init_logging(LoggingConfig::default());

    if let Err(e) = run() {
        log::error!("{e:#}");
        std::process::exit(1);
    }
}
