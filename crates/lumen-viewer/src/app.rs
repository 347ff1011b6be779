use lumen_engine::core::{App, AppControl, FrameCtx};
use lumen_engine::device::GpuInit;
use lumen_engine::input::{CameraControls, ControlAction, ControlSettings};
use lumen_engine::render::{KernelSource, PresentRenderer, WgpuCompute};
use lumen_engine::scene::Scene;
use lumen_engine::session::{Session, SessionConfig};
use lumen_engine::time::ThroughputMeter;
use lumen_engine::window::{LogicalSize, Runtime, RuntimeConfig};

const DEFAULT_KERNEL: KernelSource<'static> = KernelSource {
    label: "lumen path tracer",
    wgsl: include_str!("../kernels/path_trace.wgsl"),
    entry_point: "main",
};

/// Frames between window title refreshes.
const TITLE_INTERVAL: u32 = 30;

/// Interactive viewer builder.
pub struct Viewer {
    title: String,
    config: SessionConfig,
    scene: Scene,
    controls: ControlSettings,
    gpu: GpuInit,
    kernel: KernelSource<'static>,
}

impl Viewer {
    pub fn new() -> Self {
        Self {
            title: "lumen".to_string(),
            config: SessionConfig::default(),
            scene: Scene::default_spheres(),
            controls: ControlSettings::default(),
            gpu: GpuInit::default(),
            kernel: DEFAULT_KERNEL,
        }
    }

    pub fn title(mut self, t: impl Into<String>) -> Self {
        self.title = t.into();
        self
    }

    /// Initial window size in logical pixels. The render resolution follows
    /// the window's physical size.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn fov(mut self, degrees: f32) -> Self {
        self.config.horizontal_fov_degrees = degrees;
        self
    }

    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.config.seed = seed;
        self
    }

    pub fn scene(mut self, scene: Scene) -> Self {
        self.scene = scene;
        self
    }

    /// Opens the window and runs until the user exits.
    pub fn run(self) -> anyhow::Result<()> {
        let runtime = RuntimeConfig {
            title: self.title.clone(),
            initial_size: LogicalSize::new(self.config.width as f64, self.config.height as f64),
            resizable: true,
        };
        let session = Session::new(self.config, self.scene)?;
        let app = ViewerApp {
            session: Some(session),
            controls: CameraControls::new(self.controls),
            kernel: self.kernel,
            compute: None,
            presenter: PresentRenderer::new(),
            meter: ThroughputMeter::default(),
            title: self.title,
            frames_since_title: 0,
        };
        Runtime::run(runtime, self.gpu, app)
    }
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

struct ViewerApp {
    session: Option<Session>,
    controls: CameraControls,
    kernel: KernelSource<'static>,
    compute: Option<WgpuCompute>,
    presenter: PresentRenderer,
    meter: ThroughputMeter,
    title: String,
    frames_since_title: u32,
}

impl App for ViewerApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(session) = self.session.as_mut() else {
            return AppControl::Exit;
        };

        for action in self.controls.actions(ctx.input_frame) {
            match action {
                ControlAction::Exit => return AppControl::Exit,
                ControlAction::ResetCamera => {
                    if let Err(e) = session.reset_camera() {
                        log::warn!("camera reset failed: {e}");
                    }
                }
                ControlAction::Camera(command) => {
                    if let Err(e) = session.apply(command) {
                        log::warn!("ignored camera input: {e}");
                    }
                }
            }
        }

        // Minimized: nothing to render into.
        if !ctx.gpu.is_drawable() {
            return AppControl::Continue;
        }
        let size = ctx.gpu.size();
        if let Err(e) = session.resize(size.width, size.height) {
            log::warn!("resize to {}x{} rejected: {e}", size.width, size.height);
        }

        if self.compute.is_none() {
            match WgpuCompute::new(ctx.gpu.device(), ctx.gpu.queue(), self.kernel) {
                Ok(compute) => {
                    self.compute = Some(compute);
                    session.invalidate_device();
                }
                Err(e) => {
                    log::error!("{e}");
                    return AppControl::Exit;
                }
            }
        }
        let Some(compute) = self.compute.as_mut() else {
            return AppControl::Exit;
        };

        let report = match session.render_frame(compute) {
            Ok(report) => report,
            Err(e) => {
                log::error!("device error, ending session: {e}");
                return AppControl::Exit;
            }
        };

        let presenter = &mut self.presenter;
        let control = ctx.present(|rctx, target| {
            presenter.render(rctx, target, compute.presentation());
        });

        self.meter
            .record(ctx.time.now, report.work.pixel_count, report.sample_count());

        self.frames_since_title += 1;
        if report.cleared() || self.frames_since_title >= TITLE_INTERVAL {
            self.frames_since_title = 0;
            ctx.runtime
                .set_title(format!("{} | {} spp", self.title, report.sample_count()));
        }

        control
    }

    fn on_exit(&mut self) {
        if let Some(session) = self.session.take() {
            session.finish();
        }
    }
}
