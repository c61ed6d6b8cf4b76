use hearth_engine::coords::{Rect, Vec2};
use hearth_engine::input::Key;
use hearth_engine::logging::{init_logging, LoggingConfig};
use hearth_engine::module::ClockModule;
use hearth_engine::paint::Color;
use hearth_engine::{run, App, AppCtx, AppSetup, Desktop, GpuInit, Modules, WindowFlags};

type Ctx<'a> = AppCtx<'a, Desktop>;

const PANEL: Rect = Rect::new(16.0, 16.0, 220.0, 112.0);
const QUIT_BUTTON: Rect = Rect::new(32.0, 76.0, 188.0, 36.0);
const DIALOG_SIZE: Vec2 = Vec2::new(280.0, 140.0);

/// Demo application: a status panel, a Quit button guarded by a
/// confirmation dialog, and a camera mode toggled with Left Alt.
#[derive(Debug, Default)]
struct Demo {
    /// Shutdown was refused once and the dialog is showing.
    confirm_pending: bool,
    confirmed: bool,
    /// Pointer goes to the UI; otherwise the cursor is locked for camera
    /// look and raw motion reaches input.
    ui_mode: bool,
    look: Vec2,
}

impl Demo {
    fn toggle_mode(&mut self, ctx: &mut Ctx<'_>) {
        let ui_mode = !self.ui_mode;
        if let Err(err) = ctx.display.set_relative_cursor(!ui_mode) {
            log::warn!("camera mode unavailable: {err:#}");
            return;
        }
        ctx.ui.set_capture_mouse(ui_mode);
        self.ui_mode = ui_mode;
        log::info!("{} mode", if ui_mode { "ui" } else { "camera" });
    }

    fn confirmation_dialog(&mut self, ctx: &mut Ctx<'_>) {
        let view = ctx.ui.viewport();
        let dialog = Rect::centered(Vec2::new(view.width, view.height) * 0.5, DIALOG_SIZE);

        ctx.ui.set_layer(10);
        ctx.ui.fill(
            Rect::new(0.0, 0.0, view.width, view.height),
            Color::from_straight(0.0, 0.0, 0.0, 0.5),
        );
        ctx.ui.begin_panel(dialog);
        ctx.ui.label(dialog.origin + Vec2::new(20.0, 20.0), "QUIT HEARTH?");

        let button = Vec2::new(110.0, 36.0);
        let y = dialog.origin.y + dialog.size.y - button.y - 20.0;
        let yes = Rect::new(dialog.origin.x + 20.0, y, button.x, button.y);
        let no = Rect::new(dialog.origin.x + dialog.size.x - button.x - 20.0, y, button.x, button.y);

        if ctx.ui.button(yes, "YES") {
            self.confirmed = true;
            ctx.request_quit();
        }
        if ctx.ui.button(no, "NO") {
            self.confirm_pending = false;
        }
        ctx.ui.end_panel();
        ctx.ui.set_layer(0);
    }
}

impl App<Desktop> for Demo {
    fn setup(&mut self) -> AppSetup {
        AppSetup::new("hearth demo")
            .size(1280, 720)
            .flags(WindowFlags::RESIZABLE)
    }

    fn awake(&mut self, ctx: &mut Ctx<'_>) {
        match ctx.graphics.adapter_info() {
            Some(info) => log::info!(
                "gpu: {} ({:?}, {:?} backend)",
                info.name,
                info.device_type,
                info.backend
            ),
            None => log::warn!("gpu: no adapter info"),
        }
    }

    fn start(&mut self, ctx: &mut Ctx<'_>) {
        *self = Demo {
            ui_mode: true,
            ..Demo::default()
        };
        ctx.ui.set_capture_mouse(true);
    }

    fn update(&mut self, ctx: &mut Ctx<'_>) {
        if ctx.input.key_pressed(Key::Escape) {
            ctx.request_quit();
        }
        if ctx.input.key_pressed(Key::AltLeft) {
            self.toggle_mode(ctx);
        }

        if !self.ui_mode {
            let (dx, dy) = ctx.input.mouse_delta();
            self.look = self.look + Vec2::new(dx, dy) * 0.1;
        }
    }

    fn render(&mut self, ctx: &mut Ctx<'_>) {
        // Background drifts slowly; in camera mode it follows the look angle.
        let t = ctx.clock.elapsed() * 0.2 + self.look.x * 0.01;
        let g = 0.02 + 0.015 * (t.sin() * 0.5 + 0.5);
        ctx.graphics
            .set_clear_color(Color::from_straight(g, g, g * 1.4, 1.0));
    }

    fn gui(&mut self, ctx: &mut Ctx<'_>) {
        ctx.ui.begin_panel(PANEL);
        ctx.ui.label(PANEL.origin + Vec2::new(16.0, 16.0), "HEARTH");

        let fps = match ctx.clock.delta() {
            dt if dt > 0.0 => (1.0 / dt).round() as u32,
            _ => 0,
        };
        let mode = if self.ui_mode { "UI" } else { "CAMERA" };
        ctx.ui.label(
            PANEL.origin + Vec2::new(16.0, 36.0),
            &format!("{fps} FPS {mode}"),
        );

        if ctx.ui.button(QUIT_BUTTON, "QUIT") {
            ctx.request_quit();
        }
        ctx.ui.end_panel();

        if self.confirm_pending {
            self.confirmation_dialog(ctx);
        }
    }

    fn closing(&mut self, ctx: &mut Ctx<'_>) -> bool {
        if self.confirmed {
            return true;
        }
        self.confirm_pending = true;
        if !self.ui_mode {
            self.toggle_mode(ctx);
        }
        false
    }

    fn quit(&mut self, ctx: &mut Ctx<'_>) {
        let (presented, skipped) = ctx.graphics.frame_stats();
        log::info!("demo quit after {presented} frames ({skipped} skipped)");
    }
}

/// First readable system sans-serif font.
fn load_font() -> Option<Vec<u8>> {
    const CANDIDATES: &[&str] = &[
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    ];
    CANDIDATES.iter().find_map(|path| {
        let bytes = std::fs::read(path).ok()?;
        log::info!("font: {path}");
        Some(bytes)
    })
}

fn main() {
    init_logging(LoggingConfig::default());

    let mut modules = Modules::desktop(GpuInit::default());
    match load_font() {
        Some(bytes) => {
            if let Err(err) = modules.ui.load_font(&bytes) {
                log::warn!("{err}; labels use the block font");
            }
        }
        None => log::warn!("no system font found; labels use the block font"),
    }

    let summary = run(Demo::default(), modules);
    if let Some(failure) = &summary.init_failure {
        log::error!("{} module failed to start: {:#}", failure.module, failure.error);
    }

    std::process::exit(summary.exit_code());
}
