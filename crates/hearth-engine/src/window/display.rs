use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{
    CursorGrabMode, CursorIcon, Fullscreen, Window, WindowAttributes, WindowId, WindowLevel,
};

use crate::core::{AppSetup, WindowFlags};
use crate::module::{DisplayModule, PlatformEvent};

use super::translate::Translator;

/// Pumps allowed during `init` for the platform to deliver `resumed`.
const STARTUP_PUMPS: usize = 16;

/// winit-backed display module.
///
/// Owns the event loop and the single application window. The loop is never
/// run; every frame pumps it once without blocking, so the lifecycle keeps
/// control of the frame loop.
pub struct WinitDisplay {
    event_loop: Option<EventLoop<()>>,
    window: Option<Arc<Window>>,
    translator: Translator,
    pending: Vec<PlatformEvent>,
    cursor_shown: bool,
    relative_cursor: bool,
}

impl Default for WinitDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitDisplay {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            window: None,
            translator: Translator::new(),
            pending: Vec::new(),
            cursor_shown: true,
            relative_cursor: false,
        }
    }

    /// The application window, once initialized.
    #[inline]
    pub fn window(&self) -> Option<&Arc<Window>> {
        self.window.as_ref()
    }

    /// Requests a new inner size in logical pixels. The platform may refuse
    /// or adjust it; the result arrives as a resize event.
    pub fn set_size(&mut self, width: u32, height: u32) {
        if let Some(window) = &self.window {
            let _ = window.request_inner_size(LogicalSize::new(width as f64, height as f64));
        }
    }

    pub fn show_cursor(&mut self, show: bool) {
        if let Some(window) = &self.window {
            window.set_cursor_visible(show);
        }
        self.cursor_shown = show;
    }

    #[inline]
    pub fn cursor_shown(&self) -> bool {
        self.cursor_shown
    }

    pub fn set_cursor_icon(&mut self, icon: CursorIcon) {
        if let Some(window) = &self.window {
            window.set_cursor(icon);
        }
    }

    /// Locks and hides the cursor and switches pointer reporting to raw
    /// motion deltas. Platforms without locking fall back to confining.
    pub fn set_relative_cursor(&mut self, enabled: bool) -> Result<()> {
        let Some(window) = &self.window else {
            bail!("relative cursor requested before the display initialized");
        };

        if enabled {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
                .context("failed to grab the cursor")?;
        } else {
            window
                .set_cursor_grab(CursorGrabMode::None)
                .context("failed to release the cursor")?;
        }

        window.set_cursor_visible(!enabled && self.cursor_shown);
        self.relative_cursor = enabled;
        Ok(())
    }

    #[inline]
    pub fn relative_cursor(&self) -> bool {
        self.relative_cursor
    }

    /// Pumps until the platform resumes the application and the window
    /// exists.
    fn open_window(&mut self, setup: &AppSetup) -> Result<()> {
        for _ in 0..STARTUP_PUMPS {
            if let PumpStatus::Exit(code) = self.pump(Some(setup))? {
                bail!("event loop exited during startup (code {code})");
            }
            if self.window.is_some() {
                return Ok(());
            }
        }
        bail!("platform never resumed the application; no window created")
    }

    fn pump(&mut self, setup: Option<&AppSetup>) -> Result<PumpStatus> {
        let event_loop = self
            .event_loop
            .as_mut()
            .context("display event loop is not running")?;

        let mut pump = Pump {
            setup,
            window: &mut self.window,
            translator: &mut self.translator,
            queue: &mut self.pending,
            relative: self.relative_cursor,
            error: None,
        };

        let status = event_loop.pump_app_events(Some(Duration::ZERO), &mut pump);
        match pump.error.take() {
            Some(err) => Err(err),
            None => Ok(status),
        }
    }
}

impl DisplayModule for WinitDisplay {
    fn init(&mut self, setup: &AppSetup) -> Result<()> {
        debug_assert!(
            self.window.is_none() && self.event_loop.is_none(),
            "display initialized twice"
        );
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        self.event_loop = Some(event_loop);

        if let Err(err) = self.open_window(setup) {
            self.quit();
            return Err(err);
        }

        self.cursor_shown = true;
        self.relative_cursor = false;
        Ok(())
    }

    fn quit(&mut self) {
        debug_assert!(self.event_loop.is_some(), "display quit without init");
        self.window = None;
        self.event_loop = None;
        self.pending.clear();
        self.translator = Translator::new();
        self.relative_cursor = false;
    }

    fn logical_size(&self) -> (u32, u32) {
        self.window.as_ref().map_or((0, 0), |w| {
            let size: LogicalSize<u32> = w.inner_size().to_logical(w.scale_factor());
            (size.width, size.height)
        })
    }

    fn drawable_size(&self) -> (u32, u32) {
        self.window.as_ref().map_or((0, 0), |w| {
            let size = w.inner_size();
            (size.width, size.height)
        })
    }

    fn poll_events(&mut self, queue: &mut Vec<PlatformEvent>) {
        match self.pump(None) {
            Ok(PumpStatus::Continue) => {}
            Ok(PumpStatus::Exit(code)) => {
                log::warn!("event loop exited (code {code}); treating as close request");
                self.pending.push(PlatformEvent::CloseRequested);
            }
            Err(err) => log::error!("event pump failed: {err:#}"),
        }
        queue.append(&mut self.pending);
    }
}

/// `ApplicationHandler` for a single pump. Creates the window on the first
/// `resumed` when `setup` is given; otherwise only translates events.
struct Pump<'a> {
    setup: Option<&'a AppSetup>,
    window: &'a mut Option<Arc<Window>>,
    translator: &'a mut Translator,
    queue: &'a mut Vec<PlatformEvent>,
    relative: bool,
    error: Option<anyhow::Error>,
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(setup) = self.setup else {
            return;
        };

        let mut attrs = window_attributes(setup);
        if setup.centered {
            if let Some(monitor) = event_loop.primary_monitor() {
                let size: PhysicalSize<u32> = LogicalSize::new(setup.width, setup.height)
                    .to_physical(monitor.scale_factor());
                let pos = monitor.position();
                let (x, y) = center_in(
                    (pos.x, pos.y),
                    (monitor.size().width, monitor.size().height),
                    (size.width, size.height),
                );
                attrs = attrs.with_position(PhysicalPosition::new(x, y));
            }
        }

        match event_loop.create_window(attrs) {
            Ok(window) => {
                log::debug!(
                    "window created: {}x{} @ {:.2}x",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                *self.window = Some(Arc::new(window));
            }
            Err(err) => {
                self.error = Some(anyhow::Error::new(err).context("failed to create window"));
            }
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(window) = self.window.as_ref() else {
            return;
        };
        self.translator
            .translate(window.scale_factor(), &event, self.queue);
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if !self.relative {
            return;
        }
        if let DeviceEvent::MouseMotion { delta } = event {
            self.queue.push(self.translator.motion(delta));
        }
    }
}

fn window_attributes(setup: &AppSetup) -> WindowAttributes {
    let flags = setup.flags;

    let mut attrs = Window::default_attributes()
        .with_title(setup.title.clone())
        .with_inner_size(LogicalSize::new(setup.width as f64, setup.height as f64))
        .with_resizable(flags.contains(WindowFlags::RESIZABLE))
        .with_visible(!flags.contains(WindowFlags::HIDDEN))
        .with_decorations(!flags.contains(WindowFlags::BORDERLESS))
        .with_maximized(flags.contains(WindowFlags::MAXIMIZED));

    if !setup.centered {
        attrs = attrs.with_position(LogicalPosition::new(setup.x as f64, setup.y as f64));
    }
    if flags.contains(WindowFlags::FULLSCREEN) {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }
    if flags.contains(WindowFlags::ALWAYS_ON_TOP) {
        attrs = attrs.with_window_level(WindowLevel::AlwaysOnTop);
    }

    attrs
}

/// Top-left corner that centers `window` on a monitor. Windows larger than
/// the monitor are pinned to its origin.
fn center_in(monitor_pos: (i32, i32), monitor_size: (u32, u32), window: (u32, u32)) -> (i32, i32) {
    let axis = |origin: i32, extent: u32, len: u32| {
        origin + (extent.saturating_sub(len) / 2) as i32
    };
    (
        axis(monitor_pos.0, monitor_size.0, window.0),
        axis(monitor_pos.1, monitor_size.1, window.1),
    )
}

#[cfg(test)]
mod tests {
    use winit::dpi::{Position, Size};

    use super::*;

    #[test]
    fn centers_on_monitor() {
        assert_eq!(center_in((0, 0), (1920, 1080), (1280, 720)), (320, 180));
        assert_eq!(center_in((1920, 0), (1920, 1080), (800, 600)), (2480, 240));
    }

    #[test]
    fn oversized_window_pins_to_monitor_origin() {
        assert_eq!(center_in((-100, 50), (800, 600), (1000, 700)), (-100, 50));
    }

    #[test]
    fn attributes_follow_flags() {
        let setup = AppSetup::new("flags")
            .size(640, 480)
            .flags(WindowFlags::RESIZABLE | WindowFlags::BORDERLESS | WindowFlags::HIDDEN);
        let attrs = window_attributes(&setup);

        assert_eq!(attrs.title, "flags");
        assert!(attrs.resizable);
        assert!(!attrs.decorations);
        assert!(!attrs.visible);
        assert!(!attrs.maximized);
        assert!(attrs.fullscreen.is_none());
        assert_eq!(
            attrs.inner_size,
            Some(Size::Logical(LogicalSize::new(640.0, 480.0)))
        );
        // Centered windows are positioned at creation against the monitor.
        assert!(attrs.position.is_none());
    }

    #[test]
    fn explicit_position_is_kept_when_not_centered() {
        let setup = AppSetup::new("pos").at(10, 20);
        let attrs = window_attributes(&setup);
        assert_eq!(
            attrs.position,
            Some(Position::Logical(LogicalPosition::new(10.0, 20.0)))
        );
        assert!(!attrs.resizable);
    }

    #[test]
    fn uninitialized_display_is_inert() {
        let mut display = WinitDisplay::new();
        assert_eq!(display.logical_size(), (0, 0));
        assert_eq!(display.drawable_size(), (0, 0));
        assert!(display.window().is_none());
        assert!(display.set_relative_cursor(true).is_err());
        assert!(!display.relative_cursor());

        display.show_cursor(false);
        assert!(!display.cursor_shown());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "display quit without init")]
    fn quit_without_init_panics() {
        WinitDisplay::new().quit();
    }
}
