//! Recording mock modules for lifecycle tests.
//!
//! All mocks share one [`Harness`] that scripts their behaviour (failing
//! module, reported sizes, event batches) and journals every call in order.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use anyhow::{bail, Result};

use crate::core::{App, AppCtx, AppSetup};
use crate::input::EventCategory;
use crate::module::{
    Backend, ClockModule, DisplayModule, GraphicsModule, InputModule, ModuleKind, Modules,
    PlatformEvent, UiModule,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Init(ModuleKind),
    Quit(ModuleKind),
    Poll,
    NewFrame,
    UiEvent(PlatformEvent),
    InputEvent(PlatformEvent),
    Tick,
    /// Logical size and scale factors (in hundredths).
    BeginFrame { width: u32, height: u32, scale_x: u32, scale_y: u32 },
    EndFrame,
    Resize(u32, u32),
    SubmitDraw,
    Present,
    Hook(&'static str),
}

#[derive(Debug)]
pub struct Harness {
    pub calls: Vec<Call>,
    pub fail: Option<ModuleKind>,
    pub logical: (u32, u32),
    pub drawable: (u32, u32),
    /// One batch per `poll_events` call; empty once exhausted. A `Resized`
    /// event in a batch updates `drawable` when the batch is polled.
    pub batches: VecDeque<Vec<PlatformEvent>>,
    /// UI claims pointer events.
    pub ui_claims_pointer: bool,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            fail: None,
            logical: (800, 600),
            drawable: (800, 600),
            batches: VecDeque::new(),
            ui_claims_pointer: false,
        }
    }
}

pub type Shared = Rc<RefCell<Harness>>;

pub fn shared() -> Shared {
    Rc::new(RefCell::new(Harness::default()))
}

fn record(h: &Shared, call: Call) {
    h.borrow_mut().calls.push(call);
}

fn init(h: &Shared, kind: ModuleKind) -> Result<()> {
    record(h, Call::Init(kind));
    if h.borrow().fail == Some(kind) {
        bail!("{kind} refused to start");
    }
    Ok(())
}

pub struct MockDisplay(pub Shared);
pub struct MockGraphics(pub Shared);
pub struct MockUi(pub Shared);
pub struct MockClock(pub Shared);
pub struct MockInput(pub Shared);

impl DisplayModule for MockDisplay {
    fn init(&mut self, _setup: &AppSetup) -> Result<()> {
        init(&self.0, ModuleKind::Display)
    }

    fn quit(&mut self) {
        record(&self.0, Call::Quit(ModuleKind::Display));
    }

    fn logical_size(&self) -> (u32, u32) {
        self.0.borrow().logical
    }

    fn drawable_size(&self) -> (u32, u32) {
        self.0.borrow().drawable
    }

    fn poll_events(&mut self, queue: &mut Vec<PlatformEvent>) {
        record(&self.0, Call::Poll);
        let mut h = self.0.borrow_mut();
        if let Some(batch) = h.batches.pop_front() {
            for event in &batch {
                if let PlatformEvent::Resized { width, height } = *event {
                    h.drawable = (width, height);
                }
            }
            queue.extend(batch);
        }
    }
}

impl GraphicsModule for MockGraphics {
    type Display = MockDisplay;

    fn init(&mut self, _display: &MockDisplay) -> Result<()> {
        init(&self.0, ModuleKind::Graphics)
    }

    fn quit(&mut self) {
        record(&self.0, Call::Quit(ModuleKind::Graphics));
    }

    fn notify_resize(&mut self, width: u32, height: u32) {
        record(&self.0, Call::Resize(width, height));
    }

    fn present(&mut self) {
        record(&self.0, Call::Present);
    }
}

impl UiModule for MockUi {
    type Graphics = MockGraphics;

    fn init(&mut self) -> Result<()> {
        init(&self.0, ModuleKind::Ui)
    }

    fn quit(&mut self) {
        record(&self.0, Call::Quit(ModuleKind::Ui));
    }

    fn begin_frame(&mut self, width: u32, height: u32, scale_x: f32, scale_y: f32) {
        record(
            &self.0,
            Call::BeginFrame {
                width,
                height,
                scale_x: (scale_x * 100.0).round() as u32,
                scale_y: (scale_y * 100.0).round() as u32,
            },
        );
    }

    fn end_frame(&mut self) {
        record(&self.0, Call::EndFrame);
    }

    fn process_event(&mut self, event: &PlatformEvent) -> bool {
        record(&self.0, Call::UiEvent(event.clone()));
        let pointer = event
            .as_input()
            .is_some_and(|ev| ev.category() == EventCategory::Pointer);
        pointer && self.0.borrow().ui_claims_pointer
    }

    fn submit_draw(&mut self, _graphics: &mut MockGraphics) {
        record(&self.0, Call::SubmitDraw);
    }
}

impl ClockModule for MockClock {
    fn init(&mut self) -> Result<()> {
        init(&self.0, ModuleKind::Clock)
    }

    fn quit(&mut self) {
        record(&self.0, Call::Quit(ModuleKind::Clock));
    }

    fn tick(&mut self) {
        record(&self.0, Call::Tick);
    }

    fn delta(&self) -> f32 {
        1.0 / 60.0
    }

    fn elapsed(&self) -> f32 {
        0.0
    }
}

impl InputModule for MockInput {
    fn init(&mut self) -> Result<()> {
        init(&self.0, ModuleKind::Input)
    }

    fn quit(&mut self) {
        record(&self.0, Call::Quit(ModuleKind::Input));
    }

    fn new_frame(&mut self) {
        record(&self.0, Call::NewFrame);
    }

    fn process_event(&mut self, event: &PlatformEvent) {
        record(&self.0, Call::InputEvent(event.clone()));
    }
}

pub struct MockBackend;

impl Backend for MockBackend {
    type Display = MockDisplay;
    type Graphics = MockGraphics;
    type Ui = MockUi;
    type Clock = MockClock;
    type Input = MockInput;
}

pub fn modules(h: &Shared) -> Modules<MockBackend> {
    Modules::new(
        MockDisplay(h.clone()),
        MockGraphics(h.clone()),
        MockUi(h.clone()),
        MockClock(h.clone()),
        MockInput(h.clone()),
    )
}

/// Test application.
///
/// Requests quit from `update` once `quit_on_frame` frames have run, and
/// answers `closing` from `closing_answers` (true once exhausted).
pub struct ScriptedApp {
    pub h: Shared,
    pub frames: u64,
    pub quit_on_frame: Option<u64>,
    pub keep_requesting: bool,
    pub closing_answers: VecDeque<bool>,
}

impl ScriptedApp {
    pub fn new(h: &Shared) -> Self {
        Self {
            h: h.clone(),
            frames: 0,
            quit_on_frame: None,
            keep_requesting: false,
            closing_answers: VecDeque::new(),
        }
    }

    fn hook(&self, name: &'static str) {
        record(&self.h, Call::Hook(name));
    }
}

impl App<MockBackend> for ScriptedApp {
    fn setup(&mut self) -> AppSetup {
        self.hook("setup");
        AppSetup::new("test")
    }

    fn awake(&mut self, _ctx: &mut AppCtx<'_, MockBackend>) {
        self.hook("awake");
    }

    fn start(&mut self, _ctx: &mut AppCtx<'_, MockBackend>) {
        self.hook("start");
    }

    fn update(&mut self, ctx: &mut AppCtx<'_, MockBackend>) {
        self.hook("update");
        self.frames += 1;
        if let Some(n) = self.quit_on_frame {
            let due = if self.keep_requesting { self.frames >= n } else { self.frames == n };
            if due {
                ctx.request_quit();
            }
        }
    }

    fn render(&mut self, _ctx: &mut AppCtx<'_, MockBackend>) {
        self.hook("render");
    }

    fn gui(&mut self, _ctx: &mut AppCtx<'_, MockBackend>) {
        self.hook("gui");
    }

    fn closing(&mut self, _ctx: &mut AppCtx<'_, MockBackend>) -> bool {
        self.hook("closing");
        self.closing_answers.pop_front().unwrap_or(true)
    }

    fn quit(&mut self, _ctx: &mut AppCtx<'_, MockBackend>) {
        self.hook("quit");
    }
}
