//! Hearth engine crate.
//!
//! Application shell for real-time renderers. A run walks a fixed lifecycle
//! (init, running, cleanup, destroy) over five owned modules and calls the
//! user's [`App`] hooks at defined points of each frame.
//!
//! ```no_run
//! use hearth_engine::{run, App, AppSetup, Desktop, GpuInit, Modules};
//!
//! struct Hello;
//!
//! impl App<Desktop> for Hello {
//!     fn setup(&mut self) -> AppSetup {
//!         AppSetup::new("hello")
//!     }
//! }
//!
//! let summary = run(Hello, Modules::desktop(GpuInit::default()));
//! std::process::exit(summary.exit_code());
//! ```

pub mod core;
pub mod lifecycle;
pub mod module;

pub mod device;
pub mod input;
pub mod time;
pub mod ui;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod text;

mod desktop;

pub use crate::core::{App, AppCtx, AppSetup, WindowFlags};
pub use desktop::Desktop;
pub use device::GpuInit;
pub use lifecycle::{run, LifecycleState, RunSummary};
pub use module::{Backend, ModuleKind, Modules, PlatformEvent};
