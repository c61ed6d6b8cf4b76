//! Time subsystem.
//!
//! `FrameClock` is the clock module: the lifecycle ticks it once per running
//! frame, after event draining and before the UI/update/render hooks.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime};
