//! Core application-facing contracts.
//!
//! This module defines the stable interface between the lifecycle and user
//! code: the configuration record, the hook trait, and the per-hook context.

mod app;
mod ctx;
mod setup;

pub use app::App;
pub use ctx::AppCtx;
pub use setup::{AppSetup, WindowFlags};
