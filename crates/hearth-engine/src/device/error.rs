/// What to do with the current frame after a surface error.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Surface was reconfigured; acquisition may succeed next frame.
    Reconfigured,
    /// Transient; skip this frame.
    SkipFrame,
    /// Unrecoverable (commonly OOM); nothing more will be presented.
    Fatal,
}
