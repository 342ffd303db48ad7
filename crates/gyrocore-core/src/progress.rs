//! Progress reporting for long-running phases
//!
//! The field builder and marching cubes are the only phases that run
//! long enough to warrant progress reporting (§5). A hosting event loop
//! can repaint and process input between reports; a pure-CLI caller may
//! ignore them entirely.

/// What the caller wants to happen after a progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressControl {
    /// Keep going.
    Continue,
    /// Stop generation. All working buffers are local to the current
    /// call, so unwinding here leaves no partial global state.
    Cancel,
}

/// Receives progress reports as integer percentages in `[0, 100]`.
pub trait Progress {
    fn on_progress(&mut self, percent: u32) -> ProgressControl;

    /// Report `percent`, turning a `Cancel` response into an error.
    fn report(&mut self, percent: u32) -> crate::Result<()> {
        match self.on_progress(percent) {
            ProgressControl::Continue => Ok(()),
            ProgressControl::Cancel => Err(crate::Error::Cancelled),
        }
    }
}

impl<F: FnMut(u32) -> ProgressControl> Progress for F {
    fn on_progress(&mut self, percent: u32) -> ProgressControl {
        self(percent)
    }
}

/// A `Progress` sink that always continues and reports nothing further.
pub struct NullProgress;

impl Progress for NullProgress {
    fn on_progress(&mut self, _percent: u32) -> ProgressControl {
        ProgressControl::Continue
    }
}
