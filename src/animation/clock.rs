use std::sync::Arc;

use winit::window::Window;

/// Schedules the next animation tick
///
/// The loop calls [`on_next_frame`](Clock::on_next_frame) at the end of every tick
/// and must not block in it; the clock decides when the next tick happens.
pub trait Clock {
    fn on_next_frame(&mut self);
}

/// Clock paced by the window's redraw requests
///
/// With FIFO presentation the redraws arrive once per display refresh.
#[derive(Debug, Clone)]
pub struct WindowClock {
    window: Arc<Window>,
}

impl WindowClock {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window }
    }
}

impl Clock for WindowClock {
    fn on_next_frame(&mut self) {
        self.window.request_redraw();
    }
}

/// Clock that only records requests; frames are fired explicitly
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    pending: bool,
    requests: u64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a frame has been requested and not fired yet
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total number of frame requests received
    pub fn requests(&self) -> u64 {
        self.requests
    }

    /// Consumes the pending request, if any
    pub fn fire(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

impl Clock for ManualClock {
    fn on_next_frame(&mut self) {
        self.pending = true;
        self.requests += 1;
    }
}
