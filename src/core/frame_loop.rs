//! Animation loop bookkeeping
//!
//! Tracks whether the loop runs and which frame is pending. The host owns
//! the actual scheduling primitive (egui repaint requests on the web, a plain
//! loop in the CLI) and asks this state machine what to do.

/// Identifier of a scheduled frame
pub type FrameId = u64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Stopped,
    Running { pending: FrameId },
}

#[derive(Debug)]
pub struct FrameLoop {
    state: LoopState,
    next_id: FrameId,
    /// Frames rendered since creation, across restarts
    rendered: u64,
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            next_id: 0,
            rendered: 0,
        }
    }

    /// Start the loop with a freshly scheduled frame.
    /// Returns `false` if it was already running.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }
        let id = self.allocate();
        self.state = LoopState::Running { pending: id };
        true
    }

    /// Cancel the pending frame and stop.
    /// Returns the cancelled frame, if any.
    pub fn cancel(&mut self) -> Option<FrameId> {
        match std::mem::replace(&mut self.state, LoopState::Stopped) {
            LoopState::Running { pending } => Some(pending),
            LoopState::Stopped => None,
        }
    }

    /// Consume the pending frame, if any, and schedule the next one.
    /// Returns the id of the frame to render now.
    pub fn take_frame(&mut self) -> Option<FrameId> {
        match self.state {
            LoopState::Running { pending } => {
                let next = self.allocate();
                self.state = LoopState::Running { pending: next };
                self.rendered += 1;
                Some(pending)
            }
            LoopState::Stopped => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn rendered(&self) -> u64 {
        self.rendered
    }

    fn allocate(&mut self) -> FrameId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}
