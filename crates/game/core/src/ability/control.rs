use core::fmt;

/// Polling interface between an input source (player keys, AI) and an ability.
///
/// `poll_start` and `poll_end` are edge-triggered: they report a transition since
/// the last [`ControlModule::update`]. `poll_continue` is level-triggered.
pub trait ControlModule: fmt::Debug {
    /// The control was switched on since the last update.
    fn poll_start(&self) -> bool;

    /// The control is currently on.
    fn poll_continue(&self) -> bool;

    /// The control was switched off since the last update.
    fn poll_end(&self) -> bool;

    fn press(&mut self) {}

    fn release(&mut self) {}

    /// Press now and release on the next update.
    fn tap(&mut self) {}

    /// Latches the current state; called once per tick after abilities polled.
    fn update(&mut self) {}
}

/// Key-press-like control driven by code rather than hardware.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AiControl {
    state: bool,
    last_state: bool,
    tapping: bool,
}

impl AiControl {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ControlModule for AiControl {
    fn poll_start(&self) -> bool {
        self.state && !self.last_state
    }

    fn poll_continue(&self) -> bool {
        self.state
    }

    fn poll_end(&self) -> bool {
        !self.state && self.last_state
    }

    fn press(&mut self) {
        self.state = true;
    }

    fn release(&mut self) {
        self.state = false;
    }

    fn tap(&mut self) {
        self.state = true;
        self.tapping = true;
    }

    fn update(&mut self) {
        self.last_state = self.state;
        if self.tapping {
            self.tapping = false;
            self.release();
        }
    }
}
