//! Press-and-hold gesture tension
//!
//! Tracks how long a pointer has been held and reports normalized tension
//! toward a completion threshold: `tension = min(1, held_ms / target_ms)`.
//! Release before completion either discards progress ([`HoldMode::Reset`],
//! the default) or banks it for the next press ([`HoldMode::Cumulative`]).
//! Completion latches and fires its callback once per arming.

/// What happens to partial progress when the pointer lifts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoldMode {
    /// Release discards progress; the next press starts from zero
    #[default]
    Reset,
    /// Release banks progress; the next press resumes from it
    Cumulative,
}

/// Hold gesture configuration
#[derive(Clone, Copy, Debug)]
pub struct HoldConfig {
    /// Held milliseconds required for completion
    pub target_ms: f32,
    /// Release behavior
    pub mode: HoldMode,
}

impl Default for HoldConfig {
    fn default() -> Self {
        Self {
            target_ms: 3000.0,
            mode: HoldMode::Reset,
        }
    }
}

impl HoldConfig {
    pub fn new(target_ms: f32) -> Self {
        Self {
            target_ms,
            ..Self::default()
        }
    }

    /// Keep partial progress across releases
    pub fn cumulative(mut self) -> Self {
        self.mode = HoldMode::Cumulative;
        self
    }
}

/// Gesture lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HoldState {
    #[default]
    Idle,
    Holding,
    Complete,
}

/// A press-and-hold gesture primitive
pub struct HoldGesture {
    config: HoldConfig,
    state: HoldState,
    /// Progress banked from earlier presses (Cumulative mode only)
    banked_ms: f32,
    /// Held time in the current press
    held_ms: f32,
    on_complete: Option<Box<dyn FnMut() + Send>>,
}

impl HoldGesture {
    pub fn new(config: HoldConfig) -> Self {
        Self {
            config,
            state: HoldState::Idle,
            banked_ms: 0.0,
            held_ms: 0.0,
            on_complete: None,
        }
    }

    /// Set the callback fired once when tension reaches 1
    pub fn on_complete<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn state(&self) -> HoldState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == HoldState::Complete
    }

    /// Whether a press is currently accumulating tension
    pub fn is_active(&self) -> bool {
        self.state == HoldState::Holding
    }

    /// Normalized tension in [0, 1]
    ///
    /// Recomputed from accumulated held time; a zero target reads as full
    /// tension the moment a press is down.
    pub fn tension(&self) -> f32 {
        if self.state == HoldState::Complete {
            return 1.0;
        }
        if self.config.target_ms <= 0.0 {
            return if self.state == HoldState::Holding {
                1.0
            } else {
                0.0
            };
        }
        ((self.banked_ms + self.held_ms) / self.config.target_ms).clamp(0.0, 1.0)
    }

    /// Pointer down. No-op while already holding or after completion.
    pub fn press(&mut self) {
        if self.state == HoldState::Idle {
            self.state = HoldState::Holding;
            self.held_ms = 0.0;
        }
    }

    /// Pointer up. No-op while idle or after completion.
    pub fn release(&mut self) {
        if self.state != HoldState::Holding {
            return;
        }
        match self.config.mode {
            HoldMode::Reset => {
                self.banked_ms = 0.0;
            }
            HoldMode::Cumulative => {
                self.banked_ms += self.held_ms;
            }
        }
        self.held_ms = 0.0;
        self.state = HoldState::Idle;
    }

    /// Advance by a frame delta
    pub fn tick(&mut self, dt_ms: f32) {
        if self.state != HoldState::Holding {
            return;
        }
        self.held_ms += dt_ms.max(0.0);
        if self.tension() >= 1.0 {
            self.state = HoldState::Complete;
            if let Some(ref mut callback) = self.on_complete {
                callback();
            }
        }
    }

    /// Return to the initial snapshot and re-arm the completion callback
    pub fn reset(&mut self) {
        self.state = HoldState::Idle;
        self.banked_ms = 0.0;
        self.held_ms = 0.0;
    }
}
