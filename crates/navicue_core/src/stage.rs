//! The vignette lifecycle stage machine
//!
//! Every specimen walks the same arc: `Arriving → Present → Active →
//! Resonant → Afterglow`. The opening stages advance on fixed dwell times;
//! the `Active → Resonant` edge instead waits for the host to open the gate
//! (wired to a hold gesture, ceremony, or breath-cycle completion). Afterglow
//! is terminal: once its dwell passes, the externally supplied completion
//! callback fires exactly once.

use crate::fsm::{EventId, StateId, StateMachine};

/// Lifecycle stage of a vignette
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Fading in; nothing is interactive yet
    Arriving,
    /// Settled on screen, presenting its copy
    Present,
    /// Interactive; waiting on the gate
    Active,
    /// The gate opened; the payoff moment plays
    Resonant,
    /// Winding down before the host advances
    Afterglow,
}

impl Stage {
    pub const fn id(self) -> StateId {
        match self {
            Stage::Arriving => 0,
            Stage::Present => 1,
            Stage::Active => 2,
            Stage::Resonant => 3,
            Stage::Afterglow => 4,
        }
    }

    fn from_id(id: StateId) -> Stage {
        match id {
            0 => Stage::Arriving,
            1 => Stage::Present,
            2 => Stage::Active,
            3 => Stage::Resonant,
            _ => Stage::Afterglow,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Stage::Arriving => "arriving",
            Stage::Present => "present",
            Stage::Active => "active",
            Stage::Resonant => "resonant",
            Stage::Afterglow => "afterglow",
        }
    }
}

/// Stage events
pub mod events {
    use super::EventId;

    /// Dwell time for the current stage elapsed
    pub const ADVANCE: EventId = 1;
    /// The host opened the resonance gate
    pub const GATE: EventId = 2;
}

/// Per-stage dwell times in milliseconds
///
/// `active_ms` is `None` by default: the active stage is gated and only
/// [`StageDriver::open_gate`] moves past it. Setting it gives ungated
/// vignettes an automatic advance.
#[derive(Clone, Copy, Debug)]
pub struct StageTimings {
    pub arriving_ms: f64,
    pub present_ms: f64,
    pub active_ms: Option<f64>,
    pub resonant_ms: f64,
    pub afterglow_ms: f64,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            arriving_ms: 900.0,
            present_ms: 1400.0,
            active_ms: None,
            resonant_ms: 2600.0,
            afterglow_ms: 1800.0,
        }
    }
}

/// Drives a vignette through its lifecycle stages
///
/// Tick-driven; all derived state is recomputed from stage-local elapsed
/// time. Dropping the driver abandons any pending advancement, so no
/// callback runs after teardown.
pub struct StageDriver {
    machine: StateMachine,
    timings: StageTimings,
    /// Time spent in the current stage
    stage_elapsed_ms: f64,
    gate_open: bool,
    completed: bool,
    on_complete: Option<Box<dyn FnMut() + Send>>,
}

impl StageDriver {
    pub fn new(timings: StageTimings) -> Self {
        let machine = StateMachine::builder(Stage::Arriving.id())
            .on(Stage::Arriving.id(), events::ADVANCE, Stage::Present.id())
            .on(Stage::Present.id(), events::ADVANCE, Stage::Active.id())
            .on(Stage::Active.id(), events::GATE, Stage::Resonant.id())
            .on(Stage::Resonant.id(), events::ADVANCE, Stage::Afterglow.id())
            .build();

        Self {
            machine,
            timings,
            stage_elapsed_ms: 0.0,
            gate_open: false,
            completed: false,
            on_complete: None,
        }
    }

    /// Set the completion callback invoked once Afterglow's dwell passes
    pub fn on_complete<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    /// Current stage
    pub fn stage(&self) -> Stage {
        Stage::from_id(self.machine.current())
    }

    /// Milliseconds spent in the current stage
    pub fn stage_elapsed_ms(&self) -> f64 {
        self.stage_elapsed_ms
    }

    /// Normalized progress through the current stage's dwell, in [0, 1]
    ///
    /// A gated Active stage has no dwell; its progress reports 0.
    pub fn stage_progress(&self) -> f32 {
        match self.dwell_ms(self.stage()) {
            Some(dwell) if dwell > 0.0 => ((self.stage_elapsed_ms / dwell).min(1.0)) as f32,
            Some(_) => 1.0,
            None => 0.0,
        }
    }

    /// Open the resonance gate
    ///
    /// If the driver is already past Active this does nothing. If it has not
    /// reached Active yet, the gate is remembered and the edge fires on
    /// entry.
    pub fn open_gate(&mut self) {
        self.gate_open = true;
        if self.stage() == Stage::Active {
            self.machine.send(events::GATE);
            self.stage_elapsed_ms = 0.0;
            tracing::debug!(stage = self.stage().name(), "resonance gate opened");
        }
    }

    /// Whether the completion callback has fired
    pub fn is_finished(&self) -> bool {
        self.completed
    }

    /// Advance the driver by a frame delta
    pub fn tick(&mut self, dt_ms: f64) {
        self.stage_elapsed_ms += dt_ms.max(0.0);

        loop {
            let stage = self.stage();
            match stage {
                Stage::Arriving | Stage::Present | Stage::Resonant => {
                    let dwell = self.dwell_ms(stage).unwrap_or(0.0);
                    if self.stage_elapsed_ms < dwell {
                        break;
                    }
                    self.stage_elapsed_ms -= dwell;
                    self.machine.send(events::ADVANCE);
                }
                Stage::Active => {
                    if self.gate_open {
                        self.machine.send(events::GATE);
                        self.stage_elapsed_ms = 0.0;
                        continue;
                    }
                    match self.timings.active_ms {
                        Some(dwell) if self.stage_elapsed_ms >= dwell => {
                            self.stage_elapsed_ms -= dwell;
                            self.machine.send(events::GATE);
                        }
                        _ => break,
                    }
                }
                Stage::Afterglow => {
                    if !self.completed && self.stage_elapsed_ms >= self.timings.afterglow_ms {
                        self.completed = true;
                        if let Some(ref mut callback) = self.on_complete {
                            callback();
                        }
                        tracing::debug!("vignette arc complete");
                    }
                    break;
                }
            }
        }
    }

    /// Return to Arriving with a re-armed completion callback
    pub fn reset(&mut self) {
        self.machine.reset();
        self.stage_elapsed_ms = 0.0;
        self.gate_open = false;
        self.completed = false;
    }

    fn dwell_ms(&self, stage: Stage) -> Option<f64> {
        match stage {
            Stage::Arriving => Some(self.timings.arriving_ms),
            Stage::Present => Some(self.timings.present_ms),
            Stage::Active => self.timings.active_ms,
            Stage::Resonant => Some(self.timings.resonant_ms),
            Stage::Afterglow => Some(self.timings.afterglow_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn timings() -> StageTimings {
        StageTimings {
            arriving_ms: 100.0,
            present_ms: 100.0,
            active_ms: None,
            resonant_ms: 100.0,
            afterglow_ms: 100.0,
        }
    }

    #[test]
    fn test_walks_opening_stages_on_dwell() {
        let mut driver = StageDriver::new(timings());
        assert_eq!(driver.stage(), Stage::Arriving);

        driver.tick(99.0);
        assert_eq!(driver.stage(), Stage::Arriving);

        driver.tick(1.0);
        assert_eq!(driver.stage(), Stage::Present);

        driver.tick(100.0);
        assert_eq!(driver.stage(), Stage::Active);
    }

    #[test]
    fn test_active_waits_for_gate() {
        let mut driver = StageDriver::new(timings());
        driver.tick(10_000.0);
        assert_eq!(driver.stage(), Stage::Active);

        driver.open_gate();
        assert_eq!(driver.stage(), Stage::Resonant);

        driver.tick(100.0);
        assert_eq!(driver.stage(), Stage::Afterglow);
    }

    #[test]
    fn test_one_large_tick_carries_overflow() {
        let mut driver = StageDriver::new(timings());
        // 250ms = full arriving + full present + 50ms into active
        driver.tick(250.0);
        assert_eq!(driver.stage(), Stage::Active);
        assert!((driver.stage_elapsed_ms() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_completion_fires_exactly_once() {
        let mut driver = StageDriver::new(timings());
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        driver.on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        driver.tick(10_000.0);
        driver.open_gate();
        driver.tick(10_000.0);
        assert_eq!(driver.stage(), Stage::Afterglow);
        assert!(driver.is_finished());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // More time never re-fires
        driver.tick(10_000.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_gate_before_active_is_remembered() {
        let mut driver = StageDriver::new(timings());
        driver.open_gate();
        assert_eq!(driver.stage(), Stage::Arriving);

        driver.tick(200.0);
        assert_eq!(driver.stage(), Stage::Resonant);
    }

    #[test]
    fn test_ungated_active_auto_advances() {
        let mut t = timings();
        t.active_ms = Some(100.0);
        let mut driver = StageDriver::new(t);

        driver.tick(300.0);
        assert_eq!(driver.stage(), Stage::Resonant);
    }

    #[test]
    fn test_reset_rearms_completion() {
        let mut driver = StageDriver::new(timings());
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        driver.on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        driver.tick(200.0);
        driver.open_gate();
        driver.tick(200.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        driver.reset();
        assert_eq!(driver.stage(), Stage::Arriving);
        assert!(!driver.is_finished());

        driver.tick(200.0);
        driver.open_gate();
        driver.tick(200.0);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stage_progress_clamped() {
        let mut driver = StageDriver::new(timings());
        driver.tick(50.0);
        assert!((driver.stage_progress() - 0.5).abs() < 1e-6);

        driver.tick(10_000.0);
        // Gated active: no dwell, progress reports 0
        assert_eq!(driver.stage(), Stage::Active);
        assert_eq!(driver.stage_progress(), 0.0);
    }
}
