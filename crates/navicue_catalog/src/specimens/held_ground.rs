//! Held Ground: commitment through a sustained hold
//!
//! A press-and-hold gesture accumulates tension during the active stage;
//! completing the hold opens the resonance gate. Release before completion
//! follows the configured [`HoldMode`].

use crate::specimen::{
    stage_timings, KbeTag, ScalarChannel, Specimen, SpecimenInput, SpecimenMeta, VisualFrame,
};
use crate::telemetry;
use navicue_core::stage::{Stage, StageDriver};
use navicue_motion::easing::Easing;
use navicue_motion::hold::{HoldConfig, HoldGesture, HoldMode};
use navicue_theme::ThemeBundle;

/// Held Ground configuration
#[derive(Clone, Copy, Debug)]
pub struct HeldGroundConfig {
    /// Held milliseconds required to complete
    pub target_ms: f32,
    pub mode: HoldMode,
}

impl Default for HeldGroundConfig {
    fn default() -> Self {
        Self {
            target_ms: ThemeBundle::light().motion.hold_target_ms,
            mode: HoldMode::Reset,
        }
    }
}

impl HeldGroundConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn target_ms(mut self, ms: f32) -> Self {
        self.target_ms = ms;
        self
    }

    pub fn cumulative(mut self) -> Self {
        self.mode = HoldMode::Cumulative;
        self
    }
}

/// Hold-gated vignette
pub struct HeldGround {
    theme: ThemeBundle,
    driver: StageDriver,
    hold: HoldGesture,
    gate_logged: bool,
}

impl HeldGround {
    pub const META: SpecimenMeta = SpecimenMeta {
        id: "held_ground",
        title: "Held Ground",
        series: "holding_ground",
        kbe: KbeTag::Believing,
    };

    pub fn new() -> Self {
        Self::with_config(HeldGroundConfig::default())
    }

    pub fn with_config(config: HeldGroundConfig) -> Self {
        let theme = ThemeBundle::light();
        let hold_config = HoldConfig {
            target_ms: config.target_ms,
            mode: config.mode,
        };
        Self {
            theme,
            driver: StageDriver::new(stage_timings(&theme.motion)),
            hold: HoldGesture::new(hold_config),
            gate_logged: false,
        }
    }
}

impl Default for HeldGround {
    fn default() -> Self {
        Self::new()
    }
}

impl Specimen for HeldGround {
    fn meta(&self) -> &'static SpecimenMeta {
        &Self::META
    }

    fn mount(&mut self, input: SpecimenInput) {
        let mut host_callback = input.on_complete;
        self.driver.on_complete(move || {
            telemetry::log_completion(&Self::META, "arc=complete");
            if let Some(ref mut callback) = host_callback {
                callback();
            }
        });
    }

    fn tick(&mut self, dt_ms: f64) {
        self.hold.tick(dt_ms as f32);
        self.driver.tick(dt_ms);

        if !self.gate_logged && self.hold.is_complete() {
            self.driver.open_gate();
            telemetry::log_gate(&Self::META);
            self.gate_logged = true;
        }
    }

    fn frame(&self) -> VisualFrame {
        let tension = self.hold.tension();
        VisualFrame {
            stage: self.driver.stage(),
            channels: vec![
                ScalarChannel {
                    name: "tension",
                    value: tension,
                },
                ScalarChannel {
                    name: "ground_rise",
                    value: Easing::QuadOut.apply(tension),
                },
                ScalarChannel {
                    name: "stage_progress",
                    value: self.driver.stage_progress(),
                },
            ],
            glyphs: Vec::new(),
            tint: self
                .theme
                .colors
                .surface
                .lerp(&self.theme.colors.tension, tension),
        }
    }

    fn is_complete(&self) -> bool {
        self.driver.is_finished()
    }

    fn pointer_down(&mut self) {
        // Tension only accumulates once the vignette is interactive
        if self.driver.stage() == Stage::Active {
            self.hold.press();
        }
    }

    fn pointer_up(&mut self) {
        self.hold.release();
    }

    fn reset(&mut self) {
        self.driver.reset();
        self.hold.reset();
        self.gate_logged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn reach_active(specimen: &mut HeldGround) {
        specimen.tick(5000.0);
        assert_eq!(specimen.frame().stage, Stage::Active);
    }

    #[test]
    fn test_press_before_active_is_ignored() {
        let mut specimen = HeldGround::new();
        specimen.mount(SpecimenInput::new());

        specimen.pointer_down();
        specimen.tick(1000.0);
        assert_eq!(specimen.frame().channel("tension"), Some(0.0));
    }

    #[test]
    fn test_hold_opens_gate_and_completes_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();

        let mut specimen = HeldGround::with_config(HeldGroundConfig::new().target_ms(1000.0));
        specimen.mount(SpecimenInput::new().on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        }));
        reach_active(&mut specimen);

        specimen.pointer_down();
        specimen.tick(1000.0);
        assert_eq!(specimen.frame().stage, Stage::Resonant);

        // Resonant + afterglow dwells
        specimen.tick(2600.0);
        specimen.tick(1800.0);
        assert!(specimen.is_complete());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        specimen.tick(10_000.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_release_resets_tension() {
        let mut specimen = HeldGround::with_config(HeldGroundConfig::new().target_ms(2000.0));
        specimen.mount(SpecimenInput::new());
        reach_active(&mut specimen);

        specimen.pointer_down();
        specimen.tick(1000.0);
        assert_eq!(specimen.frame().channel("tension"), Some(0.5));

        specimen.pointer_up();
        specimen.tick(16.0);
        assert_eq!(specimen.frame().channel("tension"), Some(0.0));
    }
}
