//! Sealed Intent: an offering acknowledged with a seal
//!
//! During the active stage a tap (pointer up) triggers the receipt ceremony;
//! when the seal completes the resonance gate opens. Re-tapping while the
//! seal plays does nothing.

use crate::specimen::{
    stage_timings, KbeTag, ScalarChannel, Specimen, SpecimenInput, SpecimenMeta, VisualFrame,
};
use crate::telemetry;
use navicue_core::stage::{Stage, StageDriver};
use navicue_motion::ceremony::{CeremonyMode, ReceiptCeremony};
use navicue_theme::ThemeBundle;

/// Sealed Intent configuration
#[derive(Clone, Copy, Debug, Default)]
pub struct SealedIntentConfig {
    pub mode: CeremonyMode,
}

impl SealedIntentConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: CeremonyMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Ceremony-sealed vignette
pub struct SealedIntent {
    theme: ThemeBundle,
    driver: StageDriver,
    ceremony: ReceiptCeremony,
    gate_logged: bool,
}

impl SealedIntent {
    pub const META: SpecimenMeta = SpecimenMeta {
        id: "sealed_intent",
        title: "Sealed Intent",
        series: "receipts",
        kbe: KbeTag::Embodying,
    };

    pub fn new() -> Self {
        Self::with_config(SealedIntentConfig::default())
    }

    pub fn with_config(config: SealedIntentConfig) -> Self {
        let theme = ThemeBundle::light();
        Self {
            theme,
            driver: StageDriver::new(stage_timings(&theme.motion)),
            ceremony: ReceiptCeremony::new(config.mode),
            gate_logged: false,
        }
    }
}

impl Default for SealedIntent {
    fn default() -> Self {
        Self::new()
    }
}

impl Specimen for SealedIntent {
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
        self.ceremony.tick(dt_ms as f32);
        self.driver.tick(dt_ms);

        if !self.gate_logged && self.ceremony.is_sealed() {
            self.driver.open_gate();
            telemetry::log_gate(&Self::META);
            self.gate_logged = true;
        }
    }

    fn frame(&self) -> VisualFrame {
        let seal = self.ceremony.frame();
        let progress = self.ceremony.progress();
        VisualFrame {
            stage: self.driver.stage(),
            channels: vec![
                ScalarChannel {
                    name: "seal_progress",
                    value: progress,
                },
                ScalarChannel {
                    name: "opacity",
                    value: seal.opacity,
                },
                ScalarChannel {
                    name: "scale",
                    value: seal.scale,
                },
                ScalarChannel {
                    name: "blur",
                    value: seal.blur,
                },
                ScalarChannel {
                    name: "y_offset",
                    value: seal.y_offset,
                },
            ],
            glyphs: Vec::new(),
            tint: self
                .theme
                .colors
                .surface
                .lerp(&self.theme.colors.seal, progress),
        }
    }

    fn is_complete(&self) -> bool {
        self.driver.is_finished()
    }

    fn pointer_up(&mut self) {
        // A tap during the active stage offers the intent
        if self.driver.stage() == Stage::Active {
            self.ceremony.trigger();
        }
    }

    fn reset(&mut self) {
        self.driver.reset();
        self.ceremony.reset();
        self.gate_logged = false;
    }
}
