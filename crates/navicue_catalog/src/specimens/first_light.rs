//! First Light: a breath-led arrival
//!
//! The specimen pulses with a breathing pattern; after the configured number
//! of completed cycles the resonance gate opens and the arc plays out.

use crate::specimen::{
    stage_timings, KbeTag, ScalarChannel, Specimen, SpecimenInput, SpecimenMeta, VisualFrame,
};
use crate::telemetry;
use navicue_core::stage::{Stage, StageDriver};
use navicue_motion::breath::{BreathEngine, BreathPattern};
use navicue_theme::ThemeBundle;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// First Light configuration
#[derive(Clone, Copy, Debug)]
pub struct FirstLightConfig {
    pub pattern: BreathPattern,
    /// Completed breath cycles required to open the gate
    pub cycles_required: u32,
}

impl Default for FirstLightConfig {
    fn default() -> Self {
        Self {
            pattern: BreathPattern::CALM_478,
            cycles_required: 2,
        }
    }
}

impl FirstLightConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pattern(mut self, pattern: BreathPattern) -> Self {
        self.pattern = pattern;
        self
    }

    pub fn cycles_required(mut self, cycles: u32) -> Self {
        self.cycles_required = cycles;
        self
    }
}

/// Breath-led vignette
pub struct FirstLight {
    config: FirstLightConfig,
    theme: ThemeBundle,
    driver: StageDriver,
    breath: BreathEngine,
    cycles_done: Arc<AtomicU32>,
    gate_logged: bool,
    mounted: bool,
}

impl FirstLight {
    pub const META: SpecimenMeta = SpecimenMeta {
        id: "first_light",
        title: "First Light",
        series: "first_breaths",
        kbe: KbeTag::Embodying,
    };

    pub fn new() -> Self {
        Self::with_config(FirstLightConfig::default())
    }

    pub fn with_config(config: FirstLightConfig) -> Self {
        let theme = ThemeBundle::light();
        Self {
            config,
            theme,
            driver: StageDriver::new(stage_timings(&theme.motion)),
            breath: BreathEngine::new(config.pattern),
            cycles_done: Arc::new(AtomicU32::new(0)),
            gate_logged: false,
            mounted: false,
        }
    }
}

impl Default for FirstLight {
    fn default() -> Self {
        Self::new()
    }
}

impl Specimen for FirstLight {
    fn meta(&self) -> &'static SpecimenMeta {
        &Self::META
    }

    fn mount(&mut self, input: SpecimenInput) {
        let cycles = Arc::clone(&self.cycles_done);
        self.breath.on_cycle(move |count| {
            cycles.store(count, Ordering::SeqCst);
        });
        self.breath.start();

        let mut host_callback = input.on_complete;
        self.driver.on_complete(move || {
            telemetry::log_completion(&Self::META, "arc=complete");
            if let Some(ref mut callback) = host_callback {
                callback();
            }
        });
        self.mounted = true;
    }

    fn tick(&mut self, dt_ms: f64) {
        self.breath.tick(dt_ms as f32);
        self.driver.tick(dt_ms);

        let cycles = self.cycles_done.load(Ordering::SeqCst);
        if !self.gate_logged
            && cycles >= self.config.cycles_required
            && self.driver.stage() == Stage::Active
        {
            self.driver.open_gate();
            telemetry::log_gate(&Self::META);
            self.gate_logged = true;
        }
    }

    fn frame(&self) -> VisualFrame {
        let sample = self.breath.sample();
        VisualFrame {
            stage: self.driver.stage(),
            channels: vec![
                ScalarChannel {
                    name: "amplitude",
                    value: sample.amplitude,
                },
                ScalarChannel {
                    name: "cycle_progress",
                    value: sample.cycle_progress,
                },
                ScalarChannel {
                    name: "stage_progress",
                    value: self.driver.stage_progress(),
                },
            ],
            glyphs: Vec::new(),
            tint: self.theme.breath.at_amplitude(sample.amplitude),
        }
    }

    fn is_complete(&self) -> bool {
        self.driver.is_finished()
    }

    fn reset(&mut self) {
        self.driver.reset();
        self.breath.reset();
        self.cycles_done.store(0, Ordering::SeqCst);
        self.gate_logged = false;
        if self.mounted {
            self.breath.start();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navicue_core::stage::Stage;

    #[test]
    fn test_gate_waits_for_cycles() {
        let config = FirstLightConfig::new()
            .pattern(BreathPattern::RESONANT) // 11s cycle
            .cycles_required(1);
        let mut specimen = FirstLight::with_config(config);
        specimen.mount(SpecimenInput::new());

        // Opening stages pass (2.3s) but the cycle isn't done
        specimen.tick(5000.0);
        assert_eq!(specimen.frame().stage, Stage::Active);

        // Finish the first cycle
        specimen.tick(7000.0);
        assert_eq!(specimen.frame().stage, Stage::Resonant);
    }

    #[test]
    fn test_amplitude_channel_present() {
        let mut specimen = FirstLight::new();
        specimen.mount(SpecimenInput::new());
        specimen.tick(2000.0);
        let frame = specimen.frame();
        let amplitude = frame.channel("amplitude").unwrap();
        assert!(amplitude > 0.0 && amplitude <= 1.0);
    }
}
