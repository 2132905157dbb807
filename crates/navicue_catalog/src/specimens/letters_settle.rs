//! Letters Settle: a phrase that materializes one letter at a time
//!
//! The copy inscribes itself left to right while the vignette presents;
//! once every character has settled the resonance gate opens. The host may
//! override the phrase through the `data` payload (`{"text": "..."}`).

use crate::specimen::{
    stage_timings, KbeTag, ScalarChannel, Specimen, SpecimenInput, SpecimenMeta, VisualFrame,
};
use crate::telemetry;
use navicue_core::stage::{Stage, StageDriver};
use navicue_motion::error::MotionError;
use navicue_motion::materialize::{MaterializeConfig, MaterializeMode, TextMaterializer};
use navicue_theme::ThemeBundle;

const DEFAULT_TEXT: &str = "let this settle";

/// Letters Settle configuration
#[derive(Clone, Debug)]
pub struct LettersSettleConfig {
    pub text: String,
    pub mode: MaterializeMode,
    pub ms_per_char: f32,
    pub char_duration_ms: f32,
}

impl Default for LettersSettleConfig {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT.to_string(),
            mode: MaterializeMode::Inscribe,
            ms_per_char: 45.0,
            char_duration_ms: 280.0,
        }
    }
}

impl LettersSettleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn mode(mut self, mode: MaterializeMode) -> Self {
        self.mode = mode;
        self
    }

    fn materialize_config(&self) -> MaterializeConfig {
        MaterializeConfig::new(self.mode)
            .ms_per_char(self.ms_per_char)
            .char_duration_ms(self.char_duration_ms)
            .concurrent_chars(1)
    }
}

/// Text-materializing vignette
pub struct LettersSettle {
    config: LettersSettleConfig,
    theme: ThemeBundle,
    driver: StageDriver,
    materializer: TextMaterializer,
    gate_logged: bool,
}

impl LettersSettle {
    pub const META: SpecimenMeta = SpecimenMeta {
        id: "letters_settle",
        title: "Letters Settle",
        series: "word_rituals",
        kbe: KbeTag::Knowing,
    };

    pub fn new() -> Self {
        Self::with_config(LettersSettleConfig::default())
            .expect("default letters_settle config is valid")
    }

    pub fn with_config(config: LettersSettleConfig) -> Result<Self, MotionError> {
        let theme = ThemeBundle::light();
        let materializer = TextMaterializer::new(&config.text, config.materialize_config())?;
        Ok(Self {
            config,
            theme,
            driver: StageDriver::new(stage_timings(&theme.motion)),
            materializer,
            gate_logged: false,
        })
    }
}

impl Default for LettersSettle {
    fn default() -> Self {
        Self::new()
    }
}

impl Specimen for LettersSettle {
    fn meta(&self) -> &'static SpecimenMeta {
        &Self::META
    }

    fn mount(&mut self, input: SpecimenInput) {
        // The host may supply its own phrase
        if let Some(text) = input
            .data
            .as_ref()
            .and_then(|d| d.get("text"))
            .and_then(|t| t.as_str())
        {
            if let Ok(materializer) =
                TextMaterializer::new(text, self.config.materialize_config())
            {
                self.materializer = materializer;
            }
        }

        let mut host_callback = input.on_complete;
        self.driver.on_complete(move || {
            telemetry::log_completion(&Self::META, "arc=complete");
            if let Some(ref mut callback) = host_callback {
                callback();
            }
        });
    }

    fn tick(&mut self, dt_ms: f64) {
        self.materializer.tick(dt_ms as f32);
        self.driver.tick(dt_ms);

        if !self.gate_logged && self.materializer.is_complete() {
            self.driver.open_gate();
            telemetry::log_gate(&Self::META);
            self.gate_logged = true;
        }
    }

    fn frame(&self) -> VisualFrame {
        VisualFrame {
            stage: self.driver.stage(),
            channels: vec![
                ScalarChannel {
                    name: "text_progress",
                    value: self.materializer.progress(),
                },
                ScalarChannel {
                    name: "stage_progress",
                    value: self.driver.stage_progress(),
                },
            ],
            glyphs: self.materializer.glyphs(),
            tint: self.theme.colors.text_primary,
        }
    }

    fn is_complete(&self) -> bool {
        self.driver.is_finished()
    }

    fn reset(&mut self) {
        self.driver.reset();
        self.materializer.reset();
        self.gate_logged = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_glyphs_settle_then_gate_opens() {
        let mut specimen = LettersSettle::new();
        specimen.mount(SpecimenInput::new());

        specimen.tick(100.0);
        let frame = specimen.frame();
        assert_eq!(frame.glyphs.len(), DEFAULT_TEXT.chars().count());
        assert!(frame.channel("text_progress").unwrap() < 1.0);

        // Long enough for every letter and the opening stages
        specimen.tick(60_000.0);
        assert_eq!(specimen.frame().stage, Stage::Resonant);
        assert!((specimen.frame().channel("text_progress").unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_data_overrides_text() {
        let mut specimen = LettersSettle::new();
        specimen.mount(SpecimenInput::new().with_data(json!({ "text": "ok" })));
        assert_eq!(specimen.frame().glyphs.len(), 2);
    }

    #[test]
    fn test_strict_left_to_right() {
        let mut specimen = LettersSettle::new();
        specimen.mount(SpecimenInput::new());

        for _ in 0..200 {
            specimen.tick(33.0);
            let glyphs = specimen.frame().glyphs;
            for pair in glyphs.windows(2) {
                assert!(!(pair[1].revealed && !pair[0].revealed));
            }
        }
    }
}
