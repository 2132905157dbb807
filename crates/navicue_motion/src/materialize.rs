//! Per-character text materialization
//!
//! Given a string and a mode, computes per-character `{opacity, y_offset,
//! blur}` from elapsed time: character `i` starts its local transition at a
//! staggered offset and runs it over a fixed duration through the mode's
//! easing. A character counts as revealed once its local progress crosses
//! [`REVEAL_THRESHOLD`]; the materializer is complete when every character
//! is revealed.

use crate::easing::Easing;
use crate::error::MotionError;

/// Local progress at which a character counts as revealed
pub const REVEAL_THRESHOLD: f32 = 0.95;

/// How the text arrives (or leaves)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MaterializeMode {
    /// Rise and fade in from below
    #[default]
    Emerge,
    /// Fade out and drift upward; complete means fully gone
    Dissolve,
    /// Strict left-to-right reveal, one character at a time
    Inscribe,
    /// Sharpen out of a blur
    BurnIn,
    /// Everything visible from the first sample
    Immediate,
}

/// Materializer configuration
#[derive(Clone, Copy, Debug)]
pub struct MaterializeConfig {
    pub mode: MaterializeMode,
    /// Stagger between consecutive character start offsets
    pub ms_per_char: f32,
    /// Duration of one character's local transition
    pub char_duration_ms: f32,
    /// Cap on how many characters may be mid-transition at once.
    /// `1` forces strict left-to-right ordering.
    pub concurrent_chars: u32,
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self {
            mode: MaterializeMode::Emerge,
            ms_per_char: 45.0,
            char_duration_ms: 320.0,
            concurrent_chars: 4,
        }
    }
}

impl MaterializeConfig {
    pub fn new(mode: MaterializeMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn ms_per_char(mut self, ms: f32) -> Self {
        self.ms_per_char = ms;
        self
    }

    pub fn char_duration_ms(mut self, ms: f32) -> Self {
        self.char_duration_ms = ms;
        self
    }

    pub fn concurrent_chars(mut self, count: u32) -> Self {
        self.concurrent_chars = count.max(1);
        self
    }

    fn validate(&self) -> Result<(), MotionError> {
        if self.mode != MaterializeMode::Immediate && self.char_duration_ms <= 0.0 {
            return Err(MotionError::ZeroCharDuration(self.char_duration_ms));
        }
        Ok(())
    }
}

/// One character's visual state, recomputed per sample
#[derive(Clone, Copy, Debug)]
pub struct GlyphState {
    pub ch: char,
    pub opacity: f32,
    pub y_offset: f32,
    pub blur: f32,
    pub revealed: bool,
}

/// Materializes a string over elapsed time
pub struct TextMaterializer {
    chars: Vec<char>,
    config: MaterializeConfig,
    elapsed_ms: f64,
    complete: bool,
    on_complete: Option<Box<dyn FnMut() + Send>>,
}

impl TextMaterializer {
    pub fn new(text: &str, config: MaterializeConfig) -> Result<Self, MotionError> {
        config.validate()?;
        Ok(Self {
            chars: text.chars().collect(),
            config,
            elapsed_ms: 0.0,
            complete: false,
            on_complete: None,
        })
    }

    /// Set the callback fired once when every character is revealed
    pub fn on_complete<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Still transitioning
    pub fn is_active(&self) -> bool {
        !self.complete
    }

    /// Start offset for character `i` in milliseconds
    ///
    /// The stagger stretches as needed so at most `concurrent_chars`
    /// characters are mid-transition at once; with `concurrent_chars == 1`
    /// transitions never overlap and reveal is strictly left to right.
    fn char_offset_ms(&self, i: usize) -> f32 {
        let min_stagger = self.config.char_duration_ms / self.config.concurrent_chars as f32;
        let stagger = self.config.ms_per_char.max(min_stagger);
        i as f32 * stagger
    }

    /// Local transition progress for character `i`, in [0, 1]
    fn local_progress(&self, i: usize) -> f32 {
        if self.config.mode == MaterializeMode::Immediate {
            return 1.0;
        }
        let raw = (self.elapsed_ms as f32 - self.char_offset_ms(i)) / self.config.char_duration_ms;
        raw.clamp(0.0, 1.0)
    }

    /// Visual state for character `i`, or `None` past the end of the text
    pub fn glyph(&self, i: usize) -> Option<GlyphState> {
        (i < self.chars.len()).then(|| self.glyph_state(i))
    }

    fn glyph_state(&self, i: usize) -> GlyphState {
        let ch = self.chars[i];
        let p = self.local_progress(i);
        let revealed = p >= REVEAL_THRESHOLD;

        match self.config.mode {
            MaterializeMode::Emerge => {
                let eased = Easing::QuadOut.apply(p);
                GlyphState {
                    ch,
                    opacity: eased,
                    y_offset: 8.0 * (1.0 - eased),
                    blur: 4.0 * (1.0 - eased),
                    revealed,
                }
            }
            MaterializeMode::Dissolve => {
                let eased = Easing::QuadIn.apply(p);
                GlyphState {
                    ch,
                    opacity: 1.0 - eased,
                    y_offset: -6.0 * eased,
                    blur: 3.0 * eased,
                    revealed,
                }
            }
            MaterializeMode::Inscribe => {
                let eased = Easing::CubicInOut.apply(p);
                GlyphState {
                    ch,
                    opacity: eased,
                    y_offset: 0.0,
                    blur: 0.0,
                    revealed,
                }
            }
            MaterializeMode::BurnIn => {
                let eased = Easing::ExpoOut.apply(p);
                GlyphState {
                    ch,
                    opacity: eased,
                    y_offset: 2.0 * (1.0 - eased),
                    blur: 6.0 * (1.0 - eased),
                    revealed,
                }
            }
            MaterializeMode::Immediate => GlyphState {
                ch,
                opacity: 1.0,
                y_offset: 0.0,
                blur: 0.0,
                revealed: true,
            },
        }
    }

    /// Visual state for every character
    pub fn glyphs(&self) -> Vec<GlyphState> {
        (0..self.chars.len()).map(|i| self.glyph_state(i)).collect()
    }

    /// Mean local progress across all characters, in [0, 1]
    ///
    /// Reaches 1 only when every character's local transition has finished.
    pub fn progress(&self) -> f32 {
        if self.chars.is_empty() {
            return 1.0;
        }
        let sum: f32 = (0..self.chars.len()).map(|i| self.local_progress(i)).sum();
        sum / self.chars.len() as f32
    }

    /// Advance by a frame delta
    pub fn tick(&mut self, dt_ms: f32) {
        if self.complete {
            return;
        }
        self.elapsed_ms += dt_ms.max(0.0) as f64;

        let all_revealed = (0..self.chars.len()).all(|i| self.local_progress(i) >= REVEAL_THRESHOLD);
        if all_revealed {
            self.complete = true;
            if let Some(ref mut callback) = self.on_complete {
                callback();
            }
        }
    }

    /// Return to the initial snapshot and re-arm the completion callback
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
        self.complete = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn emerge(text: &str) -> TextMaterializer {
        TextMaterializer::new(text, MaterializeConfig::default()).unwrap()
    }

    #[test]
    fn test_starts_hidden_ends_revealed() {
        let mut mat = emerge("settle");
        let first = mat.glyph(0).unwrap();
        assert_eq!(first.opacity, 0.0);
        assert!(!first.revealed);

        mat.tick(60_000.0);
        assert!(mat.is_complete());
        for glyph in mat.glyphs() {
            assert!(glyph.revealed);
            assert!((glyph.opacity - 1.0).abs() < 1e-4);
            assert!(glyph.y_offset.abs() < 1e-3);
        }
        assert!((mat.progress() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_stagger_orders_characters() {
        let mut mat = emerge("abc");
        mat.tick(100.0);
        let glyphs = mat.glyphs();
        assert!(glyphs[0].opacity > glyphs[1].opacity);
        assert!(glyphs[1].opacity > glyphs[2].opacity);
    }

    #[test]
    fn test_strict_order_with_single_concurrency() {
        let config = MaterializeConfig::new(MaterializeMode::Inscribe)
            .concurrent_chars(1)
            .char_duration_ms(200.0)
            .ms_per_char(40.0);
        let mut mat = TextMaterializer::new("word", config).unwrap();

        // At every step, character i is never revealed before i-1
        for _ in 0..100 {
            mat.tick(16.0);
            let glyphs = mat.glyphs();
            for pair in glyphs.windows(2) {
                assert!(!(pair[1].revealed && !pair[0].revealed));
            }
        }
        assert!(mat.is_complete());
    }

    #[test]
    fn test_concurrency_cap_limits_in_flight() {
        let config = MaterializeConfig::new(MaterializeMode::Emerge)
            .ms_per_char(10.0)
            .char_duration_ms(300.0)
            .concurrent_chars(2);
        let mut mat = TextMaterializer::new("abcdefgh", config).unwrap();

        for _ in 0..200 {
            mat.tick(16.0);
            let in_flight = mat
                .glyphs()
                .iter()
                .filter(|g| g.opacity > 0.0 && !g.revealed)
                .count();
            assert!(in_flight <= 2, "{in_flight} characters mid-transition");
        }
        assert!(mat.is_complete());
    }

    #[test]
    fn test_glyph_out_of_range_is_none() {
        let mat = emerge("ab");
        assert!(mat.glyph(1).is_some());
        assert!(mat.glyph(2).is_none());
    }

    #[test]
    fn test_dissolve_fades_out() {
        let config = MaterializeConfig::new(MaterializeMode::Dissolve);
        let mut mat = TextMaterializer::new("gone", config).unwrap();
        assert!((mat.glyph(0).unwrap().opacity - 1.0).abs() < 1e-6);

        mat.tick(60_000.0);
        assert!(mat.is_complete());
        for glyph in mat.glyphs() {
            assert!(glyph.opacity.abs() < 1e-4);
        }
    }

    #[test]
    fn test_immediate_reveals_on_first_sample() {
        let config = MaterializeConfig::new(MaterializeMode::Immediate);
        let mut mat = TextMaterializer::new("now", config).unwrap();
        assert!(mat.glyphs().iter().all(|g| g.revealed));

        mat.tick(0.0);
        assert!(mat.is_complete());
    }

    #[test]
    fn test_completion_fires_once() {
        let mut mat = emerge("hi");
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        mat.on_complete(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        mat.tick(60_000.0);
        mat.tick(60_000.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_reset_restores_initial_snapshot() {
        let mut mat = emerge("again");
        mat.tick(60_000.0);
        assert!(mat.is_complete());

        mat.reset();
        assert!(!mat.is_complete());
        assert_eq!(mat.glyph(0).unwrap().opacity, 0.0);
        assert_eq!(mat.progress(), 0.0);
    }

    #[test]
    fn test_empty_text_completes_immediately() {
        let mut mat = emerge("");
        assert_eq!(mat.progress(), 1.0);
        mat.tick(0.0);
        assert!(mat.is_complete());
    }

    #[test]
    fn test_zero_duration_rejected() {
        let config = MaterializeConfig::default().char_duration_ms(0.0);
        assert!(TextMaterializer::new("x", config).is_err());
    }
}
