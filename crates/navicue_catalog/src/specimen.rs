//! The specimen contract
//!
//! Every catalog entry is a leaf component behind one uniform surface: it is
//! mounted with an optional data payload and an optional completion callback,
//! ticked with frame deltas, and sampled for a declarative [`VisualFrame`].
//! It owns its primitives and its [`StageDriver`] and fires `on_complete`
//! exactly once when the narrative arc finishes.

use navicue_core::stage::{Stage, StageTimings};
use navicue_motion::materialize::GlyphState;
use navicue_theme::tokens::MotionTokens;
use navicue_theme::Color;
use serde::Serialize;

/// The Knowing / Believing / Embodying completion tag
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum KbeTag {
    Knowing,
    Believing,
    Embodying,
}

impl KbeTag {
    /// Single-letter code used in telemetry lines
    pub const fn code(self) -> char {
        match self {
            KbeTag::Knowing => 'K',
            KbeTag::Believing => 'B',
            KbeTag::Embodying => 'E',
        }
    }
}

/// Static metadata for one catalog entry
#[derive(Clone, Copy, Debug, Serialize)]
pub struct SpecimenMeta {
    pub id: &'static str,
    pub title: &'static str,
    /// Series this specimen belongs to (see [`crate::series`])
    pub series: &'static str,
    pub kbe: KbeTag,
}

/// Completion callback supplied by the host
pub type CompleteCallback = Box<dyn FnMut() + Send>;

/// The uniform input contract: an opaque payload and a completion callback
#[derive(Default)]
pub struct SpecimenInput {
    pub data: Option<serde_json::Value>,
    pub on_complete: Option<CompleteCallback>,
}

impl SpecimenInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn on_complete<F>(mut self, callback: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        self.on_complete = Some(Box::new(callback));
        self
    }
}

/// One named scalar the host may map onto any visual property
#[derive(Clone, Copy, Debug)]
pub struct ScalarChannel {
    pub name: &'static str,
    pub value: f32,
}

/// A declarative frame: everything the host needs to draw this instant
///
/// Specimens never draw. They expose stage, scalar channels, glyph states,
/// and a tint; rendering belongs to the host.
#[derive(Clone, Debug)]
pub struct VisualFrame {
    pub stage: Stage,
    pub channels: Vec<ScalarChannel>,
    pub glyphs: Vec<GlyphState>,
    pub tint: Color,
}

impl VisualFrame {
    pub fn channel(&self, name: &str) -> Option<f32> {
        self.channels
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.value)
    }
}

/// A catalog entry
pub trait Specimen: Send {
    /// Static metadata
    fn meta(&self) -> &'static SpecimenMeta;

    /// Accept the host's input contract and begin the arc
    fn mount(&mut self, input: SpecimenInput);

    /// Advance by a frame delta
    fn tick(&mut self, dt_ms: f64);

    /// Sample the current visual state
    fn frame(&self) -> VisualFrame;

    /// Whether the arc has finished (afterglow dwell passed)
    fn is_complete(&self) -> bool;

    /// Pointer pressed anywhere on the vignette
    fn pointer_down(&mut self) {}

    /// Pointer released
    fn pointer_up(&mut self) {}

    /// Return to the initial snapshot, re-arming completion
    fn reset(&mut self);
}

impl std::fmt::Debug for dyn Specimen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Specimen")
            .field("id", &self.meta().id)
            .finish()
    }
}

/// Stage timings derived from theme motion tokens
pub fn stage_timings(tokens: &MotionTokens) -> StageTimings {
    StageTimings {
        arriving_ms: tokens.arriving_ms,
        present_ms: tokens.present_ms,
        active_ms: None,
        resonant_ms: tokens.resonant_ms,
        afterglow_ms: tokens.afterglow_ms,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kbe_codes() {
        assert_eq!(KbeTag::Knowing.code(), 'K');
        assert_eq!(KbeTag::Believing.code(), 'B');
        assert_eq!(KbeTag::Embodying.code(), 'E');
    }

    #[test]
    fn test_frame_channel_lookup() {
        let frame = VisualFrame {
            stage: Stage::Active,
            channels: vec![ScalarChannel {
                name: "tension",
                value: 0.4,
            }],
            glyphs: Vec::new(),
            tint: Color::WHITE,
        };
        assert_eq!(frame.channel("tension"), Some(0.4));
        assert_eq!(frame.channel("missing"), None);
    }

    #[test]
    fn test_stage_timings_from_tokens() {
        let timings = stage_timings(&MotionTokens::default());
        assert_eq!(timings.arriving_ms, 900.0);
        assert!(timings.active_ms.is_none());
    }
}
