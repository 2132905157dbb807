//! NaviCue Motion System
//!
//! The timing primitives that choreograph every vignette.
//!
//! # Features
//!
//! - **Hold Gestures**: press-and-hold tension with reset or cumulative release
//! - **Breath Engine**: continuous oscillator over named breathing patterns
//! - **Text Materializer**: per-character reveal driven by elapsed time
//! - **Receipt Ceremony**: terminal seal transitions in four modes
//! - **MotionScheduler**: owns and ticks every registered primitive, with an
//!   optional background thread that flags redraws
//!
//! One contract runs through all of them: animation state is a pure function
//! of elapsed time. Primitives accumulate elapsed milliseconds on tick and
//! recompute every derived value fresh on each sample, so playback is
//! drift-free and restartable.

pub mod breath;
pub mod ceremony;
pub mod easing;
pub mod error;
pub mod hold;
pub mod materialize;
pub mod scheduler;

pub use breath::{BreathEngine, BreathPattern, BreathPhase, BreathSample};
pub use ceremony::{CeremonyMode, CeremonyPhase, ReceiptCeremony, SealFrame};
pub use easing::Easing;
pub use error::MotionError;
pub use hold::{HoldConfig, HoldGesture, HoldMode, HoldState};
pub use materialize::{
    GlyphState, MaterializeConfig, MaterializeMode, TextMaterializer, REVEAL_THRESHOLD,
};
pub use scheduler::{
    BreathId, CeremonyId, HoldId, MaterializeId, MotionScheduler, SchedulerHandle, WakeCallback,
};
