//! NaviCue Core Runtime
//!
//! This crate provides the foundational primitives for the NaviCue vignette
//! engine:
//!
//! - **Clocks**: Monotonic and manual time sources behind one trait
//! - **State Machines**: Flat FSMs for vignette interaction states
//! - **Stage Driver**: The arriving → present → active → resonant → afterglow
//!   lifecycle shared by every vignette, with timer-chained transitions and a
//!   gated resonance edge
//! - **Timer Set**: Deadline-ordered one-shot callbacks with
//!   cancel-on-drop semantics
//!
//! # Example
//!
//! ```rust
//! use navicue_core::stage::{Stage, StageDriver, StageTimings};
//!
//! let mut driver = StageDriver::new(StageTimings::default());
//! assert_eq!(driver.stage(), Stage::Arriving);
//!
//! // Time passes; the driver walks the opening stages on its own.
//! driver.tick(10_000.0);
//! assert_eq!(driver.stage(), Stage::Active);
//!
//! // The resonance edge waits for the host to open the gate
//! // (usually wired to a hold gesture or ceremony completion).
//! driver.open_gate();
//! assert_eq!(driver.stage(), Stage::Resonant);
//! ```

pub mod clock;
pub mod fsm;
pub mod stage;
pub mod timers;

pub use clock::{Clock, ManualClock, MonotonicClock, SharedClock};
pub use fsm::{EventId, FsmId, FsmRuntime, StateId, StateMachine, Transition};
pub use stage::{Stage, StageDriver, StageTimings};
pub use timers::{TimerId, TimerSet};
