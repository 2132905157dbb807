//! Breath-synced oscillator
//!
//! A [`BreathEngine`] maps continuous elapsed time through a named
//! [`BreathPattern`] into `{phase, phase_progress, cycle_progress,
//! cycle_count, amplitude}`. Amplitude rises on a sine ease-out through the
//! inhale, holds flat through the holds, and falls on a cosine ease-in
//! through the exhale, so amplitude at t=0 is exactly 0.

use crate::error::MotionError;
use std::f32::consts::PI;

/// One phase of a breathing cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BreathPhase {
    Inhale,
    HoldIn,
    Exhale,
    HoldOut,
}

impl BreathPhase {
    pub const fn name(self) -> &'static str {
        match self {
            BreathPhase::Inhale => "inhale",
            BreathPhase::HoldIn => "hold_in",
            BreathPhase::Exhale => "exhale",
            BreathPhase::HoldOut => "hold_out",
        }
    }
}

/// A named breathing pattern: ordered phase durations in milliseconds
///
/// Zero-duration phases are skipped during sampling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BreathPattern {
    pub name: &'static str,
    pub inhale_ms: f32,
    pub hold_in_ms: f32,
    pub exhale_ms: f32,
    pub hold_out_ms: f32,
}

impl BreathPattern {
    /// The classic 4-7-8 downshift pattern
    pub const CALM_478: Self = Self {
        name: "calm_478",
        inhale_ms: 4000.0,
        hold_in_ms: 7000.0,
        exhale_ms: 8000.0,
        hold_out_ms: 0.0,
    };

    /// Box breathing: four equal sides
    pub const BOX: Self = Self {
        name: "box",
        inhale_ms: 4000.0,
        hold_in_ms: 4000.0,
        exhale_ms: 4000.0,
        hold_out_ms: 4000.0,
    };

    /// Coherent breathing at ~5.5s per side, no holds
    pub const RESONANT: Self = Self {
        name: "resonant",
        inhale_ms: 5500.0,
        hold_in_ms: 0.0,
        exhale_ms: 5500.0,
        hold_out_ms: 0.0,
    };

    /// A gentle settling pattern with a long exhale
    pub const SETTLING: Self = Self {
        name: "settling",
        inhale_ms: 4000.0,
        hold_in_ms: 2000.0,
        exhale_ms: 6000.0,
        hold_out_ms: 2000.0,
    };

    /// Build a custom pattern, rejecting one that cannot oscillate
    pub fn custom(
        name: &'static str,
        inhale_ms: f32,
        hold_in_ms: f32,
        exhale_ms: f32,
        hold_out_ms: f32,
    ) -> Result<Self, MotionError> {
        let pattern = Self {
            name,
            inhale_ms,
            hold_in_ms,
            exhale_ms,
            hold_out_ms,
        };
        if pattern.total_ms() <= 0.0 {
            return Err(MotionError::EmptyPattern(name));
        }
        Ok(pattern)
    }

    /// Total cycle duration in milliseconds
    pub fn total_ms(&self) -> f32 {
        self.inhale_ms + self.hold_in_ms + self.exhale_ms + self.hold_out_ms
    }

    /// Ordered (phase, duration) pairs
    fn phases(&self) -> [(BreathPhase, f32); 4] {
        [
            (BreathPhase::Inhale, self.inhale_ms),
            (BreathPhase::HoldIn, self.hold_in_ms),
            (BreathPhase::Exhale, self.exhale_ms),
            (BreathPhase::HoldOut, self.hold_out_ms),
        ]
    }
}

/// One frame of breath state, recomputed from elapsed time
#[derive(Clone, Copy, Debug)]
pub struct BreathSample {
    pub phase: BreathPhase,
    /// Progress through the current phase, [0, 1]
    pub phase_progress: f32,
    /// Progress through the current cycle, [0, 1)
    pub cycle_progress: f32,
    /// Completed cycles
    pub cycle_count: u32,
    /// Breath amplitude, [0, 1]
    pub amplitude: f32,
}

/// Continuous oscillator over a breathing pattern
pub struct BreathEngine {
    pattern: BreathPattern,
    elapsed_ms: f64,
    running: bool,
    on_cycle: Option<Box<dyn FnMut(u32) + Send>>,
}

impl BreathEngine {
    pub fn new(pattern: BreathPattern) -> Self {
        Self {
            pattern,
            elapsed_ms: 0.0,
            running: false,
            on_cycle: None,
        }
    }

    /// Set the callback fired once per completed cycle
    pub fn on_cycle<F>(&mut self, callback: F)
    where
        F: FnMut(u32) + Send + 'static,
    {
        self.on_cycle = Some(Box::new(callback));
    }

    pub fn pattern(&self) -> &BreathPattern {
        &self.pattern
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop and zero; phase does not persist across a stop
    pub fn stop(&mut self) {
        self.running = false;
        self.elapsed_ms = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.running
    }

    /// Advance by a frame delta, firing the cycle callback once per crossed
    /// cycle boundary regardless of frame jitter
    pub fn tick(&mut self, dt_ms: f32) {
        if !self.running {
            return;
        }
        let total = self.pattern.total_ms() as f64;
        let before = (self.elapsed_ms / total) as u64;
        self.elapsed_ms += dt_ms.max(0.0) as f64;
        let after = (self.elapsed_ms / total) as u64;

        for crossed in before..after {
            if let Some(ref mut callback) = self.on_cycle {
                callback((crossed + 1) as u32);
            }
        }
    }

    /// Sample the oscillator at its current elapsed time
    pub fn sample(&self) -> BreathSample {
        let total = self.pattern.total_ms();
        let cycle_count = (self.elapsed_ms / total as f64) as u32;
        let in_cycle = (self.elapsed_ms % total as f64) as f32;

        let mut offset = in_cycle;
        for (phase, duration) in self.pattern.phases() {
            // Zero-duration phases are skipped
            if duration <= 0.0 {
                continue;
            }
            if offset < duration {
                let phase_progress = (offset / duration).clamp(0.0, 1.0);
                return BreathSample {
                    phase,
                    phase_progress,
                    cycle_progress: in_cycle / total,
                    cycle_count,
                    amplitude: Self::amplitude(phase, phase_progress),
                };
            }
            offset -= duration;
        }

        // Floating point edge at an exact cycle boundary
        BreathSample {
            phase: BreathPhase::Inhale,
            phase_progress: 0.0,
            cycle_progress: 0.0,
            cycle_count,
            amplitude: 0.0,
        }
    }

    fn amplitude(phase: BreathPhase, progress: f32) -> f32 {
        match phase {
            BreathPhase::Inhale => (progress * PI / 2.0).sin(),
            BreathPhase::HoldIn => 1.0,
            BreathPhase::Exhale => (progress * PI / 2.0).cos(),
            BreathPhase::HoldOut => 0.0,
        }
    }

    /// Return to the initial snapshot: stopped, at zero
    pub fn reset(&mut self) {
        self.running = false;
        self.elapsed_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_amplitude_zero_at_start() {
        let mut engine = BreathEngine::new(BreathPattern::CALM_478);
        engine.start();
        let sample = engine.sample();
        assert_eq!(sample.phase, BreathPhase::Inhale);
        assert_eq!(sample.amplitude, 0.0);
        assert_eq!(sample.cycle_count, 0);
    }

    #[test]
    fn test_phase_walk_478() {
        let mut engine = BreathEngine::new(BreathPattern::CALM_478);
        engine.start();

        engine.tick(2000.0);
        assert_eq!(engine.sample().phase, BreathPhase::Inhale);

        engine.tick(3000.0); // 5s: inside the 7s hold
        let sample = engine.sample();
        assert_eq!(sample.phase, BreathPhase::HoldIn);
        assert_eq!(sample.amplitude, 1.0);

        engine.tick(7000.0); // 12s: 1s into the exhale
        let sample = engine.sample();
        assert_eq!(sample.phase, BreathPhase::Exhale);
        assert!(sample.amplitude < 1.0);

        // CALM_478 has a zero-length hold_out; it never appears
        engine.tick(6999.0);
        assert_ne!(engine.sample().phase, BreathPhase::HoldOut);
    }

    #[test]
    fn test_amplitude_envelope_shape() {
        let mut engine = BreathEngine::new(BreathPattern::RESONANT);
        engine.start();

        // Rising through the inhale
        engine.tick(2750.0);
        let mid_inhale = engine.sample().amplitude;
        assert!(mid_inhale > 0.0 && mid_inhale < 1.0);
        // Sine ease-out: already past the halfway height at half time
        assert!(mid_inhale > 0.5);

        // Falling through the exhale
        engine.tick(5500.0); // 8250ms: halfway through exhale
        let mid_exhale = engine.sample().amplitude;
        assert!(mid_exhale > 0.0 && mid_exhale < 1.0);
    }

    #[test]
    fn test_cycle_callback_once_per_cycle() {
        let mut engine = BreathEngine::new(BreathPattern::BOX); // 16s total
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        engine.on_cycle(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        engine.start();

        // Jittery frames summing to just under one cycle
        let mut elapsed = 0.0;
        while elapsed < 15_990.0 {
            engine.tick(33.0);
            elapsed += 33.0;
        }
        assert_eq!(count.load(Ordering::SeqCst), 0);

        engine.tick(100.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_huge_tick_fires_per_boundary() {
        let mut engine = BreathEngine::new(BreathPattern::RESONANT); // 11s total
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        engine.on_cycle(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        engine.start();

        // One frame spanning three full cycles
        engine.tick(33_100.0);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(engine.sample().cycle_count, 3);
    }

    #[test]
    fn test_stop_zeroes() {
        let mut engine = BreathEngine::new(BreathPattern::BOX);
        engine.start();
        engine.tick(6000.0);
        engine.stop();

        assert!(!engine.is_active());
        let sample = engine.sample();
        assert_eq!(sample.phase, BreathPhase::Inhale);
        assert_eq!(sample.amplitude, 0.0);

        // Ticking while stopped does nothing
        engine.tick(1000.0);
        assert_eq!(engine.sample().phase_progress, 0.0);
    }

    #[test]
    fn test_custom_pattern_validation() {
        assert!(BreathPattern::custom("flat", 0.0, 0.0, 0.0, 0.0).is_err());
        let pattern = BreathPattern::custom("sigh", 1500.0, 0.0, 3000.0, 500.0).unwrap();
        assert_eq!(pattern.total_ms(), 5000.0);
    }
}
