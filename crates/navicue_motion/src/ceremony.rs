//! Receipt ceremony
//!
//! The terminal visual transition that tells the user their action was
//! received: `Idle → Sealing → Sealed`, started explicitly by
//! [`ReceiptCeremony::trigger`]. During `Sealing` the ceremony interpolates
//! an `{opacity, scale, blur, y_offset}` bundle through its mode's curves;
//! `on_sealed` fires exactly once when progress reaches 1. Triggering while
//! already sealing (or sealed) is a no-op; the clock never restarts.

use crate::easing::Easing;

/// Seal transition flavor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CeremonyMode {
    /// The card draws inward and settles
    #[default]
    Absorb,
    /// Sharpens and brightens into place
    Crystallize,
    /// Softens and fades away
    Dissolve,
    /// Breaks apart, then reforms whole
    ShatterReform,
}

impl CeremonyMode {
    /// Seal duration for this mode
    pub const fn duration_ms(self) -> f32 {
        match self {
            CeremonyMode::Absorb => 900.0,
            CeremonyMode::Crystallize => 1200.0,
            CeremonyMode::Dissolve => 1500.0,
            CeremonyMode::ShatterReform => 1600.0,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            CeremonyMode::Absorb => "absorb",
            CeremonyMode::Crystallize => "crystallize",
            CeremonyMode::Dissolve => "dissolve",
            CeremonyMode::ShatterReform => "shatter_reform",
        }
    }
}

/// Ceremony lifecycle phase
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CeremonyPhase {
    #[default]
    Idle,
    Sealing,
    Sealed,
}

/// The interpolated property bundle for one frame of the seal
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SealFrame {
    pub opacity: f32,
    pub scale: f32,
    pub blur: f32,
    pub y_offset: f32,
}

impl SealFrame {
    /// The at-rest frame before (and outside) a ceremony
    pub const IDLE: Self = Self {
        opacity: 1.0,
        scale: 1.0,
        blur: 0.0,
        y_offset: 0.0,
    };
}

/// A triggerable seal transition
pub struct ReceiptCeremony {
    mode: CeremonyMode,
    phase: CeremonyPhase,
    elapsed_ms: f32,
    on_sealed: Option<Box<dyn FnMut() + Send>>,
}

impl ReceiptCeremony {
    pub fn new(mode: CeremonyMode) -> Self {
        Self {
            mode,
            phase: CeremonyPhase::Idle,
            elapsed_ms: 0.0,
            on_sealed: None,
        }
    }

    /// Set the callback fired once when the seal completes
    pub fn on_sealed<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.on_sealed = Some(Box::new(callback));
    }

    pub fn mode(&self) -> CeremonyMode {
        self.mode
    }

    pub fn phase(&self) -> CeremonyPhase {
        self.phase
    }

    pub fn is_sealed(&self) -> bool {
        self.phase == CeremonyPhase::Sealed
    }

    pub fn is_active(&self) -> bool {
        self.phase == CeremonyPhase::Sealing
    }

    /// Begin sealing. No-op unless idle.
    pub fn trigger(&mut self) {
        if self.phase == CeremonyPhase::Idle {
            self.phase = CeremonyPhase::Sealing;
            self.elapsed_ms = 0.0;
            tracing::debug!(mode = self.mode.name(), "ceremony sealing");
        }
    }

    /// Seal progress in [0, 1]
    pub fn progress(&self) -> f32 {
        match self.phase {
            CeremonyPhase::Idle => 0.0,
            CeremonyPhase::Sealing => (self.elapsed_ms / self.mode.duration_ms()).clamp(0.0, 1.0),
            CeremonyPhase::Sealed => 1.0,
        }
    }

    /// Advance by a frame delta
    pub fn tick(&mut self, dt_ms: f32) {
        if self.phase != CeremonyPhase::Sealing {
            return;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        if self.elapsed_ms >= self.mode.duration_ms() {
            self.phase = CeremonyPhase::Sealed;
            if let Some(ref mut callback) = self.on_sealed {
                callback();
            }
        }
    }

    /// The property bundle for the current progress, per mode
    pub fn frame(&self) -> SealFrame {
        let p = self.progress();
        if self.phase == CeremonyPhase::Idle {
            return SealFrame::IDLE;
        }
        match self.mode {
            CeremonyMode::Absorb => {
                let eased = Easing::QuadInOut.apply(p);
                SealFrame {
                    opacity: 1.0 - 0.15 * eased,
                    scale: 1.0 - 0.06 * eased,
                    blur: 0.0,
                    y_offset: 2.0 * eased,
                }
            }
            CeremonyMode::Crystallize => {
                let eased = Easing::CubicOut.apply(p);
                SealFrame {
                    opacity: 0.7 + 0.3 * eased,
                    scale: 0.98 + 0.02 * eased,
                    blur: 3.0 * (1.0 - eased),
                    y_offset: 0.0,
                }
            }
            CeremonyMode::Dissolve => {
                let eased = Easing::SineInOut.apply(p);
                SealFrame {
                    opacity: 1.0 - eased,
                    scale: 1.0 + 0.04 * eased,
                    blur: 6.0 * eased,
                    y_offset: -4.0 * eased,
                }
            }
            CeremonyMode::ShatterReform => {
                // Two segments: break apart, then reform whole
                if p < 0.5 {
                    let eased = Easing::QuadIn.apply(p * 2.0);
                    SealFrame {
                        opacity: 1.0 - 0.7 * eased,
                        scale: 1.0 + 0.06 * eased,
                        blur: 5.0 * eased,
                        y_offset: 0.0,
                    }
                } else {
                    let eased = Easing::BackOut.apply((p - 0.5) * 2.0);
                    SealFrame {
                        opacity: 0.3 + 0.7 * eased,
                        scale: 1.06 - 0.06 * eased,
                        blur: 5.0 * (1.0 - eased),
                        y_offset: 0.0,
                    }
                }
            }
        }
    }

    /// Return to Idle and re-arm the sealed callback
    pub fn reset(&mut self) {
        self.phase = CeremonyPhase::Idle;
        self.elapsed_ms = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_idle_until_triggered() {
        let mut ceremony = ReceiptCeremony::new(CeremonyMode::Absorb);
        ceremony.tick(10_000.0);
        assert_eq!(ceremony.phase(), CeremonyPhase::Idle);
        assert_eq!(ceremony.frame(), SealFrame::IDLE);
    }

    #[test]
    fn test_seals_after_duration() {
        let mut ceremony = ReceiptCeremony::new(CeremonyMode::Absorb);
        ceremony.trigger();
        assert_eq!(ceremony.phase(), CeremonyPhase::Sealing);

        ceremony.tick(899.0);
        assert_eq!(ceremony.phase(), CeremonyPhase::Sealing);

        ceremony.tick(1.0);
        assert!(ceremony.is_sealed());
        assert_eq!(ceremony.progress(), 1.0);
    }

    #[test]
    fn test_retrigger_does_not_restart_or_double_fire() {
        let mut ceremony = ReceiptCeremony::new(CeremonyMode::Crystallize);
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        ceremony.on_sealed(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        ceremony.trigger();
        ceremony.tick(600.0);
        let halfway = ceremony.progress();

        // Trigger mid-seal: the clock must not restart
        ceremony.trigger();
        assert_eq!(ceremony.progress(), halfway);

        ceremony.tick(600.0);
        assert!(ceremony.is_sealed());
        assert_eq!(count.load(Ordering::SeqCst), 1);

        // Trigger after sealed: still nothing
        ceremony.trigger();
        ceremony.tick(2000.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dissolve_ends_transparent() {
        let mut ceremony = ReceiptCeremony::new(CeremonyMode::Dissolve);
        ceremony.trigger();
        ceremony.tick(1500.0);
        let frame = ceremony.frame();
        assert!(frame.opacity.abs() < 1e-4);
        assert!(frame.blur > 5.0);
    }

    #[test]
    fn test_shatter_reform_ends_whole() {
        let mut ceremony = ReceiptCeremony::new(CeremonyMode::ShatterReform);
        ceremony.trigger();

        ceremony.tick(800.0);
        let broken = ceremony.frame();
        assert!(broken.opacity < 0.5);

        ceremony.tick(800.0);
        let reformed = ceremony.frame();
        assert!((reformed.opacity - 1.0).abs() < 1e-3);
        assert!((reformed.scale - 1.0).abs() < 1e-3);
        assert!(reformed.blur.abs() < 1e-2);
    }

    #[test]
    fn test_reset_rearms() {
        let mut ceremony = ReceiptCeremony::new(CeremonyMode::Absorb);
        let count = Arc::new(AtomicUsize::new(0));
        let c = count.clone();
        ceremony.on_sealed(move || {
            c.fetch_add(1, Ordering::SeqCst);
        });

        ceremony.trigger();
        ceremony.tick(900.0);
        assert_eq!(count.load(Ordering::SeqCst), 1);

        ceremony.reset();
        assert_eq!(ceremony.phase(), CeremonyPhase::Idle);
        assert_eq!(ceremony.frame(), SealFrame::IDLE);

        ceremony.trigger();
        ceremony.tick(900.0);
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }
}
