//! Motion scheduler
//!
//! Owns every registered motion primitive and advances them each frame.
//! Components hold a weak [`SchedulerHandle`] for registration and sampling,
//! so a dropped scheduler simply makes every handle operation a no-op.
//! Frame deltas come through the core [`Clock`] trait: live schedulers run
//! on a [`MonotonicClock`], while tests and headless playback can drive
//! frames from a `ManualClock`.
//!
//! # Background Thread Mode
//!
//! The scheduler can run on its own background thread via
//! `start_background()`, so breath loops and seals keep moving while the
//! host's event loop is quiet. The thread sets a `needs_redraw` flag whenever
//! primitives are active; the main thread checks and clears it with
//! `take_needs_redraw()` and can install a wake callback to nudge its event
//! loop.

use crate::breath::{BreathEngine, BreathSample};
use crate::ceremony::{ReceiptCeremony, SealFrame};
use crate::hold::HoldGesture;
use crate::materialize::{GlyphState, TextMaterializer};
use navicue_core::clock::{Clock, MonotonicClock, SharedClock};
use slotmap::{new_key_type, SlotMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

new_key_type! {
    /// Handle to a registered hold gesture
    pub struct HoldId;
    /// Handle to a registered breath engine
    pub struct BreathId;
    /// Handle to a registered text materializer
    pub struct MaterializeId;
    /// Handle to a registered receipt ceremony
    pub struct CeremonyId;
}

/// Internal state of the motion scheduler
struct SchedulerInner {
    holds: SlotMap<HoldId, HoldGesture>,
    breaths: SlotMap<BreathId, BreathEngine>,
    materializers: SlotMap<MaterializeId, TextMaterializer>,
    ceremonies: SlotMap<CeremonyId, ReceiptCeremony>,
    clock: SharedClock,
    /// Clock reading at the previous frame
    last_ms: f64,
}

impl SchedulerInner {
    /// Advance from the clock, returning whether anything is still active
    fn frame(&mut self) -> bool {
        let now = self.clock.now_ms();
        let dt_ms = (now - self.last_ms).max(0.0) as f32;
        self.last_ms = now;
        self.advance(dt_ms);
        self.has_active()
    }

    fn advance(&mut self, dt_ms: f32) {
        for (_, hold) in self.holds.iter_mut() {
            hold.tick(dt_ms);
        }
        for (_, breath) in self.breaths.iter_mut() {
            breath.tick(dt_ms);
        }
        for (_, materializer) in self.materializers.iter_mut() {
            materializer.tick(dt_ms);
        }
        for (_, ceremony) in self.ceremonies.iter_mut() {
            ceremony.tick(dt_ms);
        }
        // NOTE: primitives are never removed here. They leave the scheduler
        // only when their owner removes them, so completed primitives can be
        // reset and replayed.
    }

    fn has_active(&self) -> bool {
        self.holds.iter().any(|(_, h)| h.is_active())
            || self.breaths.iter().any(|(_, b)| b.is_active())
            || self.materializers.iter().any(|(_, m)| m.is_active())
            || self.ceremonies.iter().any(|(_, c)| c.is_active())
    }
}

/// Callback for waking the main thread from the animation thread
pub type WakeCallback = Arc<dyn Fn() + Send + Sync>;

/// The scheduler that ticks all registered motion primitives
pub struct MotionScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
    /// Stop signal for the background thread
    stop_flag: Arc<AtomicBool>,
    /// Set by the background thread when active primitives need a redraw
    needs_redraw: Arc<AtomicBool>,
    /// Background thread handle (if running)
    thread_handle: Option<JoinHandle<()>>,
    /// Optional callback to wake the main thread
    wake_callback: Option<WakeCallback>,
}

impl MotionScheduler {
    /// A scheduler on the wall clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(MonotonicClock::new()))
    }

    /// A scheduler on an explicit time source (manual-clock playback, tests)
    pub fn with_clock(clock: SharedClock) -> Self {
        let last_ms = clock.now_ms();
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                holds: SlotMap::with_key(),
                breaths: SlotMap::with_key(),
                materializers: SlotMap::with_key(),
                ceremonies: SlotMap::with_key(),
                clock,
                last_ms,
            })),
            stop_flag: Arc::new(AtomicBool::new(false)),
            needs_redraw: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
            wake_callback: None,
        }
    }

    /// Set a wake callback invoked from the background thread when active
    /// primitives need a redraw
    pub fn set_wake_callback<F>(&mut self, callback: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.wake_callback = Some(Arc::new(callback));
    }

    /// Start the scheduler on a background thread at 120fps
    pub fn start_background(&mut self) {
        if self.thread_handle.is_some() {
            return; // Already running
        }

        let inner = Arc::clone(&self.inner);
        let stop_flag = Arc::clone(&self.stop_flag);
        let needs_redraw = Arc::clone(&self.needs_redraw);
        let wake_callback = self.wake_callback.clone();

        self.thread_handle = Some(thread::spawn(move || {
            let frame_duration = Duration::from_micros(1_000_000 / 120);

            while !stop_flag.load(Ordering::Relaxed) {
                let start = Instant::now();

                let has_active = inner.lock().unwrap().frame();

                if has_active {
                    needs_redraw.store(true, Ordering::Release);
                    if let Some(ref callback) = wake_callback {
                        callback();
                    }
                }

                let elapsed = start.elapsed();
                if elapsed < frame_duration {
                    thread::sleep(frame_duration - elapsed);
                }
            }
        }));
        tracing::debug!("motion scheduler background thread started");
    }

    /// Stop the background thread
    pub fn stop_background(&mut self) {
        self.stop_flag.store(true, Ordering::Relaxed);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
        self.stop_flag.store(false, Ordering::Relaxed);
    }

    /// Check if the background thread is running
    pub fn is_background_running(&self) -> bool {
        self.thread_handle.is_some()
    }

    /// Check and clear the needs_redraw flag in one atomic swap
    pub fn take_needs_redraw(&self) -> bool {
        self.needs_redraw.swap(false, Ordering::Acquire)
    }

    /// Manually request a redraw
    pub fn request_redraw(&self) {
        self.needs_redraw.store(true, Ordering::Release);
    }

    /// Get a weak handle for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Tick all primitives from the scheduler's clock
    ///
    /// Returns true if any primitives are still active.
    pub fn tick(&self) -> bool {
        self.inner.lock().unwrap().frame()
    }

    /// Advance all primitives by an explicit delta, bypassing the clock
    pub fn advance(&self, dt_ms: f32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        inner.last_ms = inner.clock.now_ms();
        inner.advance(dt_ms);
        inner.has_active()
    }

    /// Check if any primitives are still active
    pub fn has_active(&self) -> bool {
        self.inner.lock().unwrap().has_active()
    }

    pub fn hold_count(&self) -> usize {
        self.inner.lock().unwrap().holds.len()
    }

    pub fn breath_count(&self) -> usize {
        self.inner.lock().unwrap().breaths.len()
    }

    pub fn materializer_count(&self) -> usize {
        self.inner.lock().unwrap().materializers.len()
    }

    pub fn ceremony_count(&self) -> usize {
        self.inner.lock().unwrap().ceremonies.len()
    }
}

impl Default for MotionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MotionScheduler {
    fn drop(&mut self) {
        // Stop the background thread when the scheduler is dropped
        self.stop_background();
    }
}

/// A weak handle to the motion scheduler
///
/// Passed to components that need to register primitives. It won't keep the
/// scheduler alive; every operation returns `None` (or a default) once the
/// scheduler is gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    // =========================================================================
    // Hold Gestures
    // =========================================================================

    /// Register a hold gesture and return its ID
    pub fn register_hold(&self, hold: HoldGesture) -> Option<HoldId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock().unwrap();
            // Re-read the clock so a freshly registered primitive doesn't
            // absorb a huge first dt
            guard.last_ms = guard.clock.now_ms();
            guard.holds.insert(hold)
        })
    }

    /// Current tension of a hold gesture
    pub fn hold_tension(&self, id: HoldId) -> Option<f32> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().holds.get(id).map(|h| h.tension()))
    }

    /// Apply a function to a hold gesture if it exists
    pub fn with_hold<F, R>(&self, id: HoldId, f: F) -> Option<R>
    where
        F: FnOnce(&mut HoldGesture) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().holds.get_mut(id).map(f))
    }

    /// Remove a hold gesture
    pub fn remove_hold(&self, id: HoldId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().holds.remove(id);
        }
    }

    // =========================================================================
    // Breath Engines
    // =========================================================================

    /// Register a breath engine and return its ID
    pub fn register_breath(&self, breath: BreathEngine) -> Option<BreathId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock().unwrap();
            guard.last_ms = guard.clock.now_ms();
            guard.breaths.insert(breath)
        })
    }

    /// Sample a breath engine
    pub fn breath_sample(&self, id: BreathId) -> Option<BreathSample> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().breaths.get(id).map(|b| b.sample()))
    }

    /// Apply a function to a breath engine if it exists
    pub fn with_breath<F, R>(&self, id: BreathId, f: F) -> Option<R>
    where
        F: FnOnce(&mut BreathEngine) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().breaths.get_mut(id).map(f))
    }

    /// Remove a breath engine
    pub fn remove_breath(&self, id: BreathId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().breaths.remove(id);
        }
    }

    // =========================================================================
    // Text Materializers
    // =========================================================================

    /// Register a materializer and return its ID
    pub fn register_materializer(&self, materializer: TextMaterializer) -> Option<MaterializeId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock().unwrap();
            guard.last_ms = guard.clock.now_ms();
            guard.materializers.insert(materializer)
        })
    }

    /// Glyph states of a materializer
    pub fn materializer_glyphs(&self, id: MaterializeId) -> Option<Vec<GlyphState>> {
        self.inner.upgrade().and_then(|inner| {
            inner
                .lock()
                .unwrap()
                .materializers
                .get(id)
                .map(|m| m.glyphs())
        })
    }

    /// Overall progress of a materializer
    pub fn materializer_progress(&self, id: MaterializeId) -> Option<f32> {
        self.inner.upgrade().and_then(|inner| {
            inner
                .lock()
                .unwrap()
                .materializers
                .get(id)
                .map(|m| m.progress())
        })
    }

    /// Apply a function to a materializer if it exists
    pub fn with_materializer<F, R>(&self, id: MaterializeId, f: F) -> Option<R>
    where
        F: FnOnce(&mut TextMaterializer) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().materializers.get_mut(id).map(f))
    }

    /// Remove a materializer
    pub fn remove_materializer(&self, id: MaterializeId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().materializers.remove(id);
        }
    }

    // =========================================================================
    // Receipt Ceremonies
    // =========================================================================

    /// Register a ceremony and return its ID
    pub fn register_ceremony(&self, ceremony: ReceiptCeremony) -> Option<CeremonyId> {
        self.inner.upgrade().map(|inner| {
            let mut guard = inner.lock().unwrap();
            guard.last_ms = guard.clock.now_ms();
            guard.ceremonies.insert(ceremony)
        })
    }

    /// Current frame of a ceremony
    pub fn ceremony_frame(&self, id: CeremonyId) -> Option<SealFrame> {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().ceremonies.get(id).map(|c| c.frame()))
    }

    /// Apply a function to a ceremony if it exists
    pub fn with_ceremony<F, R>(&self, id: CeremonyId, f: F) -> Option<R>
    where
        F: FnOnce(&mut ReceiptCeremony) -> R,
    {
        self.inner
            .upgrade()
            .and_then(|inner| inner.lock().unwrap().ceremonies.get_mut(id).map(f))
    }

    /// Remove a ceremony
    pub fn remove_ceremony(&self, id: CeremonyId) {
        if let Some(inner) = self.inner.upgrade() {
            inner.lock().unwrap().ceremonies.remove(id);
        }
    }

    /// Check if the scheduler is still alive
    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }
}
