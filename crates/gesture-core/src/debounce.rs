//! Gesture debouncing.
//!
//! A held gesture flag becomes a train of discrete clicks separated by at
//! least the refractory interval:
//!
//! - flag low: the timer is cleared, nothing fires
//! - flag high, timer unset: the timer is armed at `now`, nothing fires
//! - flag high, timer set: fires iff `now - last > refractory`, re-arming at `now`
//!
//! A disabled debouncer never fires and leaves its timer untouched.

use facecursor_face_model::gesture::GestureKind;

/// Minimum seconds between two clicks of the same gesture.
pub const DEFAULT_REFRACTORY_SECS: f64 = 0.3;

/// Per-gesture timer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GestureTimerState {
    pub last_fired_at: Option<f64>,
}

/// Evaluate one frame. Returns whether a click fires and the next timer state.
pub fn evaluate(
    flag_active: bool,
    now: f64,
    state: GestureTimerState,
    refractory_secs: f64,
    enabled: bool,
) -> (bool, GestureTimerState) {
    if !enabled {
        return (false, state);
    }
    if !flag_active {
        return (false, GestureTimerState::default());
    }

    match state.last_fired_at {
        None => (
            false,
            GestureTimerState {
                last_fired_at: Some(now),
            },
        ),
        Some(last) if now - last > refractory_secs => (
            true,
            GestureTimerState {
                last_fired_at: Some(now),
            },
        ),
        Some(_) => (false, state),
    }
}

/// Stateful wrapper around [`evaluate`] for one gesture kind.
#[derive(Debug, Clone)]
pub struct GestureDebouncer {
    kind: GestureKind,
    refractory_secs: f64,
    state: GestureTimerState,
}

impl GestureDebouncer {
    pub fn new(kind: GestureKind, refractory_secs: f64) -> Self {
        Self {
            kind,
            refractory_secs,
            state: GestureTimerState::default(),
        }
    }

    /// Feed one frame's flag. Returns `true` if a click fires on this frame.
    pub fn update(&mut self, flag_active: bool, now: f64, enabled: bool) -> bool {
        let (fires, next) = evaluate(flag_active, now, self.state, self.refractory_secs, enabled);
        self.state = next;
        if fires {
            tracing::debug!(gesture = ?self.kind, at = now, "Gesture fired");
        }
        fires
    }

    pub fn kind(&self) -> GestureKind {
        self.kind
    }

    pub fn state(&self) -> GestureTimerState {
        self.state
    }

    pub fn refractory_secs(&self) -> f64 {
        self.refractory_secs
    }

    pub fn set_refractory_secs(&mut self, refractory_secs: f64) {
        self.refractory_secs = refractory_secs;
    }

    pub fn reset(&mut self) {
        self.state = GestureTimerState::default();
    }
}
