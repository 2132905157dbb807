//! Flat state machines for vignette interaction states
//!
//! Vignettes describe their interaction surface as a small table of
//! `(state, event) -> state` transitions built with [`StateMachine::builder`].
//! The [`FsmRuntime`] owns every machine in a slotmap so hosts can drive them
//! by id without borrowing component internals.

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

/// Identifier for a state within a machine
pub type StateId = u32;

/// Identifier for an event delivered to a machine
pub type EventId = u32;

new_key_type! {
    /// Handle to a machine registered with an [`FsmRuntime`]
    pub struct FsmId;
}

/// A single `(from, event) -> to` edge
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: StateId,
    pub event: EventId,
    pub to: StateId,
}

/// A flat finite state machine
#[derive(Clone, Debug)]
pub struct StateMachine {
    initial: StateId,
    current: StateId,
    transitions: SmallVec<[Transition; 8]>,
}

impl StateMachine {
    /// Start building a machine with the given initial state
    pub fn builder(initial: StateId) -> StateMachineBuilder {
        StateMachineBuilder {
            initial,
            transitions: SmallVec::new(),
        }
    }

    /// Current state
    pub fn current(&self) -> StateId {
        self.current
    }

    /// Deliver an event
    ///
    /// Returns the new state if a transition fired, or `None` if the event
    /// has no edge from the current state (the machine stays put).
    pub fn send(&mut self, event: EventId) -> Option<StateId> {
        let edge = self
            .transitions
            .iter()
            .find(|t| t.from == self.current && t.event == event)?;
        self.current = edge.to;
        Some(self.current)
    }

    /// Check whether an event would fire a transition right now
    pub fn accepts(&self, event: EventId) -> bool {
        self.transitions
            .iter()
            .any(|t| t.from == self.current && t.event == event)
    }

    /// Return to the initial state
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

/// Builder for [`StateMachine`]
pub struct StateMachineBuilder {
    initial: StateId,
    transitions: SmallVec<[Transition; 8]>,
}

impl StateMachineBuilder {
    /// Add a transition edge
    pub fn on(mut self, from: StateId, event: EventId, to: StateId) -> Self {
        self.transitions.push(Transition { from, event, to });
        self
    }

    pub fn build(self) -> StateMachine {
        StateMachine {
            initial: self.initial,
            current: self.initial,
            transitions: self.transitions,
        }
    }
}

/// Owns every live state machine
pub struct FsmRuntime {
    machines: SlotMap<FsmId, StateMachine>,
}

impl FsmRuntime {
    pub fn new() -> Self {
        Self {
            machines: SlotMap::with_key(),
        }
    }

    /// Register a machine and return its handle
    pub fn create(&mut self, machine: StateMachine) -> FsmId {
        self.machines.insert(machine)
    }

    /// Remove a machine
    pub fn remove(&mut self, id: FsmId) -> Option<StateMachine> {
        self.machines.remove(id)
    }

    /// Deliver an event to a machine by id
    pub fn send(&mut self, id: FsmId, event: EventId) -> Option<StateId> {
        self.machines.get_mut(id)?.send(event)
    }

    /// Current state of a machine by id
    pub fn current_state(&self, id: FsmId) -> Option<StateId> {
        self.machines.get(id).map(|m| m.current())
    }

    /// Number of live machines
    pub fn len(&self) -> usize {
        self.machines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.machines.is_empty()
    }
}

impl Default for FsmRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IDLE: StateId = 0;
    const ACTIVE: StateId = 1;
    const DONE: StateId = 2;

    const GO: EventId = 1;
    const FINISH: EventId = 2;

    fn machine() -> StateMachine {
        StateMachine::builder(IDLE)
            .on(IDLE, GO, ACTIVE)
            .on(ACTIVE, FINISH, DONE)
            .build()
    }

    #[test]
    fn test_transitions_follow_edges() {
        let mut m = machine();
        assert_eq!(m.current(), IDLE);

        assert_eq!(m.send(GO), Some(ACTIVE));
        assert_eq!(m.send(FINISH), Some(DONE));
    }

    #[test]
    fn test_unknown_event_is_ignored() {
        let mut m = machine();
        assert_eq!(m.send(FINISH), None);
        assert_eq!(m.current(), IDLE);
    }

    #[test]
    fn test_accepts() {
        let m = machine();
        assert!(m.accepts(GO));
        assert!(!m.accepts(FINISH));
    }

    #[test]
    fn test_reset_returns_to_initial() {
        let mut m = machine();
        m.send(GO);
        m.reset();
        assert_eq!(m.current(), IDLE);
    }

    #[test]
    fn test_runtime_send_by_id() {
        let mut runtime = FsmRuntime::new();
        let id = runtime.create(machine());

        assert_eq!(runtime.current_state(id), Some(IDLE));
        assert_eq!(runtime.send(id, GO), Some(ACTIVE));
        assert_eq!(runtime.current_state(id), Some(ACTIVE));

        runtime.remove(id);
        assert_eq!(runtime.current_state(id), None);
        assert!(runtime.is_empty());
    }
}
