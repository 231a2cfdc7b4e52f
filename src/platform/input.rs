//! Input source abstraction
//!
//! The core reads one discrete event per tick, a held-key query and the
//! pointer position. Window backends implement [`InputSource`]; tests and the
//! headless runner use [`ScriptedInput`].

use std::collections::{HashSet, VecDeque};

use glam::Vec2;

/// Keys the simulation cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Space,
    Return,
    /// Any other key, identified by the backend's key code
    Other(u32),
}

/// A discrete input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed / quit requested
    Quit,
    KeyDown(Key),
}

/// Source of player input polled once per tick
pub trait InputSource {
    /// Take the next pending event, if any
    fn poll_event(&mut self) -> Option<InputEvent>;

    /// Whether `key` is currently held down
    fn is_key_pressed(&self, key: Key) -> bool;

    /// Current pointer position in field coordinates
    fn pointer_position(&self) -> Vec2;
}

/// Input driven by code: a queue of events, a set of held keys and a pointer
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    pub events: VecDeque<InputEvent>,
    pub held: HashSet<Key>,
    pub pointer: Vec2,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for a later poll
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn press(&mut self, key: Key) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
    }
}

impl InputSource for ScriptedInput {
    fn poll_event(&mut self) -> Option<InputEvent> {
        self.events.pop_front()
    }

    fn is_key_pressed(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn pointer_position(&self) -> Vec2 {
        self.pointer
    }
}
