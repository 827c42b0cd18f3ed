//! Keyboard intents
//!
//! Raw key events update a set of held keys; the simulation reads one
//! [`InputState`] snapshot per tick.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Per-tick steering and jump intents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
}

/// Which intent a key drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Intent {
    Left,
    Right,
    Jump,
}

impl Intent {
    /// Map a key identifier (DOM `KeyboardEvent.key` style) to an intent.
    ///
    /// Steering is reversed on purpose: the keys that normally mean "left"
    /// drive the `right` intent and vice versa.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "a" | "A" | "ArrowLeft" => Some(Intent::Right),
            "d" | "D" | "ArrowRight" => Some(Intent::Left),
            "w" | "W" | " " | "Space" | "PageUp" => Some(Intent::Jump),
            _ => None,
        }
    }
}

/// Tracks held keys across key events
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    /// Held keys with their mapped intent
    held: BTreeSet<(Intent, String)>,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle a key-down (including auto-repeat). Returns false for unmapped keys.
    pub fn key_down(&mut self, key: &str) -> bool {
        match Intent::from_key(key) {
            Some(intent) => {
                self.held.insert((intent, key.to_owned()));
                true
            }
            None => false,
        }
    }

    /// Handle a key-up. Returns false for unmapped keys.
    pub fn key_up(&mut self, key: &str) -> bool {
        match Intent::from_key(key) {
            Some(intent) => {
                self.held.remove(&(intent, key.to_owned()));
                true
            }
            None => false,
        }
    }

    /// Release everything (window blur, focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    fn is_held(&self, intent: Intent) -> bool {
        self.held.iter().any(|(i, _)| *i == intent)
    }

    /// Snapshot of current intents
    pub fn snapshot(&self) -> InputState {
        InputState {
            left: self.is_held(Intent::Left),
            right: self.is_held(Intent::Right),
            jump: self.is_held(Intent::Jump),
        }
    }
}
