//! Held-key input state
//!
//! Level-triggered only: the engine asks "is fire held right now", and
//! one-shot actions (pause, confirm) are handled by the caller on key-down.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    W,
    A,
    S,
    D,
    X,
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Escape,
}

impl Key {
    /// Map a host key name (e.g. `"ArrowUp"`, `"KeyW"`, `" "`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "w" | "W" | "KeyW" => Some(Key::W),
            "a" | "A" | "KeyA" => Some(Key::A),
            "s" | "S" | "KeyS" => Some(Key::S),
            "d" | "D" | "KeyD" => Some(Key::D),
            "x" | "X" | "KeyX" => Some(Key::X),
            "ArrowUp" | "Up" => Some(Key::Up),
            "ArrowDown" | "Down" => Some(Key::Down),
            "ArrowLeft" | "Left" => Some(Key::Left),
            "ArrowRight" | "Right" => Some(Key::Right),
            " " | "Space" => Some(Key::Space),
            "Enter" | "Return" => Some(Key::Enter),
            "Escape" | "Esc" => Some(Key::Escape),
            _ => None,
        }
    }
}

/// Set of currently held keys
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key was not already held (a key-down edge)
    pub fn key_down(&mut self, key: Key) -> bool {
        self.held.insert(key)
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }

    #[inline]
    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    fn either(&self, a: Key, b: Key) -> bool {
        self.is_held(a) || self.is_held(b)
    }

    pub fn up(&self) -> bool {
        self.either(Key::W, Key::Up)
    }

    pub fn down(&self) -> bool {
        self.either(Key::S, Key::Down)
    }

    pub fn left(&self) -> bool {
        self.either(Key::A, Key::Left)
    }

    pub fn right(&self) -> bool {
        self.either(Key::D, Key::Right)
    }

    pub fn fire(&self) -> bool {
        self.either(Key::Space, Key::X)
    }

    /// Movement vector, unit length when diagonal (y grows downward)
    pub fn move_axis(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        let v = Vec2::new(
            axis(self.left(), self.right()),
            axis(self.up(), self.down()),
        );
        if v.length_squared() > 1.0 { v.normalize() } else { v }
    }
}
