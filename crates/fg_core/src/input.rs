//! Input state tracking.
//!
//! - **Keys** are tracked with both level-triggered (`is_held`) and
//!   edge-triggered (`is_just_pressed` / `is_just_released`) queries. Edge
//!   state is read once per frame and cleared by `end_frame()`.
//!
//! - **Pointer** presses are queued in arrival order together with the cursor
//!   position at the moment of the event. A press and release landing in the
//!   same frame are both delivered, in order, by `drain_pointer_events()`.

use std::collections::HashSet;

use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    F3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// A primary-button transition at a window-space cursor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Vec2),
    Up(Vec2),
}

pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    just_released: HashSet<Key>,

    mouse_held: HashSet<MouseBtn>,
    pointer_events: Vec<PointerEvent>,

    pub mouse_position: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            held: HashSet::new(),
            just_pressed: HashSet::new(),
            just_released: HashSet::new(),
            mouse_held: HashSet::new(),
            pointer_events: Vec::new(),
            mouse_position: Vec2::ZERO,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        if self.held.remove(&key) {
            self.just_released.insert(key);
        }
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        if self.mouse_held.insert(btn) && btn == MouseBtn::Left {
            self.pointer_events
                .push(PointerEvent::Down(self.mouse_position));
        }
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        if self.mouse_held.remove(&btn) && btn == MouseBtn::Left {
            self.pointer_events.push(PointerEvent::Up(self.mouse_position));
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.just_released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.mouse_held.contains(&btn)
    }

    pub fn drain_pointer_events(&mut self) -> Vec<PointerEvent> {
        std::mem::take(&mut self.pointer_events)
    }

    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.just_released.clear();
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}
