//! Single clickable button with `Released` / `Pressed` states.

use glam::Vec2;

use crate::layout::Rect;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ButtonState {
    #[default]
    Released,
    Pressed,
}

impl ButtonState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Released => "Released",
            Self::Pressed => "Pressed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Button {
    rect: Rect,
    state: ButtonState,
}

impl Button {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            state: ButtonState::Released,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn state(&self) -> ButtonState {
        self.state
    }

    pub fn is_pressed(&self) -> bool {
        self.state == ButtonState::Pressed
    }

    /// Primary button went down at `point`. Returns true (activated) when the
    /// point hits the button, which is now `Pressed`.
    pub fn mouse_down(&mut self, point: Vec2) -> bool {
        if !self.rect.contains(point) {
            return false;
        }
        self.state = ButtonState::Pressed;
        log::info!("Button pressed!");
        true
    }

    /// Primary button went up. Releases regardless of cursor position;
    /// dragging off the button does not cancel anything. Returns true if the
    /// button was pressed.
    pub fn mouse_up(&mut self) -> bool {
        if !self.is_pressed() {
            return false;
        }
        self.state = ButtonState::Released;
        log::info!("Button released!");
        true
    }
}
