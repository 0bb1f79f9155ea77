//! Gameplay glue: the button drives the character.
//!
//! `Session` owns the computed layout and both state machines. It reports the
//! sounds that should play as [`SoundCue`]s instead of touching audio itself,
//! so the whole interaction can run without a window or an audio device.

use fg_core::button::{Button, ButtonState};
use fg_core::character::{CastOutcome, CastTimerMode, Character, CharacterState};
use fg_core::input::PointerEvent;
use fg_core::layout::{Rect, SceneLayout};
use fg_render::QuadSpec;

use crate::assets::TextureKey;

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundCue {
    ButtonClick,
    Cast,
}

pub struct Session {
    layout: SceneLayout,
    button: Button,
    character: Character,
}

impl Session {
    pub fn new(layout: SceneLayout, cast_duration_us: u64, mode: CastTimerMode) -> Self {
        Self {
            layout,
            button: Button::new(layout.button),
            character: Character::new(cast_duration_us, mode),
        }
    }

    pub fn layout(&self) -> &SceneLayout {
        &self.layout
    }

    pub fn button(&self) -> &Button {
        &self.button
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    /// Apply one primary-button event. A press on the button clicks it and
    /// starts a cast if the character is idle.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Vec<SoundCue> {
        let mut cues = Vec::new();
        match event {
            PointerEvent::Down(point) => {
                if self.button.mouse_down(point) {
                    cues.push(SoundCue::ButtonClick);
                    if self.character.cast() == CastOutcome::Started {
                        cues.push(SoundCue::Cast);
                    }
                }
            }
            PointerEvent::Up(_) => {
                self.button.mouse_up();
            }
        }
        cues
    }

    /// Advance one fixed step. Returns true when the character went back to idle.
    pub fn step(&mut self, dt_us: u64) -> bool {
        self.character.tick(dt_us)
    }

    pub fn character_texture(&self) -> TextureKey {
        match self.character.state() {
            CharacterState::Idle => TextureKey::CharacterIdle,
            CharacterState::Casting => TextureKey::CharacterCasting,
        }
    }

    pub fn button_texture(&self) -> TextureKey {
        match self.button.state() {
            ButtonState::Released => TextureKey::ButtonReleased,
            ButtonState::Pressed => TextureKey::ButtonPressed,
        }
    }

    /// Quads in back-to-front draw order: background, character, button.
    pub fn quads(&self) -> [QuadSpec<TextureKey>; 3] {
        [
            quad(TextureKey::Background, self.layout.background),
            quad(self.character_texture(), self.layout.character),
            quad(self.button_texture(), self.layout.button),
        ]
    }
}

fn quad(texture_key: TextureKey, rect: Rect) -> QuadSpec<TextureKey> {
    QuadSpec {
        texture_key,
        x: rect.x as f32,
        y: rect.y as f32,
        width: rect.width as f32,
        height: rect.height as f32,
        color: WHITE,
    }
}
