//! Two-state character: `Idle` and `Casting`.
//!
//! `cast()` moves an idle character into `Casting` and arms a one-shot timer;
//! `tick()` returns it to `Idle` when the timer fires. Casting again while
//! already casting is ignored and does not extend the timer.

use serde::Deserialize;

use crate::time::OneShotTimer;

/// Default time spent casting before returning to idle.
pub const DEFAULT_CAST_DURATION_US: u64 = 2_000_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CharacterState {
    #[default]
    Idle,
    Casting,
}

impl CharacterState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Casting => "Casting",
        }
    }
}

impl std::fmt::Display for CharacterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How the return-to-idle timer is armed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastTimerMode {
    /// Armed once when casting starts; casting lasts exactly the cast duration.
    #[default]
    ArmOnce,
    /// Re-armed at the start of every tick while casting. The character only
    /// returns to idle when a single tick spans the whole cast duration.
    RearmEveryTick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastOutcome {
    Started,
    AlreadyCasting,
}

#[derive(Debug, Clone)]
pub struct Character {
    state: CharacterState,
    timer: OneShotTimer,
    cast_duration_us: u64,
    mode: CastTimerMode,
}

impl Character {
    pub fn new(cast_duration_us: u64, mode: CastTimerMode) -> Self {
        Self {
            state: CharacterState::Idle,
            timer: OneShotTimer::new(),
            cast_duration_us,
            mode,
        }
    }

    pub fn state(&self) -> CharacterState {
        self.state
    }

    pub fn is_casting(&self) -> bool {
        self.state == CharacterState::Casting
    }

    pub fn mode(&self) -> CastTimerMode {
        self.mode
    }

    /// Time left before returning to idle, if casting.
    pub fn remaining_us(&self) -> Option<u64> {
        self.timer.remaining_us()
    }

    pub fn cast(&mut self) -> CastOutcome {
        if self.is_casting() {
            return CastOutcome::AlreadyCasting;
        }
        self.state = CharacterState::Casting;
        self.timer.arm(self.cast_duration_us);
        log::info!("Casting!");
        CastOutcome::Started
    }

    /// Advance by one simulation step. Returns true if the character returned
    /// to idle during this step.
    pub fn tick(&mut self, dt_us: u64) -> bool {
        if !self.is_casting() {
            return false;
        }
        if self.mode == CastTimerMode::RearmEveryTick {
            self.timer.arm(self.cast_duration_us);
        }
        if self.timer.tick(dt_us) {
            self.state = CharacterState::Idle;
            log::info!("Idle state");
            return true;
        }
        false
    }
}

impl Default for Character {
    fn default() -> Self {
        Self::new(DEFAULT_CAST_DURATION_US, CastTimerMode::default())
    }
}
