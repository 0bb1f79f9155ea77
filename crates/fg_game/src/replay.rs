use crate::session::{Session, SoundCue};
use fg_core::input::PointerEvent;
use glam::Vec2;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Recorded pointer input, one entry per fixed step (or run of steps).
#[derive(Debug, Deserialize, Clone)]
pub struct ReplaySequence {
    #[serde(default = "default_dt_us")]
    pub fixed_dt_us: u64,
    pub frames: Vec<ReplayFrame>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReplayFrame {
    #[serde(default)]
    pub down: Option<[f32; 2]>,
    #[serde(default)]
    pub up: Option<[f32; 2]>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

/// Observable state after each fixed step of a replay run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    pub cues: Vec<SoundCue>,
    pub casting: bool,
    pub pressed: bool,
}

impl ReplaySequence {
    /// Pointer events for each step. Events of a repeated frame are only
    /// delivered on its first step; down is applied before up.
    pub fn expanded_events(&self) -> Vec<Vec<PointerEvent>> {
        let mut out = Vec::new();
        for frame in &self.frames {
            let mut first = Vec::new();
            if let Some([x, y]) = frame.down {
                first.push(PointerEvent::Down(Vec2::new(x, y)));
            }
            if let Some([x, y]) = frame.up {
                first.push(PointerEvent::Up(Vec2::new(x, y)));
            }
            out.push(first);
            for _ in 1..frame.repeat.max(1) {
                out.push(Vec::new());
            }
        }
        out
    }

    pub fn run(&self, session: &mut Session) -> Vec<ReplayStep> {
        self.expanded_events()
            .into_iter()
            .map(|events| {
                let cues = events
                    .into_iter()
                    .flat_map(|event| session.handle_pointer(event))
                    .collect();
                session.step(self.fixed_dt_us);
                ReplayStep {
                    cues,
                    casting: session.character().is_casting(),
                    pressed: session.button().is_pressed(),
                }
            })
            .collect()
    }
}

pub fn load_replay_from_path(path: &Path) -> Result<ReplaySequence, String> {
    let raw =
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    let replay: ReplaySequence = serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse replay JSON {}: {e}", path.display()))?;
    validate_replay(&replay)?;
    Ok(replay)
}

fn validate_replay(replay: &ReplaySequence) -> Result<(), String> {
    if replay.fixed_dt_us == 0 {
        return Err("Replay validation failed: fixed_dt_us must be > 0".to_string());
    }
    if replay.frames.is_empty() {
        return Err("Replay validation failed: frames list is empty".to_string());
    }
    Ok(())
}

const fn default_dt_us() -> u64 {
    fg_core::time::FIXED_DT_US
}

const fn default_repeat() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use fg_core::character::CastTimerMode;
    use fg_core::layout::{ScaleMapping, SceneLayout, Size, DESIGN_CANVAS};
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "fg_replay_test_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    fn session(mode: CastTimerMode) -> Session {
        let mapping = ScaleMapping::new(DESIGN_CANVAS, Size::new(400, 800));
        Session::new(SceneLayout::compute(&mapping), 2_000_000, mode)
    }

    // Button occupies x 151..270, y 607..726 in a 400x800 window.
    const CLICK_SESSION: &str = r#"{
      "frames": [
        { "down": [200.0, 650.0], "repeat": 5 },
        { "up": [10.0, 10.0], "repeat": 60 },
        { "down": [200.0, 650.0], "up": [200.0, 650.0], "repeat": 60 },
        { "down": [20.0, 20.0], "up": [20.0, 20.0], "repeat": 20 }
      ]
    }"#;

    #[test]
    fn replay_file_parses_and_expands() {
        let path = temp_file_path("parse");
        fs::write(&path, CLICK_SESSION).expect("write replay file");

        let replay = load_replay_from_path(&path).expect("replay should load");
        assert_eq!(replay.fixed_dt_us, 16_667);
        let expanded = replay.expanded_events();
        assert_eq!(expanded.len(), 145);
        assert_eq!(expanded[0].len(), 1);
        assert!(expanded[1].is_empty());
        assert_eq!(expanded[65].len(), 2);

        let _ = fs::remove_file(path);
    }

    #[test]
    fn replay_rejects_empty_frames() {
        let path = temp_file_path("empty");
        fs::write(&path, r#"{ "frames": [] }"#).expect("write replay file");
        let err = load_replay_from_path(&path).expect_err("empty replay should fail");
        assert!(err.contains("frames list is empty"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn click_session_casts_once_and_returns_to_idle() {
        let replay: ReplaySequence = serde_json::from_str(CLICK_SESSION).expect("parse");
        let steps = replay.run(&mut session(CastTimerMode::ArmOnce));

        assert_eq!(steps[0].cues, vec![SoundCue::ButtonClick, SoundCue::Cast]);
        assert!(steps[0].casting && steps[0].pressed);
        assert!(!steps[5].pressed, "release off the button still releases");

        // Second click lands while casting: click sound only.
        assert_eq!(steps[65].cues, vec![SoundCue::ButtonClick]);
        assert!(!steps[65].pressed);

        // Cast started on step 0; 120 steps of 16.667ms cover 2s.
        assert!(steps[118].casting);
        assert!(!steps[119].casting);

        // Clicks outside the button never cue anything.
        assert!(steps[125..].iter().all(|s| s.cues.is_empty() && !s.casting));
    }

    #[test]
    fn rearm_mode_keeps_casting_for_whole_replay() {
        let replay: ReplaySequence = serde_json::from_str(CLICK_SESSION).expect("parse");
        let steps = replay.run(&mut session(CastTimerMode::RearmEveryTick));
        assert!(steps.iter().all(|s| s.casting));
    }

    #[test]
    fn replay_run_is_deterministic() {
        let replay: ReplaySequence = serde_json::from_str(CLICK_SESSION).expect("parse");
        let run_a = replay.run(&mut session(CastTimerMode::ArmOnce));
        let run_b = replay.run(&mut session(CastTimerMode::ArmOnce));
        assert_eq!(run_a, run_b);
    }
}
