//! Frame timing: fixed-step accumulator, one-shot timers and frame pacing.
//!
//! Simulation timers count integer microseconds so that a given sequence of
//! fixed steps always produces the same transitions.

use std::time::{Duration, Instant};

const FPS_SAMPLE_COUNT: usize = 60;

/// Length of one fixed simulation step (~60 Hz) in microseconds.
pub const FIXED_DT_US: u64 = 16_667;

pub struct TimeState {
    pub fixed_dt: f64,
    pub max_accumulator: f64,
    accumulator: f64,
    pub total_time: f64,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    pub real_dt: f64,
    /// Wall-clock time cut off by the accumulator cap this frame, in
    /// microseconds. Wall-clock timers still need to see it.
    pub dropped_us: u64,
    last_instant: Instant,

    fps_samples: [f64; FPS_SAMPLE_COUNT],
    fps_sample_index: usize,
    pub smoothed_fps: f64,
    pub smoothed_frame_time_ms: f64,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt: FIXED_DT_US as f64 / 1_000_000.0,
            max_accumulator: 0.25,
            accumulator: 0.0,
            total_time: 0.0,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            real_dt: 0.0,
            dropped_us: 0,
            last_instant: Instant::now(),
            fps_samples: [1.0 / 60.0; FPS_SAMPLE_COUNT],
            fps_sample_index: 0,
            smoothed_fps: 60.0,
            smoothed_frame_time_ms: 16.667,
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant).as_secs_f64();
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feed `real_dt` seconds of wall-clock time into the accumulator.
    pub fn advance(&mut self, real_dt: f64) {
        self.real_dt = real_dt;
        self.dropped_us = 0;

        // Spiral-of-death cap
        if self.real_dt > self.max_accumulator {
            self.dropped_us = ((real_dt - self.max_accumulator) * 1_000_000.0).round() as u64;
            log::warn!(
                "Frame took {:.1}ms, capping accumulator to {}ms",
                self.real_dt * 1000.0,
                self.max_accumulator * 1000.0
            );
            self.real_dt = self.max_accumulator;
        }

        self.accumulator += self.real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;

        self.fps_samples[self.fps_sample_index] = self.real_dt;
        self.fps_sample_index = (self.fps_sample_index + 1) % FPS_SAMPLE_COUNT;
        let avg_dt: f64 = self.fps_samples.iter().sum::<f64>() / FPS_SAMPLE_COUNT as f64;
        self.smoothed_frame_time_ms = avg_dt * 1000.0;
        self.smoothed_fps = if avg_dt > 0.0 { 1.0 / avg_dt } else { 0.0 };
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.total_time += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}

/// A delayed callback that fires exactly once per arming.
///
/// Arming while already armed overwrites the pending deadline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OneShotTimer {
    remaining_us: Option<u64>,
}

impl OneShotTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&mut self, delay_us: u64) {
        self.remaining_us = Some(delay_us);
    }

    pub fn cancel(&mut self) {
        self.remaining_us = None;
    }

    pub fn is_armed(&self) -> bool {
        self.remaining_us.is_some()
    }

    pub fn remaining_us(&self) -> Option<u64> {
        self.remaining_us
    }

    /// Advance by `dt_us`. Returns true on the tick the deadline is reached,
    /// after which the timer is disarmed.
    pub fn tick(&mut self, dt_us: u64) -> bool {
        let Some(remaining) = self.remaining_us else {
            return false;
        };
        if dt_us >= remaining {
            self.remaining_us = None;
            true
        } else {
            self.remaining_us = Some(remaining - dt_us);
            false
        }
    }
}

/// Caps the redraw rate to a target frequency.
///
/// The event loop asks [`FramePacer::is_due`] on every wake-up and sleeps until
/// [`FramePacer::deadline`] otherwise.
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    frame_time: Duration,
    next_frame: Instant,
}

impl FramePacer {
    pub fn new(target_fps: u32, now: Instant) -> Self {
        let frame_time = Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)));
        Self {
            frame_time,
            next_frame: now,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }

    pub fn deadline(&self) -> Instant {
        self.next_frame
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_frame
    }

    /// Record that a frame started at `now` and schedule the next one.
    /// A frame that ran late does not trigger a burst of catch-up frames.
    pub fn frame_started(&mut self, now: Instant) {
        let next = self.next_frame + self.frame_time;
        self.next_frame = if next <= now {
            now + self.frame_time
        } else {
            next
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_steps_consume_accumulated_time() {
        let mut time = TimeState::new();
        time.advance(0.05);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 2);
        assert_eq!(time.steps_this_frame, 2);
        assert_eq!(time.fixed_step_count, 2);
    }

    #[test]
    fn long_frames_are_capped() {
        let mut time = TimeState::new();
        time.advance(5.0);
        assert!((time.real_dt - 0.25).abs() < f64::EPSILON);
        let mut steps = 0;
        while time.should_step() {
            steps += 1;
        }
        assert_eq!(steps, 14);
        assert_eq!(time.dropped_us, 4_750_000);

        time.advance(0.1);
        assert_eq!(time.dropped_us, 0);
    }

    #[test]
    fn one_shot_fires_once_at_deadline() {
        let mut timer = OneShotTimer::new();
        timer.arm(50_000);
        assert!(!timer.tick(20_000));
        assert!(!timer.tick(20_000));
        assert_eq!(timer.remaining_us(), Some(10_000));
        assert!(timer.tick(10_000));
        assert!(!timer.is_armed());
        assert!(!timer.tick(1_000_000));
    }

    #[test]
    fn unarmed_timer_never_fires() {
        let mut timer = OneShotTimer::new();
        assert!(!timer.tick(u64::MAX));
    }

    #[test]
    fn rearming_overwrites_pending_deadline() {
        let mut timer = OneShotTimer::new();
        timer.arm(30_000);
        assert!(!timer.tick(20_000));
        timer.arm(30_000);
        assert!(!timer.tick(20_000));
        assert!(timer.tick(10_000));
    }

    #[test]
    fn cancel_disarms() {
        let mut timer = OneShotTimer::new();
        timer.arm(10);
        timer.cancel();
        assert!(!timer.tick(100));
    }

    #[test]
    fn pacer_schedules_one_frame_ahead() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(60, start);
        assert!(pacer.is_due(start));

        pacer.frame_started(start);
        assert!(!pacer.is_due(start));
        assert_eq!(pacer.deadline(), start + pacer.frame_time());
        assert!(pacer.is_due(start + pacer.frame_time()));
    }

    #[test]
    fn pacer_skips_missed_frames_instead_of_bursting() {
        let start = Instant::now();
        let mut pacer = FramePacer::new(60, start);
        pacer.frame_started(start);

        let late = start + Duration::from_millis(500);
        pacer.frame_started(late);
        assert_eq!(pacer.deadline(), late + pacer.frame_time());
    }
}
