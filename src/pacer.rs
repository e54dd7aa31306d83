/*
 *  pacer.rs
 *
 *  PhaseScope - stereo field monitor
 *  (c) 2025-26 the PhaseScope authors
 *
 *  This program is free software: you can redistribute it and/or modify
 *  it under the terms of the GNU General Public License as published by
 *  the Free Software Foundation, either version 3 of the License, or
 *  (at your option) any later version.
 *
 *  This program is distributed in the hope that it will be useful,
 *  but WITHOUT ANY WARRANTY; without even the implied warranty of
 *  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
 *  GNU General Public License for more details.
 *
 *  See <http://www.gnu.org/licenses/> to get a copy of the GNU General
 *  Public License.
 *
 */
//! Frame pacing and adaptive render quality. The display refresh signal
//! may run much faster than the configured frame rate; the pacer caps
//! actual draws while the quality level absorbs sustained overload.

use serde::Serialize;

const EMA_ALPHA: f32 = 0.2;
const QUALITY_STEP: f32 = 0.1;
const QUALITY_FLOOR: f32 = 0.1;
const QUALITY_CEIL: f32 = 1.0;
/// Achieved rate below this fraction of target counts as a slow tick.
const FPS_LOW_RATIO: f32 = 0.8;
/// Default consecutive slow/fast ticks required before quality moves.
const ADJUST_WINDOW: u32 = 5;

/// Hard frame-rate ceiling. Caller-supplied millisecond timestamps keep
/// it deterministic under test.
#[derive(Debug, Clone)]
pub struct Pacer {
    next_deadline_ms: f64,
    frame_ms: f64,
}

impl Pacer {
    pub fn new(target_fps: i32) -> Self {
        Self { next_deadline_ms: 0.0, frame_ms: frame_ms_for(target_fps) }
    }

    #[inline]
    pub fn set_fps(&mut self, fps: i32) {
        self.frame_ms = frame_ms_for(fps);
    }

    /// Returns true if a frame is due now; if true, also schedules the
    /// next deadline.
    #[inline]
    pub fn should_flush(&mut self, now_ms: u64) -> bool {
        let now = now_ms as f64;
        if now >= self.next_deadline_ms {
            self.next_deadline_ms = now + self.frame_ms;
            true
        } else {
            false
        }
    }
}

#[inline]
fn frame_ms_for(fps: i32) -> f64 {
    1000.0 / fps.max(1) as f64
}

/// Read-only statistics surface polled by the host UI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderStats {
    pub fps: f32,
    pub quality: f32,
    pub frames_rendered: u64,
    pub frames_dropped: u64,
}

/// Per-tick render decision plus a continuous quality throttle.
///
/// Quality moves in fixed steps when the measured tick rate stays below
/// 80% of target (down) or at/above target (up) for `ADJUST_WINDOW`
/// consecutive ticks. Skipping a draw is the pacer's job; quality only
/// scales how much work a drawn frame does.
#[derive(Debug, Clone)]
pub struct RenderScheduler {
    pacer: Pacer,
    target_fps: i32,
    ema_interval_ms: f32,
    last_tick_ms: Option<u64>,
    slow_streak: u32,
    good_streak: u32,
    adjust_window: u32,
    quality: f32,
    frames_rendered: u64,
    frames_dropped: u64,
}

impl RenderScheduler {
    pub fn new(target_fps: i32) -> Self {
        Self {
            pacer: Pacer::new(target_fps),
            target_fps,
            ema_interval_ms: 0.0,
            last_tick_ms: None,
            slow_streak: 0,
            good_streak: 0,
            adjust_window: ADJUST_WINDOW,
            quality: QUALITY_CEIL,
            frames_rendered: 0,
            frames_dropped: 0,
        }
    }

    /// Consecutive-tick window before quality moves; default 5.
    pub fn with_adjust_window(mut self, window: u32) -> Self {
        self.adjust_window = window.max(1);
        self
    }

    pub fn set_target_fps(&mut self, fps: i32) {
        self.target_fps = fps;
        self.pacer.set_fps(fps);
        self.slow_streak = 0;
        self.good_streak = 0;
    }

    /// Feed one display-refresh tick. O(1): updates the interval EMA and
    /// the quality streaks.
    pub fn on_tick(&mut self, now_ms: u64) {
        if let Some(last) = self.last_tick_ms {
            let dt = now_ms.saturating_sub(last) as f32;
            if dt > 0.0 {
                self.ema_interval_ms = if self.ema_interval_ms == 0.0 {
                    dt
                } else {
                    EMA_ALPHA * dt + (1.0 - EMA_ALPHA) * self.ema_interval_ms
                };
                self.adjust_quality();
            }
        }
        self.last_tick_ms = Some(now_ms);
    }

    /// Whether to draw on this tick. A non-positive target disables the
    /// ceiling entirely: every tick renders.
    pub fn should_render(&mut self, now_ms: u64) -> bool {
        if self.target_fps <= 0 {
            return true;
        }
        self.pacer.should_flush(now_ms)
    }

    pub fn start_render(&mut self) {}

    /// Close out a frame; an incomplete frame counts as dropped.
    pub fn end_render(&mut self, completed: bool) {
        if completed {
            self.frames_rendered += 1;
        } else {
            self.frames_dropped += 1;
        }
    }

    pub fn fps(&self) -> f32 {
        if self.ema_interval_ms > 0.0 {
            1000.0 / self.ema_interval_ms
        } else {
            0.0
        }
    }

    pub fn quality(&self) -> f32 {
        self.quality
    }

    pub fn stats(&self) -> RenderStats {
        RenderStats {
            fps: self.fps(),
            quality: self.quality,
            frames_rendered: self.frames_rendered,
            frames_dropped: self.frames_dropped,
        }
    }

    fn adjust_quality(&mut self) {
        // no target, nothing to compare against; fps keeps updating
        if self.target_fps <= 0 {
            return;
        }
        let achieved = 1000.0 / self.ema_interval_ms;
        let target = self.target_fps as f32;
        if achieved < target * FPS_LOW_RATIO {
            self.slow_streak += 1;
            self.good_streak = 0;
            if self.slow_streak >= self.adjust_window {
                self.quality = (self.quality - QUALITY_STEP).max(QUALITY_FLOOR);
                self.slow_streak = 0;
            }
        } else if achieved >= target {
            self.good_streak += 1;
            self.slow_streak = 0;
            if self.good_streak >= self.adjust_window {
                self.quality = (self.quality + QUALITY_STEP).min(QUALITY_CEIL);
                self.good_streak = 0;
            }
        } else {
            // 80%..100% of target: hold steady
            self.slow_streak = 0;
            self.good_streak = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_ticks(sched: &mut RenderScheduler, start_ms: u64, interval_ms: u64, count: u64) -> u64 {
        let mut rendered = 0;
        for i in 0..count {
            let now = start_ms + i * interval_ms;
            sched.on_tick(now);
            if sched.should_render(now) {
                sched.start_render();
                sched.end_render(true);
                rendered += 1;
            }
        }
        rendered
    }

    #[test]
    fn test_frame_rate_ceiling() {
        // 200Hz refresh, 30fps target, one second of ticks
        let mut sched = RenderScheduler::new(30);
        let rendered = run_ticks(&mut sched, 0, 5, 200);
        assert!(rendered <= 31, "rendered {rendered} frames at target 30");
        assert!(rendered >= 28);
    }

    #[test]
    fn test_no_target_renders_every_tick() {
        let mut sched = RenderScheduler::new(0);
        let rendered = run_ticks(&mut sched, 0, 5, 200);
        assert_eq!(rendered, 200);
    }

    #[test]
    fn test_quality_drops_when_slow() {
        // target 30fps => slow when achieved < 24fps; 50ms ticks = 20fps
        let mut sched = RenderScheduler::new(30);
        for i in 0..6 {
            sched.on_tick(i * 50);
        }
        assert!(sched.quality() < 1.0);
    }

    #[test]
    fn test_quality_strictly_decreases_under_sustained_load() {
        let mut sched = RenderScheduler::new(30);
        let mut last_q = sched.quality();
        let mut now = 0;
        for round in 0..20 {
            for _ in 0..6 {
                now += 50;
                sched.on_tick(now);
            }
            let q = sched.quality();
            if last_q > QUALITY_FLOOR {
                assert!(q < last_q, "round {round}: quality did not decrease");
            }
            last_q = q;
        }
        assert!((sched.quality() - QUALITY_FLOOR).abs() < 1e-6);
    }

    #[test]
    fn test_custom_adjust_window() {
        let mut sched = RenderScheduler::new(30).with_adjust_window(2);
        // two slow intervals are enough with a window of 2
        for i in 0..3 {
            sched.on_tick(i * 50);
        }
        assert!((sched.quality() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_quality_never_below_floor() {
        let mut sched = RenderScheduler::new(60);
        for i in 0..10_000u64 {
            sched.on_tick(i * 100);
        }
        assert!(sched.quality() >= QUALITY_FLOOR);
    }

    #[test]
    fn test_quality_recovers_at_target() {
        let mut sched = RenderScheduler::new(30);
        let mut now = 0;
        // force down
        for _ in 0..60 {
            now += 50;
            sched.on_tick(now);
        }
        assert!(sched.quality() < 1.0);
        // 5ms ticks = 200fps achieved, well above target: EMA converges
        // fast and quality steps back up
        for _ in 0..200 {
            now += 5;
            sched.on_tick(now);
        }
        assert!((sched.quality() - QUALITY_CEIL).abs() < 1e-6);
    }

    #[test]
    fn test_midband_holds_quality() {
        // target 30, ticks at ~27fps (37ms): between 80% and 100%
        let mut sched = RenderScheduler::new(30);
        for i in 0..100 {
            sched.on_tick(i * 37);
        }
        assert!((sched.quality() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_dropped_frame_counter() {
        let mut sched = RenderScheduler::new(30);
        sched.on_tick(0);
        assert!(sched.should_render(0));
        sched.start_render();
        sched.end_render(false);
        let stats = sched.stats();
        assert_eq!(stats.frames_dropped, 1);
        assert_eq!(stats.frames_rendered, 0);
    }

    #[test]
    fn test_measured_fps() {
        let mut sched = RenderScheduler::new(60);
        for i in 0..100 {
            sched.on_tick(i * 20);
        }
        let fps = sched.fps();
        assert!((fps - 50.0).abs() < 1.0, "expected ~50fps, got {fps}");
    }
}
