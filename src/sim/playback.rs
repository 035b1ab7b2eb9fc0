//! Sequential playback of the incident timeline.
//!
//! Playback is presentation pacing only: frames are visited one after another
//! on the calling thread, with a fixed sleep between them.

use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;

use anyhow::{Result, ensure};
use tracing::info;

use crate::vecutils::linspace;

/// Longest timeline a playback may hold.
pub const MAX_FRAMES: usize = 1_000_000;

/// Ordered list of sample times (min) with a pacing delay between frames.
#[derive(Debug, Clone, PartialEq)]
pub struct Playback {
    times: Vec<f64>,
    frame_delay: Duration,
}

impl Playback {
    /// Evenly spaced times from `start` to `end` (both included) with spacing `step`.
    ///
    /// The spacing is adjusted slightly when `end - start` is not a multiple of `step`.
    pub fn linear(start: f64, end: f64, step: f64) -> Result<Self> {
        ensure!(
            start.is_finite() && end.is_finite() && start >= 0.0,
            "playback range must be finite and start at t >= 0, got {}..{}",
            start,
            end
        );
        ensure!(end >= start, "playback end {} precedes start {}", end, start);
        ensure!(
            step.is_finite() && step > 0.0,
            "playback step must be positive, got {}",
            step
        );
        let intervals = ((end - start) / step).round();
        ensure!(
            intervals < MAX_FRAMES as f64,
            "playback step {} gives more than {} frames over {}..{}",
            step,
            MAX_FRAMES,
            start,
            end
        );
        let n = intervals as usize + 1;
        Ok(Self {
            times: linspace(start, end, n),
            frame_delay: Duration::ZERO,
        })
    }

    /// Times interpolated linearly along a path of keyframes.
    ///
    /// Each leg between two consecutive keyframes is split into `steps_per_leg`
    /// intervals. Repeated times are dropped.
    pub fn along(keyframes: &[f64], steps_per_leg: usize) -> Result<Self> {
        ensure!(!keyframes.is_empty(), "at least one keyframe is required");
        ensure!(steps_per_leg > 0, "steps per leg must be positive");
        ensure!(
            keyframes.iter().all(|t| t.is_finite() && *t >= 0.0),
            "keyframes must be finite and non-negative"
        );
        let total = (keyframes.len() - 1)
            .checked_mul(steps_per_leg)
            .and_then(|n| n.checked_add(1));
        ensure!(
            total.is_some_and(|n| n <= MAX_FRAMES),
            "{} legs of {} steps exceed {} frames",
            keyframes.len() - 1,
            steps_per_leg,
            MAX_FRAMES
        );

        let mut times = vec![keyframes[0]];
        for leg in keyframes.windows(2) {
            for t in linspace(leg[0], leg[1], steps_per_leg + 1).into_iter().skip(1) {
                if times.last() != Some(&t) {
                    times.push(t);
                }
            }
        }
        Ok(Self {
            times,
            frame_delay: Duration::ZERO,
        })
    }

    /// Sets the pause inserted between consecutive frames.
    pub fn with_frame_delay(mut self, delay: Duration) -> Self {
        self.frame_delay = delay;
        self
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Calls `on_frame(index, t)` for every frame in order.
    ///
    /// Returning `ControlFlow::Break` stops the loop before the next frame.
    /// Errors from the callback abort the playback and are returned as is.
    /// Returns the number of frames shown.
    pub fn run<F>(&self, mut on_frame: F) -> Result<usize>
    where
        F: FnMut(usize, f64) -> Result<ControlFlow<()>>,
    {
        let mut shown = 0;
        for (i, &t) in self.times.iter().enumerate() {
            if i > 0 && !self.frame_delay.is_zero() {
                thread::sleep(self.frame_delay);
            }
            shown += 1;
            if on_frame(i, t)?.is_break() {
                break;
            }
        }
        info!(shown, total = self.times.len(), "playback finished");
        Ok(shown)
    }
}
