//! Time tracking for the Ember engine
//!
//! Handles frame delta time, total elapsed time, pausing, and the fixed
//! timestep accumulator. Registered as a world resource and advanced once
//! per update iteration with the raw frame delta.

use serde::{Deserialize, Serialize};

/// Configuration for engine time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// How many in-engine seconds pass per real second
    pub time_scale: f32,
    /// Fixed timestep for deterministic simulation steps (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

/// Frame time tracking.
#[derive(Debug, Clone)]
pub struct Time {
    /// Configuration
    pub config: TimeConfig,
    /// Time since engine start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped and scaled)
    pub delta_time: f32,
    /// Unscaled delta time
    pub unscaled_delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Whether time is paused
    pub paused: bool,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for Time {
    fn default() -> Self {
        Self {
            config: TimeConfig::default(),
            total_time: 0.0,
            delta_time: 0.0,
            unscaled_delta_time: 0.0,
            frame_count: 0,
            paused: false,
            fixed_accumulator: 0.0,
        }
    }
}

impl Time {
    /// Create a new time tracker with custom config.
    pub fn new(config: TimeConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update with the raw delta from the previous frame.
    pub fn update(&mut self, raw_delta: f32) {
        self.unscaled_delta_time = raw_delta.min(self.config.max_delta_time);
        self.frame_count += 1;

        if self.paused {
            self.delta_time = 0.0;
            return;
        }

        self.delta_time = self.unscaled_delta_time * self.config.time_scale;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame.
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// Pause time.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the time scale (0.0 = frozen, 1.0 = normal, 2.0 = double speed).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.config.time_scale = scale.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_advances_time() {
        let mut time = Time::default();
        time.update(0.016);

        assert!(time.delta_time > 0.0);
        assert_eq!(time.frame_count, 1);
        assert!(time.total_time > 0.0);
    }

    #[test]
    fn test_pause_freezes_delta() {
        let mut time = Time::default();
        time.pause();
        time.update(0.016);
        assert_eq!(time.delta_time, 0.0);

        time.resume();
        time.update(0.016);
        assert!(time.delta_time > 0.0);
    }

    #[test]
    fn test_delta_is_clamped() {
        let mut time = Time::default();
        time.update(10.0);
        assert_eq!(time.delta_time, time.config.max_delta_time);
    }

    #[test]
    fn test_fixed_steps_drain_accumulator() {
        let mut time = Time::new(TimeConfig {
            fixed_timestep: 0.01,
            ..Default::default()
        });
        time.update(0.035);
        assert_eq!(time.fixed_steps(), 3);
        assert_eq!(time.fixed_steps(), 0);
    }

    #[test]
    fn test_time_scale_is_clamped_to_zero() {
        let mut time = Time::default();
        time.set_time_scale(-1.0);
        time.update(0.016);
        assert_eq!(time.delta_time, 0.0);
    }
}
