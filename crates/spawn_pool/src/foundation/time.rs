//! Time management utilities

use std::time::Instant;

/// High-precision clock that produces per-frame delta times
///
/// This is the host's per-frame tick source: call [`FrameClock::tick`] once
/// per frame and feed the returned delta to whatever polls on frame time.
pub struct FrameClock {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a new clock starting now
    pub fn new() -> Self {
        Self {
            last_frame: Instant::now(),
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }
    
    /// Measure the wall-clock time since the previous tick and advance
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.advance(elapsed)
    }

    /// Advance by a fixed delta, for simulation and tests
    pub fn advance(&mut self, delta_time: f32) -> f32 {
        self.delta_time = delta_time.max(0.0);
        self.total_time += self.delta_time;
        self.frame_count += 1;
        self.delta_time
    }
    
    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }
    
    /// Get the total elapsed time since clock creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }
    
    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
    
    /// Get the average FPS since clock creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}
