/// Frame pacing and timing
///
/// Paces frames to a target rate with deadlines and reports the measured
/// wall time between frames. A slow frame is not made up with extra ticks;
/// it just reports a larger elapsed time.
use std::time::{Duration, Instant};

/// FPS tracking window (average over last N frames)
const FPS_WINDOW_SIZE: usize = 60;

/// FPS is recomputed every N frames
const FPS_UPDATE_INTERVAL: u64 = 10;

/// Frame timing state
pub struct FrameClock {
    /// Target duration of one frame
    frame_duration: Duration,

    /// Time of last frame
    last_frame_time: Instant,

    /// Earliest time the next frame may start
    next_deadline: Instant,

    /// Time when the clock started
    start_time: Instant,

    /// Frame timing history for FPS calculation
    frame_times: Vec<Duration>,

    /// Current frame number
    frame_count: u64,

    /// Current FPS (updated periodically)
    current_fps: f32,
}

impl FrameClock {
    /// Create a clock pacing to `target_fps` frames per second
    pub fn new(target_fps: u32) -> Self {
        Self::starting_at(target_fps, Instant::now())
    }

    fn starting_at(target_fps: u32, now: Instant) -> Self {
        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)));
        Self {
            frame_duration,
            last_frame_time: now,
            next_deadline: now,
            start_time: now,
            frame_times: Vec::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            current_fps: 0.0,
        }
    }

    /// Begin a new frame now, returns seconds since the previous frame
    pub fn tick(&mut self) -> f32 {
        self.tick_at(Instant::now())
    }

    /// Begin a new frame at `now`, returns seconds since the previous frame
    pub fn tick_at(&mut self, now: Instant) -> f32 {
        let frame_time = now.saturating_duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.frame_count += 1;

        // Store frame time for FPS calculation
        self.frame_times.push(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.remove(0);
        }

        if self.frame_count % FPS_UPDATE_INTERVAL == 0 {
            self.update_fps();
        }

        // A late frame restarts the schedule from now: no catch-up frames
        let next = self.next_deadline + self.frame_duration;
        self.next_deadline = if next <= now {
            now + self.frame_duration
        } else {
            next
        };

        frame_time.as_secs_f32()
    }

    /// Whether the next frame may start at `now`
    pub fn is_frame_due(&self, now: Instant) -> bool {
        now >= self.next_deadline
    }

    /// When the next frame should start
    pub fn next_deadline(&self) -> Instant {
        self.next_deadline
    }

    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Get current FPS
    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    /// Get total elapsed time in seconds
    pub fn elapsed_secs(&self) -> f32 {
        Instant::now()
            .saturating_duration_since(self.start_time)
            .as_secs_f32()
    }

    /// Get total number of frames started
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Update FPS calculation
    fn update_fps(&mut self) {
        if self.frame_times.is_empty() {
            self.current_fps = 0.0;
            return;
        }

        // Calculate average frame time
        let total: Duration = self.frame_times.iter().sum();
        let avg_frame_time = total / self.frame_times.len() as u32;

        // Convert to FPS
        self.current_fps = if avg_frame_time.as_secs_f32() > 0.0 {
            1.0 / avg_frame_time.as_secs_f32()
        } else {
            0.0
        };
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(crate::engine::config::DEFAULT_TARGET_FPS)
    }
}
