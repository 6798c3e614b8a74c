use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Animation time unit: one frame at this rate.
pub const REFERENCE_FPS: f64 = 60.0;
/// Longest step handed to the animations after a stall (half a second).
const MAX_STEP_FRAMES: f64 = 30.0;

/// Horloge d'affichage : FPS par fenêtre glissante et pas d'animation.
///
/// Animations step in reference frames, so a 30 FPS explorer advances them by
/// 2.0 per tick and they move at the same speed as at 60.
///
/// # Example
/// ```
/// use std::time::{Duration, Instant};
/// use cl_render::clock::FrameClock;
/// let start = Instant::now();
/// let mut clock = FrameClock::new(30);
/// assert_eq!(clock.tick_at(start), 0.0);
/// let dt = clock.tick_at(start + Duration::from_millis(50));
/// assert!((dt - 3.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct FrameClock {
    timestamps: VecDeque<Instant>,
    window: usize,
    fps: f64,
    /// Durée de la dernière frame en ms.
    pub frame_time_ms: f64,
}

impl FrameClock {
    #[must_use]
    pub fn new(window: usize) -> Self {
        let window = window.max(2);
        Self {
            timestamps: VecDeque::with_capacity(window + 1),
            window,
            fps: 0.0,
            frame_time_ms: 0.0,
        }
    }

    /// Appeler une fois par frame. Returns the animation step in reference frames.
    pub fn tick(&mut self) -> f64 {
        self.tick_at(Instant::now())
    }

    /// [`FrameClock::tick`] with an explicit timestamp.
    pub fn tick_at(&mut self, now: Instant) -> f64 {
        let elapsed = self
            .timestamps
            .back()
            .map_or(Duration::ZERO, |&last| now.saturating_duration_since(last));
        self.frame_time_ms = elapsed.as_secs_f64() * 1000.0;

        self.timestamps.push_back(now);
        if self.timestamps.len() > self.window {
            self.timestamps.pop_front();
        }
        if let Some(&first) = self.timestamps.front() {
            let secs = now.saturating_duration_since(first).as_secs_f64();
            if secs > 0.0 {
                self.fps = (self.timestamps.len() - 1) as f64 / secs;
            }
        }
        (elapsed.as_secs_f64() * REFERENCE_FPS).min(MAX_STEP_FRAMES)
    }

    /// FPS moyen sur la fenêtre.
    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }
}

/// Durée d'une frame à `target_fps`.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use cl_render::clock::frame_budget;
/// assert_eq!(frame_budget(50), Duration::from_millis(20));
/// assert_eq!(frame_budget(0), Duration::from_secs(1));
/// ```
#[must_use]
pub fn frame_budget(target_fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(target_fps.max(1)))
}
