use serde::Serialize;

/// An in-flight camera move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraAnimation {
    pub start_time: f64,
    pub duration: f64,
    pub start_depth: f64,
    pub target_depth: f64,
}

impl CameraAnimation {
    /// Fraction of the move completed at `now`, clamped to `[0, 1]`.
    /// Non-positive durations complete immediately.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    pub fn depth_at(&self, now: f64) -> f64 {
        lerp(self.start_depth, self.target_depth, ease_in_out_quad(self.progress(now)))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub enum CameraState {
    #[default]
    Idle,
    Animating(CameraAnimation),
}

/// Drives the camera depth along eased segments started by cues.
#[derive(Debug, Clone, Default)]
pub struct CameraAnimator {
    depth: f64,
    state: CameraState,
}

impl CameraAnimator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> f64 {
        self.depth
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn is_animating(&self) -> bool {
        matches!(self.state, CameraState::Animating(_))
    }

    /// Starts moving `segment_length` units forward from the current depth,
    /// replacing any move already in progress.
    pub fn start(&mut self, start_time: f64, duration: f64, segment_length: f64) {
        let animation = CameraAnimation {
            start_time,
            duration,
            start_depth: self.depth,
            target_depth: self.depth + segment_length,
        };
        tracing::debug!(
            start_time,
            duration,
            target = animation.target_depth,
            "camera move started"
        );
        self.state = CameraState::Animating(animation);
    }

    /// Per-frame update; returns the new depth.
    pub fn update(&mut self, now: f64) -> f64 {
        if let CameraState::Animating(animation) = self.state {
            self.depth = animation.depth_at(now);
            if animation.progress(now) >= 1.0 {
                self.state = CameraState::Idle;
            }
        }
        self.depth
    }
}

/// Quadratic ease-in-out over `[0, 1]`.
pub fn ease_in_out_quad(t: f64) -> f64 {
    if t < 0.5 {
        2.0 * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
    }
}

pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
