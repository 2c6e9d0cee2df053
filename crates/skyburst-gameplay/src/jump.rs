//! Jump detection from pose landmarks.
//!
//! Works on normalized screen coordinates from a pose estimator, where Y
//! grows downward: a jump is the mean hip Y *decreasing* between samples.

/// Rise of the mean hip Y between samples that counts as a jump.
pub const JUMP_THRESHOLD: f32 = 0.05;

/// Minimum milliseconds between two jumps.
pub const JUMP_COOLDOWN_MS: u64 = 500;

/// Landmark visibility required on both hips.
pub const MIN_VISIBILITY: f32 = 0.5;

/// One landmark from a pose estimator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Landmark {
    /// Normalized X (0 = left)
    pub x: f32,
    /// Normalized Y (0 = top)
    pub y: f32,
    /// Estimator confidence that the landmark is visible
    pub visibility: f32,
}

impl Landmark {
    /// Creates a landmark.
    #[must_use]
    pub const fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }
}

/// Hip landmarks from one video frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PoseSample {
    /// Left hip
    pub left_hip: Landmark,
    /// Right hip
    pub right_hip: Landmark,
    /// Frame time in milliseconds
    pub timestamp_ms: u64,
}

/// Turns a stream of pose samples into jump events.
#[derive(Debug, Clone, Default)]
pub struct JumpDetector {
    /// Mean hip Y of the previous visible sample
    last_hip_y: Option<f32>,
    /// Time of the last reported jump
    last_jump_ms: Option<u64>,
    /// Between a reported jump and its landing
    jumping: bool,
}

impl JumpDetector {
    /// Creates a detector with no reference sample.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one sample. Returns the mean hip X when a jump starts.
    pub fn observe(&mut self, sample: &PoseSample) -> Option<f32> {
        let (left, right) = (sample.left_hip, sample.right_hip);
        if left.visibility <= MIN_VISIBILITY || right.visibility <= MIN_VISIBILITY {
            self.last_hip_y = None;
            return None;
        }

        let hip_y = (left.y + right.y) / 2.0;
        let hip_x = (left.x + right.x) / 2.0;
        let previous = self.last_hip_y.replace(hip_y)?;
        let rise = previous - hip_y;

        if rise > JUMP_THRESHOLD && !self.jumping && self.cooled_down(sample.timestamp_ms) {
            self.jumping = true;
            self.last_jump_ms = Some(sample.timestamp_ms);
            return Some(hip_x);
        }
        if rise < -JUMP_THRESHOLD / 2.0 {
            self.jumping = false;
        }
        None
    }

    fn cooled_down(&self, now_ms: u64) -> bool {
        self.last_jump_ms
            .map_or(true, |last| now_ms.saturating_sub(last) > JUMP_COOLDOWN_MS)
    }

    /// Whether a jump is in progress.
    #[must_use]
    pub const fn is_jumping(&self) -> bool {
        self.jumping
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(y: f32, x: f32, t: u64) -> PoseSample {
        PoseSample {
            left_hip: Landmark::new(x - 0.05, y, 0.9),
            right_hip: Landmark::new(x + 0.05, y, 0.9),
            timestamp_ms: t,
        }
    }

    #[test]
    fn test_first_sample_is_reference_only() {
        let mut detector = JumpDetector::new();
        assert_eq!(detector.observe(&sample(0.2, 0.5, 0)), None);
    }

    #[test]
    fn test_rise_reports_mean_x() {
        let mut detector = JumpDetector::new();
        detector.observe(&sample(0.6, 0.3, 0));
        let jump = detector.observe(&sample(0.5, 0.3, 33)).expect("jump");
        assert!((jump - 0.3).abs() < 1e-6);
        assert!(detector.is_jumping());
    }

    #[test]
    fn test_small_rise_ignored() {
        let mut detector = JumpDetector::new();
        detector.observe(&sample(0.6, 0.5, 0));
        assert_eq!(detector.observe(&sample(0.57, 0.5, 33)), None);
    }

    #[test]
    fn test_no_second_jump_until_landing() {
        let mut detector = JumpDetector::new();
        detector.observe(&sample(0.8, 0.5, 0));
        assert!(detector.observe(&sample(0.7, 0.5, 100)).is_some());
        assert_eq!(detector.observe(&sample(0.6, 0.5, 1000)), None);

        // landing
        assert_eq!(detector.observe(&sample(0.7, 0.5, 1100)), None);
        assert!(!detector.is_jumping());
        assert!(detector.observe(&sample(0.6, 0.5, 1200)).is_some());
    }

    #[test]
    fn test_cooldown() {
        let mut detector = JumpDetector::new();
        detector.observe(&sample(0.8, 0.5, 0));
        assert!(detector.observe(&sample(0.7, 0.5, 100)).is_some());
        detector.observe(&sample(0.8, 0.5, 200));
        assert_eq!(detector.observe(&sample(0.7, 0.5, 400)), None);
        detector.observe(&sample(0.8, 0.5, 500));
        assert!(detector.observe(&sample(0.7, 0.5, 700)).is_some());
    }

    #[test]
    fn test_invisible_hips_reset_reference() {
        let mut detector = JumpDetector::new();
        detector.observe(&sample(0.8, 0.5, 0));
        let mut hidden = sample(0.8, 0.5, 33);
        hidden.left_hip.visibility = 0.2;
        assert_eq!(detector.observe(&hidden), None);
        assert_eq!(detector.observe(&sample(0.5, 0.5, 66)), None);
    }
}
