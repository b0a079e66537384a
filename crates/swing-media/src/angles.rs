//! Biomechanical angle extraction from pose landmarks.
//!
//! Landmarks arrive normalized; they are scaled to pixel space first so
//! that non-square frames do not distort the measured angles.

use swing_models::landmark::{
    LEFT_ELBOW, LEFT_HIP, LEFT_SHOULDER, LEFT_WRIST, RIGHT_HIP, RIGHT_SHOULDER,
};
use swing_models::{BodyAngles, Landmark, Landmarks, Point2D};

/// Angle at `b` formed by the vectors `b→a` and `b→c`, in degrees.
///
/// Returns 0.0 if either vector has zero length.
pub fn angle_2d(a: Point2D, b: Point2D, c: Point2D) -> f64 {
    let ba = (a.x - b.x, a.y - b.y);
    let bc = (c.x - b.x, c.y - b.y);

    let dot = ba.0 * bc.0 + ba.1 * bc.1;
    let mag_ba = ba.0.hypot(ba.1);
    let mag_bc = bc.0.hypot(bc.1);
    if mag_ba == 0.0 || mag_bc == 0.0 {
        return 0.0;
    }

    (dot / (mag_ba * mag_bc)).clamp(-1.0, 1.0).acos().to_degrees()
}

/// Scale a normalized landmark to image pixel coordinates.
pub fn landmark_to_point(landmark: &Landmark, width: u32, height: u32) -> Point2D {
    Point2D::new(landmark.x * width as f64, landmark.y * height as f64)
}

/// Unsigned angle of the line `from → to` relative to horizontal, in degrees.
fn line_tilt(from: Point2D, to: Point2D) -> f64 {
    (to.y - from.y).atan2(to.x - from.x).to_degrees().abs()
}

/// Extract the four swing angles from one detected pose.
pub fn compute_angles(landmarks: &Landmarks, width: u32, height: u32) -> BodyAngles {
    let pt = |idx: usize| landmark_to_point(&landmarks.get(idx), width, height);

    let left_shoulder = pt(LEFT_SHOULDER);
    let right_shoulder = pt(RIGHT_SHOULDER);
    let left_hip = pt(LEFT_HIP);
    let right_hip = pt(RIGHT_HIP);
    let left_elbow = pt(LEFT_ELBOW);
    let left_wrist = pt(LEFT_WRIST);

    let mid_shoulder = left_shoulder.midpoint(&right_shoulder);
    let mid_hip = left_hip.midpoint(&right_hip);

    // Forward tilt from vertical; image y grows downward, hence -dy
    let dx = mid_shoulder.x - mid_hip.x;
    let dy = mid_shoulder.y - mid_hip.y;
    let spine_angle = dx.atan2(-dy).to_degrees().abs();

    BodyAngles {
        spine_angle,
        shoulder_turn: line_tilt(left_shoulder, right_shoulder),
        hip_turn: line_tilt(left_hip, right_hip),
        lead_arm_angle: angle_2d(left_shoulder, left_elbow, left_wrist),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swing_models::POSE_LANDMARK_COUNT;

    const EPS: f64 = 1e-9;

    fn pose(points: &[(usize, f64, f64)]) -> Landmarks {
        let mut all = vec![Landmark::new(0.5, 0.5, 1.0); POSE_LANDMARK_COUNT];
        for &(idx, x, y) in points {
            all[idx] = Landmark::new(x, y, 1.0);
        }
        Landmarks::new(all).unwrap()
    }

    /// Upright golfer, arms hanging straight down.
    fn upright() -> Vec<(usize, f64, f64)> {
        vec![
            (LEFT_SHOULDER, 0.4, 0.3),
            (RIGHT_SHOULDER, 0.6, 0.3),
            (LEFT_HIP, 0.45, 0.6),
            (RIGHT_HIP, 0.55, 0.6),
            (LEFT_ELBOW, 0.4, 0.45),
            (LEFT_WRIST, 0.4, 0.6),
        ]
    }

    #[test]
    fn test_angle_2d_degenerate() {
        let p = Point2D::new(3.0, 4.0);
        assert_eq!(angle_2d(p, p, Point2D::new(10.0, 0.0)), 0.0);
        assert_eq!(angle_2d(Point2D::new(10.0, 0.0), p, p), 0.0);
    }

    #[test]
    fn test_angle_2d_antiparallel() {
        let angle = angle_2d(
            Point2D::new(-1.0, 0.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(1.0, 0.0),
        );
        assert!((angle - 180.0).abs() < EPS);
    }

    #[test]
    fn test_angle_2d_perpendicular() {
        let angle = angle_2d(
            Point2D::new(0.0, 5.0),
            Point2D::new(0.0, 0.0),
            Point2D::new(2.0, 0.0),
        );
        assert!((angle - 90.0).abs() < EPS);
    }

    #[test]
    fn test_upright_spine_is_zero() {
        let angles = compute_angles(&pose(&upright()), 1920, 1080);
        assert!(angles.spine_angle.abs() < EPS);
    }

    #[test]
    fn test_forward_tilt() {
        // Shoulders shifted right by the same pixel distance as their height above the hips
        let mut points = upright();
        points[0] = (LEFT_SHOULDER, 0.5, 0.3);
        points[1] = (RIGHT_SHOULDER, 0.7, 0.3);
        let angles = compute_angles(&pose(&points), 1000, 1000);

        // dx = 100px, dy = -300px
        let expected = (100.0f64).atan2(300.0).to_degrees();
        assert!((angles.spine_angle - expected).abs() < EPS);
    }

    #[test]
    fn test_horizontal_shoulders() {
        let angles = compute_angles(&pose(&upright()), 1920, 1080);
        assert!(angles.shoulder_turn.abs() < EPS);
        assert!(angles.hip_turn.abs() < EPS);
    }

    #[test]
    fn test_vertical_shoulders() {
        let mut points = upright();
        points[0] = (LEFT_SHOULDER, 0.5, 0.2);
        points[1] = (RIGHT_SHOULDER, 0.5, 0.4);
        let angles = compute_angles(&pose(&points), 1920, 1080);
        assert!((angles.shoulder_turn - 90.0).abs() < EPS);
    }

    #[test]
    fn test_turn_is_unsigned() {
        let mut up = upright();
        up[1] = (RIGHT_SHOULDER, 0.6, 0.2);
        let mut down = upright();
        down[1] = (RIGHT_SHOULDER, 0.6, 0.4);

        let a = compute_angles(&pose(&up), 1000, 1000);
        let b = compute_angles(&pose(&down), 1000, 1000);
        assert!(a.shoulder_turn > 0.0);
        assert!((a.shoulder_turn - b.shoulder_turn).abs() < EPS);
    }

    #[test]
    fn test_straight_lead_arm() {
        let angles = compute_angles(&pose(&upright()), 1920, 1080);
        assert!((angles.lead_arm_angle - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_pixel_scaling_matters() {
        // 45 degrees in normalized space, but the frame is twice as wide as tall
        let mut points = upright();
        points[0] = (LEFT_SHOULDER, 0.4, 0.3);
        points[1] = (RIGHT_SHOULDER, 0.5, 0.4);
        let angles = compute_angles(&pose(&points), 2000, 1000);

        let expected = (100.0f64).atan2(200.0).to_degrees();
        assert!((angles.shoulder_turn - expected).abs() < EPS);
    }
}
