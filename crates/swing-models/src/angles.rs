//! Body angle measurements.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Point in image pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: &Point2D) -> Point2D {
        Point2D::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Biomechanical angles for one frame, in degrees.
///
/// All angles are unsigned. Rotation direction is not preserved.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BodyAngles {
    /// Tilt of the hip-to-shoulder line away from vertical
    pub spine_angle: f64,
    /// Angle of the left-to-right shoulder line relative to horizontal
    pub shoulder_turn: f64,
    /// Angle of the left-to-right hip line relative to horizontal
    pub hip_turn: f64,
    /// Interior angle at the lead (left) elbow
    pub lead_arm_angle: f64,
}

impl BodyAngles {
    /// Copy with every angle rounded to one decimal place.
    pub fn rounded(&self) -> Self {
        Self {
            spine_angle: round1(self.spine_angle),
            shoulder_turn: round1(self.shoulder_turn),
            hip_turn: round1(self.hip_turn),
            lead_arm_angle: round1(self.lead_arm_angle),
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounded() {
        let angles = BodyAngles {
            spine_angle: 12.345,
            shoulder_turn: 0.04,
            hip_turn: 89.96,
            lead_arm_angle: 170.0,
        };
        let r = angles.rounded();

        assert_eq!(r.spine_angle, 12.3);
        assert_eq!(r.shoulder_turn, 0.0);
        assert_eq!(r.hip_turn, 90.0);
        assert_eq!(r.lead_arm_angle, 170.0);
    }

    #[test]
    fn test_camel_case_keys() {
        let json = serde_json::to_value(BodyAngles::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert!(obj.contains_key("spineAngle"));
        assert!(obj.contains_key("shoulderTurn"));
        assert!(obj.contains_key("hipTurn"));
        assert!(obj.contains_key("leadArmAngle"));
    }

    #[test]
    fn test_midpoint() {
        let m = Point2D::new(0.0, 10.0).midpoint(&Point2D::new(4.0, 20.0));
        assert_eq!(m, Point2D::new(2.0, 15.0));
    }
}
