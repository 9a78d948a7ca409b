use super::common::vec2d::Vec2D;
use super::landing_target::LandingTarget;
use serde::Serialize;
use strum_macros::Display;

/// Three-tier altitude-derived attention level.
///
/// The naming is inverted from intuition on purpose: lower altitude is
/// presented as "high". This threshold/label mapping is a fixed business
/// rule of the presentation layer, not a bug.
#[derive(Display, Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    High,
    Medium,
    Low,
}

impl SafetyLevel {
    const HIGH_BELOW: f64 = 20.0;
    const MEDIUM_BELOW: f64 = 50.0;

    pub fn from_altitude(altitude: f64) -> Self {
        if altitude < Self::HIGH_BELOW {
            SafetyLevel::High
        } else if altitude < Self::MEDIUM_BELOW {
            SafetyLevel::Medium
        } else {
            SafetyLevel::Low
        }
    }
}

/// Estimated seconds to the target: straight-line distance over current
/// speed. `None` while the vehicle is not moving, never a division by zero.
pub fn eta(distance: f64, speed: f64) -> Option<f64> { (speed > 0.0).then(|| distance / speed) }

/// Derived read-only telemetry fields, recomputed on demand rather than
/// every tick: after target selection, on every idle drift tick and every
/// Nth descent step.
#[derive(Debug, Clone, Copy)]
pub struct DerivedTelemetry {
    pub distance: Option<f64>,
    pub eta: Option<f64>,
    pub safety: SafetyLevel,
}

impl DerivedTelemetry {
    pub fn compute(
        pos: Vec2D<f64>,
        target: Option<&LandingTarget>,
        altitude: f64,
        speed: f64,
    ) -> Self {
        let distance = target.map(|t| pos.euclid_distance(&t.point()));
        Self {
            distance,
            eta: distance.and_then(|d| eta(d, speed)),
            safety: SafetyLevel::from_altitude(altitude),
        }
    }
}
