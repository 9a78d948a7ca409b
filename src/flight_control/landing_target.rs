use super::common::vec2d::Vec2D;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// An operator-selected landing point.
///
/// At most one target is live at a time. It exists only while the vehicle
/// is flying, is consumed when a landing completes and survives a cancelled
/// descent so the operator can re-land without reselecting.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct LandingTarget {
    point: Vec2D<f64>,
    selected_at: DateTime<Utc>,
}

impl LandingTarget {
    /// Records `point` as the new target. Bounds validation happens in the
    /// flight computer before construction.
    pub fn new(point: Vec2D<f64>) -> Self {
        Self {
            point,
            selected_at: Utc::now(),
        }
    }

    pub fn point(&self) -> Vec2D<f64> { self.point }

    pub fn selected_at(&self) -> DateTime<Utc> { self.selected_at }
}
