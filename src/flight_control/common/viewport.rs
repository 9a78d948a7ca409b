use super::vec2d::Vec2D;

/// The fixed rectangular region the simulated vehicle operates in.
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    min: Vec2D<f64>,
    max: Vec2D<f64>,
}

impl Viewport {
    pub const fn new(min: Vec2D<f64>, max: Vec2D<f64>) -> Self { Self { min, max } }

    /// Checks whether `point` lies inside the viewport (edges included).
    pub fn contains(&self, point: Vec2D<f64>) -> bool {
        point.x() >= self.min.x()
            && point.x() <= self.max.x()
            && point.y() >= self.min.y()
            && point.y() <= self.max.y()
    }

    /// Clamps `point` onto the viewport.
    pub fn clamp(&self, point: Vec2D<f64>) -> Vec2D<f64> { point.clamped(self.min, self.max) }

    /// Returns the center of the viewport, the default and reset position.
    pub fn center(&self) -> Vec2D<f64> { (self.min + self.max) / 2.0 }
}
