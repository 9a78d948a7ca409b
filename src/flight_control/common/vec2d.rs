use num_traits::real::Real;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Div};

/// A 2D vector generic over any real numeric type.
///
/// Represents a point or displacement in the simulated plane and provides
/// the arithmetic the landing interpolation needs: component-wise addition,
/// scalar division, Euclidean distance, and clamping into a rectangular
/// region.
#[derive(Debug, PartialEq, Clone, Copy, Serialize)]
pub struct Vec2D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
}

impl<T: Copy> Vec2D<T> {
    /// Creates a new vector with the given x and y components.
    pub const fn new(x: T, y: T) -> Self { Self { x, y } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }
}

impl<T: Real> Vec2D<T> {
    /// Creates a vector pointing from the current vector (`self`) to `other`.
    pub fn to(&self, other: &Self) -> Self { Self::new(other.x - self.x, other.y - self.y) }

    /// Computes the Euclidean distance between this vector and `other`.
    pub fn euclid_distance(&self, other: &Self) -> T {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Clamps both components into the rectangle spanned by `min` and `max`.
    ///
    /// Unlike a wrapping map, coordinates leaving the region stick to its
    /// edge. This keeps drift and jitter noise inside the viewport.
    pub fn clamped(self, min: Self, max: Self) -> Self {
        Self::new(
            self.x.max(min.x).min(max.x),
            self.y.max(min.y).min(max.y),
        )
    }

    /// Creates a zero vector (x = 0, y = 0).
    pub fn zero() -> Self { Self::new(T::zero(), T::zero()) }
}

impl<T: Real> Add for Vec2D<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output { Self::new(self.x + rhs.x, self.y + rhs.y) }
}

impl<T: Real> Div<T> for Vec2D<T> {
    type Output = Self;

    fn div(self, rhs: T) -> Self::Output { Self::new(self.x / rhs, self.y / rhs) }
}

impl<T: Display> Display for Vec2D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
