//! Geometry types shared by the scope layer and the engines.
//!
//! User space (unit axes set up by `Paper`) and device space (pixels or points) share these
//! types; which space a value is in is tracked by the code handling it.

pub type Point = euclid::default::Point2D<f64>;
pub type Transform = euclid::default::Transform2D<f64>;

pub fn point(x: f64, y: f64) -> Point {
    Point::new(x, y)
}
