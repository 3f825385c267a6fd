//! Paper-to-unit-axis mapping and incremental affine transforms.
//!
//! All transforms map user space to device space. Incremental transforms are *pre-multiplied*
//! onto the transform in effect: a point in the new user space first goes through the
//! incremental transform, then through the transform that was already installed. This is the
//! usual `save / scale / translate` behavior of stack-based 2D canvases.

use crate::geom::{Point, Transform, point};

/// Computes the transform that maps the unit axes onto a `width x height` device surface.
///
/// `border` is the fraction of the shorter surface axis reserved as margin on every side.
/// With `centered == false` the origin sits at the bottom-left corner of the margin box and
/// `(1, 1)` reaches the far corner of the largest square that fits on the shorter axis. With
/// `centered == true` the origin is the surface centre and the shorter axis spans `-1..=1`.
///
/// The y axis points up in user space. Nothing is clipped to the unit region.
pub fn initial_transform(width: f64, height: f64, border: f64, centered: bool) -> Transform {
    let short = width.min(height);
    let margin = short * border;
    let usable = short - 2.0 * margin;

    if centered {
        let s = usable / 2.0;
        Transform::new(s, 0.0, 0.0, -s, width / 2.0, height / 2.0)
    } else {
        Transform::new(usable, 0.0, 0.0, -usable, margin, height - margin)
    }
}

pub fn scale(sx: f64, sy: f64) -> Transform {
    Transform::scale(sx, sy)
}

pub fn translate(dx: f64, dy: f64) -> Transform {
    Transform::translation(dx, dy)
}

/// Counter-clockwise rotation (in a y-up user space) about the current origin.
pub fn rotate(radians: f64) -> Transform {
    let (sin, cos) = radians.sin_cos();
    Transform::new(cos, sin, -sin, cos, 0.0, 0.0)
}

/// Installs `incremental` on top of `current`.
pub fn compose(current: &Transform, incremental: &Transform) -> Transform {
    incremental.then(current)
}

/// Uniform length scale of a transform, used to turn user-space pen widths into device widths.
///
/// For non-uniform scales this is the geometric mean of the axis scales.
pub fn length_scale(t: &Transform) -> f64 {
    t.determinant().abs().sqrt()
}

pub fn to_device(t: &Transform, x: f64, y: f64) -> Point {
    t.transform_point(point(x, y))
}

pub fn to_user(t: &Transform, p: Point) -> Option<Point> {
    t.inverse().map(|inv| inv.transform_point(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9
    }

    #[test]
    fn unit_square_fills_square_paper() {
        let t = initial_transform(100.0, 100.0, 0.0, false);
        assert!(close(to_device(&t, 0.0, 0.0), point(0.0, 100.0)));
        assert!(close(to_device(&t, 1.0, 1.0), point(100.0, 0.0)));
    }

    #[test]
    fn border_is_reserved_on_every_side_of_the_shorter_axis() {
        let t = initial_transform(200.0, 100.0, 0.1, false);
        assert!(close(to_device(&t, 0.0, 0.0), point(10.0, 90.0)));
        assert!(close(to_device(&t, 1.0, 1.0), point(90.0, 10.0)));
        // Not clipped: the long axis keeps going past 1.
        assert!(close(to_device(&t, 2.0, 0.0), point(170.0, 90.0)));
    }

    #[test]
    fn centered_origin_spans_minus_one_to_one() {
        let t = initial_transform(300.0, 200.0, 0.0, true);
        assert!(close(to_device(&t, 0.0, 0.0), point(150.0, 100.0)));
        assert!(close(to_device(&t, -1.0, -1.0), point(50.0, 200.0)));
        assert!(close(to_device(&t, 1.0, 1.0), point(250.0, 0.0)));
    }

    #[test]
    fn scale_then_translate_differs_from_translate_then_scale() {
        let base = Transform::identity();

        let st = compose(&compose(&base, &scale(0.5, 0.5)), &translate(1.0, 1.0));
        let ts = compose(&compose(&base, &translate(1.0, 1.0)), &scale(0.5, 0.5));

        // Translation applied inside the scaled space moves the origin by half a unit.
        assert!(close(st.transform_point(point(0.0, 0.0)), point(0.5, 0.5)));
        // Translation applied before scaling moves it by a whole unit.
        assert!(close(ts.transform_point(point(0.0, 0.0)), point(1.0, 1.0)));
        assert!(close(st.transform_point(point(1.0, 1.0)), point(1.0, 1.0)));
        assert!(close(ts.transform_point(point(1.0, 1.0)), point(1.5, 1.5)));
    }

    #[test]
    fn rotation_is_counter_clockwise_about_the_current_origin() {
        let base = translate(10.0, 0.0);
        let t = compose(&base, &rotate(std::f64::consts::FRAC_PI_2));
        assert!(close(t.transform_point(point(1.0, 0.0)), point(10.0, 1.0)));
    }

    #[test]
    fn length_scale_tracks_uniform_scale() {
        let t = initial_transform(400.0, 200.0, 0.0, false);
        assert!((length_scale(&t) - 200.0).abs() < 1e-9);
        assert!((length_scale(&compose(&t, &scale(0.5, 0.5))) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn device_points_map_back_to_user_space() {
        let t = initial_transform(100.0, 50.0, 0.0, true);
        let p = to_device(&t, 0.25, -0.5);
        assert!(close(to_user(&t, p).unwrap(), point(0.25, -0.5)));
    }
}
