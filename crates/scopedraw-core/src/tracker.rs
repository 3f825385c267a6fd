use crate::geom::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Current point and pending segments, kept independently of the engine's own path cursor.
///
/// Points are device-space. Taking the segments for a stroke or fill leaves the current point
/// where it was, so the next path continues from it unless it starts with a fresh move.
#[derive(Debug, Clone, Default)]
pub struct PathTracker {
    current: Option<Point>,
    segments: Vec<Segment>,
}

impl PathTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(&mut self, p: Point) {
        self.current = Some(p);
    }

    /// Appends a segment from the current point. Without a current point this only moves.
    pub fn line_to(&mut self, p: Point) {
        if let Some(from) = self.current {
            self.segments.push(Segment { from, to: p });
        }
        self.current = Some(p);
    }

    pub fn current_point(&self) -> Option<Point> {
        self.current
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn take_segments(&mut self) -> Vec<Segment> {
        std::mem::take(&mut self.segments)
    }

    pub fn discard_segments(&mut self) {
        self.segments.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;

    #[test]
    fn move_sets_point_without_a_segment() {
        let mut t = PathTracker::new();
        t.move_to(point(2.0, 3.0));
        assert_eq!(t.current_point(), Some(point(2.0, 3.0)));
        assert!(t.segments().is_empty());
    }

    #[test]
    fn line_without_current_point_only_moves() {
        let mut t = PathTracker::new();
        t.line_to(point(1.0, 1.0));
        assert!(t.segments().is_empty());
        assert_eq!(t.current_point(), Some(point(1.0, 1.0)));
    }

    #[test]
    fn taking_segments_keeps_the_current_point() {
        let mut t = PathTracker::new();
        t.move_to(point(0.0, 0.0));
        t.line_to(point(1.0, 0.0));
        let taken = t.take_segments();
        assert_eq!(
            taken,
            vec![Segment {
                from: point(0.0, 0.0),
                to: point(1.0, 0.0)
            }]
        );
        assert!(t.segments().is_empty());
        assert_eq!(t.current_point(), Some(point(1.0, 0.0)));

        t.line_to(point(0.0, 1.0));
        assert_eq!(t.segments()[0].from, point(1.0, 0.0));
    }
}
