use crate::engine::Engine;
use crate::error::EngineError;
use crate::geom::Point;
use crate::scope::ScopeKind;
use crate::tracker::Segment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClosingAction {
    None,
    Stroke,
    Fill,
}

impl From<ScopeKind> for ClosingAction {
    fn from(kind: ScopeKind) -> Self {
        match kind {
            ScopeKind::With => ClosingAction::None,
            ScopeKind::Draw => ClosingAction::Stroke,
            ScopeKind::Paint => ClosingAction::Fill,
        }
    }
}

/// Runs the closing action of a `kind` scope over `segments`.
///
/// An empty path is a no-op for every kind.
pub fn close(
    kind: ScopeKind,
    segments: &[Segment],
    engine: &mut dyn Engine,
) -> Result<(), EngineError> {
    let action = ClosingAction::from(kind);
    if action == ClosingAction::None || segments.is_empty() {
        return Ok(());
    }

    replay(segments, engine);
    tracing::trace!(?action, segments = segments.len(), "closing path");
    match action {
        ClosingAction::Stroke => engine.stroke(),
        ClosingAction::Fill => engine.fill(),
        ClosingAction::None => Ok(()),
    }
}

/// Feeds segments to the engine, starting a new sub-path wherever the chain breaks.
fn replay(segments: &[Segment], engine: &mut dyn Engine) {
    let mut last: Option<Point> = None;
    for seg in segments {
        if last != Some(seg.from) {
            engine.move_to(seg.from);
        }
        engine.line_to(seg.to);
        last = Some(seg.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::point;
    use crate::recorder::{Op, Recorder};

    fn seg(a: (f64, f64), b: (f64, f64)) -> Segment {
        Segment {
            from: point(a.0, a.1),
            to: point(b.0, b.1),
        }
    }

    #[test]
    fn draw_strokes_and_paint_fills() {
        let mut rec = Recorder::new(1.0, 1.0);
        let path = [seg((0.0, 0.0), (1.0, 0.0)), seg((1.0, 0.0), (1.0, 1.0))];

        close(ScopeKind::Draw, &path, &mut rec).unwrap();
        close(ScopeKind::Paint, &path, &mut rec).unwrap();
        close(ScopeKind::With, &path, &mut rec).unwrap();

        let ops = rec.recording().ops;
        assert_eq!(ops.len(), 2);
        assert!(matches!(&ops[0], Op::Stroke { subpaths, .. } if subpaths.len() == 1 && subpaths[0].len() == 3));
        assert!(matches!(&ops[1], Op::Fill { .. }));
    }

    #[test]
    fn broken_chains_become_separate_subpaths() {
        let mut rec = Recorder::new(1.0, 1.0);
        let path = [seg((0.0, 0.0), (1.0, 0.0)), seg((5.0, 5.0), (6.0, 5.0))];
        close(ScopeKind::Draw, &path, &mut rec).unwrap();

        let Op::Stroke { subpaths, .. } = &rec.recording().ops[0] else {
            panic!("expected a stroke");
        };
        assert_eq!(
            subpaths,
            &vec![vec![[0.0, 0.0], [1.0, 0.0]], vec![[5.0, 5.0], [6.0, 5.0]]]
        );
    }

    #[test]
    fn empty_path_is_a_no_op() {
        let mut rec = Recorder::new(1.0, 1.0);
        close(ScopeKind::Paint, &[], &mut rec).unwrap();
        assert!(rec.recording().ops.is_empty());
    }
}
