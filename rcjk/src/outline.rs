//! A recorded, interpolatable point outline.

use std::fmt;

use kurbo::{Affine, BezPath, Point};

use crate::{
    blend::{BinaryOp, Blend},
    error::BlendError,
    pen::{PointPen, SegmentType},
};

/// A single point of an outline contour.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlinePoint {
    pub pt: Point,
    /// `None` for off-curve points.
    pub segment_type: Option<SegmentType>,
    pub smooth: bool,
    pub name: Option<String>,
}

impl OutlinePoint {
    /// Returns `true` for points with a segment type.
    pub fn is_on_curve(&self) -> bool {
        self.segment_type.is_some()
    }
}

/// One call made on a [`PointPen`].
#[derive(Clone, Debug, PartialEq)]
pub enum PointCommand {
    BeginPath,
    AddPoint(OutlinePoint),
    EndPath,
}

impl PointCommand {
    fn kind(&self) -> &'static str {
        match self {
            Self::BeginPath => "beginPath",
            Self::AddPoint(_) => "addPoint",
            Self::EndPath => "endPath",
        }
    }
}

/// The reason two outlines could not be blended.
#[derive(Clone, Debug, PartialEq)]
pub enum OutlineMismatch {
    /// The outlines have a different number of pen commands.
    CommandCount(usize, usize),
    /// The commands at this index are of different kinds.
    Command(usize, &'static str, &'static str),
    /// The points at this index have different segment types.
    SegmentType(usize),
}

impl fmt::Display for OutlineMismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::CommandCount(a, b) => write!(f, "{a} commands vs {b} commands"),
            Self::Command(ix, a, b) => write!(f, "command {ix} is '{a}' vs '{b}'"),
            Self::SegmentType(ix) => write!(f, "point at command {ix} has a different type"),
        }
    }
}

/// An outline could not be converted to segments.
#[derive(Clone, Debug, PartialEq)]
pub enum ToPathError {
    /// A cubic segment with more than two off-curve points.
    TooManyOffCurves(usize),
    /// A `move` point somewhere other than the start of a contour.
    MisplacedMove(usize),
}

impl fmt::Display for ToPathError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TooManyOffCurves(n) => {
                write!(f, "curve segment has {n} off-curve points, expected at most 2")
            }
            Self::MisplacedMove(ix) => write!(f, "'move' point at index {ix} of a contour"),
        }
    }
}

impl std::error::Error for ToPathError {}

/// An outline recorded from [`PointPen`] calls.
///
/// Two outlines are compatible for interpolation when they have the same
/// sequence of commands and matching segment types; only the point
/// coordinates may differ.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    commands: Vec<PointCommand>,
}

impl Outline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// The recorded pen commands, in order.
    pub fn commands(&self) -> &[PointCommand] {
        &self.commands
    }

    /// Iterate over every point, in order.
    pub fn points(&self) -> impl Iterator<Item = &OutlinePoint> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            PointCommand::AddPoint(pt) => Some(pt),
            _ => None,
        })
    }

    /// Replay the recorded commands into another pen.
    pub fn draw_points(&self, pen: &mut impl PointPen) {
        for cmd in &self.commands {
            match cmd {
                PointCommand::BeginPath => pen.begin_path(),
                PointCommand::AddPoint(pt) => {
                    pen.add_point(pt.pt, pt.segment_type, pt.smooth, pt.name.as_deref())
                }
                PointCommand::EndPath => pen.end_path(),
            }
        }
    }

    /// Return a copy of this outline with `f` applied to every point.
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Outline {
        let commands = self
            .commands
            .iter()
            .map(|cmd| match cmd {
                PointCommand::AddPoint(pt) => PointCommand::AddPoint(OutlinePoint {
                    pt: f(pt.pt),
                    ..pt.clone()
                }),
                other => other.clone(),
            })
            .collect();
        Outline { commands }
    }

    /// Return a copy of this outline with every point transformed.
    pub fn transform(&self, transform: Affine) -> Outline {
        self.map_points(|pt| transform * pt)
    }

    /// Convert the point stream into a segment based path.
    pub fn to_bezpath(&self) -> Result<BezPath, ToPathError> {
        let mut path = BezPath::new();
        let mut contour = Vec::new();
        for cmd in &self.commands {
            match cmd {
                PointCommand::BeginPath => contour.clear(),
                PointCommand::AddPoint(pt) => contour.push(pt),
                PointCommand::EndPath => {
                    append_contour(&mut path, &contour)?;
                    contour.clear();
                }
            }
        }
        Ok(path)
    }
}

impl PointPen for Outline {
    fn begin_path(&mut self) {
        self.commands.push(PointCommand::BeginPath);
    }

    fn add_point(
        &mut self,
        pt: Point,
        segment_type: Option<SegmentType>,
        smooth: bool,
        name: Option<&str>,
    ) {
        self.commands.push(PointCommand::AddPoint(OutlinePoint {
            pt,
            segment_type,
            smooth,
            name: name.map(str::to_owned),
        }));
    }

    fn end_path(&mut self) {
        self.commands.push(PointCommand::EndPath);
    }
}

impl Blend for Outline {
    fn combine(&self, other: &Self, op: BinaryOp) -> Result<Self, BlendError> {
        if self.commands.len() != other.commands.len() {
            return Err(
                OutlineMismatch::CommandCount(self.commands.len(), other.commands.len()).into(),
            );
        }
        let commands = self
            .commands
            .iter()
            .zip(&other.commands)
            .enumerate()
            .map(|(ix, pair)| match pair {
                (PointCommand::BeginPath, PointCommand::BeginPath) => Ok(PointCommand::BeginPath),
                (PointCommand::EndPath, PointCommand::EndPath) => Ok(PointCommand::EndPath),
                (PointCommand::AddPoint(a), PointCommand::AddPoint(b)) => {
                    if a.segment_type != b.segment_type {
                        return Err(OutlineMismatch::SegmentType(ix));
                    }
                    Ok(PointCommand::AddPoint(OutlinePoint {
                        pt: Point::new(op.apply(a.pt.x, b.pt.x), op.apply(a.pt.y, b.pt.y)),
                        ..a.clone()
                    }))
                }
                (a, b) => Err(OutlineMismatch::Command(ix, a.kind(), b.kind())),
            })
            .collect::<Result<_, _>>()?;
        Ok(Outline { commands })
    }

    fn scale(&self, scalar: f64) -> Self {
        self.map_points(|pt| Point::new(pt.x * scalar, pt.y * scalar))
    }
}

/// Append one contour of UFO style points to `path`.
///
/// Open contours start with a `move` point. Closed contours are started at
/// their first on-curve point; a closed contour made only of off-curve points
/// is a quadratic loop starting at the implied point between its last and
/// first points.
fn append_contour(path: &mut BezPath, points: &[&OutlinePoint]) -> Result<(), ToPathError> {
    let Some(first) = points.first() else {
        return Ok(());
    };
    if let Some(ix) = points
        .iter()
        .skip(1)
        .position(|pt| pt.segment_type == Some(SegmentType::Move))
    {
        return Err(ToPathError::MisplacedMove(ix + 1));
    }

    if first.segment_type == Some(SegmentType::Move) {
        path.move_to(first.pt);
        let mut off_curves = Vec::new();
        for pt in &points[1..] {
            if pt.is_on_curve() {
                append_segment(path, &off_curves, pt)?;
                off_curves.clear();
            } else {
                off_curves.push(pt.pt);
            }
        }
        // trailing off-curve points of an open contour are dropped
        return Ok(());
    }

    let Some(start) = points.iter().position(|pt| pt.is_on_curve()) else {
        let n = points.len();
        let implied = |ix: usize| points[ix].pt.midpoint(points[(ix + 1) % n].pt);
        path.move_to(implied(n - 1));
        for ix in 0..n {
            path.quad_to(points[ix].pt, implied(ix));
        }
        path.close_path();
        return Ok(());
    };

    path.move_to(points[start].pt);
    let mut off_curves = Vec::new();
    let rotated = points[start + 1..].iter().chain(&points[..=start]);
    for pt in rotated {
        if pt.is_on_curve() {
            append_segment(path, &off_curves, pt)?;
            off_curves.clear();
        } else {
            off_curves.push(pt.pt);
        }
    }
    path.close_path();
    Ok(())
}

fn append_segment(
    path: &mut BezPath,
    off_curves: &[Point],
    end: &OutlinePoint,
) -> Result<(), ToPathError> {
    match (end.segment_type, off_curves) {
        (_, []) => path.line_to(end.pt),
        (Some(SegmentType::QCurve), offs) => {
            for pair in offs.windows(2) {
                path.quad_to(pair[0], pair[0].midpoint(pair[1]));
            }
            path.quad_to(offs[offs.len() - 1], end.pt);
        }
        (_, [c0]) => path.quad_to(*c0, end.pt),
        (_, [c0, c1]) => path.curve_to(*c0, *c1, end.pt),
        (_, offs) => return Err(ToPathError::TooManyOffCurves(offs.len())),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use kurbo::PathEl;

    use super::*;
    use crate::testing;

    fn open_curve() -> Outline {
        let mut outline = Outline::new();
        outline.begin_path();
        outline.add_point((0.0, 0.0).into(), Some(SegmentType::Move), false, Some("start"));
        outline.add_point((10.0, 20.0).into(), None, false, None);
        outline.add_point((30.0, 20.0).into(), None, false, None);
        outline.add_point((40.0, 0.0).into(), Some(SegmentType::Curve), true, None);
        outline.end_path();
        outline
    }

    fn assert_close(a: &Outline, b: &Outline) {
        assert_eq!(a.commands().len(), b.commands().len());
        for (pa, pb) in a.points().zip(b.points()) {
            assert!((pa.pt - pb.pt).hypot() < 1e-9, "{:?} != {:?}", pa.pt, pb.pt);
            assert_eq!(pa.segment_type, pb.segment_type);
        }
    }

    #[test]
    fn record_and_replay() {
        let outline = open_curve();
        let mut copy = Outline::new();
        outline.draw_points(&mut copy);
        assert_eq!(outline, copy);
        assert_eq!(outline.points().count(), 4);
        assert_eq!(outline.points().next().unwrap().name.as_deref(), Some("start"));
    }

    #[test]
    fn add_then_sub_is_identity() {
        let a = testing::square_outline(0.0, 0.0, 10.0);
        let b = testing::square_outline(3.5, -7.25, 42.0);
        let round_trip = a.add(&b).unwrap().sub(&b).unwrap();
        assert_close(&round_trip, &a);
    }

    #[test]
    fn scale_distributes_over_add() {
        let a = testing::square_outline(1.0, 2.0, 10.0);
        let b = testing::square_outline(-5.0, 8.0, 3.0);
        let k = 0.3;
        let left = a.add(&b).unwrap().scale(k);
        let right = a.scale(k).add(&b.scale(k)).unwrap();
        assert_close(&left, &right);
    }

    #[test]
    fn blend_keeps_markers_and_attributes() {
        let a = open_curve();
        let b = open_curve().map_points(|pt| Point::new(pt.x * 2.0, pt.y));
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.commands()[0], PointCommand::BeginPath);
        assert_eq!(sum.commands()[5], PointCommand::EndPath);
        let first = sum.points().next().unwrap();
        assert_eq!(first.name.as_deref(), Some("start"));
        let last = sum.points().last().unwrap();
        assert_eq!(last.pt, Point::new(120.0, 0.0));
        assert!(last.smooth);
    }

    #[test]
    fn differing_point_counts_fail() {
        let a = testing::square_outline(0.0, 0.0, 10.0);
        let mut b = Outline::new();
        b.begin_path();
        for pt in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
            b.add_point(pt.into(), Some(SegmentType::Line), false, None);
        }
        b.end_path();
        assert_eq!(
            a.add(&b),
            Err(BlendError::GeometryMismatch(OutlineMismatch::CommandCount(6, 5)))
        );
        assert!(b.sub(&a).is_err());
    }

    #[test]
    fn differing_commands_fail() {
        let a = testing::square_outline(0.0, 0.0, 10.0);
        let mut b = Outline::new();
        b.begin_path();
        for pt in [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)] {
            b.add_point(pt.into(), Some(SegmentType::Line), false, None);
        }
        b.end_path();
        b.begin_path();
        assert!(matches!(
            a.add(&b),
            Err(BlendError::GeometryMismatch(OutlineMismatch::Command(
                4,
                "addPoint",
                "endPath"
            )))
        ));
    }

    #[test]
    fn differing_segment_types_fail() {
        let a = open_curve();
        let mut b = Outline::new();
        b.begin_path();
        b.add_point((0.0, 0.0).into(), Some(SegmentType::Move), false, None);
        b.add_point((10.0, 20.0).into(), None, false, None);
        b.add_point((30.0, 20.0).into(), None, false, None);
        b.add_point((40.0, 0.0).into(), Some(SegmentType::QCurve), false, None);
        b.end_path();
        assert_eq!(
            a.sub(&b),
            Err(BlendError::GeometryMismatch(OutlineMismatch::SegmentType(4)))
        );
    }

    #[test]
    fn transform_points() {
        let outline = testing::square_outline(0.0, 0.0, 10.0);
        let moved = outline.transform(Affine::translate((5.0, -1.0)));
        assert_eq!(
            testing::points(&moved),
            vec![(5.0, -1.0), (15.0, -1.0), (15.0, 9.0), (5.0, 9.0)]
        );
    }

    #[test]
    fn closed_polygon_to_path() {
        let path = testing::square_outline(0.0, 0.0, 10.0).to_bezpath().unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo((0.0, 0.0).into()),
                PathEl::LineTo((10.0, 0.0).into()),
                PathEl::LineTo((10.0, 10.0).into()),
                PathEl::LineTo((0.0, 10.0).into()),
                PathEl::LineTo((0.0, 0.0).into()),
                PathEl::ClosePath,
            ]
        );
    }

    #[test]
    fn open_curve_to_path() {
        let path = open_curve().to_bezpath().unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo((0.0, 0.0).into()),
                PathEl::CurveTo((10.0, 20.0).into(), (30.0, 20.0).into(), (40.0, 0.0).into()),
            ]
        );
    }

    #[test]
    fn closed_contour_starting_off_curve() {
        let mut outline = Outline::new();
        outline.begin_path();
        outline.add_point((0.0, 10.0).into(), None, false, None);
        outline.add_point((10.0, 10.0).into(), None, false, None);
        outline.add_point((10.0, 0.0).into(), Some(SegmentType::Curve), false, None);
        outline.add_point((0.0, 0.0).into(), Some(SegmentType::Line), false, None);
        outline.end_path();
        let path = outline.to_bezpath().unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo((10.0, 0.0).into()),
                PathEl::LineTo((0.0, 0.0).into()),
                PathEl::CurveTo((0.0, 10.0).into(), (10.0, 10.0).into(), (10.0, 0.0).into()),
                PathEl::ClosePath,
            ]
        );
    }

    #[test]
    fn implied_quadratic_points() {
        let mut outline = Outline::new();
        outline.begin_path();
        outline.add_point((0.0, 0.0).into(), Some(SegmentType::QCurve), false, None);
        outline.add_point((0.0, 10.0).into(), None, false, None);
        outline.add_point((10.0, 10.0).into(), None, false, None);
        outline.end_path();
        let path = outline.to_bezpath().unwrap();
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo((0.0, 0.0).into()),
                PathEl::QuadTo((0.0, 10.0).into(), (5.0, 10.0).into()),
                PathEl::QuadTo((10.0, 10.0).into(), (0.0, 0.0).into()),
                PathEl::ClosePath,
            ]
        );
    }

    #[test]
    fn too_many_cubic_off_curves() {
        let mut outline = Outline::new();
        outline.begin_path();
        outline.add_point((0.0, 0.0).into(), Some(SegmentType::Move), false, None);
        for x in [1.0, 2.0, 3.0] {
            outline.add_point((x, 5.0).into(), None, false, None);
        }
        outline.add_point((4.0, 0.0).into(), Some(SegmentType::Curve), false, None);
        outline.end_path();
        assert_eq!(outline.to_bezpath(), Err(ToPathError::TooManyOffCurves(3)));
    }
}
