//! Types for receiving and replaying point-based outlines.

use kurbo::Point;

/// The segment type of an on-curve point.
///
/// Off-curve points have no segment type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentType {
    /// The first point of an open contour.
    Move,
    /// A straight line from the previous on-curve point.
    Line,
    /// A cubic bezier whose control points precede this point.
    Curve,
    /// A quadratic curve; consecutive off-curve points imply on-curve
    /// points halfway between them.
    QCurve,
}

impl SegmentType {
    /// Parses the segment type names used by UFO glyph sources.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "move" => Some(Self::Move),
            "line" => Some(Self::Line),
            "curve" => Some(Self::Curve),
            "qcurve" => Some(Self::QCurve),
            _ => None,
        }
    }

    /// The name of this segment type in UFO glyph sources.
    pub fn name(self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Line => "line",
            Self::Curve => "curve",
            Self::QCurve => "qcurve",
        }
    }
}

/// Interface for accepting a sequence of contour points.
///
/// PointPen in Python terms.
/// <https://github.com/fonttools/fonttools/blob/main/Lib/fontTools/pens/pointPen.py>
pub trait PointPen {
    /// Start a new contour.
    fn begin_path(&mut self);

    /// Add a point to the current contour.
    fn add_point(
        &mut self,
        pt: Point,
        segment_type: Option<SegmentType>,
        smooth: bool,
        name: Option<&str>,
    );

    /// End the current contour.
    fn end_path(&mut self);
}

impl<T: PointPen + ?Sized> PointPen for &mut T {
    fn begin_path(&mut self) {
        (**self).begin_path()
    }

    fn add_point(
        &mut self,
        pt: Point,
        segment_type: Option<SegmentType>,
        smooth: bool,
        name: Option<&str>,
    ) {
        (**self).add_point(pt, segment_type, smooth, name)
    }

    fn end_path(&mut self) {
        (**self).end_path()
    }
}

/// Pen that drops all drawing output into the ether.
pub struct NullPen;

impl PointPen for NullPen {
    fn begin_path(&mut self) {}
    fn add_point(&mut self, _: Point, _: Option<SegmentType>, _: bool, _: Option<&str>) {}
    fn end_path(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_type_names() {
        for ty in [
            SegmentType::Move,
            SegmentType::Line,
            SegmentType::Curve,
            SegmentType::QCurve,
        ] {
            assert_eq!(SegmentType::from_name(ty.name()), Some(ty));
        }
        assert_eq!(SegmentType::from_name("offcurve"), None);
    }
}
