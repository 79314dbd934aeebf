//! Helpers shared by unit tests.

use crate::{
    outline::Outline,
    pen::{PointPen, SegmentType},
};

/// The corners of an axis aligned square, counter-clockwise from `(x, y)`.
pub fn square(x: f64, y: f64, size: f64) -> Vec<(f64, f64)> {
    vec![(x, y), (x + size, y), (x + size, y + size), (x, y + size)]
}

/// A closed contour of line segments through the corners of [`square`].
pub fn square_outline(x: f64, y: f64, size: f64) -> Outline {
    let mut outline = Outline::new();
    outline.begin_path();
    for pt in square(x, y, size) {
        outline.add_point(pt.into(), Some(SegmentType::Line), false, None);
    }
    outline.end_path();
    outline
}

pub fn points(outline: &Outline) -> Vec<(f64, f64)> {
    outline.points().map(|pt| (pt.pt.x, pt.pt.y)).collect()
}

#[cfg(feature = "json")]
pub use self::json::*;

#[cfg(feature = "json")]
mod json {
    use std::rc::Rc;

    use serde_json::{json, Value};

    use crate::{json::JsonGlyphParser, project::Project, source::MemoryDir, store::GlyphStore};

    /// A JSON glyph source whose contours are closed polygons.
    pub fn glyph_json(name: &str, width: f64, contours: &[Vec<(f64, f64)>], lib: Value) -> String {
        let contours: Vec<Value> = contours
            .iter()
            .map(|contour| {
                contour
                    .iter()
                    .map(|(x, y)| json!({"x": x, "y": y, "type": "line"}))
                    .collect()
            })
            .collect();
        json!({
            "name": name,
            "width": width,
            "contours": contours,
            "lib": lib,
        })
        .to_string()
    }

    /// A component record with the identity transform moved by `(x, y)`.
    pub fn component_json(name: &str, coord: Value, x: f64, y: f64) -> Value {
        json!({
            "name": name,
            "coord": coord,
            "x": x,
            "y": y,
            "rotation": 0,
            "scalex": 1,
            "scaley": 1,
            "rcenterx": 0,
            "rcentery": 0,
        })
    }

    pub fn store(dir: MemoryDir) -> GlyphStore {
        GlyphStore::new(Rc::new(dir), Rc::new(JsonGlyphParser))
    }

    pub fn project(root: MemoryDir) -> Project {
        Project::new(Rc::new(root), Rc::new(JsonGlyphParser))
    }
}
