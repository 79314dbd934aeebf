//! A glyph source parser for JSON documents.
//!
//! A glyph is stored as
//!
//! ```json
//! {
//!     "name": "uni4E00",
//!     "unicodes": [19968],
//!     "width": 1000,
//!     "contours": [[{"x": 0, "y": 0, "type": "line"}, {"x": 10, "y": 0, "type": "line"}]],
//!     "lib": {"robocjk.deepComponents": []}
//! }
//! ```
//!
//! Points without a `type` are off-curve points.

use serde::Deserialize;

use crate::{
    parse::{GlyphHeader, GlyphParser, Lib, ParseError, ParsedGlyph},
    pen::{PointPen, SegmentType},
};

/// Reads JSON glyph sources with the `.json` suffix.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonGlyphParser;

#[derive(Deserialize)]
struct JsonGlyph {
    name: Option<String>,
    #[serde(default)]
    unicodes: Vec<u32>,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    contours: Vec<Vec<JsonPoint>>,
    #[serde(default)]
    lib: Lib,
}

#[derive(Deserialize)]
struct JsonPoint {
    x: f64,
    y: f64,
    #[serde(default, rename = "type")]
    segment_type: Option<String>,
    #[serde(default)]
    smooth: bool,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct JsonHeader {
    name: Option<String>,
    #[serde(default)]
    unicodes: Vec<u32>,
}

impl GlyphParser for JsonGlyphParser {
    fn suffix(&self) -> &str {
        ".json"
    }

    fn parse(&self, data: &[u8], pen: &mut dyn PointPen) -> Result<ParsedGlyph, ParseError> {
        let glyph: JsonGlyph =
            serde_json::from_slice(data).map_err(|e| ParseError::new(e.to_string()))?;
        // resolve every segment type before drawing anything
        let contours = glyph
            .contours
            .iter()
            .map(|contour| {
                contour
                    .iter()
                    .map(|point| {
                        let segment_type = match point.segment_type.as_deref() {
                            None | Some("offcurve") => None,
                            Some(name) => Some(SegmentType::from_name(name).ok_or_else(|| {
                                ParseError::new(format!("unknown point type '{name}'"))
                            })?),
                        };
                        Ok::<_, ParseError>((point, segment_type))
                    })
                    .collect::<Result<Vec<_>, ParseError>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        for contour in contours {
            pen.begin_path();
            for (point, segment_type) in contour {
                pen.add_point(
                    (point.x, point.y).into(),
                    segment_type,
                    point.smooth,
                    point.name.as_deref(),
                );
            }
            pen.end_path();
        }
        Ok(ParsedGlyph {
            name: glyph.name,
            width: glyph.width,
            unicodes: glyph.unicodes,
            lib: glyph.lib,
        })
    }

    fn read_header(&self, data: &[u8]) -> Result<GlyphHeader, ParseError> {
        let header: JsonHeader =
            serde_json::from_slice(data).map_err(|e| ParseError::new(e.to_string()))?;
        Ok(GlyphHeader {
            name: header.name,
            unicodes: header.unicodes,
        })
    }
}
