//! A glyph source parser for UFO `.glif` files.
//!
//! This reads the sources of real RoboCJK projects. Parsing is done by
//! [norad]; the glyph lib is converted from a property list to the JSON
//! value model used for glyph metadata.
//!
//! [norad]: https://docs.rs/norad

use norad::{Glyph as GlifGlyph, PointType};
use serde_json::{Number, Value};

use crate::{
    parse::{GlyphHeader, GlyphParser, Lib, ParseError, ParsedGlyph},
    pen::{PointPen, SegmentType},
};

/// Reads UFO glyph sources with the `.glif` suffix.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlifGlyphParser;

fn load(data: &[u8]) -> Result<GlifGlyph, ParseError> {
    GlifGlyph::parse_raw(data).map_err(|e| ParseError::new(e.to_string()))
}

fn unicodes(glyph: &GlifGlyph) -> Vec<u32> {
    glyph.codepoints.iter().map(u32::from).collect()
}

fn segment_type(typ: &PointType) -> Option<SegmentType> {
    match typ {
        PointType::Move => Some(SegmentType::Move),
        PointType::Line => Some(SegmentType::Line),
        PointType::Curve => Some(SegmentType::Curve),
        PointType::QCurve => Some(SegmentType::QCurve),
        PointType::OffCurve => None,
    }
}

fn plist_to_json(value: &plist::Value) -> Value {
    match value {
        plist::Value::Array(items) => Value::Array(items.iter().map(plist_to_json).collect()),
        plist::Value::Dictionary(dict) => Value::Object(dict_to_json(dict)),
        plist::Value::Boolean(flag) => Value::Bool(*flag),
        plist::Value::Real(number) => Number::from_f64(*number).map_or(Value::Null, Value::Number),
        plist::Value::Integer(number) => match number.as_signed() {
            Some(number) => Value::from(number),
            None => number.as_unsigned().map_or(Value::Null, Value::from),
        },
        plist::Value::String(text) => Value::String(text.clone()),
        other => {
            log::debug!("unsupported lib value {other:?} read as null");
            Value::Null
        }
    }
}

fn dict_to_json(dict: &plist::Dictionary) -> Lib {
    dict.iter()
        .map(|(key, value)| (key.clone(), plist_to_json(value)))
        .collect()
}

impl GlyphParser for GlifGlyphParser {
    fn suffix(&self) -> &str {
        ".glif"
    }

    fn parse(&self, data: &[u8], pen: &mut dyn PointPen) -> Result<ParsedGlyph, ParseError> {
        let glyph = load(data)?;
        if !glyph.components.is_empty() {
            log::warn!(
                "glyph '{}' has {} UFO components, which are not drawn",
                glyph.name(),
                glyph.components.len()
            );
        }
        for contour in &glyph.contours {
            pen.begin_path();
            for point in &contour.points {
                pen.add_point(
                    (point.x, point.y).into(),
                    segment_type(&point.typ),
                    point.smooth,
                    point.name.as_ref().map(|name| name.as_str()),
                );
            }
            pen.end_path();
        }
        Ok(ParsedGlyph {
            name: Some(glyph.name().to_string()),
            width: glyph.width,
            unicodes: unicodes(&glyph),
            lib: dict_to_json(&glyph.lib),
        })
    }

    fn read_header(&self, data: &[u8]) -> Result<GlyphHeader, ParseError> {
        let glyph = load(data)?;
        Ok(GlyphHeader {
            name: Some(glyph.name().to_string()),
            unicodes: unicodes(&glyph),
        })
    }
}
