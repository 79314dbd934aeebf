//! Glyph masters and their instances.

use std::cell::OnceCell;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    blend::{BinaryOp, Blend},
    component::{Component, ComponentRecord},
    coords::{AxisRange, AxisTable, Location},
    error::{BlendError, Error},
    model::VariationModel,
    outline::Outline,
    parse::{ParsedGlyph, DEEP_COMPONENTS_KEY, VARIATION_KEYS},
    store::{GlyphStore, MAX_LAYER_DEPTH},
};

/// A glyph at a single location: width, outline and components.
///
/// This is both the value type of each master and the result of
/// instantiating a [`MasterGlyph`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Glyph {
    pub name: String,
    /// The advance width.
    pub width: f64,
    pub outline: Outline,
    /// References to glyphs of the next tier down.
    pub components: Vec<Component>,
}

impl Blend for Glyph {
    fn combine(&self, other: &Self, op: BinaryOp) -> Result<Self, BlendError> {
        if self.components.len() != other.components.len() {
            return Err(BlendError::ComponentCountMismatch {
                expected: self.components.len(),
                actual: other.components.len(),
            });
        }
        Ok(Glyph {
            name: self.name.clone(),
            width: op.apply(self.width, other.width),
            outline: self.outline.combine(&other.outline, op)?,
            components: self
                .components
                .iter()
                .zip(&other.components)
                .map(|(a, b)| a.combine(b, op))
                .collect::<Result<_, _>>()?,
        })
    }

    fn scale(&self, scalar: f64) -> Self {
        Glyph {
            name: self.name.clone(),
            width: self.width * scalar,
            outline: self.outline.scale(scalar),
            components: self.components.iter().map(|c| c.scale(scalar)).collect(),
        }
    }
}

/// A master on one axis' extreme.
#[derive(Clone, Debug)]
pub struct Variation {
    axis: String,
    layer_name: String,
    synthesized: bool,
    glyph: Glyph,
}

impl Variation {
    /// The axis this master sits on, at normalized value 1.
    pub fn axis(&self) -> &str {
        &self.axis
    }

    /// The layer the sibling source is looked up in.
    pub fn layer_name(&self) -> &str {
        &self.layer_name
    }

    /// `true` if the layer had no source and the neutral geometry was reused.
    pub fn is_synthesized(&self) -> bool {
        self.synthesized
    }

    /// The master's width, outline and components.
    pub fn glyph(&self) -> &Glyph {
        &self.glyph
    }
}

/// A parsed glyph with its variation masters.
///
/// Master glyphs are created by [`GlyphStore::lookup`] and live as long as
/// the store. The interpolation deltas are computed on first use.
#[derive(Debug)]
pub struct MasterGlyph {
    neutral: Glyph,
    unicodes: Vec<u32>,
    axes: AxisTable,
    variations: Vec<Variation>,
    model: Option<VariationModel>,
    deltas: OnceCell<Vec<Glyph>>,
}

#[derive(Deserialize)]
struct VariationRecord {
    #[serde(rename = "layerName")]
    layer_name: String,
    #[serde(rename = "minValue", default)]
    min_value: Option<f64>,
    #[serde(rename = "maxValue", default)]
    max_value: Option<f64>,
    content: VariationContent,
}

#[derive(Deserialize)]
struct VariationContent {
    #[serde(rename = "deepComponents")]
    deep_components: Vec<ComponentRecord>,
}

fn decode_components(glyph: &str, value: Option<&Value>) -> Result<Vec<Component>, Error> {
    let Some(value) = value else {
        return Ok(Vec::new());
    };
    Vec::<ComponentRecord>::deserialize(value)
        .map(|records| records.into_iter().map(Component::from).collect())
        .map_err(|e| Error::malformed(glyph, format!("invalid component list: {e}")))
}

fn decode_variations(
    glyph: &str,
    parsed: &ParsedGlyph,
) -> Result<Option<IndexMap<String, VariationRecord>>, Error> {
    let Some(value) = VARIATION_KEYS.iter().find_map(|key| parsed.lib.get(*key)) else {
        return Ok(None);
    };
    IndexMap::<String, VariationRecord>::deserialize(value)
        .map(Some)
        .map_err(|e| Error::malformed(glyph, format!("invalid variation declarations: {e}")))
}

impl MasterGlyph {
    /// A glyph without variations.
    pub fn new(neutral: Glyph) -> Self {
        Self {
            neutral,
            unicodes: Vec::new(),
            axes: AxisTable::new(),
            variations: Vec::new(),
            model: None,
            deltas: OnceCell::new(),
        }
    }

    /// Assemble a master from parser output.
    ///
    /// Sibling sources for each declared axis are looked up in the layers
    /// of `store`.
    pub(crate) fn assemble(
        parsed: ParsedGlyph,
        outline: Outline,
        store: &GlyphStore,
    ) -> Result<Self, Error> {
        let name = parsed
            .name
            .clone()
            .ok_or_else(|| Error::malformed("<unnamed>", "source has no glyph name"))?;
        let components = decode_components(&name, parsed.lib.get(DEEP_COMPONENTS_KEY))?;
        let variations = decode_variations(&name, &parsed)?;
        let neutral = Glyph {
            name: name.clone(),
            width: parsed.width,
            outline,
            components,
        };
        let mut master = MasterGlyph::new(neutral);
        master.unicodes = parsed.unicodes;
        let Some(variations) = variations else {
            return Ok(master);
        };
        if store.layer_depth() >= MAX_LAYER_DEPTH && !variations.is_empty() {
            return Err(Error::malformed(
                &name,
                format!(
                    "variation layer source declares variations of its own ({} levels deep)",
                    store.layer_depth()
                ),
            ));
        }

        for (axis, record) in variations {
            let min = record.min_value.unwrap_or(0.0);
            let max = record.max_value.unwrap_or(1.0);
            let range = AxisRange::new(min, max).ok_or_else(|| {
                Error::malformed(&name, format!("axis '{axis}' has range {min}..{max}"))
            })?;
            let variation = master.load_variation(store, axis.clone(), record)?;
            master.axes.insert(axis, range);
            master.variations.push(variation);
        }

        let locations = std::iter::once(Location::new())
            .chain(
                master
                    .variations
                    .iter()
                    .map(|v| [(v.axis.as_str(), 1.0)].into_iter().collect()),
            )
            .collect::<Vec<_>>();
        let model = VariationModel::new(&locations)
            .map_err(|e| Error::malformed(&name, e.to_string()))?;
        master.model = Some(model);
        Ok(master)
    }

    fn load_variation(
        &self,
        store: &GlyphStore,
        axis: String,
        record: VariationRecord,
    ) -> Result<Variation, Error> {
        let name = &self.neutral.name;
        let (width, outline, synthesized) = if self.neutral.outline.is_empty() {
            (0.0, Outline::new(), true)
        } else {
            let layer = store.layer(&record.layer_name);
            if layer.has_glyph(name) {
                let sibling = layer.lookup(name)?;
                (sibling.neutral.width, sibling.neutral.outline.clone(), false)
            } else {
                log::debug!(
                    "no '{}' source for '{name}', reusing the neutral outline",
                    record.layer_name
                );
                (self.neutral.width, self.neutral.outline.clone(), true)
            }
        };
        let components: Vec<Component> = record
            .content
            .deep_components
            .into_iter()
            .map(Component::from)
            .collect();
        if components.len() != self.neutral.components.len() {
            return Err(Error::malformed(
                name,
                format!(
                    "axis '{axis}' has {} components but the neutral master has {}",
                    components.len(),
                    self.neutral.components.len()
                ),
            ));
        }
        Ok(Variation {
            axis,
            layer_name: record.layer_name,
            synthesized,
            glyph: Glyph {
                name: name.clone(),
                width,
                outline,
                components,
            },
        })
    }

    pub fn name(&self) -> &str {
        &self.neutral.name
    }

    /// The code points mapped to this glyph.
    pub fn unicodes(&self) -> &[u32] {
        &self.unicodes
    }

    /// The master at the default location.
    pub fn neutral(&self) -> &Glyph {
        &self.neutral
    }

    /// The raw value range of every declared axis.
    pub fn axes(&self) -> &AxisTable {
        &self.axes
    }

    /// The axis masters, in declaration order.
    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Returns `true` once the interpolation deltas have been computed.
    pub fn has_cached_deltas(&self) -> bool {
        self.deltas.get().is_some()
    }

    fn deltas(&self, model: &VariationModel) -> Result<&[Glyph], BlendError> {
        if let Some(deltas) = self.deltas.get() {
            return Ok(deltas);
        }
        let masters: Vec<Glyph> = std::iter::once(&self.neutral)
            .chain(self.variations.iter().map(|v| &v.glyph))
            .cloned()
            .collect();
        let deltas = model.compute_deltas(&masters)?;
        log::trace!("computed {} deltas for '{}'", deltas.len(), self.name());
        Ok(self.deltas.get_or_init(|| deltas))
    }

    /// Instantiate this glyph at a location in raw axis units.
    ///
    /// Each value is normalized against this glyph's axis range and clamped to
    /// `[0, 1]`. A glyph without variations is returned unchanged.
    pub fn instantiate(&self, location: &Location) -> Result<Glyph, BlendError> {
        let Some(model) = &self.model else {
            return Ok(self.neutral.clone());
        };
        let deltas = self.deltas(model)?;
        let location = location.normalized(&self.axes);
        model.interpolate_from_deltas(&location, deltas)
    }
}
