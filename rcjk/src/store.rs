//! A lazily loaded, memoizing store of glyph masters.

use std::{cell::RefCell, collections::HashMap, rc::Rc};

use indexmap::IndexMap;

use crate::{
    error::Error,
    filename::user_name_to_file_name,
    glyph::MasterGlyph,
    outline::Outline,
    parse::GlyphParser,
    source::SourceDir,
};

/// How deeply variation layers may nest below a tier's store.
///
/// Layer sources only provide geometry, so a glyph in a layer store that
/// declares variations of its own is rejected. This also stops layer names
/// that resolve back to the tier directory, such as `.`.
pub(crate) const MAX_LAYER_DEPTH: usize = 1;

/// The glyph sources of one tier (or one variation layer of a tier).
///
/// Glyphs are parsed on first lookup and cached for the lifetime of the
/// store; later changes to the underlying files are not observed. The store
/// is not thread safe.
pub struct GlyphStore {
    dir: Rc<dyn SourceDir>,
    parser: Rc<dyn GlyphParser>,
    layer_depth: usize,
    glyphs: RefCell<HashMap<String, Rc<MasterGlyph>>>,
    layers: RefCell<HashMap<String, Rc<GlyphStore>>>,
}

impl GlyphStore {
    /// Create a store reading sources from `dir` with `parser`.
    pub fn new(dir: Rc<dyn SourceDir>, parser: Rc<dyn GlyphParser>) -> Self {
        Self::with_layer_depth(dir, parser, 0)
    }

    fn with_layer_depth(
        dir: Rc<dyn SourceDir>,
        parser: Rc<dyn GlyphParser>,
        layer_depth: usize,
    ) -> Self {
        Self {
            dir,
            parser,
            layer_depth,
            glyphs: Default::default(),
            layers: Default::default(),
        }
    }

    /// The number of layer lookups between this store and its tier.
    pub fn layer_depth(&self) -> usize {
        self.layer_depth
    }

    /// The file name a glyph's source is stored under.
    pub fn file_name(&self, name: &str) -> String {
        user_name_to_file_name(name, self.parser.suffix())
    }

    /// Returns `true` if the store has a source for this glyph.
    ///
    /// This does not parse the source.
    pub fn has_glyph(&self, name: &str) -> bool {
        self.glyphs.borrow().contains_key(name) || self.dir.contains(&self.file_name(name))
    }

    /// The master for a glyph, parsing its source on first use.
    ///
    /// Repeated lookups return the same shared record.
    pub fn lookup(&self, name: &str) -> Result<Rc<MasterGlyph>, Error> {
        let cached = self.glyphs.borrow().get(name).cloned();
        if let Some(glyph) = cached {
            return Ok(glyph);
        }
        let file_name = self.file_name(name);
        if !self.dir.contains(&file_name) {
            return Err(Error::GlyphNotFound(name.to_owned()));
        }
        let data = self.dir.read(&file_name).map_err(|inner| Error::Io {
            file_name: file_name.clone(),
            inner,
        })?;
        let mut outline = Outline::new();
        let parsed = self
            .parser
            .parse(&data, &mut outline)
            .map_err(|inner| Error::Parse {
                file_name: file_name.clone(),
                inner,
            })?;
        if let Some(parsed_name) = parsed.name.as_deref().filter(|n| *n != name) {
            log::warn!("'{file_name}' was requested as '{name}' but is named '{parsed_name}'");
        }
        let glyph = Rc::new(MasterGlyph::assemble(parsed, outline, self)?);
        self.glyphs
            .borrow_mut()
            .insert(name.to_owned(), glyph.clone());
        Ok(glyph)
    }

    /// The store for a variation layer, created on first use.
    pub fn layer(&self, layer_name: &str) -> Rc<GlyphStore> {
        self.layers
            .borrow_mut()
            .entry(layer_name.to_owned())
            .or_insert_with(|| {
                Rc::new(GlyphStore::with_layer_depth(
                    self.dir.sub_dir(layer_name),
                    self.parser.clone(),
                    self.layer_depth + 1,
                ))
            })
            .clone()
    }

    /// Scan every source for its glyph name and code points.
    ///
    /// A source whose file name does not match the one computed from its
    /// glyph name is logged, but still included.
    pub fn glyph_names_and_unicodes(&self) -> Result<IndexMap<String, Vec<u32>>, Error> {
        let suffix = self.parser.suffix();
        let mut result = IndexMap::new();
        let file_names = self.dir.file_names().map_err(|inner| Error::Io {
            file_name: String::from("."),
            inner,
        })?;
        for file_name in file_names.iter().filter(|f| f.ends_with(suffix)) {
            let data = self.dir.read(file_name).map_err(|inner| Error::Io {
                file_name: file_name.clone(),
                inner,
            })?;
            let header = self
                .parser
                .read_header(&data)
                .map_err(|inner| Error::Parse {
                    file_name: file_name.clone(),
                    inner,
                })?;
            let Some(name) = header.name else {
                return Err(Error::malformed(
                    file_name.as_str(),
                    "glyph name not found",
                ));
            };
            let expected = self.file_name(&name);
            if &expected != file_name {
                log::warn!(
                    "actual file name does not match predicted file name: \
                     {expected} {file_name} {name}"
                );
            }
            result.insert(name, header.unicodes);
        }
        Ok(result)
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        source::MemoryDir,
        testing::{self, glyph_json, square},
    };

    fn store() -> GlyphStore {
        let mut dir = MemoryDir::new();
        dir.insert_file("a.json", glyph_json("a", 100.0, &[square(0.0, 0.0, 10.0)], json!({})));
        dir.insert_file("B_.json", glyph_json("B", 200.0, &[], json!({})));
        dir.insert_file("notes.txt", "not a glyph");
        dir.dir_mut("bold")
            .insert_file("a.json", glyph_json("a", 120.0, &[], json!({})));
        testing::store(dir)
    }

    #[test]
    fn lookup_is_memoized() {
        let store = store();
        let first = store.lookup("a").unwrap();
        let second = store.lookup("a").unwrap();
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.neutral().width, 100.0);
    }

    #[test]
    fn missing_glyph() {
        let store = store();
        assert!(!store.has_glyph("c"));
        assert!(matches!(store.lookup("c"), Err(Error::GlyphNotFound(name)) if name == "c"));
        // file names are case sensitive through the name encoding
        assert!(matches!(store.lookup("b"), Err(Error::GlyphNotFound(_))));
    }

    #[test]
    fn has_glyph_does_not_parse() {
        let mut dir = MemoryDir::new();
        dir.insert_file("broken.json", "{ this is not json");
        let store = testing::store(dir);
        assert!(store.has_glyph("broken"));
        assert!(matches!(store.lookup("broken"), Err(Error::Parse { .. })));
    }

    #[test]
    fn layers_are_cached() {
        let store = store();
        let bold = store.layer("bold");
        assert!(Rc::ptr_eq(&bold, &store.layer("bold")));
        assert_eq!(bold.lookup("a").unwrap().neutral().width, 120.0);
        assert!(!store.layer("light").has_glyph("a"));
    }

    #[test]
    fn names_and_unicodes() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut dir = MemoryDir::new();
        let mut a = json!({"name": "a", "unicodes": [97]});
        dir.insert_file("a.json", a.to_string());
        a["name"] = json!("A");
        a["unicodes"] = json!([65, 0xFF21]);
        // stored under a name that does not match; only a warning
        dir.insert_file("A.json", a.to_string());
        let store = testing::store(dir);
        let names = store.glyph_names_and_unicodes().unwrap();
        assert_eq!(names.len(), 2);
        assert_eq!(names["a"], vec![97]);
        assert_eq!(names["A"], vec![65, 0xFF21]);
    }

    #[test]
    fn unnamed_source_is_malformed() {
        let mut dir = MemoryDir::new();
        dir.insert_file("x.json", json!({"unicodes": [1]}).to_string());
        let store = testing::store(dir);
        assert!(matches!(
            store.glyph_names_and_unicodes(),
            Err(Error::MalformedSource { glyph, .. }) if glyph == "x.json"
        ));
        assert!(matches!(
            store.lookup("x"),
            Err(Error::MalformedSource { .. })
        ));
    }

    /// A directory whose every sub-directory is itself, as `.` is on disk.
    #[derive(Clone)]
    struct SelfReferentialDir(MemoryDir);

    impl SourceDir for SelfReferentialDir {
        fn contains(&self, file_name: &str) -> bool {
            self.0.contains(file_name)
        }

        fn read(&self, file_name: &str) -> std::io::Result<Vec<u8>> {
            self.0.read(file_name)
        }

        fn file_names(&self) -> std::io::Result<Vec<String>> {
            self.0.file_names()
        }

        fn sub_dir(&self, _name: &str) -> Rc<dyn SourceDir> {
            Rc::new(self.clone())
        }
    }

    fn variation_lib(layer_name: &str) -> serde_json::Value {
        json!({"robocjk.fontVariationGlyphs": {"wght": {
            "layerName": layer_name,
            "content": {"deepComponents": []},
        }}})
    }

    #[test]
    fn layer_resolving_to_itself_is_malformed() {
        let mut dir = MemoryDir::new();
        dir.insert_file(
            "ae.json",
            glyph_json("ae", 0.0, &[square(0.0, 0.0, 10.0)], variation_lib(".")),
        );
        let store = GlyphStore::new(
            Rc::new(SelfReferentialDir(dir)),
            Rc::new(crate::json::JsonGlyphParser),
        );
        assert!(matches!(
            store.lookup("ae"),
            Err(Error::MalformedSource { glyph, .. }) if glyph == "ae"
        ));
        assert_eq!(store.layer(".").layer_depth(), 1);
    }

    #[test]
    fn layer_source_with_variations_is_malformed() {
        let mut dir = MemoryDir::new();
        let outline = [square(0.0, 0.0, 10.0)];
        dir.insert_file("a.json", glyph_json("a", 100.0, &outline, variation_lib("bold")));
        dir.insert_file("b.json", glyph_json("b", 100.0, &outline, variation_lib("bold")));
        let bold = dir.dir_mut("bold");
        bold.insert_file("a.json", glyph_json("a", 120.0, &outline, variation_lib("bold")));
        // an empty declaration in a layer source is harmless
        let empty = json!({"robocjk.fontVariationGlyphs": {}});
        bold.insert_file("b.json", glyph_json("b", 120.0, &outline, empty));
        let store = testing::store(dir);
        assert!(matches!(
            store.lookup("a"),
            Err(Error::MalformedSource { glyph, .. }) if glyph == "a"
        ));
        let b = store.lookup("b").unwrap();
        assert!(!b.variations()[0].is_synthesized());
        assert_eq!(b.variations()[0].glyph().width, 120.0);
    }
}
