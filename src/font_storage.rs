use std::{collections::HashMap, path::Path, sync::Arc};

use parking_lot::RwLock;

use crate::error::{CardError, Result};

/// Font families a card can be rendered with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FontChoice {
    /// The pixel-style "Andy" face used by the game itself.
    #[default]
    Andy,
    /// GNU FreeSans.
    Sans,
}

impl FontChoice {
    /// Parses the `font` query value. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Andy" => Some(FontChoice::Andy),
            "Sans" => Some(FontChoice::Sans),
            _ => None,
        }
    }

    /// Family name as stored in the font file.
    pub fn family(self) -> &'static str {
        match self {
            FontChoice::Andy => "Andy",
            FontChoice::Sans => "FreeSans",
        }
    }
}

/// A parsed face together with its database ID.
#[derive(Clone)]
pub struct LoadedFont {
    pub id: fontdb::ID,
    pub font: Arc<fontdue::Font>,
}

/// Font database plus a cache of faces parsed by `fontdue`.
///
/// Fonts are registered once at startup; after that the storage is shared
/// behind an `Arc` and only read. Faces are parsed the first time a render
/// asks for them and stay cached for the rest of the process.
pub struct FontStorage {
    /// This is the font set that has been loaded by fontdb.
    font_db: fontdb::Database,
    /// Faces parsed by fontdue so far. Entries are never replaced.
    loaded_font: RwLock<HashMap<fontdb::ID, Arc<fontdue::Font>, fxhash::FxBuildHasher>>,
}

impl Default for FontStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl FontStorage {
    /// Creates a new empty font storage.
    pub fn new() -> Self {
        Self {
            font_db: fontdb::Database::new(),
            loaded_font: RwLock::new(HashMap::with_hasher(fxhash::FxBuildHasher::default())),
        }
    }
}

/// Registering fonts.
impl FontStorage {
    /// Loads a font from binary data.
    pub fn load_font_binary(&mut self, data: impl Into<Vec<u8>>) {
        self.font_db.load_font_data(data.into());
    }

    /// Loads a font from a file path.
    pub fn load_font_file(&mut self, path: &Path) -> Result<()> {
        self.font_db
            .load_font_file(path)
            .map_err(|e| CardError::FontLoadFailed(format!("{}: {e}", path.display())))
    }

    /// Loads all fonts from a directory.
    pub fn load_fonts_dir(&mut self, dir: &Path) {
        let before = self.font_db.len();
        self.font_db.load_fonts_dir(dir);
        log::info!(
            "Loaded {} font faces from {}",
            self.font_db.len() - before,
            dir.display()
        );
    }

    /// Loads the system fonts.
    pub fn load_system_fonts(&mut self) {
        self.font_db.load_system_fonts();
    }

    /// Checks if the storage is empty.
    pub fn is_empty(&self) -> bool {
        self.font_db.is_empty()
    }

    /// Returns the number of registered faces.
    pub fn len(&self) -> usize {
        self.font_db.len()
    }
}

/// Get `Font`
impl FontStorage {
    /// Resolves the face for `choice`.
    ///
    /// Falls back to the generic sans-serif family, then to the first
    /// registered face that parses and has Latin letters.
    pub fn face_for(&self, choice: FontChoice) -> Result<LoadedFont> {
        let families = [fontdb::Family::Name(choice.family()), fontdb::Family::SansSerif];
        let query = fontdb::Query {
            families: &families,
            ..fontdb::Query::default()
        };

        if let Some(face) = self.query(&query) {
            return Ok(face);
        }

        let fallback = self.faces().find_map(|info| {
            let font = self.font(info.id)?;
            // skip symbol and icon faces
            (font.lookup_glyph_index('A') != 0).then(|| {
                log::warn!(
                    "No {} face loaded, drawing with {}.",
                    choice.family(),
                    info.families.first().map_or("an unnamed face", |(name, _)| name.as_str())
                );
                LoadedFont { id: info.id, font }
            })
        });

        fallback.ok_or_else(|| {
            CardError::FontLoadFailed(format!("no usable face for family {}", choice.family()))
        })
    }

    /// Queries for a font matching the description.
    pub fn query(&self, query: &fontdb::Query) -> Option<LoadedFont> {
        let id = self.font_db.query(query)?;
        self.font(id).map(|font| LoadedFont { id, font })
    }

    /// Retrieves a parsed font by ID, parsing it if necessary.
    pub fn font(&self, id: fontdb::ID) -> Option<Arc<fontdue::Font>> {
        if let Some(font) = self.loaded_font.read().get(&id) {
            return Some(Arc::clone(font));
        }

        let font_result = self.font_db.with_face_data(id, |data, index| {
            fontdue::Font::from_bytes(
                data,
                fontdue::FontSettings {
                    collection_index: index,
                    scale: 40.0,
                    load_substitutions: true,
                },
            )
        })?;

        match font_result {
            Ok(font) => {
                // another render may have parsed the same face meanwhile; keep the first
                let mut loaded = self.loaded_font.write();
                let entry = loaded.entry(id).or_insert_with(|| Arc::new(font));
                Some(Arc::clone(entry))
            }
            Err(e) => {
                log::error!("Failed to load font (id: {:?}): {}", id, e);
                None
            }
        }
    }

    /// Returns an iterator over all available faces.
    pub fn faces(&self) -> impl Iterator<Item = &fontdb::FaceInfo> {
        self.font_db.faces()
    }
}


#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_names_map_to_choices() {
        assert_eq!(FontChoice::from_name("Andy"), Some(FontChoice::Andy));
        assert_eq!(FontChoice::from_name("Sans"), Some(FontChoice::Sans));
        assert_eq!(FontChoice::from_name("Comic"), None);
        assert_eq!(FontChoice::from_name(""), None);
        assert_eq!(FontChoice::default().family(), "Andy");
    }

    #[test]
    fn empty_storage_reports_font_load_failure() {
        let storage = FontStorage::new();
        assert!(storage.is_empty());
        let err = storage.face_for(FontChoice::Sans).err();
        assert!(matches!(err, Some(CardError::FontLoadFailed(_))));
    }

    #[test]
    fn garbage_font_data_is_not_parsed() {
        let mut storage = FontStorage::new();
        storage.load_font_binary(vec![0u8; 64]);
        assert!(storage.face_for(FontChoice::Andy).is_err());
    }

    #[test]
    fn missing_font_file_is_reported() {
        let mut storage = FontStorage::new();
        let err = storage
            .load_font_file(Path::new("/nonexistent/Andy Bold.ttf"))
            .err();
        assert!(matches!(err, Some(CardError::FontLoadFailed(_))));
    }

    #[test]
    fn any_loaded_face_stands_in_for_missing_families() {
        let Some(mut storage) = testing::system_fonts() else {
            return;
        };
        // no generic sans-serif match either, only the last resort is left
        storage.font_db.set_sans_serif_family("No Such Family 1a2b");

        let andy = storage.face_for(FontChoice::Andy).unwrap();
        let sans = storage.face_for(FontChoice::Sans).unwrap();
        assert!(storage.faces().any(|face| face.id == andy.id));
        assert!(storage.faces().any(|face| face.id == sans.id));
    }
}
