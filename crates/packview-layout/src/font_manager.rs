//! Font lookup for labels: system families through fontdb, font files,
//! and a bundled face used when no system family resolves.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use rusttype::Font;
use std::{collections::HashSet, fs, path::PathBuf, sync::OnceLock};
use tracing::{debug, warn};

/// Where label glyphs come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A system family, resolved through fontdb
    System { family: String },
    /// A TrueType/OpenType file
    File(PathBuf),
}

impl Default for FontSource {
    fn default() -> Self {
        Self::System {
            family: "Helvetica".to_string(),
        }
    }
}

/// Installed families tried, in order, for the generic sans-serif face
const SANS_SERIF_FAMILIES: &[&str] = &[
    "Helvetica",
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "FreeSans",
];

static BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/fonts/tuffy/Tuffy.ttf");

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        // fontdb maps sans-serif to Arial, which many systems lack
        if let Some(family) = installed_sans_serif(&db) {
            debug!(%family, "sans-serif family");
            db.set_sans_serif_family(family);
        }
        debug!(faces = db.len(), "loaded system font database");
        db
    })
}

fn installed_sans_serif(db: &Database) -> Option<String> {
    let installed: HashSet<&str> = db
        .faces()
        .flat_map(|face| face.families.iter().map(|(name, _)| name.as_str()))
        .collect();
    SANS_SERIF_FAMILIES
        .iter()
        .find(|name| installed.contains(**name))
        .map(|name| name.to_string())
        .or_else(|| {
            let mut sans: Vec<&str> = installed
                .iter()
                .copied()
                .filter(|name| name.contains("Sans") && !name.contains("Mono"))
                .collect();
            sans.sort_unstable();
            sans.first().map(|name| name.to_string())
        })
}

/// The face shipped with PackView
pub fn bundled_font() -> Option<Font<'static>> {
    Font::try_from_bytes(BUNDLED_FONT)
}

pub fn list_font_families() -> Vec<String> {
    let mut set = HashSet::new();
    for face in db().faces() {
        for (name, _) in &face.families {
            set.insert(name.clone());
        }
    }
    let mut out: Vec<_> = set.into_iter().collect();
    out.sort();
    out
}

/// Load the font for `source`. Blocking: scans system fonts on first use.
///
/// A system family that cannot be resolved falls back to the bundled
/// face. An unreadable font file yields `None`.
pub fn load_font(source: &FontSource) -> Option<Font<'static>> {
    match source {
        FontSource::File(path) => {
            let bytes = match fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!(path = %path.display(), "cannot read font file: {}", e);
                    return None;
                }
            };
            Font::try_from_vec(bytes)
        }
        FontSource::System { family } => load_font_from_system(family).or_else(|| {
            warn!(%family, "no system font found; using the bundled face");
            bundled_font()
        }),
    }
}

fn load_font_from_system(family: &str) -> Option<Font<'static>> {
    // Named families fall back to the generic sans face
    let families: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };

    let query = Query {
        families: &families,
        weight: Weight::NORMAL,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    let face = db().face(id)?;

    match &face.source {
        fontdb::Source::File(path) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::SharedFile(path, _) => {
            let bytes = fs::read(path).ok()?;
            Font::try_from_vec_and_index(bytes, face.index)
        }
        fontdb::Source::Binary(bytes) => {
            Font::try_from_vec_and_index(bytes.as_ref().as_ref().to_vec(), face.index)
        }
    }
}
