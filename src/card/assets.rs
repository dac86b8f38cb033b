//! Fonts and images loaded once at startup.

use super::text::TextMeasurer;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use resvg::usvg::{self, fontdb::{Database, Family, FaceInfo, Query}};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};

/// Icons drawn next to the profile and statistics details. Loaded from `icons/{name}.svg`.
#[derive(Display, EnumIter, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case")]
pub enum Icon {
    Location,
    LastSeen,
    Joined,
    Stats,
}

/// Static assets used by every card.
#[derive(Clone)]
pub struct Assets {
    fontdb: Arc<Database>,
    font_family: Option<String>,
    measurer: TextMeasurer,
    icons: HashMap<Icon, String>,
    watermark: Option<String>,
}

impl std::fmt::Debug for Assets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Assets")
            .field("font_faces", &self.fontdb.len())
            .field("font_family", &self.font_family)
            .field("icons", &self.icons.keys().collect::<Vec<_>>())
            .field("watermark", &self.watermark.is_some())
            .finish()
    }
}

impl Default for Assets {
    /// System fonts only, no images.
    fn default() -> Self {
        let mut fontdb = Database::new();

        fontdb.load_system_fonts();
        Self::from_parts(fontdb, None, HashMap::new(), None)
    }
}

impl Assets {
    /// Loads `fonts/`, `icons/` and `watermark.svg` from `dir`. Anything missing or unreadable
    /// is logged and left out.
    pub fn load(dir: &Path) -> Self {
        let mut fontdb = Database::new();
        let fonts_dir = dir.join("fonts");

        fontdb.load_fonts_dir(&fonts_dir);

        // The first face loaded from the fonts directory names the card's font family.
        let font_family = fontdb
            .faces()
            .next()
            .and_then(|face| face.families.first())
            .map(|(family, _language)| family.clone());

        match &font_family {
            Some(family) => log::info!("Loaded {} font faces, using {family}", fontdb.len()),
            None => log::warn!("No fonts found in {}; using system fonts", fonts_dir.display()),
        }

        fontdb.load_system_fonts();

        let icons = Icon::iter()
            .filter_map(|icon| {
                let path = dir.join("icons").join(format!("{icon}.svg"));

                load_svg_data_uri(&path).map(|uri| (icon, uri))
            })
            .collect();
        let watermark = load_svg_data_uri(&dir.join("watermark.svg"));

        Self::from_parts(fontdb, font_family, icons, watermark)
    }

    fn from_parts(
        mut fontdb: Database,
        font_family: Option<String>,
        icons: HashMap<Icon, String>,
        watermark: Option<String>,
    ) -> Self {
        let font_family = font_family.or_else(|| fallback_family(&fontdb));

        // Generic `sans-serif` must resolve to the same face the measurer reads.
        match &font_family {
            Some(family) => fontdb.set_sans_serif_family(family.as_str()),
            None => log::warn!("No fonts available; card text will not be drawn"),
        }

        let measurer = TextMeasurer::from_database(&fontdb, font_family.as_deref());

        Self {
            fontdb: Arc::new(fontdb),
            font_family,
            measurer,
            icons,
            watermark,
        }
    }

    pub fn fontdb(&self) -> Arc<Database> {
        Arc::clone(&self.fontdb)
    }

    /// Value for SVG `font-family` attributes.
    pub fn font_family(&self) -> String {
        match &self.font_family {
            Some(family) => format!("'{family}', sans-serif"),
            None => "sans-serif".into(),
        }
    }

    pub fn measurer(&self) -> &TextMeasurer {
        &self.measurer
    }

    /// Data URI of the icon, if it was loaded.
    pub fn icon(&self, icon: Icon) -> Option<&str> {
        self.icons.get(&icon).map(String::as_str)
    }

    /// Data URI of the watermark, if it was loaded.
    pub fn watermark(&self) -> Option<&str> {
        self.watermark.as_deref()
    }
}

/// A system family to draw with when none was bundled: whatever `sans-serif` already names if it
/// is installed, else the first sans face, else any face.
fn fallback_family(fontdb: &Database) -> Option<String> {
    let query = Query {
        families: &[Family::SansSerif],
        ..Query::default()
    };
    let first_family = |face: &FaceInfo| face.families.first().map(|(family, _language)| family.clone());

    fontdb
        .query(&query)
        .and_then(|id| fontdb.face(id))
        .or_else(|| {
            fontdb.faces().find(|face| {
                face.families.iter().any(|(family, _language)| family.contains("Sans"))
            })
        })
        .or_else(|| fontdb.faces().next())
        .and_then(first_family)
}

/// Reads an SVG file, checks that it parses and encodes it as a data URI.
fn load_svg_data_uri(path: &Path) -> Option<String> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(error) => {
            log::warn!("Error reading {}: {error}", path.display());
            return None;
        },
    };

    if let Err(error) = usvg::Tree::from_data(&data, &usvg::Options::default()) {
        log::warn!("Error parsing {}: {error}", path.display());
        return None;
    }

    Some(svg_data_uri(&data))
}

fn svg_data_uri(data: &[u8]) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn assets_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets")
    }

    #[test]
    fn icon_file_names() {
        let names = Icon::iter()
            .map(|icon| icon.to_string())
            .collect::<Vec<_>>();

        assert_eq!(names, vec!["location", "last_seen", "joined", "stats"]);
    }

    #[test]
    fn loads_bundled_images() {
        let assets = Assets::load(&assets_dir());

        for icon in Icon::iter() {
            let uri = assets.icon(icon).unwrap();

            assert!(uri.starts_with("data:image/svg+xml;base64,"));
        }

        assert!(assets.watermark().is_some());
    }

    #[test]
    fn missing_directory_skips_images() {
        let assets = Assets::load(Path::new("/nonexistent/steam-stat-card"));

        assert!(assets.icon(Icon::Stats).is_none());
        assert!(assets.watermark().is_none());
        // Falls back to an installed family whenever the host has any fonts at all.
        assert_eq!(assets.font_family() != "sans-serif", assets.measurer().has_fonts());
    }

    #[test]
    fn bundled_fonts_name_the_family() {
        let assets = Assets::load(&assets_dir());

        assert_eq!(assets.font_family(), "'DejaVu Sans', sans-serif");
        assert!(assets.measurer().has_fonts());
        assert_eq!(assets.fontdb().family_name(&Family::SansSerif), "DejaVu Sans");
    }
}
