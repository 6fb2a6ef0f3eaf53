//! TrueType font discovery.
//!
//! genpdf measures and embeds real font files, so a report needs one sans
//! family with at least a regular and a bold face on disk. Missing italic
//! faces fall back to the upright ones.

use std::fmt;
use std::path::{Path, PathBuf};

use genpdf::fonts::{FontData, FontFamily};
use tracing::info;

use crate::error::ExportError;

struct FamilyFiles {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const FAMILIES: &[FamilyFiles] = &[
    FamilyFiles {
        name: "Liberation Sans",
        regular: "LiberationSans-Regular.ttf",
        bold: "LiberationSans-Bold.ttf",
        italic: "LiberationSans-Italic.ttf",
        bold_italic: "LiberationSans-BoldItalic.ttf",
    },
    FamilyFiles {
        name: "DejaVu Sans",
        regular: "DejaVuSans.ttf",
        bold: "DejaVuSans-Bold.ttf",
        italic: "DejaVuSans-Oblique.ttf",
        bold_italic: "DejaVuSans-BoldOblique.ttf",
    },
    FamilyFiles {
        name: "Arial",
        regular: "Arial.ttf",
        bold: "Arial Bold.ttf",
        italic: "Arial Italic.ttf",
        bold_italic: "Arial Bold Italic.ttf",
    },
];

/// Directories searched after the configured one.
pub const SYSTEM_FONT_DIRS: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
    "/Library/Fonts",
    "/System/Library/Fonts/Supplemental",
];

/// A loaded font family ready to hand to a genpdf document.
#[derive(Clone)]
pub struct ReportFonts {
    name: &'static str,
    dir: PathBuf,
    family: FontFamily<FontData>,
}

impl ReportFonts {
    /// Load the first known family found in `preferred_dir`, then in
    /// [`SYSTEM_FONT_DIRS`].
    pub fn discover(preferred_dir: Option<&Path>) -> Result<Self, ExportError> {
        let dirs: Vec<PathBuf> = preferred_dir
            .map(Path::to_path_buf)
            .into_iter()
            .chain(SYSTEM_FONT_DIRS.iter().map(PathBuf::from))
            .collect();
        Self::discover_in(&dirs)
    }

    /// Load the first known family found in `dirs`, in order.
    pub fn discover_in(dirs: &[PathBuf]) -> Result<Self, ExportError> {
        for dir in dirs {
            for files in FAMILIES {
                if dir.join(files.regular).is_file() && dir.join(files.bold).is_file() {
                    return Self::load(dir, files);
                }
            }
        }

        let searched = dirs
            .iter()
            .map(|d| d.display().to_string())
            .collect::<Vec<_>>()
            .join(", ");
        Err(ExportError::FontsNotFound { searched })
    }

    fn load(dir: &Path, files: &FamilyFiles) -> Result<Self, ExportError> {
        let regular = load_face(&dir.join(files.regular))?;
        let bold = load_face(&dir.join(files.bold))?;
        let italic = load_optional_face(&dir.join(files.italic))?.unwrap_or_else(|| regular.clone());
        let bold_italic = load_optional_face(&dir.join(files.bold_italic))?.unwrap_or_else(|| bold.clone());

        info!(family = files.name, dir = %dir.display(), "report fonts loaded");

        Ok(Self {
            name: files.name,
            dir: dir.to_path_buf(),
            family: FontFamily {
                regular,
                bold,
                italic,
                bold_italic,
            },
        })
    }

    pub fn name(&self) -> &str {
        self.name
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn family(&self) -> FontFamily<FontData> {
        self.family.clone()
    }
}

impl fmt::Debug for ReportFonts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportFonts")
            .field("name", &self.name)
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

fn load_face(path: &Path) -> Result<FontData, ExportError> {
    let bytes = std::fs::read(path).map_err(|source| ExportError::FontRead {
        path: path.to_path_buf(),
        source,
    })?;
    FontData::new(bytes, None).map_err(|e| ExportError::InvalidFont {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn load_optional_face(path: &Path) -> Result<Option<FontData>, ExportError> {
    if path.is_file() {
        load_face(path).map(Some)
    } else {
        Ok(None)
    }
}
