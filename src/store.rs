use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Axis-aligned rectangle in template-image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_rect_width")]
    pub width: f64,
    #[serde(default = "default_rect_height")]
    pub height: f64,
}

fn default_rect_width() -> f64 {
    100.0
}

fn default_rect_height() -> f64 {
    100.0
}

/// Flat property bag for one template element. Stored descriptors carry
/// only the template-authored fields; `outline_width`/`outline_color` are
/// attached by the compositor to derived copies and are never present on
/// descriptors held by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementDescriptor {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finger: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<[u8; 3]>,
}

impl ElementDescriptor {
    /// A barre descriptor is only drawable with full geometry.
    pub fn has_barre_geometry(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.width.is_some() && self.height.is_some()
    }
}

/// Pixel dimensions (and optional source path) of the shared background
/// image. The core never decodes image bytes; this is all it knows.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateImage {
    pub width: u32,
    pub height: u32,
    pub source: Option<PathBuf>,
}

impl TemplateImage {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            source: None,
        }
    }

    pub fn with_source(width: u32, height: u32, source: impl Into<PathBuf>) -> Self {
        Self {
            width,
            height,
            source: Some(source.into()),
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// The four named template sections, loaded once and read-only afterwards.
/// Lookups return `None` for unknown keys; no section is required to be
/// present in the source file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TemplateStore {
    pub crop_rects: BTreeMap<String, Rect>,
    pub frets: BTreeMap<String, ElementDescriptor>,
    pub barres: BTreeMap<String, ElementDescriptor>,
    pub notes: BTreeMap<String, ElementDescriptor>,
    pub open_notes: BTreeMap<String, ElementDescriptor>,
}

/// How many descriptors a restyle pass touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestyleCounts {
    pub notes: usize,
    pub barres: usize,
}

impl TemplateStore {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut store = Self::from_json_str(&contents).map_err(|message| LoadError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        store.drop_degenerate_crop_rects();
        Ok(store)
    }

    /// Strict JSON first, json5 as a fallback for hand-edited templates
    /// with trailing commas or comments.
    pub fn from_json_str(contents: &str) -> Result<Self, String> {
        match serde_json::from_str::<TemplateStore>(contents) {
            Ok(store) => Ok(store),
            Err(json_err) => json5::from_str::<TemplateStore>(contents)
                .map_err(|_| json_err.to_string()),
        }
    }

    /// Crop rects must have positive extent; anything else resolves as
    /// "no rectangle" rather than a zero rect.
    fn drop_degenerate_crop_rects(&mut self) {
        self.crop_rects
            .retain(|_, rect| rect.width > 0.0 && rect.height > 0.0);
    }

    pub fn crop_rect(&self, name: &str) -> Option<&Rect> {
        self.crop_rects.get(name.trim())
    }

    pub fn fret(&self, key: &str) -> Option<&ElementDescriptor> {
        self.frets.get(key)
    }

    pub fn barre(&self, key: &str) -> Option<&ElementDescriptor> {
        self.barres.get(key)
    }

    pub fn note(&self, key: &str) -> Option<&ElementDescriptor> {
        self.notes.get(key)
    }

    pub fn open_note(&self, key: &str) -> Option<&ElementDescriptor> {
        self.open_notes.get(key)
    }

    /// Applies a `note_name -> style` mapping to the `notes` section and an
    /// optional uniform style to every barre descriptor, returning how many
    /// descriptors changed. Mirrors the color-table refresh of the source
    /// configuration tool.
    pub fn restyle(
        &mut self,
        note_styles: &BTreeMap<String, String>,
        barre_style: Option<&str>,
    ) -> RestyleCounts {
        let mut counts = RestyleCounts::default();
        for descriptor in self.notes.values_mut() {
            let Some(note_name) = descriptor.note_name.as_deref() else {
                continue;
            };
            if let Some(style) = note_styles.get(note_name) {
                descriptor.style = Some(style.clone());
                counts.notes += 1;
            }
        }
        if let Some(style) = barre_style {
            for descriptor in self.barres.values_mut() {
                descriptor.style = Some(style.to_string());
                counts.barres += 1;
            }
        }
        counts
    }
}
