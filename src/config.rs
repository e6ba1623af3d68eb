use serde::{Deserialize, Serialize};
use std::path::Path;

/// Which marker set a diagram shows: finger positions (with barre) or
/// note names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Fingers,
    Notes,
}

/// Fret symbol representation on the rendered diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum FretNumbering {
    #[default]
    Roman,
    Numeric,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutlineWeight {
    #[default]
    None,
    Thin,
    Medium,
    Thick,
}

/// Output scaling presets. Element geometry is never rescaled; presets
/// only change the final canvas dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ScalePreset {
    #[default]
    Original,
    Small1,
    Small2,
    Medium1,
    Medium2,
}

impl ScalePreset {
    /// Scale factor for a canvas of the given width. `Small1` fits to
    /// 400px wide but never upscales.
    pub fn factor(self, canvas_width: f64) -> f64 {
        match self {
            ScalePreset::Original => 1.0,
            ScalePreset::Small1 => {
                if canvas_width <= 400.0 {
                    1.0
                } else {
                    400.0 / canvas_width
                }
            }
            ScalePreset::Small2 => 0.3,
            ScalePreset::Medium1 => 0.5,
            ScalePreset::Medium2 => 0.7,
        }
    }
}

/// Per-render display options, passed to the facade alongside the chord
/// row and display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    pub fret_numbering: FretNumbering,
    pub barre_outline: OutlineWeight,
    pub note_outline: OutlineWeight,
    pub scale: ScalePreset,
}

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct OptionsFile {
    fret_numbering: Option<FretNumbering>,
    barre_outline: Option<OutlineWeight>,
    note_outline: Option<OutlineWeight>,
    scale: Option<ScalePreset>,
}

/// Loads render options from an optional JSON file, merged over defaults.
pub fn load_options(path: Option<&Path>) -> anyhow::Result<RenderOptions> {
    let mut options = RenderOptions::default();
    let Some(path) = path else {
        return Ok(options);
    };

    let contents = std::fs::read_to_string(path)?;
    let parsed: OptionsFile = match serde_json::from_str(&contents) {
        Ok(parsed) => parsed,
        Err(json_err) => json5::from_str(&contents).map_err(|_| json_err)?,
    };

    if let Some(v) = parsed.fret_numbering {
        options.fret_numbering = v;
    }
    if let Some(v) = parsed.barre_outline {
        options.barre_outline = v;
    }
    if let Some(v) = parsed.note_outline {
        options.note_outline = v;
    }
    if let Some(v) = parsed.scale {
        options.scale = v;
    }
    Ok(options)
}
