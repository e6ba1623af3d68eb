use crate::store::LoadError;
use crate::value::{self, RawValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// One chord variant, with fields named after the source spreadsheet
/// columns. Every field is optional; interpretation of the raw values is
/// the value normalizer's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChordRow {
    #[serde(rename = "CHORD", skip_serializing_if = "Option::is_none")]
    pub chord: Option<RawValue>,
    #[serde(rename = "VARIANT", skip_serializing_if = "Option::is_none")]
    pub variant: Option<RawValue>,
    #[serde(rename = "CAPTION", skip_serializing_if = "Option::is_none")]
    pub caption: Option<RawValue>,
    #[serde(rename = "TYPE", skip_serializing_if = "Option::is_none")]
    pub chord_type: Option<RawValue>,
    #[serde(rename = "RAM", skip_serializing_if = "Option::is_none")]
    pub ram: Option<RawValue>,
    #[serde(rename = "BAR", skip_serializing_if = "Option::is_none")]
    pub bar: Option<RawValue>,
    #[serde(rename = "FNL", skip_serializing_if = "Option::is_none")]
    pub fnl: Option<RawValue>,
    #[serde(rename = "FN", skip_serializing_if = "Option::is_none")]
    pub fn_: Option<RawValue>,
    #[serde(rename = "FPOL", skip_serializing_if = "Option::is_none")]
    pub fpol: Option<RawValue>,
    #[serde(rename = "FPXL", skip_serializing_if = "Option::is_none")]
    pub fpxl: Option<RawValue>,
    #[serde(rename = "FP1", skip_serializing_if = "Option::is_none")]
    pub fp1: Option<RawValue>,
    #[serde(rename = "FP2", skip_serializing_if = "Option::is_none")]
    pub fp2: Option<RawValue>,
    #[serde(rename = "FP3", skip_serializing_if = "Option::is_none")]
    pub fp3: Option<RawValue>,
    #[serde(rename = "FP4", skip_serializing_if = "Option::is_none")]
    pub fp4: Option<RawValue>,
}

/// RAM side table: maps a frame-region name to its comma-separated list
/// of lad-position keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RamEntry {
    #[serde(rename = "RAM", skip_serializing_if = "Option::is_none")]
    pub ram: Option<RawValue>,
    #[serde(rename = "LAD", skip_serializing_if = "Option::is_none")]
    pub lad: Option<RawValue>,
}

/// NOTE cross-reference row: for each recognized source column, the raw
/// value it matches and the template element key it maps to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteRow {
    #[serde(rename = "FNL", skip_serializing_if = "Option::is_none")]
    pub fnl: Option<RawValue>,
    #[serde(rename = "FNL_ELEM", skip_serializing_if = "Option::is_none")]
    pub fnl_elem: Option<RawValue>,
    #[serde(rename = "FN", skip_serializing_if = "Option::is_none")]
    pub fn_: Option<RawValue>,
    #[serde(rename = "FN_ELEM", skip_serializing_if = "Option::is_none")]
    pub fn_elem: Option<RawValue>,
    #[serde(rename = "FPOL", skip_serializing_if = "Option::is_none")]
    pub fpol: Option<RawValue>,
    #[serde(rename = "FPOL_ELEM", skip_serializing_if = "Option::is_none")]
    pub fpol_elem: Option<RawValue>,
    #[serde(rename = "FPXL", skip_serializing_if = "Option::is_none")]
    pub fpxl: Option<RawValue>,
    #[serde(rename = "FPXL_ELEM", skip_serializing_if = "Option::is_none")]
    pub fpxl_elem: Option<RawValue>,
    #[serde(rename = "FP1", skip_serializing_if = "Option::is_none")]
    pub fp1: Option<RawValue>,
    #[serde(rename = "FP1_ELEM", skip_serializing_if = "Option::is_none")]
    pub fp1_elem: Option<RawValue>,
    #[serde(rename = "FP2", skip_serializing_if = "Option::is_none")]
    pub fp2: Option<RawValue>,
    #[serde(rename = "FP2_ELEM", skip_serializing_if = "Option::is_none")]
    pub fp2_elem: Option<RawValue>,
    #[serde(rename = "FP3", skip_serializing_if = "Option::is_none")]
    pub fp3: Option<RawValue>,
    #[serde(rename = "FP3_ELEM", skip_serializing_if = "Option::is_none")]
    pub fp3_elem: Option<RawValue>,
    #[serde(rename = "FP4", skip_serializing_if = "Option::is_none")]
    pub fp4: Option<RawValue>,
    #[serde(rename = "FP4_ELEM", skip_serializing_if = "Option::is_none")]
    pub fp4_elem: Option<RawValue>,
}

/// The eight note/finger source columns, closed so that column dispatch
/// is checked exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteColumn {
    Fnl,
    Fn,
    Fpol,
    Fpxl,
    Fp1,
    Fp2,
    Fp3,
    Fp4,
}

impl NoteColumn {
    pub const NOTES_MODE: [NoteColumn; 2] = [NoteColumn::Fnl, NoteColumn::Fn];
    pub const FINGERS_MODE: [NoteColumn; 6] = [
        NoteColumn::Fpol,
        NoteColumn::Fpxl,
        NoteColumn::Fp1,
        NoteColumn::Fp2,
        NoteColumn::Fp3,
        NoteColumn::Fp4,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoteColumn::Fnl => "FNL",
            NoteColumn::Fn => "FN",
            NoteColumn::Fpol => "FPOL",
            NoteColumn::Fpxl => "FPXL",
            NoteColumn::Fp1 => "FP1",
            NoteColumn::Fp2 => "FP2",
            NoteColumn::Fp3 => "FP3",
            NoteColumn::Fp4 => "FP4",
        }
    }

    pub fn chord_value(self, row: &ChordRow) -> Option<&RawValue> {
        match self {
            NoteColumn::Fnl => row.fnl.as_ref(),
            NoteColumn::Fn => row.fn_.as_ref(),
            NoteColumn::Fpol => row.fpol.as_ref(),
            NoteColumn::Fpxl => row.fpxl.as_ref(),
            NoteColumn::Fp1 => row.fp1.as_ref(),
            NoteColumn::Fp2 => row.fp2.as_ref(),
            NoteColumn::Fp3 => row.fp3.as_ref(),
            NoteColumn::Fp4 => row.fp4.as_ref(),
        }
    }

    /// The `(source, element)` pair of this column in a cross-reference row.
    pub fn crossref_pair(self, row: &NoteRow) -> (Option<&RawValue>, Option<&RawValue>) {
        match self {
            NoteColumn::Fnl => (row.fnl.as_ref(), row.fnl_elem.as_ref()),
            NoteColumn::Fn => (row.fn_.as_ref(), row.fn_elem.as_ref()),
            NoteColumn::Fpol => (row.fpol.as_ref(), row.fpol_elem.as_ref()),
            NoteColumn::Fpxl => (row.fpxl.as_ref(), row.fpxl_elem.as_ref()),
            NoteColumn::Fp1 => (row.fp1.as_ref(), row.fp1_elem.as_ref()),
            NoteColumn::Fp2 => (row.fp2.as_ref(), row.fp2_elem.as_ref()),
            NoteColumn::Fp3 => (row.fp3.as_ref(), row.fp3_elem.as_ref()),
            NoteColumn::Fp4 => (row.fp4.as_ref(), row.fp4_elem.as_ref()),
        }
    }
}

/// A chord row paired with its derived display name.
#[derive(Debug, Clone, PartialEq)]
pub struct ChordEntry {
    pub name: String,
    pub chord: String,
    pub variant: String,
    pub row: ChordRow,
}

/// Ordered chord rows plus the RAM and NOTE side tables.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChordTable {
    pub chords: Vec<ChordRow>,
    pub ram: Vec<RamEntry>,
    pub note: Vec<NoteRow>,
}

/// Derives the chord's group name: the alphabetic characters of CHORD,
/// in order, everything else stripped.
pub fn group_of(chord_name: &str) -> String {
    chord_name.chars().filter(|c| c.is_alphabetic()).collect()
}

impl ChordTable {
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents).map_err(|message| LoadError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn from_json_str(contents: &str) -> Result<Self, String> {
        match serde_json::from_str::<ChordTable>(contents) {
            Ok(table) => Ok(table),
            Err(json_err) => {
                json5::from_str::<ChordTable>(contents).map_err(|_| json_err.to_string())
            }
        }
    }

    /// Sorted group names derived from every row with a CHORD value.
    pub fn groups(&self) -> Vec<String> {
        let mut groups = BTreeSet::new();
        for row in &self.chords {
            let Some(chord) = row.chord.as_ref() else {
                continue;
            };
            let group = group_of(&value::to_display_string(chord));
            if !group.is_empty() {
                groups.insert(group);
            }
        }
        groups.into_iter().collect()
    }

    /// Rows whose derived group equals `group`, sorted by display name.
    /// Rows without a CHORD or VARIANT value are skipped.
    pub fn chords_in_group(&self, group: &str) -> Vec<ChordEntry> {
        let mut entries = Vec::new();
        for row in &self.chords {
            let Some(chord) = row.chord.as_ref() else {
                continue;
            };
            let Some(variant) = row.variant.as_ref() else {
                continue;
            };
            let chord_name = value::to_display_string(chord);
            if group_of(&chord_name) != group {
                continue;
            }
            let variant_digit = value::to_display_string(variant);
            entries.push(ChordEntry {
                name: format!("{chord_name}{variant_digit}"),
                chord: chord_name,
                variant: variant_digit,
                row: row.clone(),
            });
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }

    /// LAD lookup by exact trimmed RAM name.
    pub fn lad_for_ram(&self, ram_name: &str) -> Option<&RawValue> {
        let wanted = ram_name.trim();
        for entry in &self.ram {
            let Some(ram) = entry.ram.as_ref() else {
                continue;
            };
            if value::to_display_string(ram).trim() == wanted {
                return entry.lad.as_ref();
            }
        }
        None
    }
}
