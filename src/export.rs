use crate::config::{DisplayMode, FretNumbering, OutlineWeight, RenderOptions};
use crate::resolve::{DrawableElement, ElementKind, Resolver};
use crate::store::{ElementDescriptor, Rect, TemplateImage, TemplateStore};
use crate::table::ChordTable;
use crate::value::RawValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A full configuration snapshot: every chord's base row, crop rectangle
/// and resolved element lists for both display modes. Pure data, no
/// internal keys; suitable for a standalone viewer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportBundle {
    pub metadata: ExportMetadata,
    pub groups: Vec<String>,
    pub chords: BTreeMap<String, ChordExport>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub image_file: String,
    pub total_chords: usize,
    pub outline_settings: OutlineSettings,
    pub created_date: String,
}

/// Exports always carry `scale_type: original`; scaling is a viewing
/// concern, not part of the configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineSettings {
    pub barre_outline: OutlineWeight,
    pub note_outline: OutlineWeight,
    pub scale_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChordExport {
    pub group: String,
    pub base_info: BaseInfo,
    pub crop_rect: Option<Rect>,
    pub elements_fingers: Vec<ElementExport>,
    pub elements_notes: Vec<ElementExport>,
    pub display_settings: DisplaySettings,
}

/// The chord row's raw fields under stable lowercase names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BaseInfo {
    pub base_chord: Option<RawValue>,
    pub variant: Option<RawValue>,
    pub caption: Option<RawValue>,
    #[serde(rename = "type")]
    pub chord_type: Option<RawValue>,
    pub ram: Option<RawValue>,
    pub bar: Option<RawValue>,
    pub fnl: Option<RawValue>,
    #[serde(rename = "fn")]
    pub fn_: Option<RawValue>,
    pub fpol: Option<RawValue>,
    pub fpxl: Option<RawValue>,
    pub fp1: Option<RawValue>,
    pub fp2: Option<RawValue>,
    pub fp3: Option<RawValue>,
    pub fp4: Option<RawValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementExport {
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub data: ElementDescriptor,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub fret_type: FretNumbering,
    pub barre_outline: OutlineWeight,
    pub note_outline: OutlineWeight,
}

fn serialize_elements(elements: &[DrawableElement]) -> Vec<ElementExport> {
    elements
        .iter()
        .map(|element| ElementExport {
            kind: element.kind,
            data: element.descriptor.clone(),
        })
        .collect()
}

/// Builds the export snapshot from one store/table pair. Crop rectangles
/// are exported as authored, without image-bounds clamping.
pub fn build_bundle(
    templates: &TemplateStore,
    table: &ChordTable,
    image: &TemplateImage,
    options: &RenderOptions,
) -> ExportBundle {
    let resolver = Resolver::new(templates, table);
    let groups = table.groups();
    let mut chords = BTreeMap::new();
    let mut total_chords = 0;

    for group in &groups {
        for entry in table.chords_in_group(group) {
            let fingers = resolver.resolve(&entry.row, DisplayMode::Fingers);
            let notes = resolver.resolve(&entry.row, DisplayMode::Notes);
            let crop_rect = entry
                .row
                .ram
                .as_ref()
                .map(crate::value::to_display_string)
                .and_then(|ram| templates.crop_rect(&ram).copied());

            chords.insert(
                entry.name.clone(),
                ChordExport {
                    group: group.clone(),
                    base_info: BaseInfo {
                        base_chord: entry.row.chord.clone(),
                        variant: entry.row.variant.clone(),
                        caption: entry.row.caption.clone(),
                        chord_type: entry.row.chord_type.clone(),
                        ram: entry.row.ram.clone(),
                        bar: entry.row.bar.clone(),
                        fnl: entry.row.fnl.clone(),
                        fn_: entry.row.fn_.clone(),
                        fpol: entry.row.fpol.clone(),
                        fpxl: entry.row.fpxl.clone(),
                        fp1: entry.row.fp1.clone(),
                        fp2: entry.row.fp2.clone(),
                        fp3: entry.row.fp3.clone(),
                        fp4: entry.row.fp4.clone(),
                    },
                    crop_rect,
                    elements_fingers: serialize_elements(&fingers.elements),
                    elements_notes: serialize_elements(&notes.elements),
                    display_settings: DisplaySettings {
                        fret_type: options.fret_numbering,
                        barre_outline: options.barre_outline,
                        note_outline: options.note_outline,
                    },
                },
            );
            total_chords += 1;
        }
    }

    let image_file = image
        .source
        .as_deref()
        .and_then(|path| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    ExportBundle {
        metadata: ExportMetadata {
            image_file,
            total_chords,
            outline_settings: OutlineSettings {
                barre_outline: options.barre_outline,
                note_outline: options.note_outline,
                scale_type: "original".to_string(),
            },
            created_date: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        },
        groups,
        chords,
    }
}
