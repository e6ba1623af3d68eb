use std::path::{Path, PathBuf};

use chord_grid::resolve::ElementKind;
use chord_grid::{
    ChordRow, DiagramService, DisplayMode, FretNumbering, RenderOptions, ScalePreset,
    StoreSources, TemplateImage,
};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn service() -> DiagramService {
    DiagramService::load(StoreSources {
        template_path: fixture("template.json"),
        chord_path: fixture("chords.json"),
        image: TemplateImage::new(1000, 800),
    })
    .expect("fixture load failed")
}

fn chord(service: &DiagramService, name: &str) -> ChordRow {
    let group = chord_grid::table::group_of(name);
    service
        .chords_in_group(&group)
        .into_iter()
        .find(|entry| entry.name == name)
        .unwrap_or_else(|| panic!("missing fixture chord {name}"))
        .row
}

#[test]
fn groups_partition_the_fixture_table() {
    let service = service();
    assert_eq!(service.groups(), vec!["Am", "E"]);

    let am: Vec<String> = service
        .chords_in_group("Am")
        .into_iter()
        .map(|entry| entry.name)
        .collect();
    assert_eq!(am, vec!["Am1", "Am2"]);
}

#[test]
fn ram_and_lad_frets_resolve_in_order() {
    let service = service();
    let row = chord(&service, "Am2");
    let resolution = service.resolve_elements(&row, DisplayMode::Fingers);
    let keys: Vec<&str> = resolution
        .elements
        .iter()
        .map(|e| e.source_key.as_str())
        .collect();
    assert_eq!(keys, vec!["A1", "3LAD", "5LAD"]);
    assert!(resolution
        .elements
        .iter()
        .all(|e| e.kind == ElementKind::Fret));
}

#[test]
fn fingers_mode_resolves_barre_and_split_tokens() {
    let service = service();
    let row = chord(&service, "Am1");
    let resolution = service.resolve_elements(&row, DisplayMode::Fingers);
    let keys: Vec<&str> = resolution
        .elements
        .iter()
        .map(|e| e.source_key.as_str())
        .collect();
    // FP2 carries the mis-encoded float 21.25, read as the list "21,25".
    assert_eq!(keys, vec!["A1", "3LAD", "5LAD", "B1", "N_A", "N_C", "N_A"]);
    assert_eq!(resolution.stats.total_misses(), 0);
}

#[test]
fn notes_mode_never_includes_a_barre() {
    let service = service();
    let row = chord(&service, "Am1");
    let resolution = service.resolve_elements(&row, DisplayMode::Notes);
    assert!(resolution
        .elements
        .iter()
        .all(|e| e.kind != ElementKind::Barre));
}

#[test]
fn note_columns_resolve_through_the_crossref_table() {
    let service = service();
    let row = chord(&service, "E1");
    let resolution = service.resolve_elements(&row, DisplayMode::Notes);
    let keys: Vec<&str> = resolution
        .elements
        .iter()
        .map(|e| e.source_key.as_str())
        .collect();
    // FNL before FN; O_E comes from the open_notes section.
    assert_eq!(keys, vec!["E1", "N_A", "O_E"]);
}

#[test]
fn resolution_is_idempotent() {
    let service = service();
    let row = chord(&service, "Am1");
    let first = service.resolve_elements(&row, DisplayMode::Fingers);
    let second = service.resolve_elements(&row, DisplayMode::Fingers);
    assert_eq!(first, second);
}

#[test]
fn render_uses_the_crop_rect_as_canvas() {
    let service = service();
    let row = chord(&service, "Am1");
    let svg = service
        .render_chord(&row, DisplayMode::Fingers, &RenderOptions::default())
        .unwrap();
    assert!(svg.contains("viewBox=\"0 0 400 300\""));
    // Barre top-left after center correction: (300-100)-60, (200-50)-15.
    assert!(svg.contains("<rect x=\"140.00\" y=\"135.00\" width=\"121.00\" height=\"30.00\""));
}

#[test]
fn render_clamps_out_of_bounds_crops() {
    let service = service();
    let row = chord(&service, "E1");
    let svg = service
        .render_chord(&row, DisplayMode::Fingers, &RenderOptions::default())
        .unwrap();
    // Requested 200x200 at (950,750) inside a 1000x800 image.
    assert!(svg.contains("viewBox=\"0 0 50 50\""));
}

#[test]
fn numeric_fret_numbering_converts_symbols() {
    let service = service();
    let row = chord(&service, "Am1");
    let roman = service
        .render_chord(&row, DisplayMode::Fingers, &RenderOptions::default())
        .unwrap();
    assert!(roman.contains(">VII</text>"));

    let options = RenderOptions {
        fret_numbering: FretNumbering::Numeric,
        ..Default::default()
    };
    let numeric = service
        .render_chord(&row, DisplayMode::Fingers, &options)
        .unwrap();
    assert!(numeric.contains(">7</text>"));
    assert!(!numeric.contains(">VII</text>"));
}

#[test]
fn scale_presets_resize_the_root_only() {
    let service = service();
    let row = chord(&service, "Am1");
    let options = RenderOptions {
        scale: ScalePreset::Medium1,
        ..Default::default()
    };
    let svg = service
        .render_chord(&row, DisplayMode::Fingers, &options)
        .unwrap();
    assert!(svg.contains("width=\"200\""));
    assert!(svg.contains("height=\"150\""));
    assert!(svg.contains("viewBox=\"0 0 400 300\""));
}

#[test]
fn export_bundle_covers_every_chord_without_internal_keys() {
    let service = service();
    let bundle = service.export_configuration(&RenderOptions::default());
    assert_eq!(bundle.metadata.total_chords, 3);
    assert_eq!(bundle.groups, vec!["Am", "E"]);
    assert!(bundle.chords.contains_key("Am1"));
    assert!(bundle.chords.contains_key("E1"));

    let json = serde_json::to_string(&bundle).unwrap();
    assert!(!json.contains("source_key"));
}
