use crate::store::{ElementDescriptor, TemplateStore};
use crate::table::{ChordRow, ChordTable, NoteColumn};
use crate::value::{self, RawValue};
use serde::{Deserialize, Serialize};

use crate::config::DisplayMode;

/// Closed element taxonomy. Drawing behavior dispatches on this tag, so a
/// new kind is a compile-time-checked addition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    Fret,
    Note,
    Barre,
}

/// One resolved, drawable element. The descriptor is a fresh copy of the
/// store's entry; the compositor mutates derived copies freely without
/// touching the template store.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawableElement {
    pub kind: ElementKind,
    pub descriptor: ElementDescriptor,
    pub source_key: String,
}

impl DrawableElement {
    fn new(kind: ElementKind, descriptor: &ElementDescriptor, source_key: impl Into<String>) -> Self {
        Self {
            kind,
            descriptor: descriptor.clone(),
            source_key: source_key.into(),
        }
    }
}

/// Per-resolution miss counters. Misses never fail a resolution; they are
/// reported here for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResolveStats {
    /// RAM named but absent from the RAM side table.
    pub lad_misses: usize,
    /// A `{key}LAD` fret key absent from the fret dictionary.
    pub lad_fret_misses: usize,
    /// BAR named but absent from the barre dictionary or missing geometry.
    pub barre_misses: usize,
    /// A note/finger token that resolved to no element.
    pub note_misses: usize,
    /// Tokens resolved without the cross-reference table (absent or empty).
    pub crossref_fallbacks: usize,
}

impl ResolveStats {
    pub fn total_misses(&self) -> usize {
        self.lad_misses + self.lad_fret_misses + self.barre_misses + self.note_misses
    }
}

/// A resolved element list plus its miss counters.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub elements: Vec<DrawableElement>,
    pub stats: ResolveStats,
}

/// Resolves chord rows to ordered drawable element lists against one
/// template/table snapshot. Pure; holds no mutable state.
pub struct Resolver<'a> {
    templates: &'a TemplateStore,
    table: &'a ChordTable,
}

impl<'a> Resolver<'a> {
    pub fn new(templates: &'a TemplateStore, table: &'a ChordTable) -> Self {
        Self { templates, table }
    }

    /// Emission order is fixed: RAM frame frets, LAD frets, barre (fingers
    /// mode only), then note/finger columns in source order. The
    /// compositor relies on this order for z-ordering.
    pub fn resolve(&self, row: &ChordRow, mode: DisplayMode) -> Resolution {
        let mut elements = Vec::new();
        let mut stats = ResolveStats::default();

        let lad = self.emit_ram_frets(row, &mut elements, &mut stats);
        self.emit_lad_frets(lad, &mut elements, &mut stats);
        if mode == DisplayMode::Fingers {
            self.emit_barre(row, &mut elements, &mut stats);
        }
        let columns: &[NoteColumn] = match mode {
            DisplayMode::Notes => &NoteColumn::NOTES_MODE,
            DisplayMode::Fingers => &NoteColumn::FINGERS_MODE,
        };
        for &column in columns {
            self.emit_note_column(row, column, &mut elements, &mut stats);
        }

        Resolution { elements, stats }
    }

    /// Emits the RAM frame markers (the RAM key itself plus `{RAM}1..4`
    /// suffix variants, whichever exist) and returns the LAD value for the
    /// RAM entry, if any.
    fn emit_ram_frets(
        &self,
        row: &ChordRow,
        elements: &mut Vec<DrawableElement>,
        stats: &mut ResolveStats,
    ) -> Option<&'a RawValue> {
        if value::is_empty(row.ram.as_ref()) {
            return None;
        }
        let ram_name = value::to_display_string(row.ram.as_ref()?);
        let ram_name = ram_name.trim();

        if let Some(descriptor) = self.templates.fret(ram_name) {
            elements.push(DrawableElement::new(ElementKind::Fret, descriptor, ram_name));
        }
        for suffix in 1..=4 {
            let key = format!("{ram_name}{suffix}");
            if let Some(descriptor) = self.templates.fret(&key) {
                elements.push(DrawableElement::new(ElementKind::Fret, descriptor, key));
            }
        }

        let lad = self.table.lad_for_ram(ram_name);
        if lad.is_none() {
            stats.lad_misses += 1;
        }
        lad
    }

    /// LAD lists split on commas only; a dot here is part of the key, not
    /// a mis-encoded separator.
    fn emit_lad_frets(
        &self,
        lad: Option<&RawValue>,
        elements: &mut Vec<DrawableElement>,
        stats: &mut ResolveStats,
    ) {
        if value::is_empty(lad) {
            return;
        }
        let Some(lad) = lad else {
            return;
        };
        let lad_value = value::to_display_string(lad);
        for token in lad_value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let key = format!("{token}LAD");
            match self.templates.fret(&key) {
                Some(descriptor) => {
                    elements.push(DrawableElement::new(ElementKind::Fret, descriptor, key));
                }
                None => stats.lad_fret_misses += 1,
            }
        }
    }

    /// A barre is emitted only when the BAR key resolves and the
    /// descriptor carries full geometry; anything less is a counted miss.
    fn emit_barre(
        &self,
        row: &ChordRow,
        elements: &mut Vec<DrawableElement>,
        stats: &mut ResolveStats,
    ) {
        if value::is_empty(row.bar.as_ref()) {
            return;
        }
        let Some(bar) = row.bar.as_ref() else {
            return;
        };
        let key = value::to_display_string(bar);
        let key = key.trim();
        match self.templates.barre(key) {
            Some(descriptor) if descriptor.has_barre_geometry() => {
                elements.push(DrawableElement::new(ElementKind::Barre, descriptor, key));
            }
            _ => stats.barre_misses += 1,
        }
    }

    fn emit_note_column(
        &self,
        row: &ChordRow,
        column: NoteColumn,
        elements: &mut Vec<DrawableElement>,
        stats: &mut ResolveStats,
    ) {
        let raw = column.chord_value(row);
        if value::is_empty(raw) {
            return;
        }
        for token in value::normalize(raw) {
            if self.table.note.is_empty() {
                stats.crossref_fallbacks += 1;
                if !self.emit_note_key(&token, elements) {
                    stats.note_misses += 1;
                }
                continue;
            }
            match self.crossref_element_key(column, &token) {
                Some(element_key) => {
                    if !self.emit_note_key(&element_key, elements) {
                        stats.note_misses += 1;
                    }
                }
                None => stats.note_misses += 1,
            }
        }
    }

    /// Scans the cross-reference table for the first row whose value in
    /// `column` matches `token` and carries a non-empty element key. A row
    /// that matches with an empty element key is skipped and the scan
    /// continues.
    fn crossref_element_key(&self, column: NoteColumn, token: &str) -> Option<String> {
        for note_row in &self.table.note {
            let (source, element) = column.crossref_pair(note_row);
            if value::is_empty(source) {
                continue;
            }
            let source = value::to_display_string(source?);
            if !value::values_match(&source, token) {
                continue;
            }
            if value::is_empty(element) {
                continue;
            }
            let key = value::to_display_string(element?);
            return Some(key.trim().to_string());
        }
        None
    }

    /// Resolves an element key against notes, open_notes and frets, in
    /// that order; first hit wins.
    fn emit_note_key(&self, key: &str, elements: &mut Vec<DrawableElement>) -> bool {
        if let Some(descriptor) = self.templates.note(key) {
            elements.push(DrawableElement::new(ElementKind::Note, descriptor, key));
            return true;
        }
        if let Some(descriptor) = self.templates.open_note(key) {
            elements.push(DrawableElement::new(ElementKind::Note, descriptor, key));
            return true;
        }
        if let Some(descriptor) = self.templates.fret(key) {
            elements.push(DrawableElement::new(ElementKind::Fret, descriptor, key));
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::RawValue;

    fn templates() -> TemplateStore {
        TemplateStore::from_json_str(
            r#"{
                "frets": {
                    "A1": {"x": 10, "y": 20, "symbol": "I"},
                    "A11": {"x": 15, "y": 20, "symbol": "II"},
                    "3LAD": {"x": 30, "y": 40, "symbol": "III"},
                    "5LAD": {"x": 50, "y": 40, "symbol": "V"}
                },
                "barres": {
                    "B1": {"x": 100, "y": 60, "width": 120, "height": 24, "style": "wood"},
                    "HALF": {"x": 100, "y": 60}
                },
                "notes": {
                    "N_A": {"x": 40, "y": 80, "radius": 10, "note_name": "A", "finger": "1"}
                },
                "open_notes": {
                    "O_E": {"x": 5, "y": 80, "radius": 8, "note_name": "E"}
                }
            }"#,
        )
        .unwrap()
    }

    fn table() -> ChordTable {
        ChordTable::from_json_str(
            r#"{
                "chords": [],
                "ram": [{"RAM": "A1", "LAD": "3,5"}],
                "note": [
                    {"FP1": "7", "FP1_ELEM": ""},
                    {"FP1": 7.0, "FP1_ELEM": "N_A"},
                    {"FN": "E", "FN_ELEM": "O_E"}
                ]
            }"#,
        )
        .unwrap()
    }

    fn row(ram: &str) -> ChordRow {
        ChordRow {
            ram: Some(RawValue::text(ram)),
            ..Default::default()
        }
    }

    #[test]
    fn ram_and_lad_frets_emit_in_order() {
        let templates = templates();
        let table = table();
        let resolver = Resolver::new(&templates, &table);
        let resolution = resolver.resolve(&row("A1"), DisplayMode::Fingers);
        let keys: Vec<&str> = resolution
            .elements
            .iter()
            .map(|e| e.source_key.as_str())
            .collect();
        assert_eq!(keys, vec!["A1", "A11", "3LAD", "5LAD"]);
        assert!(resolution.elements.iter().all(|e| e.kind == ElementKind::Fret));
        assert_eq!(resolution.stats.total_misses(), 0);
    }

    #[test]
    fn lad_splits_on_commas_only() {
        let templates = templates();
        let mut table = table();
        // "3.5" is a single (unknown) lad key, not the list "3,5".
        table.ram[0].lad = Some(RawValue::text("3.5"));
        let resolver = Resolver::new(&templates, &table);
        let resolution = resolver.resolve(&row("A1"), DisplayMode::Fingers);
        let keys: Vec<&str> = resolution
            .elements
            .iter()
            .map(|e| e.source_key.as_str())
            .collect();
        assert_eq!(keys, vec!["A1", "A11"]);
        assert_eq!(resolution.stats.lad_fret_misses, 1);
    }

    #[test]
    fn unknown_ram_counts_a_lad_miss() {
        let templates = templates();
        let table = table();
        let resolver = Resolver::new(&templates, &table);
        let resolution = resolver.resolve(&row("Z9"), DisplayMode::Fingers);
        assert!(resolution.elements.is_empty());
        assert_eq!(resolution.stats.lad_misses, 1);
    }

    #[test]
    fn barre_requires_full_geometry() {
        let templates = templates();
        let table = table();
        let resolver = Resolver::new(&templates, &table);

        let mut chord = ChordRow::default();
        chord.bar = Some(RawValue::text("B1"));
        let resolution = resolver.resolve(&chord, DisplayMode::Fingers);
        assert_eq!(resolution.elements.len(), 1);
        assert_eq!(resolution.elements[0].kind, ElementKind::Barre);

        chord.bar = Some(RawValue::text("HALF"));
        let resolution = resolver.resolve(&chord, DisplayMode::Fingers);
        assert!(resolution.elements.is_empty());
        assert_eq!(resolution.stats.barre_misses, 1);
    }

    #[test]
    fn notes_mode_never_emits_barre() {
        let templates = templates();
        let table = table();
        let resolver = Resolver::new(&templates, &table);
        let mut chord = ChordRow::default();
        chord.bar = Some(RawValue::text("B1"));
        let resolution = resolver.resolve(&chord, DisplayMode::Notes);
        assert!(resolution.elements.iter().all(|e| e.kind != ElementKind::Barre));
    }

    #[test]
    fn crossref_skips_empty_elem_and_matches_fuzzily() {
        let templates = templates();
        let table = table();
        let resolver = Resolver::new(&templates, &table);
        let mut chord = ChordRow::default();
        // "7" matches the 7.0 row after skipping the empty-ELEM row.
        chord.fp1 = Some(RawValue::text("7"));
        let resolution = resolver.resolve(&chord, DisplayMode::Fingers);
        assert_eq!(resolution.elements.len(), 1);
        assert_eq!(resolution.elements[0].source_key, "N_A");
        assert_eq!(resolution.elements[0].kind, ElementKind::Note);
    }

    #[test]
    fn notes_mode_resolves_open_note_via_crossref() {
        let templates = templates();
        let table = table();
        let resolver = Resolver::new(&templates, &table);
        let mut chord = ChordRow::default();
        chord.fn_ = Some(RawValue::text("E"));
        let resolution = resolver.resolve(&chord, DisplayMode::Notes);
        assert_eq!(resolution.elements.len(), 1);
        assert_eq!(resolution.elements[0].source_key, "O_E");
    }

    #[test]
    fn empty_crossref_table_falls_back_to_direct_lookup() {
        let templates = templates();
        let mut table = table();
        table.note.clear();
        let resolver = Resolver::new(&templates, &table);
        let mut chord = ChordRow::default();
        chord.fp2 = Some(RawValue::text("N_A"));
        let resolution = resolver.resolve(&chord, DisplayMode::Fingers);
        assert_eq!(resolution.elements.len(), 1);
        assert_eq!(resolution.stats.crossref_fallbacks, 1);
        assert_eq!(resolution.stats.note_misses, 0);
    }

    #[test]
    fn unresolvable_token_is_counted_not_fatal() {
        let templates = templates();
        let table = table();
        let resolver = Resolver::new(&templates, &table);
        let mut chord = ChordRow::default();
        chord.fp3 = Some(RawValue::text("99"));
        let resolution = resolver.resolve(&chord, DisplayMode::Fingers);
        assert!(resolution.elements.is_empty());
        assert_eq!(resolution.stats.note_misses, 1);
    }

    #[test]
    fn resolution_is_idempotent() {
        let templates = templates();
        let table = table();
        let resolver = Resolver::new(&templates, &table);
        let mut chord = row("A1");
        chord.bar = Some(RawValue::text("B1"));
        chord.fp1 = Some(RawValue::text("7"));
        let first = resolver.resolve(&chord, DisplayMode::Fingers);
        let second = resolver.resolve(&chord, DisplayMode::Fingers);
        assert_eq!(first, second);
    }
}
