use crate::compose;
use crate::config::{DisplayMode, RenderOptions};
use crate::export::{self, ExportBundle};
use crate::resolve::{Resolution, Resolver};
use crate::store::{LoadError, Rect, RestyleCounts, TemplateImage, TemplateStore};
use crate::surface::{SurfaceError, SvgSurface};
use crate::table::{ChordEntry, ChordRow, ChordTable};
use crate::theme::Theme;
use crate::value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Where a store snapshot is loaded from. Kept by the service so refresh
/// can reload the same sources.
#[derive(Debug, Clone)]
pub struct StoreSources {
    pub template_path: PathBuf,
    pub chord_path: PathBuf,
    pub image: TemplateImage,
}

/// One immutable template/table snapshot. Renders in flight hold an `Arc`
/// to the snapshot they started with; refresh swaps the service's `Arc`
/// and never mutates a published snapshot.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    pub templates: TemplateStore,
    pub table: ChordTable,
    pub image: TemplateImage,
}

impl ConfigStore {
    fn load(sources: &StoreSources) -> Result<Self, LoadError> {
        Ok(Self {
            templates: TemplateStore::load(&sources.template_path)?,
            table: ChordTable::load(&sources.chord_path)?,
            image: sources.image.clone(),
        })
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// The single entry point callers use: group/chord listing, element
/// resolution, rendering and export all go through here.
pub struct DiagramService {
    store: Arc<ConfigStore>,
    sources: StoreSources,
    theme: Theme,
}

impl DiagramService {
    pub fn load(sources: StoreSources) -> Result<Self, LoadError> {
        let store = ConfigStore::load(&sources)?;
        Ok(Self::new(store, sources))
    }

    /// Wraps an already-built snapshot; `sources` are what refresh will
    /// reload from.
    pub fn new(store: ConfigStore, sources: StoreSources) -> Self {
        Self {
            store: Arc::new(store),
            sources,
            theme: Theme::classic(),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Reloads both sources and swaps the snapshot in whole. On failure
    /// the previous snapshot stays active.
    pub fn refresh(&mut self) -> Result<(), LoadError> {
        let store = ConfigStore::load(&self.sources)?;
        self.store = Arc::new(store);
        Ok(())
    }

    pub fn snapshot(&self) -> Arc<ConfigStore> {
        Arc::clone(&self.store)
    }

    pub fn groups(&self) -> Vec<String> {
        self.store.table.groups()
    }

    pub fn chords_in_group(&self, group: &str) -> Vec<ChordEntry> {
        self.store.table.chords_in_group(group)
    }

    pub fn resolve_elements(&self, row: &ChordRow, mode: DisplayMode) -> Resolution {
        Resolver::new(&self.store.templates, &self.store.table).resolve(row, mode)
    }

    /// The chord's crop rectangle, clamped into the template image. `None`
    /// when the row has no RAM or the RAM has no crop rectangle.
    pub fn crop_for(&self, row: &ChordRow) -> Option<Rect> {
        let ram = row.ram.as_ref().map(value::to_display_string)?;
        let rect = self.store.templates.crop_rect(&ram)?;
        Some(compose::clamp_crop(
            rect,
            self.store.image.width,
            self.store.image.height,
        ))
    }

    /// Renders one chord diagram to an SVG document. The canvas is the
    /// clamped crop rectangle, or the whole template image when the chord
    /// has no crop rectangle.
    pub fn render_chord(
        &self,
        row: &ChordRow,
        mode: DisplayMode,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let store = self.snapshot();
        let crop = self.crop_for(row);
        let (canvas_width, canvas_height) = match crop {
            Some(rect) => (rect.width.round() as u32, rect.height.round() as u32),
            None => (store.image.width, store.image.height),
        };

        let mut surface = SvgSurface::new(canvas_width, canvas_height, &self.theme.font_family)?;
        surface.fill_background(self.theme.background);
        if let Some(path) = store.image.source.as_deref() {
            let (offset_x, offset_y) = match crop.as_ref() {
                Some(rect) => (-rect.x, -rect.y),
                None => (0.0, 0.0),
            };
            surface.draw_image(
                &path.to_string_lossy(),
                offset_x,
                offset_y,
                store.image.width,
                store.image.height,
            );
        }

        let resolution = Resolver::new(&store.templates, &store.table).resolve(row, mode);
        compose::composite(
            &mut surface,
            &resolution.elements,
            crop.as_ref(),
            options,
            &self.theme,
        );

        let scale = options.scale.factor(canvas_width as f64);
        Ok(surface.finish(scale))
    }

    pub fn export_configuration(&self, options: &RenderOptions) -> ExportBundle {
        let store = self.snapshot();
        export::build_bundle(&store.templates, &store.table, &store.image, options)
    }

    /// Applies note/barre style overrides on a copy of the current
    /// snapshot and swaps it in. Published snapshots are unaffected.
    pub fn restyle(
        &mut self,
        note_styles: &BTreeMap<String, String>,
        barre_style: Option<&str>,
    ) -> RestyleCounts {
        let mut store = (*self.store).clone();
        let counts = store.templates.restyle(note_styles, barre_style);
        self.store = Arc::new(store);
        counts
    }
}
