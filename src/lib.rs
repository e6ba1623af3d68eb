#[cfg(feature = "cli")]
pub mod cli;
pub mod compose;
pub mod config;
pub mod export;
pub mod resolve;
pub mod service;
pub mod store;
pub mod style;
pub mod surface;
pub mod table;
pub mod theme;
pub mod value;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{DisplayMode, FretNumbering, OutlineWeight, RenderOptions, ScalePreset};
pub use resolve::{DrawableElement, ElementKind, Resolution, Resolver};
pub use service::{ConfigStore, DiagramService, RenderError, StoreSources};
pub use store::{ElementDescriptor, Rect, TemplateImage, TemplateStore};
pub use table::{ChordEntry, ChordRow, ChordTable};
pub use theme::Theme;
