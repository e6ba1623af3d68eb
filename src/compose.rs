use crate::config::{FretNumbering, OutlineWeight, RenderOptions};
use crate::resolve::{DrawableElement, ElementKind};
use crate::store::Rect;
use crate::style::{self, Color};
use crate::surface::Surface;
use crate::theme::Theme;
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

pub const DEFAULT_BARRE_WIDTH: f64 = 100.0;
pub const DEFAULT_BARRE_HEIGHT: f64 = 20.0;
pub const DEFAULT_BARRE_CORNER_RADIUS: f64 = 10.0;
pub const DEFAULT_NOTE_RADIUS: f64 = 10.0;

static ROMAN_TO_NUMERIC: Lazy<BTreeMap<&'static str, &'static str>> = Lazy::new(|| {
    BTreeMap::from([
        ("I", "1"),
        ("II", "2"),
        ("III", "3"),
        ("IV", "4"),
        ("V", "5"),
        ("VI", "6"),
        ("VII", "7"),
        ("VIII", "8"),
        ("IX", "9"),
        ("X", "10"),
        ("XI", "11"),
        ("XII", "12"),
        ("XIII", "13"),
        ("XIV", "14"),
        ("XV", "15"),
        ("XVI", "16"),
    ])
});

/// Roman fret symbols I..XVI translate to decimal strings; anything else
/// passes through unchanged.
pub fn convert_fret_symbol(symbol: &str) -> String {
    ROMAN_TO_NUMERIC
        .get(symbol.trim())
        .map(|numeric| numeric.to_string())
        .unwrap_or_else(|| symbol.to_string())
}

pub fn barre_outline_width(weight: OutlineWeight) -> Option<f64> {
    match weight {
        OutlineWeight::None => None,
        OutlineWeight::Thin => Some(3.0),
        OutlineWeight::Medium => Some(5.0),
        OutlineWeight::Thick => Some(8.0),
    }
}

pub fn note_outline_width(weight: OutlineWeight) -> Option<f64> {
    match weight {
        OutlineWeight::None => None,
        OutlineWeight::Thin => Some(2.0),
        OutlineWeight::Medium => Some(3.0),
        OutlineWeight::Thick => Some(5.0),
    }
}

/// Clamps a requested crop rectangle into the template image bounds. The
/// origin stays inside the image and the extent stays positive, so the
/// output canvas always has at least one pixel.
pub fn clamp_crop(rect: &Rect, image_width: u32, image_height: u32) -> Rect {
    // A degenerate image still clamps to a 1x1 canvas; f64::clamp would
    // panic on an inverted range otherwise.
    let image_width = image_width.max(1) as f64;
    let image_height = image_height.max(1) as f64;
    let x = rect.x.clamp(0.0, image_width - 1.0);
    let y = rect.y.clamp(0.0, image_height - 1.0);
    let width = rect.width.clamp(1.0, image_width - x);
    let height = rect.height.clamp(1.0, image_height - y);
    Rect { x, y, width, height }
}

/// Translates one element from template space into canvas space. Without
/// a crop rectangle this is the identity. With one, every anchor is
/// round-translated; a barre's center anchor is additionally corrected to
/// the top-left corner the drawing pass expects.
pub fn adapt(element: &DrawableElement, crop: Option<&Rect>) -> DrawableElement {
    let mut adapted = element.clone();
    let Some(crop) = crop else {
        return adapted;
    };

    if let Some(x) = adapted.descriptor.x {
        adapted.descriptor.x = Some((x - crop.x).round());
    }
    if let Some(y) = adapted.descriptor.y {
        adapted.descriptor.y = Some((y - crop.y).round());
    }

    if adapted.kind == ElementKind::Barre {
        let width = adapted.descriptor.width.unwrap_or(DEFAULT_BARRE_WIDTH);
        let height = adapted.descriptor.height.unwrap_or(DEFAULT_BARRE_HEIGHT);
        // Integer floor halves, matching the source pipeline's pixel math.
        let half_width = (width.round() as i64 / 2) as f64;
        let half_height = (height.round() as i64 / 2) as f64;
        if let Some(x) = adapted.descriptor.x {
            adapted.descriptor.x = Some(x - half_width);
        }
        if let Some(y) = adapted.descriptor.y {
            adapted.descriptor.y = Some(y - half_height);
        }
    }
    adapted
}

/// Applies the per-render display options to an adapted copy: numeric
/// fret symbols and outline attachment. The resolver's originals are
/// never touched.
pub fn apply_options(element: &mut DrawableElement, options: &RenderOptions) {
    match element.kind {
        ElementKind::Fret => {
            if options.fret_numbering == FretNumbering::Numeric {
                if let Some(symbol) = element.descriptor.symbol.as_deref() {
                    element.descriptor.symbol = Some(convert_fret_symbol(symbol));
                }
            }
        }
        ElementKind::Barre => {
            if let Some(width) = barre_outline_width(options.barre_outline) {
                element.descriptor.outline_width = Some(width);
                element.descriptor.outline_color = Some([0, 0, 0]);
            }
        }
        ElementKind::Note => {
            if let Some(width) = note_outline_width(options.note_outline) {
                element.descriptor.outline_width = Some(width);
                element.descriptor.outline_color = Some([0, 0, 0]);
            }
        }
    }
}

/// Draws an element list onto a surface in three passes: base elements in
/// resolution order, then barre outlines, then note outlines.
pub fn composite(
    surface: &mut dyn Surface,
    elements: &[DrawableElement],
    crop: Option<&Rect>,
    options: &RenderOptions,
    theme: &Theme,
) {
    let mut prepared: Vec<DrawableElement> = elements
        .iter()
        .map(|element| adapt(element, crop))
        .collect();
    for element in &mut prepared {
        apply_options(element, options);
    }

    for element in &prepared {
        draw_base(surface, element, theme);
    }
    for element in prepared.iter().filter(|e| e.kind == ElementKind::Barre) {
        draw_outline(surface, element);
    }
    for element in prepared.iter().filter(|e| e.kind == ElementKind::Note) {
        draw_outline(surface, element);
    }
}

fn outline_color(element: &DrawableElement) -> Color {
    match element.descriptor.outline_color {
        Some([r, g, b]) => Color::new(r, g, b),
        None => Color::BLACK,
    }
}

fn draw_base(surface: &mut dyn Surface, element: &DrawableElement, theme: &Theme) {
    let x = element.descriptor.x.unwrap_or(0.0);
    let y = element.descriptor.y.unwrap_or(0.0);
    match element.kind {
        ElementKind::Fret => {
            if let Some(symbol) = element.descriptor.symbol.as_deref() {
                surface.draw_text(x, y, symbol, theme.fret_font_size, theme.text_color);
            }
        }
        ElementKind::Note => {
            let radius = element.descriptor.radius.unwrap_or(DEFAULT_NOTE_RADIUS);
            let geom = Rect {
                x: x - radius,
                y: y - radius,
                width: radius * 2.0,
                height: radius * 2.0,
            };
            let fill = style::brush_for(element.descriptor.style.as_deref(), &geom);
            surface.fill_circle(x, y, radius, &fill);
            if let Some(label) = note_label(element) {
                surface.draw_text(x, y, label, theme.font_size, theme.text_color);
            }
        }
        ElementKind::Barre => {
            let width = element.descriptor.width.unwrap_or(DEFAULT_BARRE_WIDTH);
            let height = element.descriptor.height.unwrap_or(DEFAULT_BARRE_HEIGHT);
            let corner = element
                .descriptor
                .radius
                .unwrap_or(DEFAULT_BARRE_CORNER_RADIUS);
            let geom = Rect { x, y, width, height };
            let fill = style::brush_for(element.descriptor.style.as_deref(), &geom);
            surface.fill_round_rect(x, y, width, height, corner, &fill);
        }
    }
}

fn draw_outline(surface: &mut dyn Surface, element: &DrawableElement) {
    let Some(stroke_width) = element.descriptor.outline_width else {
        return;
    };
    let color = outline_color(element);
    let x = element.descriptor.x.unwrap_or(0.0);
    let y = element.descriptor.y.unwrap_or(0.0);
    match element.kind {
        ElementKind::Note => {
            let radius = element.descriptor.radius.unwrap_or(DEFAULT_NOTE_RADIUS);
            surface.stroke_circle(x, y, radius, stroke_width, color);
        }
        ElementKind::Barre => {
            let width = element.descriptor.width.unwrap_or(DEFAULT_BARRE_WIDTH);
            let height = element.descriptor.height.unwrap_or(DEFAULT_BARRE_HEIGHT);
            let corner = element
                .descriptor
                .radius
                .unwrap_or(DEFAULT_BARRE_CORNER_RADIUS);
            surface.stroke_round_rect(x, y, width, height, corner, stroke_width, color);
        }
        ElementKind::Fret => {}
    }
}

/// The text a note marker shows, chosen by its `display_text` property:
/// `note_name`, `symbol`, or the finger digit by default.
fn note_label(element: &DrawableElement) -> Option<&str> {
    let descriptor = &element.descriptor;
    match descriptor.display_text.as_deref() {
        Some("note_name") => descriptor.note_name.as_deref(),
        Some("symbol") => descriptor.symbol.as_deref(),
        _ => descriptor.finger.as_deref(),
    }
}
