use crate::store::Rect;
use serde::{Deserialize, Serialize};

/// Opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0, 0, 0);
    /// Fallback fill for unknown styles: the original palette's gold/olive.
    pub const FALLBACK_GOLD: Color = Color::new(189, 183, 107);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    /// Channel-scaled lighter variant, clamped to white.
    pub fn lighter(self, factor: f64) -> Self {
        let scale = |c: u8| ((c as f64 * factor).round().min(255.0)) as u8;
        Color::new(scale(self.r), scale(self.g), scale(self.b))
    }
}

/// A resolved fill: flat color or a gradient with geometry already fixed
/// in canvas coordinates, ready for the drawing surface.
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(Color),
    Linear {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stops: Vec<(f64, Color)>,
    },
    Radial {
        cx: f64,
        cy: f64,
        radius: f64,
        stops: Vec<(f64, Color)>,
    },
}

fn linear(geom: &Rect, stops: &[(f64, Color)]) -> Fill {
    Fill::Linear {
        x1: geom.x,
        y1: geom.y,
        x2: geom.x + geom.width,
        y2: geom.y + geom.height,
        stops: stops.to_vec(),
    }
}

fn radial(geom: &Rect, radius: f64, stops: &[(f64, Color)]) -> Fill {
    Fill::Radial {
        cx: geom.x + geom.width / 2.0,
        cy: geom.y + geom.height / 2.0,
        radius,
        stops: stops.to_vec(),
    }
}

/// Resolves a named style to a fill over the given element geometry.
/// The style set is closed; unknown names fall back to a flat gold.
pub fn brush_for(style_name: Option<&str>, geom: &Rect) -> Fill {
    let max_extent = geom.width.max(geom.height);
    match style_name.unwrap_or("") {
        "wood" => linear(
            geom,
            &[
                (0.0, Color::new(210, 180, 140)),
                (0.5, Color::new(160, 120, 80)),
                (1.0, Color::new(210, 180, 140)),
            ],
        ),
        "metal" => linear(
            geom,
            &[
                (0.0, Color::new(200, 200, 200)),
                (0.5, Color::new(100, 100, 100)),
                (1.0, Color::new(200, 200, 200)),
            ],
        ),
        "rubber" => radial(
            geom,
            max_extent,
            &[(0.0, Color::new(80, 80, 80)), (1.0, Color::new(40, 40, 40))],
        ),
        "gradient" => linear(
            geom,
            &[
                (0.0, Color::FALLBACK_GOLD),
                (1.0, Color::FALLBACK_GOLD.lighter(1.5)),
            ],
        ),
        "striped" => Fill::Solid(Color::FALLBACK_GOLD),
        "orange_gradient" => linear(
            geom,
            &[
                (0.0, Color::new(255, 200, 100)),
                (0.5, Color::new(255, 140, 0)),
                (1.0, Color::new(255, 100, 0)),
            ],
        ),
        "orange_metal" => linear(
            geom,
            &[
                (0.0, Color::new(255, 220, 150)),
                (0.3, Color::new(255, 180, 80)),
                (0.7, Color::new(255, 140, 40)),
                (1.0, Color::new(255, 120, 20)),
            ],
        ),
        "orange_glow" => radial(
            geom,
            max_extent * 0.8,
            &[
                (0.0, Color::new(255, 230, 180)),
                (0.5, Color::new(255, 180, 80)),
                (1.0, Color::new(255, 140, 0)),
            ],
        ),
        "dark_orange" => linear(
            geom,
            &[
                (0.0, Color::new(255, 150, 50)),
                (0.5, Color::new(255, 120, 0)),
                (1.0, Color::new(220, 100, 0)),
            ],
        ),
        "orange_wood" => linear(
            geom,
            &[
                (0.0, Color::new(255, 200, 150)),
                (0.3, Color::new(255, 170, 100)),
                (0.7, Color::new(255, 140, 60)),
                (1.0, Color::new(255, 120, 40)),
            ],
        ),
        "bright_orange" => linear(
            geom,
            &[
                (0.0, Color::new(255, 230, 100)),
                (0.5, Color::new(255, 200, 0)),
                (1.0, Color::new(255, 160, 0)),
            ],
        ),
        "orange_red" => linear(
            geom,
            &[
                (0.0, Color::new(255, 180, 100)),
                (0.5, Color::new(255, 120, 0)),
                (1.0, Color::new(255, 80, 0)),
            ],
        ),
        "orange_yellow" => linear(
            geom,
            &[
                (0.0, Color::new(255, 240, 150)),
                (0.5, Color::new(255, 200, 50)),
                (1.0, Color::new(255, 180, 0)),
            ],
        ),
        "orange_brown" => linear(
            geom,
            &[
                (0.0, Color::new(255, 190, 130)),
                (0.5, Color::new(255, 150, 80)),
                (1.0, Color::new(210, 120, 60)),
            ],
        ),
        "orange_pastel" => linear(
            geom,
            &[
                (0.0, Color::new(255, 220, 180)),
                (0.5, Color::new(255, 190, 140)),
                (1.0, Color::new(255, 170, 120)),
            ],
        ),
        _ => Fill::Solid(Color::FALLBACK_GOLD),
    }
}
