use crate::style::{Color, Fill};
use anyhow::Result;
use std::path::Path;
use thiserror::Error;

/// Abstract drawing surface the compositor targets. Coordinates are
/// canvas-space pixels; fills arrive fully resolved from the style
/// resolver.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, fill: &Fill);
    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, stroke_width: f64, color: Color);
    fn fill_round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, corner: f64, fill: &Fill);
    fn stroke_round_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner: f64,
        stroke_width: f64,
        color: Color,
    );
    /// Text centered on `(x, y)`.
    fn draw_text(&mut self, x: f64, y: f64, text: &str, font_size: f32, color: Color);
}

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("invalid surface dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
}

/// SVG-backed surface. Gradient fills are accumulated into `<defs>` with
/// userSpaceOnUse geometry so they line up with the element they fill.
pub struct SvgSurface {
    width: u32,
    height: u32,
    font_family: String,
    defs: String,
    body: String,
    gradient_count: usize,
}

impl SvgSurface {
    pub fn new(width: u32, height: u32, font_family: &str) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            font_family: font_family.to_string(),
            defs: String::new(),
            body: String::new(),
            gradient_count: 0,
        })
    }

    pub fn fill_background(&mut self, color: Color) {
        self.body.push_str(&format!(
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            color.to_hex()
        ));
    }

    /// Places the template background so that the crop origin lands at the
    /// canvas origin. `x`/`y` are typically the negated crop offsets.
    pub fn draw_image(&mut self, href: &str, x: f64, y: f64, width: u32, height: u32) {
        self.body.push_str(&format!(
            "<image href=\"{}\" x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width}\" height=\"{height}\"/>",
            escape_xml(href)
        ));
    }

    /// Registers a fill, returning the SVG paint reference for it. Solid
    /// colors inline; gradients go to `<defs>` under a fresh id.
    fn paint(&mut self, fill: &Fill) -> String {
        match fill {
            Fill::Solid(color) => color.to_hex(),
            Fill::Linear { x1, y1, x2, y2, stops } => {
                let id = format!("g{}", self.gradient_count);
                self.gradient_count += 1;
                self.defs.push_str(&format!(
                    "<linearGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" x1=\"{x1:.2}\" y1=\"{y1:.2}\" x2=\"{x2:.2}\" y2=\"{y2:.2}\">",
                ));
                push_stops(&mut self.defs, stops);
                self.defs.push_str("</linearGradient>");
                format!("url(#{id})")
            }
            Fill::Radial { cx, cy, radius, stops } => {
                let id = format!("g{}", self.gradient_count);
                self.gradient_count += 1;
                self.defs.push_str(&format!(
                    "<radialGradient id=\"{id}\" gradientUnits=\"userSpaceOnUse\" cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{radius:.2}\">",
                ));
                push_stops(&mut self.defs, stops);
                self.defs.push_str("</radialGradient>");
                format!("url(#{id})")
            }
        }
    }

    /// Closes the document. `scale` multiplies the root width/height only;
    /// the viewBox keeps canvas coordinates so element geometry is
    /// untouched.
    pub fn finish(self, scale: f64) -> String {
        let out_width = (self.width as f64 * scale).round().max(1.0);
        let out_height = (self.height as f64 * scale).round().max(1.0);
        let mut svg = String::new();
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_width}\" height=\"{out_height}\" viewBox=\"0 0 {} {}\">",
            self.width, self.height
        ));
        if !self.defs.is_empty() {
            svg.push_str("<defs>");
            svg.push_str(&self.defs);
            svg.push_str("</defs>");
        }
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }
}

impl Surface for SvgSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_circle(&mut self, cx: f64, cy: f64, radius: f64, fill: &Fill) {
        let paint = self.paint(fill);
        self.body.push_str(&format!(
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{radius:.2}\" fill=\"{paint}\"/>"
        ));
    }

    fn stroke_circle(&mut self, cx: f64, cy: f64, radius: f64, stroke_width: f64, color: Color) {
        self.body.push_str(&format!(
            "<circle cx=\"{cx:.2}\" cy=\"{cy:.2}\" r=\"{radius:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width:.2}\"/>",
            color.to_hex()
        ));
    }

    fn fill_round_rect(&mut self, x: f64, y: f64, width: f64, height: f64, corner: f64, fill: &Fill) {
        let paint = self.paint(fill);
        self.body.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"{corner:.2}\" ry=\"{corner:.2}\" fill=\"{paint}\"/>"
        ));
    }

    fn stroke_round_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner: f64,
        stroke_width: f64,
        color: Color,
    ) {
        self.body.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\" rx=\"{corner:.2}\" ry=\"{corner:.2}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{stroke_width:.2}\"/>",
            color.to_hex()
        ));
    }

    fn draw_text(&mut self, x: f64, y: f64, text: &str, font_size: f32, color: Color) {
        self.body.push_str(&format!(
            "<text x=\"{x:.2}\" y=\"{y:.2}\" text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"{}\" font-size=\"{font_size}\" fill=\"{}\">{}</text>",
            self.font_family,
            color.to_hex(),
            escape_xml(text)
        ));
    }
}

fn push_stops(defs: &mut String, stops: &[(f64, Color)]) {
    for (offset, color) in stops {
        defs.push_str(&format!(
            "<stop offset=\"{offset}\" stop-color=\"{}\"/>",
            color.to_hex()
        ));
    }
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path) -> Result<()> {
    let opt = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg, &opt)?;
    let size = tree.size().to_int_size();
    let mut pixmap = resvg::tiny_skia::Pixmap::new(size.width(), size.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap.save_png(output)?;
    Ok(())
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn zero_dimensions_are_rejected() {
        assert!(SvgSurface::new(0, 100, "Arial").is_err());
        assert!(SvgSurface::new(100, 0, "Arial").is_err());
    }

    #[test]
    fn finish_scales_root_but_not_viewbox() {
        let surface = SvgSurface::new(400, 300, "Arial").unwrap();
        let svg = surface.finish(0.5);
        assert!(svg.contains("width=\"200\""));
        assert!(svg.contains("height=\"150\""));
        assert!(svg.contains("viewBox=\"0 0 400 300\""));
    }

    #[test]
    fn gradient_fills_land_in_defs() {
        let mut surface = SvgSurface::new(200, 200, "Arial").unwrap();
        surface.fill_circle(
            50.0,
            50.0,
            10.0,
            &Fill::Linear {
                x1: 40.0,
                y1: 40.0,
                x2: 60.0,
                y2: 60.0,
                stops: vec![(0.0, Color::new(255, 0, 0)), (1.0, Color::new(0, 0, 255))],
            },
        );
        let svg = surface.finish(1.0);
        assert!(svg.contains("<defs><linearGradient id=\"g0\""));
        assert!(svg.contains("fill=\"url(#g0)\""));
    }

    #[test]
    fn text_is_escaped() {
        let mut surface = SvgSurface::new(100, 100, "Arial").unwrap();
        surface.draw_text(10.0, 10.0, "A&B", 12.0, Color::BLACK);
        let svg = surface.finish(1.0);
        assert!(svg.contains("A&amp;B"));
    }
}
