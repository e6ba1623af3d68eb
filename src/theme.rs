use crate::style::Color;

/// Visual constants shared by every diagram: typography for fret symbols
/// and note labels plus the canvas background. Element fills come from the
/// style resolver, not from here.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub fret_font_size: f32,
    pub text_color: Color,
    pub background: Color,
}

impl Theme {
    pub fn classic() -> Self {
        Self {
            font_family: "Arial, Helvetica, sans-serif".to_string(),
            font_size: 14.0,
            fret_font_size: 18.0,
            text_color: Color::BLACK,
            background: Color::new(255, 255, 255),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
