use genpdf::style::{Color, Style};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const BLACK: RgbColor = RgbColor { r: 0, g: 0, b: 0 };
    pub const NAVY: RgbColor = RgbColor { r: 0, g: 0, b: 128 };
    pub const DARK_GREY: RgbColor = RgbColor { r: 169, g: 169, b: 169 };
}

impl From<RgbColor> for Color {
    fn from(c: RgbColor) -> Self {
        Color::Rgb(c.r, c.g, c.b)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl From<Alignment> for genpdf::Alignment {
    fn from(a: Alignment) -> Self {
        match a {
            Alignment::Left => genpdf::Alignment::Left,
            Alignment::Center => genpdf::Alignment::Center,
            Alignment::Right => genpdf::Alignment::Right,
        }
    }
}

/// Typography for one kind of paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    /// Size in points.
    pub font_size: u8,
    pub bold: bool,
    pub color: RgbColor,
    pub alignment: Alignment,
}

impl TextStyle {
    fn body() -> Self {
        Self {
            font_size: 11,
            bold: false,
            color: RgbColor::BLACK,
            alignment: Alignment::Left,
        }
    }

    /// The genpdf style for this paragraph kind, optionally forced bold.
    pub fn to_style(&self, bold: bool) -> Style {
        let style = Style::new()
            .with_font_size(self.font_size)
            .with_color(self.color.into());
        if self.bold || bold { style.bold() } else { style }
    }
}

/// Document styling configuration for PDF exports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Paper size in millimetres (US Letter by default).
    pub page_width_mm: f64,
    pub page_height_mm: f64,

    /// Uniform page margin in millimetres.
    pub margin_mm: f64,

    /// Line height as a multiple of the font size.
    pub line_spacing: f64,

    /// Document title and "For:" line.
    pub title: TextStyle,

    /// Section headings.
    pub heading: TextStyle,

    pub body: TextStyle,
    pub bullet: TextStyle,
    pub bullet_marker: String,
    pub signature: TextStyle,
    pub date: TextStyle,

    /// Spacer after the title lines and after the date line, in lines.
    pub header_spacer: f64,

    /// Extra gap after a heading block, in lines.
    pub heading_gap: f64,

    /// Extra gap after any other block, in lines.
    pub block_gap: f64,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        let body = TextStyle::body();

        Self {
            page_width_mm: 215.9,
            page_height_mm: 279.4,
            margin_mm: 25.4,
            line_spacing: 1.25,
            title: TextStyle {
                font_size: 16,
                bold: true,
                color: RgbColor::NAVY,
                alignment: Alignment::Center,
            },
            heading: TextStyle {
                font_size: 13,
                bold: true,
                color: RgbColor::NAVY,
                alignment: Alignment::Left,
            },
            bullet: body.clone(),
            bullet_marker: "\u{2022}".to_string(),
            signature: body.clone(),
            date: TextStyle {
                color: RgbColor::DARK_GREY,
                alignment: Alignment::Right,
                ..body.clone()
            },
            body,
            header_spacer: 1.5,
            heading_gap: 0.6,
            block_gap: 0.4,
        }
    }
}
