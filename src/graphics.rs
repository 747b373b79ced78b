//! Drawing surface and output backends.
//!
//! Components describe themselves as an ordered display list on a
//! [`GraphicsPage`]; the page knows how to emit that list as SVG, PNG or
//! PDF. In every backend later list entries draw on top of earlier ones.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::settings::Theme;

/// Page width in millimetres (A4 portrait).
pub const PAGE_WIDTH: f64 = 210.0;
/// Page height in millimetres.
pub const PAGE_HEIGHT: f64 = 297.0;

// Raster resolution of the PNG backend, pixels per millimetre.
const PNG_SCALE: f64 = 4.0;

const MM_TO_PT: f64 = 72.0 / 25.4;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("png encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Output formats advertised to the CLI and the sweep driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Svg,
    Png,
    Pdf,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Png => "png",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    fn to_pdf(self) -> String {
        format!(
            "{:.3} {:.3} {:.3}",
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0
        )
    }
}

/// Theme-derived colors shared by all backends.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub background: Color,
    pub ink: Color,
    pub accent: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Default => Self {
                background: Color::new(0xff, 0xff, 0xff),
                ink: Color::new(0x00, 0x00, 0x00),
                accent: Color::new(0xb0, 0x20, 0x20),
            },
            Theme::Dark => Self {
                background: Color::new(0x10, 0x10, 0x20),
                ink: Color::new(0xdd, 0xdd, 0xd0),
                accent: Color::new(0xff, 0xa0, 0x40),
            },
        }
    }
}

/// One display-list entry. Coordinates are millimetres from the top-left
/// page corner, y growing downward.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Circle {
        cx: f64,
        cy: f64,
        r: f64,
        width: f64,
        color: Color,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        width: f64,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        size: f64,
        content: String,
        color: Color,
    },
}

/// An ordered display list plus the theme palette it will be painted with.
pub struct GraphicsPage {
    palette: Palette,
    elements: Vec<Element>,
}

impl GraphicsPage {
    pub fn new(theme: Theme) -> Self {
        Self {
            palette: Palette::for_theme(theme),
            elements: Vec::new(),
        }
    }

    /// The formats the rendering backends can produce.
    pub fn supported_formats() -> &'static [ImageFormat] {
        &[ImageFormat::Svg, ImageFormat::Png, ImageFormat::Pdf]
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn draw_circle(&mut self, cx: f64, cy: f64, r: f64, width: f64, color: Color) {
        self.elements.push(Element::Circle { cx, cy, r, width, color });
    }

    pub fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, width: f64, color: Color) {
        self.elements.push(Element::Line { x1, y1, x2, y2, width, color });
    }

    pub fn draw_text(&mut self, x: f64, y: f64, size: f64, content: &str, color: Color) {
        self.elements.push(Element::Text {
            x,
            y,
            size,
            content: content.to_string(),
            color,
        });
    }

    /// Serialize the display list in the requested format.
    pub fn render(&self, format: ImageFormat) -> Result<Vec<u8>, RenderError> {
        match format {
            ImageFormat::Svg => Ok(self.to_svg()),
            ImageFormat::Png => self.to_png(),
            ImageFormat::Pdf => Ok(self.to_pdf()),
        }
    }

    /// Append the format extension to `stem`, write the rendered bytes and
    /// return the path actually written.
    pub fn write_to_file(&self, stem: &Path, format: ImageFormat) -> Result<PathBuf, RenderError> {
        let path = stem.with_extension(format.extension());
        let bytes = self.render(format)?;
        fs::write(&path, bytes).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    // --- SVG backend ---

    fn to_svg(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}mm\" height=\"{h}mm\" \
             viewBox=\"0 0 {w} {h}\">\n",
            w = PAGE_WIDTH,
            h = PAGE_HEIGHT
        ));
        out.push_str(&format!(
            "<rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"{}\"/>\n",
            PAGE_WIDTH,
            PAGE_HEIGHT,
            self.palette.background.to_hex()
        ));
        for element in &self.elements {
            match element {
                Element::Circle { cx, cy, r, width, color } => {
                    out.push_str(&format!(
                        "<circle cx=\"{cx:.3}\" cy=\"{cy:.3}\" r=\"{r:.3}\" fill=\"none\" \
                         stroke=\"{}\" stroke-width=\"{width:.3}\"/>\n",
                        color.to_hex()
                    ));
                }
                Element::Line { x1, y1, x2, y2, width, color } => {
                    out.push_str(&format!(
                        "<line x1=\"{x1:.3}\" y1=\"{y1:.3}\" x2=\"{x2:.3}\" y2=\"{y2:.3}\" \
                         stroke=\"{}\" stroke-width=\"{width:.3}\"/>\n",
                        color.to_hex()
                    ));
                }
                Element::Text { x, y, size, content, color } => {
                    out.push_str(&format!(
                        "<text x=\"{x:.3}\" y=\"{y:.3}\" font-size=\"{size:.3}\" \
                         font-family=\"serif\" text-anchor=\"middle\" fill=\"{}\">{}</text>\n",
                        color.to_hex(),
                        escape_xml(content)
                    ));
                }
            }
        }
        out.push_str("</svg>\n");
        out.into_bytes()
    }

    // --- PNG backend ---
    //
    // Geometry only; labels are emitted by the vector backends.

    fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let width = (PAGE_WIDTH * PNG_SCALE).round() as u32;
        let height = (PAGE_HEIGHT * PNG_SCALE).round() as u32;
        let bg = self.palette.background;
        let mut img = image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([bg.r, bg.g, bg.b, 0xff]),
        );

        for element in &self.elements {
            match element {
                Element::Circle { cx, cy, r, width, color } => {
                    let steps = ((2.0 * std::f64::consts::PI * r * PNG_SCALE).ceil() as u32).max(8);
                    for i in 0..steps {
                        let a = 2.0 * std::f64::consts::PI * f64::from(i) / f64::from(steps);
                        let x = cx + r * a.cos();
                        let y = cy + r * a.sin();
                        plot(&mut img, x, y, *width, *color);
                    }
                }
                Element::Line { x1, y1, x2, y2, width, color } => {
                    let steps = (((x2 - x1).hypot(y2 - y1) * PNG_SCALE).ceil() as u32).max(1);
                    for i in 0..=steps {
                        let t = f64::from(i) / f64::from(steps);
                        let x = x1 + (x2 - x1) * t;
                        let y = y1 + (y2 - y1) * t;
                        plot(&mut img, x, y, *width, *color);
                    }
                }
                Element::Text { .. } => {}
            }
        }

        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, image::ImageFormat::Png)?;
        Ok(buf.into_inner())
    }

    // --- PDF backend ---

    fn to_pdf(&self) -> Vec<u8> {
        let page_w = PAGE_WIDTH * MM_TO_PT;
        let page_h = PAGE_HEIGHT * MM_TO_PT;

        let mut content = String::new();
        content.push_str(&format!(
            "{} rg 0 0 {:.2} {:.2} re f\n",
            self.palette.background.to_pdf(),
            page_w,
            page_h
        ));
        for element in &self.elements {
            match element {
                Element::Circle { cx, cy, r, width, color } => {
                    let (x, y) = pdf_point(*cx, *cy);
                    let r = r * MM_TO_PT;
                    // A circle as four cubic Bezier quadrants.
                    const K: f64 = 0.552_284_749_8;
                    let k = K * r;
                    content.push_str(&format!(
                        "{} RG {:.2} w\n{:.2} {:.2} m\n",
                        color.to_pdf(),
                        width * MM_TO_PT,
                        x + r,
                        y
                    ));
                    content.push_str(&format!(
                        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
                        x + r, y + k, x + k, y + r, x, y + r
                    ));
                    content.push_str(&format!(
                        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
                        x - k, y + r, x - r, y + k, x - r, y
                    ));
                    content.push_str(&format!(
                        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\n",
                        x - r, y - k, x - k, y - r, x, y - r
                    ));
                    content.push_str(&format!(
                        "{:.2} {:.2} {:.2} {:.2} {:.2} {:.2} c\nS\n",
                        x + k, y - r, x + r, y - k, x + r, y
                    ));
                }
                Element::Line { x1, y1, x2, y2, width, color } => {
                    let (ax, ay) = pdf_point(*x1, *y1);
                    let (bx, by) = pdf_point(*x2, *y2);
                    content.push_str(&format!(
                        "{} RG {:.2} w {:.2} {:.2} m {:.2} {:.2} l S\n",
                        color.to_pdf(),
                        width * MM_TO_PT,
                        ax,
                        ay,
                        bx,
                        by
                    ));
                }
                Element::Text { x, y, size, content: text, color } => {
                    let (tx, ty) = pdf_point(*x, *y);
                    content.push_str(&format!(
                        "BT {} rg /F1 {:.2} Tf {:.2} {:.2} Td ({}) Tj ET\n",
                        color.to_pdf(),
                        size * MM_TO_PT,
                        tx,
                        ty,
                        escape_pdf(text)
                    ));
                }
            }
        }

        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>",
                page_w, page_h
            ),
            format!("<< /Length {} >>\nstream\n{}endstream", content.len(), content),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
             /Encoding /WinAnsiEncoding >>"
                .to_string(),
        ];

        let mut out = String::from("%PDF-1.4\n");
        let mut offsets = Vec::with_capacity(objects.len());
        for (i, body) in objects.iter().enumerate() {
            offsets.push(out.len());
            out.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
        }
        let xref_start = out.len();
        out.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
        for offset in offsets {
            out.push_str(&format!("{:010} 00000 n \n", offset));
        }
        out.push_str(&format!(
            "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
            objects.len() + 1,
            xref_start
        ));
        out.into_bytes()
    }
}

fn pdf_point(x: f64, y: f64) -> (f64, f64) {
    (x * MM_TO_PT, (PAGE_HEIGHT - y) * MM_TO_PT)
}

fn plot(img: &mut image::RgbaImage, x: f64, y: f64, width: f64, color: Color) {
    let px = image::Rgba([color.r, color.g, color.b, 0xff]);
    let radius = ((width * PNG_SCALE) / 2.0).ceil() as i64;
    let cx = (x * PNG_SCALE).round() as i64;
    let cy = (y * PNG_SCALE).round() as i64;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let (ix, iy) = (cx + dx, cy + dy);
            if ix >= 0 && iy >= 0 && (ix as u32) < img.width() && (iy as u32) < img.height() {
                img.put_pixel(ix as u32, iy as u32, px);
            }
        }
    }
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

// WinAnsi is a superset of printable Latin-1 for everything the string
// tables use; code points above U+00FF fall back to '?'.
fn escape_pdf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            ' '..='~' => out.push(c),
            _ => {
                let code = c as u32;
                if code <= 0xff {
                    out.push_str(&format!("\\{:03o}", code));
                } else {
                    out.push('?');
                }
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn svg_preserves_element_order() {
        let mut page = GraphicsPage::new(Theme::Default);
        page.draw_circle(50.0, 50.0, 10.0, 0.2, page.palette().ink);
        page.draw_text(50.0, 50.0, 4.0, "label", page.palette().ink);
        let svg = String::from_utf8(page.render(ImageFormat::Svg).unwrap()).unwrap();
        let circle = svg.find("<circle").unwrap();
        let text = svg.find("<text").unwrap();
        assert!(circle < text);
    }

    #[test]
    fn png_has_signature_and_dimensions() {
        let page = GraphicsPage::new(Theme::Dark);
        let png = page.render(ImageFormat::Png).unwrap();
        assert_eq!(&png[..8], &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a]);
        // IHDR width/height, big-endian, at fixed offsets.
        let width = u32::from_be_bytes([png[16], png[17], png[18], png[19]]);
        let height = u32::from_be_bytes([png[20], png[21], png[22], png[23]]);
        assert_eq!(width, (PAGE_WIDTH * PNG_SCALE).round() as u32);
        assert_eq!(height, (PAGE_HEIGHT * PNG_SCALE).round() as u32);
    }

    #[test]
    fn pdf_header_and_trailer() {
        let mut page = GraphicsPage::new(Theme::Default);
        page.draw_text(10.0, 10.0, 5.0, "52°N", page.palette().ink);
        let pdf = page.render(ImageFormat::Pdf).unwrap();
        let text = String::from_utf8_lossy(&pdf);
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.trim_end().ends_with("%%EOF"));
        // Degree sign travels as a WinAnsi octal escape.
        assert!(text.contains("\\260"));
    }

    #[test]
    fn extension_is_appended_to_stem() {
        let dir = std::env::temp_dir();
        let stem = dir.join("astrolabe_core_graphics_test");
        let page = GraphicsPage::new(Theme::Default);
        let path = page.write_to_file(&stem, ImageFormat::Svg).unwrap();
        assert!(path.to_string_lossy().ends_with(".svg"));
        std::fs::remove_file(path).unwrap();
    }
}
