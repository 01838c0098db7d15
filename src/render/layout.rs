use base64::Engine as _;

use crate::{
    foundation::core::Canvas,
    foundation::error::{PlaceholdError, PlaceholdResult},
    render::font::FontData,
    visual::{Align, VisualSpec},
};

/// Largest canvas side the layout stage accepts, in device pixels.
pub const MAX_CANVAS_DIM: u32 = 16_384;

/// Canonical vector document produced by a [`LayoutEngine`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SvgDocument {
    pub canvas: Canvas,
    pub svg: String,
}

/// Turns a visual tree and a pixel canvas into the canonical document.
pub trait LayoutEngine: Send + Sync {
    fn layout(
        &self,
        spec: &VisualSpec,
        canvas: Canvas,
        font: &FontData,
    ) -> PlaceholdResult<SvgDocument>;
}

/// Built-in layout engine writing standalone SVG 1.1.
///
/// Text lines are stacked vertically at `line_height * font_size` and anchored per the
/// container's alignment; glyph shaping is left to the SVG consumer.
#[derive(Clone, Debug)]
pub struct SvgLayout {
    /// Line box height as a multiple of the font size.
    pub line_height: f32,
    /// Embed the font as a base64 `@font-face` so browsers render the same glyphs.
    pub embed_font: bool,
}

impl Default for SvgLayout {
    fn default() -> Self {
        Self {
            line_height: 1.2,
            embed_font: true,
        }
    }
}

impl LayoutEngine for SvgLayout {
    fn layout(
        &self,
        spec: &VisualSpec,
        canvas: Canvas,
        font: &FontData,
    ) -> PlaceholdResult<SvgDocument> {
        if canvas.is_empty() {
            return Err(PlaceholdError::render(format!(
                "canvas {canvas} has no pixels"
            )));
        }
        if canvas.width > MAX_CANVAS_DIM || canvas.height > MAX_CANVAS_DIM {
            return Err(PlaceholdError::render(format!(
                "canvas {canvas} too large (max {MAX_CANVAS_DIM}x{MAX_CANVAS_DIM})"
            )));
        }

        let root = &spec.root;
        let (w, h) = (canvas.width as f32, canvas.height as f32);
        let line = root.font_size * self.line_height;
        let block = line * root.children.len() as f32;

        let top = match root.justify_content {
            Align::Start => 0.0,
            Align::Center => (h - block) / 2.0,
            Align::End => h - block,
        };
        let (x, anchor) = match root.align_items {
            Align::Start => (0.0, "start"),
            Align::Center => (w / 2.0, "middle"),
            Align::End => (w, "end"),
        };

        let family = escape_xml(&font.family().replace('\'', ""));
        let mut svg = String::with_capacity(512);
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{cw}" height="{ch}" viewBox="0 0 {cw} {ch}">"#,
            cw = canvas.width,
            ch = canvas.height,
        ));
        if self.embed_font {
            let data = base64::engine::general_purpose::STANDARD.encode(font.bytes());
            svg.push_str(&format!(
                r#"<defs><style>@font-face{{font-family:'{family}';src:url(data:{mime};base64,{data})}}</style></defs>"#,
                mime = font.media_type(),
            ));
        }
        svg.push_str(&format!(
            r#"<rect width="{}" height="{}" fill="{}"/>"#,
            canvas.width, canvas.height, root.background
        ));
        svg.push_str(&format!(
            r#"<g fill="{}" font-family="'{family}'" font-size="{}" font-weight="{}" text-anchor="{anchor}" dominant-baseline="central">"#,
            root.color,
            fmt_num(root.font_size),
            root.font_weight,
        ));
        for (i, child) in root.children.iter().enumerate() {
            let y = top + line * (i as f32 + 0.5);
            svg.push_str(&format!(
                r#"<text x="{}" y="{}">{}</text>"#,
                fmt_num(x),
                fmt_num(y),
                escape_xml(&child.text)
            ));
        }
        svg.push_str("</g></svg>");

        Ok(SvgDocument { canvas, svg })
    }
}

/// Shortest decimal with at most two fractional digits.
fn fmt_num(v: f32) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
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
#[path = "../../tests/unit/render/layout.rs"]
mod tests;
