use crate::{
    foundation::core::Rgb8,
    params::ValidatedParameters,
    visual::tree::{Align, Container, TextNode, VisualSpec},
};

const DARK: Rgb8 = Rgb8::hex(0x1a1110);
const LIGHT: Rgb8 = Rgb8::hex(0xf7f7f7);

const FONT_SIZE_RATIO: f32 = 0.17;
const FONT_SIZE_MAX: f32 = 45.0;
const FONT_WEIGHT: u16 = 600;

/// `(background, foreground)` for the requested theme.
pub fn palette(dark: bool) -> (Rgb8, Rgb8) {
    if dark { (DARK, LIGHT) } else { (LIGHT, DARK) }
}

/// Label size in device pixels, capped on small canvases and at high dpr.
pub fn font_size(params: &ValidatedParameters) -> f32 {
    let dpr = params.dpr().as_f64() as f32;
    let short_side = params.width().min(params.height()) as f32;
    (short_side * dpr * FONT_SIZE_RATIO).min(FONT_SIZE_MAX * dpr)
}

/// Map validated parameters to the placeholder's visual tree.
pub fn build(params: &ValidatedParameters) -> VisualSpec {
    let (background, color) = palette(params.dark());

    VisualSpec {
        root: Container {
            background,
            color,
            font_size: font_size(params),
            font_weight: FONT_WEIGHT,
            align_items: Align::Center,
            justify_content: Align::Center,
            children: vec![
                TextNode::new(format!("{}x{}", params.width(), params.height())),
                TextNode::new(format!("@{}x .{}", params.dpr(), params.format())),
            ],
        },
    }
}

#[cfg(test)]
#[path = "../../tests/unit/visual/build.rs"]
mod tests;
