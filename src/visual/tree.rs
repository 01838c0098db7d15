use crate::foundation::core::Rgb8;

/// Backend-agnostic description of a placeholder.
///
/// The root container always covers the full canvas; sizes are in device pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualSpec {
    pub root: Container,
}

/// Placement of the children block along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Start,
    Center,
    End,
}

/// A box that fills its parent and stacks its text children vertically.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    pub background: Rgb8,
    /// Text color inherited by children.
    pub color: Rgb8,
    pub font_size: f32,
    pub font_weight: u16,
    /// Horizontal alignment of each line.
    pub align_items: Align,
    /// Vertical placement of the stacked block.
    pub justify_content: Align,
    pub children: Vec<TextNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNode {
    pub text: String,
}

impl TextNode {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}
