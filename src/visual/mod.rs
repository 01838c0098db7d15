//! Parameters → abstract visual tree.

pub(crate) mod build;
pub(crate) mod tree;

pub use build::{build, font_size, palette};
pub use tree::{Align, Container, TextNode, VisualSpec};
