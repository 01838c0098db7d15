//! Font fetch, layout and transcode stages.

pub(crate) mod font;
pub(crate) mod layout;
pub(crate) mod pipeline;
pub(crate) mod raster;

pub use font::{FontData, FontSource, RetryPolicy};
pub use layout::{LayoutEngine, MAX_CANVAS_DIM, SvgDocument, SvgLayout};
pub use pipeline::{RenderedArtifact, Renderer};
pub use raster::{EncoderOpts, RasterEncoder, ResvgEncoder};
