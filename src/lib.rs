//! On-demand placeholder images from compact path tokens.
//!
//! A token such as `300x200@2x.png/dark` flows through four stages:
//!
//! - [`grammar::tokenize`] splits it into raw fields
//! - [`params::validate`] coerces them into bounded [`ValidatedParameters`]
//! - [`visual::build`] describes the placeholder as a small visual tree
//! - [`Renderer`] lays it out as SVG and, for raster formats, transcodes it
//!
//! [`Service`] wraps the whole pipeline behind a path → HTTP response interface.
#![forbid(unsafe_code)]

mod foundation;

pub mod config;
pub mod format;
pub mod grammar;
pub mod params;
/// Font fetch, layout and raster encoding.
pub mod render;
/// Request handling and the HTTP front end.
pub mod service;
pub mod visual;

pub use crate::config::Config;
pub use crate::format::{Format, FormatEntry, RasterTarget};
pub use crate::foundation::core::{Canvas, Dpr, Rgb8};
pub use crate::foundation::error::{PlaceholdError, PlaceholdResult};
pub use crate::params::{Issue, Issues, ValidatedParameters, parse};
pub use crate::render::{FontSource, RenderedArtifact, Renderer, RetryPolicy};
pub use crate::service::{HttpServer, Response, Service, ServiceOpts};
