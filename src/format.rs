//! Supported output formats and their transport metadata.
//!
//! Every dispatch over [`Format`] is a wildcard-free `match`: adding a variant does not compile
//! until its media type, transport flag and encoder target are all spelled out.

use std::fmt;
use std::str::FromStr;

/// An output format a placeholder can be rendered to.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// The canonical vector document, served as-is.
    Svg,
    Png,
    Jpeg,
    /// Lossless WebP.
    Webp,
    Avif,
}

/// Response metadata for one format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormatEntry {
    pub media_type: &'static str,
    /// Whether the body is binary (base64 on text-only transports).
    pub is_binary: bool,
}

/// Encoder step the raster stage runs for a non-canonical format.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RasterTarget {
    Png,
    /// Baseline JPEG; alpha is flattened since JPEG has none.
    Jpeg,
    WebpLossless,
    Avif,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown format '{0}'")]
pub struct UnknownFormat(pub String);

impl Format {
    pub const ALL: [Format; 5] = [
        Format::Svg,
        Format::Png,
        Format::Jpeg,
        Format::Webp,
        Format::Avif,
    ];

    /// Token spelling (case-sensitive).
    pub const fn name(self) -> &'static str {
        match self {
            Format::Svg => "svg",
            Format::Png => "png",
            Format::Jpeg => "jpeg",
            Format::Webp => "webp",
            Format::Avif => "avif",
        }
    }

    pub const fn entry(self) -> FormatEntry {
        match self {
            Format::Svg => FormatEntry {
                media_type: "image/svg+xml",
                is_binary: false,
            },
            Format::Png => FormatEntry {
                media_type: "image/png",
                is_binary: true,
            },
            Format::Jpeg => FormatEntry {
                media_type: "image/jpeg",
                is_binary: true,
            },
            Format::Webp => FormatEntry {
                media_type: "image/webp",
                is_binary: true,
            },
            Format::Avif => FormatEntry {
                media_type: "image/avif",
                is_binary: true,
            },
        }
    }

    /// `None` for the canonical vector format, which skips the transcode stage.
    pub const fn raster_target(self) -> Option<RasterTarget> {
        match self {
            Format::Svg => None,
            Format::Png => Some(RasterTarget::Png),
            Format::Jpeg => Some(RasterTarget::Jpeg),
            Format::Webp => Some(RasterTarget::WebpLossless),
            Format::Avif => Some(RasterTarget::Avif),
        }
    }
}

/// Process-wide format table, in [`Format::ALL`] order.
pub static REGISTRY: [(Format, FormatEntry); 5] = [
    (Format::Svg, Format::Svg.entry()),
    (Format::Png, Format::Png.entry()),
    (Format::Jpeg, Format::Jpeg.entry()),
    (Format::Webp, Format::Webp.entry()),
    (Format::Avif, Format::Avif.entry()),
];

/// Look up a format by its exact token spelling.
pub fn lookup(name: &str) -> Option<(Format, FormatEntry)> {
    REGISTRY.iter().copied().find(|(f, _)| f.name() == name)
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        lookup(s)
            .map(|(f, _)| f)
            .ok_or_else(|| UnknownFormat(s.to_string()))
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
#[path = "../tests/unit/format.rs"]
mod tests;
