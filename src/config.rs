use std::collections::BTreeSet;
use std::path::Path;

use anyhow::Context as _;

use crate::{
    format::Format,
    foundation::core::Dpr,
    foundation::error::{PlaceholdError, PlaceholdResult},
    render::MAX_CANVAS_DIM,
};

/// Startup configuration shared read-only by every request.
///
/// Build it once (defaults, a JSON file, CLI overrides), call [`Config::validate`], then pass it
/// explicitly to the validator and the service.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Largest accepted logical width.
    pub max_width: u32,
    /// Largest accepted logical height.
    pub max_height: u32,
    /// Largest accepted device pixel ratio (same one-fractional-digit form as tokens).
    pub max_dpr: Dpr,
    /// Format used when the token has no `.FORMAT` group.
    pub default_format: Format,
    /// Formats requests may ask for.
    pub supported_formats: BTreeSet<Format>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_width: 1600,
            max_height: 1600,
            max_dpr: Dpr::from_tenths(50),
            default_format: Format::Svg,
            supported_formats: Format::ALL.into_iter().collect(),
        }
    }
}

impl Config {
    pub fn validate(&self) -> PlaceholdResult<()> {
        if self.max_width == 0 {
            return Err(PlaceholdError::config("max_width must be >= 1"));
        }
        if self.max_height == 0 {
            return Err(PlaceholdError::config("max_height must be >= 1"));
        }
        if !self.max_dpr.is_positive() {
            return Err(PlaceholdError::config("max_dpr must be > 0"));
        }
        let (w, h) = (
            self.max_dpr.scale(self.max_width),
            self.max_dpr.scale(self.max_height),
        );
        if w > MAX_CANVAS_DIM || h > MAX_CANVAS_DIM {
            return Err(PlaceholdError::config(format!(
                "largest canvas {w}x{h} (max size times max_dpr) exceeds \
                 {MAX_CANVAS_DIM}x{MAX_CANVAS_DIM}"
            )));
        }
        if self.supported_formats.is_empty() {
            return Err(PlaceholdError::config(
                "supported_formats must list at least one format",
            ));
        }
        if !self.is_supported(self.default_format) {
            return Err(PlaceholdError::config(format!(
                "default_format '{}' is not in supported_formats",
                self.default_format
            )));
        }
        Ok(())
    }

    pub fn is_supported(&self, format: Format) -> bool {
        self.supported_formats.contains(&format)
    }

    /// Supported format names joined with `", "`, in registry order.
    pub fn supported_names(&self) -> String {
        self.supported_formats
            .iter()
            .map(|f| f.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> PlaceholdResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let cfg: Config = serde_json::from_slice(&bytes)
            .map_err(|e| PlaceholdError::config(format!("parse '{}': {e}", path.display())))?;
        cfg.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
