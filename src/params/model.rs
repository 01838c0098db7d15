use std::fmt;

use crate::{format::Format, foundation::core::Canvas, foundation::core::Dpr};

/// Bounded, typed placeholder parameters.
///
/// Only [`crate::params::validate`] constructs these, so every instance satisfies the bounds of
/// the [`crate::Config`] it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ValidatedParameters {
    width: u32,
    height: u32,
    dpr: Dpr,
    format: Format,
    dark: bool,
}

impl ValidatedParameters {
    pub(crate) fn new_unchecked(
        width: u32,
        height: u32,
        dpr: Dpr,
        format: Format,
        dark: bool,
    ) -> Self {
        Self {
            width,
            height,
            dpr,
            format,
            dark,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dpr(&self) -> Dpr {
        self.dpr
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn dark(&self) -> bool {
        self.dark
    }

    /// Device pixel canvas: logical size times dpr, rounded half up.
    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.dpr.scale(self.width), self.dpr.scale(self.height))
    }

    /// Alt text for an `<img>` showing this placeholder.
    pub fn description(&self) -> String {
        let mut words = vec!["A".to_string()];
        if self.dark {
            words.push("dark".to_string());
        }
        words.push(
            if self.width == self.height {
                "square"
            } else {
                "rectangle"
            }
            .to_string(),
        );
        words.push(self.format.name().to_string());
        words.push("placeholder image".to_string());
        if self.dpr != Dpr::ONE {
            words.push(format!("scaled {} times", self.dpr));
        }
        words.join(" ")
    }
}

/// Canonical token: every group spelled out, so it parses back to the same value under any
/// config whose bounds admit it.
impl fmt::Display for ValidatedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}@{}x.{}",
            self.width, self.height, self.dpr, self.format
        )?;
        if self.dark {
            write!(f, "/{}", crate::grammar::DARK_MARKER)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/model.rs"]
mod tests;
