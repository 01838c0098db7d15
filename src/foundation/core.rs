use std::fmt;
use std::str::FromStr;

/// Output canvas dimensions in device pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Device pixel ratio in fixed-point tenths.
///
/// Accepted textual form is `DIGIT+ ('.' DIGIT)?`, so every value is an exact multiple of 0.1 and
/// formatting then parsing always yields the same value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Dpr(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DprParseError {
    #[error("expected digits with at most one fractional digit")]
    Syntax,
    #[error("value is too large")]
    Overflow,
}

impl Dpr {
    pub const ONE: Dpr = Dpr(10);

    pub const fn from_tenths(tenths: u32) -> Self {
        Self(tenths)
    }

    pub fn from_whole(n: u32) -> Option<Self> {
        n.checked_mul(10).map(Self)
    }

    pub fn tenths(self) -> u32 {
        self.0
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Scale a logical length to device pixels, rounding half up.
    pub fn scale(self, logical: u32) -> u32 {
        let scaled = (u64::from(logical) * u64::from(self.0) + 5) / 10;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

impl Default for Dpr {
    fn default() -> Self {
        Self::ONE
    }
}

impl FromStr for Dpr {
    type Err = DprParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (s, None),
        };

        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DprParseError::Syntax);
        }
        let frac_digit = match frac {
            None => 0,
            Some(f) if f.len() == 1 && f.as_bytes()[0].is_ascii_digit() => {
                u32::from(f.as_bytes()[0] - b'0')
            }
            Some(_) => return Err(DprParseError::Syntax),
        };

        let whole: u32 = whole.parse().map_err(|_| DprParseError::Overflow)?;
        whole
            .checked_mul(10)
            .and_then(|t| t.checked_add(frac_digit))
            .map(Self)
            .ok_or(DprParseError::Overflow)
    }
}

impl fmt::Display for Dpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = (self.0 / 10, self.0 % 10);
        if frac == 0 {
            write!(f, "{whole}")
        } else {
            write!(f, "{whole}.{frac}")
        }
    }
}

impl serde::Serialize for Dpr {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> serde::Deserialize<'de> for Dpr {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Text(s) => s.parse().map_err(serde::de::Error::custom),
            Repr::Num(v) => {
                let tenths = v * 10.0;
                if !v.is_finite() || v < 0.0 || (tenths - tenths.round()).abs() > 1e-9 {
                    return Err(serde::de::Error::custom(
                        "dpr must be a non-negative multiple of 0.1",
                    ));
                }
                if tenths.round() > f64::from(u32::MAX) {
                    return Err(serde::de::Error::custom("dpr is too large"));
                }
                Ok(Self(tenths.round() as u32))
            }
        }
    }
}

/// Opaque sRGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// Build from a `0xRRGGBB` literal.
    pub const fn hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
