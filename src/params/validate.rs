use std::fmt;

use crate::{
    config::Config,
    format::Format,
    foundation::core::{Dpr, DprParseError},
    grammar::{MalformedToken, RawFields},
    params::model::ValidatedParameters,
};

/// Which part of the token an [`Issue`] is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    /// The token as a whole (grammar mismatch).
    Token,
    Width,
    Height,
    Dpr,
    Format,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::Token => "token",
            Field::Width => "width",
            Field::Height => "height",
            Field::Dpr => "dpr",
            Field::Format => "format",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MalformedToken,
    OutOfRange,
    UnsupportedFormat,
}

/// The rule a raw value broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Grammar(String),
    Positive,
    Maximum(String),
    OneOf(String),
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Grammar(expected) => write!(f, "expected {expected}"),
            Constraint::Positive => f.write_str("must be positive"),
            Constraint::Maximum(max) => write!(f, "must be at most {max}"),
            Constraint::OneOf(names) => write!(f, "must be one of {names}"),
        }
    }
}

impl serde::Serialize for Constraint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One field-level violation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Issue {
    pub field: Field,
    pub constraint: Constraint,
    /// Offending raw text.
    pub value: String,
    #[serde(rename = "code")]
    pub kind: IssueKind,
}

impl Issue {
    fn out_of_range(field: Field, constraint: Constraint, value: &str) -> Self {
        Self {
            field,
            constraint,
            value: value.to_string(),
            kind: IssueKind::OutOfRange,
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}' {}", self.field.name(), self.value, self.constraint)
    }
}

/// Every issue found in one token, in field order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(transparent)]
pub struct Issues(Vec<Issue>);

impl Issues {
    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.0.iter()
    }

    pub fn fields(&self) -> Vec<Field> {
        self.0.iter().map(|i| i.field).collect()
    }
}

impl From<MalformedToken> for Issues {
    fn from(err: MalformedToken) -> Self {
        Issues(vec![Issue {
            field: Field::Token,
            constraint: Constraint::Grammar(format!(
                "{} at byte {}",
                err.expected, err.offset
            )),
            value: err.token,
            kind: IssueKind::MalformedToken,
        }])
    }
}

impl fmt::Display for Issues {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Issues {}

/// Coerce raw fields into bounded parameters.
///
/// All fields are checked; the error lists every violation, never just the first.
pub fn validate(raw: &RawFields, config: &Config) -> Result<ValidatedParameters, Issues> {
    let mut issues = Vec::new();

    let width = check_dimension(Field::Width, &raw.width, config.max_width, &mut issues);
    let height = match raw.height.as_deref() {
        Some(h) => check_dimension(Field::Height, h, config.max_height, &mut issues),
        // An omitted height copies the width and is bounded as a height.
        None => match width {
            Some(_) => {
                check_dimension(Field::Height, &raw.width, config.max_height, &mut issues)
            }
            None => None,
        },
    };
    let dpr = match raw.dpr.as_deref() {
        Some(d) => check_dpr(d, config.max_dpr, &mut issues),
        None => Some(Dpr::ONE),
    };
    let format = match raw.format.as_deref() {
        Some(f) => check_format(f, config, &mut issues),
        None => Some(config.default_format),
    };

    match (width, height, dpr, format) {
        (Some(width), Some(height), Some(dpr), Some(format)) if issues.is_empty() => Ok(
            ValidatedParameters::new_unchecked(width, height, dpr, format, raw.dark),
        ),
        _ => Err(Issues(issues)),
    }
}

fn check_dimension(field: Field, raw: &str, max: u32, issues: &mut Vec<Issue>) -> Option<u32> {
    let Ok(v) = raw.parse::<u32>() else {
        issues.push(Issue::out_of_range(
            field,
            Constraint::Maximum(max.to_string()),
            raw,
        ));
        return None;
    };
    if v == 0 {
        issues.push(Issue::out_of_range(field, Constraint::Positive, raw));
        return None;
    }
    if v > max {
        issues.push(Issue::out_of_range(
            field,
            Constraint::Maximum(max.to_string()),
            raw,
        ));
        return None;
    }
    Some(v)
}

fn check_dpr(raw: &str, max: Dpr, issues: &mut Vec<Issue>) -> Option<Dpr> {
    let max_constraint = || Constraint::Maximum(max.to_string());
    let dpr = match raw.parse::<Dpr>() {
        Ok(d) => d,
        Err(DprParseError::Overflow) => {
            issues.push(Issue::out_of_range(Field::Dpr, max_constraint(), raw));
            return None;
        }
        Err(DprParseError::Syntax) => {
            issues.push(Issue {
                field: Field::Dpr,
                constraint: Constraint::Grammar(
                    "digits with at most one fractional digit".to_string(),
                ),
                value: raw.to_string(),
                kind: IssueKind::MalformedToken,
            });
            return None;
        }
    };
    if !dpr.is_positive() {
        issues.push(Issue::out_of_range(Field::Dpr, Constraint::Positive, raw));
        return None;
    }
    if dpr > max {
        issues.push(Issue::out_of_range(Field::Dpr, max_constraint(), raw));
        return None;
    }
    Some(dpr)
}

fn check_format(raw: &str, config: &Config, issues: &mut Vec<Issue>) -> Option<Format> {
    match raw.parse::<Format>() {
        Ok(f) if config.is_supported(f) => Some(f),
        _ => {
            issues.push(Issue {
                field: Field::Format,
                constraint: Constraint::OneOf(config.supported_names()),
                value: raw.to_string(),
                kind: IssueKind::UnsupportedFormat,
            });
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/validate.rs"]
mod tests;
