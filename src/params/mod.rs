//! Parameter coercion and validation.

pub(crate) mod model;
pub(crate) mod validate;

pub use model::ValidatedParameters;
pub use validate::{Constraint, Field, Issue, IssueKind, Issues, validate};

use crate::{
    config::Config,
    foundation::error::PlaceholdResult,
    grammar::tokenize,
};

/// Tokenize and validate in one step.
///
/// A grammar mismatch short-circuits as [`crate::PlaceholdError::MalformedToken`]; field
/// violations come back together as [`crate::PlaceholdError::Invalid`].
pub fn parse(token: &str, config: &Config) -> PlaceholdResult<ValidatedParameters> {
    let raw = tokenize(token)?;
    Ok(validate(&raw, config)?)
}
