use crate::grammar::MalformedToken;
use crate::params::Issues;

pub type PlaceholdResult<T> = Result<T, PlaceholdError>;

#[derive(thiserror::Error, Debug)]
pub enum PlaceholdError {
    #[error(transparent)]
    MalformedToken(#[from] MalformedToken),

    #[error("invalid parameters: {0}")]
    Invalid(#[from] Issues),

    #[error("font fetch error: {0}")]
    FontFetch(String),

    #[error("render error: {0}")]
    Render(String),

    #[error("request timed out after {0}ms")]
    Timeout(u64),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlaceholdError {
    pub fn font_fetch(msg: impl Into<String>) -> Self {
        Self::FontFetch(msg.into())
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// `true` for failures caused by the request token itself.
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::MalformedToken(_) | Self::Invalid(_))
    }
}
