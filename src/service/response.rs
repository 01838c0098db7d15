use base64::Engine as _;

use crate::{
    foundation::error::PlaceholdError,
    params::{Issues, ValidatedParameters},
    render::RenderedArtifact,
};

pub const JSON: &str = "application/json";

/// Response payload, kept apart from headers so transports can pick an encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    Text(String),
    Binary(Vec<u8>),
}

impl Body {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Text(s) => s.as_bytes(),
            Body::Binary(b) => b,
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Body::Text(s) => s.into_bytes(),
            Body::Binary(b) => b,
        }
    }

    /// `(payload, is_base64)` for transports that only carry strings.
    pub fn to_transport(&self) -> (String, bool) {
        match self {
            Body::Text(s) => (s.clone(), false),
            Body::Binary(b) => (base64::engine::general_purpose::STANDARD.encode(b), true),
        }
    }
}

/// A transport-neutral HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(&'static str, String)>,
    pub body: Body,
}

#[derive(serde::Serialize)]
struct ErrorBody<'a> {
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    issues: Option<&'a Issues>,
}

impl Response {
    /// First header named `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn rendered(
        params: &ValidatedParameters,
        artifact: RenderedArtifact,
        cache_max_age: u64,
    ) -> Self {
        let body = if artifact.is_binary {
            Body::Binary(artifact.bytes)
        } else {
            match String::from_utf8(artifact.bytes) {
                Ok(text) => Body::Text(text),
                Err(e) => Body::Binary(e.into_bytes()),
            }
        };
        Self {
            status: 200,
            headers: vec![
                ("Content-Type", artifact.media_type.to_string()),
                ("Cache-Control", format!("public, max-age={cache_max_age}")),
                ("X-Placeholder-Alt", params.description()),
            ],
            body,
        }
    }

    /// Map a pipeline failure to its status code and JSON body.
    ///
    /// Token problems expose their issues; server-side failures only a generic description.
    pub fn from_error(err: PlaceholdError) -> Self {
        match err {
            PlaceholdError::MalformedToken(m) => Self::invalid(&Issues::from(m)),
            PlaceholdError::Invalid(issues) => Self::invalid(&issues),
            PlaceholdError::FontFetch(_) => Self::failure(502, "Font unavailable"),
            PlaceholdError::Render(_) => Self::failure(500, "Render failed"),
            PlaceholdError::Timeout(_) => Self::failure(503, "Request timed out"),
            PlaceholdError::Config(_) | PlaceholdError::Other(_) => {
                Self::failure(500, "Internal error")
            }
        }
    }

    pub fn method_not_allowed() -> Self {
        let mut resp = Self::failure(405, "Method not allowed");
        resp.headers.push(("Allow", "GET, HEAD".to_string()));
        resp
    }

    fn invalid(issues: &Issues) -> Self {
        Self::json(
            422,
            &ErrorBody {
                description: "Invalid parameters",
                issues: Some(issues),
            },
        )
    }

    fn failure(status: u16, description: &str) -> Self {
        Self::json(
            status,
            &ErrorBody {
                description,
                issues: None,
            },
        )
    }

    fn json(status: u16, body: &ErrorBody<'_>) -> Self {
        // Serializing plain strings and enums cannot fail.
        let text = serde_json::to_string(body).unwrap_or_default();
        Self {
            status,
            headers: vec![("Content-Type", JSON.to_string())],
            body: Body::Text(text),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/service/response.rs"]
mod tests;
