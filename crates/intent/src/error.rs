use thiserror::Error;

use crate::action::Action;

/// Why a query did not produce a usable action.
///
/// The `Display` text of each variant is what the user sees; [`QueryError::into_action`]
/// turns any of them into `Action::Error` so nothing escapes the interpretation boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("Please provide a non-empty {field}.")]
    InvalidInput { field: &'static str },

    #[error(
        "Failed to reach the interpretation service ({0}). Please check your API key or try again."
    )]
    OracleTransportFailure(String),

    #[error(
        "The interpretation service returned an unusable response ({0}). Try rephrasing your question."
    )]
    OracleMalformedResponse(String),

    #[error("Unknown region code `{0}`; nothing was visualized.")]
    UnknownRegionReference(String),

    #[error("Unsupported action `{0}`. Try asking to show, compare, or fly to regions.")]
    UnsupportedActionTag(String),

    #[error("Invalid `{field}` in response: {detail}.")]
    InvalidField { field: &'static str, detail: String },
}

impl QueryError {
    pub fn invalid_field(field: &'static str, detail: impl Into<String>) -> Self {
        QueryError::InvalidField {
            field,
            detail: detail.into(),
        }
    }

    pub fn into_action(self) -> Action {
        Action::error(self.to_string())
    }
}

/// Failures talking to the oracle service itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("credentials are not a valid header value")]
    InvalidCredentials,

    #[error("response carried no text")]
    EmptyResponse,
}

impl From<OracleError> for QueryError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::EmptyResponse => QueryError::OracleMalformedResponse(err.to_string()),
            OracleError::Transport(_)
            | OracleError::Status { .. }
            | OracleError::InvalidCredentials => QueryError::OracleTransportFailure(err.to_string()),
        }
    }
}
