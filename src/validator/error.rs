use thiserror::Error;

/// Structured validation failure.
///
/// Every variant is terminal for the request. The `Display` text is the fixed,
/// client-facing reason; schema detail only ever goes to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Rejection {
    #[error("Not found.")]
    RouteNotFound,
    #[error("Method not allowed.")]
    MethodNotAllowed,
    #[error("Invalid extra parameters.")]
    UnexpectedParameters,
    #[error("Missing parameters.")]
    MissingParameter,
    #[error("Invalid parameter type.")]
    InvalidParameterType,
    #[error("Enumeration error.")]
    EnumViolation,
    #[error("Invalid extra body.")]
    UnexpectedBody,
    #[error("Datatype mismatch.")]
    ContentTypeMismatch,
    #[error("Schema does not exist.")]
    SchemaNotFound,
    #[error("Missing field.")]
    MissingField,
    #[error("Invalid field type.")]
    InvalidFieldType,
    /// Generic failure of a nested component; the inner cause is not carried.
    #[error("Validation error.")]
    ValidationError,
    #[error("Malformed body.")]
    MalformedBody,
    /// The handler produced a payload that breaks the contract.
    #[error("Invalid response.")]
    InvalidResponse,
}

impl Rejection {
    /// HTTP status returned to the client for this rejection.
    #[must_use]
    pub fn status(self) -> u16 {
        match self {
            Rejection::RouteNotFound => 404,
            Rejection::MethodNotAllowed => 405,
            _ => 400,
        }
    }

    /// Stable identifier used in logs and CLI output.
    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            Rejection::RouteNotFound => "RouteNotFound",
            Rejection::MethodNotAllowed => "MethodNotAllowed",
            Rejection::UnexpectedParameters => "UnexpectedParameters",
            Rejection::MissingParameter => "MissingParameter",
            Rejection::InvalidParameterType => "InvalidParameterType",
            Rejection::EnumViolation => "EnumViolation",
            Rejection::UnexpectedBody => "UnexpectedBody",
            Rejection::ContentTypeMismatch => "ContentTypeMismatch",
            Rejection::SchemaNotFound => "SchemaNotFound",
            Rejection::MissingField => "MissingField",
            Rejection::InvalidFieldType => "InvalidFieldType",
            Rejection::ValidationError => "ValidationError",
            Rejection::MalformedBody => "MalformedBody",
            Rejection::InvalidResponse => "InvalidResponse",
        }
    }
}
