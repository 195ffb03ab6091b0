#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CareError {
    #[error("Invalid credentials. Please try again.")]
    InvalidCredentials,
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("invalid coordinate for {field}: {value:?}")]
    InvalidCoordinate { field: &'static str, value: String },
}
