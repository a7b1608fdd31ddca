use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    Validation(String, String),

    #[error("Unknown production status '{0}' (expected PLANTED, HARVESTED or SOLD)")]
    UnknownStatus(String),

    #[error("No fields provided for update")]
    EmptyPatch,
}

impl CoreError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        CoreError::Validation(field.to_string(), message.into())
    }
}
