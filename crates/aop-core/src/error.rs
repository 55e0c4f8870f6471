//! Domain validation errors

use aop_common::AopError;
use thiserror::Error;

/// Raised when an entity would be constructed in an invalid state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{entity}: required field '{field}' is missing or empty")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    #[error("Relationship cannot connect key event {uri} to itself")]
    SelfLoop { uri: String },
}

impl ValidationError {
    pub(crate) fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }
}

/// Fail with [`ValidationError::MissingField`] when `value` is empty
pub(crate) fn require(
    value: &str,
    entity: &'static str,
    field: &'static str,
) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::missing(entity, field))
    } else {
        Ok(())
    }
}

impl From<ValidationError> for AopError {
    fn from(err: ValidationError) -> Self {
        AopError::Validation(err.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("888", "KeyEvent", "ke_id").is_ok());
        let err = require("", "KeyEvent", "ke_id").unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                entity: "KeyEvent",
                field: "ke_id"
            }
        );
    }

    #[test]
    fn test_conversion_to_aop_error() {
        let err: AopError = ValidationError::SelfLoop {
            uri: "https://identifiers.org/aop.events/1".to_string(),
        }
        .into();
        assert!(matches!(err, AopError::Validation(_)));
        assert!(err.to_string().contains("aop.events/1"));
    }
}
