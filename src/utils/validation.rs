use crate::utils::error::{Result, RetrieverError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn invalid_value(field: &str, value: impl ToString, reason: impl Into<String>) -> RetrieverError {
    RetrieverError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}
