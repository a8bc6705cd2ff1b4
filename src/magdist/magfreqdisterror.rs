use thiserror::Error;

use crate::math::function::discretizedfunction::DiscretizedFunctionError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MagFreqDistError {
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error(transparent)]
    Function(#[from] DiscretizedFunctionError)
}

impl MagFreqDistError {
    pub fn invalid_parameter(message: impl Into<String>) -> MagFreqDistError {
        MagFreqDistError::InvalidParameter(message.into())
    }
}
