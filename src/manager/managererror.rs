use serde::Deserialize;
use thiserror::Error;

use crate::attenuation::attenuationerror::AttenuationError;
use crate::magdist::magfreqdisterror::MagFreqDistError;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error(transparent)]
    IOError(#[from] std::io::Error),
    #[error(transparent)]
    JsonParseError(#[from] serde_json::Error),
    #[error("key '{0}' not found")]
    NameNotFoundError(String),
    #[error(transparent)]
    MagFreqDistError(#[from] MagFreqDistError),
    #[error(transparent)]
    AttenuationError(#[from] AttenuationError)
}

impl ManagerError {
    pub fn from_json_or_json_parse_error<T>(json_value: serde_json::Value) -> Result<T, Self>
        where T: for<'a> Deserialize<'a> {
        Ok(serde_json::from_value(json_value)?)
    }

    pub fn map_elem_not_found(name: &str) -> ManagerError {
        ManagerError::NameNotFoundError(name.to_owned())
    }
}
