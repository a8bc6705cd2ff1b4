use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttenuationError {
    #[error("unknown intensity measure '{0}'")]
    UnknownIntensityMeasure(String),
    #[error("unknown standard deviation type '{0}'")]
    UnknownStdDevType(String),
    #[error("invalid coefficient {name}: {value}")]
    InvalidCoefficient { name: &'static str, value: f64 }
}
