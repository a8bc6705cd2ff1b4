use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::attenuation::attenuationerror::AttenuationError;
use crate::attenuation::parameterwarning::ParameterWarning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum StdDevType {
    Total,
    #[serde(rename = "Inter-Event")]
    Inter,
    #[serde(rename = "Intra-Event")]
    Intra,
    None
}

impl StdDevType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StdDevType::Total => "Total",
            StdDevType::Inter => "Inter-Event",
            StdDevType::Intra => "Intra-Event",
            StdDevType::None => "None"
        }
    }

    /// 由事件間 (`tau`) 與事件內 (`sigma`) 標準差組合。
    pub fn combine(&self, tau: f64, sigma: f64) -> f64 {
        match self {
            StdDevType::Total => tau.hypot(sigma),
            StdDevType::Inter => tau,
            StdDevType::Intra => sigma,
            StdDevType::None => 0.0
        }
    }
}

impl fmt::Display for StdDevType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StdDevType {
    type Err = AttenuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Total" => Ok(StdDevType::Total),
            "Inter-Event" => Ok(StdDevType::Inter),
            "Intra-Event" => Ok(StdDevType::Intra),
            "None" => Ok(StdDevType::None),
            _ => Err(AttenuationError::UnknownStdDevType(s.to_owned()))
        }
    }
}

/// 地動衰減關係式。
///
/// 實作在設定完成後只做唯讀計算，`Send + Sync` 讓同一個模型可跨執行緒共用。
pub trait AttenuationRelationship: Send + Sync {
    fn name(&self) -> &'static str;

    fn short_name(&self) -> &'static str;

    /// 地動量中位數的自然對數。
    fn mean_at(&self, mag: f64, distance: f64, vs30: f64) -> f64;

    /// 目前選定標準差類型下的 ln 標準差。
    fn std_dev(&self) -> f64;

    fn check_ranges(&self, mag: f64, distance: f64, vs30: f64) -> Vec<ParameterWarning>;

    fn median_at(&self, mag: f64, distance: f64, vs30: f64) -> f64 {
        self.mean_at(mag, distance, vs30).exp()
    }
}
