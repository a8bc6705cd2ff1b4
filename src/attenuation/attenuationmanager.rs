use serde::Deserialize;

use crate::attenuation::attenuationrelationship::StdDevType;
use crate::attenuation::kemptonstewart2006::{
    IntensityMeasure,
    KS2006Coefficients,
    KemptonStewart2006
};
use crate::manager::manager::Manager;
use crate::manager::managererror::ManagerError;

#[derive(Deserialize)]
struct KemptonStewart2006JsonProp {
    #[serde(default = "default_intensity_measure")]
    intensity_measure: IntensityMeasure,
    #[serde(default = "default_std_dev_type")]
    std_dev_type: StdDevType,
    #[serde(default)]
    coefficients: Option<KS2006Coefficients>
}

fn default_intensity_measure() -> IntensityMeasure {
    IntensityMeasure::Da575
}

fn default_std_dev_type() -> StdDevType {
    StdDevType::Total
}

/// 強度量與標準差類型的名稱在反序列化時驗證，未知名稱回傳 `JsonParseError`。
fn get_kempton_stewart_from_json(json_value: serde_json::Value) -> Result<KemptonStewart2006, ManagerError> {
    let json_prop: KemptonStewart2006JsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    let mut model = KemptonStewart2006::new();
    model.set_intensity_measure_type(json_prop.intensity_measure);
    model.set_std_dev_type_value(json_prop.std_dev_type);
    if let Some(coefficients) = json_prop.coefficients {
        model.set_coefficients(coefficients)?;
    }
    Ok(model)
}


pub struct AttenuationManager;

impl AttenuationManager {
    pub fn new() -> Manager<KemptonStewart2006> {
        Manager::new(get_kempton_stewart_from_json)
    }
}
