use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::Deserialize;

use crate::attenuation::attenuationerror::AttenuationError;
use crate::attenuation::attenuationrelationship::{
    AttenuationRelationship,
    StdDevType
};
use crate::attenuation::parameterwarning::{
    ParameterRange,
    ParameterWarning,
    TracingWarningSink,
    WarningSink
};
use crate::magdist::momentmagnitude::seismic_moment;

// ─────────────────────────────────────────────────────────────────────────────
// 常數
// ─────────────────────────────────────────────────────────────────────────────

/// 震源處剪力波速（km/s）。
const BETA: f64 = 3.2;

/// 角頻率公式 f0 = 4.9e6 β (Δσ / M0)^(1/3) 的常數。
const CORNER_FREQUENCY_CONSTANT: f64 = 4.9e6;

pub const MAGNITUDE_RANGE: ParameterRange = ParameterRange::new("Magnitude", 5.0, 7.6);
pub const DISTANCE_RUP_RANGE: ParameterRange = ParameterRange::new("DistanceRup", 0.0, 200.0);
pub const VS30_RANGE: ParameterRange = ParameterRange::new("Vs30", 150.0, 1500.0);

const DEFAULT_MAGNITUDE: f64 = 7.0;
const DEFAULT_DISTANCE_RUP: f64 = 0.0;
const DEFAULT_VS30: f64 = 760.0;

// ─────────────────────────────────────────────────────────────────────────────
// IntensityMeasure
// ─────────────────────────────────────────────────────────────────────────────

/// 加速度歷時的顯著延時（significant duration），單位秒。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum IntensityMeasure {
    #[serde(rename = "Da5-75")]
    Da575,
    #[serde(rename = "Da5-95")]
    Da595
}

impl IntensityMeasure {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntensityMeasure::Da575 => "Da5-75",
            IntensityMeasure::Da595 => "Da5-95"
        }
    }

    pub fn coefficients(&self) -> KS2006Coefficients {
        match self {
            IntensityMeasure::Da575 => KS2006Coefficients {
                b1: 2.79, b2: 0.82, c1: 0.15, c2: 3.00, c3: -0.0041, tau: 0.32, sigma: 0.42
            },
            IntensityMeasure::Da595 => KS2006Coefficients {
                b1: 2.53, b2: 1.04, c1: 0.28, c2: 5.80, c3: -0.0045, tau: 0.26, sigma: 0.35
            }
        }
    }
}

impl fmt::Display for IntensityMeasure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IntensityMeasure {
    type Err = AttenuationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Da5-75" => Ok(IntensityMeasure::Da575),
            "Da5-95" => Ok(IntensityMeasure::Da595),
            _ => Err(AttenuationError::UnknownIntensityMeasure(s.to_owned()))
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// KS2006Coefficients
// ─────────────────────────────────────────────────────────────────────────────

/// 迴歸係數。`b1`、`b2` 決定應力降，`c1` 為路徑項（s/km），
/// `c2 + c3 * Vs30` 為場址項（s），`tau`、`sigma` 為事件間/事件內 ln 標準差。
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct KS2006Coefficients {
    pub b1: f64,
    pub b2: f64,
    pub c1: f64,
    pub c2: f64,
    pub c3: f64,
    pub tau: f64,
    pub sigma: f64
}

impl KS2006Coefficients {
    fn validate(&self) -> Result<(), AttenuationError> {
        let named = [
            ("b1", self.b1), ("b2", self.b2), ("c1", self.c1), ("c2", self.c2),
            ("c3", self.c3), ("tau", self.tau), ("sigma", self.sigma)
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(AttenuationError::InvalidCoefficient { name, value });
            }
        }
        if self.c1 < 0.0 {
            return Err(AttenuationError::InvalidCoefficient { name: "c1", value: self.c1 });
        }
        if self.tau < 0.0 {
            return Err(AttenuationError::InvalidCoefficient { name: "tau", value: self.tau });
        }
        if self.sigma < 0.0 {
            return Err(AttenuationError::InvalidCoefficient { name: "sigma", value: self.sigma });
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// KemptonStewart2006
// ─────────────────────────────────────────────────────────────────────────────

/// Kempton & Stewart (2006) 顯著延時預測式。
///
/// ```text
/// Δσ   = exp(b1 + b2 (M - 6))
/// f0   = 4.9e6 β (Δσ / M0)^(1/3)
/// S    = max(c2 + c3 Vs30, 0)
/// ln D = ln(1 / f0 + c1 Rrup + S)
/// ```
///
/// 場址項 `S` 在 0 截斷：`c3 < 0`，Vs30 超過 `-c2 / c3`（Da5-75 約 732 m/s，
/// Da5-95 約 1289 m/s）後場址不再縮短延時，`site_duration` 固定為 0。
///
/// 強度量與標準差類型在設定時驗證一次；之後的計算不會修改任何狀態。
#[derive(Clone)]
pub struct KemptonStewart2006 {
    intensity_measure: IntensityMeasure,
    std_dev_type: StdDevType,
    coefficients: KS2006Coefficients,
    magnitude: f64,
    distance_rup: f64,
    vs30: f64,
    warning_sink: Arc<dyn WarningSink>
}

impl KemptonStewart2006 {
    pub const NAME: &'static str = "Kempton & Stewart (2006)";
    pub const SHORT_NAME: &'static str = "KS2006";

    pub fn new() -> KemptonStewart2006 {
        KemptonStewart2006::with_warning_sink(Arc::new(TracingWarningSink))
    }

    pub fn with_warning_sink(warning_sink: Arc<dyn WarningSink>) -> KemptonStewart2006 {
        let intensity_measure = IntensityMeasure::Da575;
        KemptonStewart2006 {
            intensity_measure,
            std_dev_type: StdDevType::Total,
            coefficients: intensity_measure.coefficients(),
            magnitude: DEFAULT_MAGNITUDE,
            distance_rup: DEFAULT_DISTANCE_RUP,
            vs30: DEFAULT_VS30,
            warning_sink
        }
    }

    /// 還原預設參數（M 7.0、Rrup 0 km、Vs30 760 m/s、Da5-75、Total）。
    pub fn set_param_defaults(&mut self) {
        self.intensity_measure = IntensityMeasure::Da575;
        self.std_dev_type = StdDevType::Total;
        self.coefficients = self.intensity_measure.coefficients();
        self.magnitude = DEFAULT_MAGNITUDE;
        self.distance_rup = DEFAULT_DISTANCE_RUP;
        self.vs30 = DEFAULT_VS30;
    }

    pub fn set_warning_sink(&mut self, warning_sink: Arc<dyn WarningSink>) {
        self.warning_sink = warning_sink;
    }

    // ── 設定 ────────────────────────────────────────────────────────────────

    pub fn intensity_measure(&self) -> IntensityMeasure {
        self.intensity_measure
    }

    /// 依名稱選擇強度量並載入對應的係數列（會覆蓋先前的自訂係數）。
    pub fn set_intensity_measure(&mut self, name: &str) -> Result<(), AttenuationError> {
        let intensity_measure: IntensityMeasure = name.parse()?;
        self.set_intensity_measure_type(intensity_measure);
        Ok(())
    }

    pub fn set_intensity_measure_type(&mut self, intensity_measure: IntensityMeasure) {
        self.intensity_measure = intensity_measure;
        self.coefficients = intensity_measure.coefficients();
    }

    pub fn std_dev_type(&self) -> StdDevType {
        self.std_dev_type
    }

    pub fn set_std_dev_type(&mut self, name: &str) -> Result<(), AttenuationError> {
        self.std_dev_type = name.parse()?;
        Ok(())
    }

    pub fn set_std_dev_type_value(&mut self, std_dev_type: StdDevType) {
        self.std_dev_type = std_dev_type;
    }

    pub fn coefficients(&self) -> &KS2006Coefficients {
        &self.coefficients
    }

    /// 以自訂係數取代目前強度量的係數列。
    pub fn set_coefficients(&mut self, coefficients: KS2006Coefficients) -> Result<(), AttenuationError> {
        coefficients.validate()?;
        self.coefficients = coefficients;
        Ok(())
    }

    // ── 參數 ────────────────────────────────────────────────────────────────

    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn distance_rup(&self) -> f64 {
        self.distance_rup
    }

    pub fn vs30(&self) -> f64 {
        self.vs30
    }

    pub fn set_magnitude(&mut self, magnitude: f64) -> Vec<ParameterWarning> {
        self.magnitude = magnitude;
        self.report(MAGNITUDE_RANGE.check(magnitude))
    }

    pub fn set_distance_rup(&mut self, distance_rup: f64) -> Vec<ParameterWarning> {
        self.distance_rup = distance_rup;
        self.report(DISTANCE_RUP_RANGE.check(distance_rup))
    }

    pub fn set_vs30(&mut self, vs30: f64) -> Vec<ParameterWarning> {
        self.vs30 = vs30;
        self.report(VS30_RANGE.check(vs30))
    }

    fn report(&self, warning: Option<ParameterWarning>) -> Vec<ParameterWarning> {
        let warnings: Vec<ParameterWarning> = warning.into_iter().collect();
        warnings.iter().for_each(|w| self.warning_sink.warn(w));
        warnings
    }

    // ── 計算 ────────────────────────────────────────────────────────────────

    /// 以目前設定的參數計算 ln D。
    pub fn mean(&self) -> f64 {
        self.mean_at(self.magnitude, self.distance_rup, self.vs30)
    }

    /// 震源延時 1 / f0（秒）。
    pub fn source_duration(&self, mag: f64) -> f64 {
        let stress_drop = (self.coefficients.b1 + self.coefficients.b2 * (mag - 6.0)).exp();
        let corner_frequency =
            CORNER_FREQUENCY_CONSTANT * BETA * (stress_drop / seismic_moment(mag)).cbrt();
        1.0 / corner_frequency
    }

    pub fn path_duration(&self, distance_rup: f64) -> f64 {
        self.coefficients.c1 * distance_rup.max(0.0)
    }

    pub fn site_duration(&self, vs30: f64) -> f64 {
        (self.coefficients.c2 + self.coefficients.c3 * vs30).max(0.0)
    }
}

impl Default for KemptonStewart2006 {
    fn default() -> Self {
        KemptonStewart2006::new()
    }
}

impl AttenuationRelationship for KemptonStewart2006 {
    fn name(&self) -> &'static str {
        KemptonStewart2006::NAME
    }

    fn short_name(&self) -> &'static str {
        KemptonStewart2006::SHORT_NAME
    }

    fn mean_at(&self, mag: f64, distance: f64, vs30: f64) -> f64 {
        (self.source_duration(mag) + self.path_duration(distance) + self.site_duration(vs30)).ln()
    }

    fn std_dev(&self) -> f64 {
        self.std_dev_type.combine(self.coefficients.tau, self.coefficients.sigma)
    }

    fn check_ranges(&self, mag: f64, distance: f64, vs30: f64) -> Vec<ParameterWarning> {
        [
            MAGNITUDE_RANGE.check(mag),
            DISTANCE_RUP_RANGE.check(distance),
            VS30_RANGE.check(vs30)
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
