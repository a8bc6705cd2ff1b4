use crate::magdist::magfreqdisterror::MagFreqDistError;
use crate::magdist::momentmagnitude::seismic_moment;
use crate::math::function::discretizedfunction::{
    EvenlyDiscretizedFunction,
    Point2D
};

/// 規模-頻率分布：以規模為 x 軸的等間距離散函數，y 為每個 bin 的年發生率。
///
/// 累積發生率與地震矩率一律由目前的 y 值即時計算，不做快取，
/// 因此任何修改後讀到的統計量都與 y 值一致。
#[derive(Debug, Clone, PartialEq)]
pub struct MagFreqDist {
    function: EvenlyDiscretizedFunction
}

impl MagFreqDist {
    /// 以上下限與 bin 數建立，`delta = (mag_upper - mag_lower) / (num - 1)`。
    pub fn new(mag_lower: f64, mag_upper: f64, num: usize) -> Result<MagFreqDist, MagFreqDistError> {
        validate_range(mag_lower, mag_upper, num)?;
        let function = EvenlyDiscretizedFunction::from_range(mag_lower, mag_upper, num)?;
        Ok(MagFreqDist { function })
    }

    /// 以下限、bin 數與 bin 寬建立。
    pub fn with_delta(mag_lower: f64, num: usize, delta: f64) -> Result<MagFreqDist, MagFreqDistError> {
        if !mag_lower.is_finite() {
            return Err(MagFreqDistError::invalid_parameter(format!("mag_lower must be finite, got {}", mag_lower)));
        }
        let function = EvenlyDiscretizedFunction::new(mag_lower, num, delta)?;
        Ok(MagFreqDist { function })
    }

    pub fn mag_lower(&self) -> f64 {
        self.function.min_x()
    }

    pub fn mag_upper(&self) -> f64 {
        self.function.max_x()
    }

    pub fn delta(&self) -> f64 {
        self.function.delta()
    }

    pub fn num(&self) -> usize {
        self.function.size()
    }

    pub fn x(&self, index: usize) -> Result<f64, MagFreqDistError> {
        Ok(self.function.x(index)?)
    }

    pub fn y(&self, index: usize) -> Result<f64, MagFreqDistError> {
        Ok(self.function.y(index)?)
    }

    pub fn y_at(&self, mag: f64) -> Result<f64, MagFreqDistError> {
        Ok(self.function.y_at(mag)?)
    }

    pub fn set(&mut self, index: usize, rate: f64) -> Result<(), MagFreqDistError> {
        Ok(self.function.set(index, rate)?)
    }

    pub fn set_at(&mut self, mag: f64, rate: f64) -> Result<(), MagFreqDistError> {
        Ok(self.function.set_at(mag, rate)?)
    }

    pub fn index_of(&self, mag: f64) -> Result<usize, MagFreqDistError> {
        Ok(self.function.index_of(mag)?)
    }

    pub fn rates(&self) -> &[f64] {
        self.function.y_values()
    }

    pub fn function(&self) -> &EvenlyDiscretizedFunction {
        &self.function
    }

    pub fn iter(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.function.iter()
    }

    /// 依 bin 中心規模重新填入所有發生率。
    pub fn set_all_rates(&mut self, rate: impl Fn(f64) -> f64) {
        self.function.set_all_y(rate);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 統計量
    // ─────────────────────────────────────────────────────────────────────────

    /// 規模 >= `mag_lower` 的年發生率。
    pub fn tot_cum_rate(&self) -> f64 {
        self.function.sum_y()
    }

    /// 年地震矩率（dyne-cm / yr）。
    pub fn total_moment_rate(&self) -> f64 {
        self.function
            .iter()
            .map(|pt| pt.y() * seismic_moment(pt.x()))
            .sum()
    }

    pub fn moment_rate(&self, index: usize) -> Result<f64, MagFreqDistError> {
        let mag = self.x(index)?;
        Ok(self.y(index)? * seismic_moment(mag))
    }

    /// 從最接近 `mag` 的 bin 起算（含）到最後一個 bin 的累積發生率。
    pub fn cum_rate(&self, mag: f64) -> Result<f64, MagFreqDistError> {
        let index = self.index_of(mag)?;
        Ok(self.rates()[index..].iter().sum())
    }

    /// 互補累積分布：第 `i` 點為規模 >= x(i) 的發生率。
    pub fn cum_rate_dist(&self) -> Result<EvenlyDiscretizedFunction, MagFreqDistError> {
        let mut cum = EvenlyDiscretizedFunction::new(self.mag_lower(), self.num(), self.delta())?;
        let mut running = 0.0;
        for i in (0..self.num()).rev() {
            running += self.rates()[i];
            cum.set(i, running)?;
        }
        Ok(cum)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 縮放
    // ─────────────────────────────────────────────────────────────────────────

    pub fn scale_to_cum_rate(&mut self, tot_cum_rate: f64) -> Result<(), MagFreqDistError> {
        let current = self.tot_cum_rate();
        self.scale_to(tot_cum_rate, current, "total cumulative rate")
    }

    pub fn scale_to_moment_rate(&mut self, tot_moment_rate: f64) -> Result<(), MagFreqDistError> {
        let current = self.total_moment_rate();
        self.scale_to(tot_moment_rate, current, "total moment rate")
    }

    fn scale_to(&mut self, target: f64, current: f64, what: &str) -> Result<(), MagFreqDistError> {
        if !(target.is_finite() && target >= 0.0) {
            return Err(MagFreqDistError::invalid_parameter(format!("{} must be non-negative, got {}", what, target)));
        }
        if current <= 0.0 {
            return Err(MagFreqDistError::invalid_parameter(format!("cannot scale a distribution whose {} is {}", what, current)));
        }
        self.function.scale(target / current);
        Ok(())
    }
}

pub(crate) fn validate_range(mag_lower: f64, mag_upper: f64, num: usize) -> Result<(), MagFreqDistError> {
    if num < 2 {
        return Err(MagFreqDistError::invalid_parameter(format!("num must be at least 2, got {}", num)));
    }
    if !(mag_lower.is_finite() && mag_upper.is_finite()) {
        return Err(MagFreqDistError::invalid_parameter("magnitude bounds must be finite"));
    }
    if mag_upper <= mag_lower {
        return Err(MagFreqDistError::invalid_parameter(
            format!("mag_upper ({}) must exceed mag_lower ({})", mag_upper, mag_lower)
        ));
    }
    Ok(())
}
