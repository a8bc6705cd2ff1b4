use tracing::debug;

use crate::magdist::magfreqdist::{
    validate_range,
    MagFreqDist
};
use crate::magdist::magfreqdisterror::MagFreqDistError;
use crate::math::round::grid_index;

/// `set_mag_upper` 可產生的 bin 數上限。
pub const MAX_NUM_BINS: usize = 1_000_000;

/// Gutenberg-Richter 規模-頻率分布。
///
/// 第 `i` 個 bin 的發生率為
///
/// ```text
/// y[i] = 10^(a - b (x[i] - delta/2)) - 10^(a - b (x[i] + delta/2))
/// ```
///
/// 所有 mutator 都先在區域變數中算出完整的新狀態，成功後才一次替換，
/// 失敗時物件保持原狀。
#[derive(Debug, Clone, PartialEq)]
pub struct GutenbergRichterMagFreqDist {
    dist: MagFreqDist,
    a_value: f64,
    b_value: f64
}

impl GutenbergRichterMagFreqDist {
    /// 由 b 值與 `[mag_lower, mag_upper]` 上的總累積發生率建立，a 值由積分式反解。
    pub fn new(
        b_value: f64,
        tot_cum_rate: f64,
        mag_lower: f64,
        mag_upper: f64,
        num: usize
    ) -> Result<GutenbergRichterMagFreqDist, MagFreqDistError> {
        validate_range(mag_lower, mag_upper, num)?;
        validate_b_value(b_value)?;
        validate_rate(tot_cum_rate, "tot_cum_rate")?;
        let dist = MagFreqDist::new(mag_lower, mag_upper, num)?;
        let a_value = a_value_for_cum_rate(&dist, b_value, tot_cum_rate)?;
        GutenbergRichterMagFreqDist::populated(dist, a_value, b_value)
    }

    /// 由 b 值與總地震矩率建立。
    pub fn with_moment_rate(
        b_value: f64,
        tot_moment_rate: f64,
        mag_lower: f64,
        mag_upper: f64,
        num: usize
    ) -> Result<GutenbergRichterMagFreqDist, MagFreqDistError> {
        validate_range(mag_lower, mag_upper, num)?;
        validate_b_value(b_value)?;
        validate_rate(tot_moment_rate, "tot_moment_rate")?;
        let dist = MagFreqDist::new(mag_lower, mag_upper, num)?;
        let a_value = a_value_for_moment_rate(&dist, b_value, tot_moment_rate)?;
        GutenbergRichterMagFreqDist::populated(dist, a_value, b_value)
    }

    /// 直接由 a、b 值建立。
    pub fn from_ab(
        a_value: f64,
        b_value: f64,
        mag_lower: f64,
        mag_upper: f64,
        num: usize
    ) -> Result<GutenbergRichterMagFreqDist, MagFreqDistError> {
        validate_a_value(a_value)?;
        validate_b_value(b_value)?;
        let dist = MagFreqDist::new(mag_lower, mag_upper, num)?;
        GutenbergRichterMagFreqDist::populated(dist, a_value, b_value)
    }

    /// 依 (a, b) 填入發生率；任何 bin 或矩率溢位成非有限值時回傳錯誤，不產生物件。
    fn populated(mut dist: MagFreqDist, a_value: f64, b_value: f64) -> Result<GutenbergRichterMagFreqDist, MagFreqDistError> {
        fill_rates(&mut dist, a_value, b_value);
        if !(dist.rates().iter().all(|y| y.is_finite()) && dist.total_moment_rate().is_finite()) {
            return Err(MagFreqDistError::invalid_parameter(format!(
                "a = {}, b = {} overflows the rates over [{}, {}]",
                a_value,
                b_value,
                dist.mag_lower(),
                dist.mag_upper()
            )));
        }
        debug!(
            a_value,
            b_value,
            mag_lower = dist.mag_lower(),
            mag_upper = dist.mag_upper(),
            num = dist.num(),
            "populated Gutenberg-Richter distribution"
        );
        Ok(GutenbergRichterMagFreqDist { dist, a_value, b_value })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn a_value(&self) -> f64 {
        self.a_value
    }

    pub fn b_value(&self) -> f64 {
        self.b_value
    }

    pub fn mag_lower(&self) -> f64 {
        self.dist.mag_lower()
    }

    pub fn mag_upper(&self) -> f64 {
        self.dist.mag_upper()
    }

    pub fn delta(&self) -> f64 {
        self.dist.delta()
    }

    pub fn num(&self) -> usize {
        self.dist.num()
    }

    pub fn x(&self, index: usize) -> Result<f64, MagFreqDistError> {
        self.dist.x(index)
    }

    pub fn y(&self, index: usize) -> Result<f64, MagFreqDistError> {
        self.dist.y(index)
    }

    pub fn tot_cum_rate(&self) -> f64 {
        self.dist.tot_cum_rate()
    }

    pub fn total_moment_rate(&self) -> f64 {
        self.dist.total_moment_rate()
    }

    /// 唯讀的底層分布；要修改 y 值請透過本型別的 mutator，以維持 a/b 與 y 的一致。
    pub fn dist(&self) -> &MagFreqDist {
        &self.dist
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutators
    // ─────────────────────────────────────────────────────────────────────────

    /// 固定 a、b、delta、mag_lower，改變上限。
    ///
    /// 要求的上限會對齊到最接近的格點（平手取較低者），
    /// 因此實際的 `mag_upper()` 可能與傳入值不同。
    pub fn set_mag_upper(&mut self, mag_upper: f64) -> Result<(), MagFreqDistError> {
        if !mag_upper.is_finite() {
            return Err(MagFreqDistError::invalid_parameter(format!("mag_upper must be finite, got {}", mag_upper)));
        }
        let intervals = grid_index(mag_upper, self.mag_lower(), self.delta());
        if intervals < 1.0 {
            return Err(MagFreqDistError::invalid_parameter(format!(
                "mag_upper {} leaves fewer than two bins above mag_lower {}",
                mag_upper,
                self.mag_lower()
            )));
        }
        if !(intervals < MAX_NUM_BINS as f64) {
            return Err(MagFreqDistError::invalid_parameter(format!(
                "mag_upper {} needs more than {} bins at delta {}",
                mag_upper,
                MAX_NUM_BINS,
                self.delta()
            )));
        }
        let num = intervals as usize + 1;
        let dist = MagFreqDist::with_delta(self.mag_lower(), num, self.delta())?;
        *self = GutenbergRichterMagFreqDist::populated(dist, self.a_value, self.b_value)?;
        Ok(())
    }

    pub fn increment_mag_upper(&mut self, delta_mag: f64) -> Result<(), MagFreqDistError> {
        self.set_mag_upper(self.mag_upper() + delta_mag)
    }

    /// 固定範圍，直接指定 a、b；累積發生率與矩率隨之改變。
    pub fn set_ab(&mut self, a_value: f64, b_value: f64) -> Result<(), MagFreqDistError> {
        validate_a_value(a_value)?;
        validate_b_value(b_value)?;
        *self = GutenbergRichterMagFreqDist::populated(self.dist.clone(), a_value, b_value)?;
        Ok(())
    }

    /// 固定範圍與總地震矩率，b 值加上 `delta_b` 後重新解出 a 值。
    pub fn increment_b(&mut self, delta_b: f64) -> Result<(), MagFreqDistError> {
        let b_value = self.b_value + delta_b;
        validate_b_value(b_value)?;
        let a_value = a_value_for_moment_rate(&self.dist, b_value, self.total_moment_rate())?;
        *self = GutenbergRichterMagFreqDist::populated(self.dist.clone(), a_value, b_value)?;
        Ok(())
    }

    /// 固定範圍與 b 值，重新解出 a 值使總地震矩率等於 `tot_moment_rate`。
    pub fn scale_to_moment_rate(&mut self, tot_moment_rate: f64) -> Result<(), MagFreqDistError> {
        validate_rate(tot_moment_rate, "tot_moment_rate")?;
        let a_value = a_value_for_moment_rate(&self.dist, self.b_value, tot_moment_rate)?;
        *self = GutenbergRichterMagFreqDist::populated(self.dist.clone(), a_value, self.b_value)?;
        Ok(())
    }

    /// 固定範圍與 b 值，重新解出 a 值使總累積發生率等於 `tot_cum_rate`。
    pub fn scale_to_cum_rate(&mut self, tot_cum_rate: f64) -> Result<(), MagFreqDistError> {
        validate_rate(tot_cum_rate, "tot_cum_rate")?;
        let a_value = a_value_for_cum_rate(&self.dist, self.b_value, tot_cum_rate)?;
        *self = GutenbergRichterMagFreqDist::populated(self.dist.clone(), a_value, self.b_value)?;
        Ok(())
    }

    /// 除 a 值外全部重設，a 值由總累積發生率反解；等同重新建構。
    pub fn set_all_but_a_value(
        &mut self,
        mag_lower: f64,
        mag_upper: f64,
        num: usize,
        b_value: f64,
        tot_cum_rate: f64
    ) -> Result<(), MagFreqDistError> {
        *self = GutenbergRichterMagFreqDist::new(b_value, tot_cum_rate, mag_lower, mag_upper, num)?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// 私有輔助函式
// ─────────────────────────────────────────────────────────────────────────────

fn bin_rate(mag: f64, delta: f64, a_value: f64, b_value: f64) -> f64 {
    10.0_f64.powf(a_value - b_value * (mag - delta / 2.0))
        - 10.0_f64.powf(a_value - b_value * (mag + delta / 2.0))
}

fn fill_rates(dist: &mut MagFreqDist, a_value: f64, b_value: f64) {
    let delta = dist.delta();
    dist.set_all_rates(|mag| bin_rate(mag, delta, a_value, b_value));
}

/// log10(1 - 10^(-x))，x > 0；以 `exp_m1` 保留小 x 的精度。
fn log10_one_minus_pow10_neg(x: f64) -> f64 {
    (-(-x * std::f64::consts::LN_10).exp_m1()).log10()
}

/// 反解 `tot_cum_rate = 10^(a - b (m_lo - d/2)) - 10^(a - b (m_hi + d/2))`。
///
/// 以對數形式計算，避免大 b 值時 10^(b m) 溢位。
fn a_value_for_cum_rate(dist: &MagFreqDist, b_value: f64, tot_cum_rate: f64) -> Result<f64, MagFreqDistError> {
    let delta = dist.delta();
    let width = dist.mag_upper() - dist.mag_lower() + delta;
    let a_value = tot_cum_rate.log10() + b_value * (dist.mag_lower() - delta / 2.0)
        - log10_one_minus_pow10_neg(b_value * width);
    solved_a_value(a_value)
}

/// 矩率對 10^a 為線性：a = log10(tot_moment_rate) - log10(a = 0 時的矩率)。
///
/// 第 `i` 個 bin 在 a = 0 時的矩率取 log10 為
/// `-b (x - d/2) + log10(1 - 10^(-b d)) + 1.5 x + 16.05`，
/// 以 log-sum-exp（提出最大項）加總，大 b 值時不會 underflow 成 0。
fn a_value_for_moment_rate(dist: &MagFreqDist, b_value: f64, tot_moment_rate: f64) -> Result<f64, MagFreqDistError> {
    let delta = dist.delta();
    let bin_factor = log10_one_minus_pow10_neg(b_value * delta);
    let log_terms: Vec<f64> = dist
        .iter()
        .map(|pt| -b_value * (pt.x() - delta / 2.0) + bin_factor + 1.5 * pt.x() + 16.05)
        .collect();
    let largest = log_terms.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let scaled_sum: f64 = log_terms.iter().map(|t| 10.0_f64.powf(t - largest)).sum();
    solved_a_value(tot_moment_rate.log10() - (largest + scaled_sum.log10()))
}

fn solved_a_value(a_value: f64) -> Result<f64, MagFreqDistError> {
    if a_value.is_finite() {
        Ok(a_value)
    } else {
        Err(MagFreqDistError::invalid_parameter(format!("no finite a-value reproduces the requested rate, got {}", a_value)))
    }
}

fn validate_b_value(b_value: f64) -> Result<(), MagFreqDistError> {
    if b_value.is_finite() && b_value > 0.0 {
        Ok(())
    } else {
        Err(MagFreqDistError::invalid_parameter(format!("b-value must be positive and finite, got {}", b_value)))
    }
}

fn validate_a_value(a_value: f64) -> Result<(), MagFreqDistError> {
    if a_value.is_finite() {
        Ok(())
    } else {
        Err(MagFreqDistError::invalid_parameter(format!("a-value must be finite, got {}", a_value)))
    }
}

fn validate_rate(rate: f64, what: &str) -> Result<(), MagFreqDistError> {
    if rate.is_finite() && rate > 0.0 {
        Ok(())
    } else {
        Err(MagFreqDistError::invalid_parameter(format!("{} must be positive and finite, got {}", what, rate)))
    }
}

#[cfg(test)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    use super::*;

    #[test]
    fn construction_fixes_delta_and_cum_rate() {
        let mfd = GutenbergRichterMagFreqDist::new(2.0, 123.0, 10.3, 15.7, 10).unwrap();
        assert_abs_diff_eq!(mfd.delta(), 0.6, epsilon = 1e-6);
        assert_abs_diff_eq!(mfd.tot_cum_rate(), 123.0, epsilon = 1e-5);
        assert_abs_diff_eq!(mfd.mag_upper(), 15.7, epsilon = 1e-12);
    }

    #[test]
    fn from_ab_matches_closed_form_cum_rate() {
        let (a, b) = (4.0, 1.0);
        let mfd = GutenbergRichterMagFreqDist::from_ab(a, b, 5.0, 8.0, 31).unwrap();
        let d = mfd.delta();
        let expected = 10.0_f64.powf(a - b * (5.0 - d / 2.0)) - 10.0_f64.powf(a - b * (8.0 + d / 2.0));
        assert_relative_eq!(mfd.tot_cum_rate(), expected, max_relative = 1e-10);
    }

    #[test]
    fn with_moment_rate_hits_target() {
        let mfd = GutenbergRichterMagFreqDist::with_moment_rate(1.0, 1e25, 5.0, 7.5, 26).unwrap();
        assert_relative_eq!(mfd.total_moment_rate(), 1e25, max_relative = 1e-10);
    }

    #[test]
    fn large_b_value_does_not_overflow() {
        let mfd = GutenbergRichterMagFreqDist::new(15.0, 12.0, 5.0, 7.0, 100).unwrap();
        assert!(mfd.a_value().is_finite());
        assert_relative_eq!(mfd.tot_cum_rate(), 12.0, max_relative = 1e-10);
    }

    #[test]
    fn failed_mutation_leaves_state_untouched() {
        let mut mfd = GutenbergRichterMagFreqDist::new(1.0, 5.0, 5.0, 7.0, 21).unwrap();
        let before = mfd.clone();
        assert!(mfd.set_mag_upper(5.01).is_err());
        assert!(mfd.set_mag_upper(f64::NAN).is_err());
        assert!(mfd.increment_b(-1.0).is_err());
        assert!(mfd.set_ab(f64::INFINITY, 1.0).is_err());
        assert!(mfd.scale_to_moment_rate(0.0).is_err());
        assert_eq!(mfd, before);
    }

    #[test]
    fn huge_mag_upper_is_rejected_not_allocated() {
        let mut mfd = GutenbergRichterMagFreqDist::new(1.0, 5.0, 5.0, 7.0, 21).unwrap();
        let before = mfd.clone();
        for request in [1e20, 1e9, f64::MAX] {
            assert!(matches!(mfd.set_mag_upper(request), Err(MagFreqDistError::InvalidParameter(_))));
        }
        assert!(matches!(mfd.increment_mag_upper(1e12), Err(MagFreqDistError::InvalidParameter(_))));
        assert_eq!(mfd, before);
    }

    #[test]
    fn steep_b_value_keeps_moment_rate_finite() {
        let mut mfd = GutenbergRichterMagFreqDist::new(58.0, 5.0, 6.0, 8.0, 21).unwrap();
        let tmr = mfd.total_moment_rate();
        mfd.increment_b(1.0).unwrap();
        assert_eq!(mfd.b_value(), 59.0);
        assert!(mfd.a_value().is_finite());
        assert!(mfd.dist().rates().iter().all(|y| y.is_finite()));
        assert_relative_eq!(mfd.total_moment_rate(), tmr, max_relative = 1e-9);

        mfd.scale_to_moment_rate(2.0 * tmr).unwrap();
        assert_relative_eq!(mfd.total_moment_rate(), 2.0 * tmr, max_relative = 1e-9);

        let steep = GutenbergRichterMagFreqDist::with_moment_rate(60.0, 1e24, 6.0, 8.0, 21).unwrap();
        assert_relative_eq!(steep.total_moment_rate(), 1e24, max_relative = 1e-9);
    }

    #[test]
    fn overflowing_rates_leave_state_untouched() {
        let mut mfd = GutenbergRichterMagFreqDist::new(1.0, 5.0, 5.0, 7.0, 21).unwrap();
        let before = mfd.clone();
        assert!(matches!(mfd.set_ab(400.0, 1.0), Err(MagFreqDistError::InvalidParameter(_))));
        assert!(GutenbergRichterMagFreqDist::from_ab(400.0, 1.0, 5.0, 7.0, 21).is_err());
        assert_eq!(mfd, before);
    }

    #[test]
    fn set_all_but_a_value_rebuilds_and_recovers_a() {
        let mut mfd = GutenbergRichterMagFreqDist::new(1.0, 5.0, 5.0, 7.0, 21).unwrap();
        let target = GutenbergRichterMagFreqDist::from_ab(14.4, 4.5, 3.0, 6.0, 250).unwrap();
        mfd.set_all_but_a_value(3.0, 6.0, 250, 4.5, target.tot_cum_rate()).unwrap();
        assert_abs_diff_eq!(mfd.a_value(), 14.4, epsilon = 1e-9);
        assert_eq!(mfd.b_value(), 4.5);
        assert_eq!(mfd.num(), 250);
        assert_abs_diff_eq!(mfd.mag_upper(), 6.0, epsilon = 1e-12);

        let before = mfd.clone();
        assert!(mfd.set_all_but_a_value(6.0, 3.0, 250, 4.5, 1.0).is_err());
        assert!(mfd.set_all_but_a_value(3.0, 6.0, 250, 4.5, 0.0).is_err());
        assert!(mfd.set_all_but_a_value(3.0, 6.0, 1, 4.5, 1.0).is_err());
        assert_eq!(mfd, before);
    }

    #[test]
    fn set_mag_upper_can_grow_the_range() {
        let mut mfd = GutenbergRichterMagFreqDist::new(1.0, 5.0, 5.0, 7.0, 21).unwrap();
        let a = mfd.a_value();
        mfd.set_mag_upper(7.52).unwrap();
        assert_eq!(mfd.num(), 26);
        assert_abs_diff_eq!(mfd.mag_upper(), 7.5, epsilon = 1e-12);
        assert_eq!(mfd.a_value(), a);
        assert!(mfd.tot_cum_rate() > 5.0);
    }

    #[test]
    fn scale_to_cum_rate_keeps_b() {
        let mut mfd = GutenbergRichterMagFreqDist::new(1.2, 5.0, 5.0, 7.0, 21).unwrap();
        mfd.scale_to_cum_rate(0.5).unwrap();
        assert_eq!(mfd.b_value(), 1.2);
        assert_relative_eq!(mfd.tot_cum_rate(), 0.5, max_relative = 1e-10);
    }

    #[test]
    fn invalid_construction() {
        assert!(GutenbergRichterMagFreqDist::new(1.0, 5.0, 5.0, 7.0, 1).is_err());
        assert!(GutenbergRichterMagFreqDist::new(1.0, 5.0, 7.0, 5.0, 10).is_err());
        assert!(GutenbergRichterMagFreqDist::new(1.0, 0.0, 5.0, 7.0, 10).is_err());
        assert!(GutenbergRichterMagFreqDist::new(0.0, 5.0, 5.0, 7.0, 10).is_err());
    }
}
