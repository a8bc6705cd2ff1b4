/// 矩規模換算：M0 = 10^(1.5 M + 16.05)，單位 dyne-cm。
pub fn seismic_moment(mag: f64) -> f64 {
    10.0_f64.powf(1.5 * mag + 16.05)
}

/// `seismic_moment` 的反函數。
pub fn moment_magnitude(moment: f64) -> f64 {
    (moment.log10() - 16.05) / 1.5
}
