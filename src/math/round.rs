/// 判定「恰好落在 .5」時容許的浮點誤差。
///
/// 網格運算（例如 `(3.7 - 2.0125) / 0.025`）常得到 `67.50000000000001`
/// 這類結果，數學上其實是 67.5。
pub const TIE_TOLERANCE: f64 = 1e-9;

/// 四捨五入到最接近的整數；平手（在 `TIE_TOLERANCE` 內）時取較小者。
pub fn round_half_down(x: f64) -> f64 {
    let floor = x.floor();
    if x - floor > 0.5 + TIE_TOLERANCE {
        floor + 1.0
    } else {
        floor
    }
}

/// 將 `x` 對齊到以 `origin` 為起點、間距 `delta` 的網格，回傳格點編號。
pub fn grid_index(x: f64, origin: f64, delta: f64) -> f64 {
    round_half_down((x - origin) / delta)
}
