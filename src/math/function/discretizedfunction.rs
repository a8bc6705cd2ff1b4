use thiserror::Error;

use crate::math::round::{grid_index, TIE_TOLERANCE};

// ─────────────────────────────────────────────────────────────────────────────
// Point2D
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2D {
    x: f64,
    y: f64
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Point2D {
        Point2D { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DiscretizedFunctionError
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscretizedFunctionError {
    #[error("bin width must be positive and finite, got {0}")]
    InvalidDelta(f64),
    #[error("a discretized function needs at least one point, got {0}")]
    InvalidSize(usize),
    #[error("index {index} out of range for function of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    #[error("x = {x} outside [{min_x}, {max_x}] by more than half a bin")]
    XOutOfRange { x: f64, min_x: f64, max_x: f64 }
}

// ─────────────────────────────────────────────────────────────────────────────
// EvenlyDiscretizedFunction
// ─────────────────────────────────────────────────────────────────────────────

/// 等間距離散函數：第 `i` 個樣本位於 `x = min_x + i * delta`。
///
/// x 值不另外儲存，一律由 `min_x` 與 `delta` 計算，因此 x 與 index
/// 之間永遠是一對一的對應。所有存取皆為 O(1)。
#[derive(Debug, Clone, PartialEq)]
pub struct EvenlyDiscretizedFunction {
    min_x: f64,
    delta: f64,
    y_values: Vec<f64>
}

impl EvenlyDiscretizedFunction {
    /// 以起點、點數與間距建立，y 值全為 0。
    pub fn new(min_x: f64, num: usize, delta: f64) -> Result<EvenlyDiscretizedFunction, DiscretizedFunctionError> {
        if num == 0 {
            return Err(DiscretizedFunctionError::InvalidSize(num));
        }
        if !(delta.is_finite() && delta > 0.0) {
            return Err(DiscretizedFunctionError::InvalidDelta(delta));
        }
        Ok(EvenlyDiscretizedFunction { min_x, delta, y_values: vec![0.0; num] })
    }

    /// 以兩端點與點數建立，`delta = (max_x - min_x) / (num - 1)`。
    pub fn from_range(min_x: f64, max_x: f64, num: usize) -> Result<EvenlyDiscretizedFunction, DiscretizedFunctionError> {
        if num < 2 {
            return Err(DiscretizedFunctionError::InvalidSize(num));
        }
        let delta = (max_x - min_x) / (num - 1) as f64;
        EvenlyDiscretizedFunction::new(min_x, num, delta)
    }

    pub fn size(&self) -> usize {
        self.y_values.len()
    }

    pub fn min_x(&self) -> f64 {
        self.min_x
    }

    pub fn max_x(&self) -> f64 {
        self.x_unchecked(self.size() - 1)
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    fn x_unchecked(&self, index: usize) -> f64 {
        self.min_x + index as f64 * self.delta
    }

    fn check_index(&self, index: usize) -> Result<(), DiscretizedFunctionError> {
        if index < self.size() {
            Ok(())
        } else {
            Err(DiscretizedFunctionError::IndexOutOfRange { index, size: self.size() })
        }
    }

    pub fn x(&self, index: usize) -> Result<f64, DiscretizedFunctionError> {
        self.check_index(index)?;
        Ok(self.x_unchecked(index))
    }

    pub fn y(&self, index: usize) -> Result<f64, DiscretizedFunctionError> {
        self.check_index(index)?;
        Ok(self.y_values[index])
    }

    pub fn set(&mut self, index: usize, y: f64) -> Result<(), DiscretizedFunctionError> {
        self.check_index(index)?;
        self.y_values[index] = y;
        Ok(())
    }

    /// 最接近 `x` 的 bin。超出 `[min_x, max_x]` 半個 bin 以上時回傳錯誤，不做 clamp。
    pub fn index_of(&self, x: f64) -> Result<usize, DiscretizedFunctionError> {
        let half_bin = self.delta / 2.0 + TIE_TOLERANCE * self.delta;
        if !(x >= self.min_x - half_bin && x <= self.max_x() + half_bin) {
            return Err(DiscretizedFunctionError::XOutOfRange {
                x,
                min_x: self.min_x,
                max_x: self.max_x()
            });
        }
        let index = grid_index(x, self.min_x, self.delta).max(0.0) as usize;
        Ok(index.min(self.size() - 1))
    }

    pub fn y_at(&self, x: f64) -> Result<f64, DiscretizedFunctionError> {
        let index = self.index_of(x)?;
        Ok(self.y_values[index])
    }

    pub fn set_at(&mut self, x: f64, y: f64) -> Result<(), DiscretizedFunctionError> {
        let index = self.index_of(x)?;
        self.y_values[index] = y;
        Ok(())
    }

    /// 依 x 值重新填入所有 y 值。
    pub fn set_all_y(&mut self, f: impl Fn(f64) -> f64) {
        for i in 0..self.size() {
            self.y_values[i] = f(self.x_unchecked(i));
        }
    }

    pub fn scale(&mut self, factor: f64) {
        self.y_values.iter_mut().for_each(|y| *y *= factor);
    }

    pub fn x_values(&self) -> Vec<f64> {
        (0..self.size()).map(|i| self.x_unchecked(i)).collect()
    }

    pub fn y_values(&self) -> &[f64] {
        &self.y_values
    }

    pub fn sum_y(&self) -> f64 {
        self.y_values.iter().sum()
    }

    pub fn max_y(&self) -> f64 {
        self.y_values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn iter(&self) -> impl Iterator<Item = Point2D> + '_ {
        self.y_values
            .iter()
            .enumerate()
            .map(|(i, &y)| Point2D::new(self.x_unchecked(i), y))
    }
}
