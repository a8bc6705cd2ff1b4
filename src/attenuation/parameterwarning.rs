use std::fmt;
use std::sync::Mutex;

use tracing::warn;

// ─────────────────────────────────────────────────────────────────────────────
// ParameterRange / ParameterWarning
// ─────────────────────────────────────────────────────────────────────────────

/// 模型校準範圍。超出範圍只會產生警告，不會中斷計算。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterRange {
    name: &'static str,
    min: f64,
    max: f64
}

impl ParameterRange {
    pub const fn new(name: &'static str, min: f64, max: f64) -> ParameterRange {
        ParameterRange { name, min, max }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn check(&self, value: f64) -> Option<ParameterWarning> {
        if self.contains(value) {
            None
        } else {
            Some(ParameterWarning { parameter: self.name, value, min: self.min, max: self.max })
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParameterWarning {
    pub parameter: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64
}

impl fmt::Display for ParameterWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} is outside the valid range [{}, {}]",
            self.parameter, self.value, self.min, self.max
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// WarningSink
// ─────────────────────────────────────────────────────────────────────────────

/// 範圍警告的接收端，由呼叫方注入；模型本身不持有任何全域註冊狀態。
pub trait WarningSink: Send + Sync {
    fn warn(&self, warning: &ParameterWarning);
}

/// 預設：以 `tracing::warn!` 記錄。
pub struct TracingWarningSink;

impl WarningSink for TracingWarningSink {
    fn warn(&self, warning: &ParameterWarning) {
        warn!(
            parameter = warning.parameter,
            value = warning.value,
            min = warning.min,
            max = warning.max,
            "parameter outside calibrated range"
        );
    }
}

pub struct NullWarningSink;

impl WarningSink for NullWarningSink {
    fn warn(&self, _warning: &ParameterWarning) {}
}

/// 收集所有警告，供呼叫方事後檢視。
pub struct CollectingWarningSink {
    warnings: Mutex<Vec<ParameterWarning>>
}

impl CollectingWarningSink {
    pub fn new() -> CollectingWarningSink {
        CollectingWarningSink { warnings: Mutex::new(Vec::new()) }
    }

    pub fn warnings(&self) -> Vec<ParameterWarning> {
        match self.warnings.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone()
        }
    }

    pub fn clear(&self) {
        match self.warnings.lock() {
            Ok(mut guard) => guard.clear(),
            Err(poisoned) => poisoned.into_inner().clear()
        }
    }
}

impl Default for CollectingWarningSink {
    fn default() -> Self {
        CollectingWarningSink::new()
    }
}

impl WarningSink for CollectingWarningSink {
    fn warn(&self, warning: &ParameterWarning) {
        match self.warnings.lock() {
            Ok(mut guard) => guard.push(*warning),
            Err(poisoned) => poisoned.into_inner().push(*warning)
        }
    }
}
