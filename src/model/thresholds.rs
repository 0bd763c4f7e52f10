#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    pub moderate: f64,
    pub high: f64,
}

impl RiskThresholds {
    pub fn default_v1() -> Self {
        Self {
            moderate: 0.4,
            high: 0.7,
        }
    }
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self::default_v1()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelWeights {
    pub logistic: f64,
    pub forest: f64,
}

impl Default for ModelWeights {
    fn default() -> Self {
        Self {
            logistic: 1.0,
            forest: 1.0,
        }
    }
}

impl ModelWeights {
    pub fn is_equal(&self) -> bool {
        self.logistic == self.forest
    }
}
