use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy)]
pub struct TierDef {
    pub tier: RiskTier,
    pub label: &'static str,
    pub headline: &'static str,
    pub advisory: &'static str,
    pub color: &'static str,
}

const TIER_DEFS: &[TierDef] = &[
    TierDef {
        tier: RiskTier::Low,
        label: "Low Risk",
        headline: "Low Risk",
        advisory: "Your heart indicators appear normal. Keep up a healthy lifestyle.",
        color: "green",
    },
    TierDef {
        tier: RiskTier::Moderate,
        label: "Moderate Risk",
        headline: "Moderate Risk",
        advisory: "Some indicators suggest potential issues. Consider a medical check-up.",
        color: "orange",
    },
    TierDef {
        tier: RiskTier::High,
        label: "High Risk",
        headline: "High Risk Detected",
        advisory: "Both models show a high probability of heart disease. Seek medical attention soon.",
        color: "red",
    },
];

impl RiskTier {
    pub fn def(self) -> &'static TierDef {
        match self {
            RiskTier::Low => &TIER_DEFS[0],
            RiskTier::Moderate => &TIER_DEFS[1],
            RiskTier::High => &TIER_DEFS[2],
        }
    }

    pub fn label(self) -> &'static str {
        self.def().label
    }

    pub fn headline(self) -> &'static str {
        self.def().headline
    }

    pub fn advisory(self) -> &'static str {
        self.def().advisory
    }

    pub fn color(self) -> &'static str {
        self.def().color
    }
}

pub fn tier_order() -> &'static [TierDef] {
    TIER_DEFS
}
