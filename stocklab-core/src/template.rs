//! Strategy templates — named reorder policies.
//!
//! A template only varies the coverage horizon, the safety multiplier, the
//! history window fed to the velocity estimator, and the minimum order
//! value. Scoring and classification are shared across all templates.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Template validation errors, rejected before any batch starts.
#[derive(Debug, Error, PartialEq)]
pub enum TemplateError {
    #[error("analysis window must be at least 1 day, got {0}")]
    InvalidWindow(u32),
    #[error("coverage target must be at least 1 day, got {0}")]
    InvalidCoverage(u32),
    #[error("safety multiplier must be >= 1.0 and finite, got {0}")]
    InvalidSafetyMultiplier(f64),
    #[error("minimum order value must be finite and non-negative, got {0}")]
    InvalidMinOrderValue(f64),
}

/// A named reorder policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyTemplate {
    pub name: String,
    /// How many days of stock history feed the velocity estimator.
    pub analysis_window_days: u32,
    /// Target stock horizon in days.
    pub coverage_target_days: u32,
    /// Multiplier on the coverage target, >= 1.0.
    pub safety_multiplier: f64,
    /// Orders cheaper than this are dropped from the actionable list.
    pub min_order_value: f64,
}

impl StrategyTemplate {
    /// Weekly ordering cycle against a 90-day history window.
    pub fn weekly_90() -> Self {
        Self {
            name: "weekly-90".into(),
            analysis_window_days: 90,
            coverage_target_days: 7,
            safety_multiplier: 1.2,
            min_order_value: 250.0,
        }
    }

    /// Biweekly ordering cycle against a 60-day history window.
    pub fn biweekly_60() -> Self {
        Self {
            name: "biweekly-60".into(),
            analysis_window_days: 60,
            coverage_target_days: 14,
            safety_multiplier: 1.15,
            min_order_value: 250.0,
        }
    }

    /// Monthly ordering cycle against a 90-day history window.
    pub fn monthly_90() -> Self {
        Self {
            name: "monthly-90".into(),
            analysis_window_days: 90,
            coverage_target_days: 30,
            safety_multiplier: 1.1,
            min_order_value: 250.0,
        }
    }

    /// All built-in templates, in display order.
    pub fn builtins() -> Vec<Self> {
        vec![Self::weekly_90(), Self::biweekly_60(), Self::monthly_90()]
    }

    /// Look up a built-in template by name.
    pub fn builtin(name: &str) -> Option<Self> {
        Self::builtins().into_iter().find(|t| t.name == name)
    }

    /// Fail-fast validation, called before batch execution.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.analysis_window_days == 0 {
            return Err(TemplateError::InvalidWindow(self.analysis_window_days));
        }
        if self.coverage_target_days == 0 {
            return Err(TemplateError::InvalidCoverage(self.coverage_target_days));
        }
        if !self.safety_multiplier.is_finite() || self.safety_multiplier < 1.0 {
            return Err(TemplateError::InvalidSafetyMultiplier(self.safety_multiplier));
        }
        if !self.min_order_value.is_finite() || self.min_order_value < 0.0 {
            return Err(TemplateError::InvalidMinOrderValue(self.min_order_value));
        }
        Ok(())
    }
}
