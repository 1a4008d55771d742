// crates/respond-cli/src/chance.rs
// ============================================================================
// Module: Respond Chance Input
// Description: Resolves command-line chance input against config defaults.
// Purpose: Apply the default chance and optional clamping before validation.
// Dependencies: respond-core
// ============================================================================

//! ## Overview
//! A missing chance falls back to the configured default. When clamping is
//! enabled, finite out-of-range input is pulled into `[0, 1]`; otherwise it
//! reaches the rule validator unchanged. Non-finite input is never clamped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use respond_core::core::rules::CHANCE_MAX;
use respond_core::core::rules::CHANCE_MIN;

// ============================================================================
// SECTION: Resolution
// ============================================================================

/// How command chance input is turned into a stored chance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChancePolicy {
    /// Chance used when the command omits one.
    pub default_chance: f64,
    /// Whether out-of-range input is clamped.
    pub clamp: bool,
}

impl ChancePolicy {
    /// Resolves a chance for new triggers.
    #[must_use]
    pub fn resolve(self, input: Option<f64>) -> f64 {
        self.adjust(input.unwrap_or(self.default_chance))
    }

    /// Resolves a chance for edits, keeping `None` so the stored value is reused.
    #[must_use]
    pub fn resolve_edit(self, input: Option<f64>) -> Option<f64> {
        input.map(|value| self.adjust(value))
    }

    /// Applies clamping to finite values when enabled.
    fn adjust(self, value: f64) -> f64 {
        if self.clamp && value.is_finite() { value.clamp(CHANCE_MIN, CHANCE_MAX) } else { value }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CLAMPING: ChancePolicy = ChancePolicy { default_chance: 0.3, clamp: true };
    const STRICT: ChancePolicy = ChancePolicy { default_chance: 0.3, clamp: false };

    #[test]
    fn missing_chance_uses_default() {
        assert!((CLAMPING.resolve(None) - 0.3).abs() < f64::EPSILON);
        assert_eq!(CLAMPING.resolve_edit(None), None);
    }

    #[test]
    fn clamps_out_of_range_when_enabled() {
        assert!((CLAMPING.resolve(Some(1.5)) - 1.0).abs() < f64::EPSILON);
        assert!(CLAMPING.resolve(Some(-2.0)).abs() < f64::EPSILON);
        assert_eq!(CLAMPING.resolve_edit(Some(7.0)), Some(1.0));
    }

    #[test]
    fn passes_through_when_disabled() {
        assert!((STRICT.resolve(Some(1.5)) - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn never_clamps_nan() {
        assert!(CLAMPING.resolve(Some(f64::NAN)).is_nan());
    }
}
