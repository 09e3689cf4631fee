//! Semantic unit types for environmental readings
//!
//! Newtype wrappers that keep moisture fractions, percentages and temperatures from
//! being mixed up when readings are threaded through the spread model. Each type
//! derefs to its raw `f64` so formulas read naturally (`*readings.slope`).
//!
//! # Usage
//! ```
//! use firebreak_core::core_types::units::{Fraction, Percent};
//!
//! let moisture = Fraction::clamped(1.4);
//! assert_eq!(*moisture, 1.0);
//!
//! let lfm = Percent::new(150.0).clamp_to(30.0, 120.0);
//! assert_eq!(*lfm, 120.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Deref;

// ============================================================================
// TEMPERATURE
// ============================================================================

/// Air temperature in degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Celsius(f64);

impl Celsius {
    /// Absolute zero in Celsius
    pub const ABSOLUTE_ZERO: Celsius = Celsius(-273.15);

    /// Create a new Celsius temperature. Asserts value >= absolute zero.
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= -273.15,
            "Celsius::new: value is below absolute zero (-273.15°C)"
        );
        Celsius(value)
    }
}

impl Deref for Celsius {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for Celsius {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°C", self.0)
    }
}

// ============================================================================
// FRACTION
// ============================================================================

/// A fraction in the range [0, 1]
/// Represents ambient moisture content, probabilities and ratios
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Fraction(f64);

impl Fraction {
    /// Zero fraction
    pub const ZERO: Fraction = Fraction(0.0);

    /// Create a new fraction. Asserts value is within [0, 1].
    #[inline]
    #[must_use]
    #[track_caller]
    pub const fn new(value: f64) -> Self {
        assert!(
            value >= 0.0 && value <= 1.0,
            "Fraction::new: value not in [0, 1]"
        );
        Fraction(value)
    }

    /// Create a fraction, clamping into [0, 1]. NaN maps to zero.
    #[inline]
    #[must_use]
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Fraction::ZERO
        } else {
            Fraction(value.clamp(0.0, 1.0))
        }
    }
}

impl Deref for Fraction {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

// ============================================================================
// PERCENT
// ============================================================================

/// A percentage value. Not bounded to [0, 100]: live fuel moisture routinely
/// exceeds 100% and slopes are expressed as rise over run × 100.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Percent(f64);

impl Percent {
    /// Zero percent
    pub const ZERO: Percent = Percent(0.0);

    /// Create a new percentage. Asserts the value is finite.
    #[inline]
    #[must_use]
    #[track_caller]
    pub fn new(value: f64) -> Self {
        assert!(value.is_finite(), "Percent::new: value must be finite");
        Percent(value)
    }

    /// Clamp into `[min, max]`
    #[inline]
    #[must_use]
    pub fn clamp_to(self, min: f64, max: f64) -> Self {
        Percent(self.0.clamp(min, max))
    }
}

impl Deref for Percent {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.0)
    }
}

// ============================================================================
// ANGLE
// ============================================================================

/// Angle in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Degrees(f64);

impl Degrees {
    /// Create a new angle in degrees
    #[inline]
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Degrees(value)
    }

    /// Convert to radians
    #[inline]
    #[must_use]
    pub fn to_radians(self) -> f64 {
        self.0.to_radians()
    }
}

impl Deref for Degrees {
    type Target = f64;
    #[inline]
    fn deref(&self) -> &f64 {
        &self.0
    }
}

impl fmt::Display for Degrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}°", self.0)
    }
}
