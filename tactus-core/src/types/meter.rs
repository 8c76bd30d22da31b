//! Time signature model
//!
//! A [`Meter`] pairs a numerator (beats per measure) with a denominator
//! restricted to 4, 8, 16 or 32. Front ends pick the denominator with a
//! stepper whose integer steps 1..=4 map onto those values as `2^(step + 1)`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Denominators a meter may carry, in stepper order
pub const DENOMINATORS: [u32; 4] = [4, 8, 16, 32];

/// Smallest and largest denominator stepper values
pub const MIN_STEP: u32 = 1;
pub const MAX_STEP: u32 = 4;

/// Errors raised while constructing a [`Meter`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeterError {
    #[error("invalid time signature '{0}': expected <numerator>/<4|8|16|32>")]
    InvalidSignature(String),
    #[error("numerator must be at least 1, got {0}")]
    InvalidNumerator(u32),
    #[error("denominator must be one of 4, 8, 16 or 32, got {0}")]
    InvalidDenominator(u32),
    #[error("denominator step must be between 1 and 4, got {0}")]
    InvalidStep(f64),
}

/// A musical time signature, numerator over denominator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meter {
    numerator: u32,
    denominator: u32,
}

impl Meter {
    /// Create a meter, validating both parts
    pub fn new(numerator: u32, denominator: u32) -> Result<Self, MeterError> {
        if numerator == 0 {
            return Err(MeterError::InvalidNumerator(numerator));
        }
        if !DENOMINATORS.contains(&denominator) {
            return Err(MeterError::InvalidDenominator(denominator));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Parse a signature such as `"4/4"` or `"7/8"`
    pub fn parse(signature: &str) -> Result<Self, MeterError> {
        let invalid = || MeterError::InvalidSignature(signature.to_string());

        let mut parts = signature.split('/');
        let (Some(numerator), Some(denominator), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };

        let numerator = parse_positive(numerator).ok_or_else(invalid)?;
        let denominator = parse_positive(denominator).ok_or_else(invalid)?;

        Self::new(numerator, denominator).map_err(|_| invalid())
    }

    /// Build a meter from raw stepper values.
    ///
    /// The numerator stepper reports a float which is rounded to the nearest
    /// integer; the denominator step selects `2^(step + 1)`.
    pub fn from_stepper_values(numerator_value: f64, denominator_step: f64) -> Result<Self, MeterError> {
        let denominator = stepper_value_to_denominator(denominator_step)?;
        let numerator = numerator_value.round();
        if numerator < 1.0 || !numerator.is_finite() {
            return Err(MeterError::InvalidNumerator(numerator.max(0.0) as u32));
        }
        Self::new(numerator as u32, denominator)
    }

    pub fn numerator(&self) -> u32 {
        self.numerator
    }

    pub fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Signature text, e.g. `"6/8"`
    pub fn signature(&self) -> String {
        self.to_string()
    }

    /// Denominator expressed as a stepper value (1..=4)
    pub fn denominator_step(&self) -> u32 {
        // Always one of DENOMINATORS, so at least 2^2
        self.denominator.trailing_zeros() - 1
    }

    /// How many times faster than a quarter-note pulse this meter ticks
    pub fn subdivision(&self) -> f64 {
        self.denominator as f64 / 4.0
    }
}

impl Default for Meter {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

impl fmt::Display for Meter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

impl FromStr for Meter {
    type Err = MeterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<(u32, u32)> for Meter {
    type Error = MeterError;

    fn try_from((numerator, denominator): (u32, u32)) -> Result<Self, Self::Error> {
        Self::new(numerator, denominator)
    }
}

impl From<Meter> for (u32, u32) {
    fn from(meter: Meter) -> Self {
        (meter.numerator, meter.denominator)
    }
}

/// Inverse of the stepper encoding: `log2(denominator) - 1`.
///
/// Fails for anything but the four legal denominators.
pub fn denominator_to_stepper_value(denominator: u32) -> Result<u32, MeterError> {
    if !DENOMINATORS.contains(&denominator) {
        return Err(MeterError::InvalidDenominator(denominator));
    }
    Ok(denominator.trailing_zeros() - 1)
}

/// Stepper encoding: step 1, 2, 3, 4 selects 4, 8, 16, 32
pub fn stepper_value_to_denominator(step: f64) -> Result<u32, MeterError> {
    let rounded = step.round();
    if !(MIN_STEP as f64..=MAX_STEP as f64).contains(&rounded) {
        return Err(MeterError::InvalidStep(step));
    }
    Ok(1 << (rounded as u32 + 1))
}

fn parse_positive(part: &str) -> Option<u32> {
    // `u32::from_str` accepts a leading '+', which no signature should carry
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse::<u32>().ok().filter(|n| *n > 0)
}
