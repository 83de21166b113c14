//! Error type shared by the catalog, the solver boundary and the CLI.

use thiserror::Error;

use crate::series::Series;
use crate::VREF;

/// Result type alias using [`Tl431Error`].
pub type Result<T> = std::result::Result<T, Tl431Error>;

/// Which of the two circuit voltages failed the reference check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rail {
    Vin,
    Vout,
}

impl std::fmt::Display for Rail {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Rail::Vin => write!(f, "Vin"),
            Rail::Vout => write!(f, "Vout"),
        }
    }
}

/// Errors raised before a search starts, or when a search is cancelled.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Tl431Error {
    /// Series name not in the fixed catalog set
    #[error("{name} is an unknown series")]
    UnknownSeries { name: String },

    /// Vin or Vout below the TL431 reference voltage
    #[error("{rail} must be at least {vref}V (got {volts}V)", vref = VREF)]
    VoltageBelowReference { rail: Rail, volts: f64 },

    /// Series whose expanded domain makes the triple search prohibitive
    #[error("{series} series resistors take too long and too much CPU to process")]
    UnsupportedSeriesForSearch { series: Series },

    /// Constraint or search settings that can never produce a sensible search
    #[error("Invalid constraints: {message}")]
    InvalidConstraints { message: String },

    /// The search was cancelled before it completed
    #[error("Search cancelled before completion")]
    Cancelled,
}

impl Tl431Error {
    /// Create an invalid constraints error
    pub fn invalid_constraints(message: impl Into<String>) -> Self {
        Self::InvalidConstraints {
            message: message.into(),
        }
    }
}
