//! A resistor value calculator for TL431 voltage reference circuits.
//!
//! Given the lowest input voltage a circuit will see and the output voltage it should regulate
//! to, it searches standard resistor series for the divider (R1, R2) and series resistor (Rs)
//! values that come closest to the target while keeping the TL431 inside its operating current
//! window.
//!
//! # Example
//! For the circuit below, regulating 5V from a 12V rail with values from a basic resistor kit:
//!
//! ```text
//!     VIN -- Rs ----------- VOUT
//!             |       |
//!             R1      |
//!             |       K
//!             |---R TL431
//!             |       A
//!             R2      |
//!             |       |
//!     GND ----------------- GND
//! ```
//!
//! ```rust no_run
//! use tl431_calc::*;
//!
//! fn main() {
//!     let calc = Tl431Calc::new(Series::Default);
//!
//!     println!("Number of combinations: {}", calc.combinations().unwrap());
//!
//!     let res = calc
//!         .calc(12.0, 5.0)
//!         .expect("Error: voltages below the TL431 reference");
//!
//!     for (idx, s) in res.best().enumerate() {
//!         println!("Match {}:", idx + 1);
//!         println!("{:#}", s);
//!         println!();
//!     }
//! }
//! ```
//!
//! The divider equations treat the TL431 reference input current as negligible; see
//! [`I_REF`].

use std::{borrow::Cow, sync::atomic::AtomicBool};

use tracing::debug;

use crate::error::Result;

pub mod error;
pub mod report;
pub mod series;
pub mod solver;

pub use error::{Rail, Tl431Error};
pub use series::{expand, Series, DEFAULT_DECADES, MAX_DECADES};
pub use solver::{calc_vout, divider_pairs, solve, solve_with_cancel, Constraints, Solution};

/// TL431 reference voltage, volts.
pub const VREF: f64 = 2.495;

/// Typical TL431 reference input current, amps.
///
/// The divider equations leave this out and treat R1 and R2 as an unloaded divider.
pub const I_REF: f64 = 2e-6;

/// Checks that both voltages reach the TL431 reference voltage.
///
/// A regulator can neither be fed from, nor regulate to, less than [`VREF`].
/// ```
/// # use tl431_calc::*;
/// assert!(check_voltages(12.0, 5.0).is_ok());
/// assert_eq!(
///     check_voltages(2.0, 5.0),
///     Err(Tl431Error::VoltageBelowReference { rail: Rail::Vin, volts: 2.0 })
/// );
/// ```
pub fn check_voltages(vin: f64, vout: f64) -> Result<()> {
    // Written negated so NaN fails as well.
    if !(vin >= VREF) {
        return Err(Tl431Error::VoltageBelowReference {
            rail: Rail::Vin,
            volts: vin,
        });
    }
    if !(vout >= VREF) {
        return Err(Tl431Error::VoltageBelowReference {
            rail: Rail::Vout,
            volts: vout,
        });
    }
    Ok(())
}

/// Stores the result of a calculation.
#[derive(Debug, Clone, PartialEq)]
pub struct Solutions {
    res: Vec<Solution>,
    vin: f64,
    vout_target: f64,
}

impl Solutions {
    /// Input voltage the search was run for.
    pub fn vin(&self) -> f64 {
        self.vin
    }

    /// Output voltage the search aimed for.
    pub fn vout_target(&self) -> f64 {
        self.vout_target
    }

    pub fn len(&self) -> usize {
        self.res.len()
    }

    /// True when no resistor combination satisfied the constraints.
    pub fn is_empty(&self) -> bool {
        self.res.is_empty()
    }

    /// All solutions that share the lowest error value.
    pub fn best(&self) -> impl Iterator<Item = &Solution> {
        let best_err = self.res.first().map(|s| s.error);
        self.res
            .iter()
            .take_while(move |s| Some(s.error) == best_err)
    }

    /// Provides an iterator over all results, from lowest to highest error. Solutions with
    /// equal error are ordered by ascending TL431 cathode current.
    pub fn iter(&self) -> impl Iterator<Item = &Solution> {
        self.res.iter()
    }

    pub fn into_vec(self) -> Vec<Solution> {
        self.res
    }
}

fn triples(values: &[u64]) -> u128 {
    let n = values.iter().filter(|v| **v > 0).count() as u128;
    n * n * n
}

/// Main calculator struct
#[derive(Debug, Clone)]
pub struct Tl431Calc {
    series: Series,
    decades: u32,
    constraints: Constraints,
}

impl Default for Tl431Calc {
    fn default() -> Self {
        Self::new(Series::Default)
    }
}

impl Tl431Calc {
    /// Creates a calculator drawing all three resistors from `series`, expanded across
    /// [`DEFAULT_DECADES`] decades, with the default [`Constraints`].
    /// ```
    /// # use tl431_calc::*;
    /// let calc = Tl431Calc::new(Series::E24)
    ///     .decades(6)
    ///     .constraints(Constraints::default().idiv_max(500e-6));
    /// ```
    pub fn new(series: Series) -> Self {
        Tl431Calc {
            series,
            decades: DEFAULT_DECADES,
            constraints: Constraints::default(),
        }
    }

    /// Sets the number of decades the series is expanded across.
    pub fn decades(mut self, decades: u32) -> Self {
        self.decades = decades;
        self
    }

    /// Replaces the constraints a solution must meet.
    pub fn constraints(mut self, constraints: Constraints) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn series(&self) -> Series {
        self.series
    }

    /// The resistor values searched over, zero sentinel included.
    pub fn values(&self) -> Result<Cow<'static, [u64]>> {
        if self.decades == DEFAULT_DECADES {
            Ok(Cow::Borrowed(self.series.expanded()))
        } else {
            self.series.expand(self.decades).map(Cow::Owned)
        }
    }

    /// Returns the number of (R1, R2, Rs) triples the search may have to evaluate. This maps
    /// fairly directly to the time a calculation takes.
    pub fn combinations(&self) -> Result<u128> {
        Ok(triples(&self.values()?))
    }

    /// Rejects decade counts and constraints that cannot describe a useful search.
    pub fn validate(&self) -> Result<()> {
        if self.decades == 0 || self.decades > MAX_DECADES {
            return Err(Tl431Error::invalid_constraints(format!(
                "decades must be between 1 and {}, got {}",
                MAX_DECADES, self.decades
            )));
        }
        self.constraints.validate()
    }

    /// Validates the settings and voltages, then searches for the best combinations for
    /// regulating `vout` from `vin`. An empty result is not an error.
    pub fn calc(&self, vin: f64, vout: f64) -> Result<Solutions> {
        self.calc_with_cancel(vin, vout, &AtomicBool::new(false))
    }

    /// As [`Tl431Calc::calc`], but fails with `Cancelled` once `cancel` is set.
    pub fn calc_with_cancel(&self, vin: f64, vout: f64, cancel: &AtomicBool) -> Result<Solutions> {
        self.validate()?;
        check_voltages(vin, vout)?;
        let values = self.values()?;
        debug!(
            series = %self.series,
            decades = self.decades,
            combinations = triples(&values) as u64,
            "Starting search"
        );
        let res = solve_with_cancel(vin, vout, &values, &self.constraints, cancel)?;
        Ok(Solutions {
            res,
            vin,
            vout_target: vout,
        })
    }
}
