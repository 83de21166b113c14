//! Exhaustive search for TL431 divider and series resistor values.
//!
//! The search runs in two phases. The divider phase pairs every R2 with every R1, computing the
//! regulated output voltage and the current drawn by the divider, and drops any pair whose
//! divider current is already over budget. The series phase crosses the surviving pairs with
//! every Rs and keeps the triples that leave the TL431 a cathode current inside its operating
//! window without overloading Rs.
//!
//! All bound checks are strict, so a value sitting exactly on a bound is accepted.

use std::{
    cmp::Ordering,
    fmt,
    sync::atomic::{AtomicBool, Ordering as AtomicOrdering},
};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{Result, Tl431Error};
use crate::report::format_ohms;
use crate::VREF;

/// Electrical limits a solution has to respect, plus the length of the result list.
///
/// Built from the defaults and adjusted with the builder methods:
/// ```
/// # use tl431_calc::Constraints;
/// let c = Constraints::default().ik_min(2e-3).max_results(5);
/// assert_eq!(c.ik_min, 2e-3);
/// assert_eq!(c.ik_max, 20e-3);
/// assert_eq!(c.max_results, 5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constraints {
    /// Minimum TL431 cathode current, amps
    pub ik_min: f64,
    /// Maximum TL431 cathode current, amps
    pub ik_max: f64,
    /// Maximum current through the R1/R2 divider, amps
    pub idiv_max: f64,
    /// Maximum current through Rs, amps
    pub irs_max: f64,
    /// Maximum number of solutions returned
    pub max_results: usize,
}

impl Default for Constraints {
    fn default() -> Self {
        Constraints {
            ik_min: 1e-3,
            ik_max: 20e-3,
            idiv_max: 1e-3,
            irs_max: 10e-3,
            max_results: 10,
        }
    }
}

impl Constraints {
    pub fn ik_min(mut self, amps: f64) -> Self {
        self.ik_min = amps;
        self
    }

    pub fn ik_max(mut self, amps: f64) -> Self {
        self.ik_max = amps;
        self
    }

    pub fn idiv_max(mut self, amps: f64) -> Self {
        self.idiv_max = amps;
        self
    }

    pub fn irs_max(mut self, amps: f64) -> Self {
        self.irs_max = amps;
        self
    }

    pub fn max_results(mut self, count: usize) -> Self {
        self.max_results = count;
        self
    }

    /// Checks that the limits describe a search that can return something.
    ///
    /// The solver itself accepts any limits and just finds nothing for unusable ones; this is
    /// for rejecting bad settings at the boundary.
    pub fn validate(&self) -> Result<()> {
        let limits = [
            ("ik_min", self.ik_min),
            ("ik_max", self.ik_max),
            ("idiv_max", self.idiv_max),
            ("irs_max", self.irs_max),
        ];
        for (name, amps) in limits.iter() {
            if !amps.is_finite() || *amps <= 0.0 {
                return Err(Tl431Error::invalid_constraints(format!(
                    "{} must be a positive current, got {}",
                    name, amps
                )));
            }
        }
        if self.ik_min > self.ik_max {
            return Err(Tl431Error::invalid_constraints(format!(
                "ik_min ({}) is above ik_max ({})",
                self.ik_min, self.ik_max
            )));
        }
        if self.max_results == 0 {
            return Err(Tl431Error::invalid_constraints(
                "max_results must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Output voltage set by a divider, `VREF * (1 + R1/R2)`.
///
/// The TL431 reference input current ([`crate::I_REF`]) is treated as negligible against the
/// divider current and does not enter the calculation.
pub fn calc_vout(r1: f64, r2: f64) -> f64 {
    VREF * (1.0 + r1 / r2)
}

/// An R1/R2 pair that passed the divider current budget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DividerPair {
    pub r1: u64,
    pub r2: u64,
    /// Regulated output voltage
    pub vout: f64,
    /// `|vout - target|`
    pub error: f64,
    /// Current through R1 + R2 from VOUT to ground
    pub i_div: f64,
}

impl DividerPair {
    fn new(r1: u64, r2: u64, vout_target: f64) -> Self {
        let (r1f, r2f) = (r1 as f64, r2 as f64);
        let vout = calc_vout(r1f, r2f);
        DividerPair {
            r1,
            r2,
            vout,
            error: (vout - vout_target).abs(),
            i_div: vout / (r1f + r2f),
        }
    }

    /// Completes the pair with `rs`, or `None` if the result breaks a current limit.
    fn with_series(&self, rs: u64, vin: f64, c: &Constraints) -> Option<Solution> {
        let i_rs = (vin - self.vout) / rs as f64;
        let i_k = i_rs - self.i_div;
        // Negated so a NaN current is rejected too.
        if !(i_k >= c.ik_min && i_k <= c.ik_max && i_rs <= c.irs_max) {
            return None;
        }
        Some(Solution {
            error: self.error,
            vout: self.vout,
            r1: self.r1,
            r2: self.r2,
            rs,
            i_div: self.i_div,
            i_rs,
            i_k,
        })
    }
}

/// A feasible set of resistor values with the currents it produces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Solution {
    /// Absolute output voltage error, volts
    pub error: f64,
    /// Regulated output voltage, volts
    pub vout: f64,
    /// Upper divider resistor, ohms
    pub r1: u64,
    /// Lower divider resistor, ohms
    pub r2: u64,
    /// Series resistor, ohms
    pub rs: u64,
    /// Divider current, amps
    pub i_div: f64,
    /// Series resistor current, amps
    pub i_rs: f64,
    /// TL431 cathode current, amps
    pub i_k: f64,
}

impl Solution {
    /// Error as a percentage of `vout_target`.
    pub fn error_percent(&self, vout_target: f64) -> f64 {
        self.error / vout_target * 100.0
    }

    fn rank(&self, other: &Solution) -> Ordering {
        self.error
            .total_cmp(&other.error)
            .then_with(|| self.i_k.total_cmp(&other.i_k))
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let sep = if f.alternate() { "\n" } else { ", " };
        write!(
            f,
            "Error: {:.6}V{sep}Vout: {:.6}V{sep}Rs: {}{sep}R1: {}{sep}R2: {}{sep}Irs: {:.3}mA{sep}Idiv: {:.6}mA{sep}Ik: {:.3}mA",
            self.error,
            self.vout,
            format_ohms(self.rs),
            format_ohms(self.r1),
            format_ohms(self.r2),
            self.i_rs * 1e3,
            self.i_div * 1e3,
            self.i_k * 1e3,
            sep = sep
        )
    }
}

/// Sorts by ascending error, then ascending cathode current, and keeps the first `max`.
///
/// The sort is stable, so solutions that tie on both keep their search order.
fn rank(solutions: &mut Vec<Solution>, max: usize) {
    solutions.sort_by(Solution::rank);
    solutions.truncate(max);
}

fn check_cancel(cancel: &AtomicBool) -> Result<()> {
    if cancel.load(AtomicOrdering::Relaxed) {
        Err(Tl431Error::Cancelled)
    } else {
        Ok(())
    }
}

fn positive(values: &[u64]) -> impl Iterator<Item = u64> + '_ {
    values.iter().cloned().filter(|v| *v > 0)
}

fn search_pairs(
    vout_target: f64,
    values: &[u64],
    c: &Constraints,
    cancel: &AtomicBool,
) -> Result<Vec<DividerPair>> {
    let per_r2 = values
        .par_iter()
        .filter(|r2| **r2 > 0)
        .map(|&r2| -> Result<Vec<DividerPair>> {
            check_cancel(cancel)?;
            Ok(positive(values)
                .map(|r1| DividerPair::new(r1, r2, vout_target))
                .filter(|pair| pair.i_div <= c.idiv_max)
                .collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(per_r2.concat())
}

/// Runs the divider phase on its own: every positive (R1, R2) pair from `values` whose divider
/// current stays within `constraints.idiv_max`, ordered by R2 then R1.
pub fn divider_pairs(
    vout_target: f64,
    values: &[u64],
    constraints: &Constraints,
) -> Vec<DividerPair> {
    search_pairs(vout_target, values, constraints, &AtomicBool::new(false)).unwrap_or_default()
}

fn search(
    vin: f64,
    vout_target: f64,
    values: &[u64],
    c: &Constraints,
    cancel: &AtomicBool,
) -> Result<Vec<Solution>> {
    let pairs = search_pairs(vout_target, values, c, cancel)?;
    debug!(
        values = values.len(),
        pairs = pairs.len(),
        "Divider phase complete"
    );

    // Each pair keeps only its own best `max_results`; with a stable ranking the merged
    // top entries are the same as ranking every candidate at once.
    let partitions = pairs
        .par_iter()
        .map(|pair| -> Result<(usize, Vec<Solution>)> {
            check_cancel(cancel)?;
            let mut found: Vec<Solution> = positive(values)
                .filter_map(|rs| pair.with_series(rs, vin, c))
                .collect();
            let feasible = found.len();
            rank(&mut found, c.max_results);
            Ok((feasible, found))
        })
        .collect::<Result<Vec<_>>>()?;

    let feasible: usize = partitions.iter().map(|(n, _)| n).sum();
    let mut solutions: Vec<Solution> = partitions.into_iter().flat_map(|(_, s)| s).collect();
    rank(&mut solutions, c.max_results);

    if solutions.is_empty() {
        warn!(vin, vout_target, "No resistor combination satisfies the constraints");
    } else {
        info!(
            feasible,
            kept = solutions.len(),
            best_error = solutions[0].error,
            "Series phase complete"
        );
    }
    Ok(solutions)
}

/// Finds the best resistor combinations for a TL431 regulating `vout_target` from `vin`.
///
/// `values` is an expanded series; zero entries are skipped. The result is ordered by ascending
/// error, ties broken by ascending cathode current, and holds at most
/// `constraints.max_results` entries. An empty result means no combination fits.
/// ```
/// # use tl431_calc::{series::Series, solve, Constraints};
/// let found = solve(12.0, 5.0, Series::Default.expanded(), &Constraints::default());
/// assert!(found[0].error < 0.1);
/// ```
pub fn solve(
    vin: f64,
    vout_target: f64,
    values: &[u64],
    constraints: &Constraints,
) -> Vec<Solution> {
    search(vin, vout_target, values, constraints, &AtomicBool::new(false)).unwrap_or_default()
}

/// As [`solve`], but gives up with `Cancelled` once `cancel` is set.
///
/// The flag is polled between units of work, so a search stops shortly after it is raised.
pub fn solve_with_cancel(
    vin: f64,
    vout_target: f64,
    values: &[u64],
    constraints: &Constraints,
    cancel: &AtomicBool,
) -> Result<Vec<Solution>> {
    search(vin, vout_target, values, constraints, cancel)
}
