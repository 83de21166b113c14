//! Standard resistor series and their expansion across decades.
//!
//! Every base table holds one decade of values as mantissas scaled by 100 (so `470` is
//! 4.7 x 10^d ohms at decade `d`), preceded by a `0` sentinel. The sentinel survives expansion
//! and is skipped by the solver, not by the catalog.

use std::{fmt, str::FromStr};

use itertools::Itertools;
use lazy_static::lazy_static;

use crate::error::{Result, Tl431Error};

/// Number of decades searched by default, x10^0 through x10^6.
pub const DEFAULT_DECADES: u32 = 7;

/// Largest decade count `expand` accepts before the scaled values risk overflowing `u64`.
pub const MAX_DECADES: u32 = 16;

/// A minimal set of values often sold in resistor kits.
pub const DEFAULT_SERIES: [u64; 8] = [0, 100, 120, 150, 220, 330, 470, 680];

pub const E12_SERIES: [u64; 13] = [0, 100, 120, 150, 180, 220, 270, 330, 390, 470, 560, 680, 820];

pub const E24_SERIES: [u64; 25] = [
    0, 100, 110, 120, 130, 150, 160, 180, 200, 220, 240, 270, 300, 330, 360, 390, 430, 470, 510,
    560, 620, 680, 750, 820, 910,
];

pub const E48_SERIES: [u64; 49] = [
    0, 100, 105, 110, 115, 121, 127, 133, 140, 147, 154, 162, 169, 178, 187, 196, 205, 215, 226,
    237, 249, 261, 274, 287, 301, 316, 332, 348, 365, 383, 402, 422, 442, 464, 487, 511, 536, 562,
    590, 619, 649, 681, 715, 750, 787, 825, 866, 909, 953,
];

pub const E96_SERIES: [u64; 97] = [
    0, 100, 102, 105, 107, 110, 113, 115, 118, 121, 124, 127, 130, 133, 137, 140, 143, 147, 150,
    154, 158, 162, 165, 169, 174, 178, 182, 187, 191, 196, 200, 205, 210, 215, 221, 226, 232, 237,
    243, 249, 255, 261, 267, 274, 280, 287, 294, 301, 309, 316, 324, 332, 340, 348, 357, 365, 374,
    383, 392, 402, 412, 422, 432, 442, 453, 464, 475, 487, 499, 511, 523, 536, 549, 562, 576, 590,
    604, 619, 634, 649, 665, 681, 698, 715, 732, 750, 768, 787, 806, 825, 845, 866, 887, 909, 931,
    953, 976,
];

pub const E192_SERIES: [u64; 193] = [
    0, 100, 101, 102, 104, 105, 106, 107, 109, 110, 111, 113, 114, 115, 117, 118, 120, 121, 123,
    124, 126, 127, 129, 130, 132, 133, 135, 137, 138, 140, 142, 143, 145, 147, 149, 150, 152, 154,
    156, 158, 160, 162, 164, 165, 167, 169, 172, 174, 176, 178, 180, 182, 184, 187, 189, 191, 193,
    196, 198, 200, 203, 205, 208, 210, 213, 215, 218, 221, 223, 226, 229, 232, 234, 237, 240, 243,
    246, 249, 252, 255, 258, 261, 264, 267, 271, 274, 277, 280, 284, 287, 291, 294, 298, 301, 305,
    309, 312, 316, 320, 324, 328, 332, 336, 340, 344, 348, 352, 357, 361, 365, 370, 374, 379, 383,
    388, 392, 397, 402, 407, 412, 417, 422, 427, 432, 437, 442, 448, 453, 459, 464, 470, 475, 481,
    487, 493, 499, 505, 511, 517, 523, 530, 536, 542, 549, 556, 562, 569, 576, 583, 590, 597, 604,
    612, 619, 626, 634, 642, 649, 657, 665, 673, 681, 690, 698, 706, 715, 723, 732, 741, 750, 759,
    768, 777, 787, 796, 806, 816, 825, 835, 845, 856, 866, 876, 887, 898, 909, 920, 931, 942, 953,
    965, 976, 988,
];

lazy_static! {
    /// DEFAULT series expanded across the default decades
    pub static ref DEFAULT: Vec<u64> = scale(&DEFAULT_SERIES, DEFAULT_DECADES);
    /// E12 series expanded across the default decades
    pub static ref E12: Vec<u64> = scale(&E12_SERIES, DEFAULT_DECADES);
    /// E24 series expanded across the default decades
    pub static ref E24: Vec<u64> = scale(&E24_SERIES, DEFAULT_DECADES);
    /// E48 series expanded across the default decades
    pub static ref E48: Vec<u64> = scale(&E48_SERIES, DEFAULT_DECADES);
    /// E96 series expanded across the default decades
    pub static ref E96: Vec<u64> = scale(&E96_SERIES, DEFAULT_DECADES);
    /// E192 series expanded across the default decades
    pub static ref E192: Vec<u64> = scale(&E192_SERIES, DEFAULT_DECADES);
}

fn scale(series: &[u64], decades: u32) -> Vec<u64> {
    series
        .iter()
        .cartesian_product((0..decades).map(|d| 10u64.pow(d)))
        .map(|(val, mul)| val * mul)
        .sorted_unstable()
        .dedup()
        .collect()
}

/// Expands one decade of base values across `decades` decades.
///
/// Each base value is multiplied by 10^d for every d in `0..decades`; the products are sorted
/// ascending and any value produced twice is kept once. More than [`MAX_DECADES`] decades is
/// rejected with `InvalidConstraints`.
/// ```
/// # use tl431_calc::series::expand;
/// assert_eq!(expand(&[0, 100, 470], 2).unwrap(), vec![0, 100, 470, 1000, 4700]);
/// assert!(expand(&[0, 100], 40).is_err());
/// ```
pub fn expand(series: &[u64], decades: u32) -> Result<Vec<u64>> {
    if decades > MAX_DECADES {
        return Err(Tl431Error::invalid_constraints(format!(
            "cannot expand across {} decades, maximum is {}",
            decades, MAX_DECADES
        )));
    }
    Ok(scale(series, decades))
}

/// The named standard series known to the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Series {
    #[default]
    Default,
    E12,
    E24,
    E48,
    E96,
    E192,
}

impl Series {
    /// All series, smallest first.
    pub const ALL: [Series; 6] = [
        Series::Default,
        Series::E12,
        Series::E24,
        Series::E48,
        Series::E96,
        Series::E192,
    ];

    /// The lowercase name accepted by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Series::Default => "default",
            Series::E12 => "e12",
            Series::E24 => "e24",
            Series::E48 => "e48",
            Series::E96 => "e96",
            Series::E192 => "e192",
        }
    }

    /// The base decade table, leading sentinel included.
    pub fn values(self) -> &'static [u64] {
        match self {
            Series::Default => &DEFAULT_SERIES,
            Series::E12 => &E12_SERIES,
            Series::E24 => &E24_SERIES,
            Series::E48 => &E48_SERIES,
            Series::E96 => &E96_SERIES,
            Series::E192 => &E192_SERIES,
        }
    }

    /// Expands this series across `decades` decades.
    pub fn expand(self, decades: u32) -> Result<Vec<u64>> {
        expand(self.values(), decades)
    }

    /// This series expanded across [`DEFAULT_DECADES`], computed once.
    pub fn expanded(self) -> &'static [u64] {
        match self {
            Series::Default => DEFAULT.as_slice(),
            Series::E12 => E12.as_slice(),
            Series::E24 => E24.as_slice(),
            Series::E48 => E48.as_slice(),
            Series::E96 => E96.as_slice(),
            Series::E192 => E192.as_slice(),
        }
    }

    /// Whether an exhaustive search over this series finishes in reasonable time at the
    /// default decade count.
    pub fn is_searchable(self) -> bool {
        !matches!(self, Series::E96 | Series::E192)
    }

    /// Fails with `UnsupportedSeriesForSearch` for series too large to search.
    pub fn ensure_searchable(self) -> Result<()> {
        if self.is_searchable() {
            Ok(())
        } else {
            Err(Tl431Error::UnsupportedSeriesForSearch { series: self })
        }
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Series {
    type Err = Tl431Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Series::ALL
            .iter()
            .find(|series| series.name() == lower)
            .cloned()
            .ok_or_else(|| Tl431Error::UnknownSeries { name: s.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_tables_ascending() {
        for series in Series::ALL.iter() {
            let values = series.values();
            assert_eq!(values[0], 0, "{} lacks the sentinel", series);
            assert!(values[1..].iter().all(|v| (100..1000).contains(v)));
            assert!(
                values.windows(2).all(|w| w[0] < w[1]),
                "{} is not strictly ascending",
                series
            );
        }
    }

    #[test]
    fn test_table_lengths() {
        let lens: Vec<usize> = Series::ALL.iter().map(|s| s.values().len()).collect();
        assert_eq!(lens, vec![8, 13, 25, 49, 97, 193]);
    }

    #[test]
    fn test_expand_lengths() {
        for series in Series::ALL.iter() {
            let expanded = series.expand(DEFAULT_DECADES).unwrap();
            // The sentinel collapses to a single zero.
            let expected = (series.values().len() - 1) * DEFAULT_DECADES as usize + 1;
            assert_eq!(expanded.len(), expected, "{}", series);
            assert!(expanded.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(expanded[0], 0);
            assert_eq!(expanded[1], 100);
            assert_eq!(*expanded.last().unwrap(), series.values().last().unwrap() * 1_000_000);
        }
    }

    #[test]
    fn test_expand_collapses_duplicates() {
        assert_eq!(expand(&[0, 100, 1000], 2).unwrap(), vec![0, 100, 1000, 10000]);
    }

    #[test]
    fn test_expand_zero_decades() {
        assert!(expand(&DEFAULT_SERIES, 0).unwrap().is_empty());
    }

    #[test]
    fn test_expand_too_many_decades() {
        let largest = expand(&E192_SERIES, MAX_DECADES).unwrap();
        assert_eq!(*largest.last().unwrap(), 988 * 10u64.pow(MAX_DECADES - 1));
        assert!(matches!(
            expand(&E192_SERIES, MAX_DECADES + 1),
            Err(Tl431Error::InvalidConstraints { .. })
        ));
        assert!(Series::E12.expand(u32::MAX).is_err());
    }

    #[test]
    fn test_expanded_matches_expand() {
        for series in Series::ALL.iter() {
            assert_eq!(series.expanded(), &series.expand(DEFAULT_DECADES).unwrap()[..]);
        }
    }

    #[test]
    fn test_parse_names() {
        assert_eq!("default".parse::<Series>(), Ok(Series::Default));
        assert_eq!("E24".parse::<Series>(), Ok(Series::E24));
        assert_eq!(" e192 ".parse::<Series>(), Ok(Series::E192));
        for series in Series::ALL.iter() {
            assert_eq!(series.to_string().parse::<Series>(), Ok(*series));
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            "bogus".parse::<Series>(),
            Err(Tl431Error::UnknownSeries {
                name: "bogus".to_string()
            })
        );
    }

    #[test]
    fn test_searchable() {
        assert!(Series::E48.ensure_searchable().is_ok());
        assert_eq!(
            Series::E96.ensure_searchable(),
            Err(Tl431Error::UnsupportedSeriesForSearch {
                series: Series::E96
            })
        );
        assert!(Series::E192.ensure_searchable().is_err());
    }
}
