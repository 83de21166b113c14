//! Text rendering of search results for the command line.

use itertools::Itertools;

use crate::Solutions;

/// The circuit the calculator solves for.
pub const SCHEMATIC: &str = r#"
    VIN -- Rs ----------- VOUT
            |       |
            R1      |
            |       K
            |---R TL431
            |       A
            R2      |
            |       |
    GND ----------------- GND
"#;

const HEADERS: [&str; 8] = [
    "VOUT V",
    "VOUT Err V/%",
    "Rs",
    "R1",
    "R2",
    "Rs I mA",
    "Divider I mA",
    "TL431 Ik mA",
];

fn format_rval(r: f64, unit: &str) -> String {
    let mut val = format!("{}", r);
    if val.contains('.') {
        val.replace('.', unit)
    } else {
        val.push_str(unit);
        val
    }
}

/// Formats a resistance the way it is marked on parts, e.g. `470R`, `4K7`, `1M`.
/// ```
/// # use tl431_calc::report::format_ohms;
/// assert_eq!(format_ohms(470), "470R");
/// assert_eq!(format_ohms(4700), "4K7");
/// assert_eq!(format_ohms(1_000_000), "1M");
/// ```
pub fn format_ohms(r: u64) -> String {
    if r < 1000 {
        format_rval(r as f64, "R")
    } else if r < 1_000_000 {
        format_rval(r as f64 / 1000.0, "K")
    } else {
        format_rval(r as f64 / 1_000_000.0, "M")
    }
}

fn rows(res: &Solutions) -> Vec<[String; 8]> {
    let target = res.vout_target();
    res.iter()
        .map(|s| {
            [
                format!("{:.6}", s.vout),
                format!("{:.6}/{:.3}", s.error, s.error_percent(target)),
                format_ohms(s.rs),
                format_ohms(s.r1),
                format_ohms(s.r2),
                format!("{:.3}", s.i_rs * 1e3),
                format!("{:.6}", s.i_div * 1e3),
                format!("{:.3}", s.i_k * 1e3),
            ]
        })
        .collect()
}

/// Renders the solutions as a right-aligned table with a header rule, or a short notice when
/// there are none.
pub fn render_table(res: &Solutions) -> String {
    if res.is_empty() {
        return "No solutions found.\n".to_string();
    }
    let rows = rows(res);
    let mut widths = HEADERS.map(str::len);
    for row in rows.iter() {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    out.push_str(&pad_line(HEADERS.iter().cloned(), &widths));
    out.push('\n');
    out.push_str(&widths.iter().map(|w| "=".repeat(*w)).join("  "));
    out.push('\n');
    for row in rows.iter() {
        out.push_str(&pad_line(row.iter().map(String::as_str), &widths));
        out.push('\n');
    }
    out
}

fn pad_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths.iter())
        .map(|(cell, w)| format!("{:>w$}", cell, w = *w))
        .join("  ")
}

/// The input and target voltage lines printed under the table.
pub fn render_summary(res: &Solutions) -> String {
    format!(
        "VIN:         {:.3} V\nVOUT Target: {:.3} V\n",
        res.vin(),
        res.vout_target()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{series::Series, Constraints, Tl431Calc};

    #[test]
    fn test_format_ohms() {
        assert_eq!(format_ohms(100), "100R");
        assert_eq!(format_ohms(1000), "1K");
        assert_eq!(format_ohms(1500), "1K5");
        assert_eq!(format_ohms(33_000), "33K");
        assert_eq!(format_ohms(680_000), "680K");
        assert_eq!(format_ohms(2_200_000), "2M2");
        assert_eq!(format_ohms(9_880_000), "9M88");
    }

    #[test]
    fn test_render_table() {
        let res = Tl431Calc::new(Series::Default).calc(12.0, 5.0).unwrap();
        let table = render_table(&res);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), res.len() + 2);
        assert!(lines[0].contains("TL431 Ik mA"));
        assert!(lines[1].chars().all(|c| c == '=' || c == ' '));
        let widths: Vec<usize> = lines.iter().map(|l| l.len()).collect();
        assert!(widths.iter().all(|w| *w == widths[0]));
        let best = res.iter().next().unwrap();
        assert!(lines[2].trim_start().starts_with(&format!("{:.6}", best.vout)));
        assert!(lines[2].contains(&format_ohms(best.rs)));
    }

    #[test]
    fn test_render_empty() {
        // Ik can never exceed the 10mA series current limit.
        let res = Tl431Calc::new(Series::Default)
            .constraints(Constraints::default().ik_min(15e-3))
            .calc(12.0, 5.0)
            .unwrap();
        assert!(res.is_empty());
        assert_eq!(render_table(&res), "No solutions found.\n");
    }

    #[test]
    fn test_render_summary() {
        let res = Tl431Calc::new(Series::Default).calc(12.0, 5.0).unwrap();
        assert_eq!(
            render_summary(&res),
            "VIN:         12.000 V\nVOUT Target: 5.000 V\n"
        );
    }
}
