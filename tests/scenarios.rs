use approx::assert_relative_eq;
use tl431_calc::*;

fn assert_within(res: &[Solution], c: &Constraints) {
    for s in res {
        assert!(s.r1 > 0 && s.r2 > 0 && s.rs > 0);
        assert!(c.ik_min <= s.i_k && s.i_k <= c.ik_max, "Ik {} out of range", s.i_k);
        assert!(s.i_div <= c.idiv_max, "Idiv {} too high", s.i_div);
        assert!(s.i_rs <= c.irs_max, "Irs {} too high", s.i_rs);
    }
}

fn assert_ranked(res: &[Solution]) {
    for w in res.windows(2) {
        assert!(w[0].error <= w[1].error);
        if w[0].error == w[1].error {
            assert!(w[0].i_k <= w[1].i_k);
        }
    }
}

#[test]
fn twelve_volts_to_five_from_kit_values() {
    let c = Constraints::default();
    let res = Tl431Calc::new(Series::Default).calc(12.0, 5.0).unwrap();
    assert!(!res.is_empty());
    assert!(res.len() <= c.max_results);

    let best = res.iter().next().unwrap();
    assert!(best.error < 0.1);
    assert_relative_eq!(best.vout, calc_vout(best.r1 as f64, best.r2 as f64));

    let all = res.into_vec();
    assert_within(&all, &c);
    assert_ranked(&all);
}

#[test]
fn every_searchable_series_respects_bounds() {
    let c = Constraints::default().max_results(20);
    for series in Series::ALL.iter().filter(|s| s.is_searchable()) {
        let res = solve(9.0, 3.3, series.expanded(), &c);
        assert!(!res.is_empty(), "{} found nothing", series);
        assert!(res.len() <= 20);
        assert_within(&res, &c);
        assert_ranked(&res);
    }
}

#[test]
fn larger_series_is_at_least_as_accurate() {
    let c = Constraints::default();
    let coarse = solve(12.0, 3.3, Series::Default.expanded(), &c);
    let fine = solve(12.0, 3.3, Series::E24.expanded(), &c);
    assert!(fine[0].error <= coarse[0].error);
}

#[test]
fn custom_limits_are_applied() {
    let c = Constraints::default()
        .ik_min(2e-3)
        .ik_max(5e-3)
        .idiv_max(200e-6)
        .irs_max(6e-3)
        .max_results(4);
    let res = Tl431Calc::new(Series::E12)
        .constraints(c)
        .calc(15.0, 10.0)
        .unwrap()
        .into_vec();
    assert!(!res.is_empty());
    assert!(res.len() <= 4);
    assert_within(&res, &c);
}

#[test]
fn vin_below_vout_finds_nothing() {
    assert!(solve(2.0, 5.0, Series::Default.expanded(), &Constraints::default()).is_empty());
    assert!(Tl431Calc::default().calc(2.0, 5.0).is_err());
}

#[test]
fn fewer_decades_shrink_the_search() {
    let full = Tl431Calc::new(Series::E12);
    let short = Tl431Calc::new(Series::E12).decades(4);
    assert!(short.combinations().unwrap() < full.combinations().unwrap());
    let res = short.calc(12.0, 5.0).unwrap();
    assert!(res.iter().all(|s| s.r1 < 10_000 && s.r2 < 10_000 && s.rs < 10_000));
}

#[test]
fn unknown_and_unsupported_series() {
    assert_eq!(
        "bogus".parse::<Series>(),
        Err(Tl431Error::UnknownSeries {
            name: "bogus".to_string()
        })
    );
    let e96: Series = "e96".parse().unwrap();
    assert_eq!(
        e96.ensure_searchable(),
        Err(Tl431Error::UnsupportedSeriesForSearch { series: Series::E96 })
    );
    assert_eq!(
        e96.ensure_searchable().unwrap_err().to_string(),
        "e96 series resistors take too long and too much CPU to process"
    );
}
