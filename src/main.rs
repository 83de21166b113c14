//! tl431-calc - resistor values for a TL431 voltage reference
//!
//! ```bash
//! tl431-calc --vin 12 --vout 5 -s e24
//! ```

use std::{
    process::ExitCode,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};

use clap::Parser;
use tracing::{debug, info, Level};

use tl431_calc::{
    check_voltages,
    error::Result,
    report::{render_summary, render_table, SCHEMATIC},
    Constraints, Series, Tl431Calc, DEFAULT_DECADES,
};

/// Calculate TL431 resistor divider + series resistor values for a target Vout.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The minimum input voltage (V)
    #[arg(long)]
    vin: f64,

    /// Required output voltage (V)
    #[arg(long)]
    vout: f64,

    /// Resistor series: default, e12, e24, e48, e96 or e192
    #[arg(short = 's', long = "series", default_value = "default")]
    series: String,

    /// Minimum TL431 cathode current (A)
    #[arg(long, default_value_t = 1e-3)]
    ik_min: f64,

    /// Maximum TL431 cathode current (A)
    #[arg(long, default_value_t = 20e-3)]
    ik_max: f64,

    /// Maximum divider current (A)
    #[arg(long, default_value_t = 1e-3)]
    idiv_max: f64,

    /// Maximum series resistor current (A)
    #[arg(long, default_value_t = 10e-3)]
    irs_max: f64,

    /// Number of solutions to show
    #[arg(short = 'n', long, default_value_t = 10)]
    max_results: usize,

    /// Decades the series is expanded across, starting at x1
    #[arg(long, default_value_t = DEFAULT_DECADES)]
    decades: u32,

    /// Give up on the search after this many seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<f64>,

    /// Enable debugging
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn constraints(&self) -> Constraints {
        Constraints::default()
            .ik_min(self.ik_min)
            .ik_max(self.ik_max)
            .idiv_max(self.idiv_max)
            .irs_max(self.irs_max)
            .max_results(self.max_results)
    }

    /// Performs every check that has to pass before a search may start.
    fn calculator(&self) -> Result<Tl431Calc> {
        let series: Series = self.series.parse()?;
        series.ensure_searchable()?;
        check_voltages(self.vin, self.vout)?;
        let calc = Tl431Calc::new(series)
            .decades(self.decades)
            .constraints(self.constraints());
        calc.validate()?;
        Ok(calc)
    }
}

/// Raises the returned flag once `seconds` have passed.
fn start_timer(seconds: Option<f64>) -> Arc<AtomicBool> {
    let cancel = Arc::new(AtomicBool::new(false));
    if let Some(seconds) = seconds.filter(|s| s.is_finite() && *s >= 0.0) {
        let flag = Arc::clone(&cancel);
        thread::spawn(move || {
            thread::sleep(Duration::from_secs_f64(seconds));
            flag.store(true, Ordering::Relaxed);
        });
    }
    cancel
}

fn run(args: &Args) -> Result<()> {
    let calc = args.calculator()?;

    println!();
    println!("Schematic");
    println!("{}", SCHEMATIC);

    info!(
        series = %calc.series(),
        combinations = calc.combinations()? as u64,
        "Searching"
    );
    let cancel = start_timer(args.timeout);
    let res = calc.calc_with_cancel(args.vin, args.vout, &cancel)?;
    debug!(found = res.len(), "Search finished");

    print!("{}", render_table(&res));
    println!();
    print!("{}", render_summary(&res));
    println!();
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.debug { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if args.debug {
                eprintln!("Error: {:?}", err);
            } else {
                eprintln!("{}", err);
            }
            ExitCode::FAILURE
        }
    }
}
