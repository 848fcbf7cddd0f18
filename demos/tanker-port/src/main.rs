//! tanker-port: runs the port simulation from a JSON configuration.
//!
//! ```text
//! tanker-port [CONFIG.json] [--runs N] [--out DIR]
//! ```
//!
//! Without a config file the built-in defaults are used (one week, 3 lines,
//! 1 tow).  `--runs N` repeats the run with seeds `seed..seed+N` and prints
//! the averages; `--out DIR` writes the CSV report of every run.
//! Set `RUST_LOG=debug` to trace the scheduler.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use port_core::{NotificationChannel, PortConfig, PortObserver, SimTime};
use port_output::{CsvReportWriter, ReportWriter};
use port_sim::SchedulerBuilder;
use port_stats::{SimulationReport, StatisticsCollector};

const HOUR: f64 = 3_600.0;


// ── Command line ──────────────────────────────────────────────────────────────

/// Tanker port discrete-event simulation.
#[derive(Parser)]
#[command(name = "tanker-port")]
#[command(about = "Simulates tankers competing for tows and processing lines", long_about = None)]
struct Args {
    /// JSON configuration file; built-in defaults when omitted
    config: Option<PathBuf>,

    /// Number of runs, seeded `seed..seed+N`
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u64).range(1..))]
    runs: u64,

    /// Directory for the CSV report (one `run_<i>` subdirectory per run when N > 1)
    #[arg(long)]
    out: Option<PathBuf>,
}

fn load_config(path: Option<&Path>) -> Result<PortConfig> {
    let Some(path) = path else {
        return Ok(PortConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

// ── Tick counter ──────────────────────────────────────────────────────────────

#[derive(Default)]
struct TickCounter {
    ticks:  u64,
    events: usize,
}

impl PortObserver for TickCounter {
    fn on_tick_end(&mut self, _now: SimTime, fired: usize) {
        self.ticks += 1;
        self.events += fired;
    }
}

// ── Single run ────────────────────────────────────────────────────────────────

fn run_once(config: PortConfig, out: Option<&Path>) -> Result<SimulationReport> {
    let mut scheduler = SchedulerBuilder::new(config).build()?;
    let mut stats = StatisticsCollector::new();
    let mut counter = TickCounter::default();
    {
        let mut channel = NotificationChannel::new().subscribe(&mut stats).subscribe(&mut counter);
        scheduler.run(&mut channel)?;
    }
    info!("{} tick(s), {} event(s) fired", counter.ticks, counter.events);

    let report = stats.finalize(scheduler.now())?;
    if let Some(dir) = out {
        let mut writer = CsvReportWriter::new(dir)?;
        writer.write_report(&report)?;
    }
    Ok(report)
}

fn print_report(report: &SimulationReport) {
    let h = report.horizon;
    println!(
        "Tankers: {} arrived, {} processed, {} unprocessed",
        report.arrived, report.processed, report.unprocessed
    );
    println!();
    println!("Averages over processed tankers (hours):");
    let a = &report.averages;
    println!("  in queue            {:>8.2}", a.time_in_queue / HOUR);
    println!("  towing              {:>8.2}", a.tow_process_time / HOUR);
    println!("  on processing line  {:>8.2}", a.time_on_process_line / HOUR);
    println!("  stuck on line       {:>8.2}", a.time_while_stuck_in_processing_line / HOUR);
    println!("  in system           {:>8.2}", a.time_in_system / HOUR);
    println!();
    println!("{:<18} {:>10} {:>10} {:>8}", "Resource", "Work (h)", "Idle (h)", "Load %");
    println!("{}", "-".repeat(49));
    for s in report.tows.iter().chain(&report.lines) {
        println!(
            "{:<18} {:>10.2} {:>10.2} {:>8.2}",
            format!("{} #{}", s.kind, s.id),
            s.working_time / HOUR,
            s.idle_time / HOUR,
            s.working_share(h) * 100.0,
        );
    }
    println!();
    println!("Mean tow load:  {:.2}%", SimulationReport::mean_load(&report.tow_load));
    println!("Mean line load: {:.2}%", SimulationReport::mean_load(&report.line_load));
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;
    config.validate()?;

    println!("=== tanker-port ===");
    println!(
        "Horizon: {:.1} h  |  Lines: {}  |  Tows: {}  |  Seed: {}  |  Runs: {}",
        config.simulation_time / HOUR,
        config.processing_line_count,
        config.tow_count,
        config.seed,
        args.runs,
    );
    println!();

    let t0 = Instant::now();
    if args.runs == 1 {
        let report = run_once(config, args.out.as_deref())?;
        print_report(&report);
    } else {
        let mut arrived = 0.0;
        let mut unprocessed = 0.0;
        let mut in_queue = 0.0;
        let mut on_line = 0.0;
        for i in 0..args.runs {
            let run_config = PortConfig { seed: config.seed + i, ..config.clone() };
            let out = args.out.as_ref().map(|d| d.join(format!("run_{i}")));
            let report = run_once(run_config, out.as_deref())?;
            arrived += report.arrived as f64;
            unprocessed += report.unprocessed as f64;
            in_queue += report.averages.time_in_queue;
            on_line += report.averages.time_on_process_line;
        }
        let n = args.runs as f64;
        println!("Averages over {} runs:", args.runs);
        println!("  tankers arrived           {:>8.2}", arrived / n);
        println!("  tankers unprocessed       {:>8.2}", unprocessed / n);
        println!("  time in queue (h)         {:>8.2}", in_queue / n / HOUR);
        println!("  time on line (h)          {:>8.2}", on_line / n / HOUR);
    }
    println!();
    println!("Completed in {:.3} s", t0.elapsed().as_secs_f64());
    if let Some(dir) = &args.out {
        println!("CSV report written to {}", dir.display());
    }
    Ok(())
}
