mod alert;
mod args;
mod config;
mod console;
mod duration;
mod error;
mod frame;
mod glyphs;
mod logging;
mod notify;
mod timer;

use clap::{CommandFactory, Parser};
use std::process::ExitCode;
use tracing::{debug, info, warn};

const AFTER_HELP: &str = "\
Time Format Options:
  Seconds only:     30s, 90s, 500s
  Minutes only:     5m, 45m, 240m
  Hours only:       2h, 10h
  Combined:         1h30m, 2h15m30s, 45m30s
  Colon format:     1:30:00 (HH:MM:SS), 45:30 (MM:SS)

Examples:
  countdown 30s                       30 second countdown
  countdown 90s                       displays as 01:30
  countdown 1h30m                     1 hour 30 minute countdown
  countdown 45:30                     45 minutes 30 seconds
  countdown 5m --silent               no beep
  countdown 10m --loop                restart at zero, one beep per loop
  countdown 30s -f 880 -b 3 -d 500    880Hz beep, 3 times, 500ms each
  countdown 1m -f 440 -b 5 -d 200 -g 100
  countdown 5m -l -s                  loop silently
  countdown 1h -m                     1 real hour shown in metric time

Notes:
  Maximum time is 99:59:59 (99:99:99 in metric mode).
  Only the units needed for the starting time are shown.
  Press Ctrl+C to stop the timer at any time.
  Metric mode: 1 metric hour = 100 metric minutes = 10000 metric seconds,
  and each metric second lasts 1 real second.
  Defaults are read from the JSON config file, created on first run.";

#[derive(Parser, Debug)]
#[command(
    name = "countdown",
    about = "A countdown timer with a large ASCII-art clock",
    version,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Time duration (e.g., 30s, 5m, 1h30m, 1:30:00)
    time: Option<String>,

    /// Silent mode (no beep alert)
    #[arg(short, long)]
    silent: bool,

    /// Beep frequency in Hz (default: 800, range: 37-32767)
    #[arg(short, long, value_name = "HZ", allow_negative_numbers = true)]
    freq: Option<i64>,

    /// Number of beeps when finished (default: 3)
    #[arg(short, long, value_name = "N", allow_negative_numbers = true)]
    beeps: Option<i64>,

    /// Duration of each beep in milliseconds (default: 1000)
    #[arg(short, long, value_name = "MS", allow_negative_numbers = true)]
    duration: Option<i64>,

    /// Gap between beeps in milliseconds (default: 300)
    #[arg(short, long, value_name = "MS", allow_negative_numbers = true)]
    gap: Option<i64>,

    /// Restart the countdown when it reaches 0 (beeps once per loop)
    #[arg(short = 'l', long = "loop")]
    looping: bool,

    /// Display metric time (1h=100m, 1m=100s); input is still real time
    #[arg(short, long)]
    metric: bool,

    /// Also send a desktop notification when time is up
    #[arg(short, long)]
    notify: bool,
}

fn print_help() {
    let _ = Cli::command().print_long_help();
    println!();
}

/// Merges flags over the configuration defaults and validates the result,
/// collecting every flag violation followed by any problem with the time.
fn settings(cli: &Cli, config: &config::Config) -> Result<timer::RunSettings, Vec<String>> {
    let plan = alert::AlertPlan::validate(
        cli.freq.unwrap_or(config.default_frequency),
        cli.beeps.unwrap_or(config.default_beeps),
        cli.duration.unwrap_or(config.default_duration),
        cli.gap.unwrap_or(config.default_gap),
    );
    let mode = duration::TimeMode::from_flag(cli.metric || config.default_metric);
    let time = duration::parse_time(cli.time.as_deref().unwrap_or_default(), mode);

    match (plan, time) {
        (Ok(plan), Ok(duration)) => Ok(timer::RunSettings {
            duration,
            looping: cli.looping || config.default_loop,
            alert: (!(cli.silent || config.default_silent)).then_some(plan),
            notify: cli.notify || config.desktop_notification,
        }),
        (plan, time) => {
            let mut errors: Vec<String> = plan
                .err()
                .into_iter()
                .flatten()
                .map(|e| e.to_string())
                .collect();
            if let Err(e) = time {
                if let error::TimeError::InvalidFormat(input) = &e {
                    debug!(%input, "rejected time expression");
                }
                errors.push(e.to_string());
            }
            Err(errors)
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let raw: Vec<String> = std::env::args().skip(1).collect();

    let loaded = config::Config::load_from(&config::Config::config_path());
    logging::init(loaded.config.debug_mode);
    if let Some(e) = &loaded.warning {
        let cause = std::error::Error::source(e).map(ToString::to_string).unwrap_or_default();
        warn!(error = %e, %cause, "using built-in configuration defaults");
    }
    if loaded.created {
        info!(path = %config::Config::config_path().display(), "created configuration template");
    }
    let config = loaded.config;

    let effective = args::resolve(&raw, &config);
    if args::wants_help(&raw) {
        print_help();
        return ExitCode::SUCCESS;
    }
    let Some(effective) = effective else {
        print_help();
        return ExitCode::from(1);
    };

    let cli = match Cli::try_parse_from(std::iter::once("countdown".to_string()).chain(effective)) {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() { ExitCode::from(1) } else { ExitCode::SUCCESS };
        }
    };

    if cli.time.is_none() {
        print_help();
        return ExitCode::from(1);
    }

    let settings = match settings(&cli, &config) {
        Ok(settings) => settings,
        Err(errors) => {
            for e in errors {
                eprintln!("Error: {e}");
            }
            return ExitCode::from(1);
        }
    };
    info!(?settings, "starting countdown");

    let glyphs = config.glyphs();
    let mut countdown = timer::Countdown::new(
        settings,
        &glyphs,
        console::Terminal::stdout(),
        alert::Alarm::system(),
    );

    // The countdown future is dropped before anything else is printed, which
    // shows the cursor again.
    let outcome = tokio::select! {
        result = countdown.run() => Some(result),
        Ok(()) = tokio::signal::ctrl_c() => None,
    };

    match outcome {
        Some(Ok(())) => {
            println!();
            ExitCode::SUCCESS
        }
        Some(Err(e)) => {
            eprintln!("Error: terminal output failed: {e}");
            ExitCode::from(1)
        }
        None => {
            println!("\n\nTimer stopped!");
            ExitCode::SUCCESS
        }
    }
}
