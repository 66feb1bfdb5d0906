use std::io::{self, BufRead};
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::thread;

use clap::Parser;
use thermometer::{Thermometer, ThermometerCommand, ThermometerConfig};
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// Animated Celsius/Fahrenheit thermometer.
///
/// Temperatures written to stdin, one per line, become new targets.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Celsius range of the primary scale
    #[arg(long, num_args = 2, value_names = ["MIN", "MAX"], allow_negative_numbers = true)]
    range: Option<Vec<i32>>,

    /// Starting temperature in Celsius
    #[arg(long, allow_negative_numbers = true)]
    initial: Option<f64>,

    /// Window title
    #[arg(long, default_value = "Thermometer")]
    title: String,

    /// TrueType font for the labels
    #[arg(long)]
    font: Option<PathBuf>,
}

impl Cli {
    fn config(self) -> ThermometerConfig {
        let range = match self.range.as_deref() {
            Some(&[a, b]) => (a.min(b), a.max(b)),
            _ => (-40, 50),
        };
        ThermometerConfig::builder()
            .title(self.title)
            .range(range)
            .maybe_initial(self.initial)
            .maybe_font_path(self.font)
            .build()
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let config = Cli::parse().config();
    let mut thermometer = match Thermometer::new(config) {
        Ok(thermometer) => thermometer,
        Err(err) => {
            error!(%err, "invalid configuration");
            process::exit(2);
        }
    };

    // Spawn a thread to read targets from stdin
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<f64>() {
                Ok(target) if target.is_finite() => {
                    if sender.send(ThermometerCommand::Seek(target)).is_err() {
                        break;
                    }
                }
                _ => warn!(line, "ignoring input that is not a temperature"),
            }
        }
    });

    if let Err(err) = thermometer.show_with_commands(receiver) {
        error!(%err, "thermometer failed");
        process::exit(1);
    }
}
