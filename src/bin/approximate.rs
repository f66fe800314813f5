//! Fits a network to a sampled saturating curve, saves it, and reloads it.

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use perceptron::{Logging, Network, RunConfig, Trainer, Vector};

/// Samples of the curve at x = 1..=20.
const CURVE: [f64; 20] = [
    20.0,
    346.12814956,
    440.811685833281,
    506.386394877906,
    553.932275490213,
    588.456079653438,
    613.525471204964,
    631.72958494378,
    644.948484588186,
    654.547375835747,
    661.517601472129,
    666.579024106174,
    670.254371278109,
    672.923221087921,
    674.861203807411,
    676.268468093033,
    677.290351698946,
    678.032391495382,
    678.571222979033,
    678.962494942032,
];

#[derive(Parser)]
#[command(name = "approximate")]
#[command(about = "Train a perceptron to approximate a sampled function", long_about = None)]
struct Cli {
    /// JSON run configuration; the built-in approximator is used if omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory the trained model is written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Seed for the initial weights
    #[arg(long)]
    seed: Option<u64>,

    /// Upper bound on training epochs
    #[arg(long)]
    max_epochs: Option<usize>,
}

/// Mean and population standard deviation.
fn moments(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let centered = Vector::new(values.iter().map(|v| v - mean).collect());
    (mean, centered.length() / n.sqrt())
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(ref path) => RunConfig::load(path)?,
        None => RunConfig::approximator(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.max_epochs.is_some() {
        config.max_epochs = cli.max_epochs;
    }

    let (mean, std) = moments(&CURVE);
    let examples: Vec<(Vector, Vector)> = CURVE
        .iter()
        .enumerate()
        .map(|(i, y)| {
            (
                Vector::new(vec![(i + 1) as f64]),
                Vector::new(vec![(y - mean) / std]),
            )
        })
        .collect();

    let mut network = config.build()?;
    let mut trainer = Trainer::new(&mut network)
        .threshold(config.threshold)
        .logging(Logging::Epochs(1000));
    if let Some(epochs) = config.max_epochs {
        trainer = trainer.max_epochs(epochs);
    }
    let report = trainer.train(&examples)?;
    println!(
        "{} after {} epochs, cost {}",
        if report.converged {
            "Converged"
        } else {
            "Stopped"
        },
        report.epochs,
        report.cost
    );

    for (x, _) in &examples {
        let y = network.predict(x)?;
        println!("f({}) = {}", x[0], y[0] * std + mean);
    }

    let path = network.save(&cli.output_dir)?;

    let mut restored = Network::load(&path)?;
    let x = 3.4567;
    let y = restored.predict(&Vector::new(vec![x]))?;
    println!("restored f({}) = {}", x, y[0] * std + mean);
    Ok(())
}
