use anyhow::Context;
use clap::Parser;
use log::info;
use std::path::PathBuf;

use vanco_dosing::{Config, DosingFrequency, Simulator};

#[derive(Parser)]
#[command(name = "vanco_dosing")]
#[command(about = "Vancomycin dose recommendations targeting AUC24")]
struct Cli {
    /// Configuration file path
    #[arg(short, long)]
    config: PathBuf,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Dosing interval in hours (12, 24 or 48)
    #[arg(short, long)]
    frequency: Option<u32>,

    /// Explicit dose in mg, replacing the suggested candidate
    #[arg(short, long)]
    dose: Option<f64>,

    /// Infusion duration in hours
    #[arg(short, long)]
    infusion: Option<f64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut config = Config::from_file(&cli.config)
        .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
    info!("Loaded configuration from {:?}", cli.config);

    if let Some(hours) = cli.frequency {
        config.dosing.frequency = DosingFrequency::try_from(hours)?;
    }
    if let Some(dose) = cli.dose {
        config.dosing.dose = Some(dose);
    }
    if let Some(infusion) = cli.infusion {
        config.dosing.infusion_hours = infusion;
    }

    let limits = config.limits.clone();
    let simulator = Simulator::new(config).context("invalid dosing options")?;
    let plan = simulator.run().context("dose calculation failed")?;

    match plan.suggested() {
        Some(s) => info!(
            "Suggested: {} mg {} ({} mg/kg), AUC24 {:.0}",
            s.candidate.dose_mg, plan.frequency, s.candidate.mg_per_kg, s.candidate.auc24
        ),
        None => info!("No candidate in the suggested AUC24 band for {}", plan.frequency),
    }

    std::fs::create_dir_all(&cli.output)?;
    vanco_dosing::output::save_results(&plan, &limits, &cli.output)?;
    info!("Results saved to {:?}", cli.output);

    Ok(())
}
