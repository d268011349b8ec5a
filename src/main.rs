//! leafcutter - CLI Entry Point
//!
//! Inspect, validate and generate colony simulation parameters.

use clap::{Parser, Subcommand};
use leafcutter::balance::{
    plant_regen_chance, predator_spawn_chance, EcosystemBalance, PopulationCounts, RiskLevel,
};
use leafcutter::{ClimateCycle, SimulationConfig, DEFAULT_CONFIG_PATH};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "leafcutter")]
#[command(version)]
#[command(about = "Leafcutter colony simulation parameters and balance rules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the default parameter file
    Init {
        /// Output path
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        output: PathBuf,
    },

    /// Load and validate a parameter file
    Check {
        /// Parameter file (YAML)
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },

    /// Print the effective configuration
    Show {
        /// Parameter file (YAML); builtin defaults if absent
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print JSON instead of YAML
        #[arg(long)]
        json: bool,
    },

    /// Print the climate schedule with its active multipliers
    Climate {
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of steps to print
        #[arg(short, long, default_value = "50")]
        steps: u64,
    },

    /// Assess ecosystem health for a set of population counts
    Assess {
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        ants: u32,
        #[arg(long, default_value = "0")]
        plants: u32,
        #[arg(long, default_value = "0")]
        fungi: u32,
        #[arg(long, default_value = "0")]
        parasites: u32,
        #[arg(long, default_value = "0")]
        predators: u32,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { output } => generate_config(output),

        Commands::Check { config } => check_config(config),

        Commands::Show { config, json } => show_config(config, json),

        Commands::Climate { config, steps } => print_climate(config, steps),

        Commands::Assess {
            config,
            ants,
            plants,
            fungi,
            parasites,
            predators,
        } => assess(
            config,
            PopulationCounts {
                ants,
                plants,
                fungi,
                parasites,
                predators,
            },
        ),
    }
}

/// Explicit path must load; otherwise fall back to the default chain
fn load_config(path: Option<PathBuf>) -> Result<SimulationConfig, Box<dyn std::error::Error>> {
    match path {
        Some(path) => {
            let config = SimulationConfig::from_file(&path)?;
            log::info!("Loaded config from: {}", path.display());
            Ok(config)
        }
        None => Ok(SimulationConfig::get_default()?),
    }
}

fn generate_config(output: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let config = SimulationConfig::builtin();
    config.save(&output)?;
    println!("Configuration saved to: {:?}", output);
    Ok(())
}

fn check_config(path: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let config = SimulationConfig::from_file(&path)?;

    println!("{}: OK", path.display());
    println!("{}", config.summary());
    Ok(())
}

fn show_config(path: Option<PathBuf>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        print!("{}", config.to_yaml()?);
    }
    Ok(())
}

fn print_climate(path: Option<PathBuf>, steps: u64) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let counts = PopulationCounts::initial(&config);
    let mut cycle = ClimateCycle::new(&config.climate);

    println!("=== Climate Schedule ===");
    println!(
        "Cycle length: {} (rain {}, dry {})",
        config.climate.cycle_length, config.climate.rain_duration, config.climate.dry_duration
    );
    println!();
    println!("{:>6} {:>5} {:>10} {:>10}", "step", "phase", "plant_p", "predator_p");

    for step in 1..=steps {
        let climate = cycle.advance();
        println!(
            "{:>6} {:>5} {:>10.3} {:>10.4}",
            step,
            climate.name(),
            plant_regen_chance(step, counts.plants, climate, &config),
            predator_spawn_chance(&counts, climate, &config),
        );
    }

    Ok(())
}

fn assess(
    path: Option<PathBuf>,
    counts: PopulationCounts,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    let balance = EcosystemBalance::new(config);

    let report = balance.analyze(&counts);
    let (score, assessment) = balance.sustainability(&counts);

    println!("=== Ecosystem Health ===");
    println!("Population:       {:.2}", report.population);
    println!("Food:             {:.2}", report.food);
    println!("Predator balance: {:.2}", report.predator_balance);
    println!("Parasite impact:  {:.2}", report.parasite_impact);
    println!("Diversity:        {:.2}", report.diversity);
    println!("Overall:          {:.2}", report.overall);
    println!();
    println!("Sustainability: {:.2}", score);
    println!("{}", assessment);
    println!("Extinction risk: {}", RiskLevel::assess(&counts).name());

    Ok(())
}
